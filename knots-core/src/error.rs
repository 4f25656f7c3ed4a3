//! Error types for model loading

use thiserror::Error;

/// Result type for loader operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while fetching or parsing a model
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {path}: {message}")]
    Fetch { path: String, message: String },

    #[error("{path} is not valid UTF-8")]
    Encoding { path: String },
}

impl LoadError {
    pub(crate) fn parse(file: &str, line: usize, message: impl Into<String>) -> Self {
        LoadError::Parse {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}
