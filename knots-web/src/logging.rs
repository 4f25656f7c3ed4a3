//! Routes `log` records to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::Once;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LevelFilter,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
        }
    }
}

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;
static INIT: Once = Once::new();

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug => console::debug_1(&line),
            Level::Trace => console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger and the panic hook once.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(config.level);
        }
        log::debug!("logging initialized");
    });
}
