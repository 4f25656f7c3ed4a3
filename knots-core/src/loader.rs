//! Turning material + geometry text into a placed model.
//!
//! Fetching is left to the host: the web shell uses `fetch`, the terminal
//! reads from disk with [`load_from_dir`]. Both end in [`build_model`].

use crate::config::ModelSource;
use crate::error::LoadResult;
use crate::mtl::parse_mtl;
use crate::obj::parse_obj;
use crate::scene::Model;

/// Parse both files of `source` and place the result for its side
pub fn build_model(source: &ModelSource, material_text: &str, geometry_text: &str) -> LoadResult<Model> {
    let materials = parse_mtl(source.material_path, material_text)?;
    log::debug!("{}: {} materials", source.material_path, materials.len());

    let shapes = parse_obj(source.geometry_path, geometry_text, &materials)?;
    Ok(Model::placed(source.side, shapes))
}

/// Read `source` from an asset root on the local filesystem
#[cfg(not(target_arch = "wasm32"))]
pub fn load_from_dir(root: &std::path::Path, source: &ModelSource) -> LoadResult<Model> {
    let material_text = read_text(&root.join(source.material_path))?;
    let geometry_text = read_text(&root.join(source.geometry_path))?;
    build_model(source, &material_text, &geometry_text)
}

#[cfg(not(target_arch = "wasm32"))]
fn read_text(path: &std::path::Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|source| crate::error::LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MODEL_SOURCES;
    use crate::error::LoadError;
    use crate::scene::Side;

    const MTL: &str = "newmtl knot\nKd 0.2 0.4 0.9\n";
    const OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl knot\nf 1 2 3\n";

    #[test]
    fn test_build_places_by_side() {
        for source in &MODEL_SOURCES {
            let model = build_model(source, MTL, OBJ).unwrap();
            assert_eq!(model.side, source.side);
            assert_eq!(model.triangle_count(), 1);
            assert_eq!(model.shapes[0].material.name, "knot");
        }
        let left = build_model(&MODEL_SOURCES[0], MTL, OBJ).unwrap();
        assert_eq!(left.side, Side::Left);
        assert!(left.position().x > 0.0);
    }

    #[test]
    fn test_geometry_errors_name_the_obj_file() {
        let err = build_model(&MODEL_SOURCES[1], MTL, "f 1 2 3\n").unwrap_err();
        match err {
            LoadError::Parse { file, .. } => assert_eq!(file, MODEL_SOURCES[1].geometry_path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let root = std::path::Path::new("/nonexistent/knots");
        let err = load_from_dir(root, &MODEL_SOURCES[0]).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
