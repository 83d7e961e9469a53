//! Textual generator-tree format: a thin RON deserialization seam over
//! [`crate::generator::Generator`], replacing the original's custom
//! preprocessor-and-archive parser with `serde` + `ron`.

use crate::error::MapForgeError;
use crate::generator::Generator;
use std::path::Path;

/// Read and deserialize a generator tree from a RON file.
pub fn load_generator(path: &Path) -> Result<Generator, MapForgeError> {
    let text = std::fs::read_to_string(path).map_err(|source| MapForgeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let gen = ron::from_str(&text)?;
    Ok(gen)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::Token;

    #[test]
    fn test_load_generator_roundtrips_set() {
        let dir = std::env::temp_dir();
        let path = dir.join("mapforge_test_set.ron");
        std::fs::write(&path, r#"Set(["floor"])"#).unwrap();
        let gen = load_generator(&path).unwrap();
        match gen {
            Generator::Set(tokens) => assert_eq!(tokens, vec![Token::new("floor")]),
            other => panic!("unexpected generator: {other:?}"),
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_generator_missing_file_is_io_error() {
        let path = Path::new("/nonexistent/mapforge_test_missing.ron");
        assert!(matches!(
            load_generator(path),
            Err(MapForgeError::Io { .. })
        ));
    }

    #[test]
    fn test_load_generator_bad_ron_is_config_error() {
        let dir = std::env::temp_dir();
        let path = dir.join("mapforge_test_bad.ron");
        std::fs::write(&path, "not valid ron(").unwrap();
        assert!(matches!(
            load_generator(&path),
            Err(MapForgeError::Config(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }
}
