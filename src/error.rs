//! Error types for the CLI driver. The generator evaluator itself never
//! returns a `Result`: a failed generation is a `bool`, not an error (see
//! [`crate::generator::Generator::make`]); this type only covers the seams
//! around it (reading a file, parsing its contents, and the top-level
//! generation outcome).

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum MapForgeError {
    #[error("failed to read input file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse generator tree: {0}")]
    Config(#[from] ron::error::SpannedError),
    #[error("generation failed: the generator tree returned false")]
    GenerationFailed,
}
