use std::path::PathBuf;

use thiserror::Error;

/// Failures of the outer surfaces: config files, image decoding, overlay export.
/// The interactive pipeline itself never returns these.
#[derive(Debug, Error)]
pub enum ReadoutError {
    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("cannot decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("overlay export failed: {0}")]
    Export(String),
}

pub type Result<T, E = ReadoutError> = std::result::Result<T, E>;
