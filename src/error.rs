//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, GDAL, image and config errors, and provides semantic
//! variants for the shape and masking preconditions of the point-cloud pipeline.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] crate::io::GdalError),

    #[error("Variable `{name}` has rank {rank} after time selection, expected 2")]
    Shape { name: String, rank: usize },

    #[error("Shape mismatch for {what}: expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        what: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },

    #[error("Coordinate axis `{name}` is empty")]
    EmptyAxis { name: String },

    #[error("Time index {index} out of range for `{name}` (leading dimension {len})")]
    TimeIndexOutOfRange {
        name: String,
        index: usize,
        len: usize,
    },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JPEG encoding error: {0}")]
    Encode(#[from] jpeg_encoder::EncodingError),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }

    pub(crate) fn shape_mismatch(what: impl Into<String>, expected: &[usize], found: &[usize]) -> Self {
        Error::ShapeMismatch {
            what: what.into(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}
