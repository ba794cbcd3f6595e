use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid color bounds: {value}. Expected `min:max` with min < max")]
    InvalidBounds { value: String },

    #[error("Invalid date: {value}. Expected YYYYMMDD or YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Conflicting arguments: {first} and {second}")]
    Conflict {
        first: &'static str,
        second: &'static str,
    },

    #[error("Input file not found: {path}")]
    MissingInput { path: String },
}
