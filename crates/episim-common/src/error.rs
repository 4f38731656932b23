//! Error types for EPISIM

use thiserror::Error;

/// Result type alias for EPISIM operations
pub type Result<T> = std::result::Result<T, EpisimError>;

/// Main error type for EPISIM
#[derive(Error, Debug)]
pub enum EpisimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid date span: end {end} precedes start {start}")]
    InvalidDateSpan {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
