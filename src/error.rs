//! Error types for chatrelay.

use thiserror::Error;

/// Common error type for process-level operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for configuration or user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for chatrelay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
