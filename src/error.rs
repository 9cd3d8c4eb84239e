//! Error handling for model regeneration
//!
//! One `thiserror` enum covers the library; binaries wrap it with `anyhow`
//! for top-level context.

use thiserror::Error;

/// Main error type for the model regeneration pipeline
#[derive(Error, Debug)]
pub enum ModelGenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{tool} failed with {status}: {stderr}")]
    Tool {
        tool: String,
        status: String,
        stderr: String,
    },
}

/// Result type alias for convenience
pub type GenResult<T> = Result<T, ModelGenError>;
