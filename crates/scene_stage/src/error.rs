//! Engine error types

use thiserror::Error;

/// Errors surfaced by the stage host
#[derive(Debug, Error)]
pub enum StageError {
    /// A controller was attached twice or operated on after removal
    #[error("unknown controller: {0}")]
    UnknownController(String),

    /// A drag payload could not be parsed into shape parameters
    #[error("invalid drag payload: {0}")]
    InvalidDragPayload(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
