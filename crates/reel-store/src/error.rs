//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing project records.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store root: {0}")]
    InvalidRoot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn invalid_root(msg: impl Into<String>) -> Self {
        Self::InvalidRoot(msg.into())
    }
}
