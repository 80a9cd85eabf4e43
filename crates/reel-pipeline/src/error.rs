//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Acquisition failed: {0}")]
    Acquisition(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Asset not ready: {0}")]
    NotReady(String),

    #[error("Run already started: {0}")]
    AlreadyStarted(String),

    #[error("Store error: {0}")]
    Store(#[from] reel_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn not_ready(id: impl Into<String>) -> Self {
        Self::NotReady(id.into())
    }

    pub fn already_started(id: impl Into<String>) -> Self {
        Self::AlreadyStarted(id.into())
    }
}
