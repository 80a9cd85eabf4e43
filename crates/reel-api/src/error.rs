//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use reel_pipeline::PipelineError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::Input(_) => Self::BadRequest(err.to_string()),
            PipelineError::NotFound(_) => Self::NotFound(err.to_string()),
            PipelineError::NotReady(_) | PipelineError::AlreadyStarted(_) => {
                Self::Conflict(err.to_string())
            }
            PipelineError::Acquisition(_)
            | PipelineError::Render(_)
            | PipelineError::Store(_)
            | PipelineError::Io(_) => Self::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse { detail };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_errors_map_to_statuses() {
        let cases = [
            (PipelineError::input("bad body"), StatusCode::BAD_REQUEST),
            (PipelineError::not_found("p1"), StatusCode::NOT_FOUND),
            (PipelineError::not_ready("p1"), StatusCode::CONFLICT),
            (PipelineError::already_started("p1"), StatusCode::CONFLICT),
            (
                PipelineError::acquisition("yt-dlp failed"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PipelineError::render("ffmpeg failed"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_detail_keeps_pipeline_reason() {
        let api: ApiError = PipelineError::not_ready("run still in progress").into();
        assert!(api.to_string().contains("run still in progress"));
    }
}
