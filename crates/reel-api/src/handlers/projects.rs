//! Project submission, run control, status, and asset handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use url::Url;
use validator::Validate;

use reel_models::{ProjectId, ProjectSource};
use reel_pipeline::StatusSnapshot;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for a newly submitted project.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// Response for an accepted run request.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub id: String,
    pub status: String,
}

/// Response carrying the finished asset path.
#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub path: String,
}

/// Bounds on script submissions. The pipeline re-checks positivity; the
/// range here keeps per-line durations sane for a short-form asset.
#[derive(Debug, Validate)]
struct ScriptParams {
    #[validate(range(
        min = 0.1,
        max = 30.0,
        message = "per_line_secs must be between 0.1 and 30"
    ))]
    per_line_secs: f64,
}

fn validate_source(source: &ProjectSource) -> ApiResult<()> {
    match source {
        ProjectSource::File { path } => {
            if path.trim().is_empty() {
                return Err(ApiError::bad_request("path must not be empty"));
            }
        }
        ProjectSource::Remote { remote_ref } => {
            let url = Url::parse(remote_ref)
                .map_err(|e| ApiError::bad_request(format!("Invalid URL: {}", e)))?;
            match url.scheme() {
                "http" | "https" => {}
                scheme => {
                    return Err(ApiError::bad_request(format!(
                        "Invalid protocol '{}'. Only HTTP and HTTPS are allowed.",
                        scheme
                    )));
                }
            }
        }
        ProjectSource::Script { per_line_secs, .. } => {
            let params = ScriptParams {
                per_line_secs: *per_line_secs,
            };
            params
                .validate()
                .map_err(|e| ApiError::Validation(e.to_string()))?;
        }
    }

    Ok(())
}

/// POST /api/projects
///
/// Submit a new project. The body is the tagged source description.
///
/// Returns:
/// - 201: Project created, body carries its id
/// - 400: Malformed source (bad URL, blank script, out-of-range timing)
pub async fn submit_project(
    State(state): State<AppState>,
    Json(source): Json<ProjectSource>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    validate_source(&source)?;

    let id = state.core.submit(source).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse { id: id.to_string() }),
    ))
}

/// POST /api/projects/:id/run
///
/// Start the background run for a project. Returns 202 immediately;
/// progress is observed through the status endpoint.
///
/// Returns:
/// - 202: Run accepted
/// - 404: Unknown project
/// - 409: Run already started (processing or terminal record)
pub async fn start_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<RunResponse>)> {
    let id = ProjectId::from_string(id);
    state.core.start_run(&id).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(RunResponse {
            id: id.to_string(),
            status: "accepted".to_string(),
        }),
    ))
}

/// GET /api/projects/:id/status
///
/// Poll the project's progress, status, and error message if any.
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusSnapshot>> {
    let id = ProjectId::from_string(id);
    let snapshot = state.core.poll_status(&id).await?;

    Ok(Json(snapshot))
}

/// GET /api/projects/:id/asset
///
/// Path of the finished asset. 409 until the run reaches `done`.
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AssetResponse>> {
    let id = ProjectId::from_string(id);
    let path = state.core.fetch_asset(&id).await?;

    Ok(Json(AssetResponse {
        path: path.to_string_lossy().into_owned(),
    }))
}
