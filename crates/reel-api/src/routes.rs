//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::projects::{get_asset, get_status, start_run, submit_project};
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let project_routes = Router::new()
        .route("/projects", post(submit_project))
        .route("/projects/:id/run", post(start_run))
        .route("/projects/:id/status", get(get_status))
        .route("/projects/:id/asset", get(get_asset));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", project_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use reel_media::{EngineConfig, FfmpegEngine};
    use reel_pipeline::{PipelineConfig, Reelsmith};
    use reel_store::MemoryProjectStore;

    use crate::config::ApiConfig;
    use crate::state::AppState;

    use super::create_router;

    fn test_state() -> AppState {
        let store = Arc::new(MemoryProjectStore::new());
        let engine = Arc::new(FfmpegEngine::new(EngineConfig::default()));
        let core = Reelsmith::new(store, engine, PipelineConfig::default());

        AppState {
            config: ApiConfig::default(),
            core: Arc::new(core),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router(test_state(), None);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_unknown_project_is_404_with_detail() {
        let app = create_router(test_state(), None);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/projects/does-not-exist/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert!(json["detail"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_submit_and_poll_script_project() {
        let app = create_router(test_state(), None);

        let body = serde_json::json!({
            "type": "script",
            "script": "first line\nsecond line",
            "per_line_secs": 2.0,
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/projects")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/projects/{}/status", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let status = body_json(response).await;
        assert_eq!(status["status"], "idle");
        assert_eq!(status["progress"], 0);
    }

    #[tokio::test]
    async fn test_non_http_remote_is_rejected() {
        let app = create_router(test_state(), None);

        let body = serde_json::json!({
            "type": "remote",
            "remote_ref": "file:///etc/passwd",
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/projects")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_asset_is_conflict_before_done() {
        let app = create_router(test_state(), None);

        let body = serde_json::json!({
            "type": "file",
            "path": "/tmp/source.mp4",
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/projects")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/projects/{}/asset", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
