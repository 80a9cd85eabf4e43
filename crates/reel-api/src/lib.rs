//! Axum HTTP API server.
//!
//! Thin HTTP surface over [`reel_pipeline::Reelsmith`]: project submission,
//! run control, status polling, asset lookup, health probes, and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
