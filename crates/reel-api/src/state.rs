//! Application state.

use std::sync::Arc;

use reel_media::FfmpegEngine;
use reel_pipeline::{PipelineConfig, Reelsmith};
use reel_store::JsonProjectStore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub core: Arc<Reelsmith>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Opens the JSON store under `STORE_DIR` and wires the ffmpeg engine
    /// with the pipeline configuration from the environment.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let pipeline_config = PipelineConfig::from_env();

        let store_dir =
            std::env::var("STORE_DIR").unwrap_or_else(|_| "/tmp/reelsmith/store".to_string());
        let store = JsonProjectStore::open(store_dir).await?;

        let engine = FfmpegEngine::new(pipeline_config.engine_config());

        let core = Reelsmith::new(Arc::new(store), Arc::new(engine), pipeline_config);

        Ok(Self {
            config,
            core: Arc::new(core),
        })
    }
}
