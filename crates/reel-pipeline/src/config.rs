//! Pipeline configuration.

use reel_media::{EngineConfig, RenderConfig, ScriptConfig};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Work directory for per-project downloads and renders
    pub work_dir: String,
    /// How many highlights each run selects
    pub highlight_count: usize,
    /// Timeout for individual FFmpeg invocations
    pub ffmpeg_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: "/tmp/reelsmith".to_string(),
            highlight_count: 5,
            ffmpeg_timeout_secs: 600,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/tmp/reelsmith".to_string()),
            highlight_count: std::env::var("HIGHLIGHT_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            ffmpeg_timeout_secs: std::env::var("FFMPEG_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
        }
    }

    /// Engine settings derived from this config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            render: RenderConfig {
                timeout_secs: self.ffmpeg_timeout_secs,
                ..RenderConfig::default()
            },
            script: ScriptConfig {
                timeout_secs: self.ffmpeg_timeout_secs,
                ..ScriptConfig::default()
            },
        }
    }
}
