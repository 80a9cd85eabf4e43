//! The external-collaborator seam.
//!
//! [`MediaEngine`] is everything the pipeline needs from the outside world;
//! [`FfmpegEngine`] is the production implementation backed by ffmpeg,
//! ffprobe and yt-dlp subprocesses. Tests drive runs with a fake instead.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use reel_models::{ScriptStyle, Segment};

use crate::acquire;
use crate::concat::concat_clips;
use crate::error::MediaResult;
use crate::probe::probe_media;
use crate::render::{render_clip, RenderConfig};
use crate::script::{mix_audio, render_script, ScriptConfig};
use crate::transcript::fetch_transcript;

/// Settings shared by every engine call.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub render: RenderConfig,
    pub script: ScriptConfig,
}

/// External media capabilities consumed by the pipeline.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Resolve a remote reference to a local file under `dest_dir`.
    async fn acquire(&self, remote_ref: &str, dest_dir: &Path) -> MediaResult<PathBuf>;

    /// Source duration in seconds; errors are treated as unknown upstream.
    async fn probe_duration(&self, path: &Path) -> MediaResult<f64>;

    /// Timed transcript segments; empty on any failure, never errors.
    async fn fetch_transcript(&self, remote_ref: &str, workdir: &Path) -> Vec<Segment>;

    /// Render one highlight window into a vertical clip at `dest`.
    async fn render_clip(
        &self,
        src: &Path,
        start: f64,
        end: f64,
        dest: &Path,
    ) -> MediaResult<PathBuf>;

    /// Concatenate clips into `dest`, preserving order.
    async fn concat(&self, clips: &[PathBuf], dest: &Path) -> MediaResult<PathBuf>;

    /// Render script lines into a slide video at `dest`.
    async fn render_script(
        &self,
        lines: &[String],
        per_line_secs: f64,
        style: ScriptStyle,
        dest: &Path,
    ) -> MediaResult<PathBuf>;

    /// Mix background audio into a finished video.
    async fn mix(&self, video: &Path, audio: &Path, dest: &Path) -> MediaResult<PathBuf>;
}

/// Production engine shelling out to ffmpeg/ffprobe/yt-dlp.
#[derive(Debug, Clone, Default)]
pub struct FfmpegEngine {
    config: EngineConfig,
}

impl FfmpegEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn acquire(&self, remote_ref: &str, dest_dir: &Path) -> MediaResult<PathBuf> {
        acquire::acquire(remote_ref, dest_dir).await
    }

    async fn probe_duration(&self, path: &Path) -> MediaResult<f64> {
        Ok(probe_media(path).await?.duration)
    }

    async fn fetch_transcript(&self, remote_ref: &str, workdir: &Path) -> Vec<Segment> {
        fetch_transcript(remote_ref, workdir).await
    }

    async fn render_clip(
        &self,
        src: &Path,
        start: f64,
        end: f64,
        dest: &Path,
    ) -> MediaResult<PathBuf> {
        render_clip(src, start, end, dest, &self.config.render).await
    }

    async fn concat(&self, clips: &[PathBuf], dest: &Path) -> MediaResult<PathBuf> {
        concat_clips(clips, dest).await
    }

    async fn render_script(
        &self,
        lines: &[String],
        per_line_secs: f64,
        style: ScriptStyle,
        dest: &Path,
    ) -> MediaResult<PathBuf> {
        render_script(lines, per_line_secs, style, dest, &self.config.script).await
    }

    async fn mix(&self, video: &Path, audio: &Path, dest: &Path) -> MediaResult<PathBuf> {
        mix_audio(video, audio, dest, self.config.script.timeout_secs).await
    }
}
