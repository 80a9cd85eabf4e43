//! Vertical clip rendering.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::{build_vertical_filter, LOUDNORM_FILTER};
use crate::probe::probe_media;

/// Configuration for vertical clip rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output width in pixels (default: 1080 for 9:16 portrait).
    pub output_width: u32,
    /// Output height in pixels (default: 1920 for 9:16 portrait).
    pub output_height: u32,
    /// Background blur sigma (default: 30.0).
    pub background_blur: f32,
    /// Background zoom factor (default: 1.8).
    pub background_zoom: f32,
    /// x264 CRF (default: 21).
    pub crf: u8,
    /// x264 preset (default: "veryfast").
    pub preset: String,
    /// FFmpeg timeout in seconds (default: 600).
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_width: 1080,
            output_height: 1920,
            background_blur: 30.0,
            background_zoom: 1.8,
            crf: 21,
            preset: "veryfast".to_string(),
            timeout_secs: 600,
        }
    }
}

impl RenderConfig {
    /// Calculate the foreground dimensions to fit the output width.
    pub fn calculate_main_dimensions(&self, src_width: u32, src_height: u32) -> (u32, u32) {
        let scale_factor = self.output_width as f64 / src_width.max(1) as f64;
        let main_height = (src_height as f64 * scale_factor) as u32;

        // Even dimensions for h264 encoding
        let main_width = self.output_width - (self.output_width % 2);
        let main_height = main_height - (main_height % 2);

        (main_width, main_height)
    }

    /// Vertical offset centering the foreground in the output frame.
    pub fn calculate_y_offset(&self, main_height: u32) -> u32 {
        self.output_height.saturating_sub(main_height) / 2
    }
}

/// Render one highlight window into a vertical clip.
///
/// Produces a fixed-aspect portrait output: the source centered over a
/// blurred, zoomed copy of itself, audio loudness-normalized. The first
/// frame is forced to a keyframe so the clips stream-copy cleanly into the
/// final concatenation.
pub async fn render_clip(
    src: &Path,
    start: f64,
    end: f64,
    dest: &Path,
    config: &RenderConfig,
) -> MediaResult<PathBuf> {
    if end <= start {
        return Err(MediaError::InvalidTimeRange(format!(
            "start {:.3} >= end {:.3}",
            start, end
        )));
    }
    if !src.exists() {
        return Err(MediaError::FileNotFound(src.to_path_buf()));
    }

    let info = probe_media(src).await?;
    let filter = build_vertical_filter(config, info.width, info.height);
    debug!(filter = %filter, "Clip filter complex");

    let mut cmd = FfmpegCommand::new(src, dest)
        .seek(start)
        .duration(end - start)
        .filter_complex(filter)
        .output_args(["-map", "[vout]", "-map", "0:a?"])
        .video_codec("libx264")
        .preset(config.preset.clone())
        .crf(config.crf)
        .output_args(["-pix_fmt", "yuv420p"])
        .audio_codec("aac")
        .audio_bitrate("128k")
        .output_args(["-af", LOUDNORM_FILTER])
        .output_args(["-force_key_frames", "expr:eq(n,0)"])
        .output_args(["-movflags", "+faststart"]);

    if info.fps > 30.5 {
        cmd = cmd.output_args(["-r", "30"]);
    }

    let runner = FfmpegRunner::new().with_timeout(config.timeout_secs);
    runner.run(&cmd).await?;

    if !dest.exists() {
        return Err(MediaError::ffmpeg_failed(
            "Render produced no output file",
            None,
            None,
        ));
    }

    info!(
        start = start,
        end = end,
        output = %dest.display(),
        "Rendered clip"
    );
    Ok(dest.to_path_buf())
}
