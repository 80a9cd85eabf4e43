//! Script-to-video rendering and background audio mixing.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info};

use reel_models::ScriptStyle;

use crate::error::{MediaError, MediaResult};
use crate::filters::{build_slide_filter, slide_background};

/// Configuration for script slide rendering.
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// Output width in pixels (default: 1080).
    pub output_width: u32,
    /// Output height in pixels (default: 1920).
    pub output_height: u32,
    /// Frame rate of the generated video (default: 30).
    pub fps: u32,
    /// FFmpeg timeout in seconds (default: 300).
    pub timeout_secs: u64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            output_width: 1080,
            output_height: 1920,
            fps: 30,
            timeout_secs: 300,
        }
    }
}

/// Total asset duration for a line count, floored at 3 seconds.
pub fn script_duration(line_count: usize, per_line_secs: f64) -> f64 {
    (per_line_secs * line_count as f64).round().max(3.0)
}

/// Render a script into a vertical slide video.
///
/// One drawtext window per line over a solid background, with a silent
/// stereo track so downstream mixing and concatenation always find audio.
pub async fn render_script(
    lines: &[String],
    per_line_secs: f64,
    style: ScriptStyle,
    dest: &Path,
    config: &ScriptConfig,
) -> MediaResult<PathBuf> {
    if lines.is_empty() {
        return Err(MediaError::InvalidVideo("No script lines to render".to_string()));
    }

    let duration = script_duration(lines.len(), per_line_secs);
    let filter = build_slide_filter(lines, per_line_secs, style);
    debug!(lines = lines.len(), duration = duration, "Slide filter built");

    let color_input = format!(
        "color=c={}:s={}x{}:d={:.3}:r={}",
        slide_background(style),
        config.output_width,
        config.output_height,
        duration,
        config.fps,
    );
    let duration_arg = format!("{:.3}", duration);

    let args = vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-f".to_string(),
        "lavfi".to_string(),
        "-i".to_string(),
        color_input,
        "-f".to_string(),
        "lavfi".to_string(),
        "-i".to_string(),
        "anullsrc=channel_layout=stereo:sample_rate=44100".to_string(),
        "-filter_complex".to_string(),
        filter,
        "-map".to_string(),
        "[vout]".to_string(),
        "-map".to_string(),
        "1:a".to_string(),
        "-t".to_string(),
        duration_arg,
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "veryfast".to_string(),
        "-crf".to_string(),
        "23".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        dest.to_string_lossy().to_string(),
    ];

    run_ffmpeg(&args, config.timeout_secs, "Script render").await?;

    if !dest.exists() {
        return Err(MediaError::ffmpeg_failed(
            "Script render produced no output file",
            None,
            None,
        ));
    }

    info!(
        lines = lines.len(),
        duration = duration,
        output = %dest.display(),
        "Rendered script video"
    );
    Ok(dest.to_path_buf())
}

/// Mix background audio into a finished video as a second pass.
///
/// The video's own track and the background audio are blended with amix,
/// bounded by the video duration.
pub async fn mix_audio(
    video: &Path,
    audio: &Path,
    dest: &Path,
    timeout_secs: u64,
) -> MediaResult<PathBuf> {
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }
    if !audio.exists() {
        return Err(MediaError::FileNotFound(audio.to_path_buf()));
    }

    let args = vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        video.to_string_lossy().to_string(),
        "-i".to_string(),
        audio.to_string_lossy().to_string(),
        "-filter_complex".to_string(),
        "[0:a][1:a]amix=inputs=2:duration=first:dropout_transition=0[aout]".to_string(),
        "-map".to_string(),
        "0:v".to_string(),
        "-map".to_string(),
        "[aout]".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-shortest".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        dest.to_string_lossy().to_string(),
    ];

    run_ffmpeg(&args, timeout_secs, "Audio mix").await?;

    info!(output = %dest.display(), "Mixed background audio");
    Ok(dest.to_path_buf())
}

/// Run a raw multi-input FFmpeg invocation with a bounded wait.
async fn run_ffmpeg(args: &[String], timeout_secs: u64, what: &str) -> MediaResult<()> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

    let child = Command::new("ffmpeg")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    let output = match tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), child).await
    {
        Ok(result) => result?,
        Err(_) => return Err(MediaError::Timeout(timeout_secs)),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail = crate::command::stderr_tail(&stderr, 5);
        error!(exit_code = ?output.status.code(), stderr = %tail, "{what} failed");
        return Err(MediaError::ffmpeg_failed(
            format!("{} failed", what),
            Some(stderr.to_string()),
            output.status.code(),
        ));
    }

    Ok(())
}
