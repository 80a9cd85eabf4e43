//! Clip concatenation.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

use crate::error::{MediaError, MediaResult};

/// Concatenate rendered clips into a single output, preserving input order.
///
/// Uses the concat demuxer with stream copy; all inputs come out of the same
/// render settings, so no re-encode is needed. A single input is plain
/// copied.
pub async fn concat_clips(clips: &[PathBuf], dest: &Path) -> MediaResult<PathBuf> {
    if clips.is_empty() {
        return Err(MediaError::InvalidVideo(
            "No clips to concatenate".to_string(),
        ));
    }

    for clip in clips {
        if !clip.exists() {
            return Err(MediaError::FileNotFound(clip.clone()));
        }
    }

    if clips.len() == 1 {
        tokio::fs::copy(&clips[0], dest).await?;
        return Ok(dest.to_path_buf());
    }

    let concat_list_path = dest.with_extension("concat.txt");
    let concat_content: String = clips
        .iter()
        .map(|p| format!("file '{}'", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    tokio::fs::write(&concat_list_path, &concat_content).await?;

    let output = Command::new("ffmpeg")
        .args([
            "-y",
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            concat_list_path.to_str().unwrap_or(""),
            "-c",
            "copy",
            "-movflags",
            "+faststart",
            dest.to_str().unwrap_or(""),
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| MediaError::ffmpeg_failed(format!("Failed to run FFmpeg concat: {}", e), None, None))?;

    tokio::fs::remove_file(&concat_list_path).await.ok();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::ffmpeg_failed(
            "Clip concatenation failed",
            Some(stderr.to_string()),
            output.status.code(),
        ));
    }

    info!(clips = clips.len(), output = %dest.display(), "Concatenated clips");
    Ok(dest.to_path_buf())
}
