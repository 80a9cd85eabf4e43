//! Remote video acquisition using yt-dlp.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};

/// Preferred download format: merged mp4 with m4a audio where possible.
const FORMAT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Resolve a remote reference to a local media file under `dest_dir`.
///
/// The reference is handed to yt-dlp untouched; the downloaded file lands at
/// `dest_dir/source.mp4`.
pub async fn acquire(remote_ref: &str, dest_dir: impl AsRef<Path>) -> MediaResult<PathBuf> {
    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    let dest_dir = dest_dir.as_ref();
    tokio::fs::create_dir_all(dest_dir).await?;
    let output_path = dest_dir.join("source.mp4");

    if output_path.exists() {
        info!("Using existing source file: {}", output_path.display());
        return Ok(output_path);
    }

    info!(
        remote_ref = %remote_ref,
        output = %output_path.display(),
        "Acquiring remote source"
    );

    let output_path_str = output_path.to_string_lossy();
    let args = vec![
        "--no-playlist",
        "--no-progress",
        "-f",
        FORMAT_SELECTOR,
        "-o",
        &output_path_str,
        remote_ref,
    ];

    let output = Command::new("yt-dlp")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);

        let error_msg = stderr.lines().last().unwrap_or("Unknown error");
        let is_rate_limited = stderr.contains("429")
            || stderr.contains("Too Many Requests")
            || stderr.contains("rate limit");
        if is_rate_limited {
            warn!(remote_ref = %remote_ref, "Rate limit detected during acquisition");
        }

        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            error_msg
        )));
    }

    if !output_path.exists() {
        return Err(MediaError::download_failed("Output file not created"));
    }

    let file_size = output_path.metadata()?.len();
    info!(
        output = %output_path.display(),
        size_mb = file_size as f64 / (1024.0 * 1024.0),
        "Acquired remote source"
    );

    Ok(output_path)
}

/// Check if a reference points at a platform yt-dlp commonly handles.
pub fn is_supported_url(url: &str) -> bool {
    let supported_domains = [
        "youtube.com",
        "youtu.be",
        "vimeo.com",
        "twitter.com",
        "x.com",
        "twitch.tv",
        "tiktok.com",
    ];

    supported_domains.iter().any(|domain| url.contains(domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_url() {
        assert!(is_supported_url("https://youtube.com/watch?v=abc"));
        assert!(is_supported_url("https://youtu.be/abc"));
        assert!(is_supported_url("https://vimeo.com/123"));
        assert!(!is_supported_url("https://example.com/video"));
    }
}
