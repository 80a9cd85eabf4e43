//! Transcript fetching via yt-dlp subtitles.
//!
//! Downloads VTT captions for a remote reference and parses them into timed
//! segments. Every failure path degrades to an empty list: a missing
//! transcript is never fatal to a run.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use reel_models::Segment;

/// Fetch timed transcript segments for a remote reference.
///
/// Returns an empty list when the tool is missing, the download fails, no
/// captions exist, or parsing yields nothing.
pub async fn fetch_transcript(remote_ref: &str, workdir: &Path) -> Vec<Segment> {
    if which::which("yt-dlp").is_err() {
        warn!("yt-dlp not found, skipping transcript fetch");
        return Vec::new();
    }

    if let Err(e) = tokio::fs::create_dir_all(workdir).await {
        warn!(error = %e, "Failed to create transcript workdir");
        return Vec::new();
    }

    let output_template = workdir.join("%(id)s");
    let output_template_str = output_template.to_string_lossy();
    let args = vec![
        "--write-auto-sub",
        "--write-sub",
        "--sub-lang",
        "en,en-US,en-GB",
        "--skip-download",
        "--sub-format",
        "vtt",
        "--output",
        &output_template_str,
        remote_ref,
    ];

    let output = match tokio::process::Command::new("yt-dlp").args(&args).output().await {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "Failed to run yt-dlp for transcript");
            return Vec::new();
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(error = %stderr.trim(), "yt-dlp failed to download transcript");
        return Vec::new();
    }

    let vtt_path = match find_vtt_file(workdir).await {
        Some(path) => path,
        None => {
            debug!(remote_ref = %remote_ref, "No caption file downloaded");
            return Vec::new();
        }
    };

    let content = match tokio::fs::read_to_string(&vtt_path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Failed to read VTT file");
            return Vec::new();
        }
    };

    tokio::fs::remove_file(&vtt_path).await.ok();

    let segments = parse_vtt(&content);
    debug!(
        remote_ref = %remote_ref,
        segments = segments.len(),
        "Parsed transcript"
    );
    segments
}

/// Locate a downloaded VTT file, preferring English subtitles.
async fn find_vtt_file(workdir: &Path) -> Option<PathBuf> {
    let mut dir = tokio::fs::read_dir(workdir).await.ok()?;
    let mut candidates = Vec::new();

    while let Ok(Some(entry)) = dir.next_entry().await {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("vtt") {
            candidates.push(path);
        }
    }

    candidates.sort_by_key(|path| {
        let name = path.file_name().map(|n| n.to_string_lossy().to_string());
        match name {
            Some(n) if n.contains(".en") => 0,
            _ => 1,
        }
    });
    candidates.into_iter().next()
}

/// Parse VTT content into timed segments.
///
/// Strips inline tags, skips cue numbers, and drops the rolling repeats
/// YouTube auto-captions produce.
fn parse_vtt(content: &str) -> Vec<Segment> {
    let cue_pattern =
        Regex::new(r"((?:\d{2}:)?\d{2}:\d{2}\.\d{3}) --> ((?:\d{2}:)?\d{2}:\d{2}\.\d{3})").unwrap();
    let tag_pattern = Regex::new(r"<[^>]+>").unwrap();

    let mut segments: Vec<Segment> = Vec::new();
    let mut current: Option<(f64, f64, String)> = None;
    let mut last_text = String::new();

    let mut flush = |current: &mut Option<(f64, f64, String)>,
                     segments: &mut Vec<Segment>,
                     last_text: &mut String| {
        if let Some((start, end, text)) = current.take() {
            let text = text.trim().to_string();
            if !text.is_empty() && text != *last_text && end > start {
                *last_text = text.clone();
                segments.push(Segment::new(start, end, text));
            }
        }
    };

    for line in content.lines() {
        let line = tag_pattern.replace_all(line.trim(), "").to_string();

        if line.is_empty() || line == "WEBVTT" || line.starts_with("Kind:") || line.starts_with("Language:") {
            continue;
        }

        if let Some(caps) = cue_pattern.captures(&line) {
            flush(&mut current, &mut segments, &mut last_text);
            let start = parse_vtt_timestamp(&caps[1]);
            let end = parse_vtt_timestamp(&caps[2]);
            current = Some((start, end, String::new()));
            continue;
        }

        // Cue sequence numbers
        if line.chars().all(|c| c.is_numeric()) {
            continue;
        }

        if let Some((_, _, ref mut text)) = current {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&line);
        }
    }

    flush(&mut current, &mut segments, &mut last_text);
    segments
}

/// Convert "HH:MM:SS.mmm" or "MM:SS.mmm" to seconds.
fn parse_vtt_timestamp(ts: &str) -> f64 {
    let mut parts: Vec<&str> = ts.split(':').collect();
    if parts.len() == 2 {
        parts.insert(0, "0");
    }
    if parts.len() != 3 {
        return 0.0;
    }

    let hours: f64 = parts[0].parse().unwrap_or(0.0);
    let minutes: f64 = parts[1].parse().unwrap_or(0.0);
    let seconds: f64 = parts[2].parse().unwrap_or(0.0);

    hours * 3600.0 + minutes * 60.0 + seconds
}
