//! Candidate segment derivation.

use reel_models::Segment;

/// Bucket width used when a source has no transcript.
const BUCKET_SECS: f64 = 10.0;

/// Candidates for highlight selection: the transcript when present,
/// otherwise synthetic time buckets spanning the source duration.
pub fn derive_segments(transcript: Vec<Segment>, duration: f64) -> Vec<Segment> {
    if !transcript.is_empty() {
        return transcript;
    }
    fallback_buckets(duration)
}

/// Contiguous 10-second buckets covering `[0, duration)`.
///
/// Each bucket carries a single-space text so scoring treats it as a real,
/// if silent, candidate. The tail bucket is shortened to the duration.
pub fn fallback_buckets(duration: f64) -> Vec<Segment> {
    if duration <= 0.0 {
        return Vec::new();
    }

    let mut buckets = Vec::new();
    let mut start = 0.0;
    while start < duration {
        let end = (start + BUCKET_SECS).min(duration);
        buckets.push(Segment::new(start, end, " "));
        start = end;
    }
    buckets
}
