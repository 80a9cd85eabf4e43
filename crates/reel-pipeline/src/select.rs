//! Highlight selection.
//!
//! Pure and deterministic: score every candidate segment, merge near-adjacent
//! ones, normalize window durations, rank by score, then space the chosen
//! windows so they never overlap. No IO, no randomness; the same input always
//! yields the same highlights.

use std::cmp::Ordering;

use regex::Regex;

use reel_models::{Highlight, Segment};

use crate::sentiment;

/// Gaps below this merge neighboring segments into one window.
const MERGE_GAP_SECS: f64 = 0.6;
/// Target minimum window length; short windows are extended toward it.
const MIN_WINDOW_SECS: f64 = 8.0;
/// Hard cap on how far a short window may be extended.
const MAX_EXTENSION_SECS: f64 = 4.0;
/// Windows longer than this are truncated to it.
const MAX_WINDOW_SECS: f64 = 20.0;
/// Minimum spacing enforced between consecutive chosen windows.
const OVERLAP_GAP_SECS: f64 = 0.5;
/// Smallest window the renderer will accept.
const MIN_RENDER_SECS: f64 = 0.2;
/// Duration floor for the words-per-second rate.
const MIN_RATE_SECS: f64 = 0.4;
/// Score multiplier for segments matching the virality keywords.
const KEYWORD_BOOST: f64 = 1.4;

/// Curated virality keywords; matched case-insensitively on word boundaries.
const KEYWORD_PATTERN: &str = r"(?i)\b(secret|insane|crazy|shocking|unbelievable|hack|trick|exposed|revealed|mistake|warning|viral|money|free|instantly|guaranteed|nobody|everyone|never|always)\b";

#[derive(Debug, Clone)]
struct ScoredSegment {
    start: f64,
    end: f64,
    text: String,
    score: f64,
}

/// Select up to `count` non-overlapping highlight windows from `segments`.
pub fn select(segments: &[Segment], count: usize) -> Vec<Highlight> {
    if segments.is_empty() || count == 0 {
        return Vec::new();
    }

    let keyword_re = Regex::new(KEYWORD_PATTERN).unwrap();
    let mut scored: Vec<ScoredSegment> = segments
        .iter()
        .map(|segment| score_segment(segment, &keyword_re))
        .collect();
    scored.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));

    let mut windows: Vec<ScoredSegment> =
        merge_adjacent(scored).into_iter().map(normalize_duration).collect();

    // Stable sort: equal scores keep time order.
    windows.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    windows.truncate(count);

    resolve_overlaps(windows)
}

fn score_segment(segment: &Segment, keyword_re: &Regex) -> ScoredSegment {
    let duration = segment.duration().max(MIN_RATE_SECS);
    let words = segment.text.split_whitespace().count() as f64;
    let words_per_sec = words / duration;

    let sentiment_factor = (sentiment::polarity(&segment.text) + 1.0).max(0.0);
    let keyword_factor = if keyword_re.is_match(&segment.text) {
        KEYWORD_BOOST
    } else {
        1.0
    };

    ScoredSegment {
        start: segment.start,
        end: segment.end,
        text: segment.text.clone(),
        score: words_per_sec * sentiment_factor * keyword_factor,
    }
}

/// Merge time-ordered segments whose gap is below [`MERGE_GAP_SECS`].
/// Text joins with a space, the score keeps the stronger constituent.
fn merge_adjacent(scored: Vec<ScoredSegment>) -> Vec<ScoredSegment> {
    let mut merged: Vec<ScoredSegment> = Vec::with_capacity(scored.len());
    for segment in scored {
        match merged.last_mut() {
            Some(prev) if segment.start - prev.end < MERGE_GAP_SECS => {
                prev.text.push(' ');
                prev.text.push_str(&segment.text);
                prev.score = prev.score.max(segment.score);
                prev.end = prev.end.max(segment.end);
            }
            _ => merged.push(segment),
        }
    }
    merged
}

/// Extend short windows toward [`MIN_WINDOW_SECS`] (by at most
/// [`MAX_EXTENSION_SECS`]) and truncate long ones to [`MAX_WINDOW_SECS`].
fn normalize_duration(mut window: ScoredSegment) -> ScoredSegment {
    let duration = window.end - window.start;
    if duration < MIN_WINDOW_SECS {
        let extended = (duration + MAX_EXTENSION_SECS).min(MIN_WINDOW_SECS);
        window.end = window.start + extended;
    } else if duration > MAX_WINDOW_SECS {
        window.end = window.start + MAX_WINDOW_SECS;
    }
    window
}

/// Order the chosen windows by start and push any window starting within
/// [`OVERLAP_GAP_SECS`] of its predecessor's end forward. Ends stay put;
/// a final clamp keeps every window renderable.
fn resolve_overlaps(mut windows: Vec<ScoredSegment>) -> Vec<Highlight> {
    windows.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));

    let mut highlights: Vec<Highlight> = Vec::with_capacity(windows.len());
    for window in windows {
        let mut start = window.start;
        if let Some(prev) = highlights.last() {
            if start < prev.end + OVERLAP_GAP_SECS {
                start = prev.end + OVERLAP_GAP_SECS;
            }
        }
        let end = window.end.max(start + MIN_RENDER_SECS);
        highlights.push(Highlight::new(start, end, window.text, window.score));
    }
    highlights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> Segment {
        Segment::new(start, end, text)
    }

    #[test]
    fn test_returns_at_most_count() {
        let segments: Vec<Segment> = (0..10)
            .map(|i| seg(i as f64 * 30.0, i as f64 * 30.0 + 10.0, "some spoken words here"))
            .collect();

        let highlights = select(&segments, 3);
        assert_eq!(highlights.len(), 3);
        for h in &highlights {
            assert!(h.end > h.start);
        }
    }

    #[test]
    fn test_empty_input_and_zero_count() {
        assert!(select(&[], 5).is_empty());
        assert!(select(&[seg(0.0, 10.0, "words")], 0).is_empty());
    }

    #[test]
    fn test_short_window_extended_toward_minimum() {
        let highlights = select(&[seg(10.0, 12.0, "a quick aside")], 1);
        assert_eq!(highlights.len(), 1);
        // 2s window grows by the full 4s extension.
        assert!((highlights[0].duration() - 6.0).abs() < 1e-9);

        let highlights = select(&[seg(10.0, 16.0, "a slightly longer aside")], 1);
        // 6s window only grows to the 8s target.
        assert!((highlights[0].duration() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_window_truncated() {
        let highlights = select(&[seg(5.0, 40.0, "one very long rambling take")], 1);
        assert_eq!(highlights.len(), 1);
        assert!((highlights[0].start - 5.0).abs() < 1e-9);
        assert!((highlights[0].duration() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_gap_merges() {
        let segments = vec![
            seg(0.0, 4.0, "first part"),
            seg(4.5, 9.0, "second part"),
        ];
        let highlights = select(&segments, 5);
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].text, "first part second part");
        assert!((highlights[0].end - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_gap_at_threshold_stays_separate() {
        let segments = vec![
            seg(0.0, 4.0, "first part"),
            seg(4.6, 9.0, "second part"),
        ];
        let highlights = select(&segments, 5);
        assert_eq!(highlights.len(), 2);
    }

    #[test]
    fn test_keyword_scores_strictly_higher() {
        let plain = select(&[seg(0.0, 5.0, "this method works well")], 1);
        let boosted = select(&[seg(0.0, 5.0, "this secret works well")], 1);
        assert!(boosted[0].score > plain[0].score);
        assert!((boosted[0].score - plain[0].score * 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_sentiment_raises_score() {
        let neutral = select(&[seg(0.0, 5.0, "the result was fine overall")], 1);
        let positive = select(&[seg(0.0, 5.0, "the result was amazing overall")], 1);
        assert!(positive[0].score > neutral[0].score);
    }

    #[test]
    fn test_chosen_windows_are_spaced() {
        // Both segments score well and, once extended, would overlap.
        let segments = vec![
            seg(0.0, 6.0, "an amazing incredible moment revealed"),
            seg(7.0, 12.0, "another amazing incredible moment revealed"),
        ];
        let highlights = select(&segments, 2);
        assert_eq!(highlights.len(), 2);
        for pair in highlights.windows(2) {
            assert!(pair[1].start >= pair[0].end + OVERLAP_GAP_SECS - 1e-9);
            assert!(pair[1].end > pair[1].start);
        }
    }

    #[test]
    fn test_fallback_buckets_collapse_to_opening_window() {
        // Contiguous buckets merge into one window, truncated to the cap;
        // a transcript-less source yields a single clip of the opening.
        let buckets = crate::segments::fallback_buckets(60.0);
        let highlights = select(&buckets, 3);
        assert_eq!(highlights.len(), 1);
        assert!((highlights[0].start - 0.0).abs() < 1e-9);
        assert!((highlights[0].duration() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_source_fallback_still_selects() {
        let buckets = crate::segments::fallback_buckets(7.0);
        let highlights = select(&buckets, 3);
        assert_eq!(highlights.len(), 1);
        assert!(highlights[0].end > highlights[0].start);
    }

    #[test]
    fn test_deterministic() {
        let segments = vec![
            seg(0.0, 3.0, "the secret nobody tells you"),
            seg(10.0, 14.0, "a perfectly ordinary stretch"),
            seg(30.0, 42.0, "an unbelievable trick revealed"),
        ];
        let first = select(&segments, 2);
        let second = select(&segments, 2);
        assert_eq!(first, second);
    }
}
