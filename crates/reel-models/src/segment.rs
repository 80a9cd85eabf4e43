//! Timed transcript segments.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A contiguous span of transcript text, or a synthetic time bucket when the
/// source has no transcript.
///
/// Segments are ephemeral: they are constructed per pipeline run and flow
/// through highlight selection, never into the project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Start offset in seconds from the beginning of the source.
    pub start: f64,
    /// End offset in seconds; always greater than `start`.
    pub end: f64,
    /// Spoken text within the span. Synthetic buckets carry a single space
    /// so downstream scoring never sees an empty value.
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Span length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
