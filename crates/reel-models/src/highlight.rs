//! Selected highlight windows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A finalized candidate clip window produced by the highlight selector.
///
/// The selector guarantees `end > start` and bounds the duration; a chosen
/// set of highlights is ordered by start time with a minimum gap between
/// neighbors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Highlight {
    /// Start offset in seconds.
    pub start: f64,
    /// End offset in seconds.
    pub end: f64,
    /// Text of the merged segments backing this window.
    pub text: String,
    /// Selector score; higher ranks earlier.
    pub score: f64,
}

impl Highlight {
    pub fn new(start: f64, end: f64, text: impl Into<String>, score: f64) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            score,
        }
    }

    /// Window length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_duration() {
        let h = Highlight::new(12.0, 20.0, "big moment", 3.4);
        assert!((h.duration() - 8.0).abs() < 1e-9);
    }
}
