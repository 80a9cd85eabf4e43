//! Lexicon-based sentiment polarity.
//!
//! A deliberately small word-list scorer: highlight selection only needs a
//! rough emotional signal, not NLP. Keyword hits are counted over lowercase
//! word tokens and normalized into `[-1, 1]`.

/// Positive lexicon, alphabetical so it can be binary searched.
const POSITIVE: &[&str] = &[
    "amazing",
    "awesome",
    "beautiful",
    "best",
    "brilliant",
    "crazy",
    "epic",
    "excellent",
    "exciting",
    "fantastic",
    "favorite",
    "fun",
    "genius",
    "great",
    "happy",
    "hilarious",
    "incredible",
    "insane",
    "love",
    "loved",
    "perfect",
    "powerful",
    "stunning",
    "success",
    "unbelievable",
    "win",
    "winner",
    "wonderful",
    "wow",
];

/// Negative lexicon, alphabetical so it can be binary searched.
const NEGATIVE: &[&str] = &[
    "angry",
    "annoying",
    "awful",
    "bad",
    "boring",
    "broken",
    "disappointing",
    "disaster",
    "dumb",
    "fail",
    "failed",
    "failure",
    "fake",
    "garbage",
    "hate",
    "hated",
    "horrible",
    "lame",
    "lose",
    "loser",
    "mess",
    "painful",
    "pointless",
    "sad",
    "scam",
    "stupid",
    "terrible",
    "ugly",
    "useless",
    "waste",
    "worst",
    "wrong",
];

/// Polarity of `text` in `[-1, 1]`; 0 when no lexicon word appears.
pub fn polarity(text: &str) -> f64 {
    let mut positive = 0usize;
    let mut negative = 0usize;

    for token in text.split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() {
            continue;
        }
        let word = token.to_lowercase();
        if POSITIVE.binary_search(&word.as_str()).is_ok() {
            positive += 1;
        } else if NEGATIVE.binary_search(&word.as_str()).is_ok() {
            negative += 1;
        }
    }

    let total = positive + negative;
    if total == 0 {
        return 0.0;
    }
    (positive as f64 - negative as f64) / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicons_are_sorted() {
        assert!(POSITIVE.windows(2).all(|w| w[0] < w[1]));
        assert!(NEGATIVE.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_positive_text() {
        assert!((polarity("this is amazing and incredible") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_text() {
        assert!((polarity("what a terrible boring mess") + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_text_balances_out() {
        assert!(polarity("great idea but terrible execution").abs() < 1e-9);
    }

    #[test]
    fn test_neutral_text_is_zero() {
        assert_eq!(polarity("the quick brown fox jumps"), 0.0);
        assert_eq!(polarity(""), 0.0);
        assert_eq!(polarity("   "), 0.0);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        assert!((polarity("AMAZING! Absolutely amazing.") - 1.0).abs() < 1e-9);
    }
}
