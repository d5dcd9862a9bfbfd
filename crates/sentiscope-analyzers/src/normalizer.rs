//! Score-to-label normalization shared by every text scorer

use sentiscope_core::{Sentiment, TextSentimentResult};

/// Scores strictly above this are Positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Scores strictly below this are Negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Map a signed score to a label; the dead zone `[-0.05, 0.05]` is Neutral.
pub fn label_for(score: f64) -> Sentiment {
    if score > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Confidence is the score magnitude rounded to two decimals
pub fn confidence_for(score: f64) -> f64 {
    round_to(score.abs(), 2)
}

/// Normalize one scorer's raw output
pub fn normalize(analyzer_name: &str, score: f64) -> TextSentimentResult {
    TextSentimentResult::new(analyzer_name, label_for(score), confidence_for(score))
}

/// Render a result for batch output, e.g. `Positive (67.0%)`
pub fn format_batch_cell(result: &TextSentimentResult) -> String {
    format!("{} ({:.1}%)", result.label, result.confidence * 100.0)
}

/// Round the exact binary value, ties to even, so `0.625` becomes `0.62`
pub(crate) fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}
