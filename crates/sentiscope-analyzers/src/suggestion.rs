//! Posting advice derived from an image's sentiment

use sentiscope_core::Sentiment;

pub const POSITIVE_SUGGESTION: &str = "Looks cheerful! You can go ahead and post it.";
pub const NEUTRAL_SUGGESTION: &str = "Seems okay. You may post it if it fits your context.";
pub const NEGATIVE_SUGGESTION: &str =
    "The image seems to express negative emotions. Posting is not recommended.";
pub const FALLBACK_SUGGESTION: &str = "No suggestion provided";

pub fn suggestion_for(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => POSITIVE_SUGGESTION,
        Sentiment::Neutral => NEUTRAL_SUGGESTION,
        Sentiment::Negative => NEGATIVE_SUGGESTION,
    }
}

/// Lookup by label; labels outside the taxonomy get the fallback text
pub fn suggestion_for_label(label: &str) -> &'static str {
    match label {
        "Positive" => POSITIVE_SUGGESTION,
        "Neutral" => NEUTRAL_SUGGESTION,
        "Negative" => NEGATIVE_SUGGESTION,
        _ => FALLBACK_SUGGESTION,
    }
}
