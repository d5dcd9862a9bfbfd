//! Polarity scorer trait

use sentiscope_core::Result;

/// Trait for all text polarity scorers.
///
/// Implementations hold only read-only lexicon state so one instance can be
/// shared across concurrent requests.
pub trait PolarityScorer: Send + Sync {
    /// Score the given text, returning a signed polarity in [-1, 1]
    fn score(&self, text: &str) -> Result<f64>;

    /// Get the analyzer display name
    fn name(&self) -> &str;
}
