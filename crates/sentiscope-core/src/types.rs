//! Core types for SentiScope

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Three-way sentiment taxonomy shared by text and image analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized output of one text analyzer for one input
#[derive(Debug, Clone, PartialEq)]
pub struct TextSentimentResult {
    /// Analyzer display name ("VADER", "TextBlob")
    pub analyzer_name: String,

    /// Normalized label
    pub label: Sentiment,

    /// Absolute score rounded to two decimals (0.0-1.0)
    pub confidence: f64,
}

impl TextSentimentResult {
    pub fn new(analyzer_name: impl Into<String>, label: Sentiment, confidence: f64) -> Self {
        Self {
            analyzer_name: analyzer_name.into(),
            label,
            confidence,
        }
    }
}

/// Per-analyzer results for a single text, keyed by analyzer name.
///
/// Serializes as `{"VADER": {"sentiment": ..., "confidence": ...}, ...}` in
/// analyzer order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentReport {
    pub results: Vec<TextSentimentResult>,
}

impl SentimentReport {
    pub fn new(results: Vec<TextSentimentResult>) -> Self {
        Self { results }
    }

    /// Look up one analyzer's result by name
    pub fn get(&self, analyzer_name: &str) -> Option<&TextSentimentResult> {
        self.results
            .iter()
            .find(|r| r.analyzer_name == analyzer_name)
    }
}

#[derive(Serialize)]
struct SentimentEntry {
    sentiment: Sentiment,
    confidence: f64,
}

impl Serialize for SentimentReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.results.len()))?;
        for result in &self.results {
            map.serialize_entry(
                &result.analyzer_name,
                &SentimentEntry {
                    sentiment: result.label,
                    confidence: result.confidence,
                },
            )?;
        }
        map.end()
    }
}

/// One entry of the top-N emotion predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPrediction {
    /// Capitalized emotion label
    pub emotion: String,

    /// Probability scaled to 0.0-1.0, rounded to four decimals
    pub confidence: f64,
}

/// Aggregated analysis of a single image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSentimentResult {
    /// Capitalized dominant emotion, or "Not Detected"
    pub emotion: String,

    pub sentiment: Sentiment,

    /// Dominant emotion probability (0.0-1.0)
    pub confidence: f64,

    /// At most three predictions, highest confidence first
    pub predictions: Vec<EmotionPrediction>,

    /// At most three `#rrggbb` colors, most dominant first
    pub colors: Vec<String>,

    pub suggestion: String,

    /// Rendered processing time ("0.42s"), or "N/A" when no emotion was found
    pub processed_in: String,

    /// Wall-clock processing time in seconds
    pub processing_time_seconds: f64,
}

/// `{"error": message}` body shared by every failing response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Outcome of the image path: either a result or an error-shaped body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImageReport {
    Analyzed(ImageSentimentResult),
    Failed(ErrorBody),
}

impl ImageReport {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// One formatted output row of the batch path.
///
/// Serializes as `{"Text": ..., "VADER Sentiment": ..., "TextBlob Sentiment": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub text: String,

    /// `(analyzer name, "{label} ({confidence}%)")` pairs in analyzer order
    pub columns: Vec<(String, String)>,
}

impl BatchRow {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, analyzer_name: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.push((analyzer_name.into(), value.into()));
        self
    }

    /// Formatted value for one analyzer
    pub fn column(&self, analyzer_name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == analyzer_name)
            .map(|(_, value)| value.as_str())
    }
}

impl Serialize for BatchRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 1))?;
        map.serialize_entry("Text", &self.text)?;
        for (name, value) in &self.columns {
            map.serialize_entry(&format!("{name} Sentiment"), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_row_serialization_order() {
        let row = BatchRow::new("I love this!")
            .with_column("VADER", "Positive (67.0%)")
            .with_column("TextBlob", "Positive (62.0%)");

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"Text":"I love this!","VADER Sentiment":"Positive (67.0%)","TextBlob Sentiment":"Positive (62.0%)"}"#
        );
        assert_eq!(row.column("TextBlob"), Some("Positive (62.0%)"));
    }

    #[test]
    fn test_sentiment_report_serialization() {
        let report = SentimentReport::new(vec![
            TextSentimentResult::new("VADER", Sentiment::Negative, 0.54),
            TextSentimentResult::new("TextBlob", Sentiment::Neutral, 0.0),
        ]);

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"VADER":{"sentiment":"Negative","confidence":0.54},"TextBlob":{"sentiment":"Neutral","confidence":0.0}}"#
        );
        assert_eq!(report.get("VADER").unwrap().label, Sentiment::Negative);
    }

    #[test]
    fn test_failed_image_report_is_error_shaped() {
        let report = ImageReport::Failed(ErrorBody::new("decode failed"));
        assert!(report.is_error());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({ "error": "decode failed" })
        );
    }
}
