//! Facial emotion taxonomy, emotion-to-sentiment mapping and the classifier trait

use image::DynamicImage;
use sentiscope_core::{Result, Sentiment};
use std::cmp::Ordering;

/// The seven emotion categories, in the output order of the FER model head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }

    /// Case-insensitive label lookup
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|e| e.as_str() == label)
    }

    /// Fixed emotion → sentiment table
    pub fn sentiment(&self) -> Sentiment {
        match self {
            Emotion::Happy => Sentiment::Positive,
            Emotion::Sad | Emotion::Angry | Emotion::Fear | Emotion::Disgust => {
                Sentiment::Negative
            }
            Emotion::Surprise | Emotion::Neutral => Sentiment::Neutral,
        }
    }
}

/// Map a dominant-emotion label to a sentiment; unknown or empty labels are
/// Neutral.
pub fn sentiment_for_emotion(label: &str) -> Sentiment {
    Emotion::from_label(label)
        .map(|e| e.sentiment())
        .unwrap_or(Sentiment::Neutral)
}

/// One emotion's score in percentage units (0-100)
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionScore {
    pub emotion: String,
    pub score: f64,
}

impl EmotionScore {
    pub fn new(emotion: impl Into<String>, score: f64) -> Self {
        Self {
            emotion: emotion.into(),
            score,
        }
    }
}

/// Raw classifier output: the full distribution and its argmax
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmotionAnalysis {
    /// Scores in classifier label order
    pub scores: Vec<EmotionScore>,

    /// Highest-scoring label; `None` when nothing was detected
    pub dominant_emotion: Option<String>,
}

impl EmotionAnalysis {
    /// Build from a distribution; the dominant emotion is the first maximum.
    pub fn from_scores(scores: Vec<EmotionScore>) -> Self {
        let mut dominant: Option<&EmotionScore> = None;
        for score in &scores {
            if dominant.map_or(true, |d| score.score > d.score) {
                dominant = Some(score);
            }
        }
        let dominant_emotion = dominant.map(|d| d.emotion.clone());

        Self {
            scores,
            dominant_emotion,
        }
    }

    /// Nothing detected
    pub fn empty() -> Self {
        Self::default()
    }

    /// Dominant emotion when present and non-blank
    pub fn dominant(&self) -> Option<&str> {
        self.dominant_emotion
            .as_deref()
            .filter(|label| !label.trim().is_empty())
    }

    pub fn score_of(&self, emotion: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.emotion == emotion)
            .map(|s| s.score)
    }

    /// Scores sorted by descending score; ties keep classifier order
    pub fn ranked(&self) -> Vec<&EmotionScore> {
        let mut ranked: Vec<&EmotionScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        ranked
    }
}

/// Trait for facial emotion classifiers
pub trait EmotionClassifier: Send + Sync {
    /// Classify the (best-effort) face region of a decoded image
    fn classify(&self, image: &DynamicImage) -> Result<EmotionAnalysis>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_emotions_map_per_table() {
        assert_eq!(sentiment_for_emotion("happy"), Sentiment::Positive);
        assert_eq!(sentiment_for_emotion("sad"), Sentiment::Negative);
        assert_eq!(sentiment_for_emotion("angry"), Sentiment::Negative);
        assert_eq!(sentiment_for_emotion("surprise"), Sentiment::Neutral);
        assert_eq!(sentiment_for_emotion("fear"), Sentiment::Negative);
        assert_eq!(sentiment_for_emotion("disgust"), Sentiment::Negative);
        assert_eq!(sentiment_for_emotion("neutral"), Sentiment::Neutral);
    }

    #[test]
    fn test_mapping_is_case_insensitive() {
        assert_eq!(sentiment_for_emotion("HAPPY"), Sentiment::Positive);
        assert_eq!(sentiment_for_emotion("Sad"), Sentiment::Negative);
    }

    #[test]
    fn test_unknown_emotions_default_to_neutral() {
        assert_eq!(sentiment_for_emotion("unknownxyz"), Sentiment::Neutral);
        assert_eq!(sentiment_for_emotion(""), Sentiment::Neutral);
        assert_eq!(sentiment_for_emotion("contempt"), Sentiment::Neutral);
    }

    #[test]
    fn test_dominant_is_first_maximum() {
        let analysis = EmotionAnalysis::from_scores(vec![
            EmotionScore::new("angry", 10.0),
            EmotionScore::new("happy", 45.0),
            EmotionScore::new("neutral", 45.0),
        ]);
        assert_eq!(analysis.dominant(), Some("happy"));
        assert_eq!(analysis.score_of("neutral"), Some(45.0));
    }

    #[test]
    fn test_ranked_is_descending_and_stable() {
        let analysis = EmotionAnalysis::from_scores(vec![
            EmotionScore::new("angry", 5.0),
            EmotionScore::new("sad", 30.0),
            EmotionScore::new("fear", 30.0),
            EmotionScore::new("happy", 35.0),
        ]);
        let labels: Vec<&str> = analysis.ranked().iter().map(|s| s.emotion.as_str()).collect();
        assert_eq!(labels, vec!["happy", "sad", "fear", "angry"]);
    }

    #[test]
    fn test_empty_analysis_has_no_dominant() {
        assert_eq!(EmotionAnalysis::empty().dominant(), None);
        assert_eq!(EmotionAnalysis::from_scores(vec![]).dominant(), None);
    }
}
