//! SentiScope Analyzers
//!
//! Everything that turns raw input into sentiment:
//! - Lexicon scorers for text (VADER-style valence, TextBlob-style polarity)
//! - A Candle CNN for facial emotion, mapped onto the same sentiment labels
//! - Median-cut dominant color extraction
//! - The [`AnalysisService`] that shapes all of the above into response values
//!
//! Every handle is built once at startup and shared read-only across requests.

pub mod aggregator;
pub mod colors;
pub mod config;
pub mod emotion;
pub mod face_model;
pub mod lexicon;
pub mod model_loader;
pub mod normalizer;
pub mod scorer;
pub mod suggestion;
pub mod textblob;
pub mod vader;

pub use aggregator::{AnalysisService, NOT_DETECTED, TEXT_COLUMN};
pub use colors::{ColorExtractor, DEFAULT_COLOR_COUNT};
pub use config::{AnalyzerConfig, DeviceSpec, EmotionModelSpec, ModelFormatSpec, ModelSourceSpec};
pub use emotion::{
    sentiment_for_emotion, Emotion, EmotionAnalysis, EmotionClassifier, EmotionScore,
};
pub use face_model::{FaceEmotionClassifier, FaceRegion};
pub use model_loader::{DeviceType, LoadedWeights, ModelConfig, ModelFormat, ModelSource};
pub use normalizer::{format_batch_cell, label_for, normalize};
pub use scorer::PolarityScorer;
pub use suggestion::{suggestion_for, suggestion_for_label};
pub use textblob::TextBlobScorer;
pub use vader::VaderScorer;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aggregator::AnalysisService;
    pub use crate::emotion::{EmotionAnalysis, EmotionClassifier, EmotionScore};
    pub use crate::face_model::FaceEmotionClassifier;
    pub use crate::scorer::PolarityScorer;
    pub use crate::textblob::TextBlobScorer;
    pub use crate::vader::VaderScorer;
}
