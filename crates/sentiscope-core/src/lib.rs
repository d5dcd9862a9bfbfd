//! SentiScope Core
//!
//! Core types and error handling shared across SentiScope components.
//!
//! This crate provides:
//! - The three-way sentiment taxonomy and per-analyzer results
//! - Response shapes for the text, image and batch paths
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    BatchRow, EmotionPrediction, ErrorBody, ImageReport, ImageSentimentResult, Sentiment,
    SentimentReport, TextSentimentResult,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ImageSentimentResult, Sentiment, TextSentimentResult};
}
