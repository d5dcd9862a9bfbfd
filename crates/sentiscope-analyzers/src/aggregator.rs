//! Analysis service: shapes scorer, classifier and color outputs into the
//! response values served over HTTP

use crate::colors::{ColorExtractor, DEFAULT_COLOR_COUNT};
use crate::config::AnalyzerConfig;
use crate::emotion::{sentiment_for_emotion, EmotionClassifier};
use crate::face_model::FaceEmotionClassifier;
use crate::normalizer::{format_batch_cell, normalize, round_to};
use crate::scorer::PolarityScorer;
use crate::suggestion::suggestion_for;
use crate::textblob::TextBlobScorer;
use crate::vader::VaderScorer;
use sentiscope_core::{
    BatchRow, EmotionPrediction, Error, ErrorBody, ImageReport, ImageSentimentResult, Result,
    Sentiment, SentimentReport,
};
use std::io::Read;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Label reported when the classifier finds no dominant emotion
pub const NOT_DETECTED: &str = "Not Detected";

/// Required column of batch CSV input
pub const TEXT_COLUMN: &str = "text";

const MAX_PREDICTIONS: usize = 3;

/// Long-lived handles to every model, shared read-only across requests
pub struct AnalysisService {
    scorers: Vec<Arc<dyn PolarityScorer>>,
    emotion: Option<Arc<dyn EmotionClassifier>>,
    colors: ColorExtractor,
    color_count: usize,
}

impl AnalysisService {
    /// Service over the given scorers, without an emotion classifier
    pub fn new(scorers: Vec<Arc<dyn PolarityScorer>>) -> Self {
        Self {
            scorers,
            emotion: None,
            colors: ColorExtractor::new(),
            color_count: DEFAULT_COLOR_COUNT,
        }
    }

    /// VADER then TextBlob over the built-in lexicons
    pub fn with_default_scorers() -> Result<Self> {
        Ok(Self::new(vec![
            Arc::new(VaderScorer::new()?),
            Arc::new(TextBlobScorer::new()?),
        ]))
    }

    /// Build every handle described by `config`.
    ///
    /// A failing emotion model only disables the image path unless it is
    /// marked as required.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let vader = match &config.vader_lexicon {
            Some(path) => VaderScorer::from_file(path)?,
            None => VaderScorer::new()?,
        };
        let textblob = match &config.textblob_lexicon {
            Some(path) => TextBlobScorer::from_file(path)?,
            None => TextBlobScorer::new()?,
        };

        let mut service = Self::new(vec![Arc::new(vader), Arc::new(textblob)])
            .with_color_count(config.color_count);

        match &config.emotion_model {
            Some(spec) => {
                match FaceEmotionClassifier::load(&spec.to_model_config(), spec.face_region) {
                    Ok(classifier) => {
                        service = service.with_emotion_classifier(Arc::new(classifier));
                    }
                    Err(e) if spec.required => return Err(e),
                    Err(e) => warn!("Emotion model failed to load, image analysis disabled: {}", e),
                }
            }
            None => info!("No emotion model configured, image analysis disabled"),
        }

        Ok(service)
    }

    pub fn with_emotion_classifier(mut self, classifier: Arc<dyn EmotionClassifier>) -> Self {
        self.emotion = Some(classifier);
        self
    }

    pub fn with_color_extractor(mut self, colors: ColorExtractor) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_color_count(mut self, count: usize) -> Self {
        self.color_count = count;
        self
    }

    pub fn has_emotion_classifier(&self) -> bool {
        self.emotion.is_some()
    }

    /// Scorer names in output order
    pub fn analyzer_names(&self) -> Vec<&str> {
        self.scorers.iter().map(|s| s.name()).collect()
    }

    /// Run every scorer over one text
    pub fn analyze_text(&self, text: &str) -> Result<SentimentReport> {
        let mut results = Vec::with_capacity(self.scorers.len());
        for scorer in &self.scorers {
            let score = scorer.score(text)?;
            results.push(normalize(scorer.name(), score));
        }
        Ok(SentimentReport::new(results))
    }

    /// One formatted batch row for one text
    pub fn batch_row(&self, text: &str) -> Result<BatchRow> {
        let report = self.analyze_text(text)?;
        Ok(report
            .results
            .iter()
            .fold(BatchRow::new(text), |row, result| {
                row.with_column(result.analyzer_name.clone(), format_batch_cell(result))
            }))
    }

    /// Analyze every row of a CSV with a `text` column, preserving row order
    pub fn analyze_csv<R: Read>(&self, reader: R) -> Result<Vec<BatchRow>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| Error::dataset(format!("Failed to read CSV header: {}", e)))?;
        let text_idx = headers
            .iter()
            .position(|h| h == TEXT_COLUMN)
            .ok_or_else(|| Error::missing_column(TEXT_COLUMN))?;

        let mut rows = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record
                .map_err(|e| Error::dataset(format!("Failed to read CSV row {}: {}", line + 1, e)))?;
            let text = record.get(text_idx).unwrap_or_default();
            rows.push(self.batch_row(text)?);
        }

        debug!(rows = rows.len(), "analyzed dataset");
        Ok(rows)
    }

    /// Full image analysis; errors are returned to the caller
    pub fn try_analyze_image(&self, bytes: &[u8]) -> Result<ImageSentimentResult> {
        let start = Instant::now();
        let classifier = self.classifier()?;
        let image = decode(bytes)?;

        let analysis = classifier.classify(&image)?;
        let colors = self.colors.extract_from_image(&image, self.color_count);

        let Some(dominant) = analysis.dominant() else {
            return Ok(ImageSentimentResult {
                emotion: NOT_DETECTED.to_string(),
                sentiment: Sentiment::Neutral,
                confidence: 0.0,
                predictions: Vec::new(),
                colors,
                suggestion: suggestion_for(Sentiment::Neutral).to_string(),
                processed_in: "N/A".to_string(),
                processing_time_seconds: start.elapsed().as_secs_f64(),
            });
        };

        let sentiment = sentiment_for_emotion(dominant);
        let confidence = round_to(analysis.score_of(dominant).unwrap_or(0.0) / 100.0, 4);

        let predictions = analysis
            .ranked()
            .into_iter()
            .take(MAX_PREDICTIONS)
            .map(|s| EmotionPrediction {
                emotion: capitalize(&s.emotion),
                confidence: round_to(s.score / 100.0, 4),
            })
            .collect();

        let elapsed = start.elapsed().as_secs_f64();
        debug!(
            classifier = classifier.name(),
            emotion = dominant,
            %sentiment,
            elapsed,
            "analyzed image"
        );

        Ok(ImageSentimentResult {
            emotion: capitalize(dominant),
            sentiment,
            confidence,
            predictions,
            colors,
            suggestion: suggestion_for(sentiment).to_string(),
            processed_in: format_seconds(elapsed),
            processing_time_seconds: elapsed,
        })
    }

    /// Image analysis with failures folded into an `{"error": ...}` value
    pub fn analyze_image(&self, bytes: &[u8]) -> ImageReport {
        match self.try_analyze_image(bytes) {
            Ok(result) => ImageReport::Analyzed(result),
            Err(e) => {
                error!("Image analysis failed: {}", e);
                ImageReport::Failed(ErrorBody::new(e.to_string()))
            }
        }
    }

    /// Raw dominant emotion label, or "Not Detected"
    pub fn detect_emotion(&self, bytes: &[u8]) -> Result<String> {
        let classifier = self.classifier()?;
        let image = decode(bytes)?;
        let analysis = classifier.classify(&image)?;

        Ok(analysis
            .dominant()
            .map(str::to_string)
            .unwrap_or_else(|| NOT_DETECTED.to_string()))
    }

    fn classifier(&self) -> Result<&Arc<dyn EmotionClassifier>> {
        self.emotion
            .as_ref()
            .ok_or_else(|| Error::model_unavailable("facial emotion model is not loaded"))
    }
}

fn decode(bytes: &[u8]) -> Result<image::DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| Error::image(format!("Failed to decode image: {}", e)))
}

/// First letter uppercase, the rest lowercase
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Seconds rounded to two decimals, always with a fractional part ("1.0s")
pub fn format_seconds(seconds: f64) -> String {
    let rounded = round_to(seconds, 2);
    if rounded.fract() == 0.0 {
        format!("{:.1}s", rounded)
    } else {
        format!("{}s", rounded)
    }
}
