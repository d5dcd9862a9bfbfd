//! Averaging polarity scorer in the style of TextBlob's pattern analyzer
//!
//! Every lexicon word found in the text becomes one assessment. Modifiers
//! ("very", "slightly") scale the next assessment, and a negation multiplies
//! it by -0.5 unless an unknown word of two or more characters comes between
//! them. An exclamation mark boosts the most recent assessment once by 25%.
//! Polarity is the mean of all assessments.

use crate::lexicon::PolarityLexicon;
use crate::scorer::PolarityScorer;
use sentiscope_core::Result;
use std::path::Path;
use tracing::debug;

const NEGATION_SCALAR: f64 = -0.5;
const EXCLAMATION_BOOST: f64 = 1.25;

const NEGATIONS: &[&str] = &["not", "never", "no", "n't", "don't", "didn't", "isn't", "wasn't", "can't", "won't"];

/// Polarity and subjectivity of one text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarityAssessment {
    /// Mean polarity in [-1, 1]
    pub polarity: f64,

    /// Mean subjectivity in [0, 1]
    pub subjectivity: f64,
}

struct Assessment {
    polarity: f64,
    subjectivity: f64,
    boosted: bool,
}

/// TextBlob-equivalent polarity scorer
pub struct TextBlobScorer {
    name: String,
    lexicon: PolarityLexicon,
}

impl TextBlobScorer {
    pub fn new() -> Result<Self> {
        Ok(Self::with_lexicon(PolarityLexicon::embedded()?))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_lexicon(PolarityLexicon::from_file(path)?))
    }

    pub fn with_lexicon(lexicon: PolarityLexicon) -> Self {
        Self {
            name: "TextBlob".to_string(),
            lexicon,
        }
    }

    pub fn assess(&self, text: &str) -> PolarityAssessment {
        let mut assessments: Vec<Assessment> = Vec::new();
        let mut modifier: Option<f64> = None;
        let mut negated = false;

        for token in self.tokenize(text) {
            if token == "!" {
                if let Some(last) = assessments.last_mut().filter(|a| !a.boosted) {
                    last.polarity = (last.polarity * EXCLAMATION_BOOST).clamp(-1.0, 1.0);
                    last.boosted = true;
                }
                continue;
            }

            if NEGATIONS.contains(&token.as_str()) {
                negated = true;
                continue;
            }

            match self.lexicon.get(&token) {
                Some(entry) if entry.is_modifier() => {
                    modifier = Some(modifier.unwrap_or(1.0) * entry.intensity);
                }
                Some(entry) => {
                    let mut polarity = entry.polarity * modifier.take().unwrap_or(1.0);
                    if negated {
                        polarity *= NEGATION_SCALAR;
                        negated = false;
                    }
                    assessments.push(Assessment {
                        polarity,
                        subjectivity: entry.subjectivity,
                        boosted: false,
                    });
                }
                None => {
                    modifier = None;
                    // Negation only carries across one-character tokens
                    if token.chars().count() > 1 {
                        negated = false;
                    }
                }
            }
        }

        if assessments.is_empty() {
            return PolarityAssessment::default();
        }

        let n = assessments.len() as f64;
        let polarity = assessments.iter().map(|a| a.polarity).sum::<f64>() / n;
        let subjectivity = assessments.iter().map(|a| a.subjectivity).sum::<f64>() / n;

        PolarityAssessment {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        }
    }

    /// Lowercased word tokens plus standalone `!`; whitespace-separated chunks
    /// that are lexicon entries themselves (emoticons) are kept whole.
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for chunk in text.split_whitespace() {
            if !chunk.chars().any(char::is_alphanumeric) && self.lexicon.get(chunk).is_some() {
                tokens.push(chunk.to_string());
                continue;
            }

            let mut current = String::new();
            for c in chunk.chars() {
                if c.is_alphanumeric() || c == '\'' {
                    current.extend(c.to_lowercase());
                    continue;
                }
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                if c == '!' {
                    tokens.push("!".to_string());
                }
            }
            if !current.is_empty() {
                tokens.push(current);
            }
        }

        tokens
    }
}

impl PolarityScorer for TextBlobScorer {
    fn score(&self, text: &str) -> Result<f64> {
        let assessment = self.assess(text);
        debug!(
            analyzer = %self.name,
            polarity = assessment.polarity,
            subjectivity = assessment.subjectivity,
            "scored text"
        );
        Ok(assessment.polarity)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
