//! Word-level sentiment lexicons
//!
//! Two tab-separated formats are supported:
//! - valence lexicons (`token<TAB>mean[<TAB>...]`), the layout of VADER's
//!   `vader_lexicon.txt`; extra columns are ignored
//! - polarity lexicons (`token<TAB>polarity<TAB>subjectivity<TAB>intensity`)
//!
//! Built-in lexicons covering common English sentiment vocabulary are
//! embedded in the crate; the complete upstream files can be loaded from disk
//! through the analyzer configuration.

use sentiscope_core::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// Built-in valence lexicon
pub const EMBEDDED_VALENCE_LEXICON: &str = include_str!("../data/vader_lexicon.txt");

/// Built-in polarity lexicon
pub const EMBEDDED_POLARITY_LEXICON: &str = include_str!("../data/textblob_lexicon.tsv");

/// Token → mean valence (roughly -4.0 to 4.0)
#[derive(Debug, Clone, Default)]
pub struct ValenceLexicon {
    entries: HashMap<String, f64>,
}

impl ValenceLexicon {
    /// Parse the built-in lexicon
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_VALENCE_LEXICON)
    }

    /// Load a lexicon file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_lexicon(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse lexicon text
    pub fn parse(source: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for (idx, line) in source.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default();
            let valence = parse_field(fields.next(), idx, "valence")?;
            entries.insert(token.to_string(), valence);
        }

        if entries.is_empty() {
            return Err(Error::analyzer("valence lexicon is empty"));
        }

        Ok(Self { entries })
    }

    /// Look up a token; lowercase form first, then the token as written
    pub fn get(&self, token: &str) -> Option<f64> {
        self.entries
            .get(&token.to_lowercase())
            .or_else(|| self.entries.get(token))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One polarity lexicon row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarityEntry {
    /// -1.0 (negative) to 1.0 (positive)
    pub polarity: f64,

    /// 0.0 (objective) to 1.0 (subjective)
    pub subjectivity: f64,

    /// Multiplier applied to the following word when this is a modifier
    pub intensity: f64,
}

impl PolarityEntry {
    /// Modifiers ("very", "slightly") carry no polarity of their own and only
    /// scale the next assessed word.
    pub fn is_modifier(&self) -> bool {
        self.polarity == 0.0 && (self.intensity - 1.0).abs() > f64::EPSILON
    }
}

/// Token → polarity/subjectivity/intensity
#[derive(Debug, Clone, Default)]
pub struct PolarityLexicon {
    entries: HashMap<String, PolarityEntry>,
}

impl PolarityLexicon {
    /// Parse the built-in lexicon
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_POLARITY_LEXICON)
    }

    /// Load a lexicon file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_lexicon(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse lexicon text
    pub fn parse(source: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for (idx, line) in source.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default().to_lowercase();
            let polarity = parse_field(fields.next(), idx, "polarity")?;
            let subjectivity = parse_field(fields.next(), idx, "subjectivity")?;
            let intensity = parse_field(fields.next(), idx, "intensity")?;

            entries.insert(
                token,
                PolarityEntry {
                    polarity: polarity.clamp(-1.0, 1.0),
                    subjectivity: subjectivity.clamp(0.0, 1.0),
                    intensity,
                },
            );
        }

        if entries.is_empty() {
            return Err(Error::analyzer("polarity lexicon is empty"));
        }

        Ok(Self { entries })
    }

    pub fn get(&self, token: &str) -> Option<&PolarityEntry> {
        self.entries.get(&token.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_lexicon(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read lexicon {}: {}", path.display(), e))
    })
}

fn parse_field(field: Option<&str>, idx: usize, what: &str) -> Result<f64> {
    let raw = field
        .ok_or_else(|| Error::analyzer(format!("lexicon line {}: missing {}", idx + 1, what)))?;

    raw.trim().parse::<f64>().map_err(|e| {
        Error::analyzer(format!(
            "lexicon line {}: invalid {} '{}': {}",
            idx + 1,
            what,
            raw,
            e
        ))
    })
}
