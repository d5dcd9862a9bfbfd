//! Configuration for analyzers and emotion model loading

use crate::colors::DEFAULT_COLOR_COUNT;
use crate::face_model::FaceRegion;
use crate::model_loader::{DeviceType, ModelConfig, ModelFormat, ModelSource};
use sentiscope_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the analysis service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Valence lexicon for VADER (`vader_lexicon.txt` layout); built-in when unset
    #[serde(default)]
    pub vader_lexicon: Option<PathBuf>,

    /// Polarity lexicon for TextBlob; built-in when unset
    #[serde(default)]
    pub textblob_lexicon: Option<PathBuf>,

    /// Facial emotion model; image routes report an error when unset
    #[serde(default)]
    pub emotion_model: Option<EmotionModelSpec>,

    /// Number of dominant colors reported per image
    #[serde(default = "default_color_count")]
    pub color_count: usize,
}

/// Emotion model specification (for YAML/config files)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionModelSpec {
    /// Model source specification
    #[serde(flatten)]
    pub source: ModelSourceSpec,

    /// Device to run inference on
    #[serde(default)]
    pub device: DeviceSpec,

    /// Model format
    #[serde(default)]
    pub format: ModelFormatSpec,

    /// Part of the frame treated as the face
    #[serde(default)]
    pub face_region: FaceRegion,

    /// Fail startup instead of continuing without image analysis
    #[serde(default)]
    pub required: bool,
}

/// Model source specification (for config files)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSourceSpec {
    /// Local file path
    Local { path: PathBuf },

    /// Hugging Face Hub
    HuggingFace {
        repo_id: String,
        filename: String,
        revision: Option<String>,
    },
}

/// Device specification (for config files)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    #[default]
    Cpu,
    Cuda { index: Option<usize> },
    Metal { index: Option<usize> },
}

/// Model format specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormatSpec {
    #[default]
    SafeTensors,
    PyTorch,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            vader_lexicon: None,
            textblob_lexicon: None,
            emotion_model: None,
            color_count: DEFAULT_COLOR_COUNT,
        }
    }
}

impl AnalyzerConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Invalid analyzer config: {}", e)))
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }
}

impl EmotionModelSpec {
    /// Local weights on CPU
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ModelSourceSpec::Local { path: path.into() },
            device: DeviceSpec::Cpu,
            format: ModelFormatSpec::SafeTensors,
            face_region: FaceRegion::Full,
            required: false,
        }
    }

    /// Convert to ModelConfig for loading
    pub fn to_model_config(&self) -> ModelConfig {
        let source = match &self.source {
            ModelSourceSpec::Local { path } => ModelSource::LocalPath(path.clone()),
            ModelSourceSpec::HuggingFace {
                repo_id,
                filename,
                revision,
            } => ModelSource::HuggingFace {
                repo_id: repo_id.clone(),
                revision: revision.clone(),
                filename: filename.clone(),
            },
        };

        let format = match self.format {
            ModelFormatSpec::SafeTensors => ModelFormat::SafeTensors,
            ModelFormatSpec::PyTorch => ModelFormat::PyTorch,
        };

        ModelConfig {
            source,
            device: self.device.to_device_type(),
            format,
        }
    }
}

impl DeviceSpec {
    /// Convert to DeviceType
    pub fn to_device_type(&self) -> DeviceType {
        match self {
            DeviceSpec::Cpu => DeviceType::Cpu,
            DeviceSpec::Cuda { index } => DeviceType::Cuda(index.unwrap_or(0)),
            DeviceSpec::Metal { index } => DeviceType::Metal(index.unwrap_or(0)),
        }
    }
}

fn default_color_count() -> usize {
    DEFAULT_COLOR_COUNT
}
