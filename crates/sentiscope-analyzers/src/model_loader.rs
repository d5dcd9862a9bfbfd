//! Weight loading for Candle-based models

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::{api::sync::Api, Repo, RepoType};
use sentiscope_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for loading model weights
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Source of the model
    pub source: ModelSource,

    /// Device to run inference on
    pub device: DeviceType,

    /// Model format (SafeTensors, PyTorch)
    pub format: ModelFormat,
}

/// Source location for model weights
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    /// Load from local file system
    LocalPath(PathBuf),

    /// Download from Hugging Face Hub
    HuggingFace {
        repo_id: String,
        revision: Option<String>,
        filename: String,
    },
}

/// Device type for inference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// CPU inference (always available)
    Cpu,
    /// CUDA GPU inference (if available)
    Cuda(usize),
    /// Metal (Apple Silicon)
    Metal(usize),
}

/// Model file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// SafeTensors format (recommended)
    SafeTensors,
    /// PyTorch format
    PyTorch,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            source: ModelSource::LocalPath(PathBuf::new()),
            device: DeviceType::Cpu,
            format: ModelFormat::SafeTensors,
        }
    }
}

impl ModelConfig {
    /// Create a new model configuration from local path
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("pt") | Some("pth") | Some("bin") => ModelFormat::PyTorch,
            _ => ModelFormat::SafeTensors,
        };
        Self {
            source: ModelSource::LocalPath(path),
            format,
            ..Default::default()
        }
    }

    /// Create a new model configuration from Hugging Face
    pub fn from_hf(repo_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            source: ModelSource::HuggingFace {
                repo_id: repo_id.into(),
                revision: None,
                filename: filename.into(),
            },
            ..Default::default()
        }
    }

    /// Set device
    pub fn with_device(mut self, device: DeviceType) -> Self {
        self.device = device;
        self
    }

    /// Set model format
    pub fn with_format(mut self, format: ModelFormat) -> Self {
        self.format = format;
        self
    }

    /// Set Hugging Face revision
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        if let ModelSource::HuggingFace {
            repo_id, filename, ..
        } = self.source
        {
            self.source = ModelSource::HuggingFace {
                repo_id,
                revision: Some(revision.into()),
                filename,
            };
        }
        self
    }
}

/// Weights mapped onto a device, ready for building layers
pub struct LoadedWeights {
    var_builder: VarBuilder<'static>,
    device: Device,
    weights_path: PathBuf,
}

impl LoadedWeights {
    /// Resolve, map and wrap the weights described by `config`
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let weights_path = resolve_model_path(config)?;
        let device = create_device(config.device)?;

        let var_builder = match config.format {
            ModelFormat::SafeTensors => unsafe {
                VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, &device)
                    .map_err(|e| Error::classifier(format!("Failed to load SafeTensors: {}", e)))?
            },
            ModelFormat::PyTorch => VarBuilder::from_pth(&weights_path, DType::F32, &device)
                .map_err(|e| Error::classifier(format!("Failed to load PyTorch weights: {}", e)))?,
        };

        info!("Loaded weights from {}", weights_path.display());

        Ok(Self {
            var_builder,
            device,
            weights_path,
        })
    }

    pub fn var_builder(&self) -> &VarBuilder<'static> {
        &self.var_builder
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn weights_path(&self) -> &Path {
        &self.weights_path
    }
}

/// Resolve model path from source, downloading from the Hub when needed
pub fn resolve_model_path(config: &ModelConfig) -> Result<PathBuf> {
    match &config.source {
        ModelSource::LocalPath(path) => {
            if !path.exists() {
                return Err(Error::config(format!("Model file not found: {:?}", path)));
            }
            Ok(path.clone())
        }
        ModelSource::HuggingFace {
            repo_id,
            revision,
            filename,
        } => {
            let api = Api::new()
                .map_err(|e| Error::config(format!("Failed to initialize HF API: {}", e)))?;

            let repo = api.repo(Repo::with_revision(
                repo_id.clone(),
                RepoType::Model,
                revision.clone().unwrap_or_else(|| "main".to_string()),
            ));

            info!("Fetching {} from Hugging Face repo {}", filename, repo_id);
            repo.get(filename)
                .map_err(|e| Error::config(format!("Failed to download model from HF: {}", e)))
        }
    }
}

/// Create Candle device from device type
pub fn create_device(device_type: DeviceType) -> Result<Device> {
    match device_type {
        DeviceType::Cpu => Ok(Device::Cpu),
        DeviceType::Cuda(idx) => Device::new_cuda(idx)
            .map_err(|e| Error::classifier(format!("Failed to create CUDA device: {}", e))),
        DeviceType::Metal(idx) => Device::new_metal(idx)
            .map_err(|e| Error::classifier(format!("Failed to create Metal device: {}", e))),
    }
}
