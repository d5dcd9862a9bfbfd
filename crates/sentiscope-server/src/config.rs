//! Server configuration

use anyhow::Context;
use sentiscope_analyzers::{AnalyzerConfig, EmotionModelSpec, ModelSourceSpec};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory uploaded images are written to
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Allowed CORS origins; any origin when empty
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Analyzer and model configuration
    #[serde(default)]
    pub analyzers: AnalyzerConfig,
}

/// Values taken from the command line, applied over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen: Option<String>,
    pub port: Option<u16>,
    pub upload_dir: Option<PathBuf>,
    pub model: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: impl AsRef<Path>, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();

        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)?
        } else {
            Self::default()
        };

        config.apply(overrides);
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply CLI overrides
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(listen) = &overrides.listen {
            self.listen = listen.clone();
        }

        if let Some(port) = overrides.port {
            self.port = port;
        }

        if let Some(upload_dir) = &overrides.upload_dir {
            self.upload_dir = upload_dir.clone();
        }

        if let Some(model) = &overrides.model {
            let source = ModelSourceSpec::Local { path: model.clone() };
            match &mut self.analyzers.emotion_model {
                Some(spec) => spec.source = source,
                None => self.analyzers.emotion_model = Some(EmotionModelSpec::local(model.clone())),
            }
        }
    }

    /// Socket address from `listen` and `port`; IPv6 listen values such as
    /// `::` are accepted without brackets
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .listen
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .with_context(|| format!("Invalid listen address: {}", self.listen))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_origins: Vec::new(),
            analyzers: AnalyzerConfig::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}
