//! Shared application state

use crate::config::ServerConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use sentiscope_analyzers::AnalysisService;
use std::sync::Arc;

/// State cloned into every handler
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Scorers, emotion classifier and color extractor built at startup
    pub service: Arc<AnalysisService>,

    /// Prometheus metrics handle for rendering; absent when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        service: AnalysisService,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
            metrics_handle,
        }
    }
}
