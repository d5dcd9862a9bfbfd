//! SentiScope Server
//!
//! Serves lexicon-based text sentiment, facial-emotion image sentiment and
//! CSV batch analysis over HTTP.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use sentiscope_analyzers::AnalysisService;
use sentiscope_server::{create_router, AppState, ConfigOverrides, ServerConfig};
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "sentiscope-server")]
#[command(about = "SentiScope text and image sentiment analysis server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SENTISCOPE_CONFIG", default_value = "sentiscope.yaml")]
    config: PathBuf,

    /// Listen address
    #[arg(short = 'l', long, env = "SENTISCOPE_LISTEN")]
    listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "SENTISCOPE_PORT")]
    port: Option<u16>,

    /// Directory uploaded images are written to
    #[arg(short, long, env = "SENTISCOPE_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Facial emotion model weights (SafeTensors)
    #[arg(short, long, env = "SENTISCOPE_MODEL")]
    model: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen: self.listen.clone(),
            port: self.port,
            upload_dir: self.upload_dir.clone(),
            model: self.model.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting SentiScope server");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli.overrides())?;
    info!("Configuration loaded successfully");
    info!("Upload directory: {}", config.upload_dir.display());

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Lexicons and model weights are loaded once, off the async reactor
    info!("Loading analyzers...");
    let analyzer_config = config.analyzers.clone();
    let service =
        tokio::task::spawn_blocking(move || AnalysisService::from_config(&analyzer_config))
            .await??;
    info!(
        analyzers = ?service.analyzer_names(),
        emotion_model = service.has_emotion_classifier(),
        "Analyzers ready"
    );

    let addr = config.bind_addr()?;
    let state = AppState::new(config, service, Some(metrics_handle));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    // Graceful shutdown handler
    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sentiscope=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sentiscope=info,tower_http=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "sentiscope_requests_total",
        "Total number of requests processed by route"
    );
    metrics::describe_counter!("sentiscope_errors_total", "Total number of errors by kind");
    metrics::describe_histogram!(
        "sentiscope_analysis_latency_us",
        metrics::Unit::Microseconds,
        "Analysis latency in microseconds by path"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
