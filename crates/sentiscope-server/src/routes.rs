//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        DefaultBodyLimit, Multipart, State,
    },
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use sentiscope_core::{BatchRow, ErrorBody, ImageReport, SentimentReport};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;
use crate::uploads;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/analyze", post(analyze))
        .route("/analyze-text", post(analyze_text))
        .route("/analyze-image", post(analyze_image))
        .route("/start-detecting", post(start_detecting))
        .route("/analyze_dataset", post(analyze_dataset))
        .fallback(fallback)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

async fn index() -> &'static str {
    "Server is running!"
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    emotion_model: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        emotion_model: state.service.has_emotion_classifier(),
    })
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct TextRequest {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    sentiments: SentimentReport,
}

#[derive(Debug, Deserialize)]
struct DetectRequest {
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Serialize)]
struct DetectResponse {
    emotion: String,
}

/// Side-by-side analyzer results for one text
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    count_request("/analyze");
    let text = required_text(payload)?;

    let service = state.service.clone();
    let start = Instant::now();
    let sentiments = run_blocking(move || service.analyze_text(&text)).await?;
    record_latency("text", start);

    Ok(Json(AnalyzeResponse { sentiments }))
}

/// One text rendered as a single batch row
async fn analyze_text(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<Vec<BatchRow>>, AppError> {
    count_request("/analyze-text");
    let text = required_text(payload)?;

    let service = state.service.clone();
    let start = Instant::now();
    let row = run_blocking(move || service.batch_row(&text)).await?;
    record_latency("text", start);

    Ok(Json(vec![row]))
}

/// Full image analysis; analysis failures are reported in the body with 200
async fn analyze_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImageReport>, AppError> {
    count_request("/analyze-image");

    let upload = match multipart {
        Ok(multipart) => take_file(multipart, "image").await?,
        Err(_) => None,
    };
    let upload = upload.ok_or_else(|| AppError::invalid("No image provided"))?;

    let file_name = upload.file_name.unwrap_or_default();
    uploads::save_upload(&state.config.upload_dir, &file_name, &upload.bytes).await?;

    let service = state.service.clone();
    let bytes = upload.bytes;
    let start = Instant::now();
    let report = tokio::task::spawn_blocking(move || service.analyze_image(&bytes)).await?;
    record_latency("image", start);

    if report.is_error() {
        metrics::counter!("sentiscope_errors_total", "kind" => "image").increment(1);
    }
    Ok(Json(report))
}

/// Dominant emotion of a base64 data-URL frame
async fn start_detecting(
    State(state): State<AppState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<DetectResponse>, AppError> {
    count_request("/start-detecting");

    let data_url = payload
        .ok()
        .and_then(|Json(req)| req.image)
        .filter(|image| !image.trim().is_empty())
        .ok_or_else(|| AppError::invalid("No image provided"))?;

    // "data:image/jpeg;base64,<payload>"
    let encoded = data_url
        .split_once(',')
        .map_or(data_url.as_str(), |(_, data)| data);
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::internal(format!("Invalid base64 image: {}", e)))?;

    let service = state.service.clone();
    let start = Instant::now();
    let emotion = run_blocking(move || service.detect_emotion(&bytes)).await?;
    record_latency("emotion", start);

    debug!(%emotion, "detected emotion");
    Ok(Json(DetectResponse { emotion }))
}

/// Batch analysis of an uploaded CSV with a `text` column
async fn analyze_dataset(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<BatchRow>>, AppError> {
    count_request("/analyze_dataset");

    let multipart = multipart.map_err(|_| AppError::invalid("No file part"))?;
    let upload = take_file(multipart, "file")
        .await?
        .ok_or_else(|| AppError::invalid("No file part"))?;

    match upload.file_name.as_deref() {
        None => return Err(AppError::invalid("No file part")),
        Some(name) if name.is_empty() => return Err(AppError::invalid("No selected file")),
        Some(_) => {}
    }

    let service = state.service.clone();
    let bytes = upload.bytes;
    let start = Instant::now();
    let rows = run_blocking(move || service.analyze_csv(bytes.as_ref())).await?;
    record_latency("dataset", start);

    Ok(Json(rows))
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found")))
}

/// One uploaded multipart file
struct Upload {
    file_name: Option<String>,
    bytes: Bytes,
}

/// First field called `field_name`, read fully into memory
async fn take_file(mut multipart: Multipart, field_name: &str) -> Result<Option<Upload>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid(e.body_text()))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::invalid(e.body_text()))?;
        return Ok(Some(Upload { file_name, bytes }));
    }
    Ok(None)
}

fn required_text(payload: Result<Json<TextRequest>, JsonRejection>) -> Result<String, AppError> {
    payload
        .ok()
        .and_then(|Json(req)| req.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::invalid("No text provided"))
}

/// Run a synchronous service call on the blocking pool
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> sentiscope_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

fn count_request(route: &'static str) {
    metrics::counter!("sentiscope_requests_total", "route" => route).increment(1);
}

fn record_latency(path: &'static str, start: Instant) {
    metrics::histogram!("sentiscope_analysis_latency_us", "path" => path)
        .record(start.elapsed().as_micros() as f64);
}
