//! Integration tests for the SentiScope HTTP surface

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use sentiscope_analyzers::{AnalysisService, EmotionAnalysis, EmotionClassifier, EmotionScore};
use sentiscope_server::{create_router, AppState, ServerConfig};
use serde_json::{json, Value};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "sentiscope-test-boundary";

/// Always reports the same distribution
struct FixedEmotion(Vec<(&'static str, f64)>);

impl EmotionClassifier for FixedEmotion {
    fn classify(&self, _image: &DynamicImage) -> sentiscope_core::Result<EmotionAnalysis> {
        Ok(EmotionAnalysis::from_scores(
            self.0
                .iter()
                .map(|(emotion, score)| EmotionScore::new(*emotion, *score))
                .collect(),
        ))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

fn sad_classifier() -> Arc<dyn EmotionClassifier> {
    Arc::new(FixedEmotion(vec![
        ("angry", 10.0),
        ("sad", 70.0),
        ("neutral", 20.0),
    ]))
}

fn app(upload_dir: &Path, classifier: Option<Arc<dyn EmotionClassifier>>) -> Router {
    let mut service = AnalysisService::with_default_scorers().unwrap();
    if let Some(classifier) = classifier {
        service = service.with_emotion_classifier(classifier);
    }

    let config = ServerConfig {
        upload_dir: upload_dir.to_path_buf(),
        ..ServerConfig::default()
    };
    create_router(AppState::new(config, service, None))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(uri: &str, field: &str, file_name: Option<&str>, data: &[u8]) -> Request<Body> {
    let disposition = match file_name {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_fn(40, 40, |x, _| {
        if x < 30 {
            Rgb([0, 128, 0])
        } else {
            Rgb([200, 200, 0])
        }
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[tokio::test]
async fn test_index_and_health() {
    let dir = tempfile::tempdir().unwrap();

    let request = Request::get("/").body(Body::empty()).unwrap();
    let (status, body) = send(app(dir.path(), None), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Server is running!");

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send_json(app(dir.path(), None), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "emotion_model": false}));

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (_, body) = send_json(app(dir.path(), Some(sad_classifier())), request).await;
    assert_eq!(body["emotion_model"], true);
}

#[tokio::test]
async fn test_metrics_without_recorder_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::get("/metrics").body(Body::empty()).unwrap();

    let (status, body) = send(app(dir.path(), None), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_analyze_returns_side_by_side_results() {
    let dir = tempfile::tempdir().unwrap();
    let request = json_request("/analyze", json!({"text": "I love this!"}));

    let (status, body) = send_json(app(dir.path(), None), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiments"]["VADER"]["sentiment"], "Positive");
    assert_eq!(body["sentiments"]["TextBlob"]["sentiment"], "Positive");
    assert!(body["sentiments"]["VADER"]["confidence"].as_f64().unwrap() > 0.05);
}

#[tokio::test]
async fn test_analyze_text_returns_one_batch_row() {
    let dir = tempfile::tempdir().unwrap();
    let request = json_request("/analyze-text", json!({"text": "I hate rainy mornings"}));

    let (status, body) = send_json(app(dir.path(), None), request).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Text"], "I hate rainy mornings");
    assert!(rows[0]["VADER Sentiment"].as_str().unwrap().starts_with("Negative ("));
    assert!(rows[0]["TextBlob Sentiment"].as_str().unwrap().ends_with("%)"));
}

#[tokio::test]
async fn test_missing_text_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    for body in [json!({}), json!({"text": ""}), json!({"text": null})] {
        let (status, body) =
            send_json(app(dir.path(), None), json_request("/analyze-text", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No text provided"}));
    }

    let request = Request::post("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_json(app(dir.path(), None), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No text provided");
}

#[tokio::test]
async fn test_dataset_rows_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let csv = b"text,source\nI love this!,web\nThis is awful,app\nThe door is red,web\n";
    let request = multipart_request("/analyze_dataset", "file", Some("reviews.csv"), csv);

    let (status, body) = send_json(app(dir.path(), None), request).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Text"], "I love this!");
    assert_eq!(rows[1]["Text"], "This is awful");
    assert_eq!(rows[2]["Text"], "The door is red");
    assert!(rows[1]["VADER Sentiment"].as_str().unwrap().starts_with("Negative"));
}

#[tokio::test]
async fn test_dataset_without_text_column() {
    let dir = tempfile::tempdir().unwrap();
    let request = multipart_request(
        "/analyze_dataset",
        "file",
        Some("reviews.csv"),
        b"review\nI love this!\n",
    );

    let (status, body) = send_json(app(dir.path(), None), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "CSV must contain a 'text' column"}));
}

#[tokio::test]
async fn test_dataset_without_file_part() {
    let dir = tempfile::tempdir().unwrap();

    let request = multipart_request("/analyze_dataset", "other", Some("a.csv"), b"text\nhi\n");
    let (status, body) = send_json(app(dir.path(), None), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file part");

    let request = json_request("/analyze_dataset", json!({"text": "hi"}));
    let (status, body) = send_json(app(dir.path(), None), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file part");
}

#[tokio::test]
async fn test_dataset_malformed_csv_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = b"text\n".to_vec();
    csv.extend_from_slice(&[0xc3, 0x28, b'\n']);
    let request = multipart_request("/analyze_dataset", "file", Some("bad.csv"), &csv);

    let (status, body) = send_json(app(dir.path(), None), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("dataset error"));
}

#[tokio::test]
async fn test_analyze_image_with_classifier() {
    let dir = tempfile::tempdir().unwrap();
    let request = multipart_request("/analyze-image", "image", Some("selfie.png"), &png_bytes());

    let (status, body) = send_json(app(dir.path(), Some(sad_classifier())), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "Sad");
    assert_eq!(body["sentiment"], "Negative");
    assert_eq!(body["confidence"], 0.7);
    assert_eq!(
        body["suggestion"],
        "The image seems to express negative emotions. Posting is not recommended."
    );

    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 3);
    assert_eq!(predictions[0], json!({"emotion": "Sad", "confidence": 0.7}));
    assert_eq!(predictions[1]["emotion"], "Neutral");

    assert_eq!(body["colors"], json!(["#008000", "#c8c800"]));
    assert!(body["processed_in"].as_str().unwrap().ends_with('s'));

    // the upload is kept under its own name
    assert!(dir.path().join("selfie.png").exists());
}

#[tokio::test]
async fn test_analyze_image_without_model_reports_error_body() {
    let dir = tempfile::tempdir().unwrap();
    let request = multipart_request("/analyze-image", "image", Some("selfie.png"), &png_bytes());

    let (status, body) = send_json(app(dir.path(), None), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().unwrap().contains("model unavailable"));
}

#[tokio::test]
async fn test_analyze_image_requires_image_part() {
    let dir = tempfile::tempdir().unwrap();

    let request = multipart_request("/analyze-image", "photo", Some("selfie.png"), &png_bytes());
    let (status, body) = send_json(app(dir.path(), Some(sad_classifier())), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No image provided"}));

    let request = Request::post("/analyze-image").body(Body::empty()).unwrap();
    let (status, _) = send_json(app(dir.path(), Some(sad_classifier())), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_detecting_with_data_url() {
    let dir = tempfile::tempdir().unwrap();
    let data_url = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes()));
    let request = json_request("/start-detecting", json!({"image": data_url}));

    let (status, body) = send_json(app(dir.path(), Some(sad_classifier())), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"emotion": "sad"}));
}

#[tokio::test]
async fn test_start_detecting_errors() {
    let dir = tempfile::tempdir().unwrap();

    let request = json_request("/start-detecting", json!({}));
    let (status, body) = send_json(app(dir.path(), Some(sad_classifier())), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No image provided");

    let request = json_request("/start-detecting", json!({"image": "data:image/png;base64,@@@"}));
    let (status, body) = send_json(app(dir.path(), Some(sad_classifier())), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("base64"));
}

#[tokio::test]
async fn test_unknown_route() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::get("/nope").body(Body::empty()).unwrap();

    let (status, body) = send_json(app(dir.path(), None), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}
