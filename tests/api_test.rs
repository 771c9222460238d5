//! HTTP API tests driven through the router with `oneshot`

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use ops_healer::api::{build_router, AppState};
use ops_healer::augment::RunbookAugmenter;
use ops_healer::postmortem::{PostmortemRenderer, PostmortemWriter};
use ops_healer::rules::RuleCatalog;
use ops_healer::Analyzer;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn build_test_app(temp_dir: &TempDir) -> Router {
    let writer = PostmortemWriter::new(temp_dir.path()).unwrap();
    let analyzer = Analyzer::new(
        Arc::new(RuleCatalog::builtin().unwrap()),
        Arc::new(RunbookAugmenter::new()),
        PostmortemRenderer::new(writer),
    );
    build_router(AppState::new(Arc::new(analyzer)))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_analyze_returns_report() {
    let temp_dir = TempDir::new().unwrap();
    let app = build_test_app(&temp_dir);

    let (status, body) = post_json(
        app,
        "/analyze",
        json!({ "lines": ["2024-01-01T00:00:00Z OutOfMemory killed process"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["severity"], "CRITICAL");
    assert_eq!(body["probable_causes"], json!(["Out of memory / memory pressure"]));
    assert!(body["suggestions"].as_array().unwrap().len() >= 4);

    let path = body["postmortem_path"].as_str().unwrap();
    assert!(std::path::Path::new(path).starts_with(temp_dir.path()));
    assert!(std::path::Path::new(path).exists());
}

#[tokio::test]
async fn test_analyze_rejects_empty_lines() {
    let temp_dir = TempDir::new().unwrap();
    let app = build_test_app(&temp_dir);

    let (status, body) = post_json(app, "/analyze", json!({ "lines": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "lines[] is required");
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_analyze_rejects_missing_lines() {
    let temp_dir = TempDir::new().unwrap();
    let app = build_test_app(&temp_dir);

    let (status, body) = post_json(app, "/analyze", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "lines[] is required");
}

#[tokio::test]
async fn test_analyze_malformed_body_uses_error_envelope() {
    let temp_dir = TempDir::new().unwrap();

    let (status, body) =
        post_raw(build_test_app(&temp_dir), "/analyze", "{\"lines\": [".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["status"], 400);
    assert!(!body["error"]["message"].as_str().unwrap().is_empty());

    let (status, body) =
        post_json(build_test_app(&temp_dir), "/analyze", json!({ "lines": "oops" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_analyze_low_severity() {
    let temp_dir = TempDir::new().unwrap();
    let app = build_test_app(&temp_dir);

    let (status, body) = post_json(
        app,
        "/analyze",
        json!({ "lines": ["GET /health 200", "cache warmed"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["severity"], "LOW");
    assert_eq!(body["probable_causes"], json!([]));
}

#[tokio::test]
async fn test_health_reports_rule_count() {
    let temp_dir = TempDir::new().unwrap();
    let app = build_test_app(&temp_dir);

    let (status, body) = get(app, "/health").await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["rules"], 9);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    ops_healer::metrics::init_metrics().unwrap();
    let temp_dir = TempDir::new().unwrap();

    let (status, _) = post_json(
        build_test_app(&temp_dir),
        "/analyze",
        json!({ "lines": ["No space left on device"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, text) = get(build_test_app(&temp_dir), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("ops_healer_analyses_total"));
    assert!(text.contains("ops_healer_causes_detected_total{cause=\"Disk full\"}"));
}
