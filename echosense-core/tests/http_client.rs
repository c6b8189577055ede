//! Integration tests for the HTTP transport
//!
//! These tests run a small in-process backend on a random local port and
//! drive `AnalyticsClient` against it over real HTTP.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use echosense_core::api::{AnalyticsClient, AudioFile, CallStatus, Method, RequestOptions};
use echosense_core::config::ClientConfig;
use echosense_core::Error;
use serde_json::{json, Value};

/// What the fake backend saw
#[derive(Default)]
struct Seen {
    content_types: Vec<Option<String>>,
    upload_fields: Vec<(String, Option<String>, Vec<u8>)>,
}

type Shared = Arc<Mutex<Seen>>;

fn record_content_type(seen: &Shared, headers: &HeaderMap) {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().content_types.push(content_type);
}

async fn dashboard(
    State(seen): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    record_content_type(&seen, &headers);
    let days: u32 = params.get("days").and_then(|d| d.parse().ok()).unwrap_or(0);
    Json(json!({
        "period_days": days,
        "total_calls": 3,
        "processed_calls": 2,
        "processing_rate": 66.67,
        "avg_quality_score": 78.5,
        "total_compliance_flags": 1,
        "high_severity_flags": 0,
        "avg_processing_time_seconds": 12.4
    }))
}

async fn delete_call(Path(call_id): Path<String>) -> impl IntoResponse {
    if call_id == "abc123" {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Call deleted successfully",
                "call_id": call_id
            })),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Call not found" })),
        )
    }
}

async fn upload(
    State(seen): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Json<Value> {
    record_content_type(&seen, &headers);
    let mut filename = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        filename = file_name.clone().unwrap_or_default();
        let data = field.bytes().await.unwrap().to_vec();
        seen.lock()
            .unwrap()
            .upload_fields
            .push((name, file_name, data));
    }
    Json(json!({
        "call_id": "0b9e",
        "filename": filename,
        "duration": 1.5,
        "status": "uploaded",
        "message": "File uploaded successfully. Processing started."
    }))
}

async fn echo(headers: HeaderMap, body: String) -> Json<Value> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({ "content_type": content_type, "body": body }))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "upstream exploded")
}

async fn spawn_backend() -> (String, Shared) {
    let seen: Shared = Arc::default();
    let app = Router::new()
        .route("/api/analytics/dashboard", get(dashboard))
        .route("/api/calls/:call_id", delete(delete_call))
        .route("/api/upload/audio", post(upload))
        .route("/api/processing/status/:call_id", get(broken))
        .route("/echo", post(echo))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}

#[tokio::test]
async fn test_dashboard_over_http() {
    let (base_url, seen) = spawn_backend().await;
    let client = AnalyticsClient::new(base_url).unwrap();

    let stats = client.get_dashboard_stats(None).await.unwrap();
    assert_eq!(stats.period_days, 7);
    assert_eq!(stats.total_calls, 3);
    assert_eq!(stats.avg_processing_time_seconds, Some(12.4));

    let stats = client.get_dashboard_stats(Some(14)).await.unwrap();
    assert_eq!(stats.period_days, 14);

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.content_types,
        vec![
            Some("application/json".to_string()),
            Some("application/json".to_string())
        ]
    );
}

#[tokio::test]
async fn test_delete_over_http() {
    let (base_url, _) = spawn_backend().await;
    let client = AnalyticsClient::new(base_url).unwrap();

    let result = client.delete_call("abc123").await.unwrap();
    assert!(result.success);
    assert_eq!(result.call_id, "abc123");

    let err = client.delete_call("missing").await.unwrap_err();
    assert!(matches!(err, Error::Request(_)));
    assert_eq!(err.to_string(), "Call not found");
}

#[tokio::test]
async fn test_non_json_error_over_http() {
    let (base_url, _) = spawn_backend().await;
    let client = AnalyticsClient::new(base_url).unwrap();

    let err = client.get_processing_status("c1").await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 502");
}

#[tokio::test]
async fn test_upload_over_http() {
    let (base_url, seen) = spawn_backend().await;
    let client = AnalyticsClient::new(base_url).unwrap();

    let response = client
        .upload_audio(AudioFile::new("greeting.mp3", b"ID3fake".to_vec()))
        .await
        .unwrap();
    assert_eq!(response.filename, "greeting.mp3");
    assert_eq!(response.status, CallStatus::Uploaded);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.upload_fields.len(), 1);
    let (field, file_name, data) = &seen.upload_fields[0];
    assert_eq!(field, "file");
    assert_eq!(file_name.as_deref(), Some("greeting.mp3"));
    assert_eq!(data, b"ID3fake");

    let content_type = seen.content_types[0].clone().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig {
        base_url: format!("http://{}", addr),
        timeout_secs: 5,
    };
    let client = AnalyticsClient::from_config(&config).unwrap();

    let err = client.health_check().await.unwrap_err();
    assert!(matches!(err, Error::Request(_)));
    assert!(err.to_string().starts_with("HTTP request failed"));
}

#[tokio::test]
async fn test_unknown_route_reports_status() {
    let (base_url, _) = spawn_backend().await;
    let client = AnalyticsClient::new(base_url).unwrap();

    // axum answers unknown routes with an empty 404
    let err = client.get_quality_trends(None).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 404");
}

#[tokio::test]
async fn test_json_body_over_http() {
    let (base_url, _) = spawn_backend().await;
    let client = AnalyticsClient::new(base_url).unwrap();

    let options = RequestOptions {
        method: Method::Post,
        body: Some(json!({ "reprocess": true })),
        headers: Vec::new(),
    };
    let echoed: Value = client.request("/echo", options).await.unwrap();
    assert_eq!(echoed["content_type"], "application/json");
    let sent: Value = serde_json::from_str(echoed["body"].as_str().unwrap()).unwrap();
    assert_eq!(sent, json!({ "reprocess": true }));

    let options = RequestOptions {
        method: Method::Post,
        body: Some(json!("note")),
        headers: vec![("content-type".to_string(), "text/plain".to_string())],
    };
    let echoed: Value = client.request("/echo", options).await.unwrap();
    assert_eq!(echoed["content_type"], "text/plain");
    assert_eq!(echoed["body"], "\"note\"");
}
