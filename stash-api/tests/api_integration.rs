// Copyright 2026 Stash Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! API Integration Tests
//!
//! Tests the HTTP API using in-process requests.
//! No actual network I/O - uses tower::ServiceExt::oneshot directly.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use stash_api::{create_router, AppState};
use stash_core::FileStore;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "stash-test-boundary";

/// Creates a test store in a temporary directory.
async fn create_test_store() -> (FileStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().join("storage");
    let store = FileStore::open(root).await.expect("Failed to open store");
    (store, temp_dir)
}

/// Helper to read a response body as raw bytes.
async fn body_to_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

/// Helper to read a response body as parsed JSON.
async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_to_bytes(body).await).expect("Response body is not JSON")
}

/// Builds a multipart `POST /files` request carrying one `file` field.
fn upload_request(filename: &str, content: &[u8], content_type: &str) -> Request<Body> {
    multipart_request("file", filename, content, content_type)
}

fn multipart_request(
    field: &str,
    filename: &str,
    content: &[u8],
    content_type: &str,
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/files")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

// ============================================================================
// Service Info and Health Tests
// ============================================================================

#[tokio::test]
async fn test_service_info_lists_endpoints() {
    let (store, _temp) = create_test_store().await;
    let app = create_router(AppState::new(store));

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("Stash"));

    let endpoints: Vec<&str> = json["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    for endpoint in [
        "GET /files/{filename}",
        "POST /files",
        "GET /files",
        "GET /health",
        "GET /metrics",
    ] {
        assert!(endpoints.contains(&endpoint), "missing {endpoint}");
    }
}

#[tokio::test]
async fn test_health_ok() {
    let (store, _temp) = create_test_store().await;
    let app = create_router(AppState::new(store));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "Stash File Storage API");
    assert!(json["timestamp"].as_str().unwrap().contains('T'));
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_then_list() {
    let (store, _temp) = create_test_store().await;
    let state = AppState::new(store);

    // Initially empty
    let response = create_router(state.clone()).oneshot(get("/files")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["files"], serde_json::json!([]));
    assert_eq!(json["count"], 0);

    // Upload a file
    let content = b"hello world";
    let response = create_router(state.clone())
        .oneshot(upload_request("example.txt", content, "text/plain"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "File stored successfully");
    assert_eq!(json["filename"], "example.txt");
    assert_eq!(json["size"], content.len());
    assert_eq!(json["content_type"], "text/plain");

    // Now it shows up in the listing
    let response = create_router(state).oneshot(get("/files")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    let files = json["files"].as_array().unwrap();
    assert!(files.iter().any(|f| f == "example.txt"));
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn test_upload_strips_directory_components() {
    let (store, _temp) = create_test_store().await;
    let state = AppState::new(store);

    let response = create_router(state.clone())
        .oneshot(upload_request("nested/dir/inner.txt", b"x", "text/plain"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["filename"], "inner.txt");

    let response = create_router(state).oneshot(get("/files/inner.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_rejects_dot_filenames() {
    let (store, _temp) = create_test_store().await;
    let state = AppState::new(store);

    for bad in ["..", ".", ""] {
        let response = create_router(state.clone())
            .oneshot(upload_request(bad, b"x", "text/plain"))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "filename {bad:?} must be rejected"
        );
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["message"], "Invalid filename");
    }
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let (store, _temp) = create_test_store().await;
    let app = create_router(AppState::new(store));

    let response = app
        .oneshot(multipart_request("other", "x.txt", b"x", "text/plain"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Download Tests
// ============================================================================

#[tokio::test]
async fn test_upload_download_roundtrip() {
    let (store, _temp) = create_test_store().await;
    let state = AppState::new(store);

    let payload = b"test-contents";
    let response = create_router(state.clone())
        .oneshot(upload_request("note.txt", payload, "text/plain"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_router(state).oneshot(get("/files/note.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/octet-stream"));

    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("note.txt"));

    assert_eq!(body_to_bytes(response.into_body()).await, payload);
}

#[tokio::test]
async fn test_binary_roundtrip() {
    let (store, _temp) = create_test_store().await;
    let state = AppState::new(store);

    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let response = create_router(state.clone())
        .oneshot(upload_request("blob.bin", &payload, "application/octet-stream"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_router(state).oneshot(get("/files/blob.bin")).await.unwrap();
    assert_eq!(body_to_bytes(response.into_body()).await, payload);
}

#[tokio::test]
async fn test_download_missing_file_returns_404() {
    let (store, _temp) = create_test_store().await;
    let app = create_router(AppState::new(store));

    let response = app.oneshot(get("/files/missing.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(response.into_body()).await;
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("not found"));
    assert!(message.contains("missing.txt"));
}

#[tokio::test]
async fn test_path_traversal_misses_route() {
    let (store, _temp) = create_test_store().await;
    let app = create_router(AppState::new(store));

    // `..` is its own path segment, so `/files/:filename` never matches
    // and the router answers 404 before the handler runs.
    let response = app.oneshot(get("/files/../secret.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_encoded_traversal_never_leaks_contents() {
    let (store, temp) = create_test_store().await;

    // Plant a secret next to (outside) the storage root.
    std::fs::write(temp.path().join("secret.txt"), b"top secret").unwrap();

    let app = create_router(AppState::new(store));

    // %2F decodes to `/` inside the captured segment; the handler must
    // reject it rather than resolve it.
    let response = app.oneshot(get("/files/..%2Fsecret.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_to_bytes(response.into_body()).await;
    assert!(!body.windows(10).any(|w| w == b"top secret"));
}

// ============================================================================
// Overwrite Semantics Tests
// ============================================================================

#[tokio::test]
async fn test_overwrite_replaces_contents() {
    let (store, _temp) = create_test_store().await;
    let state = AppState::new(store);

    for content in [&b"first"[..], &b"second, longer"[..]] {
        let response = create_router(state.clone())
            .oneshot(upload_request("doc.txt", content, "text/plain"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = create_router(state.clone()).oneshot(get("/files/doc.txt")).await.unwrap();
    assert_eq!(body_to_bytes(response.into_body()).await, b"second, longer");

    // Still a single file.
    let response = create_router(state).oneshot(get("/files")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 1);
}
