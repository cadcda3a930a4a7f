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

//! File upload, download, and listing handlers.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::Serialize;
use stash_core::sanitize_filename;
use tokio_util::io::ReaderStream;
use tracing::{error, info};

use crate::errors::ApiError;
use crate::server::AppState;

/// Response for `POST /files`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Confirmation message.
    pub message: &'static str,
    /// Name the file was stored under.
    pub filename: String,
    /// Bytes written.
    pub size: usize,
    /// Content type declared by the client.
    pub content_type: String,
}

/// Response for `GET /files`.
#[derive(Debug, Serialize)]
pub struct FileListing {
    /// Names of the stored files, in enumeration order.
    pub files: Vec<String>,
    /// Number of entries in `files`.
    pub count: usize,
}

/// Handler for `POST /files` - store an uploaded file.
///
/// Expects a multipart form with a `file` field carrying the filename and
/// content. The stored name is the final path segment of the client name;
/// an existing file of the same name is fully overwritten. The upload
/// counter is bumped only when the write creates a new file.
pub async fn store_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let raw_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = sanitize_filename(&raw_name).map_err(|_| ApiError::InvalidFilename)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read upload: {e}")))?;

        // Write lock: the existence check, disk write, and counter bump
        // must not interleave with another upload of the same name.
        let mut store = state.store.write().await;
        let created = store.put(&filename, &data).await.map_err(|e| {
            error!("Failed to store file '{}': {}", filename, e);
            ApiError::Internal(format!("Failed to store file: {e}"))
        })?;
        drop(store);

        info!(filename = %filename, size = data.len(), created, "File stored");

        return Ok(Json(UploadResponse {
            message: "File stored successfully",
            filename,
            size: data.len(),
            content_type,
        }));
    }

    Err(ApiError::InvalidRequest(
        "Missing multipart field 'file'".to_string(),
    ))
}

/// Handler for `GET /files/:filename` - download a stored file.
///
/// Streams the raw bytes with a generic binary content type and the
/// filename as the suggested download name. Traversal attempts that survive
/// route matching (percent-encoded separators, symlinks out of the root)
/// are rejected here.
pub async fn get_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let store = state.store.read().await;
    let path = store.resolve_existing(&filename).await?;
    drop(store);

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        error!("Failed to open '{}': {}", path.display(), e);
        ApiError::Internal(format!("Failed to read file: {e}"))
    })?;
    let stream = ReaderStream::new(file);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {e}")))
}

/// Handler for `GET /files` - list stored files.
pub async fn list_files(State(state): State<AppState>) -> Result<Json<FileListing>, ApiError> {
    let store = state.store.read().await;
    let files = store.list().await.map_err(|e| {
        error!("Failed to list storage directory: {}", e);
        ApiError::Internal(format!("Failed to list files: {e}"))
    })?;

    let count = files.len();
    Ok(Json(FileListing { files, count }))
}
