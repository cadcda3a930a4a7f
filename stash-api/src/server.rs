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

//! Axum HTTP server setup and routing.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use stash_core::FileStore;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::logging_middleware;

/// Default maximum upload size (64MB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Name reported by the service info and health endpoints.
pub const SERVICE_NAME: &str = "Stash File Storage API";

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// File store. Uploads take the write lock, so the existence check,
    /// disk write, and counter increment cannot interleave; reads take the
    /// read lock and see whatever is currently on disk.
    pub store: Arc<RwLock<FileStore>>,
    /// Maximum upload size in bytes.
    pub max_upload_size: usize,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(store: FileStore) -> Self {
        Self::with_max_upload_size(store, DEFAULT_MAX_UPLOAD_SIZE)
    }

    /// Creates a new application state with a custom upload cap.
    pub fn with_max_upload_size(store: FileStore, max_upload_size: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            max_upload_size,
        }
    }
}

/// Creates the router with all service endpoints.
///
/// - `GET /` - service info and route list
/// - `GET /health` - health check
/// - `POST /files` - upload (multipart field `file`)
/// - `GET /files` - list stored files
/// - `GET /files/:filename` - download
/// - `GET /metrics` - aggregate storage metrics
///
/// `:filename` matches a single path segment, so a literal `../` in the URL
/// never reaches the download handler; it falls through to the router's 404.
/// The handler re-checks containment for percent-encoded variants.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health_check))
        .route(
            "/files",
            get(handlers::list_files).post(handlers::store_file),
        )
        .route("/files/:filename", get(handlers::get_file))
        .route("/metrics", get(handlers::storage_metrics))
        // Add tracing layer for request logging
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        // Cap request bodies at the configured upload size
        .layer(DefaultBodyLimit::max(state.max_upload_size))
        .with_state(state)
}
