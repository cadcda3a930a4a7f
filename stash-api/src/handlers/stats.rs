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

//! Aggregate storage metrics endpoint.

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::error;

use crate::errors::ApiError;
use crate::server::AppState;

/// Response for `GET /metrics`.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    /// Distinct filenames ever created. Seeded from the on-disk file count
    /// at startup, bumped per new upload, never persisted.
    pub files_stored_total: u64,
    /// Regular files currently on disk.
    pub files_current: u64,
    /// Sum of their sizes in bytes.
    pub total_storage_bytes: u64,
    /// The same sum in MiB (1024 * 1024 bytes), rounded to 2 decimals.
    pub total_storage_mb: f64,
    /// Current UTC timestamp, ISO-8601.
    pub timestamp: String,
}

/// Handler for `GET /metrics`.
///
/// Every call rescans the storage directory; consistency over caching.
pub async fn storage_metrics(
    State(state): State<AppState>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let store = state.store.read().await;
    let usage = store.usage().await.map_err(|e| {
        error!("Failed to scan storage directory: {}", e);
        ApiError::Internal(format!("Failed to compute metrics: {e}"))
    })?;

    let total_storage_mb = (usage.total_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0;

    Ok(Json(MetricsResponse {
        files_stored_total: store.files_stored_total(),
        files_current: usage.files_current,
        total_storage_bytes: usage.total_bytes,
        total_storage_mb,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
    }))
}
