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

//! Service info and health endpoints.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::server::SERVICE_NAME;

/// Response for `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    /// Service description.
    pub message: &'static str,
    /// Route list.
    pub endpoints: Vec<&'static str>,
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always "healthy" while the process is running.
    pub status: &'static str,
    /// Current UTC timestamp, ISO-8601.
    pub timestamp: String,
    /// Fixed service name.
    pub service: &'static str,
}

/// Handler for `GET /` - static service description and route list.
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: SERVICE_NAME,
        endpoints: vec![
            "GET /files/{filename}",
            "POST /files",
            "GET /files",
            "GET /health",
            "GET /metrics",
        ],
    })
}

/// Handler for `GET /health`.
pub async fn health_check() -> Json<Health> {
    Json(Health {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        service: SERVICE_NAME,
    })
}
