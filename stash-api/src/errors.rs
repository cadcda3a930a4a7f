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

//! API error types and responses.
//!
//! Every error is rendered as a JSON body `{"error": code, "message": text}`
//! with the matching HTTP status code. Nothing here panics and nothing leaks
//! internals beyond the error message itself.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stash_core::StoreError;
use thiserror::Error;

/// API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The supplied filename is empty, `.`/`..`, or escapes the storage root.
    #[error("Invalid filename")]
    InvalidFilename,

    /// The requested file does not exist.
    #[error("File '{0}' not found")]
    FileNotFound(String),

    /// The request body is malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unexpected storage failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the wire error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidFilename => "InvalidFilename",
            ApiError::FileNotFound(_) => "FileNotFound",
            ApiError::InvalidRequest(_) => "InvalidRequest",
            ApiError::Internal(_) => "InternalError",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidFilename => StatusCode::BAD_REQUEST,
            ApiError::FileNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidFilename { .. } => ApiError::InvalidFilename,
            StoreError::NotFound { name } => ApiError::FileNotFound(name),
            StoreError::Io(e) => ApiError::Internal(format!("Storage failure: {e}")),
        }
    }
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::InvalidFilename.code(), "InvalidFilename");
        assert_eq!(ApiError::FileNotFound("x".into()).code(), "FileNotFound");
        assert_eq!(ApiError::Internal("boom".into()).code(), "InternalError");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidFilename.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::FileNotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_names_the_file() {
        let err = ApiError::from(StoreError::NotFound {
            name: "missing.txt".into(),
        });
        assert_eq!(err.to_string(), "File 'missing.txt' not found");
    }
}
