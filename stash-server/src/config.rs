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

//! Configuration management for the Stash server.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings (bind address, TLS, upload cap)
    pub server: ServerConfig,
    /// Storage settings
    pub storage: StorageConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    /// Can be set via the STASH_BIND environment variable.
    pub bind: String,
    /// Maximum upload size in bytes.
    /// Can be set via STASH_MAX_UPLOAD_SIZE (e.g., "64MB", "1GB").
    pub max_upload_size: usize,
    /// TLS configuration for HTTPS support.
    pub tls: TlsConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage root directory; created at startup if missing.
    /// Can be set via STASH_STORAGE_DIR (default: "storage").
    pub root: PathBuf,
}

/// TLS/HTTPS configuration.
///
/// TLS is disabled by default. To enable it, set the `STASH_TLS_CERT` and
/// `STASH_TLS_KEY` environment variables to PEM-encoded certificate and
/// private key files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether TLS is enabled.
    /// Automatically true when both cert_path and key_path are provided.
    pub enabled: bool,
    /// Path to a PEM-encoded certificate file (STASH_TLS_CERT).
    pub cert_path: Option<PathBuf>,
    /// Path to a PEM-encoded private key file (STASH_TLS_KEY).
    pub key_path: Option<PathBuf>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        let cert_path = std::env::var("STASH_TLS_CERT").ok().map(PathBuf::from);
        let key_path = std::env::var("STASH_TLS_KEY").ok().map(PathBuf::from);

        // Enable TLS only if both cert and key are provided
        let enabled = cert_path.is_some() && key_path.is_some();

        Self {
            enabled,
            cert_path,
            key_path,
        }
    }
}

impl TlsConfig {
    /// Validates the TLS configuration.
    ///
    /// Returns an error if TLS is enabled but a certificate or key path is
    /// missing.
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled {
            if self.cert_path.is_none() {
                return Err("TLS enabled but STASH_TLS_CERT is not set".to_string());
            }
            if self.key_path.is_none() {
                return Err("TLS enabled but STASH_TLS_KEY is not set".to_string());
            }
        }
        Ok(())
    }
}

/// Parses a size string like "1GB", "64MB", "1024KB", "5000" into bytes.
///
/// Supported suffixes (case-insensitive):
/// - GB, G: Gigabytes
/// - MB, M: Megabytes
/// - KB, K: Kilobytes
/// - B or no suffix: Bytes
pub fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim().to_uppercase();

    if s.is_empty() {
        return Err("Empty size string".to_string());
    }

    let num_end = s.chars().position(|c| !c.is_ascii_digit() && c != '.').unwrap_or(s.len());

    let (num_str, suffix) = s.split_at(num_end);
    let suffix = suffix.trim();

    let num: f64 = num_str.parse().map_err(|_| format!("Invalid number: {}", num_str))?;

    let multiplier: usize = match suffix {
        "GB" | "G" => 1024 * 1024 * 1024,
        "MB" | "M" => 1024 * 1024,
        "KB" | "K" => 1024,
        "B" | "" => 1,
        _ => return Err(format!("Unknown size suffix: {}", suffix)),
    };

    Ok((num * multiplier as f64) as usize)
}

impl Config {
    /// Loads configuration from the environment, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self::default())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: std::env::var("STASH_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
                max_upload_size: std::env::var("STASH_MAX_UPLOAD_SIZE")
                    .ok()
                    .and_then(|s| parse_size(&s).ok())
                    .unwrap_or(stash_api::DEFAULT_MAX_UPLOAD_SIZE),
                tls: TlsConfig::default(),
            },
            storage: StorageConfig {
                root: std::env::var("STASH_STORAGE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("storage")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_bytes() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_size_kb() {
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("10kb").unwrap(), 10 * 1024);
    }

    #[test]
    fn test_parse_size_mb() {
        assert_eq!(parse_size("1MB").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("64mb").unwrap(), 64 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_gb() {
        assert_eq!(parse_size("1GB").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("1g").unwrap(), 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("1TB").is_err()); // TB not supported
    }

    #[test]
    fn test_tls_validation_disabled() {
        let tls = TlsConfig {
            enabled: false,
            cert_path: None,
            key_path: None,
        };
        assert!(tls.validate().is_ok());
    }

    #[test]
    fn test_tls_validation_success() {
        let tls = TlsConfig {
            enabled: true,
            cert_path: Some(PathBuf::from("/path/to/cert.pem")),
            key_path: Some(PathBuf::from("/path/to/key.pem")),
        };
        assert!(tls.validate().is_ok());
    }

    #[test]
    fn test_tls_validation_missing_cert() {
        let tls = TlsConfig {
            enabled: true,
            cert_path: None,
            key_path: Some(PathBuf::from("/path/to/key.pem")),
        };
        let result = tls.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("STASH_TLS_CERT"));
    }

    #[test]
    fn test_tls_validation_missing_key() {
        let tls = TlsConfig {
            enabled: true,
            cert_path: Some(PathBuf::from("/path/to/cert.pem")),
            key_path: None,
        };
        let result = tls.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("STASH_TLS_KEY"));
    }
}
