// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local use, so the
//! intra application credentials never have to be compiled in.

use std::env;
use std::path::PathBuf;

/// Default intra API root.
pub const DEFAULT_API_URL: &str = "https://api.intra.42.fr/v2";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Intra OAuth application UID
    pub client_id: String,
    /// Intra OAuth application secret
    pub client_secret: String,
    /// API root, without trailing slash
    pub api_url: String,
    /// Directory holding the persisted preferences file
    pub data_dir: PathBuf,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: env::temp_dir().join("eye42-test"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let data_dir = match env::var("EYE42_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::data_local_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("eye42"),
        };

        Ok(Self {
            client_id: env::var("INTRA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("INTRA_CLIENT_ID"))?,
            client_secret: env::var("INTRA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("INTRA_CLIENT_SECRET"))?,
            api_url: env::var("INTRA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            data_dir,
            timeout_secs: env::var("INTRA_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Could not determine a data directory; set EYE42_DATA_DIR")]
    NoDataDir,
}
