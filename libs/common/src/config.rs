//! Client configuration
//!
//! Values come from built-in defaults overridden by `CINEMA_*` environment
//! variables.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default REST base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Default number of reviews per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the review client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Where the session token is persisted
    pub token_file: PathBuf,
    /// Number of reviews requested per page
    pub page_size: u32,
}

impl ClientConfig {
    /// Create a new ClientConfig from environment variables
    ///
    /// # Environment Variables
    /// - `CINEMA_API_BASE_URL`: REST base URL (default: "http://localhost:8000/api")
    /// - `CINEMA_REQUEST_TIMEOUT_SECS`: request timeout (default: 30)
    /// - `CINEMA_TOKEN_FILE`: token file path (default: "<data dir>/cinema-reviews/session.json")
    /// - `CINEMA_PAGE_SIZE`: reviews per page (default: 20)
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default(
                "token_file",
                default_token_file().to_string_lossy().into_owned(),
            )?
            .set_default("page_size", DEFAULT_PAGE_SIZE as u64)?
            .add_source(Environment::with_prefix("CINEMA"))
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_file: default_token_file(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_token_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cinema-reviews")
        .join("session.json")
}
