//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CAJU_API_BASE_URL` - Base URL of the REST backend (e.g., `https://api.cajucommerce.com.br`)
//!
//! ## Optional
//! - `CAJU_DATA_DIR` - Directory for mirrored client state (default: `.caju`)
//! - `CAJU_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".caju";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend.
    pub api_base_url: Url,
    /// Directory holding the mirrored client state.
    pub data_dir: PathBuf,
    /// Timeout applied to every backend request.
    pub http_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("CAJU_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CAJU_API_BASE_URL".to_string(), e.to_string())
            })?;

        let data_dir = PathBuf::from(get_env_or_default("CAJU_DATA_DIR", DEFAULT_DATA_DIR));

        let timeout_secs = match std::env::var("CAJU_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("CAJU_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url,
            data_dir,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_must_parse() {
        let result = "not a url".parse::<Url>();
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        // Defaults are applied without consulting the environment
        assert_eq!(DEFAULT_DATA_DIR, ".caju");
        assert_eq!(DEFAULT_HTTP_TIMEOUT_SECS, 30);
    }
}
