//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JOBHUB_API_BASE_URL` - Base URL of the JobHub REST backend, including
//!   the version prefix (e.g. `http://localhost:8084/api/v1`)
//!
//! ## Optional
//! - `JOBHUB_DEVICE_ID` - Stable device identifier sent with login requests;
//!   generated fresh when unset

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// JobHub client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for all backend requests, without a trailing slash.
    pub api_base_url: Url,
    /// Device identifier reported on login, so the backend can tie
    /// refresh tokens to a device.
    pub device_id: String,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `JOBHUB_API_BASE_URL` is missing or not a
    /// valid absolute http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("JOBHUB_API_BASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("JOBHUB_API_BASE_URL".to_owned()))?;

        let device_id = std::env::var("JOBHUB_DEVICE_ID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut config = Self::new(&base_url)?;
        config.device_id = device_id;
        Ok(config)
    }

    /// Build a configuration from an explicit base URL.
    ///
    /// A fresh device ID is generated; override the field afterwards if the
    /// host application persists one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if the URL does not parse or
    /// is not http(s).
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(api_base_url.trim_end_matches('/')).map_err(|e| {
            ConfigError::InvalidEnvVar("JOBHUB_API_BASE_URL".to_owned(), e.to_string())
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "JOBHUB_API_BASE_URL".to_owned(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        Ok(Self {
            api_base_url: url,
            device_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    /// Join an endpoint path onto the base URL.
    ///
    /// The base URL carries the `/api/v1` prefix, so callers pass bare
    /// endpoint paths like `/auth/login`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
