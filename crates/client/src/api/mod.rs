//! JobHub REST backend clients.
//!
//! The backend is an external collaborator reached over HTTP/JSON. Each
//! concern gets a trait seam (so tests can substitute fixtures) and a
//! reqwest-backed implementation:
//!
//! - [`auth`] - `/auth/*` endpoints behind [`auth::AuthBackend`]
//! - [`jobs`] - job and company lookups behind [`jobs::JobRepository`]
//! - [`types`] - wire request/response DTOs

pub mod auth;
pub mod jobs;
pub mod types;

pub use auth::{AuthBackend, HttpAuthClient};
pub use jobs::{HttpJobClient, JobQuery, JobRepository};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the JobHub backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status with an error body.
    #[error("{message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, or a synthesized one.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the backend rejected the request as unauthenticated.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Backend { status: 401, .. })
    }

    /// The user-facing message for this error.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Backend { message, .. } => message.clone(),
            Self::Http(_) => "Could not reach the server. Please try again.".to_owned(),
            Self::Parse(_) => "The server returned an unexpected response.".to_owned(),
        }
    }
}

/// Error body shape returned by the backend.
///
/// Some endpoints use `message`, older ones use `error`; either may be
/// absent entirely on proxy-level failures.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    /// Best error message available, falling back to the HTTP status.
    pub(crate) fn into_message(self, status: u16) -> String {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {status}"))
    }
}

/// Turn a reqwest response into `Ok(body)` or a decoded [`ApiError`].
///
/// Transport failures while reading the body map to [`ApiError::Http`];
/// a body that does not match the expected shape maps to
/// [`ApiError::Parse`].
pub(crate) async fn handle_response<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        let body = response.bytes().await?;
        return Ok(serde_json::from_slice(&body)?);
    }

    let code = status.as_u16();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.into_message(code),
        Err(_) => format!("Request failed with status {code}"),
    };

    Err(ApiError::Backend {
        status: code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_prefers_message_over_error() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"Invalid credentials","error":"ignored"}"#)
                .expect("deserialize");
        assert_eq!(body.into_message(401), "Invalid credentials");
    }

    #[test]
    fn error_body_falls_back_to_error_field() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"Account locked"}"#).expect("deserialize");
        assert_eq!(body.into_message(423), "Account locked");
    }

    #[test]
    fn error_body_synthesizes_from_status_when_empty() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"  "}"#).expect("deserialize");
        assert_eq!(body.into_message(502), "Request failed with status 502");
    }

    #[test]
    fn decode_failures_surface_as_parse_errors() {
        let decode_error =
            serde_json::from_str::<ErrorBody>("{not json").expect_err("invalid json");
        let error = ApiError::from(decode_error);
        assert!(matches!(error, ApiError::Parse(_)));
        assert_eq!(
            error.message(),
            "The server returned an unexpected response."
        );
    }

    #[test]
    fn unauthorized_detection() {
        let err = ApiError::Backend {
            status: 401,
            message: "expired".to_owned(),
        };
        assert!(err.is_unauthorized());

        let err = ApiError::Backend {
            status: 403,
            message: "forbidden".to_owned(),
        };
        assert!(!err.is_unauthorized());
    }
}
