//! Authentication backend client.
//!
//! [`AuthBackend`] is the seam between the session store and the `/auth/*`
//! endpoints; [`HttpAuthClient`] is the production implementation. Tests
//! substitute a fixture backend, so the session store never notices the
//! difference.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::json;
use tracing::instrument;

use jobhub_core::User;

use crate::config::ClientConfig;

use super::types::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse, TokenGrant,
    VerifyEmailResponse,
};
use super::{ApiError, handle_response};

/// Backend operations the session store depends on.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// `POST /auth/login`.
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `POST /auth/register`.
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError>;

    /// `POST /auth/refresh`: exchange a refresh token for a new pair.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, ApiError>;

    /// `GET /auth/me`: fetch the profile behind an access token.
    async fn current_user(&self, access_token: &str) -> Result<User, ApiError>;

    /// `POST /auth/logout`: invalidate the session server-side.
    async fn logout(&self, access_token: &str) -> Result<(), ApiError>;

    /// `POST /auth/verify-email`: redeem an email verification token.
    async fn verify_email(&self, token: &str) -> Result<VerifyEmailResponse, ApiError>;

    /// `POST /auth/resend-verification`.
    async fn resend_verification(&self, email: &str) -> Result<MessageResponse, ApiError>;

    /// `POST /auth/forgot-password`.
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError>;

    /// `POST /auth/reset-password`.
    async fn reset_password(&self, token: &str, password: &str)
    -> Result<MessageResponse, ApiError>;
}

/// HTTP client for the JobHub auth endpoints.
#[derive(Clone)]
pub struct HttpAuthClient {
    inner: Arc<HttpAuthClientInner>,
}

struct HttpAuthClientInner {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpAuthClient {
    /// Create a new auth client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed, which
    /// only happens with a broken TLS installation.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(HttpAuthClientInner {
                client,
                config: config.clone(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        self.inner.config.endpoint(path)
    }

    fn bearer(token: &str) -> Result<HeaderValue, ApiError> {
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ApiError::Backend {
            status: 400,
            message: "Access token contains invalid characters".to_owned(),
        })
    }
}

#[async_trait]
impl AuthBackend for HttpAuthClient {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/login"))
            .json(&request)
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/register"))
            .json(&request)
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/refresh"))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip_all)]
    async fn current_user(&self, access_token: &str) -> Result<User, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url("/auth/me"))
            .header(AUTHORIZATION, Self::bearer(access_token)?)
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip_all)]
    async fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/logout"))
            .header(AUTHORIZATION, Self::bearer(access_token)?)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Backend {
                status: status.as_u16(),
                message: format!("Logout failed with status {}", status.as_u16()),
            })
        }
    }

    #[instrument(skip_all)]
    async fn verify_email(&self, token: &str) -> Result<VerifyEmailResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/verify-email"))
            .json(&json!({ "token": token }))
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip(self))]
    async fn resend_verification(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/resend-verification"))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip(self))]
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/forgot-password"))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip_all)]
    async fn reset_password(
        &self,
        token: &str,
        password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/reset-password"))
            .json(&json!({ "token": token, "password": password }))
            .send()
            .await?;
        handle_response(response).await
    }
}
