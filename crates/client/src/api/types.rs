//! Wire DTOs for the JobHub REST backend.
//!
//! Field names are `camelCase` on the wire. Responses are tolerant of
//! missing optional fields: the same `/auth/login` endpoint answers either
//! with a full token grant or with an MFA challenge carrying no tokens.

use jobhub_core::User;
use serde::{Deserialize, Serialize};

/// `POST /auth/login` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Stable device identifier, when the client has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// `POST /auth/register` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Token grant fields shared by login, register, and refresh responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token for obtaining the next pair.
    pub refresh_token: String,
    /// Token scheme, normally `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Access-token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// `POST /auth/login` response.
///
/// Either a full grant (`access_token` + `refresh_token` + `user`) or an
/// MFA challenge (`requires_mfa` + `mfa_token`), never both.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer access token, absent when MFA is pending.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh token, absent when MFA is pending.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token scheme, normally `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Access-token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// The authenticated user, absent when MFA is pending.
    #[serde(default)]
    pub user: Option<User>,
    /// Whether a second factor must be verified before tokens are issued.
    #[serde(default, rename = "requiresMFA")]
    pub requires_mfa: bool,
    /// Opaque token identifying the pending MFA verification.
    #[serde(default)]
    pub mfa_token: Option<String>,
    /// Second-factor methods available to this account, e.g. `totp`,
    /// `backup_code`.
    #[serde(default)]
    pub mfa_methods: Vec<String>,
}

/// `POST /auth/register` response: a full token grant for the new account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token scheme, normally `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Access-token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// The newly created user.
    pub user: User,
}

/// `POST /auth/verify-email` response.
///
/// Verification links may embed a token grant so the user lands signed in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailResponse {
    /// Human-readable outcome message.
    pub message: String,
    /// Access token, when the backend signs the user in on verification.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh token, when present alongside the access token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// The verified user, when the backend signs the user in.
    #[serde(default)]
    pub user: Option<User>,
}

/// Generic message-only response used by resend/forgot/reset endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    /// Human-readable outcome message.
    pub message: String,
}
