//! Session error types and user-facing categorization.

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Durable storage could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cached user record could not be encoded.
    #[error("failed to encode cached user: {0}")]
    Encode(#[from] serde_json::Error),

    /// The operation requires an authenticated session.
    #[error("not signed in")]
    NotAuthenticated,

    /// No refresh token is available to exchange.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// The backend answered with a shape the flow cannot use.
    #[error("unexpected response from server: {0}")]
    UnexpectedResponse(String),
}

impl SessionError {
    /// Message suitable for inline display next to a form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(error) => error.message(),
            Self::Storage(_) => "Could not save your session on this device.".to_owned(),
            Self::NotAuthenticated | Self::MissingRefreshToken => {
                "Your session has expired. Please sign in again.".to_owned()
            }
            Self::Encode(_) | Self::UnexpectedResponse(_) => {
                "Something went wrong. Please try again.".to_owned()
            }
        }
    }
}

/// Category of a failed login attempt, driving the recovery action the UI
/// offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginErrorCategory {
    /// Wrong email or password.
    InvalidCredentials,
    /// The account exists but its email is unverified; offer a resend.
    EmailUnverified,
    /// The account is locked (too many attempts, admin action).
    AccountLocked,
    /// The server could not be reached at all.
    Network,
    /// Anything else.
    Other,
}

impl LoginErrorCategory {
    /// Classify a login failure by its server message.
    ///
    /// Matching is a case-insensitive substring check on the message text:
    /// the backend's wording varies ("Email not verified", "pending
    /// verification"), so the stem `verif` covers the family.
    #[must_use]
    pub fn classify(error: &SessionError) -> Self {
        match error {
            SessionError::Api(ApiError::Http(_)) => Self::Network,
            SessionError::Api(ApiError::Backend { status, message }) => {
                let lowered = message.to_lowercase();
                if lowered.contains("verif") {
                    Self::EmailUnverified
                } else if lowered.contains("lock") {
                    Self::AccountLocked
                } else if *status == 401
                    || lowered.contains("invalid")
                    || lowered.contains("credential")
                    || lowered.contains("password")
                {
                    Self::InvalidCredentials
                } else {
                    Self::Other
                }
            }
            _ => Self::Other,
        }
    }

    /// Whether the UI should offer a "resend verification email" action.
    #[must_use]
    pub const fn is_resend_eligible(self) -> bool {
        matches!(self, Self::EmailUnverified)
    }
}
