//! User roles and account status.

use serde::{Deserialize, Serialize};

/// The role a user account holds on the platform.
///
/// This is a closed set: authorization checks and the navigation path table
/// match on it exhaustively, so adding a role is a compile-time-checked
/// change everywhere it matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Freshly registered account that has not completed onboarding yet.
    NewUser,
    /// A candidate searching and applying for jobs.
    JobSeeker,
    /// An employer posting jobs and reviewing applicants.
    Employer,
    /// A platform administrator.
    Admin,
}

impl UserRole {
    /// Whether this role has picked a side of the marketplace yet.
    ///
    /// `NewUser` accounts are routed through onboarding before they can
    /// reach a role-specific dashboard.
    #[must_use]
    pub const fn is_onboarded(self) -> bool {
        !matches!(self, Self::NewUser)
    }
}

/// Account lifecycle status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    /// Account is active and usable.
    #[default]
    Active,
    /// Account exists but the email address has not been verified.
    Unverified,
    /// Account has been suspended by an administrator.
    Suspended,
}
