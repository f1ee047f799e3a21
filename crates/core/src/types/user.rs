//! User domain types.
//!
//! The [`User`] record is the session's cached profile. It round-trips
//! through durable client storage as JSON, so it carries the backend's
//! `camelCase` field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::email::Email;
use crate::types::id::UserId;
use crate::types::role::{AccountStatus, UserRole};

/// A JobHub user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID issued by the backend.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role on the platform.
    pub user_type: UserRole,
    /// Account lifecycle status.
    #[serde(default)]
    pub status: AccountStatus,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Short professional headline.
    #[serde(default)]
    pub headline: Option<String>,
    /// Free-form location string.
    #[serde(default)]
    pub location: Option<String>,
    /// About/bio section.
    #[serde(default)]
    pub about: Option<String>,
    /// Skill tags.
    #[serde(default)]
    pub skills: Vec<String>,
    /// When the account was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Apply a shallow patch to this profile, field by field.
    ///
    /// Only fields present in the patch are overwritten; everything else is
    /// left as-is. This mirrors a partial profile update coming back from
    /// an edit form.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(user_type) = patch.user_type {
            self.user_type = user_type;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(headline) = patch.headline {
            self.headline = Some(headline);
        }
        if let Some(location) = patch.location {
            self.location = Some(location);
        }
        if let Some(about) = patch.about {
            self.about = Some(about);
        }
        if let Some(skills) = patch.skills {
            self.skills = skills;
        }
    }
}

/// A shallow, partial update to a [`User`] profile.
///
/// `None` means "leave the field alone". Identity fields (`id`, `email`,
/// `status`, `created_at`) are owned by the backend and cannot be patched
/// locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New role (set once at onboarding).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserRole>,
    /// New avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// New headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    /// New location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New about section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    /// Replacement skill list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}
