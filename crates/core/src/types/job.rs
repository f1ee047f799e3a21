//! Job listing types.

use serde::{Deserialize, Serialize};

use crate::types::id::{CompanyId, JobId};

/// A company profile as shown on the company-profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Unique company ID.
    pub id: CompanyId,
    /// Company display name.
    pub name: String,
    /// Logo image URL.
    #[serde(default)]
    pub logo: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Headquarters location.
    #[serde(default)]
    pub location: Option<String>,
    /// Number of open roles currently listed.
    #[serde(default)]
    pub open_roles: u32,
}

/// A job listing as shown in search results and carried into the
/// job-details page.
///
/// Navigation holds the most recent [`JobSummary`] selection; the details
/// page renders from it while richer data loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    /// Unique job ID.
    pub id: JobId,
    /// Job title.
    pub title: String,
    /// Display name of the hiring company.
    pub company: String,
    /// ID of the hiring company, for the company-profile page.
    pub company_id: CompanyId,
    /// Free-form location (may be "Remote").
    #[serde(default)]
    pub location: Option<String>,
    /// Employment type tag, e.g. "Full-time".
    #[serde(default)]
    pub job_type: Option<String>,
    /// Human-readable posting age, e.g. "2 days ago".
    #[serde(default)]
    pub posted: Option<String>,
}
