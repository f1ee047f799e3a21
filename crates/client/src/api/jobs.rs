//! Job and company repository.
//!
//! Listing pages and the navigation selection flow consume data through
//! [`JobRepository`], keeping them decoupled from wire shapes. The search
//! endpoints are public; no bearer token is attached.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use jobhub_core::{Company, CompanyId, JobId, JobSummary};

use crate::config::ClientConfig;

use super::{ApiError, handle_response};

/// Filters for a job search.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    /// Free-text keywords.
    pub keywords: Option<String>,
    /// Location filter (may be "Remote").
    pub location: Option<String>,
    /// Employment type filter, e.g. "Full-time".
    pub job_type: Option<String>,
}

impl JobQuery {
    fn to_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(keywords) = self.keywords.as_deref() {
            params.push(("search", keywords));
        }
        if let Some(location) = self.location.as_deref() {
            params.push(("location", location));
        }
        if let Some(job_type) = self.job_type.as_deref() {
            params.push(("type", job_type));
        }
        params
    }
}

/// Read access to job listings and company profiles.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// `GET /jobs` with optional search filters.
    async fn search_jobs(&self, query: &JobQuery) -> Result<Vec<JobSummary>, ApiError>;

    /// `GET /jobs/{id}`.
    async fn fetch_job(&self, id: &JobId) -> Result<JobSummary, ApiError>;

    /// `GET /companies/{id}`.
    async fn fetch_company(&self, id: &CompanyId) -> Result<Company, ApiError>;
}

/// HTTP implementation of [`JobRepository`].
#[derive(Clone)]
pub struct HttpJobClient {
    inner: Arc<HttpJobClientInner>,
}

struct HttpJobClientInner {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpJobClient {
    /// Create a new job repository client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(HttpJobClientInner {
                client,
                config: config.clone(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        self.inner.config.endpoint(path)
    }
}

#[async_trait]
impl JobRepository for HttpJobClient {
    #[instrument(skip(self, query))]
    async fn search_jobs(&self, query: &JobQuery) -> Result<Vec<JobSummary>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url("/jobs"))
            .query(&query.to_params())
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn fetch_job(&self, id: &JobId) -> Result<JobSummary, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/jobs/{id}")))
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip(self), fields(company_id = %id))]
    async fn fetch_company(&self, id: &CompanyId) -> Result<Company, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/companies/{id}")))
            .send()
            .await?;
        handle_response(response).await
    }
}
