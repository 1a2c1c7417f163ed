//! Remote seed loader.
//!
//! Fetches the static employee collection the directory is seeded from.

use std::time::Duration;

use reqwest::Client;

use crate::errors::AppError;
use crate::models::Employee;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the static seed resource.
#[derive(Clone)]
pub struct SeedLoader {
    client: Client,
    url: String,
}

impl SeedLoader {
    pub fn new(url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one `GET` and decode the employee array.
    ///
    /// Transport failures, non-success statuses and undecodable bodies all
    /// surface as [`AppError::Fetch`].
    pub async fn fetch(&self) -> Result<Vec<Employee>, AppError> {
        tracing::debug!(url = %self.url, "Fetching remote seed");

        let employees = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Employee>>()
            .await?;

        tracing::info!(url = %self.url, count = employees.len(), "Fetched remote seed");
        Ok(employees)
    }
}
