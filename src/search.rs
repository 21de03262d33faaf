//! Search API client.

use crate::config::Settings;
use crate::schema::SearchResponse;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{status} from search API: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can answer a part query.
#[async_trait::async_trait]
pub trait PartSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;
}

/// Build `{base}/search?q=<query>` with the query percent-encoded.
/// `/` stays unencoded.
pub fn search_url(api_base: &str, query: &str) -> String {
    format!(
        "{}/search?q={}",
        api_base.trim_end_matches('/'),
        urlencoding::encode(query).replace("%2F", "/")
    )
}

/// HTTP client for the configured search API.
#[derive(Clone)]
pub struct HttpSearchClient {
    client: reqwest::Client,
    api_base: String,
    timeout: Duration,
}

impl HttpSearchClient {
    pub fn new(client: reqwest::Client, settings: &Settings) -> Self {
        Self {
            client,
            api_base: settings.api_base.clone(),
            timeout: settings.search_timeout,
        }
    }
}

#[async_trait::async_trait]
impl PartSearch for HttpSearchClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        if self.api_base.is_empty() {
            debug!("No API_BASE configured, returning empty result set");
            return Ok(SearchResponse::empty());
        }

        let url = search_url(&self.api_base, query);
        debug!("Searching: {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&bytes)?;

        info!(
            "Search returned count={} ({} items)",
            parsed.count,
            parsed.results.len()
        );
        Ok(parsed)
    }
}
