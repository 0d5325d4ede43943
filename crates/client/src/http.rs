//! HTTP search backend

use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};
use wfo_search_core::error::Result;
use wfo_search_core::{EntityKind, SearchBackend, SearchParameters, SearchResponse, SearchResult};

/// Path under the base URL that hosts the per-kind search endpoints
const SEARCH_API_PATH: &str = "api/search";

/// Search backend speaking JSON over HTTP
pub struct HttpSearchBackend {
    client: Client,
    base_url: String,
}

impl HttpSearchBackend {
    /// Create a new HTTP search backend
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the search service (e.g., "http://127.0.0.1:8081")
    /// * `timeout_secs` - Request timeout in seconds
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        info!("Initializing HTTP search backend");
        info!("  Base URL: {base_url}");
        info!("  Timeout: {timeout_secs}s");

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the search endpoint for `kind`
    pub fn endpoint(&self, kind: EntityKind) -> String {
        format!(
            "{}/{SEARCH_API_PATH}/{}",
            self.base_url,
            kind.endpoint_path()
        )
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(
        &self,
        kind: EntityKind,
        parameters: &SearchParameters,
    ) -> Result<Vec<SearchResult>> {
        let endpoint = self.endpoint(kind);
        debug!(
            "POST {endpoint}: query={:?}, {} filter(s)",
            parameters.query,
            parameters.filters().len()
        );

        let response = self
            .client
            .post(&endpoint)
            .json(parameters)
            .send()
            .await
            .map_err(|e| {
                let err = ClientError::from_reqwest(&e);
                warn!("Search request to {endpoint} failed: {err}");
                err
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!("Search endpoint {endpoint} returned {status}: {body}");
            return Err(ClientError::StatusError {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let page: SearchResponse = response
            .json()
            .await
            .map_err(|e| ClientError::DecodeError(e.to_string()))?;

        let unknown = page.page.iter().filter(|r| r.is_unknown()).count();
        if unknown > 0 {
            warn!(
                "{unknown} of {} {kind} results could not be classified",
                page.page.len()
            );
        }
        debug!("Search on {endpoint} returned {} results", page.page.len());

        Ok(page.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_per_kind() {
        let backend = HttpSearchBackend::new("http://127.0.0.1:8081/", 5).unwrap();
        assert_eq!(
            backend.endpoint(EntityKind::Subscription),
            "http://127.0.0.1:8081/api/search/subscriptions"
        );
        assert_eq!(
            backend.endpoint(EntityKind::Process),
            "http://127.0.0.1:8081/api/search/processes"
        );
    }
}
