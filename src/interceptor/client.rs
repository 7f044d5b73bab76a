//! HTTP client for the search proxy.

use async_trait::async_trait;

use crate::error::InterceptError;
use crate::proxy::PLUGIN_INFO;
use crate::types::SearchResult;

/// Where the interceptor sends extracted queries.
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, InterceptError>;
}

/// Calls the search proxy endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    search_url: String,
}

impl ProxyClient {
    /// Create a client for a proxy at `base_url`, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            search_url: format!("{}{}", base_url.trim_end_matches('/'), PLUGIN_INFO.search_path()),
        }
    }

    /// Full URL of the search endpoint.
    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

#[async_trait]
impl SearchService for ProxyClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, InterceptError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or(status.as_str());
            return Err(InterceptError::Status(reason.to_string()));
        }

        Ok(response.json().await?)
    }
}
