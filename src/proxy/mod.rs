//! Search proxy plugin.
//!
//! Exposes one HTTP endpoint that forwards a query to the configured
//! [`SearchBackend`] and returns the backend's result list unchanged.
//!
//! ```text
//! GET /api/plugins/google-search/search?query=<urlencoded>
//!   200  [{"title": ..., "snippet": ..., "link": ...}, ...]
//!   400  {"error": "Query parameter is missing or invalid."}
//!   500  {"error": "An error occurred while performing the search."}
//! ```
//!
//! The proxy neither paginates nor truncates; limiting is the caller's job.

pub mod config;
pub mod server;

pub use config::ProxyConfig;
pub use server::{router, SearchProxyServer};

use std::sync::Arc;

use crate::error::ProxyError;
use crate::search::SearchBackend;
use crate::types::SearchResult;

/// Plugin metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// The search proxy plugin descriptor.
pub const PLUGIN_INFO: PluginInfo = PluginInfo {
    id: "google-search",
    name: "Google Search",
    description: "A plugin that performs Google searches through an API endpoint.",
};

impl PluginInfo {
    /// Path prefix the plugin's routes are mounted under.
    pub fn mount_path(&self) -> String {
        format!("/api/plugins/{}", self.id)
    }

    /// Full path of the search endpoint.
    pub fn search_path(&self) -> String {
        format!("{}/search", self.mount_path())
    }
}

/// Route handler logic, independent of the HTTP framework.
pub struct SearchProxy {
    backend: Arc<dyn SearchBackend>,
}

impl SearchProxy {
    /// Create a proxy in front of a backend.
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Validate the query and run it against the backend.
    ///
    /// An absent or empty query is rejected without touching the backend.
    /// Backend failures are logged and collapsed into a generic error.
    pub async fn handle_search(&self, query: Option<&str>) -> Result<Vec<SearchResult>, ProxyError> {
        let query = match query {
            Some(q) if !q.is_empty() => q,
            _ => return Err(ProxyError::InvalidQuery),
        };

        tracing::info!("Performing {} search for: \"{}\"", self.backend.name(), query);

        match self.backend.search(query).await {
            Ok(results) => {
                tracing::info!("Found {} results.", results.len());
                Ok(results)
            }
            Err(e) => {
                tracing::error!("Error during {} search: {}", self.backend.name(), e);
                Err(ProxyError::SearchFailed(e))
            }
        }
    }
}

/// Pick the single `query` value out of decoded query-string pairs.
///
/// A repeated parameter is not a string, so it counts as invalid.
pub fn query_param(pairs: &[(String, String)]) -> Option<&str> {
    let mut values = pairs.iter().filter(|(k, _)| k == "query").map(|(_, v)| v.as_str());
    match (values.next(), values.next()) {
        (Some(value), None) => Some(value),
        _ => None,
    }
}
