//! Search backends.
//!
//! The proxy does not know which search engine it fronts. It holds a
//! [`SearchBackend`] and forwards whatever list the backend returns.

mod google;

pub use google::{GoogleSearchBackend, GOOGLE_CSE_ENDPOINT};

use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::SearchResult;

/// Trait that all search backends must implement.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend identifier, used in logs.
    fn name(&self) -> &str;

    /// Run a query and return the results in ranking order.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}
