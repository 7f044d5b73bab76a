//! Google Custom Search JSON API backend.

use async_trait::async_trait;
use serde::Deserialize;

use super::SearchBackend;
use crate::error::SearchError;
use crate::types::SearchResult;

/// Public Custom Search endpoint.
pub const GOOGLE_CSE_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Search backend calling the Google Custom Search JSON API.
pub struct GoogleSearchBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
}

#[derive(Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Deserialize)]
struct CseItem {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
}

#[derive(Deserialize)]
struct CseErrorBody {
    error: CseErrorDetail,
}

#[derive(Deserialize)]
struct CseErrorDetail {
    message: String,
}

impl From<CseItem> for SearchResult {
    fn from(item: CseItem) -> Self {
        SearchResult {
            title: item.title,
            snippet: item.snippet,
            link: item.link,
        }
    }
}

impl GoogleSearchBackend {
    /// Create a backend against the public endpoint.
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: GOOGLE_CSE_ENDPOINT.to_string(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }

    /// Point the backend at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchBackend for GoogleSearchBackend {
    fn name(&self) -> &str {
        "google"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        if self.api_key.is_empty() || self.engine_id.is_empty() {
            return Err(SearchError::NotConfigured(
                "Google API key and engine id are required".to_string(),
            ));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<CseErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(SearchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: CseResponse = response.json().await?;
        Ok(body.items.into_iter().map(SearchResult::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use std::collections::HashMap;
    use std::net::SocketAddr;

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_maps_items() {
        let app = Router::new().route(
            "/cse",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params["key"], "k");
                assert_eq!(params["cx"], "c");
                Json(serde_json::json!({
                    "items": [
                        { "title": params["q"].clone(), "snippet": "s", "link": "https://a" },
                        { "title": "only title" }
                    ]
                }))
            }),
        );
        let addr = serve(app).await;

        let backend = GoogleSearchBackend::new("k", "c").with_endpoint(format!("http://{}/cse", addr));
        let results = backend.search("rust lang").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title(), "rust lang");
        assert_eq!(results[0].link(), "https://a");
        assert_eq!(results[1].snippet(), "");
    }

    #[tokio::test]
    async fn test_missing_items_is_empty() {
        let app = Router::new().route("/cse", get(|| async { Json(serde_json::json!({})) }));
        let addr = serve(app).await;

        let backend = GoogleSearchBackend::new("k", "c").with_endpoint(format!("http://{}/cse", addr));
        assert!(backend.search("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_error_message() {
        let app = Router::new().route(
            "/cse",
            get(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(serde_json::json!({ "error": { "code": 403, "message": "quota" } })),
                )
            }),
        );
        let addr = serve(app).await;

        let backend = GoogleSearchBackend::new("k", "c").with_endpoint(format!("http://{}/cse", addr));
        match backend.search("q").await {
            Err(SearchError::Http { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "quota");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_configured() {
        let backend = GoogleSearchBackend::new("", "c");
        assert!(matches!(
            backend.search("q").await,
            Err(SearchError::NotConfigured(_))
        ));
    }
}
