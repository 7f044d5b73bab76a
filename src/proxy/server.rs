//! HTTP server for the search proxy.
//!
//! Mounts the plugin's routes under `/api/plugins/<id>` and adds a health
//! endpoint, request tracing and optional CORS.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::config::ServerConfig;
use super::{query_param, SearchProxy, PLUGIN_INFO};
use crate::error::ProxyError;

/// Error body returned for 4xx and 5xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::InvalidQuery => StatusCode::BAD_REQUEST,
            ProxyError::SearchFailed(_) | ProxyError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Routes owned by the plugin, relative to its mount path.
fn plugin_routes() -> Router<Arc<SearchProxy>> {
    Router::new().route("/search", get(search_handler))
}

/// Build the full application router.
pub fn router(proxy: Arc<SearchProxy>, cors_enabled: bool) -> Router {
    let app = Router::new()
        .route("/health", get(health_handler))
        .nest(&PLUGIN_INFO.mount_path(), plugin_routes())
        .with_state(proxy)
        .layer(TraceLayer::new_for_http());

    if cors_enabled {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

/// Search handler.
async fn search_handler(
    State(proxy): State<Arc<SearchProxy>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    match proxy.handle_search(query_param(&params)).await {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Health check handler.
async fn health_handler() -> &'static str {
    "ok"
}

/// Search proxy HTTP server.
pub struct SearchProxyServer {
    proxy: Arc<SearchProxy>,
    config: ServerConfig,
}

impl SearchProxyServer {
    /// Create a new proxy server.
    pub fn new(proxy: SearchProxy, config: ServerConfig) -> Self {
        Self {
            proxy: Arc::new(proxy),
            config,
        }
    }

    /// Bind the configured address and serve until the process exits.
    pub async fn start(&self) -> Result<(), ProxyError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| ProxyError::Server(format!("Invalid address: {}", e)))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ProxyError::Server(e.to_string()))?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(&self, listener: tokio::net::TcpListener) -> Result<(), ProxyError> {
        let addr = listener
            .local_addr()
            .map_err(|e| ProxyError::Server(e.to_string()))?;
        tracing::info!(
            "{} plugin listening on http://{}{}",
            PLUGIN_INFO.name,
            addr,
            PLUGIN_INFO.search_path()
        );

        let app = router(self.proxy.clone(), self.config.cors_enabled);
        axum::serve(listener, app)
            .await
            .map_err(|e| ProxyError::Server(e.to_string()))
    }
}
