//! # websearch-tool
//!
//! Web search for chat generation.
//!
//! ## Overview
//!
//! Two loosely coupled components:
//!
//! - **Search proxy**: an HTTP plugin exposing
//!   `GET /api/plugins/google-search/search?query=...` in front of a
//!   [`search::SearchBackend`].
//! - **Generation interceptor**: middleware installed in place of the host's
//!   generator. When model output contains a search command such as
//!   `(search:"capital of France")`, it queries the proxy, injects the
//!   formatted results as a system message and generates again.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use websearch_tool::{GenerateOptions, Generator, ProxyClient, SearchInterceptor, SettingsStore};
//!
//! let settings = SettingsStore::open("settings.json", websearch_tool::settings::EXTENSION_NAME)?;
//! let interceptor = SearchInterceptor::new(
//!     host_generator,
//!     chat_host,
//!     Arc::new(ProxyClient::new("http://127.0.0.1:8000")),
//!     settings,
//! );
//! let output = interceptor.generate(GenerateOptions::new()).await?;
//! ```

pub mod types;
pub mod error;
pub mod settings;
pub mod search;
pub mod proxy;
pub mod interceptor;
pub mod cli;

// Re-export commonly used types
pub use types::{
    ChatMessage,
    GenerateOptions,
    Generation,
    GenerationChoice,
    NoticeKind,
    SearchResult,
};
pub use error::{Error, Result};
pub use settings::{Settings, SettingsStore, TriggerPattern};
pub use proxy::{ProxyConfig, SearchProxy, SearchProxyServer};
pub use interceptor::{ChatHost, Generator, ProxyClient, SearchInterceptor, SearchService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
