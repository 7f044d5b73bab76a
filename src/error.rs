//! Error types for websearch-tool.
//!
//! This module defines all error types used throughout the system.

use thiserror::Error;

/// Main error type for websearch-tool operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Search proxy errors
    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    /// Search backend errors
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Interceptor-side search errors
    #[error("Intercept error: {0}")]
    Intercept(#[from] InterceptError),

    /// Errors raised by the host chat runtime
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for websearch-tool.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the search proxy endpoint.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Query parameter absent, repeated or empty. Maps to HTTP 400.
    #[error("Query parameter is missing or invalid.")]
    InvalidQuery,

    /// The backend failed. Maps to HTTP 500; the cause is only logged.
    #[error("An error occurred while performing the search.")]
    SearchFailed(#[source] SearchError),

    #[error("Server error: {0}")]
    Server(String),
}

/// Errors produced by a search backend.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Backend not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::InvalidResponse(err.to_string())
        } else {
            SearchError::Request(err.to_string())
        }
    }
}

/// Errors the interceptor sees when calling the search proxy over HTTP.
#[derive(Error, Debug)]
pub enum InterceptError {
    #[error("{0}")]
    Transport(String),

    #[error("API request failed: {0}")]
    Status(String),

    #[error("Invalid proxy response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for InterceptError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            InterceptError::Decode(err.to_string())
        } else {
            InterceptError::Transport(err.to_string())
        }
    }
}

/// Errors raised by the host's generation pipeline or message store.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Message append failed: {0}")]
    MessageStore(String),
}

/// Errors related to Configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid config value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Missing required config: {0}")]
    MissingRequired(String),

    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
