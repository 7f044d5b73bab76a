//! Search proxy configuration.
//!
//! This module provides configuration management for the proxy server,
//! including bind address, search backend credentials and logging.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::search::GOOGLE_CSE_ENDPOINT;

/// Search proxy configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Google Custom Search credentials
    #[serde(default)]
    pub google: GoogleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
}

/// Google Custom Search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// API key
    #[serde(default)]
    pub api_key: String,

    /// Programmable search engine id (`cx`)
    #[serde(default)]
    pub engine_id: String,

    /// API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    GOOGLE_CSE_ENDPOINT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_true(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            engine_id: String::new(),
            endpoint: default_endpoint(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ProxyConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration, falling back to defaults if the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Save configuration to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validate the configuration before serving.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Note: port 0 is valid - it means "let the OS assign a port"

        if self.google.api_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired("google.api_key".to_string()));
        }

        if self.google.engine_id.trim().is_empty() {
            return Err(ConfigError::MissingRequired("google.engine_id".to_string()));
        }

        if !self.google.endpoint.starts_with("http://") && !self.google.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "google.endpoint".to_string(),
                reason: "Endpoint must be an http(s) URL".to_string(),
            });
        }

        Ok(())
    }

    /// Get the server address string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
