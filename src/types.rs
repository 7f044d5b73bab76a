//! Core types for websearch-tool.
//!
//! This module defines the values that cross the two boundaries of the system:
//! search results travelling over HTTP, and the generation options, outputs and
//! chat messages exchanged with the host runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single web search hit.
///
/// Fields are optional on the wire because backends are not required to fill
/// all of them. Formatting renders a missing field as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl SearchResult {
    /// Create a fully populated result.
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            snippet: Some(snippet.into()),
            link: Some(link.into()),
        }
    }

    /// Title or empty string.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Snippet or empty string.
    pub fn snippet(&self) -> &str {
        self.snippet.as_deref().unwrap_or("")
    }

    /// Link or empty string.
    pub fn link(&self) -> &str {
        self.link.as_deref().unwrap_or("")
    }
}

/// Options passed to the host's generation entry point.
///
/// Host-specific fields the interceptor does not understand are kept in
/// `extra` and forwarded untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Ask the host to skip output post-processing.
    #[serde(default)]
    pub raw: bool,

    /// Re-entry marker: this call follows an injected search result.
    #[serde(default, rename = "is_system_message_after_search")]
    pub after_search: bool,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GenerateOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of these options with raw output requested.
    pub fn with_raw(&self) -> Self {
        Self {
            raw: true,
            ..self.clone()
        }
    }

    /// Copy of these options carrying the re-entry marker.
    pub fn with_after_search(&self) -> Self {
        Self {
            after_search: true,
            ..self.clone()
        }
    }
}

/// One candidate produced by a generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationChoice {
    pub text: String,
}

/// Output of a generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    #[serde(default)]
    pub results: Vec<GenerationChoice>,
}

impl Generation {
    /// Build a generation with a single candidate.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            results: vec![GenerationChoice { text: text.into() }],
        }
    }

    /// Text of the first candidate, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.results.first().map(|c| c.text.as_str())
    }
}

/// A message appended to the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub name: String,
    pub is_system: bool,
    pub is_user: bool,
    /// Milliseconds since the Unix epoch.
    pub send_date: i64,
    pub mes: String,
}

impl ChatMessage {
    /// Create a system message stamped with the current time.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            name: "System".to_string(),
            is_system: true,
            is_user: false,
            send_date: chrono::Utc::now().timestamp_millis(),
            mes: text.into(),
        }
    }
}

/// Kind of a transient notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    System,
    Error,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeKind::System => write!(f, "system"),
            NoticeKind::Error => write!(f, "error"),
        }
    }
}
