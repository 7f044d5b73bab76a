//! Contracts the host chat runtime provides.
//!
//! The interceptor never reaches into host globals. The host hands it a
//! [`Generator`] (its raw generation entry point) and a [`ChatHost`] (message
//! store, notices, pending input, UI lock), then installs the interceptor, which
//! is itself a [`Generator`], in place of the raw one.

use async_trait::async_trait;

use crate::error::HostError;
use crate::types::{ChatMessage, GenerateOptions, Generation, NoticeKind};

/// A generation entry point.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run generation. Implementations must honour `options.raw` and ignore
    /// fields they do not understand.
    async fn generate(&self, options: GenerateOptions) -> Result<Generation, HostError>;
}

/// Host services used around a generation call.
#[async_trait]
pub trait ChatHost: Send + Sync {
    /// Append a message to the conversation transcript.
    async fn add_message(&self, message: ChatMessage) -> Result<(), HostError>;

    /// Show a transient notice to the user.
    fn send_system_message(&self, kind: NoticeKind, text: &str);

    /// The user's pending input.
    fn user_input(&self) -> String;

    /// Replace the user's pending input.
    fn set_user_input(&self, input: String);

    /// Enable or disable the send and regenerate controls.
    fn set_ui_lock(&self, locked: bool);
}
