//! Generation interceptor.
//!
//! Wraps the host's generation entry point. After a raw generation it looks for
//! the trigger pattern in the first candidate; on a match it searches through
//! the proxy, injects the formatted results as a system message and generates
//! once more with the re-entry marker set.
//!
//! ```text
//! generate(options)
//!   ├─ after_search marker ──────────────▶ inner.generate(options)
//!   ├─ manual mode, idle ─ prepend search directive to user input
//!   ├─ no mode enabled ──────────────────▶ inner.generate(options)
//!   └─ inner.generate(raw) ─ trigger? ─ no ─▶ raw generation
//!                               │ yes
//!                         busy? ─ yes ─▶ raw generation (dropped)
//!                               │ no
//!                         proxy search ─ err ─▶ error notice, raw generation
//!                               │ ok
//!                         add system message ─▶ generate(options + marker)
//! ```
//!
//! Search failures and dropped searches never surface as errors to the host.
//! Errors from the host's own generator or message store are passed through.

pub mod client;
pub mod format;
pub mod host;

pub use client::{ProxyClient, SearchService};
pub use format::{format_item, format_items, format_results, render};
pub use host::{ChatHost, Generator};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HostError;
use crate::settings::SettingsStore;
use crate::types::{ChatMessage, GenerateOptions, Generation, NoticeKind, SearchResult};

/// Directive prepended to the user's input in manual mode.
pub const FORCE_SEARCH_INSTRUCTION: &str = "[SYSTEM INSTRUCTION: Before answering the user, you MUST first decide on a web search query that will help you formulate the best possible answer. Output ONLY the search command in the format (search:\"your query here\"). Do not say anything else.]";

/// Notice shown while a search is running.
pub const SEARCH_NOTICE: &str = "Performing web search...";

/// One-search-at-a-time gate.
#[derive(Debug, Default)]
struct BusyFlag(AtomicBool);

impl BusyFlag {
    fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(&self.0))
    }

    fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the busy flag when dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Clears the host UI lock when dropped.
struct UiUnlock<'a>(&'a dyn ChatHost);

impl Drop for UiUnlock<'_> {
    fn drop(&mut self) {
        self.0.set_ui_lock(false);
    }
}

/// Search-aware generation middleware.
pub struct SearchInterceptor {
    inner: Arc<dyn Generator>,
    host: Arc<dyn ChatHost>,
    search: Arc<dyn SearchService>,
    settings: SettingsStore,
    busy: BusyFlag,
}

impl SearchInterceptor {
    /// Wrap `inner`, the host's raw generator.
    pub fn new(
        inner: Arc<dyn Generator>,
        host: Arc<dyn ChatHost>,
        search: Arc<dyn SearchService>,
        settings: SettingsStore,
    ) -> Self {
        Self {
            inner,
            host,
            search,
            settings,
            busy: BusyFlag::default(),
        }
    }

    /// Settings the interceptor reads on every call.
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Whether a search is in flight.
    pub fn is_searching(&self) -> bool {
        self.busy.is_busy()
    }

    /// Search for `query`, keeping at most `limit` results.
    ///
    /// Returns `None` without any request if another search is in flight, and
    /// `None` after notifying the user if the search fails.
    pub async fn perform_search(&self, query: &str, limit: usize) -> Option<Vec<SearchResult>> {
        let Some(_busy) = self.busy.try_acquire() else {
            tracing::debug!("Search already in progress, dropping query '{}'", query);
            return None;
        };

        self.host.set_ui_lock(true);
        self.host.send_system_message(NoticeKind::System, SEARCH_NOTICE);

        match self.search.search(query).await {
            Ok(mut results) => {
                results.truncate(limit);
                tracing::info!("Search for '{}' returned {} results", query, results.len());
                Some(results)
            }
            Err(e) => {
                tracing::error!("Web search for '{}' failed: {}", query, e);
                self.host
                    .send_system_message(NoticeKind::Error, &format!("Web search failed: {}", e));
                None
            }
        }
    }

    async fn intercept(&self, options: GenerateOptions) -> Result<Generation, HostError> {
        if options.after_search {
            return self.inner.generate(options).await;
        }

        let active = self.settings.snapshot().await;
        let settings = &active.settings;

        if settings.manual_enabled && !self.busy.is_busy() {
            let input = self.host.user_input();
            self.host
                .set_user_input(format!("{}\n\nUSER: {}", FORCE_SEARCH_INSTRUCTION, input));
        }

        if !settings.search_enabled() {
            return self.inner.generate(options).await;
        }

        let response = self.inner.generate(options.with_raw()).await?;

        let Some(query) = response.first_text().and_then(|t| active.trigger.extract_query(t)) else {
            return Ok(response);
        };
        tracing::debug!("Trigger matched, query: '{}'", query);

        let Some(results) = self.perform_search(&query, settings.result_count).await else {
            return Ok(response);
        };

        let message = format_results(settings, &query, &results);
        self.host.add_message(ChatMessage::system(message)).await?;

        self.generate(options.with_after_search()).await
    }
}

#[async_trait]
impl Generator for SearchInterceptor {
    async fn generate(&self, options: GenerateOptions) -> Result<Generation, HostError> {
        let _unlock = UiUnlock(self.host.as_ref());
        self.intercept(options).await
    }
}
