//! Settings persistence.
//!
//! Settings live in a JSON object keyed by extension identifier, so several
//! extensions can share one file. Mutations are applied in memory immediately
//! and written to disk after a quiet period.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{ActiveSettings, Settings};
use crate::error::ConfigError;

/// Quiet period before a burst of changes is written out.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Shared, persisted settings for one extension.
///
/// Cloning is cheap and all clones see the same record.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    extension_id: String,
    path: Option<PathBuf>,
    active: RwLock<ActiveSettings>,
    /// Bumped on every scheduled save; only the latest ticket writes.
    save_ticket: AtomicU64,
    debounce: Duration,
}

impl SettingsStore {
    /// Open the settings file, creating the record with defaults if absent.
    ///
    /// A missing file is not an error. A stored trigger pattern that does not
    /// compile is.
    pub fn open<P: AsRef<Path>>(path: P, extension_id: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = match read_all(path)?.remove(extension_id) {
            Some(value) => serde_json::from_value::<Settings>(value)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
            None => {
                tracing::debug!("No settings for '{}', using defaults", extension_id);
                Settings::default()
            }
        };

        Ok(Self::build(extension_id, Some(path.to_path_buf()), settings.activate()?))
    }

    /// A store that never touches the filesystem.
    pub fn in_memory(settings: Settings) -> Result<Self, ConfigError> {
        Ok(Self::build(super::EXTENSION_NAME, None, settings.activate()?))
    }

    fn build(extension_id: &str, path: Option<PathBuf>, active: ActiveSettings) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                extension_id: extension_id.to_string(),
                path,
                active: RwLock::new(active),
                save_ticket: AtomicU64::new(0),
                debounce: DEFAULT_SAVE_DEBOUNCE,
            }),
        }
    }

    /// Override the save debounce window. Only valid before the store is shared.
    pub fn with_debounce(self, debounce: Duration) -> Self {
        match Arc::try_unwrap(self.inner) {
            Ok(mut inner) => {
                inner.debounce = debounce;
                Self {
                    inner: Arc::new(inner),
                }
            }
            Err(inner) => Self { inner },
        }
    }

    pub fn extension_id(&self) -> &str {
        &self.inner.extension_id
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Current settings with their compiled trigger.
    pub async fn snapshot(&self) -> ActiveSettings {
        self.inner.active.read().await.clone()
    }

    /// Current settings record.
    pub async fn settings(&self) -> Settings {
        self.inner.active.read().await.settings.clone()
    }

    /// Apply a change, revalidate, and schedule a save.
    ///
    /// The record is left untouched if the change fails validation.
    pub async fn update<F>(&self, change: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut Settings) -> Result<(), ConfigError>,
    {
        {
            let mut active = self.inner.active.write().await;
            let mut next = active.settings.clone();
            change(&mut next)?;
            *active = next.activate()?;
        }
        self.save_debounced();
        Ok(())
    }

    pub async fn set_manual_enabled(&self, enabled: bool) -> Result<(), ConfigError> {
        self.update(|s| {
            s.manual_enabled = enabled;
            Ok(())
        })
        .await
    }

    pub async fn set_auto_enabled(&self, enabled: bool) -> Result<(), ConfigError> {
        self.update(|s| {
            s.auto_enabled = enabled;
            Ok(())
        })
        .await
    }

    pub async fn set_trigger_regex(&self, pattern: &str) -> Result<(), ConfigError> {
        let pattern = pattern.to_string();
        self.update(move |s| {
            s.trigger_regex = pattern;
            Ok(())
        })
        .await
    }

    pub async fn set_result_count(&self, count: usize) -> Result<(), ConfigError> {
        self.update(|s| {
            s.result_count = count;
            Ok(())
        })
        .await
    }

    pub async fn set_wrapper_template(&self, template: &str) -> Result<(), ConfigError> {
        let template = template.to_string();
        self.update(move |s| {
            s.wrapper_template = template;
            Ok(())
        })
        .await
    }

    pub async fn set_item_template(&self, template: &str) -> Result<(), ConfigError> {
        let template = template.to_string();
        self.update(move |s| {
            s.item_template = template;
            Ok(())
        })
        .await
    }

    /// Restore the default record.
    pub async fn reset(&self) -> Result<(), ConfigError> {
        self.update(|s| {
            *s = Settings::default();
            Ok(())
        })
        .await
    }

    /// Schedule a write after the debounce window.
    ///
    /// A later call within the window supersedes this one. Must be called from
    /// within a tokio runtime.
    pub fn save_debounced(&self) {
        if self.inner.path.is_none() {
            return;
        }

        let ticket = self.inner.save_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let store = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(store.inner.debounce).await;
            if store.inner.save_ticket.load(Ordering::SeqCst) != ticket {
                return;
            }
            if let Err(e) = store.flush().await {
                tracing::warn!("Failed to save settings: {}", e);
            }
        });
    }

    /// Write the current record now, preserving other extensions' entries.
    pub async fn flush(&self) -> Result<(), ConfigError> {
        let Some(path) = self.inner.path.as_deref() else {
            return Ok(());
        };

        let settings = self.settings().await;
        let mut all = read_all(path)?;
        all.insert(
            self.inner.extension_id.clone(),
            serde_json::to_value(&settings).map_err(|e| ConfigError::ParseError(e.to_string()))?,
        );

        let contents = serde_json::to_string_pretty(&Value::Object(all))
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        }
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        tracing::debug!("Saved settings for '{}' to {}", self.inner.extension_id, path.display());
        Ok(())
    }
}

fn read_all(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    if !path.exists() {
        return Ok(Map::new());
    }

    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    match serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))? {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::ParseError(format!(
            "{}: expected a JSON object",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EXTENSION_NAME;

    #[tokio::test]
    async fn test_open_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.json"), EXTENSION_NAME).unwrap();
        assert_eq!(store.extension_id(), EXTENSION_NAME);
        assert_eq!(store.settings().await, Settings::default());
    }

    #[test]
    fn test_open_rejects_bad_stored_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"google-search-tool":{"triggerRegex":"(("}}"#).unwrap();

        assert!(matches!(
            SettingsStore::open(&path, EXTENSION_NAME),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_flush_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"other-extension":{"enabled":true}}"#).unwrap();

        let store = SettingsStore::open(&path, EXTENSION_NAME).unwrap();
        tokio_test::assert_ok!(store.set_result_count(8).await);
        tokio_test::assert_ok!(store.set_manual_enabled(true).await);
        tokio_test::assert_ok!(store.flush().await);

        let reopened = SettingsStore::open(&path, EXTENSION_NAME).unwrap();
        let settings = reopened.settings().await;
        assert_eq!(settings.result_count, 8);
        assert!(settings.manual_enabled);

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["other-extension"]["enabled"], true);
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected() {
        let store = SettingsStore::in_memory(Settings::default()).unwrap();
        tokio_test::assert_err!(store.set_trigger_regex("[").await);
        assert_eq!(store.settings().await.trigger_regex, Settings::default().trigger_regex);

        store.set_trigger_regex(r"<q>(.+)</q>").await.unwrap();
        let active = store.snapshot().await;
        assert_eq!(active.trigger.as_str(), r"<q>(.+)</q>");
        assert_eq!(active.trigger.extract_query("<Q>news</Q>").as_deref(), Some("news"));
    }

    #[tokio::test]
    async fn test_debounced_save_coalesces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::open(&path, EXTENSION_NAME)
            .unwrap()
            .with_debounce(Duration::from_millis(20));

        store.set_result_count(1).await.unwrap();
        store.set_result_count(2).await.unwrap();
        store.set_item_template("{{title}}").await.unwrap();
        assert!(!path.exists());

        tokio::time::sleep(Duration::from_millis(300)).await;

        let reopened = SettingsStore::open(&path, EXTENSION_NAME).unwrap();
        let settings = reopened.settings().await;
        assert_eq!(settings.result_count, 2);
        assert_eq!(settings.item_template, "{{title}}");
    }

    #[tokio::test]
    async fn test_reset() {
        let store = SettingsStore::in_memory(Settings::default()).unwrap();
        store.set_auto_enabled(false).await.unwrap();
        store.set_wrapper_template("{{results}}").await.unwrap();
        store.reset().await.unwrap();
        assert_eq!(store.settings().await, Settings::default());
    }
}
