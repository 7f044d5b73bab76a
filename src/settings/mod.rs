//! Extension settings.
//!
//! A single flat settings record per extension identifier. Records are created
//! with defaults on first load, mutated through [`SettingsStore`] setters and
//! written back with a debounced save.
//!
//! The trigger pattern is compiled whenever a record is loaded or changed, so a
//! malformed pattern is reported as a configuration error up front and the
//! generation path only ever sees a valid [`TriggerPattern`].

pub mod store;
pub mod trigger;

pub use store::SettingsStore;
pub use trigger::{test_trigger, TriggerPattern, TriggerTest};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identifier the settings record is stored under.
pub const EXTENSION_NAME: &str = "google-search-tool";

/// User-editable extension settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Force the model to emit a search command before every answer
    #[serde(default)]
    pub manual_enabled: bool,

    /// Search whenever the model emits a search command on its own
    #[serde(default = "default_true")]
    pub auto_enabled: bool,

    /// Case-insensitive pattern; group 1 is the query
    #[serde(rename = "triggerRegex", default = "default_trigger_regex")]
    pub trigger_regex: String,

    /// Maximum number of results injected into the chat
    #[serde(rename = "resultCount", default = "default_result_count")]
    pub result_count: usize,

    /// Template around the rendered items, with `{{query}}` and `{{results}}`
    #[serde(rename = "wrapperTemplate", default = "default_wrapper_template")]
    pub wrapper_template: String,

    /// Per-result template, with `{{title}}`, `{{snippet}}` and `{{link}}`
    #[serde(rename = "itemTemplate", default = "default_item_template")]
    pub item_template: String,
}

fn default_true() -> bool {
    true
}

fn default_trigger_regex() -> String {
    r#"\(search:"(.*?)"\)"#.to_string()
}

fn default_result_count() -> usize {
    3
}

fn default_wrapper_template() -> String {
    "This is a web search result for the query \"{{query}}\":\n\n{{results}}".to_string()
}

fn default_item_template() -> String {
    "Title: {{title}}\nSnippet: {{snippet}}\nURL: {{link}}\n".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manual_enabled: false,
            auto_enabled: default_true(),
            trigger_regex: default_trigger_regex(),
            result_count: default_result_count(),
            wrapper_template: default_wrapper_template(),
            item_template: default_item_template(),
        }
    }
}

impl Settings {
    /// Compile the trigger pattern, pairing it with these settings.
    pub fn activate(self) -> Result<ActiveSettings, ConfigError> {
        let trigger = TriggerPattern::compile(&self.trigger_regex)?;
        Ok(ActiveSettings {
            settings: self,
            trigger,
        })
    }

    /// Whether any search mode is on.
    pub fn search_enabled(&self) -> bool {
        self.manual_enabled || self.auto_enabled
    }

    /// Set a field by its persisted key, parsing the value from text.
    pub fn set_by_key(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "manual_enabled" => self.manual_enabled = parse_bool(key, value)?,
            "auto_enabled" => self.auto_enabled = parse_bool(key, value)?,
            "triggerRegex" => {
                TriggerPattern::compile(value)?;
                self.trigger_regex = value.to_string();
            }
            "resultCount" => {
                self.result_count = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("expected a non-negative integer, got '{}'", value),
                })?;
            }
            "wrapperTemplate" => self.wrapper_template = value.to_string(),
            "itemTemplate" => self.item_template = value.to_string(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: format!("expected true or false, got '{}'", value),
    })
}

/// Settings together with their compiled trigger pattern.
#[derive(Debug, Clone)]
pub struct ActiveSettings {
    pub settings: Settings,
    pub trigger: TriggerPattern,
}

impl Default for ActiveSettings {
    fn default() -> Self {
        let settings = Settings::default();
        let trigger = TriggerPattern::compile(&settings.trigger_regex)
            .expect("Default trigger pattern must compile");
        Self { settings, trigger }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.manual_enabled);
        assert!(settings.auto_enabled);
        assert_eq!(settings.result_count, 3);
        assert!(settings.activate().is_ok());
    }

    #[test]
    fn test_persisted_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        for key in [
            "manual_enabled",
            "auto_enabled",
            "triggerRegex",
            "resultCount",
            "wrapperTemplate",
            "itemTemplate",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_partial_record_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"resultCount":7}"#).unwrap();
        assert_eq!(settings.result_count, 7);
        assert!(settings.auto_enabled);
        assert_eq!(settings.item_template, Settings::default().item_template);
    }

    #[test]
    fn test_activate_rejects_bad_pattern() {
        let settings = Settings {
            trigger_regex: "(".to_string(),
            ..Default::default()
        };
        assert!(settings.activate().is_err());
    }

    #[test]
    fn test_set_by_key() {
        let mut settings = Settings::default();
        settings.set_by_key("manual_enabled", "true").unwrap();
        settings.set_by_key("resultCount", "5").unwrap();
        assert!(settings.manual_enabled);
        assert_eq!(settings.result_count, 5);

        assert!(settings.set_by_key("resultCount", "-1").is_err());
        assert!(settings.set_by_key("triggerRegex", "[").is_err());
        assert!(matches!(
            settings.set_by_key("nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_search_enabled() {
        let mut settings = Settings::default();
        assert!(settings.search_enabled());
        settings.auto_enabled = false;
        assert!(!settings.search_enabled());
        settings.manual_enabled = true;
        assert!(settings.search_enabled());
    }
}
