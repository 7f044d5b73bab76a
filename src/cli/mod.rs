//! CLI helpers for websearch-tool.
//!
//! Path handling and terminal output shared by the binary's subcommands.

use std::path::{Path, PathBuf};

use crate::settings::{Settings, TriggerTest};
use crate::types::SearchResult;

/// Default location of the proxy configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "~/.websearch-tool/config.json";

/// Default location of the extension settings file.
pub const DEFAULT_SETTINGS_PATH: &str = "~/.websearch-tool/settings.json";

/// Default base URL of a locally running proxy.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8000";

/// Expand tilde (~) in paths.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

/// Render settings as a key/value listing.
pub fn describe_settings(settings: &Settings) -> String {
    format!(
        "manual_enabled:  {}\n\
         auto_enabled:    {}\n\
         triggerRegex:    {}\n\
         resultCount:     {}\n\
         wrapperTemplate: {:?}\n\
         itemTemplate:    {:?}",
        settings.manual_enabled,
        settings.auto_enabled,
        settings.trigger_regex,
        settings.result_count,
        settings.wrapper_template,
        settings.item_template,
    )
}

/// One-line summary of a result list, for logs and terminal output.
pub fn summarize_results(results: &[SearchResult]) -> String {
    match results.len() {
        0 => "no results".to_string(),
        1 => "1 result".to_string(),
        n => format!("{} results", n),
    }
}

/// Marker prefix for a trigger test verdict.
pub fn verdict_marker(test: &TriggerTest) -> &'static str {
    if test.is_success() {
        "✓"
    } else {
        "✗"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path() {
        std::env::set_var("HOME", "/home/tester");
        assert_eq!(
            expand_path(Path::new("~/.websearch-tool/settings.json")),
            PathBuf::from("/home/tester/.websearch-tool/settings.json")
        );
        assert_eq!(expand_path(Path::new("/etc/x.json")), PathBuf::from("/etc/x.json"));
    }

    #[test]
    fn test_describe_settings() {
        let text = describe_settings(&Settings::default());
        assert!(text.contains("resultCount:     3"));
        assert!(text.contains(r#"\(search:"(.*?)"\)"#));
    }

    #[test]
    fn test_summarize_results() {
        assert_eq!(summarize_results(&[]), "no results");
        assert_eq!(summarize_results(&[SearchResult::default()]), "1 result");
        assert_eq!(
            summarize_results(&[SearchResult::default(), SearchResult::default()]),
            "2 results"
        );
    }

    #[test]
    fn test_verdict_marker() {
        assert_eq!(verdict_marker(&TriggerTest::Captured("q".to_string())), "✓");
        assert_eq!(verdict_marker(&TriggerTest::NoMatch), "✗");
    }
}
