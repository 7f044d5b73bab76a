//! Trigger pattern compilation and the interactive pattern test.

use regex::{Regex, RegexBuilder};
use std::fmt;

use crate::error::ConfigError;

/// A validated, case-insensitive trigger pattern with at least one capture group.
#[derive(Debug, Clone)]
pub struct TriggerPattern {
    source: String,
    regex: Regex,
}

impl TriggerPattern {
    /// Compile a trigger pattern.
    ///
    /// Fails with [`ConfigError::InvalidValue`] if the pattern does not parse or
    /// has no capture group to extract the query from.
    pub fn compile(source: &str) -> Result<Self, ConfigError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "triggerRegex".to_string(),
                reason: e.to_string(),
            })?;

        // captures_len counts the implicit whole-match group.
        if regex.captures_len() < 2 {
            return Err(ConfigError::InvalidValue {
                key: "triggerRegex".to_string(),
                reason: "pattern needs a capture group, like (.*?)".to_string(),
            });
        }

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as written by the user.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Extract the trimmed search query from generated text.
    ///
    /// Returns `None` when nothing matches or the first group captured nothing.
    pub fn extract_query(&self, text: &str) -> Option<String> {
        let caps = self.regex.captures(text)?;
        let query = caps.get(1)?.as_str().trim();
        if query.is_empty() {
            None
        } else {
            Some(query.to_string())
        }
    }
}

/// Outcome of testing a pattern against a sample string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerTest {
    Captured(String),
    NoCapture,
    NoMatch,
    InvalidPattern(String),
}

impl TriggerTest {
    pub fn is_success(&self) -> bool {
        matches!(self, TriggerTest::Captured(_))
    }
}

impl fmt::Display for TriggerTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerTest::Captured(query) => write!(f, "Success! Captured query: {}", query),
            TriggerTest::NoCapture => write!(
                f,
                "Failed. Regex matched, but no capture group found. Make sure your regex has parentheses, like (.*?)."
            ),
            TriggerTest::NoMatch => write!(f, "Failed. Regex did not match the test string."),
            TriggerTest::InvalidPattern(reason) => {
                write!(f, "Error: Invalid Regular Expression. {}", reason)
            }
        }
    }
}

/// Test a pattern against a sample the way the settings panel does.
///
/// Unlike [`TriggerPattern::compile`], a pattern without groups is accepted
/// here so the user gets the more specific "no capture group" verdict.
pub fn test_trigger(pattern: &str, sample: &str) -> TriggerTest {
    let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => regex,
        Err(e) => return TriggerTest::InvalidPattern(e.to_string()),
    };

    match regex.captures(sample) {
        Some(caps) => match caps.get(1).map(|m| m.as_str()) {
            Some(query) if !query.is_empty() => TriggerTest::Captured(query.to_string()),
            _ => TriggerTest::NoCapture,
        },
        None => TriggerTest::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = r#"\(search:"(.*?)"\)"#;

    #[test]
    fn test_extract_query() {
        let trigger = TriggerPattern::compile(DEFAULT).unwrap();
        let query = trigger.extract_query(r#"The answer is (search:"capital of France")"#);
        assert_eq!(query.as_deref(), Some("capital of France"));
    }

    #[test]
    fn test_extract_is_case_insensitive_and_trims() {
        let trigger = TriggerPattern::compile(DEFAULT).unwrap();
        let query = trigger.extract_query(r#"(SEARCH:"  rust async  ")"#);
        assert_eq!(query.as_deref(), Some("rust async"));
    }

    #[test]
    fn test_extract_no_match() {
        let trigger = TriggerPattern::compile(DEFAULT).unwrap();
        assert!(trigger.extract_query("plain answer").is_none());
        assert!(trigger.extract_query(r#"(search:"")"#).is_none());
    }

    #[test]
    fn test_compile_rejects_invalid() {
        assert!(matches!(
            TriggerPattern::compile("(unclosed"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            TriggerPattern::compile("search:.*"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_trigger_outcomes() {
        assert_eq!(
            test_trigger(DEFAULT, r#"(search:"weather")"#),
            TriggerTest::Captured("weather".to_string())
        );
        assert_eq!(test_trigger("search", "search me"), TriggerTest::NoCapture);
        assert_eq!(test_trigger(DEFAULT, "nothing here"), TriggerTest::NoMatch);
        assert!(matches!(
            test_trigger("([", "x"),
            TriggerTest::InvalidPattern(_)
        ));
    }

    #[test]
    fn test_trigger_display() {
        let ok = TriggerTest::Captured("q".to_string());
        assert!(ok.is_success());
        assert_eq!(ok.to_string(), "Success! Captured query: q");
        assert!(TriggerTest::NoMatch.to_string().starts_with("Failed."));
    }
}
