//! Rendering search results into chat text.
//!
//! Substitution is a single left-to-right pass: every known `{{name}}` token is
//! replaced, values are never rescanned, and unknown tokens stay as written.

use crate::settings::Settings;
use crate::types::SearchResult;

/// Replace `{{name}}` tokens in `template` with the matching value.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Render one result with the item template.
pub fn format_item(template: &str, result: &SearchResult) -> String {
    render(
        template,
        &[
            ("title", result.title()),
            ("snippet", result.snippet()),
            ("link", result.link()),
        ],
    )
}

/// Render all items, one per line.
pub fn format_items(template: &str, results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format_item(template, r))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the full injected message for a query.
pub fn format_results(settings: &Settings, query: &str, results: &[SearchResult]) -> String {
    let items = format_items(&settings.item_template, results);
    render(
        &settings.wrapper_template,
        &[("query", query), ("results", items.as_str())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> SearchResult {
        SearchResult {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_replaces_all_occurrences() {
        let out = render("{{a}}-{{b}}-{{a}}", &[("a", "1"), ("b", "2")]);
        assert_eq!(out, "1-2-1");
    }

    #[test]
    fn test_render_is_case_sensitive_and_keeps_unknown() {
        let out = render("{{Title}} {{title}} {{other}}", &[("title", "x")]);
        assert_eq!(out, "{{Title}} x {{other}}");
    }

    #[test]
    fn test_render_is_not_recursive() {
        let out = render("{{title}} / {{snippet}}", &[("title", "{{snippet}}"), ("snippet", "s")]);
        assert_eq!(out, "{{snippet}} / s");
    }

    #[test]
    fn test_render_unterminated_and_nested_braces() {
        assert_eq!(render("open {{title", &[("title", "x")]), "open {{title");
        assert_eq!(render("{{{{title}}", &[("title", "x")]), "{{x");
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let out = format_item("[{{title}}|{{snippet}}|{{link}}]", &titled("A"));
        assert_eq!(out, "[A||]");
    }

    #[test]
    fn test_items_joined_by_newline() {
        let results = vec![titled("A"), titled("B")];
        assert_eq!(format_items("Title: {{title}}\n", &results), "Title: A\n\nTitle: B\n");
        assert_eq!(format_items("Title: {{title}}\n", &results[..1]), "Title: A\n");
    }

    #[test]
    fn test_format_results_leaves_no_placeholders() {
        let settings = Settings::default();
        let results = vec![SearchResult::new("Paris", "Capital", "https://paris.example")];

        let out = format_results(&settings, "capital of France", &results);

        for token in ["{{title}}", "{{snippet}}", "{{link}}", "{{query}}", "{{results}}"] {
            assert!(!out.contains(token), "leftover {}", token);
        }
        assert_eq!(
            out,
            "This is a web search result for the query \"capital of France\":\n\n\
             Title: Paris\nSnippet: Capital\nURL: https://paris.example\n"
        );
    }

    #[test]
    fn test_results_value_not_rescanned_for_query() {
        let settings = Settings {
            wrapper_template: "{{results}}".to_string(),
            item_template: "{{title}}".to_string(),
            ..Default::default()
        };
        let out = format_results(&settings, "q", &[titled("{{query}}")]);
        assert_eq!(out, "{{query}}");
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let settings = Settings::default();
        let results = vec![titled("A"), SearchResult::new("B", "b", "https://b")];
        assert_eq!(
            format_results(&settings, "q", &results),
            format_results(&settings, "q", &results)
        );
    }
}
