use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One retrieved search result.
///
/// The provider's record is kept verbatim as opaque JSON; the named fields
/// are read out of it on demand. That keeps the stringified fallback exact
/// when a provider omits both text fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchSnippet {
    raw: Value,
}

impl SearchSnippet {
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// The snippet text used for context assembly and display.
    ///
    /// Precedence: a non-empty `content` field, else a non-empty `snippet`
    /// field, else the whole record stringified. An empty string falls
    /// through; whitespace does not.
    pub fn text(&self) -> String {
        if let Some(content) = self.nonempty_str("content") {
            return content.to_string();
        }
        if let Some(snippet) = self.nonempty_str("snippet") {
            return snippet.to_string();
        }
        self.raw.to_string()
    }

    /// Result title, when the provider sent one.
    pub fn title(&self) -> Option<&str> {
        self.nonempty_str("title")
    }

    /// Source URL, when the provider sent one.
    pub fn url(&self) -> Option<&str> {
        self.nonempty_str("url")
    }

    fn nonempty_str(&self, key: &str) -> Option<&str> {
        self.raw
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_prefers_content_over_snippet() {
        let snippet = SearchSnippet::from_value(json!({
            "content": "from content",
            "snippet": "from snippet",
        }));
        assert_eq!(snippet.text(), "from content");
    }

    #[test]
    fn empty_content_falls_through_to_snippet() {
        let snippet = SearchSnippet::from_value(json!({
            "content": "",
            "snippet": "from snippet",
        }));
        assert_eq!(snippet.text(), "from snippet");
    }

    #[test]
    fn missing_both_fields_stringifies_the_record() {
        let snippet = SearchSnippet::from_value(json!({"url": "https://example.com"}));
        let text = snippet.text();
        assert!(!text.is_empty());
        assert!(text.contains("https://example.com"));
    }

    #[test]
    fn empty_record_still_produces_nonempty_text() {
        let snippet = SearchSnippet::from_value(json!({}));
        assert_eq!(snippet.text(), "{}");
    }

    #[test]
    fn whitespace_content_is_kept_as_is() {
        let snippet = SearchSnippet::from_value(json!({
            "content": "  ",
            "snippet": "from snippet",
        }));
        assert_eq!(snippet.text(), "  ");
    }

    #[test]
    fn non_string_content_falls_through() {
        let snippet = SearchSnippet::from_value(json!({
            "content": 42,
            "snippet": "from snippet",
        }));
        assert_eq!(snippet.text(), "from snippet");
    }

    #[test]
    fn title_and_url_ignore_empty_strings() {
        let snippet = SearchSnippet::from_value(json!({
            "title": "",
            "url": "https://example.com",
        }));
        assert_eq!(snippet.title(), None);
        assert_eq!(snippet.url(), Some("https://example.com"));
    }

    #[test]
    fn deserializes_transparently_from_provider_record() {
        let snippet: SearchSnippet =
            serde_json::from_str(r#"{"title":"t","content":"c","score":0.93}"#).unwrap();
        assert_eq!(snippet.text(), "c");
        assert_eq!(snippet.title(), Some("t"));
    }
}
