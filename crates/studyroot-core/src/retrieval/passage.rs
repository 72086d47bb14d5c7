//! Stored passage records
//!
//! Index passage files mix several shapes: bare strings, document objects
//! with a `page_content` field, and arbitrary keyed records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Field carrying the passage text in document-shaped records
const TEXT_FIELD: &str = "page_content";

/// One stored passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Passage {
    /// Plain string passage
    Text(String),

    /// Document object with a text field and optional metadata
    Document {
        page_content: String,
        #[serde(default)]
        metadata: Map<String, Value>,
    },

    /// Any other keyed record
    Record(Map<String, Value>),

    /// Anything else (numbers, arrays, null)
    Other(Value),
}

impl Passage {
    /// Extract the passage text.
    ///
    /// Records without a string text field fall back to their JSON rendering.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Passage::Text(text) => Cow::Borrowed(text),
            Passage::Document { page_content, .. } => Cow::Borrowed(page_content),
            Passage::Record(fields) => match fields.get(TEXT_FIELD) {
                Some(Value::String(text)) => Cow::Borrowed(text),
                Some(other) => Cow::Owned(other.to_string()),
                None => Cow::Owned(Value::Object(fields.clone()).to_string()),
            },
            Passage::Other(value) => Cow::Owned(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Passage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_plain_string() {
        let passage = parse(r#""Gradient descent minimises loss.""#);
        assert!(matches!(passage, Passage::Text(_)));
        assert_eq!(passage.text(), "Gradient descent minimises loss.");
    }

    #[test]
    fn test_document_object() {
        let passage = parse(r#"{"page_content": "A perceptron.", "metadata": {"page": 3}}"#);
        assert!(matches!(passage, Passage::Document { .. }));
        assert_eq!(passage.text(), "A perceptron.");
    }

    #[test]
    fn test_document_without_metadata() {
        let passage = parse(r#"{"page_content": "Backpropagation."}"#);
        assert_eq!(passage.text(), "Backpropagation.");
    }

    #[test]
    fn test_record_with_non_string_text_field() {
        let passage = parse(r#"{"page_content": 42}"#);
        assert!(matches!(passage, Passage::Record(_)));
        assert_eq!(passage.text(), "42");
    }

    #[test]
    fn test_record_without_text_field() {
        let passage = parse(r#"{"title": "Intro"}"#);
        assert!(matches!(passage, Passage::Record(_)));
        assert_eq!(passage.text(), r#"{"title":"Intro"}"#);
    }

    #[test]
    fn test_other_value() {
        let passage = parse("7");
        assert!(matches!(passage, Passage::Other(_)));
        assert_eq!(passage.text(), "7");
    }

    #[test]
    fn test_mixed_array() {
        let passages: Vec<Passage> =
            serde_json::from_str(r#"["a", {"page_content": "b"}, {"k": "v"}, null]"#).unwrap();
        let texts: Vec<_> = passages.iter().map(|p| p.text().into_owned()).collect();
        assert_eq!(texts, vec!["a", "b", r#"{"k":"v"}"#, "null"]);
    }
}
