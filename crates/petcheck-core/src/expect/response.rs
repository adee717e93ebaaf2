use serde_json::Value;

use super::JsonPath;

/// What an expectation is checked against: status, media type and the parsed body.
///
/// An empty body is `Value::Null`; a body that is not JSON is kept as a
/// `Value::String` holding the raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Value,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: None,
            body,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Media type without parameters, lowercased: `application/json`.
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(media_type)
    }

    #[must_use]
    pub fn field(&self, path: &str) -> Option<&Value> {
        JsonPath::parse(path).resolve(&self.body)
    }

    /// String at `path`, if present and a string.
    #[must_use]
    pub fn text(&self, path: &str) -> Option<&str> {
        self.field(path).and_then(Value::as_str)
    }
}

pub(crate) fn media_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
