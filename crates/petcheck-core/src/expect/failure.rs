//! Structured description of the first expectation a response broke

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest rendering of an actual value kept in a failure.
pub const MAX_ACTUAL_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Status code outside the expected set
    Status,
    /// Missing or different media type
    ContentType,
    /// Path does not resolve in the body
    PathNotFound,
    /// `Every` applied to something that is not an array
    NotACollection,
    /// Predicate returned false
    Mismatch,
    /// Body does not validate against a JSON Schema
    Schema,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::ContentType => "content_type",
            Self::PathNotFound => "path_not_found",
            Self::NotACollection => "not_a_collection",
            Self::Mismatch => "mismatch",
            Self::Schema => "schema",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a response did not conform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssertionFailure {
    /// Position of the expectation in its `ResponseSpec`
    pub index: usize,
    pub kind: FailureKind,
    /// Expectation label: `status`, `content_type`, `field`, `every` or `schema`
    pub expectation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub expected: String,
    pub actual: String,
}

impl AssertionFailure {
    pub(crate) fn new(
        index: usize,
        kind: FailureKind,
        expectation: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            index,
            kind,
            expectation: expectation.to_string(),
            path: None,
            expected: expected.into(),
            actual: truncate(actual.into()),
        }
    }

    #[must_use]
    pub(crate) fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} in expectation #{} ({})",
            self.kind, self.index, self.expectation
        )?;
        if let Some(path) = &self.path {
            write!(f, " at {path}")?;
        }
        write!(f, ": expected {}, got {}", self.expected, self.actual)
    }
}

impl std::error::Error for AssertionFailure {}

/// Compact JSON rendering for the `actual` side of a failure.
pub(crate) fn render(value: &Value) -> String {
    value.to_string()
}

fn truncate(mut s: String) -> String {
    if let Some((cut, _)) = s.char_indices().nth(MAX_ACTUAL_CHARS) {
        s.truncate(cut);
        s.push_str("...");
    }
    s
}
