use serde_json::Value;

use super::failure::{AssertionFailure, FailureKind, render};
use super::response::media_type;
use super::{JsonPath, Predicate, Response};

/// Maximum number of schema errors quoted in one failure.
const MAX_SCHEMA_ERRORS: usize = 5;

const MISSING: &str = "<missing>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMatcher {
    Exact(u16),
    OneOf(Vec<u16>),
}

impl StatusMatcher {
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(code) => *code == status,
            Self::OneOf(codes) => codes.contains(&status),
        }
    }
}

impl std::fmt::Display for StatusMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(code) => write!(f, "{code}"),
            Self::OneOf(codes) => write!(f, "one of {codes:?}"),
        }
    }
}

/// One declarative check on a [`Response`].
#[derive(Debug, Clone)]
pub enum Expectation {
    Status(StatusMatcher),
    /// Media type; parameters such as `charset` are ignored.
    ContentType(String),
    Field {
        path: JsonPath,
        predicate: Predicate,
    },
    /// Every element of the array at `path` has `item_path` satisfying the
    /// predicate. Holds vacuously for an empty array.
    Every {
        path: JsonPath,
        item_path: JsonPath,
        predicate: Predicate,
    },
    /// Body validates against the JSON Schema.
    Schema(Value),
}

impl Expectation {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::ContentType(_) => "content_type",
            Self::Field { .. } => "field",
            Self::Every { .. } => "every",
            Self::Schema(_) => "schema",
        }
    }

    /// # Errors
    ///
    /// The failure for this expectation, tagged with `index`.
    pub fn check(&self, index: usize, response: &Response) -> Result<(), AssertionFailure> {
        let fail = |kind, expected: String, actual: String| {
            AssertionFailure::new(index, kind, self.label(), expected, actual)
        };
        match self {
            Self::Status(matcher) => {
                if matcher.matches(response.status) {
                    Ok(())
                } else {
                    Err(fail(
                        FailureKind::Status,
                        matcher.to_string(),
                        response.status.to_string(),
                    ))
                }
            }
            Self::ContentType(expected) => {
                let actual = response.media_type();
                if actual.as_deref() == Some(media_type(expected).as_str()) {
                    Ok(())
                } else {
                    Err(fail(
                        FailureKind::ContentType,
                        expected.clone(),
                        actual.unwrap_or_else(|| "<none>".to_string()),
                    ))
                }
            }
            Self::Field { path, predicate } => {
                let Some(value) = path.resolve(&response.body) else {
                    return Err(fail(
                        FailureKind::PathNotFound,
                        predicate.to_string(),
                        MISSING.to_string(),
                    )
                    .at(path.to_string()));
                };
                if predicate.test(value) {
                    Ok(())
                } else {
                    Err(fail(FailureKind::Mismatch, predicate.to_string(), render(value))
                        .at(path.to_string()))
                }
            }
            Self::Every {
                path,
                item_path,
                predicate,
            } => {
                let Some(collection) = path.resolve(&response.body) else {
                    return Err(fail(
                        FailureKind::PathNotFound,
                        "array".to_string(),
                        MISSING.to_string(),
                    )
                    .at(path.to_string()));
                };
                let Some(items) = collection.as_array() else {
                    return Err(fail(
                        FailureKind::NotACollection,
                        "array".to_string(),
                        render(collection),
                    )
                    .at(path.to_string()));
                };
                for (i, item) in items.iter().enumerate() {
                    let location = path.item(i, item_path);
                    match item_path.resolve(item) {
                        None => {
                            return Err(fail(
                                FailureKind::PathNotFound,
                                predicate.to_string(),
                                MISSING.to_string(),
                            )
                            .at(location));
                        }
                        Some(value) if !predicate.test(value) => {
                            return Err(fail(
                                FailureKind::Mismatch,
                                predicate.to_string(),
                                render(value),
                            )
                            .at(location));
                        }
                        Some(_) => {}
                    }
                }
                Ok(())
            }
            Self::Schema(schema) => {
                let validator = jsonschema::validator_for(schema).map_err(|e| {
                    fail(
                        FailureKind::Schema,
                        "a valid JSON Schema".to_string(),
                        e.to_string(),
                    )
                })?;
                let errors: Vec<String> = validator
                    .iter_errors(&response.body)
                    .take(MAX_SCHEMA_ERRORS)
                    .map(|e| e.to_string())
                    .collect();
                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(fail(
                        FailureKind::Schema,
                        "body matching schema".to_string(),
                        errors.join("; "),
                    ))
                }
            }
        }
    }
}

/// Ordered expectations for one response, checked first to last.
#[derive(Debug, Clone, Default)]
pub struct ResponseSpec {
    expectations: Vec<Expectation>,
}

impl ResponseSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(self, code: u16) -> Self {
        self.expect(Expectation::Status(StatusMatcher::Exact(code)))
    }

    #[must_use]
    pub fn status_in(self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.expect(Expectation::Status(StatusMatcher::OneOf(
            codes.into_iter().collect(),
        )))
    }

    #[must_use]
    pub fn content_type(self, media_type: impl Into<String>) -> Self {
        self.expect(Expectation::ContentType(media_type.into()))
    }

    /// Predicate on the value at `path` (`""` is the whole body).
    #[must_use]
    pub fn body(self, path: &str, predicate: Predicate) -> Self {
        self.expect(Expectation::Field {
            path: JsonPath::parse(path),
            predicate,
        })
    }

    #[must_use]
    pub fn every(self, path: &str, item_path: &str, predicate: Predicate) -> Self {
        self.expect(Expectation::Every {
            path: JsonPath::parse(path),
            item_path: JsonPath::parse(item_path),
            predicate,
        })
    }

    #[must_use]
    pub fn schema(self, schema: Value) -> Self {
        self.expect(Expectation::Schema(schema))
    }

    #[must_use]
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    #[must_use]
    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    /// Checks every expectation in order and stops at the first failure.
    ///
    /// # Errors
    ///
    /// The first expectation the response does not satisfy.
    pub fn check(&self, response: &Response) -> Result<(), AssertionFailure> {
        self.expectations
            .iter()
            .enumerate()
            .try_for_each(|(i, e)| e.check(i, response))
    }
}
