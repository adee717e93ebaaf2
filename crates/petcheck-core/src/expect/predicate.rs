//! Value matchers applied at a JSON path

use regex::Regex;
use serde_json::Value;

/// JSON type tags for [`Predicate::IsType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Null,
    Bool,
    /// Any number, integral or not.
    Number,
    Integer,
    String,
    Array,
    Object,
}

impl JsonType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Null => value.is_null(),
            Self::Bool => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::String => value.is_string(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single check on one JSON value.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Equal to the value; numbers compare numerically (`1 == 1.0`).
    Equals(Value),
    NotNull,
    IsType(JsonType),
    /// String matching the regex.
    Matches(Regex),
    OneOf(Vec<Value>),
    /// String containing the substring, or array containing that string.
    Contains(String),
    /// `""`, `[]` or `{}`.
    Empty,
    /// Non-empty string, array or object; any other non-null scalar.
    NotEmpty,
    GreaterThan(f64),
    /// Number within `[min, max]`.
    InRange { min: f64, max: f64 },
    /// Object with the key.
    HasKey(String),
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    #[must_use]
    pub fn test(&self, actual: &Value) -> bool {
        match self {
            Self::Equals(expected) => values_equal(expected, actual),
            Self::NotNull => !actual.is_null(),
            Self::IsType(ty) => ty.matches(actual),
            Self::Matches(re) => actual.as_str().is_some_and(|s| re.is_match(s)),
            Self::OneOf(candidates) => candidates.iter().any(|c| values_equal(c, actual)),
            Self::Contains(needle) => match actual {
                Value::String(s) => s.contains(needle.as_str()),
                Value::Array(items) => items.iter().any(|i| i.as_str() == Some(needle)),
                _ => false,
            },
            Self::Empty => match actual {
                Value::String(s) => s.is_empty(),
                Value::Array(a) => a.is_empty(),
                Value::Object(o) => o.is_empty(),
                _ => false,
            },
            Self::NotEmpty => match actual {
                Value::Null => false,
                Value::String(s) => !s.is_empty(),
                Value::Array(a) => !a.is_empty(),
                Value::Object(o) => !o.is_empty(),
                Value::Bool(_) | Value::Number(_) => true,
            },
            Self::GreaterThan(bound) => actual.as_f64().is_some_and(|n| n > *bound),
            Self::InRange { min, max } => actual.as_f64().is_some_and(|n| n >= *min && n <= *max),
            Self::HasKey(key) => actual.as_object().is_some_and(|o| o.contains_key(key)),
            Self::AnyOf(options) => options.iter().any(|p| p.test(actual)),
        }
    }

    /// Short machine label, used in reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Equals(_) => "equals",
            Self::NotNull => "not_null",
            Self::IsType(_) => "is_type",
            Self::Matches(_) => "matches",
            Self::OneOf(_) => "one_of",
            Self::Contains(_) => "contains",
            Self::Empty => "empty",
            Self::NotEmpty => "not_empty",
            Self::GreaterThan(_) => "greater_than",
            Self::InRange { .. } => "in_range",
            Self::HasKey(_) => "has_key",
            Self::AnyOf(_) => "any_of",
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "equal to {v}"),
            Self::NotNull => f.write_str("not null"),
            Self::IsType(ty) => write!(f, "of type {ty}"),
            Self::Matches(re) => write!(f, "matching /{}/", re.as_str()),
            Self::OneOf(values) => write!(f, "one of {}", Value::Array(values.clone())),
            Self::Contains(s) => write!(f, "containing {s:?}"),
            Self::Empty => f.write_str("empty"),
            Self::NotEmpty => f.write_str("not empty"),
            Self::GreaterThan(n) => write!(f, "greater than {n}"),
            Self::InRange { min, max } => write!(f, "within [{min}, {max}]"),
            Self::HasKey(k) => write!(f, "having key {k:?}"),
            Self::AnyOf(options) => {
                f.write_str("any of (")?;
                for (i, p) in options.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn values_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) if a.is_f64() || b.is_f64() => {
            a.as_f64() == b.as_f64()
        }
        (Value::Number(a), Value::Number(b)) => {
            a.as_i128().zip(b.as_i128()).map_or(a == b, |(x, y)| x == y)
        }
        _ => expected == actual,
    }
}

pub fn equal_to(value: impl Into<Value>) -> Predicate {
    Predicate::Equals(value.into())
}

pub fn not_null() -> Predicate {
    Predicate::NotNull
}

pub fn of_type(ty: JsonType) -> Predicate {
    Predicate::IsType(ty)
}

/// # Errors
///
/// Returns the regex compile error for an invalid pattern.
pub fn matches_pattern(pattern: &str) -> Result<Predicate, regex::Error> {
    Ok(Predicate::Matches(Regex::new(pattern)?))
}

pub fn one_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Predicate {
    Predicate::OneOf(values.into_iter().map(Into::into).collect())
}

pub fn contains_string(needle: impl Into<String>) -> Predicate {
    Predicate::Contains(needle.into())
}

pub fn empty() -> Predicate {
    Predicate::Empty
}

pub fn not_empty() -> Predicate {
    Predicate::NotEmpty
}

pub fn greater_than(bound: f64) -> Predicate {
    Predicate::GreaterThan(bound)
}

pub fn in_range(min: f64, max: f64) -> Predicate {
    Predicate::InRange { min, max }
}

pub fn has_key(key: impl Into<String>) -> Predicate {
    Predicate::HasKey(key.into())
}

pub fn any_of(options: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::AnyOf(options.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equals_compares_numbers_numerically() {
        assert!(equal_to(200).test(&json!(200)));
        assert!(equal_to(1).test(&json!(1.0)));
        assert!(!equal_to(200).test(&json!("200")));
        assert!(equal_to("unknown").test(&json!("unknown")));
    }

    #[test]
    fn large_integers_compare_exactly() {
        assert!(!equal_to(i64::MAX).test(&json!(i64::MAX - 1)));
        assert!(equal_to(i64::MAX).test(&json!(i64::MAX)));
        assert!(!one_of([(1u64 << 53) + 1]).test(&json!(1u64 << 53)));
        assert!(equal_to(u64::MAX).test(&json!(u64::MAX)));
        assert!(!equal_to(-1).test(&json!(u64::MAX)));
    }

    #[test]
    fn not_null_rejects_only_null() {
        assert!(not_null().test(&json!(0)));
        assert!(not_null().test(&json!("")));
        assert!(!not_null().test(&Value::Null));
    }

    #[test]
    fn type_checks() {
        assert!(of_type(JsonType::Object).test(&json!({})));
        assert!(of_type(JsonType::Integer).test(&json!(3)));
        assert!(!of_type(JsonType::Integer).test(&json!(3.5)));
        assert!(of_type(JsonType::Number).test(&json!(3.5)));
        assert!(!of_type(JsonType::Array).test(&json!("[]")));
    }

    #[test]
    fn pattern_on_strings_only() {
        let p = matches_pattern(r"^[A-Za-z]+_[0-9a-f]{5}$").unwrap();
        assert!(p.test(&json!("Buddy_1a2b3")));
        assert!(!p.test(&json!("Buddy_1A2B3")));
        assert!(!p.test(&json!(12345)));
    }

    #[test]
    fn invalid_pattern_is_error() {
        assert!(matches_pattern("(unclosed").is_err());
    }

    #[test]
    fn membership() {
        let p = one_of(["available", "pending"]);
        assert!(p.test(&json!("pending")));
        assert!(!p.test(&json!("sold")));
        assert!(one_of([true, false]).test(&json!(false)));
        assert!(one_of([0, 1]).test(&json!(1)));
    }

    #[test]
    fn contains_in_string_and_array() {
        assert!(contains_string("Not Found").test(&json!("Order Not Found")));
        assert!(!contains_string("Not Found").test(&json!("Order not found")));
        assert!(contains_string("a").test(&json!(["a", "b"])));
        assert!(!contains_string("a").test(&json!(null)));
    }

    #[test]
    fn emptiness() {
        assert!(empty().test(&json!([])));
        assert!(empty().test(&json!("")));
        assert!(empty().test(&json!({})));
        assert!(!empty().test(&Value::Null));
        assert!(not_empty().test(&json!(["x"])));
        assert!(not_empty().test(&json!({"sold": 1})));
        assert!(!not_empty().test(&json!("")));
        assert!(!not_empty().test(&Value::Null));
        assert!(not_empty().test(&json!(0)));
    }

    #[test]
    fn numeric_comparisons() {
        assert!(greater_than(0.0).test(&json!(1)));
        assert!(!greater_than(0.0).test(&json!(0)));
        assert!(!greater_than(0.0).test(&json!("5")));
        assert!(in_range(1.0, 10.0).test(&json!(1)));
        assert!(in_range(1.0, 10.0).test(&json!(10)));
        assert!(!in_range(1.0, 10.0).test(&json!(11)));
    }

    #[test]
    fn any_of_combines() {
        let p = any_of([contains_string("ok"), matches_pattern(r"^\d+$").unwrap()]);
        assert!(p.test(&json!("ok")));
        assert!(p.test(&json!("1712345")));
        assert!(!p.test(&json!("nope")));
    }

    #[test]
    fn has_key_on_objects() {
        assert!(has_key("name").test(&json!({"name": "x"})));
        assert!(!has_key("name").test(&json!({"id": 1})));
        assert!(!has_key("name").test(&json!(["name"])));
    }

    #[test]
    fn display_forms() {
        assert_eq!(equal_to(200).to_string(), "equal to 200");
        assert_eq!(
            one_of(["available", "pending"]).to_string(),
            r#"one of ["available","pending"]"#
        );
        assert_eq!(contains_string("ok").to_string(), r#"containing "ok""#);
        assert_eq!(in_range(1.0, 10.0).to_string(), "within [1, 10]");
        assert_eq!(
            any_of([empty(), not_null()]).to_string(),
            "any of (empty | not null)"
        );
    }
}
