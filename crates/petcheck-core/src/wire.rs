//! Domain object ⇄ JSON wire format
//!
//! Absent (`None`) fields are omitted, never emitted as `null`. Field order
//! follows declaration order, so the same object always serializes to the
//! same bytes.

use serde::de::DeserializeOwned;

use crate::model::Fixture;

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("invalid {kind}: {reason}")]
    Invalid { kind: &'static str, reason: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validate and serialize a fixture to a compact JSON string.
///
/// # Errors
///
/// Returns [`SerializationError::Invalid`] if the object fails its own
/// validation; nothing is serialized in that case.
pub fn to_json<T: Fixture>(value: &T) -> Result<String, SerializationError> {
    check(value)?;
    Ok(serde_json::to_string(value)?)
}

/// Validate and convert a fixture to a JSON value.
///
/// # Errors
///
/// Same as [`to_json`].
pub fn to_value<T: Fixture>(value: &T) -> Result<serde_json::Value, SerializationError> {
    check(value)?;
    Ok(serde_json::to_value(value)?)
}

/// Parse a domain object from JSON.
///
/// # Errors
///
/// Returns [`SerializationError::Json`] on malformed input or a wire shape
/// that violates the type's invariants.
pub fn from_json<T: DeserializeOwned>(raw: &str) -> Result<T, SerializationError> {
    Ok(serde_json::from_str(raw)?)
}

/// Wrap already-serialized objects into a JSON array.
///
/// Only syntactic well-formedness is guaranteed; nothing is re-validated.
pub fn join_array(items: &[String]) -> String {
    format!("[{}]", items.join(","))
}

fn check<T: Fixture>(value: &T) -> Result<(), SerializationError> {
    value
        .validate()
        .map_err(|reason| SerializationError::Invalid {
            kind: T::KIND,
            reason,
        })
}
