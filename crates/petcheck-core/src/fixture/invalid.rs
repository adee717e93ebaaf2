//! Deliberately invalid inputs for negative scenarios

use chrono::Utc;
use rand::Rng;

use crate::random::PreconditionError;

/// Path ids the service must reject on `GET /pet/{petId}`.
pub const MALFORMED_PET_IDS: &[&str] = &["0", "-5", "abc", "1.5"];

/// Path ids the service must reject on the form update `POST /pet/{petId}`.
pub const MALFORMED_FORM_PET_IDS: &[&str] = &["invalid_id", "0", "-5", "1.5"];

/// Far outside every generated id range.
pub const NONEXISTENT_ORDER_ID: i64 = 999_999_999;

/// `prefix` plus the current epoch milliseconds.
///
/// Usernames generated by [`super::random_user`] start with `user_`, so a
/// prefix without the underscore cannot collide with them.
pub fn nonexistent_username(prefix: &str) -> String {
    format!("{prefix}{}", Utc::now().timestamp_millis())
}

/// A pet id drawn fresh from the pet range that no scenario has created.
///
/// Absence is probabilistic, the same as every generated id.
///
/// # Errors
///
/// Only if the pet id range is empty.
pub fn unlikely_pet_id(rng: &mut impl Rng) -> Result<i64, PreconditionError> {
    super::pet::pet_id(rng)
}
