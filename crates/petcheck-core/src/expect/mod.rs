//! Response assertion DSL
//!
//! A [`ResponseSpec`] is a flat, ordered list of [`Expectation`]s. Checking a
//! [`Response`] evaluates them first to last and returns the first
//! [`AssertionFailure`]. A path that does not resolve is a failure of kind
//! [`FailureKind::PathNotFound`], never a panic.
//!
//! ```
//! use petcheck_core::expect::{ResponseSpec, Response, contains_string, equal_to};
//! use serde_json::json;
//!
//! let spec = ResponseSpec::new()
//!     .status(404)
//!     .body("code", equal_to(1))
//!     .body("message", contains_string("User not found"));
//! let response = Response::new(404, json!({"code": 1, "type": "error", "message": "User not found"}));
//! assert!(spec.check(&response).is_ok());
//! ```

mod expectation;
mod failure;
mod path;
mod predicate;
mod response;

pub use expectation::{Expectation, ResponseSpec, StatusMatcher};
pub use failure::{AssertionFailure, FailureKind, MAX_ACTUAL_CHARS};
pub use path::JsonPath;
pub use predicate::{
    JsonType, Predicate, any_of, contains_string, empty, equal_to, greater_than, has_key,
    in_range, matches_pattern, not_empty, not_null, of_type, one_of,
};
pub use response::Response;
