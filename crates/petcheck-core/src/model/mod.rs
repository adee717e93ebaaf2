//! Domain value objects sent to and read from the pet-store service
//!
//! Wire field names are fixed by serde attributes on each type and must match
//! the service's documented schema exactly.

mod order;
mod pet;
mod user;

pub use order::{Order, OrderStatus};
pub use pet::{Category, Pet, PetStatus, Tag};
pub use user::{DerivedEmailMismatch, EMAIL_DOMAIN, User};

/// A domain object that can be serialized as a request payload.
pub trait Fixture: serde::Serialize {
    /// Entity label used in error messages.
    const KIND: &'static str;

    /// Structural check run before serialization.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated constraint.
    fn validate(&self) -> Result<(), String>;
}
