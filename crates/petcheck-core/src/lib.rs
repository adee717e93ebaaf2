//! petcheck-core: fixtures and response assertions for pet-store contract checks
//!
//! This crate has no I/O besides config loading. It produces valid and
//! deliberately invalid pets, orders and users under bounded randomness,
//! serializes them to the service's wire format, and checks responses against
//! declarative expectations.

pub mod config;
pub mod expect;
pub mod fixture;
pub mod model;
pub mod random;
pub mod report;
pub mod wire;

pub use config::{Config, ConfigError};
pub use expect::{AssertionFailure, Expectation, FailureKind, Predicate, Response, ResponseSpec};
pub use fixture::{EntityKind, FixtureError};
pub use model::{Category, Order, OrderStatus, Pet, PetStatus, Tag, User};
pub use random::PreconditionError;
pub use report::{CleanupReport, Outcome, RunReport, ScenarioReport, generate_schema};
pub use wire::SerializationError;
