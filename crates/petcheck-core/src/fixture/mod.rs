//! Fixture generators for pets, orders and users
//!
//! `random_*` / `test_*` build domain objects from a caller-supplied rng.
//! The `generate_*` functions are the serialized façades used by scenarios:
//! they draw from `rand::thread_rng()` and return the JSON request body.
//!
//! Ids come from one dedicated range per entity kind so a fresh id can be
//! told apart from pre-existing data on the live service. Uniqueness is
//! probabilistic: collisions are possible and not handled.

pub mod invalid;
mod order;
mod pet;
mod user;

use rand::Rng;

use crate::random::PreconditionError;
use crate::wire::{self, SerializationError};

pub use order::{
    ORDER_IDS, ORDER_PET_IDS, QUANTITY, order_id, random_order, random_order_at, test_order,
};
pub use pet::{CATEGORIES, PET_IDS, PET_NAMES, TAGS, TEST_PET_NAME, pet_id, random_pet, test_pet};
pub use user::{
    FIRST_NAMES, LAST_NAMES, TEST_PASSWORD, TEST_USERNAME, USER_IDS, random_user, test_user, user_id,
};

/// Fixture could not be produced. The scenario aborts before sending anything.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// Entity kinds the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Pet,
    Order,
    User,
}

impl EntityKind {
    pub const ALL: [Self; 3] = [Self::Pet, Self::Order, Self::User];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pet => "pet",
            Self::Order => "order",
            Self::User => "user",
        }
    }

    /// Serialized random instance.
    ///
    /// # Errors
    ///
    /// See [`FixtureError`].
    pub fn random_json(self, rng: &mut impl Rng) -> Result<String, FixtureError> {
        Ok(match self {
            Self::Pet => wire::to_json(&random_pet(rng)?)?,
            Self::Order => wire::to_json(&random_order(rng)?)?,
            Self::User => wire::to_json(&random_user(rng)?)?,
        })
    }

    /// Serialized deterministic instance.
    ///
    /// # Errors
    ///
    /// See [`FixtureError`].
    pub fn test_json(self, rng: &mut impl Rng) -> Result<String, FixtureError> {
        Ok(match self {
            Self::Pet => wire::to_json(&test_pet(rng)?)?,
            Self::Order => wire::to_json(&test_order(rng)?)?,
            Self::User => wire::to_json(&test_user(rng)?)?,
        })
    }

    /// JSON array of `count` independently generated random instances.
    ///
    /// # Errors
    ///
    /// See [`FixtureError`].
    pub fn array_json(self, rng: &mut impl Rng, count: usize) -> Result<String, FixtureError> {
        array_json(count, || self.random_json(rng))
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entity kind '{s}' (expected pet, order or user)"))
    }
}

/// # Errors
///
/// See [`FixtureError`].
pub fn generate_random_pet() -> Result<String, FixtureError> {
    EntityKind::Pet.random_json(&mut rand::thread_rng())
}

/// # Errors
///
/// See [`FixtureError`].
pub fn generate_test_pet() -> Result<String, FixtureError> {
    EntityKind::Pet.test_json(&mut rand::thread_rng())
}

/// # Errors
///
/// See [`FixtureError`].
pub fn generate_random_order() -> Result<String, FixtureError> {
    EntityKind::Order.random_json(&mut rand::thread_rng())
}

/// # Errors
///
/// See [`FixtureError`].
pub fn generate_test_order() -> Result<String, FixtureError> {
    EntityKind::Order.test_json(&mut rand::thread_rng())
}

/// # Errors
///
/// See [`FixtureError`].
pub fn generate_random_user() -> Result<String, FixtureError> {
    EntityKind::User.random_json(&mut rand::thread_rng())
}

/// # Errors
///
/// See [`FixtureError`].
pub fn generate_test_user() -> Result<String, FixtureError> {
    EntityKind::User.test_json(&mut rand::thread_rng())
}

/// # Errors
///
/// See [`FixtureError`].
pub fn generate_pet_array_json(count: usize) -> Result<String, FixtureError> {
    array_json(count, generate_random_pet)
}

/// # Errors
///
/// See [`FixtureError`].
pub fn generate_order_array_json(count: usize) -> Result<String, FixtureError> {
    array_json(count, generate_random_order)
}

/// # Errors
///
/// See [`FixtureError`].
pub fn generate_user_array_json(count: usize) -> Result<String, FixtureError> {
    array_json(count, generate_random_user)
}

fn array_json(
    count: usize,
    mut generate: impl FnMut() -> Result<String, FixtureError>,
) -> Result<String, FixtureError> {
    let items = (0..count)
        .map(|_| generate())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(wire::join_array(&items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Order, OrderStatus, Pet, User};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn id_ranges_are_disjoint() {
        let ranges = [PET_IDS, ORDER_IDS, USER_IDS];
        for (i, a) in ranges.iter().enumerate() {
            for b in ranges.iter().skip(i + 1) {
                assert!(a.end <= b.start || b.end <= a.start, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn generate_random_pet_parses_back() {
        let json = generate_random_pet().unwrap();
        let pet: Pet = wire::from_json(&json).unwrap();
        assert!(PET_IDS.contains(&pet.id));
    }

    #[test]
    fn generate_random_order_parses_back() {
        let json = generate_random_order().unwrap();
        let order: Order = wire::from_json(&json).unwrap();
        assert!(ORDER_IDS.contains(&order.id));
    }

    #[test]
    fn generate_test_user_has_fixed_login() {
        let json = generate_test_user().unwrap();
        let user: User = wire::from_json(&json).unwrap();
        assert_eq!(user.username(), TEST_USERNAME);
        assert_eq!(user.password, TEST_PASSWORD);
    }

    #[test]
    fn generate_test_pet_is_the_lion() {
        let json = generate_test_pet().unwrap();
        let pet: Pet = wire::from_json(&json).unwrap();
        assert_eq!(pet.name, TEST_PET_NAME);
        assert_eq!(pet.name, "Lion");
        assert!(PET_IDS.contains(&pet.id));
    }

    #[test]
    fn generate_test_order_is_placed() {
        let json = generate_test_order().unwrap();
        let order: Order = wire::from_json(&json).unwrap();
        assert_eq!(order.status, Some(OrderStatus::Placed));
        assert_eq!((order.pet_id, order.quantity), (1, 1));
        assert!(!order.complete);
    }

    #[test]
    fn user_array_has_requested_count() {
        let json = generate_user_array_json(3).unwrap();
        let users: Vec<User> = serde_json::from_str(&json).unwrap();
        assert_eq!(users.len(), 3);
        assert!(users.iter().all(|u| u.username().starts_with("user_")));
    }

    #[test]
    fn empty_array_is_brackets() {
        assert_eq!(generate_pet_array_json(0).unwrap(), "[]");
        assert_eq!(generate_order_array_json(0).unwrap(), "[]");
    }

    #[test]
    fn seeded_array_is_reproducible() {
        let a = EntityKind::Pet
            .array_json(&mut SmallRng::seed_from_u64(9), 4)
            .unwrap();
        let b = EntityKind::Pet
            .array_json(&mut SmallRng::seed_from_u64(9), 4)
            .unwrap();
        assert_eq!(a, b);
        let parsed: serde_json::Value = serde_json::from_str(&a).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 4);
    }

    #[test]
    fn entity_kind_from_str() {
        assert_eq!("Pet".parse::<EntityKind>(), Ok(EntityKind::Pet));
        assert_eq!("order".parse::<EntityKind>(), Ok(EntityKind::Order));
        assert!("horse".parse::<EntityKind>().is_err());
    }
}
