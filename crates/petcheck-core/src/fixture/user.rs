use std::ops::Range;

use rand::Rng;

use crate::model::User;
use crate::random::{self, PreconditionError};

/// Freshly generated user ids. Disjoint from pet and order ids.
pub const USER_IDS: Range<i64> = 20_000..30_000;

pub const FIRST_NAMES: &[&str] = &["John", "Alice", "Bob", "Emma", "David"];
pub const LAST_NAMES: &[&str] = &["Doe", "Smith", "Johnson", "Brown", "Wilson"];

/// Stable login used by lookup and login scenarios.
pub const TEST_USERNAME: &str = "testuser";
pub const TEST_PASSWORD: &str = "testPass123";

const USERNAME_PREFIX: &str = "user_";
const USERNAME_SUFFIX_LEN: usize = 8;
const PASSWORD_LEN: usize = 10;
const PHONE_NUMBERS: Range<i64> = 0..1_000_000_000;
const USER_STATUSES: Range<i64> = 0..2;

/// # Errors
///
/// Only if one of the built-in pools or ranges is empty.
pub fn random_user(rng: &mut impl Rng) -> Result<User, PreconditionError> {
    let username = format!(
        "{USERNAME_PREFIX}{}",
        random::hex_suffix(rng, USERNAME_SUFFIX_LEN)?
    );
    Ok(User::new(user_id(rng)?, username)
        .with_name(
            *random::pick(rng, FIRST_NAMES)?,
            *random::pick(rng, LAST_NAMES)?,
        )
        .with_password(random::token(rng, PASSWORD_LEN))
        .with_phone(format!("+1{:010}", random::int_in(rng, PHONE_NUMBERS)?))
        .with_status(random::int_in(rng, USER_STATUSES)?))
}

/// Deterministic `testuser` account; only the id varies.
///
/// # Errors
///
/// Only if the id range is empty.
pub fn test_user(rng: &mut impl Rng) -> Result<User, PreconditionError> {
    Ok(User::new(user_id(rng)?, TEST_USERNAME)
        .with_name("Ivan", "Ivanov")
        .with_password(TEST_PASSWORD)
        .with_phone("1223818010")
        .with_status(1))
}

/// # Errors
///
/// Only if [`USER_IDS`] is empty.
pub fn user_id(rng: &mut impl Rng) -> Result<i64, PreconditionError> {
    random::int_in(rng, USER_IDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use regex::Regex;

    #[test]
    fn random_user_shape() {
        let username_re = Regex::new(r"^user_[0-9a-f]{8}$").unwrap();
        let phone_re = Regex::new(r"^\+1[0-9]{10}$").unwrap();
        let mut rng = SmallRng::seed_from_u64(21);
        for _ in 0..100 {
            let user = random_user(&mut rng).unwrap();
            assert!(USER_IDS.contains(&user.id));
            assert!(username_re.is_match(user.username()));
            assert!(phone_re.is_match(&user.phone), "bad phone {}", user.phone);
            assert_eq!(user.password.len(), 10);
            assert!(FIRST_NAMES.contains(&user.first_name.as_str()));
            assert!(LAST_NAMES.contains(&user.last_name.as_str()));
            assert!((0..2).contains(&user.user_status));
        }
    }

    #[test]
    fn test_user_identity() {
        let user = test_user(&mut SmallRng::seed_from_u64(22)).unwrap();
        assert_eq!(user.username(), TEST_USERNAME);
        assert_eq!(user.password, TEST_PASSWORD);
        assert_eq!(user.email(), "testuser@example.com");
        assert_eq!(user.user_status, 1);
    }
}
