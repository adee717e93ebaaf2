//! Bounded random values shared by the fixture generators
//!
//! Every helper takes the generator explicitly, so there is no process-wide
//! random state: callers pass a seeded `SmallRng` in tests and
//! `rand::thread_rng()` elsewhere. Integer ranges are half-open (`lo..hi`)
//! at every call site.

use std::ops::Range;

use rand::Rng;

/// Characters used for passwords and other opaque tokens.
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Hex characters in a UUID without dashes.
const UUID_HEX_LEN: usize = 32;

/// Invalid input to a generator. Generation aborts before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("cannot pick from an empty candidate pool")]
    EmptyPool,
    #[error("empty range {lo}..{hi}")]
    EmptyRange { lo: i64, hi: i64 },
    #[error("suffix of {0} hex characters is longer than a UUID ({UUID_HEX_LEN})")]
    SuffixTooLong(usize),
}

/// Uniform integer in `[range.start, range.end)`.
///
/// # Errors
///
/// Returns [`PreconditionError::EmptyRange`] if the range contains no value.
pub fn int_in(rng: &mut impl Rng, range: Range<i64>) -> Result<i64, PreconditionError> {
    if range.is_empty() {
        return Err(PreconditionError::EmptyRange {
            lo: range.start,
            hi: range.end,
        });
    }
    Ok(rng.gen_range(range))
}

/// Uniform collection size in `[range.start, range.end)`.
///
/// # Errors
///
/// Returns [`PreconditionError::EmptyRange`] if the range contains no value.
pub fn count_in(rng: &mut impl Rng, range: Range<usize>) -> Result<usize, PreconditionError> {
    if range.is_empty() {
        return Err(PreconditionError::EmptyRange {
            lo: i64::try_from(range.start).unwrap_or(i64::MAX),
            hi: i64::try_from(range.end).unwrap_or(i64::MAX),
        });
    }
    Ok(rng.gen_range(range))
}

/// One element of `pool`, each with equal probability.
///
/// # Errors
///
/// Returns [`PreconditionError::EmptyPool`] if `pool` is empty.
pub fn pick<'a, T>(rng: &mut impl Rng, pool: &'a [T]) -> Result<&'a T, PreconditionError> {
    if pool.is_empty() {
        return Err(PreconditionError::EmptyPool);
    }
    Ok(&pool[rng.gen_range(0..pool.len())])
}

/// Fair coin.
pub fn coin(rng: &mut impl Rng) -> bool {
    rng.gen_bool(0.5)
}

/// `len` characters drawn from `A-Za-z0-9`.
pub fn token(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())] as char)
        .collect()
}

/// Version 4 UUID built from the generator's bytes.
pub fn uuid(rng: &mut impl Rng) -> uuid::Uuid {
    uuid::Builder::from_random_bytes(rng.r#gen::<[u8; 16]>()).into_uuid()
}

/// First `len` lowercase hex characters of a fresh UUID.
///
/// # Errors
///
/// Returns [`PreconditionError::SuffixTooLong`] if `len` exceeds 32.
pub fn hex_suffix(rng: &mut impl Rng, len: usize) -> Result<String, PreconditionError> {
    if len > UUID_HEX_LEN {
        return Err(PreconditionError::SuffixTooLong(len));
    }
    let simple = uuid(rng).simple().to_string();
    Ok(simple[..len].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn int_in_respects_half_open_range() {
        let mut rng = rng();
        for _ in 0..1000 {
            let v = int_in(&mut rng, 10..13).unwrap();
            assert!((10..13).contains(&v));
        }
    }

    #[test]
    fn int_in_single_value_range() {
        assert_eq!(int_in(&mut rng(), 5..6).unwrap(), 5);
    }

    #[test]
    fn int_in_empty_range_is_precondition_error() {
        assert_eq!(
            int_in(&mut rng(), 5..5),
            Err(PreconditionError::EmptyRange { lo: 5, hi: 5 })
        );
    }

    #[test]
    fn count_in_empty_range_is_precondition_error() {
        assert!(matches!(
            count_in(&mut rng(), 3..1),
            Err(PreconditionError::EmptyRange { lo: 3, hi: 1 })
        ));
    }

    #[test]
    fn pick_from_empty_pool_fails() {
        let pool: [&str; 0] = [];
        assert_eq!(pick(&mut rng(), &pool), Err(PreconditionError::EmptyPool));
    }

    #[test]
    fn pick_eventually_reaches_every_candidate() {
        let pool = ["a", "b", "c"];
        let mut rng = rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(*pick(&mut rng, &pool).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn token_uses_alphanumeric_alphabet() {
        let t = token(&mut rng(), 64);
        assert_eq!(t.len(), 64);
        assert!(t.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn token_of_zero_length_is_empty() {
        assert!(token(&mut rng(), 0).is_empty());
    }

    #[test]
    fn hex_suffix_is_lowercase_hex() {
        let s = hex_suffix(&mut rng(), 5).unwrap();
        assert_eq!(s.len(), 5);
        assert!(
            s.chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn hex_suffix_full_uuid_length_allowed() {
        assert_eq!(hex_suffix(&mut rng(), 32).unwrap().len(), 32);
    }

    #[test]
    fn hex_suffix_too_long_fails() {
        assert_eq!(
            hex_suffix(&mut rng(), 33),
            Err(PreconditionError::SuffixTooLong(33))
        );
    }

    #[test]
    fn uuid_is_version_4() {
        assert_eq!(uuid(&mut rng()).get_version_num(), 4);
    }

    #[test]
    fn same_seed_same_values() {
        let a = token(&mut rng(), 16);
        let b = token(&mut rng(), 16);
        assert_eq!(a, b);
    }
}
