use std::ops::Range;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;

use crate::model::{Order, OrderStatus};
use crate::random::{self, PreconditionError};

/// Freshly generated order ids. Disjoint from pet and user ids.
pub const ORDER_IDS: Range<i64> = 10_000..20_000;

/// Pets referenced by generated orders (not required to exist).
pub const ORDER_PET_IDS: Range<i64> = 1..1_000;

/// Order quantity, 1 to 10.
pub const QUANTITY: Range<i64> = 1..11;

const SHIP_DATE_OFFSET_DAYS: i64 = 1;

/// # Errors
///
/// Only if one of the built-in pools or ranges is empty.
pub fn random_order(rng: &mut impl Rng) -> Result<Order, PreconditionError> {
    random_order_at(rng, Utc::now())
}

/// [`random_order`] with an explicit clock.
///
/// # Errors
///
/// Only if one of the built-in pools or ranges is empty.
pub fn random_order_at(rng: &mut impl Rng, now: DateTime<Utc>) -> Result<Order, PreconditionError> {
    Ok(Order {
        id: order_id(rng)?,
        pet_id: random::int_in(rng, ORDER_PET_IDS)?,
        quantity: random::int_in(rng, QUANTITY)?,
        ship_date: Some(ship_date(now)),
        status: Some(*random::pick(rng, &OrderStatus::ALL)?),
        complete: random::coin(rng),
    })
}

/// Deterministic order for lookups: one unit of pet 1, placed, not complete.
///
/// # Errors
///
/// Only if the id range is empty.
pub fn test_order(rng: &mut impl Rng) -> Result<Order, PreconditionError> {
    Ok(Order {
        id: order_id(rng)?,
        pet_id: 1,
        quantity: 1,
        ship_date: Some(ship_date(Utc::now())),
        status: Some(OrderStatus::Placed),
        complete: false,
    })
}

/// # Errors
///
/// Only if [`ORDER_IDS`] is empty.
pub fn order_id(rng: &mut impl Rng) -> Result<i64, PreconditionError> {
    random::int_in(rng, ORDER_IDS)
}

fn ship_date(now: DateTime<Utc>) -> String {
    (now + Duration::days(SHIP_DATE_OFFSET_DAYS)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn ship_date_is_one_day_ahead() {
        let now = Utc.with_ymd_and_hms(2026, 2, 28, 12, 30, 0).unwrap();
        assert_eq!(ship_date(now), "2026-03-01T12:30:00.000Z");
    }

    #[test]
    fn random_order_fields_within_bounds() {
        let mut rng = SmallRng::seed_from_u64(11);
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        for _ in 0..200 {
            let order = random_order_at(&mut rng, now).unwrap();
            assert!(ORDER_IDS.contains(&order.id));
            assert!(ORDER_PET_IDS.contains(&order.pet_id));
            assert!((1..=10).contains(&order.quantity));
            assert_eq!(
                order.ship_date.as_deref(),
                Some("2026-01-02T00:00:00.000Z")
            );
            assert!(order.status.is_some());
        }
    }

    #[test]
    fn quantity_reaches_both_bounds() {
        let mut rng = SmallRng::seed_from_u64(12);
        let now = Utc::now();
        let quantities: std::collections::HashSet<i64> = (0..500)
            .map(|_| random_order_at(&mut rng, now).unwrap().quantity)
            .collect();
        assert!(quantities.contains(&1));
        assert!(quantities.contains(&10));
    }

    #[test]
    fn test_order_is_placed_and_incomplete() {
        let order = test_order(&mut SmallRng::seed_from_u64(13)).unwrap();
        assert_eq!(order.status, Some(OrderStatus::Placed));
        assert!(!order.complete);
        assert_eq!(order.quantity, 1);
    }
}
