//! Linear interest computation and realization.
//!
//! `displayed = principal * (P + rate * elapsed) / P`
//!
//! Nothing here iterates holders. A balance is recomputed from the holder's own
//! record whenever it is read, and folded into principal whenever the holder
//! is touched by a mutation.

use crate::error::LedgerError;
use crate::record::HolderRecord;
use lockrate_types::{Rate, Timestamp};

/// Stateless accrual computations over a [`HolderRecord`].
pub struct AccrualEngine;

impl AccrualEngine {
    /// Interest accrued since the record's last realization, or `None` on
    /// overflow. A `now` earlier than the record's timestamp yields zero.
    pub fn pending_interest_checked(record: &HolderRecord, now: Timestamp) -> Option<u128> {
        let elapsed = record.last_accrual.elapsed_since(now);
        if record.principal == 0 || elapsed == 0 || record.locked_rate.is_zero() {
            return Some(0);
        }
        let growth = record.locked_rate.raw().checked_mul(elapsed as u128)?;
        // p * (P + g) / P == p + p * g / P exactly, so only the interest term
        // needs the scaled product.
        mul_div_scale(record.principal, growth)
    }

    /// Displayed balance at `now`, or `None` on overflow.
    pub fn compute_displayed_balance_checked(
        record: &HolderRecord,
        now: Timestamp,
    ) -> Option<u128> {
        let interest = Self::pending_interest_checked(record, now)?;
        record.principal.checked_add(interest)
    }

    /// Displayed balance at `now`, saturating at `u128::MAX`.
    pub fn compute_displayed_balance(record: &HolderRecord, now: Timestamp) -> u128 {
        Self::compute_displayed_balance_checked(record, now).unwrap_or(u128::MAX)
    }

    /// Fold pending interest into principal and restart the accrual clock.
    ///
    /// Returns the principal increase. Realizing twice at the same `now` adds
    /// nothing the second time. On error the record is left untouched.
    pub fn realize_accrual(record: &mut HolderRecord, now: Timestamp) -> Result<u128, LedgerError> {
        if now < record.last_accrual {
            return Err(LedgerError::InvalidTimestamp {
                last: record.last_accrual,
                now,
            });
        }
        let interest =
            Self::pending_interest_checked(record, now).ok_or(LedgerError::ArithmeticOverflow)?;
        record.principal = record
            .principal
            .checked_add(interest)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        record.last_accrual = now;
        Ok(interest)
    }
}

/// `floor(x * y / SCALE)` without forming the full `x * y` product.
///
/// With `x = q*P + r` and `y = a*P + b`:
/// `x*y/P = q*y + r*a + r*b/P`, where only the last term truncates and
/// `r*b < P^2` always fits. Returns `None` only when a partial sum overflows.
pub(crate) fn mul_div_scale(x: u128, y: u128) -> Option<u128> {
    let p = Rate::SCALE;
    let (q, r) = (x / p, x % p);
    let (a, b) = (y / p, y % p);
    q.checked_mul(y)?
        .checked_add(r.checked_mul(a)?)?
        .checked_add(r * b / p)
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: u128 = Rate::SCALE;

    fn record(principal: u128, rate: u128, at: u64) -> HolderRecord {
        HolderRecord::new(principal, Rate::from_raw(rate), Timestamp::new(at))
    }

    #[test]
    fn mul_div_scale_matches_naive_formula() {
        let cases = [
            (0u128, 0u128),
            (1, P),
            (1_000_000, 180_000_000_000_000),
            (P + 7, 3 * P + 11),
            (123_456_789_012_345, 987_654_321),
        ];
        for (x, y) in cases {
            assert_eq!(mul_div_scale(x, y), Some(x * y / P), "x={x} y={y}");
        }
    }

    #[test]
    fn mul_div_scale_handles_products_beyond_u128() {
        // x*y is ~1e48 but the quotient is 1e30
        let x = 10u128.pow(30);
        let y = P;
        assert_eq!(mul_div_scale(x, y), Some(x));
        assert_eq!(mul_div_scale(u128::MAX, 2 * P), None);
    }

    #[test]
    fn displayed_balance_scenario_one_hour() {
        let r = record(1_000_000, 50_000_000_000, 0);
        assert_eq!(AccrualEngine::compute_displayed_balance(&r, Timestamp::new(0)), 1_000_000);
        assert_eq!(
            AccrualEngine::compute_displayed_balance(&r, Timestamp::new(3600)),
            1_000_180
        );
        assert_eq!(
            AccrualEngine::compute_displayed_balance(&r, Timestamp::new(7200)),
            1_000_360
        );
    }

    #[test]
    fn zero_rate_or_zero_principal_accrues_nothing() {
        let now = Timestamp::new(1_000_000);
        assert_eq!(
            AccrualEngine::compute_displayed_balance(&record(500, 0, 0), now),
            500
        );
        assert_eq!(
            AccrualEngine::compute_displayed_balance(&record(0, 10u128.pow(17), 0), now),
            0
        );
    }

    #[test]
    fn query_before_last_accrual_returns_principal() {
        let r = record(1_000, P, 500);
        assert_eq!(AccrualEngine::compute_displayed_balance(&r, Timestamp::new(100)), 1_000);
    }

    #[test]
    fn unchecked_balance_saturates_on_overflow() {
        let r = record(u128::MAX / 2, P, 0);
        let now = Timestamp::new(10);
        assert_eq!(AccrualEngine::compute_displayed_balance_checked(&r, now), None);
        assert_eq!(AccrualEngine::compute_displayed_balance(&r, now), u128::MAX);
    }

    #[test]
    fn realize_moves_interest_into_principal() {
        let mut r = record(1_000_000, 50_000_000_000, 0);
        let gained = AccrualEngine::realize_accrual(&mut r, Timestamp::new(3600)).unwrap();
        assert_eq!(gained, 180);
        assert_eq!(r.principal, 1_000_180);
        assert_eq!(r.last_accrual, Timestamp::new(3600));
    }

    #[test]
    fn realize_is_idempotent_at_same_timestamp() {
        let mut r = record(1_000_000, 50_000_000_000, 0);
        AccrualEngine::realize_accrual(&mut r, Timestamp::new(3600)).unwrap();
        let second = AccrualEngine::realize_accrual(&mut r, Timestamp::new(3600)).unwrap();
        assert_eq!(second, 0);
        assert_eq!(r.principal, 1_000_180);
    }

    #[test]
    fn realize_rejects_clock_regression() {
        let mut r = record(1_000, 10, 100);
        let before = r;
        let err = AccrualEngine::realize_accrual(&mut r, Timestamp::new(99)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTimestamp { .. }));
        assert_eq!(r, before);
    }

    #[test]
    fn realize_overflow_leaves_record_untouched() {
        let mut r = record(u128::MAX - 1, P, 0);
        let before = r;
        let err = AccrualEngine::realize_accrual(&mut r, Timestamp::new(1)).unwrap_err();
        assert!(matches!(err, LedgerError::ArithmeticOverflow));
        assert_eq!(r, before);
    }
}
