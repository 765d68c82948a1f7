//! Core accrual computation.

use crate::error::AccrualError;
use crate::math::mul_div_floor;
use sprout_types::{AccountRecord, Amount, Rate, Timestamp, PRECISION};

/// Seconds of accrual owed since `last_accrual`.
///
/// An account that has never accrued owes nothing: interest is not
/// back-dated to the epoch. A clock reading earlier than the last accrual
/// also yields zero.
pub fn elapsed_secs(last_accrual: Option<Timestamp>, now: Timestamp) -> u64 {
    match last_accrual {
        Some(last) => last.elapsed_since(now),
        None => 0,
    }
}

/// `PRECISION + rate × elapsed`.
///
/// Strictly linear in `elapsed`; there is no compounding inside one
/// accrual window.
pub fn growth_factor(rate: Rate, elapsed: u64) -> Result<u128, AccrualError> {
    rate.raw()
        .checked_mul(elapsed as u128)
        .and_then(|growth| growth.checked_add(PRECISION))
        .ok_or(AccrualError::Overflow)
}

/// `principal × growth_factor(rate, elapsed) / PRECISION`, rounded down.
///
/// Evaluated as `principal + floor(principal × rate × elapsed / PRECISION)`,
/// which is the same value without materialising the scaled factor.
pub fn compute_balance(
    principal: Amount,
    rate: Rate,
    elapsed: u64,
) -> Result<Amount, AccrualError> {
    let interest = pending_interest(principal, rate, elapsed)?;
    principal.checked_add(interest).ok_or(AccrualError::Overflow)
}

/// Interest owed on `principal` over `elapsed` seconds, rounded down.
pub fn pending_interest(
    principal: Amount,
    rate: Rate,
    elapsed: u64,
) -> Result<Amount, AccrualError> {
    if principal.is_zero() || rate.is_zero() || elapsed == 0 {
        return Ok(Amount::ZERO);
    }
    let growth = rate
        .raw()
        .checked_mul(elapsed as u128)
        .ok_or(AccrualError::Overflow)?;
    mul_div_floor(principal.raw(), growth, PRECISION)
        .map(Amount::new)
        .ok_or(AccrualError::Overflow)
}

/// Computed balance of a stored record at `now`.
pub fn accrued_balance(record: &AccountRecord, now: Timestamp) -> Result<Amount, AccrualError> {
    compute_balance(
        record.principal,
        record.assigned_rate,
        elapsed_secs(record.last_accrual, now),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: u64 = 3600;

    fn whole(n: u128) -> Amount {
        Amount::from_whole(n).unwrap()
    }

    #[test]
    fn never_accrued_owes_nothing() {
        assert_eq!(elapsed_secs(None, Timestamp::new(1_000_000)), 0);
        let record = AccountRecord {
            principal: whole(1000),
            assigned_rate: Rate::new(50_000_000_000),
            last_accrual: None,
        };
        assert_eq!(accrued_balance(&record, Timestamp::new(1_000_000)).unwrap(), whole(1000));
    }

    #[test]
    fn growth_factor_is_linear() {
        let rate = Rate::new(7);
        assert_eq!(growth_factor(rate, 0).unwrap(), PRECISION);
        assert_eq!(growth_factor(rate, 10).unwrap(), PRECISION + 70);
    }

    #[test]
    fn growth_factor_overflow() {
        assert_eq!(growth_factor(Rate::new(u128::MAX), 2), Err(AccrualError::Overflow));
        assert_eq!(
            growth_factor(Rate::new(u128::MAX - PRECISION + 1), 1),
            Err(AccrualError::Overflow)
        );
    }

    #[test]
    fn one_hour_at_reference_rate() {
        // 1000 units at 5e10/s for one hour: 1000e18 * 5e10 * 3600 / 1e18 = 1.8e17
        let balance = compute_balance(whole(1000), Rate::new(50_000_000_000), HOUR).unwrap();
        assert_eq!(balance.raw(), 1000 * PRECISION + 180_000_000_000_000_000);
    }

    #[test]
    fn matches_factor_formula() {
        let principal = Amount::new(123_456_789_123_456_789);
        let rate = Rate::new(3_170_979_198);
        let elapsed = 86_400;
        let factor = growth_factor(rate, elapsed).unwrap();
        let expected = principal.raw() * factor / PRECISION;
        assert_eq!(compute_balance(principal, rate, elapsed).unwrap().raw(), expected);
    }

    #[test]
    fn rounds_down() {
        // 1 raw unit never earns a fraction.
        assert_eq!(compute_balance(Amount::new(1), Rate::new(1), 1).unwrap(), Amount::new(1));
        // 3 raw at half a unit per second earns 1.5 raw, paid as 1.
        let principal = Amount::new(3);
        let rate = Rate::new(PRECISION / 2);
        assert_eq!(pending_interest(principal, rate, 1).unwrap(), Amount::new(1));
    }

    #[test]
    fn zero_rate_or_principal_is_flat() {
        assert_eq!(compute_balance(whole(5), Rate::ZERO, HOUR).unwrap(), whole(5));
        assert_eq!(compute_balance(Amount::ZERO, Rate::new(10), HOUR).unwrap(), Amount::ZERO);
    }

    #[test]
    fn large_principal_uses_wide_path() {
        // principal * rate * elapsed exceeds u128 but the result fits.
        let principal = Amount::new(u128::MAX / 4);
        let rate = Rate::new(PRECISION);
        let balance = compute_balance(principal, rate, 1).unwrap();
        assert_eq!(balance.raw(), (u128::MAX / 4) * 2);
    }

    #[test]
    fn result_overflow_is_error() {
        let principal = Amount::new(u128::MAX / 2);
        let rate = Rate::new(PRECISION * 2);
        assert_eq!(compute_balance(principal, rate, 1), Err(AccrualError::Overflow));
    }

    #[test]
    fn clock_behind_last_accrual_is_flat() {
        let record = AccountRecord {
            principal: whole(10),
            assigned_rate: Rate::new(1_000_000_000),
            last_accrual: Some(Timestamp::new(500)),
        };
        assert_eq!(accrued_balance(&record, Timestamp::new(100)).unwrap(), whole(10));
    }
}
