#![no_main]

use libfuzzer_sys::fuzz_target;

use sprout_accrual::{compute_balance, growth_factor, mul_div_floor};
use sprout_rates::RateHistory;
use sprout_types::{Amount, Rate, Timestamp};

// Balance computation with arbitrary principals, rates and elapsed times.
// Must never panic, and when it succeeds the balance never falls below the
// principal.
fuzz_target!(|input: (u128, u128, u64, u128, u128, u128)| {
    let (principal, rate, elapsed, a, b, d) = input;
    let principal = Amount::new(principal);
    let rate = Rate::new(rate);

    if let Ok(balance) = compute_balance(principal, rate, elapsed) {
        assert!(balance >= principal);
        if let Ok(later) = compute_balance(principal, rate, elapsed.saturating_add(1)) {
            assert!(later >= balance);
        }
    }
    let _ = growth_factor(rate, elapsed);

    if let Some(q) = mul_div_floor(a, b, d) {
        // q * d <= a * b, checked where it fits in 128 bits.
        if let (Some(lhs), Some(rhs)) = (q.checked_mul(d), a.checked_mul(b)) {
            assert!(lhs <= rhs);
        }
    }

    let mut history = RateHistory::new(rate, Timestamp::new(0));
    let _ = history.apply_rate_change(Rate::new(rate.raw() / 2), Timestamp::new(elapsed));
    let _ = history.rate_at(Timestamp::new(elapsed / 2));
});
