use proptest::prelude::*;

use sprout_rates::RateRegistry;
use sprout_types::{Rate, Timestamp};

proptest! {
    /// Whatever sequence of updates is attempted, accepted values never rise
    /// and rejected values leave the rate untouched.
    #[test]
    fn global_rate_never_increases(
        initial in 0u128..1_000_000_000_000,
        updates in prop::collection::vec(0u128..1_000_000_000_000, 1..50),
    ) {
        let mut reg = RateRegistry::new(Rate::new(initial), Timestamp::new(0));
        for (i, raw) in updates.into_iter().enumerate() {
            let before = reg.global_rate();
            let requested = Rate::new(raw);
            let result = reg.set_global_rate(requested, Timestamp::new(i as u64 + 1));
            if requested > before {
                prop_assert!(result.is_err());
                prop_assert_eq!(reg.global_rate(), before);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(reg.global_rate(), requested);
            }
        }
        let history = reg.history();
        for pair in history.segments.windows(2) {
            prop_assert!(pair[1].rate <= pair[0].rate);
        }
    }

    /// `rate_at` returns the rate of the latest segment started at or before `at`.
    #[test]
    fn rate_at_tracks_segments(steps in prop::collection::vec(1u64..1_000, 1..20)) {
        let mut reg = RateRegistry::new(Rate::new(10_000), Timestamp::new(0));
        let mut t = 0u64;
        let mut rate = 10_000u128;
        for step in steps {
            t += step;
            rate -= 1;
            reg.set_global_rate(Rate::new(rate), Timestamp::new(t)).unwrap();
            prop_assert_eq!(reg.history().rate_at(Timestamp::new(t)), Rate::new(rate));
            prop_assert_eq!(reg.history().rate_at(Timestamp::new(t - 1)), Rate::new(rate + 1));
        }
    }
}
