//! Nullable clock for deterministic time in tests.

use sprout_types::{Clock, Timestamp};
use std::cell::Cell;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
#[derive(Debug)]
pub struct NullClock {
    current: Cell<Timestamp>,
}

impl NullClock {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            current: Cell::new(initial),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get().saturating_add_secs(secs));
    }

    /// Set the time to a specific value. Moving backwards is allowed.
    pub fn set(&self, at: Timestamp) {
        self.current.set(at);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        self.current.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_on_request() {
        let clock = NullClock::new(Timestamp::new(10));
        assert_eq!(clock.now(), Timestamp::new(10));
        clock.advance(5);
        assert_eq!(clock.now(), Timestamp::new(15));
        clock.set(Timestamp::new(3));
        assert_eq!(clock.now(), Timestamp::new(3));
    }
}
