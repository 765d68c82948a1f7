//! The rate registry.

use crate::error::RateError;
use crate::history::RateHistory;
use sprout_types::{AccountRecord, Rate, Timestamp};
use std::fmt;

/// An accepted global rate update, delivered to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateChange {
    pub previous: Rate,
    pub current: Rate,
    pub at: Timestamp,
}

type RateObserver = Box<dyn Fn(&RateChange) + Send + Sync>;

/// Owner of the global rate.
///
/// `set_global_rate` is the only way to change it and never lets it rise.
/// Per-account rates live in each [`AccountRecord`]; the registry writes them
/// only on records the ledger hands it.
pub struct RateRegistry {
    history: RateHistory,
    observers: Vec<RateObserver>,
}

impl RateRegistry {
    pub fn new(initial_rate: Rate, genesis: Timestamp) -> Self {
        Self::from_history(RateHistory::new(initial_rate, genesis))
    }

    pub fn from_history(history: RateHistory) -> Self {
        Self {
            history,
            observers: Vec::new(),
        }
    }

    /// The rate newly funded accounts receive.
    pub fn global_rate(&self) -> Rate {
        self.history.current_rate()
    }

    pub fn history(&self) -> &RateHistory {
        &self.history
    }

    /// Give an empty account the current global rate.
    pub fn assign_rate(&self, record: &mut AccountRecord) -> Result<Rate, RateError> {
        if !record.is_empty() {
            return Err(RateError::AccountFunded {
                principal: record.principal,
            });
        }
        record.assigned_rate = self.global_rate();
        Ok(record.assigned_rate)
    }

    /// Give an empty recipient the sender's assigned rate.
    pub fn propagate_rate(from: &AccountRecord, to: &mut AccountRecord) -> Result<Rate, RateError> {
        if !to.is_empty() {
            return Err(RateError::AccountFunded {
                principal: to.principal,
            });
        }
        to.assigned_rate = from.assigned_rate;
        Ok(to.assigned_rate)
    }

    /// Validate a global rate update without applying it.
    pub fn check_global_rate(&self, new_rate: Rate, at: Timestamp) -> Result<(), RateError> {
        let current = self.global_rate();
        if new_rate > current {
            return Err(RateError::RateIncreaseRejected {
                current,
                requested: new_rate,
            });
        }
        match self.history.segments.last() {
            Some(segment) if at < segment.start => Err(RateError::InvalidTimestamp),
            _ => Ok(()),
        }
    }

    /// Replace the global rate. Rejects any increase; an equal rate is accepted.
    pub fn set_global_rate(
        &mut self,
        new_rate: Rate,
        at: Timestamp,
    ) -> Result<RateChange, RateError> {
        if let Err(e) = self.check_global_rate(new_rate, at) {
            tracing::warn!(
                requested = %new_rate,
                current = %self.global_rate(),
                error = %e,
                "global rate update rejected"
            );
            return Err(e);
        }
        let previous = self.global_rate();
        self.history.apply_rate_change(new_rate, at)?;
        let change = RateChange {
            previous,
            current: new_rate,
            at,
        };
        tracing::info!(previous = %previous, current = %new_rate, at = %at, "global rate lowered");
        for observer in &self.observers {
            observer(&change);
        }
        Ok(change)
    }

    /// Register a callback invoked after every accepted rate update.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&RateChange) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }
}

impl Default for RateRegistry {
    fn default() -> Self {
        Self::from_history(RateHistory::default())
    }
}

impl fmt::Debug for RateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateRegistry")
            .field("history", &self.history)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_types::Amount;
    use std::sync::{Arc, Mutex};

    fn registry(rate: u128) -> RateRegistry {
        RateRegistry::new(Rate::new(rate), Timestamp::new(0))
    }

    #[test]
    fn assign_gives_current_global_rate() {
        let reg = registry(500);
        let mut record = AccountRecord::empty();
        assert_eq!(reg.assign_rate(&mut record).unwrap(), Rate::new(500));
        assert_eq!(record.assigned_rate, Rate::new(500));
    }

    #[test]
    fn assign_rejects_funded_account() {
        let reg = registry(500);
        let mut record = AccountRecord {
            principal: Amount::new(1),
            assigned_rate: Rate::new(900),
            last_accrual: None,
        };
        let err = reg.assign_rate(&mut record).unwrap_err();
        assert_eq!(err, RateError::AccountFunded { principal: Amount::new(1) });
        assert_eq!(record.assigned_rate, Rate::new(900));
    }

    #[test]
    fn propagate_copies_sender_rate() {
        let sender = AccountRecord {
            principal: Amount::new(10),
            assigned_rate: Rate::new(777),
            last_accrual: Some(Timestamp::new(5)),
        };
        let mut recipient = AccountRecord::empty();
        RateRegistry::propagate_rate(&sender, &mut recipient).unwrap();
        assert_eq!(recipient.assigned_rate, Rate::new(777));
    }

    #[test]
    fn propagate_rejects_funded_recipient() {
        let sender = AccountRecord {
            principal: Amount::new(10),
            assigned_rate: Rate::new(777),
            last_accrual: None,
        };
        let mut recipient = AccountRecord {
            principal: Amount::new(3),
            assigned_rate: Rate::new(1),
            last_accrual: None,
        };
        assert!(RateRegistry::propagate_rate(&sender, &mut recipient).is_err());
        assert_eq!(recipient.assigned_rate, Rate::new(1));
    }

    #[test]
    fn increase_rejected_and_rate_unchanged() {
        let mut reg = registry(500);
        let err = reg.set_global_rate(Rate::new(501), Timestamp::new(10)).unwrap_err();
        assert_eq!(
            err,
            RateError::RateIncreaseRejected {
                current: Rate::new(500),
                requested: Rate::new(501),
            }
        );
        assert_eq!(reg.global_rate(), Rate::new(500));
        assert_eq!(reg.history().len(), 1);
    }

    #[test]
    fn decrease_and_equal_accepted() {
        let mut reg = registry(500);
        let change = reg.set_global_rate(Rate::new(400), Timestamp::new(10)).unwrap();
        assert_eq!(change.previous, Rate::new(500));
        assert_eq!(change.current, Rate::new(400));
        reg.set_global_rate(Rate::new(400), Timestamp::new(20)).unwrap();
        assert_eq!(reg.global_rate(), Rate::new(400));
        assert_eq!(reg.history().len(), 3);
    }

    #[test]
    fn backdated_change_rejected() {
        let mut reg = registry(500);
        reg.set_global_rate(Rate::new(400), Timestamp::new(100)).unwrap();
        let err = reg.set_global_rate(Rate::new(300), Timestamp::new(50)).unwrap_err();
        assert_eq!(err, RateError::InvalidTimestamp);
        assert_eq!(reg.global_rate(), Rate::new(400));
    }

    #[test]
    fn observers_see_accepted_changes_only() {
        let mut reg = registry(500);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        reg.subscribe(move |change| sink.lock().unwrap().push(*change));

        reg.set_global_rate(Rate::new(450), Timestamp::new(1)).unwrap();
        let _ = reg.set_global_rate(Rate::new(460), Timestamp::new(2));
        reg.set_global_rate(Rate::new(100), Timestamp::new(3)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].current, Rate::new(450));
        assert_eq!(seen[1].previous, Rate::new(450));
        assert_eq!(seen[1].current, Rate::new(100));
    }
}
