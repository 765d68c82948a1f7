//! Append-only history of the global rate.

use crate::error::RateError;
use serde::{Deserialize, Serialize};
use sprout_types::{Rate, Timestamp};

/// A period during which one global rate was in force.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSegment {
    /// The rate newly funded accounts received during this segment.
    pub rate: Rate,
    /// When this rate became effective.
    pub start: Timestamp,
    /// When this rate stopped being effective (None if still active).
    pub end: Option<Timestamp>,
}

/// Every global rate the ledger has used, oldest first.
///
/// The history does not drive accrual (accounts keep the rate they were
/// assigned); it answers "which rate would an account funded at `t` get".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateHistory {
    pub segments: Vec<RateSegment>,
}

impl RateHistory {
    pub fn new(initial_rate: Rate, genesis: Timestamp) -> Self {
        Self {
            segments: vec![RateSegment {
                rate: initial_rate,
                start: genesis,
                end: None,
            }],
        }
    }

    /// Close the current segment and open a new one at `change_at`.
    ///
    /// Monotonicity is the registry's concern; the history only rejects
    /// changes that would reorder time.
    pub fn apply_rate_change(
        &mut self,
        new_rate: Rate,
        change_at: Timestamp,
    ) -> Result<(), RateError> {
        if let Some(current) = self.segments.last_mut() {
            if change_at < current.start {
                return Err(RateError::InvalidTimestamp);
            }
            current.end = Some(change_at);
        }
        self.segments.push(RateSegment {
            rate: new_rate,
            start: change_at,
            end: None,
        });
        Ok(())
    }

    /// Get the current active rate.
    pub fn current_rate(&self) -> Rate {
        self.segments.last().map(|s| s.rate).unwrap_or(Rate::ZERO)
    }

    /// The rate in force at `at`. Before genesis, the genesis rate.
    pub fn rate_at(&self, at: Timestamp) -> Rate {
        self.segments
            .iter()
            .rev()
            .find(|s| s.start <= at)
            .or_else(|| self.segments.first())
            .map(|s| s.rate)
            .unwrap_or(Rate::ZERO)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Default for RateHistory {
    fn default() -> Self {
        Self::new(Rate::ZERO, Timestamp::EPOCH)
    }
}
