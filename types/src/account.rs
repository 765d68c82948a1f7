//! The persisted per-account record.

use crate::amount::Amount;
use crate::rate::Rate;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Everything the ledger stores for one account.
///
/// `principal` excludes interest that has not been crystallized yet; the
/// balance callers see is computed from all three fields and the current time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Stored principal in raw units.
    pub principal: Amount,
    /// Rate fixed at the most recent zero-to-nonzero transition.
    pub assigned_rate: Rate,
    /// When interest was last crystallized. `None` until the first time.
    pub last_accrual: Option<Timestamp>,
}

impl AccountRecord {
    /// A record that has never held a balance.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.principal.is_zero()
    }
}
