//! Events emitted after ledger transitions commit.

use crate::auth::Capability;
use sprout_types::{AccountId, Amount, Quantity, Rate, Timestamp};

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
///
/// Events of a transition are emitted only after it has been applied; a
/// rejected operation emits nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Pending interest was folded into principal.
    InterestCrystallized {
        account: AccountId,
        interest: Amount,
        at: Timestamp,
    },
    /// An empty account was given a rate as it became funded.
    RateAssigned {
        account: AccountId,
        rate: Rate,
        /// The sender whose rate was inherited, or `None` for the global rate.
        inherited_from: Option<AccountId>,
    },
    Minted {
        account: AccountId,
        amount: Amount,
    },
    Burned {
        account: AccountId,
        amount: Amount,
    },
    Transferred {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
    Approved {
        owner: AccountId,
        spender: AccountId,
        allowance: Quantity,
    },
    GlobalRateLowered {
        previous: Rate,
        current: Rate,
        at: Timestamp,
    },
    CapabilityGranted {
        account: AccountId,
        capability: Capability,
    },
    CapabilityRevoked {
        account: AccountId,
        capability: Capability,
    },
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline on the emitting thread, after the
/// transition is applied.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
