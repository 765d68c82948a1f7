//! Interest-accruing balance ledger.
//!
//! Each account stores a principal, the rate it was assigned when it became
//! funded, and the time interest was last folded in. Balances are computed on
//! read; every mutation crystallizes the accounts it touches first.

pub mod allowance;
pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod persistence;
pub mod transition;

pub use allowance::Allowances;
pub use auth::{Capability, CapabilityGate};
pub use config::{LedgerConfig, DEFAULT_GLOBAL_RATE};
pub use error::LedgerError;
pub use event::{EventBus, LedgerEvent};
pub use ledger::Ledger;
pub use transition::Transition;
