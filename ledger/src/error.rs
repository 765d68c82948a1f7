use crate::auth::Capability;
use sprout_accrual::AccrualError;
use sprout_rates::RateError;
use sprout_store::StoreError;
use sprout_types::{AccountId, Amount, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unauthorized: {caller} lacks {required}")]
    Unauthorized {
        caller: AccountId,
        required: Capability,
    },

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("insufficient allowance: need {needed}, allowed {allowed}")]
    InsufficientAllowance { needed: Amount, allowed: Amount },

    #[error("rate error: {0}")]
    Rate(#[from] RateError),

    #[error("accrual error: {0}")]
    Accrual(#[from] AccrualError),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("clock regression on {account}: {now} is before last accrual {last}")]
    ClockRegression {
        account: AccountId,
        last: Timestamp,
        now: Timestamp,
    },

    #[error("transition was prepared at revision {prepared}, ledger is at {current}")]
    StaleTransition { prepared: u64, current: u64 },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("config error: {0}")]
    Config(String),
}

impl LedgerError {
    /// Whether the global rate update was rejected for trying to raise it.
    pub fn is_rate_increase(&self) -> bool {
        matches!(self, LedgerError::Rate(RateError::RateIncreaseRejected { .. }))
    }
}
