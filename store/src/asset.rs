use sprout_types::{AccountId, Amount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("insufficient external funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    #[error("external transfer rejected: {0}")]
    Rejected(String),
}

/// The external value store backing ledger deposits.
///
/// `collect` pulls funds from a holder into custody; `release` pays funds out
/// of custody. Either may fail, and a failed call must move nothing.
pub trait ExternalAsset {
    fn collect(&mut self, from: &AccountId, amount: Amount) -> Result<(), AssetError>;
    fn release(&mut self, to: &AccountId, amount: Amount) -> Result<(), AssetError>;
    /// Funds currently held in custody.
    fn custody_balance(&self) -> Amount;
}
