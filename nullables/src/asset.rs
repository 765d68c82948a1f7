//! Nullable external asset: an in-memory token with scriptable failures.

use sprout_store::{AssetError, ExternalAsset};
use sprout_types::{AccountId, Amount};
use std::collections::HashMap;

/// In-memory stand-in for the asset deposits are made in.
///
/// Holders have wallet balances outside the ledger; collected funds sit in
/// custody until released. `fail_next_collect` and `fail_next_release` make
/// the next call of that kind fail without moving anything.
#[derive(Debug, Default)]
pub struct NullAsset {
    holdings: HashMap<AccountId, Amount>,
    custody: Amount,
    fail_collect: bool,
    fail_release: bool,
}

impl NullAsset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `holder` external funds to deposit.
    pub fn fund(&mut self, holder: &AccountId, amount: Amount) {
        let entry = self.holdings.entry(holder.clone()).or_default();
        *entry = entry.checked_add(amount).unwrap_or(Amount::new(u128::MAX));
    }

    /// Add funds to custody directly, e.g. to back accrued interest.
    pub fn fund_custody(&mut self, amount: Amount) {
        self.custody = self.custody.checked_add(amount).unwrap_or(Amount::new(u128::MAX));
    }

    pub fn holdings_of(&self, holder: &AccountId) -> Amount {
        self.holdings.get(holder).copied().unwrap_or(Amount::ZERO)
    }

    pub fn fail_next_collect(&mut self) {
        self.fail_collect = true;
    }

    pub fn fail_next_release(&mut self) {
        self.fail_release = true;
    }
}

impl ExternalAsset for NullAsset {
    fn collect(&mut self, from: &AccountId, amount: Amount) -> Result<(), AssetError> {
        if std::mem::take(&mut self.fail_collect) {
            return Err(AssetError::Rejected("collect failure injected".into()));
        }
        let available = self.holdings_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(AssetError::InsufficientFunds {
                needed: amount,
                available,
            })?;
        let custody = self
            .custody
            .checked_add(amount)
            .ok_or_else(|| AssetError::Rejected("custody overflow".into()))?;
        self.holdings.insert(from.clone(), remaining);
        self.custody = custody;
        Ok(())
    }

    fn release(&mut self, to: &AccountId, amount: Amount) -> Result<(), AssetError> {
        if std::mem::take(&mut self.fail_release) {
            return Err(AssetError::Rejected("release failure injected".into()));
        }
        let custody = self
            .custody
            .checked_sub(amount)
            .ok_or(AssetError::InsufficientFunds {
                needed: amount,
                available: self.custody,
            })?;
        let held = self
            .holdings_of(to)
            .checked_add(amount)
            .ok_or_else(|| AssetError::Rejected("holding overflow".into()))?;
        self.custody = custody;
        self.holdings.insert(to.clone(), held);
        Ok(())
    }

    fn custody_balance(&self) -> Amount {
        self.custody
    }
}
