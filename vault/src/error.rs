use sprout_ledger::LedgerError;
use sprout_store::AssetError;
use sprout_types::{AccountId, Amount};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("deposit of {amount} from {account} failed: {source}")]
    DepositTransferFailed {
        account: AccountId,
        amount: Amount,
        source: AssetError,
    },

    /// The mint failed after funds were collected and the refund failed
    /// too: `amount` sits in custody with no ledger credit.
    #[error("deposit of {amount} from {account} failed ({mint}) and refund failed: {refund}")]
    DepositRefundFailed {
        account: AccountId,
        amount: Amount,
        mint: LedgerError,
        refund: AssetError,
    },

    #[error("redeem payout of {amount} to {account} failed: {source}")]
    RedeemTransferFailed {
        account: AccountId,
        amount: Amount,
        source: AssetError,
    },
}
