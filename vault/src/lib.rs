//! Asset adapter for the Sprout ledger.
//!
//! Deposits of the external asset are minted 1:1 as ledger credits;
//! redemptions burn credits (principal plus accrued interest) and pay the
//! same amount back out. A redemption whose payout fails leaves the ledger
//! untouched.

pub mod error;
pub mod vault;

pub use error::VaultError;
pub use vault::Vault;
