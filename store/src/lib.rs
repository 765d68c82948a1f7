//! Abstract storage traits for the Sprout ledger.
//!
//! Every storage backend (embedded database, in-memory for testing) implements
//! these traits, as does the external asset that backs deposits. The rest of
//! the workspace depends only on the traits.

pub mod asset;
pub mod error;
pub mod ledger;

pub use asset::{AssetError, ExternalAsset};
pub use error::StoreError;
pub use ledger::LedgerStore;
