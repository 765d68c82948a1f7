//! Nullable infrastructure for deterministic testing.
//!
//! Everything the ledger touches outside itself (clock, storage, the
//! external asset) sits behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod asset;
pub mod clock;
pub mod store;

pub use asset::NullAsset;
pub use clock::NullClock;
pub use store::NullStore;
