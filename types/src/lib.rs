//! Fundamental types for the Sprout ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account identities, fixed-point amounts and rates, timestamps, and the
//! persisted per-account record.

pub mod account;
pub mod address;
pub mod amount;
pub mod error;
pub mod rate;
pub mod time;

pub use account::AccountRecord;
pub use address::AccountId;
pub use amount::{Amount, Quantity, PRECISION};
pub use error::ParseError;
pub use rate::{Rate, SECONDS_PER_YEAR};
pub use time::{Clock, SystemClock, Timestamp};
