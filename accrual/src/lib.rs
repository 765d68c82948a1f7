//! The balance growth engine.
//!
//! A computed balance is a deterministic function of stored state and time:
//! `balance = principal × (PRECISION + rate × elapsed) / PRECISION`
//!
//! Growth is linear between crystallizations; division always rounds down so
//! a computed balance never overstates what is owed.

pub mod engine;
pub mod error;
pub mod math;

pub use engine::{accrued_balance, compute_balance, elapsed_secs, growth_factor, pending_interest};
pub use error::AccrualError;
pub use math::mul_div_floor;
