//! The protocol-wide rate and per-account rate assignment.
//!
//! The global rate can only go down. Each account carries the rate that was
//! current (or, for transfer recipients, the sender's rate) when its balance
//! last went from zero to nonzero.

pub mod error;
pub mod history;
pub mod registry;

pub use error::RateError;
pub use history::{RateHistory, RateSegment};
pub use registry::{RateChange, RateRegistry};
