//! Shared utilities for the Sprout ledger.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
pub use time::{format_duration, parse_duration, DurationError};
