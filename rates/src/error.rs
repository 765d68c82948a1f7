//! Rate registry errors.

use sprout_types::{Amount, Rate};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    #[error("global rate may only decrease: current {current}, requested {requested}")]
    RateIncreaseRejected { current: Rate, requested: Rate },

    #[error("rate change timestamp must not precede current segment start")]
    InvalidTimestamp,

    #[error("rate can only be assigned to an empty account (principal {principal})")]
    AccountFunded { principal: Amount },
}
