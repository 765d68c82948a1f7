//! Errors raised while parsing fundamental types from text.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty amount")]
    Empty,

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    #[error("amount {0:?} has more than 18 fractional digits")]
    TooPrecise(String),

    #[error("amount {0:?} is too large")]
    Overflow(String),
}
