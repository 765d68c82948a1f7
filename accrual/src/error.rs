//! Accrual-specific errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccrualError {
    #[error("arithmetic overflow in accrual computation")]
    Overflow,
}
