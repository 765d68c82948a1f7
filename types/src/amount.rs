//! Ledger amounts and the MAX sentinel.
//!
//! Amounts are represented as fixed-point integers (u128) to avoid floating-point errors.
//! One whole unit is `PRECISION` raw units.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed-point scale shared by amounts and rates: 1.0 == 10^18.
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// A ledger amount in raw units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// `whole` units scaled by [`PRECISION`]. `None` on overflow.
    pub fn from_whole(whole: u128) -> Option<Self> {
        whole.checked_mul(PRECISION).map(Self)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / PRECISION;
        let frac = self.0 % PRECISION;
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            let digits = format!("{:018}", frac);
            write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
        }
    }
}

/// Parses whole units with an optional fraction: `"12"`, `"0.5"`, `"1_000"`.
impl FromStr for Amount {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != '_').collect();
        if cleaned.is_empty() {
            return Err(ParseError::Empty);
        }
        let (whole, frac) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
            return Err(ParseError::InvalidAmount(s.to_string()));
        }
        if frac.len() > 18 {
            return Err(ParseError::TooPrecise(s.to_string()));
        }

        let overflow = || ParseError::Overflow(s.to_string());
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let frac_raw: u128 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<18}", frac);
            padded.parse().map_err(|_| overflow())?
        };
        whole
            .checked_mul(PRECISION)
            .and_then(|w| w.checked_add(frac_raw))
            .map(Amount)
            .ok_or_else(overflow)
    }
}

/// An amount argument that may be the MAX sentinel.
///
/// `Max` always resolves against the caller's *computed* balance at the
/// moment the operation runs, after pending interest has been crystallized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    Exact(Amount),
    Max,
}

impl Quantity {
    /// Resolve against `available`: `Max` becomes `available`.
    pub fn resolve(self, available: Amount) -> Amount {
        match self {
            Quantity::Exact(amount) => amount,
            Quantity::Max => available,
        }
    }

    pub fn is_max(&self) -> bool {
        matches!(self, Quantity::Max)
    }
}

impl From<Amount> for Quantity {
    fn from(amount: Amount) -> Self {
        Quantity::Exact(amount)
    }
}

/// `"max"` (any case) or an [`Amount`].
impl FromStr for Quantity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("max") {
            Ok(Quantity::Max)
        } else {
            s.parse().map(Quantity::Exact)
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Exact(amount) => write!(f, "{}", amount),
            Quantity::Max => write!(f, "MAX"),
        }
    }
}
