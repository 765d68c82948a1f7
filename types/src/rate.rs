//! Interest rates.
//!
//! A [`Rate`] is growth per elapsed second, scaled by [`PRECISION`]: a rate
//! of `r` grows a principal `p` by `p * r / PRECISION` every second. Annual
//! figures are converted once, at input, via [`Rate::from_annual_bps`].

use crate::amount::PRECISION;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in a 365-day year.
pub const SECONDS_PER_YEAR: u128 = 365 * 24 * 3600;

const BPS_DENOMINATOR: u128 = 10_000;

/// Per-second interest rate scaled by [`PRECISION`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rate(u128);

impl Rate {
    pub const ZERO: Self = Self(0);

    pub const fn new(per_second: u128) -> Self {
        Self(per_second)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert a simple annual rate in basis points to the per-second
    /// convention, rounding down. `None` on overflow.
    pub fn from_annual_bps(bps: u128) -> Option<Self> {
        bps.checked_mul(PRECISION)
            .map(|scaled| scaled / BPS_DENOMINATOR / SECONDS_PER_YEAR)
            .map(Self)
    }

    /// Approximate annual rate in basis points, rounding down.
    pub fn annual_bps(&self) -> Option<u128> {
        self.0
            .checked_mul(SECONDS_PER_YEAR)?
            .checked_mul(BPS_DENOMINATOR)
            .map(|v| v / PRECISION)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/s", self.0)
    }
}
