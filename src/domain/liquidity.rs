//! LP claim units.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};

/// Outstanding liquidity-provider claim units.
///
/// Distinct from [`Amount`]: LP units measure a proportional claim on a
/// pool, not a quantity of any single token. All `u128` values are
/// valid; arithmetic is checked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Liquidity(u128);

impl Liquidity {
    /// No claim.
    pub const ZERO: Self = Self(0);

    /// Wraps a raw LP unit count.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw LP unit count.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if no units are held.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Computes `reserve × self / total`, the proportional share of a
    /// reserve that this many units represent.
    ///
    /// Returns `None` on overflow or when `total` is zero.
    #[must_use]
    pub const fn share_of(self, reserve: Amount, total: Self, rounding: Rounding) -> Option<Amount> {
        reserve.mul_div(Amount::new(self.0), Amount::new(total.0), rounding)
    }
}

impl fmt::Display for Liquidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
