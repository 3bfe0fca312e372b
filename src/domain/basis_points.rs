//! Percentages expressed in basis points.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::{ExchangeError, Result};

/// The basis-point denominator: 10 000 bps = 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// A percentage in basis points (1 bp = 0.01%).
///
/// Fees, slippage tolerances, and the ratio tolerance band are all
/// expressed in basis points so that percentage math stays in integers.
///
/// # Examples
///
/// ```
/// use amm_exchange::domain::{Amount, BasisPoints, Rounding};
///
/// let fee = BasisPoints::new(30); // 0.30%
/// let cut = fee.apply(Amount::new(1_000_000), Rounding::Up);
/// assert_eq!(cut, Ok(Amount::new(3_000)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// 0%.
    pub const ZERO: Self = Self(0);

    /// 100%.
    pub const ONE_HUNDRED_PERCENT: Self = Self(BPS_DENOMINATOR);

    /// Wraps a raw basis-point count.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw basis-point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value lies in `0..=10_000`.
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= BPS_DENOMINATOR
    }

    /// Computes `amount × bps / 10_000`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Overflow`] if the intermediate product
    /// overflows.
    pub fn apply(&self, amount: Amount, rounding: Rounding) -> Result<Amount> {
        amount
            .mul_div(
                Amount::new(u128::from(self.0)),
                Amount::new(u128::from(BPS_DENOMINATOR)),
                rounding,
            )
            .ok_or(ExchangeError::Overflow("basis-point application"))
    }

    /// Computes `amount × (10_000 − bps) / 10_000`, the remainder after
    /// taking this percentage off the top.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] if the value exceeds 100%,
    /// or [`ExchangeError::Overflow`] on intermediate overflow.
    pub fn discount(&self, amount: Amount, rounding: Rounding) -> Result<Amount> {
        let Some(complement) = BPS_DENOMINATOR.checked_sub(self.0) else {
            return Err(ExchangeError::InvalidInput(
                "basis points above 100% cannot discount",
            ));
        };
        amount
            .mul_div(
                Amount::new(u128::from(complement)),
                Amount::new(u128::from(BPS_DENOMINATOR)),
                rounding,
            )
            .ok_or(ExchangeError::Overflow("basis-point discount"))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
