//! Token quantity in micro-units with checked arithmetic.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Rounding;

/// A token quantity in the smallest indivisible unit (micro-units).
///
/// Reserve and balance arithmetic runs entirely on `u128` integers;
/// floating point never touches a quantity. Every operation is checked
/// and returns `None` on overflow, underflow, or division by zero
/// rather than panicking — callers convert the `None` into a typed
/// [`ExchangeError::Overflow`](crate::error::ExchangeError::Overflow).
///
/// # Examples
///
/// ```
/// use amm_exchange::domain::{Amount, Rounding};
///
/// let a = Amount::new(1_000);
/// let b = Amount::new(250);
/// assert_eq!(a.checked_sub(b), Some(Amount::new(750)));
/// // (1_000 * 3) / 7 = 428.57…, floored:
/// assert_eq!(
///     a.mul_div(Amount::new(3), Amount::new(7), Rounding::Down),
///     Some(Amount::new(428)),
/// );
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// The zero quantity.
    pub const ZERO: Self = Self(0);

    /// Largest representable quantity.
    pub const MAX: Self = Self(u128::MAX);

    /// Wraps a raw micro-unit value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw micro-unit value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the quantity is zero.
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

    /// Checked multiplication.
    #[must_use]
    pub const fn checked_mul(self, other: Self) -> Option<Self> {
        match self.0.checked_mul(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Computes `self × numerator / divisor` with multiplication before
    /// division, the ordering that keeps constant-product rounding error
    /// at one unit.
    ///
    /// Returns `None` if the intermediate product overflows or the
    /// divisor is zero.
    #[must_use]
    pub const fn mul_div(self, numerator: Self, divisor: Self, rounding: Rounding) -> Option<Self> {
        if divisor.0 == 0 {
            return None;
        }
        let product = match self.0.checked_mul(numerator.0) {
            Some(p) => p,
            None => return None,
        };
        let quotient = product / divisor.0;
        match rounding {
            Rounding::Down => Some(Self(quotient)),
            Rounding::Up => {
                if product % divisor.0 != 0 {
                    // quotient < u128::MAX here because the division had
                    // a non-zero remainder.
                    Some(Self(quotient + 1))
                } else {
                    Some(Self(quotient))
                }
            }
        }
    }

    /// Returns the smaller of two quantities.
    #[must_use]
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
