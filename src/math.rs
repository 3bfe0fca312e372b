//! Integer math helpers shared by the pricing and liquidity paths.
//!
//! Everything here is pure `u128` arithmetic: no floating point, no
//! saturation, multiplication always before division. Saturation hides
//! bugs; errors propagate instead.

use crate::domain::{Amount, Liquidity, Rounding};
use crate::error::{ExchangeError, Result};

/// Integer square root via Newton's method, rounded down.
///
/// Used for the bootstrap LP issuance `√(amount_a × amount_b)` on a
/// pool's first deposit.
#[must_use]
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = x.div_ceil(2);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Computes the constant-product output for a net (post-fee) input.
///
/// `amount_out = reserve_out × net_in / (reserve_in + net_in)`, rounded
/// down so truncation always favours the pool.
///
/// # Errors
///
/// - [`ExchangeError::ZeroReserve`] if either reserve is zero.
/// - [`ExchangeError::InvalidInput`] if the net input is zero.
/// - [`ExchangeError::InsufficientLiquidity`] if the output rounds to
///   zero or would drain the output reserve.
/// - [`ExchangeError::Overflow`] on intermediate overflow.
pub fn constant_product_out(
    net_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
) -> Result<Amount> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(ExchangeError::ZeroReserve);
    }
    if net_in.is_zero() {
        return Err(ExchangeError::InvalidInput("net input after fee is zero"));
    }

    let denominator = reserve_in
        .checked_add(net_in)
        .ok_or(ExchangeError::Overflow("swap denominator"))?;
    let amount_out = net_in
        .mul_div(reserve_out, denominator, Rounding::Down)
        .ok_or(ExchangeError::Overflow("swap numerator"))?;

    if amount_out.is_zero() || amount_out >= reserve_out {
        return Err(ExchangeError::InsufficientLiquidity);
    }
    Ok(amount_out)
}

/// Computes the trade's price impact in basis points:
/// `amount_in × 10_000 / reserve_in`, rounded down.
///
/// The result is a plain `u128` rather than a `BasisPoints` because a
/// trade larger than the reserve legitimately exceeds 100%.
///
/// # Errors
///
/// - [`ExchangeError::ZeroReserve`] if the input reserve is zero.
/// - [`ExchangeError::Overflow`] on intermediate overflow.
pub fn price_impact_bps(amount_in: Amount, reserve_in: Amount) -> Result<u128> {
    if reserve_in.is_zero() {
        return Err(ExchangeError::ZeroReserve);
    }
    amount_in
        .mul_div(Amount::new(10_000), reserve_in, Rounding::Down)
        .map(|a| a.get())
        .ok_or(ExchangeError::Overflow("price impact"))
}

/// Computes the LP units minted for a proportional deposit:
/// `deposit × total / reserve`, rounded down.
///
/// # Errors
///
/// - [`ExchangeError::ZeroReserve`] if the reserve is zero.
/// - [`ExchangeError::Overflow`] on intermediate overflow.
pub fn proportional_mint(
    deposit: Amount,
    reserve: Amount,
    total: Liquidity,
) -> Result<Liquidity> {
    if reserve.is_zero() {
        return Err(ExchangeError::ZeroReserve);
    }
    deposit
        .mul_div(Amount::new(total.get()), reserve, Rounding::Down)
        .map(|a| Liquidity::new(a.get()))
        .ok_or(ExchangeError::Overflow("proportional mint"))
}

/// Checks that `actual` lies within `tolerance_bps` of `expected`,
/// compared by cross-multiplication so no intermediate division loses
/// precision.
///
/// The band is `expected × (10_000 ± tolerance) / 10_000`, matching a
/// deposit-proportionality check of ±1% at `tolerance_bps = 100`.
///
/// # Errors
///
/// Returns [`ExchangeError::Overflow`] on intermediate overflow.
pub fn within_tolerance_band(actual: Amount, expected: Amount, tolerance_bps: u32) -> Result<bool> {
    let scale = 10_000u128;
    let tol = u128::from(tolerance_bps);
    let lower_factor = scale
        .checked_sub(tol)
        .ok_or(ExchangeError::Overflow("tolerance band"))?;

    let actual_scaled = actual
        .get()
        .checked_mul(scale)
        .ok_or(ExchangeError::Overflow("tolerance band"))?;
    let lower = expected
        .get()
        .checked_mul(lower_factor)
        .ok_or(ExchangeError::Overflow("tolerance band"))?;
    let upper = expected
        .get()
        .checked_mul(scale + tol)
        .ok_or(ExchangeError::Overflow("tolerance band"))?;

    Ok(actual_scaled >= lower && actual_scaled <= upper)
}
