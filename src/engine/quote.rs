//! Pure pricing: quotes for direct and two-hop trades.
//!
//! Nothing in this module mutates state. A [`Quote`] is computed from a
//! snapshot of the pools on the selected route; the executor recomputes
//! it under the per-pool locks before committing, so a quote in hand is
//! a preview, never an entitlement.
//!
//! # Direct pricing
//!
//! Constant product with a multiplicative input fee:
//!
//! ```text
//! fee          = amount_in × fee_bps / 10_000          (round up)
//! net_input    = amount_in − fee
//! expected_out = net_input × reserve_out / (reserve_in + net_input)
//! impact_bps   = amount_in × 10_000 / reserve_in
//! min_out      = expected_out × (10_000 − slippage_bps) / 10_000
//! ```
//!
//! # Two-hop pricing
//!
//! When no direct pool exists the route runs through the base asset:
//! hop one's output feeds hop two, fees are charged per leg in that
//! leg's input token, and the two impact percentages add — a documented
//! approximation rather than a compounded figure.

use serde::{Deserialize, Serialize};

use crate::config::ExchangeConfig;
use crate::domain::{Amount, BasisPoints, Rounding, TokenId};
use crate::error::{ExchangeError, Result};
use crate::math;
use crate::pool::{LiquidityPool, PoolId};

use super::router::Route;

/// The token path a quote was priced along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapPath {
    /// A single pool holds both tokens.
    Direct {
        /// Token sold.
        from: TokenId,
        /// Token bought.
        to: TokenId,
    },
    /// Two pools, joined at the base asset.
    ViaBase {
        /// Token sold.
        from: TokenId,
        /// The intermediate base asset.
        base: TokenId,
        /// Token bought.
        to: TokenId,
    },
}

impl SwapPath {
    /// Returns the path as an ordered token list.
    #[must_use]
    pub fn tokens(&self) -> Vec<TokenId> {
        match self {
            Self::Direct { from, to } => vec![from.clone(), to.clone()],
            Self::ViaBase { from, base, to } => {
                vec![from.clone(), base.clone(), to.clone()]
            }
        }
    }

    /// Number of pools the path crosses.
    #[must_use]
    pub const fn hops(&self) -> usize {
        match self {
            Self::Direct { .. } => 1,
            Self::ViaBase { .. } => 2,
        }
    }
}

/// One hop of a priced trade: what goes into which pool, and what
/// comes out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLeg {
    /// Pool this leg trades against.
    pub pool_id: PoolId,
    /// Token sold into the pool.
    pub token_in: TokenId,
    /// Token taken out of the pool.
    pub token_out: TokenId,
    /// Gross input, fee included — the full amount joins the reserve.
    pub amount_in: Amount,
    /// Output leaving the reserve.
    pub amount_out: Amount,
    /// Fee charged on this leg, in `token_in` units.
    pub fee: Amount,
}

/// A priced trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Gross input amount.
    pub amount_in: Amount,
    /// Expected output at current reserves.
    pub expected_out: Amount,
    /// `expected_out` reduced by the slippage tolerance.
    pub min_out: Amount,
    /// Price impact in basis points; legs add on a two-hop route.
    pub price_impact_bps: u128,
    /// Total fee across legs, each leg in its own input token.
    pub fee: Amount,
    /// The path the quote was priced along.
    pub path: SwapPath,
    /// Per-hop breakdown, in execution order.
    pub legs: Vec<QuoteLeg>,
}

/// Prices one leg against one pool.
fn price_leg(
    pool: &LiquidityPool,
    token_in: &TokenId,
    token_out: &TokenId,
    amount_in: Amount,
    fee_bps: BasisPoints,
) -> Result<QuoteLeg> {
    let (reserve_in, reserve_out) = pool.oriented_reserves(token_in)?;

    let fee = fee_bps.apply(amount_in, Rounding::Up)?;
    let net_input = amount_in
        .checked_sub(fee)
        .ok_or(ExchangeError::Overflow("net input"))?;
    let amount_out = math::constant_product_out(net_input, reserve_in, reserve_out)?;

    Ok(QuoteLeg {
        pool_id: pool.id(),
        token_in: token_in.clone(),
        token_out: token_out.clone(),
        amount_in,
        amount_out,
        fee,
    })
}

/// Prices a trade of `amount_in` along `route`.
///
/// Pure function of the route's pool snapshots.
///
/// # Errors
///
/// - [`ExchangeError::InvalidInput`] for a zero input.
/// - [`ExchangeError::NoRouteFound`] if a leg pool is unfunded — an
///   empty reserve means "no route", never a division by zero.
/// - Pricing errors ([`ExchangeError::InsufficientLiquidity`],
///   [`ExchangeError::Overflow`]) propagate from the curve math.
pub fn price_route(
    route: &Route,
    from: &TokenId,
    to: &TokenId,
    amount_in: Amount,
    config: &ExchangeConfig,
    slippage: BasisPoints,
) -> Result<Quote> {
    if amount_in.is_zero() {
        return Err(ExchangeError::InvalidInput("swap amount must be positive"));
    }

    let fee_bps = config.swap_fee();
    let (legs, path) = match route {
        Route::Direct(pool) => {
            if !pool.is_funded() {
                return Err(ExchangeError::NoRouteFound);
            }
            let leg = price_leg(pool, from, to, amount_in, fee_bps)?;
            (
                vec![leg],
                SwapPath::Direct {
                    from: from.clone(),
                    to: to.clone(),
                },
            )
        }
        Route::ViaBase { first, second } => {
            if !first.is_funded() || !second.is_funded() {
                return Err(ExchangeError::NoRouteFound);
            }
            let base = config.base_token();
            let hop_one = price_leg(first, from, base, amount_in, fee_bps)?;
            let hop_two = price_leg(second, base, to, hop_one.amount_out, fee_bps)?;
            (
                vec![hop_one, hop_two],
                SwapPath::ViaBase {
                    from: from.clone(),
                    base: base.clone(),
                    to: to.clone(),
                },
            )
        }
    };

    let mut price_impact_bps = 0u128;
    let mut fee_total = Amount::ZERO;
    for (leg, pool) in legs.iter().zip(route.pools()) {
        let (reserve_in, _) = pool.oriented_reserves(&leg.token_in)?;
        price_impact_bps = price_impact_bps
            .checked_add(math::price_impact_bps(leg.amount_in, reserve_in)?)
            .ok_or(ExchangeError::Overflow("price impact sum"))?;
        fee_total = fee_total
            .checked_add(leg.fee)
            .ok_or(ExchangeError::Overflow("fee sum"))?;
    }

    let expected_out = legs
        .last()
        .map(|l| l.amount_out)
        .ok_or(ExchangeError::NoRouteFound)?;
    let min_out = slippage.discount(expected_out, Rounding::Down)?;

    Ok(Quote {
        amount_in,
        expected_out,
        min_out,
        price_impact_bps,
        fee: fee_total,
        path,
        legs,
    })
}
