//! Route selection: direct pool first, then the two base-asset legs.
//!
//! The router is a thin read-only policy layer. It never prices and
//! never mutates; it only decides *which pools* a trade crosses and
//! hands their snapshots to the quote engine. Routing stops at two hops
//! by design — there is no general graph search.

use crate::config::ExchangeConfig;
use crate::domain::{TokenId, TokenPair};
use crate::error::{ExchangeError, Result};
use crate::pool::{LiquidityPool, PoolId};
use crate::store::PoolStore;

/// The pools a trade will cross, in hop order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// One pool holds both tokens.
    Direct(LiquidityPool),
    /// Two pools joined at the base asset.
    ViaBase {
        /// Pool for the `from → base` hop.
        first: LiquidityPool,
        /// Pool for the `base → to` hop.
        second: LiquidityPool,
    },
}

impl Route {
    /// The pools crossed, in hop order.
    #[must_use]
    pub fn pools(&self) -> Vec<&LiquidityPool> {
        match self {
            Self::Direct(pool) => vec![pool],
            Self::ViaBase { first, second } => vec![first, second],
        }
    }

    /// The pool identifiers crossed, in hop order.
    #[must_use]
    pub fn pool_ids(&self) -> Vec<PoolId> {
        self.pools().iter().map(|p| p.id()).collect()
    }
}

/// Selects the route for a `from → to` trade.
///
/// A funded direct pool wins. Otherwise both base legs must exist and
/// be funded; an unfunded pool counts as absent. When `from` or `to`
/// *is* the base asset, the direct pool is the only candidate.
///
/// # Errors
///
/// - [`ExchangeError::InvalidInput`] if `from == to`.
/// - [`ExchangeError::NoRouteFound`] if no viable path exists.
/// - Storage errors propagate.
pub fn select_route<S: PoolStore>(
    store: &S,
    config: &ExchangeConfig,
    from: &TokenId,
    to: &TokenId,
) -> Result<Route> {
    let pair = TokenPair::new(from.clone(), to.clone())?;

    if let Some(pool) = store.pool_for_pair(&pair)? {
        if pool.is_funded() {
            return Ok(Route::Direct(pool));
        }
    }

    let base = config.base_token();
    if from == base || to == base {
        // The trade already touches the base asset; there is no
        // intermediate hop left to try.
        return Err(ExchangeError::NoRouteFound);
    }

    let first_pair = TokenPair::new(from.clone(), base.clone())?;
    let second_pair = TokenPair::new(base.clone(), to.clone())?;

    let first = store
        .pool_for_pair(&first_pair)?
        .filter(LiquidityPool::is_funded)
        .ok_or(ExchangeError::NoRouteFound)?;
    let second = store
        .pool_for_pair(&second_pair)?
        .filter(LiquidityPool::is_funded)
        .ok_or(ExchangeError::NoRouteFound)?;

    Ok(Route::ViaBase { first, second })
}
