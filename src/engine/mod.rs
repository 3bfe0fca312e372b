//! The exchange engine: facade, per-pool locking, and the operation
//! implementations.
//!
//! [`Exchange`] wires the injected [`PoolStore`] and [`LedgerStore`]
//! to the pricing and mutation paths. It holds no pool or wallet state
//! of its own — only the configuration, a lock table, and a nonce
//! counter for transaction-id derivation.
//!
//! # Locking discipline
//!
//! Every mutation (swap, deposit, withdrawal) runs the whole
//! re-quote + validate + mutate window under the exclusive locks of the
//! pools it touches. Multi-pool operations acquire locks in ascending
//! pool-id order, which rules out lock-order inversion between two
//! trades crossing the same pools in opposite directions. Quote-only
//! reads take no locks: they price a snapshot, and the executor
//! re-validates under the lock before committing.

pub mod liquidity;
#[cfg(test)]
mod proptest_properties;
pub mod quote;
pub mod registry;
pub mod router;
pub mod stats;
pub mod swap;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ExchangeConfig;
use crate::domain::{Amount, TokenId};
use crate::error::Result;
use crate::pool::{LiquidityPool, OwnerAddress, PoolId, PoolPosition};
use crate::store::{LedgerStore, PoolStore};

pub use liquidity::{AddLiquidityRequest, RemoveLiquidityRequest};
pub use quote::{Quote, QuoteLeg, SwapPath};
pub use router::Route;
pub use stats::ExchangeStats;
pub use swap::SwapRequest;

/// Per-pool lock table.
///
/// Lock entries are created on first touch and never removed; pools are
/// never deleted, so the table only grows with the set of markets.
#[derive(Debug, Default)]
struct LockTable {
    table: Mutex<HashMap<PoolId, Arc<Mutex<()>>>>,
}

impl LockTable {
    /// Returns the lock handles for `ids` in ascending id order, deduped.
    ///
    /// Callers must acquire the returned handles in vector order.
    fn handles(&self, ids: &[PoolId]) -> Vec<Arc<Mutex<()>>> {
        let mut sorted: Vec<PoolId> = ids.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut table = self.table.lock();
        sorted
            .into_iter()
            .map(|id| Arc::clone(table.entry(id).or_default()))
            .collect()
    }
}

/// The AMM exchange core.
///
/// Generic over its two collaborators so tests run against the
/// in-memory stores and production injects durable ones.
///
/// # Examples
///
/// ```
/// use amm_exchange::config::ExchangeConfig;
/// use amm_exchange::domain::TokenId;
/// use amm_exchange::engine::Exchange;
/// use amm_exchange::memory::{InMemoryLedger, InMemoryPoolStore};
///
/// let exchange = Exchange::new(
///     InMemoryPoolStore::new(),
///     InMemoryLedger::new(),
///     ExchangeConfig::new(TokenId::new("PVX")?),
/// );
/// assert!(exchange.list_pools()?.is_empty());
/// # Ok::<(), amm_exchange::error::ExchangeError>(())
/// ```
#[derive(Debug)]
pub struct Exchange<S: PoolStore, L: LedgerStore> {
    store: S,
    ledger: L,
    config: ExchangeConfig,
    locks: LockTable,
    nonce: AtomicU64,
}

impl<S: PoolStore, L: LedgerStore> Exchange<S, L> {
    /// Creates an engine over the given collaborators.
    #[must_use]
    pub fn new(store: S, ledger: L, config: ExchangeConfig) -> Self {
        Self {
            store,
            ledger,
            config,
            locks: LockTable::default(),
            nonce: AtomicU64::new(0),
        }
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Read access to the pool store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Read access to the ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Prices a `from → to` trade of `amount_in` against current
    /// reserves, applying the default slippage tolerance.
    ///
    /// Lock-free and side-effect-free.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::InvalidInput`](crate::error::ExchangeError::InvalidInput)
    ///   for a zero amount or identical tokens.
    /// - [`ExchangeError::NoRouteFound`](crate::error::ExchangeError::NoRouteFound)
    ///   if no funded path exists.
    pub fn quote(&self, from: &TokenId, to: &TokenId, amount_in: Amount) -> Result<Quote> {
        let route = router::select_route(&self.store, &self.config, from, to)?;
        quote::price_route(
            &route,
            from,
            to,
            amount_in,
            &self.config,
            self.config.default_slippage(),
        )
    }

    /// Returns every pool, funded or drained.
    ///
    /// # Errors
    ///
    /// Storage errors propagate.
    pub fn list_pools(&self) -> Result<Vec<LiquidityPool>> {
        self.store.pools()
    }

    /// Returns all LP positions held by `owner`.
    ///
    /// # Errors
    ///
    /// Storage errors propagate.
    pub fn positions(&self, owner: &OwnerAddress) -> Result<Vec<PoolPosition>> {
        self.store.positions_for(owner)
    }

    /// Next transaction nonce.
    fn next_nonce(&self) -> u64 {
        self.nonce.fetch_add(1, Ordering::Relaxed)
    }

    /// Sorted, deduped lock handles for the given pools.
    fn lock_handles(&self, ids: &[PoolId]) -> Vec<Arc<Mutex<()>>> {
        self.locks.handles(ids)
    }
}
