//! In-memory store implementations.
//!
//! `RwLock`-guarded maps implementing [`PoolStore`] and [`LedgerStore`].
//! These back the test suite and embedded deployments; a durable
//! backend substitutes for them in production without engine changes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{Amount, TokenId, TokenPair};
use crate::error::Result;
use crate::pool::{LiquidityPool, OwnerAddress, PoolId, PoolPosition, PositionId};
use crate::store::{LedgerEntry, LedgerStore, PoolStore};

/// [`PoolStore`] backed by process-local maps.
#[derive(Debug, Default)]
pub struct InMemoryPoolStore {
    pools: RwLock<HashMap<PoolId, LiquidityPool>>,
    positions: RwLock<HashMap<PositionId, PoolPosition>>,
}

impl InMemoryPoolStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoolStore for InMemoryPoolStore {
    fn pools(&self) -> Result<Vec<LiquidityPool>> {
        Ok(self.pools.read().values().cloned().collect())
    }

    fn pool(&self, id: &PoolId) -> Result<Option<LiquidityPool>> {
        Ok(self.pools.read().get(id).cloned())
    }

    fn pool_for_pair(&self, pair: &TokenPair) -> Result<Option<LiquidityPool>> {
        // Pool ids are derived from the canonical pair, so the pair lookup
        // is an id lookup.
        Ok(self.pools.read().get(&PoolId::derive(pair)).cloned())
    }

    fn create_pool(&self, pool: &LiquidityPool) -> Result<()> {
        self.pools.write().insert(pool.id(), pool.clone());
        Ok(())
    }

    fn update_pool(&self, pool: &LiquidityPool) -> Result<()> {
        self.pools.write().insert(pool.id(), pool.clone());
        Ok(())
    }

    fn positions_for(&self, owner: &OwnerAddress) -> Result<Vec<PoolPosition>> {
        Ok(self
            .positions
            .read()
            .values()
            .filter(|p| p.owner() == owner)
            .cloned()
            .collect())
    }

    fn positions_in_pool(&self, pool: &PoolId) -> Result<Vec<PoolPosition>> {
        Ok(self
            .positions
            .read()
            .values()
            .filter(|p| p.pool_id() == *pool)
            .cloned()
            .collect())
    }

    fn position(&self, id: &PositionId) -> Result<Option<PoolPosition>> {
        Ok(self.positions.read().get(id).cloned())
    }

    fn create_position(&self, position: &PoolPosition) -> Result<()> {
        self.positions.write().insert(position.id(), position.clone());
        Ok(())
    }

    fn update_position(&self, position: &PoolPosition) -> Result<()> {
        self.positions.write().insert(position.id(), position.clone());
        Ok(())
    }

    fn delete_position(&self, id: &PositionId) -> Result<()> {
        self.positions.write().remove(id);
        Ok(())
    }
}

/// [`LedgerStore`] backed by process-local maps.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<(OwnerAddress, TokenId), Amount>>,
    entries: RwLock<Vec<LedgerEntry>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an owner's balance, for tests and bootstrapping.
    pub fn credit(&self, owner: &OwnerAddress, token: &TokenId, amount: Amount) {
        self.balances
            .write()
            .insert((owner.clone(), token.clone()), amount);
    }
}

impl LedgerStore for InMemoryLedger {
    fn balance(&self, owner: &OwnerAddress, token: &TokenId) -> Result<Amount> {
        Ok(self
            .balances
            .read()
            .get(&(owner.clone(), token.clone()))
            .copied()
            .unwrap_or(Amount::ZERO))
    }

    fn set_balance(&self, owner: &OwnerAddress, token: &TokenId, amount: Amount) -> Result<()> {
        self.balances
            .write()
            .insert((owner.clone(), token.clone()), amount);
        Ok(())
    }

    fn record(&self, entry: &LedgerEntry) -> Result<()> {
        self.entries.write().push(entry.clone());
        Ok(())
    }

    fn entries_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<LedgerEntry>> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|e| e.timestamp >= cutoff)
            .cloned()
            .collect())
    }
}
