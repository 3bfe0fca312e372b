//! Read-only aggregate statistics.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Amount;
use crate::error::{ExchangeError, Result};
use crate::pool::PoolId;
use crate::store::{LedgerDetail, LedgerStore, PoolStore};

use super::Exchange;

/// Rollup over the pool store and the recent ledger window.
///
/// Value figures are denominated in the base asset. Pools that do not
/// contain the base asset cannot be valued without a price route and
/// are excluded from `total_value_locked`; likewise swaps whose path
/// never touches the base asset contribute zero volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeStats {
    /// Number of registered pools, funded or drained.
    pub pool_count: usize,
    /// Twice the base-side reserves of every funded base-paired pool.
    pub total_value_locked: Amount,
    /// Base-denominated swap volume over the last 24 hours.
    pub volume_24h: Amount,
    /// Base-denominated swap fees over the last 24 hours.
    pub fees_24h: Amount,
    /// The pool with the highest base volume in the window, if any
    /// swaps were recorded.
    pub most_active_pool: Option<PoolId>,
}

impl<S: PoolStore, L: LedgerStore> Exchange<S, L> {
    /// Computes aggregate statistics.
    ///
    /// Purely a read: no locks are taken, so the figures are a snapshot
    /// that may trail in-flight mutations by one commit.
    ///
    /// # Errors
    ///
    /// Storage errors propagate; [`ExchangeError::Overflow`] if the
    /// totals overflow.
    pub fn stats(&self) -> Result<ExchangeStats> {
        let base = self.config.base_token();
        let pools = self.store.pools()?;

        let mut tvl = Amount::ZERO;
        for pool in &pools {
            if !pool.is_funded() || !pool.pair().contains(base) {
                continue;
            }
            let base_side = pool.reserve_of(base)?;
            let doubled = base_side
                .checked_add(base_side)
                .ok_or(ExchangeError::Overflow("value locked"))?;
            tvl = tvl
                .checked_add(doubled)
                .ok_or(ExchangeError::Overflow("value locked"))?;
        }

        let cutoff = Utc::now() - Duration::hours(24);
        let mut volume = Amount::ZERO;
        let mut fees = Amount::ZERO;
        let mut per_pool: HashMap<PoolId, u128> = HashMap::new();
        for entry in self.ledger.entries_since(cutoff)? {
            let LedgerDetail::Swap {
                pool_ids,
                base_volume,
                base_fee,
                ..
            } = entry.detail
            else {
                continue;
            };
            volume = volume
                .checked_add(base_volume)
                .ok_or(ExchangeError::Overflow("volume rollup"))?;
            fees = fees
                .checked_add(base_fee)
                .ok_or(ExchangeError::Overflow("fee rollup"))?;
            for id in pool_ids {
                *per_pool.entry(id).or_default() += base_volume.get();
            }
        }

        let most_active_pool = per_pool
            .into_iter()
            .max_by_key(|(_, v)| *v)
            .map(|(id, _)| id);

        Ok(ExchangeStats {
            pool_count: pools.len(),
            total_value_locked: tvl,
            volume_24h: volume,
            fees_24h: fees,
            most_active_pool,
        })
    }
}
