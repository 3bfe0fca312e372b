//! Pool lookup and lazy, idempotent creation.
//!
//! One pool exists per unordered token pair. The pool identifier is
//! derived from the canonical pair, so concurrent creators converge on
//! the same record: the engine always calls
//! [`get_or_create_pool`] while holding that derived pool's lock, which
//! makes the read-then-create sequence race-free.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{TokenId, TokenPair};
use crate::error::Result;
use crate::pool::LiquidityPool;
use crate::store::PoolStore;

/// Order-independent pool lookup.
///
/// # Errors
///
/// [`ExchangeError::InvalidInput`](crate::error::ExchangeError::InvalidInput)
/// if the tokens are identical; storage errors propagate.
pub fn find_pool<S: PoolStore>(
    store: &S,
    token_x: &TokenId,
    token_y: &TokenId,
) -> Result<Option<LiquidityPool>> {
    let pair = TokenPair::new(token_x.clone(), token_y.clone())?;
    store.pool_for_pair(&pair)
}

/// Returns the pair's pool, creating an empty record if none exists.
///
/// Creation is idempotent: the id is a pure function of the pair, and
/// callers hold the pool lock for that id, so at most one empty record
/// is ever inserted.
///
/// # Errors
///
/// Same as [`find_pool`].
pub fn get_or_create_pool<S: PoolStore>(
    store: &S,
    pair: &TokenPair,
    now: DateTime<Utc>,
) -> Result<LiquidityPool> {
    if let Some(existing) = store.pool_for_pair(pair)? {
        return Ok(existing);
    }
    let pool = LiquidityPool::new_empty(pair.clone(), now);
    store.create_pool(&pool)?;
    info!(pool_id = %pool.id(), pair = %pair, "created pool");
    Ok(pool)
}
