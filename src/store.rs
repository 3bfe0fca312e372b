//! Collaborator traits: pool/position persistence and the wallet ledger.
//!
//! The engine owns no state of its own. Pools and positions live behind
//! [`PoolStore`]; wallet balances and the transaction history live
//! behind [`LedgerStore`]. Both traits are persistence-agnostic — the
//! in-memory implementations in [`memory`](crate::memory) back the test
//! suite and embedded use, and a durable backend can be substituted
//! without touching the engine.
//!
//! Implementations must be internally synchronized (`Send + Sync`); the
//! engine serializes *mutations* per pool with its own lock table, but
//! quote-path reads run concurrently against a snapshot. Storage errors
//! are surfaced as [`ExchangeError::Storage`](crate::error::ExchangeError::Storage)
//! and pass through the engine uninterpreted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Liquidity, TokenId, TokenPair};
use crate::error::Result;
use crate::pool::{LiquidityPool, OwnerAddress, PoolId, PoolPosition, PositionId};
use crate::receipt::TxId;

/// Repository of pools and LP positions.
pub trait PoolStore: Send + Sync {
    /// Returns every pool, funded or drained.
    fn pools(&self) -> Result<Vec<LiquidityPool>>;

    /// Looks a pool up by identifier.
    fn pool(&self, id: &PoolId) -> Result<Option<LiquidityPool>>;

    /// Looks a pool up by its (unordered) token pair.
    fn pool_for_pair(&self, pair: &TokenPair) -> Result<Option<LiquidityPool>>;

    /// Inserts a new pool record.
    fn create_pool(&self, pool: &LiquidityPool) -> Result<()>;

    /// Replaces an existing pool record.
    fn update_pool(&self, pool: &LiquidityPool) -> Result<()>;

    /// Returns all positions held by `owner`.
    fn positions_for(&self, owner: &OwnerAddress) -> Result<Vec<PoolPosition>>;

    /// Returns all positions claiming against `pool`.
    fn positions_in_pool(&self, pool: &PoolId) -> Result<Vec<PoolPosition>>;

    /// Looks a position up by identifier.
    fn position(&self, id: &PositionId) -> Result<Option<PoolPosition>>;

    /// Inserts a new position record.
    fn create_position(&self, position: &PoolPosition) -> Result<()>;

    /// Replaces an existing position record.
    fn update_position(&self, position: &PoolPosition) -> Result<()>;

    /// Removes a position record (claim fell to zero).
    fn delete_position(&self, id: &PositionId) -> Result<()>;
}

/// Wallet balances and the transaction-history sink.
pub trait LedgerStore: Send + Sync {
    /// Returns the owner's balance of `token` (zero if never credited).
    fn balance(&self, owner: &OwnerAddress, token: &TokenId) -> Result<Amount>;

    /// Overwrites the owner's balance of `token`.
    fn set_balance(&self, owner: &OwnerAddress, token: &TokenId, amount: Amount) -> Result<()>;

    /// Appends a committed transaction record.
    fn record(&self, entry: &LedgerEntry) -> Result<()>;

    /// Returns every entry recorded at or after `cutoff`.
    fn entries_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<LedgerEntry>>;
}

/// A committed mutation, as appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Transaction identifier shared with the receipt.
    pub tx_id: TxId,
    /// The wallet that initiated the operation.
    pub owner: OwnerAddress,
    /// Commit timestamp.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub detail: LedgerDetail,
}

/// Typed payload of a [`LedgerEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerDetail {
    /// A token swap.
    Swap {
        /// Token sold.
        from_token: TokenId,
        /// Token bought.
        to_token: TokenId,
        /// Gross input (fee included).
        amount_in: Amount,
        /// Output paid to the owner.
        amount_out: Amount,
        /// Total fee across all hops, per-leg denominated.
        fee: Amount,
        /// Pools touched, in hop order.
        pool_ids: Vec<PoolId>,
        /// Trade size measured on the base-asset leg, zero when no leg
        /// touches the base asset. Feeds the 24-hour volume rollup.
        base_volume: Amount,
        /// Fee paid in base-asset units, zero when no leg charges in the
        /// base asset.
        base_fee: Amount,
    },
    /// A liquidity deposit.
    LiquidityAdded {
        /// Pool deposited into.
        pool_id: PoolId,
        /// Amount of the canonically-first token.
        amount_a: Amount,
        /// Amount of the canonically-second token.
        amount_b: Amount,
        /// LP units minted.
        minted: Liquidity,
    },
    /// A liquidity withdrawal.
    LiquidityRemoved {
        /// Pool withdrawn from.
        pool_id: PoolId,
        /// Amount of the canonically-first token.
        amount_a: Amount,
        /// Amount of the canonically-second token.
        amount_b: Amount,
        /// LP units burned.
        burned: Liquidity,
    },
}
