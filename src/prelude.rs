//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use amm_exchange::prelude::*;
//! ```

pub use crate::config::ExchangeConfig;
pub use crate::domain::{Amount, BasisPoints, Liquidity, Rounding, TokenId, TokenPair};
pub use crate::engine::{
    AddLiquidityRequest, Exchange, ExchangeStats, Quote, RemoveLiquidityRequest, SwapPath,
    SwapRequest,
};
pub use crate::error::{ExchangeError, Result};
pub use crate::memory::{InMemoryLedger, InMemoryPoolStore};
pub use crate::pool::{LiquidityPool, OwnerAddress, PoolId, PoolPosition, PositionId};
pub use crate::receipt::{LiquidityReceipt, SwapReceipt, TxId};
pub use crate::store::{LedgerEntry, LedgerStore, PoolStore};
