//! Unified error type for the exchange core.
//!
//! Every fallible operation in the crate returns [`ExchangeError`]. All
//! variants are terminal from the engine's point of view: the engine never
//! retries a financial mutation internally, because a retry could
//! double-execute. Callers are expected to re-quote and resubmit with a
//! fresh deadline.
//!
//! Storage-layer failures are carried through [`ExchangeError::Storage`]
//! without reinterpretation; every such failure is raised before any
//! observable mutation or not at all.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, ExchangeError>;

/// Errors produced by the exchange core.
///
/// Variants map one-to-one onto the validation gates of the engine:
/// each is detected synchronously, before any reserve, balance, or
/// position mutation becomes visible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// A request parameter failed validation before any pricing ran.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Neither a direct pool nor a two-hop path through the base asset
    /// exists (or a required leg has zero reserves).
    #[error("no route found between the requested tokens")]
    NoRouteFound,

    /// The caller-supplied wall-clock deadline has already passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A liquidity deposit is not proportional to the pool's current
    /// reserve ratio within the configured tolerance band.
    #[error("deposit ratio does not match the pool ratio")]
    RatioMismatch,

    /// The LP units that would be minted fall below the caller's floor.
    #[error("liquidity minted below the requested minimum")]
    InsufficientLiquidityMinted,

    /// A computed output amount fell below the caller's floor.
    #[error("slippage tolerance exceeded")]
    SlippageExceeded,

    /// The owner's wallet balance does not cover the input leg.
    #[error("insufficient balance for the input amount")]
    InsufficientBalance,

    /// Pool reserves cannot satisfy the requested trade.
    #[error("insufficient liquidity in pool")]
    InsufficientLiquidity,

    /// The referenced pool does not exist.
    #[error("pool not found")]
    PoolNotFound,

    /// The owner holds no position in the referenced pool.
    #[error("position not found")]
    PositionNotFound,

    /// The owner's position holds fewer LP units than requested.
    #[error("position holds insufficient liquidity")]
    InsufficientLiquidityHeld,

    /// A price or share was requested against an unfunded reserve.
    #[error("pool reserve is zero")]
    ZeroReserve,

    /// Checked arithmetic overflowed or underflowed.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A storage backend failure, passed through uninterpreted.
    #[error("storage backend failure: {0}")]
    Storage(String),
}
