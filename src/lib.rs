//! # AMM Exchange
//!
//! Constant-product AMM exchange core: prices, executes, and accounts
//! for token swaps against shared liquidity pools, and mints/burns
//! liquidity-provider claims on those pools.
//!
//! The engine is persistence-agnostic and transport-agnostic. Pools and
//! positions live behind an injected [`PoolStore`](store::PoolStore);
//! wallet balances and transaction history behind an injected
//! [`LedgerStore`](store::LedgerStore). HTTP routing, authentication,
//! and key management are out of scope — the boundary is a typed
//! in-process API.
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use amm_exchange::config::ExchangeConfig;
//! use amm_exchange::domain::{Amount, Liquidity, TokenId};
//! use amm_exchange::engine::{AddLiquidityRequest, Exchange, SwapRequest};
//! use amm_exchange::memory::{InMemoryLedger, InMemoryPoolStore};
//! use amm_exchange::pool::OwnerAddress;
//!
//! // 1. Wire the engine to its collaborators.
//! let ledger = InMemoryLedger::new();
//! let alice = OwnerAddress::new("alice")?;
//! let pvx = TokenId::new("PVX")?;
//! let usdc = TokenId::new("USDC")?;
//! ledger.credit(&alice, &pvx, Amount::new(2_000_000));
//! ledger.credit(&alice, &usdc, Amount::new(2_000_000));
//!
//! let exchange = Exchange::new(
//!     InMemoryPoolStore::new(),
//!     ledger,
//!     ExchangeConfig::new(pvx.clone()),
//! );
//!
//! // 2. Bootstrap a pool.
//! let receipt = exchange.add_liquidity(&alice, &AddLiquidityRequest {
//!     token_a: pvx.clone(),
//!     token_b: usdc.clone(),
//!     amount_a: Amount::new(1_000_000),
//!     amount_b: Amount::new(1_000_000),
//!     min_liquidity: Liquidity::ZERO,
//!     deadline: Utc::now() + Duration::minutes(5),
//! })?;
//! assert_eq!(receipt.liquidity_delta(), Liquidity::new(1_000_000));
//!
//! // 3. Quote, then commit.
//! let quote = exchange.quote(&pvx, &usdc, Amount::new(10_000))?;
//! assert!(quote.expected_out.get() > 0);
//!
//! let swap = exchange.execute_swap(&alice, &SwapRequest {
//!     from_token: pvx,
//!     to_token: usdc,
//!     amount_in: Amount::new(10_000),
//!     slippage_bps: None,
//!     deadline: Utc::now() + Duration::minutes(5),
//! })?;
//! assert!(swap.amount_out().get() > 0);
//! # Ok::<(), amm_exchange::error::ExchangeError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │    Caller     │  HTTP routes, jobs — out of scope
//! └──────┬───────┘
//!        │ quote / execute_swap / add_liquidity / remove_liquidity
//!        ▼
//! ┌──────────────┐   select_route   ┌──────────────┐
//! │   Exchange    │ ───────────────▶ │ Router/Quote │  pure, lock-free
//! │  (lock table) │ ◀─────────────── │    Engine    │
//! └──────┬───────┘      Quote       └──────────────┘
//!        │ re-quote + mutate, under per-pool locks
//!        ▼
//! ┌──────────────┐                  ┌──────────────┐
//! │  PoolStore    │                  │ LedgerStore  │
//! │ pools, claims │                  │ balances, tx │
//! └──────────────┘                  └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`TokenId`](domain::TokenId), [`TokenPair`](domain::TokenPair), … |
//! | [`pool`] | [`LiquidityPool`](pool::LiquidityPool) and [`PoolPosition`](pool::PoolPosition) records, invariant-checked mutation |
//! | [`engine`] | [`Exchange`](engine::Exchange) facade, routing, pricing, execution |
//! | [`store`] | [`PoolStore`](store::PoolStore) / [`LedgerStore`](store::LedgerStore) collaborator traits |
//! | [`memory`] | In-memory store implementations |
//! | [`receipt`] | [`SwapReceipt`](receipt::SwapReceipt), [`LiquidityReceipt`](receipt::LiquidityReceipt), [`TxId`](receipt::TxId) |
//! | [`config`] | [`ExchangeConfig`](config::ExchangeConfig): base asset, fee, tolerances |
//! | [`math`]   | Checked integer helpers: `mul_div`, `isqrt`, tolerance bands |
//! | [`error`]  | [`ExchangeError`](error::ExchangeError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod math;
pub mod memory;
pub mod pool;
pub mod prelude;
pub mod receipt;
pub mod store;
