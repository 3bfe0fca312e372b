//! Swap execution.
//!
//! The executor never trusts a previously obtained quote: reserves may
//! have moved between quoting and committing, so the price is always
//! recomputed under the per-pool locks immediately before the mutation.
//! Validation failures are terminal — the caller resubmits with a fresh
//! deadline rather than the engine retrying a financial mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Amount, BasisPoints, TokenId};
use crate::error::{ExchangeError, Result};
use crate::pool::{LiquidityPool, OwnerAddress};
use crate::receipt::{SwapReceipt, TxId};
use crate::store::{LedgerDetail, LedgerEntry, LedgerStore, PoolStore};

use super::quote::{self, Quote};
use super::router::{self, Route};
use super::Exchange;

/// Parameters of a swap submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Token sold.
    pub from_token: TokenId,
    /// Token bought.
    pub to_token: TokenId,
    /// Gross input amount.
    pub amount_in: Amount,
    /// Slippage tolerance; the engine default applies when absent.
    pub slippage_bps: Option<BasisPoints>,
    /// Wall-clock expiry supplied by the caller.
    pub deadline: DateTime<Utc>,
}

impl<S: PoolStore, L: LedgerStore> Exchange<S, L> {
    /// Executes a swap for `owner`.
    ///
    /// The route is resolved lock-free, the pools it crosses are locked
    /// in ascending id order, and the trade is re-priced from fresh
    /// snapshots under those locks. Reserve updates, wallet updates, and
    /// the ledger record commit together inside the locked window, so no
    /// concurrent reader observes one without the others.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::DeadlineExceeded`] if the deadline has passed.
    /// - [`ExchangeError::InvalidInput`] for a zero amount or identical
    ///   tokens.
    /// - [`ExchangeError::NoRouteFound`] if no funded path exists at
    ///   execution time.
    /// - [`ExchangeError::InsufficientBalance`] if the owner cannot fund
    ///   the input leg.
    /// - [`ExchangeError::SlippageExceeded`] if the payout falls below
    ///   the tolerance-derived floor.
    /// - Storage errors propagate untouched.
    pub fn execute_swap(&self, owner: &OwnerAddress, request: &SwapRequest) -> Result<SwapReceipt> {
        let now = Utc::now();
        if now > request.deadline {
            return Err(ExchangeError::DeadlineExceeded);
        }
        if request.amount_in.is_zero() {
            return Err(ExchangeError::InvalidInput("swap amount must be positive"));
        }

        // Resolve the path lock-free, then pin the pools it crosses.
        let planned = router::select_route(&self.store, &self.config, &request.from_token, &request.to_token)?;
        let handles = self.lock_handles(&planned.pool_ids());
        let _guards: Vec<_> = handles.iter().map(|h| h.lock()).collect();

        // Re-read and re-price under the locks; the planned route only
        // fixes the topology, never the price.
        let route = self.reload_route(&planned)?;
        let slippage = request.slippage_bps.unwrap_or(self.config.default_slippage());
        let fresh = quote::price_route(
            &route,
            &request.from_token,
            &request.to_token,
            request.amount_in,
            &self.config,
            slippage,
        )?;

        let balance_in = self.ledger.balance(owner, &request.from_token)?;
        if balance_in < request.amount_in {
            return Err(ExchangeError::InsufficientBalance);
        }

        // The payout equals the freshly quoted output — there are no
        // partial fills — and must clear the tolerance floor.
        let payout = fresh.expected_out;
        if payout < fresh.min_out {
            return Err(ExchangeError::SlippageExceeded);
        }

        // Apply every hop to its pool before any write goes out.
        let mut updated: Vec<LiquidityPool> = Vec::with_capacity(fresh.legs.len());
        for (leg, pool) in fresh.legs.iter().zip(route.pools()) {
            let mut next = pool.clone();
            next.apply_swap(&leg.token_in, leg.amount_in, leg.amount_out, now)?;
            updated.push(next);
        }

        let debited = balance_in
            .checked_sub(request.amount_in)
            .ok_or(ExchangeError::InsufficientBalance)?;
        let balance_out = self.ledger.balance(owner, &request.to_token)?;
        let credited = balance_out
            .checked_add(payout)
            .ok_or(ExchangeError::Overflow("output balance"))?;
        let (base_volume, base_fee) = self.base_figures(&fresh)?;
        let tx_id = TxId::derive(
            owner.as_str(),
            &request.from_token,
            &request.to_token,
            request.amount_in,
            now,
            self.next_nonce(),
        );

        // Everything is validated; the writes below commit together.
        for pool in &updated {
            self.store.update_pool(pool)?;
        }
        self.ledger.set_balance(owner, &request.from_token, debited)?;
        self.ledger.set_balance(owner, &request.to_token, credited)?;
        self.ledger.record(&LedgerEntry {
            tx_id,
            owner: owner.clone(),
            timestamp: now,
            detail: LedgerDetail::Swap {
                from_token: request.from_token.clone(),
                to_token: request.to_token.clone(),
                amount_in: request.amount_in,
                amount_out: payout,
                fee: fresh.fee,
                pool_ids: fresh.legs.iter().map(|l| l.pool_id).collect(),
                base_volume,
                base_fee,
            },
        })?;

        info!(
            tx_id = %tx_id,
            owner = %owner,
            from = %request.from_token,
            to = %request.to_token,
            amount_in = %request.amount_in,
            amount_out = %payout,
            hops = fresh.path.hops(),
            "executed swap"
        );

        SwapReceipt::new(
            tx_id,
            request.from_token.clone(),
            request.to_token.clone(),
            request.amount_in,
            payout,
            fresh.fee,
            fresh.path.tokens(),
            now,
        )
    }

    /// Re-reads the pools of a planned route from the store.
    ///
    /// The shape (direct vs. two-hop) is kept; only the snapshots are
    /// refreshed. A pool that vanished or drained since planning makes
    /// the route unviable.
    fn reload_route(&self, planned: &Route) -> Result<Route> {
        let reload = |pool: &LiquidityPool| -> Result<LiquidityPool> {
            self.store
                .pool(&pool.id())?
                .ok_or(ExchangeError::NoRouteFound)
        };
        Ok(match planned {
            Route::Direct(pool) => Route::Direct(reload(pool)?),
            Route::ViaBase { first, second } => Route::ViaBase {
                first: reload(first)?,
                second: reload(second)?,
            },
        })
    }

    /// Base-denominated volume and fee of a priced trade, for the
    /// 24-hour rollup. Zero when no leg touches the base asset.
    fn base_figures(&self, quote: &Quote) -> Result<(Amount, Amount)> {
        let base = self.config.base_token();

        let volume = match &quote.path {
            super::SwapPath::Direct { from, to } => {
                if from == base {
                    quote.amount_in
                } else if to == base {
                    quote.expected_out
                } else {
                    Amount::ZERO
                }
            }
            super::SwapPath::ViaBase { .. } => {
                quote.legs.first().map_or(Amount::ZERO, |l| l.amount_out)
            }
        };

        let mut fee = Amount::ZERO;
        for leg in &quote.legs {
            if leg.token_in == *base {
                fee = fee
                    .checked_add(leg.fee)
                    .ok_or(ExchangeError::Overflow("base fee"))?;
            }
        }
        Ok((volume, fee))
    }
}
