//! Liquidity provision: deposits, withdrawals, LP mint and burn.
//!
//! Deposits into an existing pool must track the pool's current reserve
//! ratio within the configured tolerance band; the first deposit into a
//! fresh pool sets the exchange rate outright and mints
//! `√(amount_a × amount_b)` LP units. Withdrawals pay out the
//! proportional share of both reserves, rounded down.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Amount, Liquidity, Rounding, TokenId, TokenPair};
use crate::error::{ExchangeError, Result};
use crate::math;
use crate::pool::{LiquidityPool, OwnerAddress, PoolId, PoolPosition, PositionId};
use crate::receipt::{LiquidityAction, LiquidityReceipt, TxId};
use crate::store::{LedgerDetail, LedgerEntry, LedgerStore, PoolStore};

use super::{registry, Exchange};

/// Parameters of a liquidity deposit.
///
/// `token_a` / `token_b` are free-order: the engine reorients the
/// amounts to the pool's canonical pair internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityRequest {
    /// One side of the pair.
    pub token_a: TokenId,
    /// The other side of the pair.
    pub token_b: TokenId,
    /// Deposit amount of `token_a`.
    pub amount_a: Amount,
    /// Deposit amount of `token_b`.
    pub amount_b: Amount,
    /// Floor on the LP units minted (deposit slippage protection).
    pub min_liquidity: Liquidity,
    /// Wall-clock expiry supplied by the caller.
    pub deadline: DateTime<Utc>,
}

/// Parameters of a liquidity withdrawal.
///
/// The minimum amounts refer to the pool's canonical token order, the
/// same order [`LiquidityReceipt`] reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityRequest {
    /// Pool to withdraw from.
    pub pool_id: PoolId,
    /// LP units to burn.
    pub liquidity: Liquidity,
    /// Floor on the canonically-first token paid out.
    pub min_amount_a: Amount,
    /// Floor on the canonically-second token paid out.
    pub min_amount_b: Amount,
    /// Wall-clock expiry supplied by the caller.
    pub deadline: DateTime<Utc>,
}

impl<S: PoolStore, L: LedgerStore> Exchange<S, L> {
    /// Deposits liquidity for `owner`, minting LP units.
    ///
    /// Creates the pool on first deposit. The whole
    /// validate + mint + mutate window runs under the pool's lock.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::DeadlineExceeded`] if the deadline has passed.
    /// - [`ExchangeError::InvalidInput`] for zero amounts or identical
    ///   tokens.
    /// - [`ExchangeError::RatioMismatch`] if the deposit strays from the
    ///   pool ratio by more than the tolerance band.
    /// - [`ExchangeError::InsufficientLiquidityMinted`] if the minted
    ///   units fall below `min_liquidity` (or round to zero).
    /// - [`ExchangeError::InsufficientBalance`] if either wallet balance
    ///   cannot cover its side.
    pub fn add_liquidity(
        &self,
        owner: &OwnerAddress,
        request: &AddLiquidityRequest,
    ) -> Result<LiquidityReceipt> {
        let now = Utc::now();
        if now > request.deadline {
            return Err(ExchangeError::DeadlineExceeded);
        }
        if request.amount_a.is_zero() || request.amount_b.is_zero() {
            return Err(ExchangeError::InvalidInput(
                "both deposit amounts must be positive",
            ));
        }

        let pair = TokenPair::new(request.token_a.clone(), request.token_b.clone())?;

        // The pool id is derivable without the store, so the lock can be
        // taken before the pool record even exists — creation itself runs
        // under the lock.
        let handles = self.lock_handles(&[PoolId::derive(&pair)]);
        let _guard = handles[0].lock();

        // Orient the request amounts to the canonical pair order.
        let (amount_a, amount_b) = if request.token_a == *pair.first() {
            (request.amount_a, request.amount_b)
        } else {
            (request.amount_b, request.amount_a)
        };

        // Balances gate before the pool record exists, so a rejected
        // deposit leaves nothing behind.
        let balance_a = self.ledger.balance(owner, pair.first())?;
        let balance_b = self.ledger.balance(owner, pair.second())?;
        if balance_a < amount_a || balance_b < amount_b {
            return Err(ExchangeError::InsufficientBalance);
        }

        let existing = self.store.pool_for_pair(&pair)?;
        let minted = match &existing {
            Some(pool) if !pool.total_liquidity().is_zero() => proportional_checked_mint(
                pool,
                amount_a,
                amount_b,
                self.config.ratio_tolerance().get(),
            )?,
            // Missing pool or a drained one: the depositor re-sets the rate.
            _ => bootstrap_mint(amount_a, amount_b)?,
        };
        if minted < request.min_liquidity || minted.is_zero() {
            return Err(ExchangeError::InsufficientLiquidityMinted);
        }

        let mut pool = match existing {
            Some(pool) => pool,
            None => registry::get_or_create_pool(&self.store, &pair, now)?,
        };
        pool.apply_deposit(amount_a, amount_b, minted, now)?;

        let position_id = PositionId::derive(&pool.id(), owner);
        let was_created;
        let position = match self.store.position(&position_id)? {
            Some(mut existing) => {
                existing.deposit(minted, now)?;
                was_created = false;
                existing
            }
            None => {
                was_created = true;
                PoolPosition::new(pool.id(), owner.clone(), minted, now)
            }
        };

        let debited_a = balance_a
            .checked_sub(amount_a)
            .ok_or(ExchangeError::InsufficientBalance)?;
        let debited_b = balance_b
            .checked_sub(amount_b)
            .ok_or(ExchangeError::InsufficientBalance)?;

        self.store.update_pool(&pool)?;
        if was_created {
            self.store.create_position(&position)?;
        } else {
            self.store.update_position(&position)?;
        }
        self.ledger.set_balance(owner, pair.first(), debited_a)?;
        self.ledger.set_balance(owner, pair.second(), debited_b)?;

        let tx_id = TxId::derive(
            owner.as_str(),
            pair.first(),
            pair.second(),
            amount_a,
            now,
            self.next_nonce(),
        );
        self.ledger.record(&LedgerEntry {
            tx_id,
            owner: owner.clone(),
            timestamp: now,
            detail: LedgerDetail::LiquidityAdded {
                pool_id: pool.id(),
                amount_a,
                amount_b,
                minted,
            },
        })?;

        info!(
            tx_id = %tx_id,
            owner = %owner,
            pool_id = %pool.id(),
            minted = %minted,
            "added liquidity"
        );

        Ok(LiquidityReceipt::new(
            tx_id,
            pool.id(),
            LiquidityAction::Deposited,
            pair.first().clone(),
            pair.second().clone(),
            amount_a,
            amount_b,
            minted,
            now,
        ))
    }

    /// Withdraws liquidity for `owner`, burning LP units.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::DeadlineExceeded`] if the deadline has passed.
    /// - [`ExchangeError::PoolNotFound`] / [`ExchangeError::PositionNotFound`]
    ///   for missing records.
    /// - [`ExchangeError::InsufficientLiquidityHeld`] if the position
    ///   holds fewer units than requested.
    /// - [`ExchangeError::SlippageExceeded`] if either payout falls
    ///   below its floor.
    pub fn remove_liquidity(
        &self,
        owner: &OwnerAddress,
        request: &RemoveLiquidityRequest,
    ) -> Result<LiquidityReceipt> {
        let now = Utc::now();
        if now > request.deadline {
            return Err(ExchangeError::DeadlineExceeded);
        }
        if request.liquidity.is_zero() {
            return Err(ExchangeError::InvalidInput(
                "withdrawal must burn at least one unit",
            ));
        }

        let handles = self.lock_handles(&[request.pool_id]);
        let _guard = handles[0].lock();

        let mut pool = self
            .store
            .pool(&request.pool_id)?
            .ok_or(ExchangeError::PoolNotFound)?;
        let position_id = PositionId::derive(&pool.id(), owner);
        let mut position = self
            .store
            .position(&position_id)?
            .ok_or(ExchangeError::PositionNotFound)?;
        if position.liquidity_tokens() < request.liquidity {
            return Err(ExchangeError::InsufficientLiquidityHeld);
        }

        let total = pool.total_liquidity();
        let amount_a = request
            .liquidity
            .share_of(pool.reserve_a(), total, Rounding::Down)
            .ok_or(ExchangeError::Overflow("withdrawal share"))?;
        let amount_b = request
            .liquidity
            .share_of(pool.reserve_b(), total, Rounding::Down)
            .ok_or(ExchangeError::Overflow("withdrawal share"))?;

        if amount_a < request.min_amount_a || amount_b < request.min_amount_b {
            return Err(ExchangeError::SlippageExceeded);
        }

        pool.apply_withdrawal(amount_a, amount_b, request.liquidity, now)?;
        position.withdraw(request.liquidity, now)?;

        let balance_a = self.ledger.balance(owner, pool.pair().first())?;
        let balance_b = self.ledger.balance(owner, pool.pair().second())?;
        let credited_a = balance_a
            .checked_add(amount_a)
            .ok_or(ExchangeError::Overflow("payout balance"))?;
        let credited_b = balance_b
            .checked_add(amount_b)
            .ok_or(ExchangeError::Overflow("payout balance"))?;

        self.store.update_pool(&pool)?;
        if position.liquidity_tokens().is_zero() {
            self.store.delete_position(&position_id)?;
        } else {
            self.store.update_position(&position)?;
        }
        self.ledger.set_balance(owner, pool.pair().first(), credited_a)?;
        self.ledger.set_balance(owner, pool.pair().second(), credited_b)?;

        let tx_id = TxId::derive(
            owner.as_str(),
            pool.pair().first(),
            pool.pair().second(),
            amount_a,
            now,
            self.next_nonce(),
        );
        self.ledger.record(&LedgerEntry {
            tx_id,
            owner: owner.clone(),
            timestamp: now,
            detail: LedgerDetail::LiquidityRemoved {
                pool_id: pool.id(),
                amount_a,
                amount_b,
                burned: request.liquidity,
            },
        })?;

        info!(
            tx_id = %tx_id,
            owner = %owner,
            pool_id = %pool.id(),
            burned = %request.liquidity,
            "removed liquidity"
        );

        Ok(LiquidityReceipt::new(
            tx_id,
            pool.id(),
            LiquidityAction::Withdrawn,
            pool.pair().first().clone(),
            pool.pair().second().clone(),
            amount_a,
            amount_b,
            request.liquidity,
            now,
        ))
    }
}

/// LP units for the first deposit: `√(amount_a × amount_b)`.
///
/// The first depositor sets the pool's exchange rate; there is no
/// minimum-liquidity floor.
fn bootstrap_mint(amount_a: Amount, amount_b: Amount) -> Result<Liquidity> {
    let product = amount_a
        .checked_mul(amount_b)
        .ok_or(ExchangeError::Overflow("bootstrap product"))?;
    Ok(Liquidity::new(math::isqrt(product.get())))
}

/// LP units for a deposit into a funded pool, after the ratio check.
///
/// The counterpart amount must lie within the tolerance band around
/// `amount_a × reserve_b / reserve_a`; units minted are
/// `amount_a × total / reserve_a`.
fn proportional_checked_mint(
    pool: &LiquidityPool,
    amount_a: Amount,
    amount_b: Amount,
    tolerance_bps: u32,
) -> Result<Liquidity> {
    let expected_b = amount_a
        .mul_div(pool.reserve_b(), pool.reserve_a(), Rounding::Down)
        .ok_or(ExchangeError::Overflow("expected counterpart"))?;
    if !math::within_tolerance_band(amount_b, expected_b, tolerance_bps)? {
        return Err(ExchangeError::RatioMismatch);
    }
    math::proportional_mint(amount_a, pool.reserve_a(), pool.total_liquidity())
}
