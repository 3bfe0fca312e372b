//! Pool and position records, with invariant-checked reserve mutation.
//!
//! A [`LiquidityPool`] is one token-pair market; a [`PoolPosition`] is one
//! owner's LP claim on one pool. Both are plain serde-able records owned
//! by the [`PoolStore`](crate::store::PoolStore); the mutation methods
//! here are the only code that touches reserves, and each one re-checks
//! the pool invariants before committing:
//!
//! - **Funding invariant** — reserves and total liquidity are zero
//!   together or positive together. A pool is never half-funded.
//! - **Non-decreasing product** — a swap may never shrink
//!   `reserve_a × reserve_b`; with a positive fee the product grows,
//!   because the fee stays in the reserves without minting LP units.
//!
//! Identifiers are domain-separated blake3 hashes, so they are
//! deterministic, collision-resistant, and unpredictable does not
//! matter: the same pair always derives the same pool id, which is what
//! makes concurrent pool creation idempotent.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Liquidity, Rounding, TokenId, TokenPair};
use crate::error::{ExchangeError, Result};

/// Domain separator for pool identifiers.
const POOL_ID_DOMAIN: &[u8] = b"AMM_EXCHANGE_POOL_V1";

/// Domain separator for position identifiers.
const POSITION_ID_DOMAIN: &[u8] = b"AMM_EXCHANGE_POSITION_V1";

/// Fixed-point scale for spot prices (18 decimals).
pub const PRICE_PRECISION: u128 = 1_000_000_000_000_000_000;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Deterministic pool identifier: `blake3(domain ‖ canonical pair)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PoolId([u8; 32]);

impl PoolId {
    /// Derives the identifier of the (unique) pool for a pair.
    #[must_use]
    pub fn derive(pair: &TokenPair) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(POOL_ID_DOMAIN);
        hasher.update(pair.first().as_bytes());
        hasher.update(b"/");
        hasher.update(pair.second().as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Returns the raw hash bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Deterministic position identifier: `blake3(domain ‖ pool ‖ owner)`.
///
/// One owner therefore holds at most one position record per pool;
/// repeat deposits top the record up instead of fragmenting it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PositionId([u8; 32]);

impl PositionId {
    /// Derives the identifier of an owner's position in a pool.
    #[must_use]
    pub fn derive(pool: &PoolId, owner: &OwnerAddress) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(POSITION_ID_DOMAIN);
        hasher.update(pool.as_bytes());
        hasher.update(owner.as_str().as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Returns the raw hash bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A wallet address owning balances and positions.
///
/// The engine treats addresses as opaque non-empty strings; key
/// management and authentication live outside the core.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerAddress(String);

impl OwnerAddress {
    /// Creates a validated address.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] if the address is empty.
    pub fn new(address: &str) -> Result<Self> {
        if address.is_empty() {
            return Err(ExchangeError::InvalidInput("owner address is empty"));
        }
        Ok(Self(address.to_owned()))
    }

    /// Returns the address string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// LiquidityPool
// ---------------------------------------------------------------------------

/// One token-pair market.
///
/// Reserves are aligned with the pair's canonical order: `reserve_a`
/// belongs to `pair.first()`, `reserve_b` to `pair.second()`. Pools are
/// created empty by the registry on first deposit and are never deleted;
/// a fully drained pool stays registered and inert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPool {
    id: PoolId,
    pair: TokenPair,
    reserve_a: Amount,
    reserve_b: Amount,
    total_liquidity: Liquidity,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LiquidityPool {
    /// Creates an empty (zero-reserve) pool for a pair.
    #[must_use]
    pub fn new_empty(pair: TokenPair, now: DateTime<Utc>) -> Self {
        Self {
            id: PoolId::derive(&pair),
            pair,
            reserve_a: Amount::ZERO,
            reserve_b: Amount::ZERO,
            total_liquidity: Liquidity::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the pool identifier.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Returns the token pair.
    #[must_use]
    pub const fn pair(&self) -> &TokenPair {
        &self.pair
    }

    /// Reserve of the canonically-first token.
    #[must_use]
    pub const fn reserve_a(&self) -> Amount {
        self.reserve_a
    }

    /// Reserve of the canonically-second token.
    #[must_use]
    pub const fn reserve_b(&self) -> Amount {
        self.reserve_b
    }

    /// Outstanding LP claim units.
    #[must_use]
    pub const fn total_liquidity(&self) -> Liquidity {
        self.total_liquidity
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` if the pool holds reserves on both sides.
    #[must_use]
    pub fn is_funded(&self) -> bool {
        !self.reserve_a.is_zero() && !self.reserve_b.is_zero()
    }

    /// Returns the reserve belonging to `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] if `token` is not part of
    /// this pool's pair.
    pub fn reserve_of(&self, token: &TokenId) -> Result<Amount> {
        if *token == *self.pair.first() {
            Ok(self.reserve_a)
        } else if *token == *self.pair.second() {
            Ok(self.reserve_b)
        } else {
            Err(ExchangeError::InvalidInput("token is not part of this pool"))
        }
    }

    /// Returns `(reserve_in, reserve_out)` oriented for a trade selling
    /// `token_in`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] if `token_in` is not part
    /// of this pool's pair.
    pub fn oriented_reserves(&self, token_in: &TokenId) -> Result<(Amount, Amount)> {
        if *token_in == *self.pair.first() {
            Ok((self.reserve_a, self.reserve_b))
        } else if *token_in == *self.pair.second() {
            Ok((self.reserve_b, self.reserve_a))
        } else {
            Err(ExchangeError::InvalidInput("token is not part of this pool"))
        }
    }

    /// Spot price of one unit of `base` in the other token, scaled by
    /// 1e18.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::InvalidInput`] if `base` is not in the pair.
    /// - [`ExchangeError::ZeroReserve`] on an unfunded pool.
    /// - [`ExchangeError::Overflow`] on intermediate overflow.
    pub fn spot_price_e18(&self, base: &TokenId) -> Result<u128> {
        let (base_reserve, quote_reserve) = self.oriented_reserves(base)?;
        if base_reserve.is_zero() || quote_reserve.is_zero() {
            return Err(ExchangeError::ZeroReserve);
        }
        quote_reserve
            .mul_div(
                Amount::new(PRICE_PRECISION),
                base_reserve,
                Rounding::Down,
            )
            .map(|a| a.get())
            .ok_or(ExchangeError::Overflow("spot price"))
    }

    /// Applies a committed swap: the gross input (fee included) joins the
    /// input reserve, the output leaves the output reserve.
    ///
    /// Rejects any mutation that would shrink the reserve product — with
    /// a positive fee the product strictly grows, so a shrink can only
    /// mean a pricing bug upstream.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::InvalidInput`] if `token_in` is not in the pair.
    /// - [`ExchangeError::InsufficientLiquidity`] if the output would
    ///   empty the reserve or the product would decrease.
    /// - [`ExchangeError::Overflow`] on arithmetic overflow.
    pub fn apply_swap(
        &mut self,
        token_in: &TokenId,
        amount_in: Amount,
        amount_out: Amount,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let (reserve_in, reserve_out) = self.oriented_reserves(token_in)?;

        let product_before = reserve_in
            .checked_mul(reserve_out)
            .ok_or(ExchangeError::Overflow("reserve product"))?;

        let new_in = reserve_in
            .checked_add(amount_in)
            .ok_or(ExchangeError::Overflow("input reserve"))?;
        let new_out = reserve_out
            .checked_sub(amount_out)
            .ok_or(ExchangeError::InsufficientLiquidity)?;
        if new_out.is_zero() {
            return Err(ExchangeError::InsufficientLiquidity);
        }

        let product_after = new_in
            .checked_mul(new_out)
            .ok_or(ExchangeError::Overflow("reserve product"))?;
        if product_after < product_before {
            return Err(ExchangeError::InsufficientLiquidity);
        }

        if *token_in == *self.pair.first() {
            self.reserve_a = new_in;
            self.reserve_b = new_out;
        } else {
            self.reserve_b = new_in;
            self.reserve_a = new_out;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Applies a committed deposit: both reserves grow and `minted` LP
    /// units join the total.
    ///
    /// Amounts are given in canonical pair order.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Overflow`] on arithmetic overflow, or
    /// [`ExchangeError::InvalidInput`] if a bootstrap deposit funds only
    /// one side.
    pub fn apply_deposit(
        &mut self,
        amount_a: Amount,
        amount_b: Amount,
        minted: Liquidity,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let bootstrapping = self.total_liquidity.is_zero();
        if bootstrapping && (amount_a.is_zero() || amount_b.is_zero()) {
            return Err(ExchangeError::InvalidInput(
                "first deposit must fund both sides",
            ));
        }

        self.reserve_a = self
            .reserve_a
            .checked_add(amount_a)
            .ok_or(ExchangeError::Overflow("reserve_a on deposit"))?;
        self.reserve_b = self
            .reserve_b
            .checked_add(amount_b)
            .ok_or(ExchangeError::Overflow("reserve_b on deposit"))?;
        self.total_liquidity = self
            .total_liquidity
            .checked_add(minted)
            .ok_or(ExchangeError::Overflow("total liquidity on deposit"))?;
        self.updated_at = now;
        Ok(())
    }

    /// Applies a committed withdrawal: both reserves shrink and `burned`
    /// LP units leave the total.
    ///
    /// Amounts are given in canonical pair order.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InsufficientLiquidity`] if any component
    /// would underflow.
    pub fn apply_withdrawal(
        &mut self,
        amount_a: Amount,
        amount_b: Amount,
        burned: Liquidity,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.reserve_a = self
            .reserve_a
            .checked_sub(amount_a)
            .ok_or(ExchangeError::InsufficientLiquidity)?;
        self.reserve_b = self
            .reserve_b
            .checked_sub(amount_b)
            .ok_or(ExchangeError::InsufficientLiquidity)?;
        self.total_liquidity = self
            .total_liquidity
            .checked_sub(burned)
            .ok_or(ExchangeError::InsufficientLiquidity)?;
        self.updated_at = now;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PoolPosition
// ---------------------------------------------------------------------------

/// One owner's LP claim on one pool.
///
/// Created on the owner's first deposit, topped up on subsequent ones,
/// and deleted by the manager when the claim reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPosition {
    id: PositionId,
    pool_id: PoolId,
    owner: OwnerAddress,
    liquidity_tokens: Liquidity,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PoolPosition {
    /// Creates a new position holding `liquidity_tokens`.
    #[must_use]
    pub fn new(
        pool_id: PoolId,
        owner: OwnerAddress,
        liquidity_tokens: Liquidity,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PositionId::derive(&pool_id, &owner),
            pool_id,
            owner,
            liquidity_tokens,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the position identifier.
    #[must_use]
    pub const fn id(&self) -> PositionId {
        self.id
    }

    /// Returns the pool this position claims against.
    #[must_use]
    pub const fn pool_id(&self) -> PoolId {
        self.pool_id
    }

    /// Returns the owning address.
    #[must_use]
    pub const fn owner(&self) -> &OwnerAddress {
        &self.owner
    }

    /// Returns the held LP units.
    #[must_use]
    pub const fn liquidity_tokens(&self) -> Liquidity {
        self.liquidity_tokens
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Adds freshly minted units to the claim.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Overflow`] on overflow.
    pub fn deposit(&mut self, minted: Liquidity, now: DateTime<Utc>) -> Result<()> {
        self.liquidity_tokens = self
            .liquidity_tokens
            .checked_add(minted)
            .ok_or(ExchangeError::Overflow("position liquidity"))?;
        self.updated_at = now;
        Ok(())
    }

    /// Burns units from the claim.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InsufficientLiquidityHeld`] if the claim
    /// holds fewer units than requested.
    pub fn withdraw(&mut self, burned: Liquidity, now: DateTime<Utc>) -> Result<()> {
        self.liquidity_tokens = self
            .liquidity_tokens
            .checked_sub(burned)
            .ok_or(ExchangeError::InsufficientLiquidityHeld)?;
        self.updated_at = now;
        Ok(())
    }
}
