//! Transaction identifiers and operation receipts.
//!
//! Receipts are the transient artifacts the engine hands back across its
//! boundary after a committed mutation. They are not persisted by the
//! core; the matching durable record is the
//! [`LedgerEntry`](crate::store::LedgerEntry) appended to the ledger
//! collaborator in the same atomic step.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Liquidity, Rounding, TokenId};
use crate::error::{ExchangeError, Result};
use crate::pool::{PoolId, PRICE_PRECISION};

/// Domain separator for transaction identifiers.
const TX_ID_DOMAIN: &[u8] = b"AMM_EXCHANGE_TX_V1";

/// Collision-resistant transaction identifier.
///
/// Derived as `blake3(domain ‖ owner ‖ tokens ‖ amount ‖ timestamp ‖
/// nonce)`. The engine-scoped nonce makes two otherwise identical
/// requests in the same microsecond derive distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxId([u8; 32]);

impl TxId {
    /// Derives a transaction identifier.
    #[must_use]
    pub fn derive(
        owner: &str,
        token_x: &TokenId,
        token_y: &TokenId,
        amount: Amount,
        timestamp: DateTime<Utc>,
        nonce: u64,
    ) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(TX_ID_DOMAIN);
        hasher.update(owner.as_bytes());
        hasher.update(b"|");
        hasher.update(token_x.as_bytes());
        hasher.update(b"|");
        hasher.update(token_y.as_bytes());
        hasher.update(b"|");
        hasher.update(&amount.get().to_le_bytes());
        hasher.update(&timestamp.timestamp_micros().to_le_bytes());
        hasher.update(&nonce.to_le_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Returns the raw hash bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Result of a committed swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    tx_id: TxId,
    from_token: TokenId,
    to_token: TokenId,
    amount_in: Amount,
    amount_out: Amount,
    fee: Amount,
    price_e18: u128,
    path: Vec<TokenId>,
    timestamp: DateTime<Utc>,
}

impl SwapReceipt {
    /// Builds a receipt and computes the executed price.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] if either amount is zero
    /// or the fee is not smaller than the input, and
    /// [`ExchangeError::Overflow`] if the price computation overflows.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tx_id: TxId,
        from_token: TokenId,
        to_token: TokenId,
        amount_in: Amount,
        amount_out: Amount,
        fee: Amount,
        path: Vec<TokenId>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        if amount_in.is_zero() || amount_out.is_zero() {
            return Err(ExchangeError::InvalidInput(
                "receipt amounts must be positive",
            ));
        }
        if fee >= amount_in {
            return Err(ExchangeError::InvalidInput(
                "fee must be smaller than the input",
            ));
        }
        let price_e18 = amount_out
            .mul_div(Amount::new(PRICE_PRECISION), amount_in, Rounding::Down)
            .ok_or(ExchangeError::Overflow("executed price"))?
            .get();
        Ok(Self {
            tx_id,
            from_token,
            to_token,
            amount_in,
            amount_out,
            fee,
            price_e18,
            path,
            timestamp,
        })
    }

    /// Transaction identifier.
    #[must_use]
    pub const fn tx_id(&self) -> TxId {
        self.tx_id
    }

    /// Token sold.
    #[must_use]
    pub const fn from_token(&self) -> &TokenId {
        &self.from_token
    }

    /// Token bought.
    #[must_use]
    pub const fn to_token(&self) -> &TokenId {
        &self.to_token
    }

    /// Gross input amount (fee included).
    #[must_use]
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Output amount paid to the owner.
    #[must_use]
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Total fee paid, denominated per leg in that leg's input token.
    #[must_use]
    pub const fn fee(&self) -> Amount {
        self.fee
    }

    /// Executed price `amount_out / amount_in`, scaled by 1e18.
    #[must_use]
    pub const fn price_e18(&self) -> u128 {
        self.price_e18
    }

    /// The token path the trade actually took.
    #[must_use]
    pub fn path(&self) -> &[TokenId] {
        &self.path
    }

    /// Execution timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Direction of a liquidity operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityAction {
    /// Tokens were deposited; LP units were minted.
    Deposited,
    /// LP units were burned; tokens were withdrawn.
    Withdrawn,
}

/// Result of a committed liquidity operation.
///
/// Amounts are reported in the pool's canonical pair order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityReceipt {
    tx_id: TxId,
    pool_id: PoolId,
    action: LiquidityAction,
    token_a: TokenId,
    token_b: TokenId,
    amount_a: Amount,
    amount_b: Amount,
    liquidity_delta: Liquidity,
    timestamp: DateTime<Utc>,
}

impl LiquidityReceipt {
    /// Builds a liquidity receipt.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        tx_id: TxId,
        pool_id: PoolId,
        action: LiquidityAction,
        token_a: TokenId,
        token_b: TokenId,
        amount_a: Amount,
        amount_b: Amount,
        liquidity_delta: Liquidity,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_id,
            pool_id,
            action,
            token_a,
            token_b,
            amount_a,
            amount_b,
            liquidity_delta,
            timestamp,
        }
    }

    /// Transaction identifier.
    #[must_use]
    pub const fn tx_id(&self) -> TxId {
        self.tx_id
    }

    /// Pool the operation applied to.
    #[must_use]
    pub const fn pool_id(&self) -> PoolId {
        self.pool_id
    }

    /// Whether liquidity was deposited or withdrawn.
    #[must_use]
    pub const fn action(&self) -> LiquidityAction {
        self.action
    }

    /// Canonically-first token of the pool.
    #[must_use]
    pub const fn token_a(&self) -> &TokenId {
        &self.token_a
    }

    /// Canonically-second token of the pool.
    #[must_use]
    pub const fn token_b(&self) -> &TokenId {
        &self.token_b
    }

    /// Amount of the first token moved.
    #[must_use]
    pub const fn amount_a(&self) -> Amount {
        self.amount_a
    }

    /// Amount of the second token moved.
    #[must_use]
    pub const fn amount_b(&self) -> Amount {
        self.amount_b
    }

    /// LP units minted or burned.
    #[must_use]
    pub const fn liquidity_delta(&self) -> Liquidity {
        self.liquidity_delta
    }

    /// Execution timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
