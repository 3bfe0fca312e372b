//! Unordered token pair with a canonical representation.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::TokenId;
use crate::error::{ExchangeError, Result};

/// An unordered pair of distinct tokens, stored in canonical symbol order.
///
/// `(A, B)` and `(B, A)` construct the same `TokenPair`, which is what
/// enforces "one pool per unordered pair": the pair itself is the lookup
/// key, and the pool identifier is derived from its canonical form.
///
/// # Examples
///
/// ```
/// use amm_exchange::domain::{TokenId, TokenPair};
///
/// let pvx = TokenId::new("PVX")?;
/// let usdc = TokenId::new("USDC")?;
/// let ab = TokenPair::new(pvx.clone(), usdc.clone())?;
/// let ba = TokenPair::new(usdc, pvx)?;
/// assert_eq!(ab, ba);
/// # Ok::<(), amm_exchange::error::ExchangeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    first: TokenId,
    second: TokenId,
}

impl TokenPair {
    /// Creates a canonically-ordered pair.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] if both tokens are the
    /// same asset.
    pub fn new(x: TokenId, y: TokenId) -> Result<Self> {
        if x == y {
            return Err(ExchangeError::InvalidInput(
                "a pair requires two distinct tokens",
            ));
        }
        let (first, second) = if x < y { (x, y) } else { (y, x) };
        Ok(Self { first, second })
    }

    /// Returns the canonically-first token (lower symbol).
    #[must_use]
    pub const fn first(&self) -> &TokenId {
        &self.first
    }

    /// Returns the canonically-second token (higher symbol).
    #[must_use]
    pub const fn second(&self) -> &TokenId {
        &self.second
    }

    /// Returns `true` if `token` is one side of this pair.
    #[must_use]
    pub fn contains(&self, token: &TokenId) -> bool {
        self.first == *token || self.second == *token
    }

    /// Returns the counterpart of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] if `token` is not in the
    /// pair.
    pub fn other(&self, token: &TokenId) -> Result<&TokenId> {
        if self.first == *token {
            Ok(&self.second)
        } else if self.second == *token {
            Ok(&self.first)
        } else {
            Err(ExchangeError::InvalidInput("token is not part of this pair"))
        }
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first, self.second)
    }
}
