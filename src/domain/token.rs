//! Asset identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ExchangeError, Result};

/// Longest accepted symbol, in bytes.
const MAX_SYMBOL_LEN: usize = 16;

/// A validated asset symbol, e.g. `"PVX"` or `"USDC"`.
///
/// Token identity is the symbol itself: two `TokenId`s are the same
/// asset exactly when their symbols compare equal. Symbols are
/// restricted to non-empty ASCII alphanumerics of at most 16 bytes so
/// they can double as map keys and identifier-derivation input.
///
/// # Examples
///
/// ```
/// use amm_exchange::domain::TokenId;
///
/// let usdc = TokenId::new("USDC")?;
/// assert_eq!(usdc.as_str(), "USDC");
/// assert!(TokenId::new("").is_err());
/// # Ok::<(), amm_exchange::error::ExchangeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    /// Creates a validated `TokenId` from a symbol.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] if the symbol is empty,
    /// longer than 16 bytes, or contains anything other than ASCII
    /// alphanumerics.
    pub fn new(symbol: &str) -> Result<Self> {
        if symbol.is_empty() {
            return Err(ExchangeError::InvalidInput("token symbol is empty"));
        }
        if symbol.len() > MAX_SYMBOL_LEN {
            return Err(ExchangeError::InvalidInput("token symbol too long"));
        }
        if !symbol.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ExchangeError::InvalidInput(
                "token symbol must be ASCII alphanumeric",
            ));
        }
        Ok(Self(symbol.to_owned()))
    }

    /// Returns the symbol.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the symbol bytes, used for identifier derivation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
