//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::domain::{BasisPoints, TokenId};
use crate::error::{ExchangeError, Result};

/// Default swap fee: 30 bps (0.30%), deducted from the input leg.
pub const DEFAULT_SWAP_FEE: BasisPoints = BasisPoints::new(30);

/// Default slippage tolerance applied to quotes: 50 bps (0.50%).
pub const DEFAULT_SLIPPAGE: BasisPoints = BasisPoints::new(50);

/// Tolerance band for proportional liquidity deposits: 100 bps (±1%).
pub const DEFAULT_RATIO_TOLERANCE: BasisPoints = BasisPoints::new(100);

/// Immutable parameters of an [`Exchange`](crate::engine::Exchange).
///
/// The base asset is the designated intermediate for two-hop routing —
/// typically the network's native unit. Fee, slippage, and ratio
/// tolerance default to the standard 30 / 50 / 100 bps and can be
/// overridden at construction.
///
/// # Examples
///
/// ```
/// use amm_exchange::config::ExchangeConfig;
/// use amm_exchange::domain::{BasisPoints, TokenId};
///
/// let cfg = ExchangeConfig::new(TokenId::new("PVX")?)
///     .with_swap_fee(BasisPoints::new(25))?;
/// assert_eq!(cfg.swap_fee().get(), 25);
/// assert_eq!(cfg.default_slippage().get(), 50);
/// # Ok::<(), amm_exchange::error::ExchangeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    base_token: TokenId,
    swap_fee: BasisPoints,
    default_slippage: BasisPoints,
    ratio_tolerance: BasisPoints,
}

impl ExchangeConfig {
    /// Creates a configuration with the standard fee parameters.
    pub fn new(base_token: TokenId) -> Self {
        Self {
            base_token,
            swap_fee: DEFAULT_SWAP_FEE,
            default_slippage: DEFAULT_SLIPPAGE,
            ratio_tolerance: DEFAULT_RATIO_TOLERANCE,
        }
    }

    /// Overrides the swap fee.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] if the fee is 100% or
    /// more — such a fee would zero out every net input.
    pub fn with_swap_fee(mut self, fee: BasisPoints) -> Result<Self> {
        if fee.get() >= 10_000 {
            return Err(ExchangeError::InvalidInput("swap fee must be below 100%"));
        }
        self.swap_fee = fee;
        Ok(self)
    }

    /// Overrides the default slippage tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] for values above 100%.
    pub fn with_default_slippage(mut self, slippage: BasisPoints) -> Result<Self> {
        if !slippage.is_valid_percent() {
            return Err(ExchangeError::InvalidInput(
                "slippage tolerance must be at most 100%",
            ));
        }
        self.default_slippage = slippage;
        Ok(self)
    }

    /// Overrides the deposit ratio tolerance band.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] for values above 100%.
    pub fn with_ratio_tolerance(mut self, tolerance: BasisPoints) -> Result<Self> {
        if !tolerance.is_valid_percent() {
            return Err(ExchangeError::InvalidInput(
                "ratio tolerance must be at most 100%",
            ));
        }
        self.ratio_tolerance = tolerance;
        Ok(self)
    }

    /// The designated base asset used as the two-hop intermediate.
    #[must_use]
    pub const fn base_token(&self) -> &TokenId {
        &self.base_token
    }

    /// The multiplicative swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> BasisPoints {
        self.swap_fee
    }

    /// The slippage tolerance used when the caller does not supply one.
    #[must_use]
    pub const fn default_slippage(&self) -> BasisPoints {
        self.default_slippage
    }

    /// The proportional-deposit tolerance band.
    #[must_use]
    pub const fn ratio_tolerance(&self) -> BasisPoints {
        self.ratio_tolerance
    }
}
