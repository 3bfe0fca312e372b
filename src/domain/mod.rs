//! Validated value types shared by every component of the exchange.
//!
//! Quantities are `u128` micro-units behind newtypes with checked
//! arithmetic; assets are validated symbols; pairs are canonically
//! ordered so that `(A, B)` and `(B, A)` name the same market.

mod amount;
mod basis_points;
mod liquidity;
mod pair;
mod rounding;
mod token;

pub use amount::Amount;
pub use basis_points::BasisPoints;
pub use liquidity::Liquidity;
pub use pair::TokenPair;
pub use rounding::Rounding;
pub use token::TokenId;
