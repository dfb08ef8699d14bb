//! Pool Math - Constant product (x·y=k) liquidity accounting
//!
//! Pure functions over arbitrary-precision integers used by the operator
//! tooling to report LP share issuance and ownership. Nothing here talks to
//! a ledger or a database; the ledger stays authoritative for balances.

pub mod pair_key;
pub mod reserves;
pub mod shares;
pub mod sqrt;

pub use pair_key::{pair_key, PairKey, PAIR_KEY_SEPARATOR};
pub use reserves::Reserves;
pub use shares::{
    compute_deposit_shares, compute_initial_shares, compute_ownership_fraction,
    compute_redemption, ownership_percent,
};
pub use sqrt::integer_sqrt;

/// Fixed-point scale used when turning an exact share ratio into a float (1e18)
pub const FRACTION_SCALE: u64 = 1_000_000_000_000_000_000;

/// Error types for pool accounting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolMathError {
    /// A quantity that must be non-negative was negative
    #[error("invalid argument: {0} must be non-negative")]
    NegativeInput(&'static str),
    /// Ratio requested against an empty share supply
    #[error("total supply is zero")]
    ZeroSupply,
    /// Holder claims more shares than exist
    #[error("shares exceed total supply")]
    SharesExceedSupply,
    /// Pair key text could not be parsed
    #[error("invalid pair key: {0}")]
    InvalidPairKey(String),
}

pub type Result<T> = core::result::Result<T, PoolMathError>;
