//! # ysrc-shares
//!
//! Share accounting for the yield source.
//!
//! Deposits into the yield source are tracked in an internal "share" unit
//! that represents a proportional claim on the pooled token balance. The
//! pooled balance itself lives in an external vault that issues its own
//! shares (yShares) at a vault-reported price per share.
//!
//! Every function in this crate is a pure conversion: all balances are
//! supplied by the caller, and every result truncates toward zero.
//!
//! ## Modules
//!
//! - [`convert`] — Token/share and token/yShare conversions
//! - [`bps`] — Basis-point arithmetic for loss limits

pub mod bps;
pub mod convert;

pub use ethereum_types::U256;

/// Decimals used when a vault reports its price per share at 1e18 scale.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Error types for share accounting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    /// A conversion divided by a zero pooled balance or a zero price.
    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),

    /// The result does not fit in 256 bits.
    #[error("arithmetic overflow in share conversion")]
    Overflow,

    /// A basis-point value exceeded [`bps::MAX_BPS`].
    #[error("basis points out of range: {bps} > {max}")]
    BpsOutOfRange {
        /// The rejected value.
        bps: u16,
        /// The upper bound.
        max: u16,
    },
}

/// Convenience result type for share accounting.
pub type Result<T> = std::result::Result<T, ShareError>;
