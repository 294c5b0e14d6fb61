//! # ysrc-source
//!
//! Yield source adapter over a yVault V2.
//!
//! Depositors hand tokens to the yield source, which routes them into the
//! vault and credits the depositor with internal shares. Shares are
//! redeemed for tokens at the current exchange rate, so every holder
//! shares in the yield the vault earns. Sponsors add tokens without
//! receiving shares, raising the value of everyone else's.
//!
//! ## Modules
//!
//! - [`config`] — Yield source configuration
//! - [`events`] — Events emitted by state transitions
//! - [`ledger`] — Internal share ledger
//! - [`source`] — The yield source itself

pub mod config;
pub mod events;
pub mod ledger;
pub mod source;

pub use config::YieldSourceConfig;
pub use events::YieldSourceEvent;
pub use source::YieldSource;

use ethereum_types::{Address, U256};

/// Error types for yield source operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The vault reports an API version the yield source refuses.
    #[error("vault not compatible: api version {0}")]
    IncompatibleVault(String),

    /// The vault's underlying token is not the deposit token.
    #[error("incorrect vault: vault token {vault_token:?}, deposit token {deposit_token:?}")]
    IncorrectVault {
        /// The vault's underlying token.
        vault_token: Address,
        /// The configured deposit token.
        deposit_token: Address,
    },

    /// Caller is not the owner.
    #[error("caller is not the owner")]
    NotOwner,

    /// Max losses above 100%.
    #[error("losses set too high: {0} bps")]
    LossesTooHigh(u16),

    /// Amount is zero.
    #[error("amount is zero")]
    ZeroAmount,

    /// The zero address was given where an account is required.
    #[error("zero address not allowed as {0}")]
    ZeroAddress(&'static str),

    /// A holder tried to burn more shares than it holds.
    #[error("burn amount exceeds balance: requested {requested}, balance {balance}")]
    BurnExceedsBalance {
        /// Shares to burn.
        requested: U256,
        /// Shares held.
        balance: U256,
    },

    /// A holder tried to transfer more shares than it holds.
    #[error("transfer amount exceeds balance: requested {requested}, balance {balance}")]
    TransferExceedsBalance {
        /// Shares to transfer.
        requested: U256,
        /// Shares held.
        balance: U256,
    },

    /// Invalid configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Vault or token call failed.
    #[error(transparent)]
    Vault(#[from] ysrc_vault::VaultError),

    /// Share accounting failure.
    #[error(transparent)]
    Shares(#[from] ysrc_shares::ShareError),
}

/// Convenience result type for yield source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
