//! # ysrc-vault
//!
//! External collaborators of the yield source.
//!
//! The yield source never holds the business logic of the deposit token or
//! of the yield-bearing vault. It talks to them through two seams:
//!
//! - [`DepositToken`]: the ERC-20 subset the yield source needs
//! - [`YieldVault`]: the yVault V2 subset the yield source needs
//!
//! In-memory implementations ([`TokenLedger`], [`SimulatedVault`]) back the
//! scenario runner and the test suites.
//!
//! ## Modules
//!
//! - [`token`] — Deposit token trait and in-memory ledger
//! - [`vault`] — Yield vault trait
//! - [`simulated`] — In-memory yVault V2
//! - [`version`] — Vault API version compatibility

pub mod simulated;
pub mod token;
pub mod vault;
pub mod version;

pub use ethereum_types::{Address, U256};
pub use simulated::SimulatedVault;
pub use token::{DepositToken, TokenLedger};
pub use vault::YieldVault;

/// Error types for token and vault operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VaultError {
    /// Account balance is below the requested amount.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Amount requested.
        requested: U256,
        /// Amount held.
        available: U256,
    },

    /// Spender allowance is below the requested amount.
    #[error("insufficient allowance: requested {requested}, approved {approved}")]
    InsufficientAllowance {
        /// Amount requested.
        requested: U256,
        /// Amount approved.
        approved: U256,
    },

    /// Vault share balance is below the requested shares.
    #[error("insufficient vault shares: requested {requested}, available {available}")]
    InsufficientShares {
        /// Shares requested.
        requested: U256,
        /// Shares held.
        available: U256,
    },

    /// Nothing to deposit once the deposit limit is applied.
    #[error("nothing to deposit")]
    ZeroDeposit,

    /// Deposit or withdrawal would mint or burn zero shares.
    #[error("zero shares")]
    ZeroShares,

    /// The vault is in emergency shutdown and rejects deposits.
    #[error("vault is in emergency shutdown")]
    Shutdown,

    /// Realized withdrawal loss exceeds the caller's tolerance.
    #[error("withdrawal loss {loss} exceeds max loss of {max_loss_bps} bps")]
    LossExceeded {
        /// Tokens lost.
        loss: U256,
        /// Tolerated loss in basis points.
        max_loss_bps: u16,
    },

    /// The token passed in is not the vault's underlying token.
    #[error("wrong token: expected {expected:?}, got {actual:?}")]
    WrongToken {
        /// The vault's underlying token.
        expected: Address,
        /// The token passed in.
        actual: Address,
    },

    /// Share accounting failure.
    #[error(transparent)]
    Shares(#[from] ysrc_shares::ShareError),
}

/// Convenience result type for token and vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
