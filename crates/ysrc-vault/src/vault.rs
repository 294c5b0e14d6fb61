//! Yield vault trait.
//!
//! The calls a yield source makes into a yVault V2. The vault reads its
//! assets from the deposit token, so token-dependent calls take the token
//! as an argument rather than holding a handle to it.

use ethereum_types::{Address, U256};

use crate::token::DepositToken;
use crate::Result;

/// Max loss applied by the plain `withdraw(shares)` entry point (0.01%).
pub const DEFAULT_MAX_LOSS_BPS: u16 = 1;

/// yVault V2 subset used by the yield source.
pub trait YieldVault {
    /// Address of the vault.
    fn address(&self) -> Address;

    /// Address of the underlying token.
    fn token(&self) -> Address;

    /// Reported API version, e.g. `"0.3.0"`.
    fn api_version(&self) -> &str;

    /// Decimals of the vault share.
    ///
    /// Also the scale of [`price_per_share`](YieldVault::price_per_share).
    fn decimals(&self) -> u8;

    /// Total vault shares outstanding.
    fn total_supply(&self) -> U256;

    /// Vault shares held by `owner`.
    fn balance_of(&self, owner: Address) -> U256;

    /// Underlying tokens managed by the vault.
    fn total_assets<T: DepositToken>(&self, token: &T) -> U256;

    /// Token value of one whole vault share, scaled by `10^decimals`.
    fn price_per_share<T: DepositToken>(&self, token: &T) -> Result<U256>;

    /// Tokens the vault still accepts before hitting its deposit limit.
    fn available_deposit_limit<T: DepositToken>(&self, token: &T) -> U256;

    /// Deposit the depositor's whole token balance, capped by the deposit
    /// limit, and return the vault shares minted.
    ///
    /// The depositor must have approved the vault beforehand.
    fn deposit<T: DepositToken>(&mut self, token: &mut T, depositor: Address) -> Result<U256>;

    /// Burn up to `max_shares` of `owner`'s vault shares and send the
    /// underlying to `owner`. Returns the tokens actually sent.
    ///
    /// Fails if the realized loss exceeds `max_loss_bps` of the share value.
    fn withdraw<T: DepositToken>(
        &mut self,
        token: &mut T,
        owner: Address,
        max_shares: U256,
        max_loss_bps: u16,
    ) -> Result<U256>;
}
