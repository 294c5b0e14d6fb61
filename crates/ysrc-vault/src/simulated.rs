//! In-memory yVault V2.
//!
//! Vault shares are issued and redeemed with the same bootstrap/proportional
//! rules the yield source uses for its own shares, against
//! `total_assets = token.balance_of(vault)`. Yield accrues whenever tokens
//! land on the vault address without shares being minted.
//!
//! Strategy losses are modelled by [`SimulatedVault::set_withdrawal_loss_bps`]:
//! that fraction of every withdrawal is sent to the zero address instead of
//! the owner.

use std::collections::HashMap;

use ethereum_types::{Address, U256};
use serde::{Deserialize, Serialize};
use ysrc_shares::bps::{bps_of, validate_bps};
use ysrc_shares::convert::{scale, shares_to_token, token_to_shares};
use ysrc_shares::ShareError;

use crate::token::DepositToken;
use crate::vault::YieldVault;
use crate::{Result, VaultError};

/// API version reported when none is configured.
pub const DEFAULT_API_VERSION: &str = "0.3.0";

/// Tunables of a [`SimulatedVault`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultParams {
    /// Reported API version.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Deposit limit in whole tokens. `None` = unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_limit: Option<u64>,
    /// Fraction of each withdrawal lost to strategies, in basis points.
    #[serde(default)]
    pub withdrawal_loss_bps: u16,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl Default for VaultParams {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            deposit_limit: None,
            withdrawal_loss_bps: 0,
        }
    }
}

/// In-memory yVault V2 over a [`DepositToken`].
#[derive(Debug, Clone)]
pub struct SimulatedVault {
    address: Address,
    token: Address,
    api_version: String,
    decimals: u8,
    total_supply: U256,
    balances: HashMap<Address, U256>,
    deposit_limit: U256,
    withdrawal_loss_bps: u16,
    emergency_shutdown: bool,
}

impl SimulatedVault {
    /// Create a vault for `token` with default parameters.
    pub fn new<T: DepositToken>(address: Address, token: &T) -> Self {
        Self {
            address,
            token: token.address(),
            api_version: default_api_version(),
            decimals: token.decimals(),
            total_supply: U256::zero(),
            balances: HashMap::new(),
            deposit_limit: U256::MAX,
            withdrawal_loss_bps: 0,
            emergency_shutdown: false,
        }
    }

    /// Create a vault for `token` from [`VaultParams`].
    ///
    /// # Errors
    ///
    /// - [`VaultError::Shares`] if `withdrawal_loss_bps` exceeds 100% or the
    ///   deposit limit overflows once scaled to token units
    pub fn with_params<T: DepositToken>(
        address: Address,
        token: &T,
        params: &VaultParams,
    ) -> Result<Self> {
        let mut vault = Self::new(address, token);
        vault.api_version = params.api_version.clone();
        if let Some(limit) = params.deposit_limit {
            vault.deposit_limit = U256::from(limit)
                .checked_mul(scale(vault.decimals)?)
                .ok_or(ShareError::Overflow)?;
        }
        vault.set_withdrawal_loss_bps(params.withdrawal_loss_bps)?;
        Ok(vault)
    }

    /// Override the reported API version.
    pub fn set_api_version(&mut self, api_version: impl Into<String>) {
        self.api_version = api_version.into();
    }

    /// Set the total-assets ceiling above which deposits are capped.
    pub fn set_deposit_limit(&mut self, limit: U256) {
        self.deposit_limit = limit;
    }

    /// Set the fraction of each withdrawal lost to strategies.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Shares`] if `bps` exceeds 100%
    pub fn set_withdrawal_loss_bps(&mut self, bps: u16) -> Result<()> {
        self.withdrawal_loss_bps = validate_bps(bps)?;
        Ok(())
    }

    /// Enter or leave emergency shutdown. Deposits fail while active.
    pub fn set_emergency_shutdown(&mut self, active: bool) {
        if active {
            tracing::warn!(vault = ?self.address, "vault: emergency shutdown");
        }
        self.emergency_shutdown = active;
    }

    /// Return whether the vault is in emergency shutdown.
    pub fn emergency_shutdown(&self) -> bool {
        self.emergency_shutdown
    }

    fn check_token<T: DepositToken>(&self, token: &T) -> Result<()> {
        if token.address() != self.token {
            return Err(VaultError::WrongToken {
                expected: self.token,
                actual: token.address(),
            });
        }
        Ok(())
    }
}

impl YieldVault for SimulatedVault {
    fn address(&self) -> Address {
        self.address
    }

    fn token(&self) -> Address {
        self.token
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn total_supply(&self) -> U256 {
        self.total_supply
    }

    fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    fn total_assets<T: DepositToken>(&self, token: &T) -> U256 {
        token.balance_of(self.address)
    }

    fn price_per_share<T: DepositToken>(&self, token: &T) -> Result<U256> {
        let one_share = scale(self.decimals)?;
        Ok(shares_to_token(
            one_share,
            self.total_supply,
            self.total_assets(token),
        )?)
    }

    fn available_deposit_limit<T: DepositToken>(&self, token: &T) -> U256 {
        self.deposit_limit.saturating_sub(self.total_assets(token))
    }

    fn deposit<T: DepositToken>(&mut self, token: &mut T, depositor: Address) -> Result<U256> {
        self.check_token(token)?;
        if self.emergency_shutdown {
            return Err(VaultError::Shutdown);
        }

        let amount = token
            .balance_of(depositor)
            .min(self.available_deposit_limit(token));
        if amount.is_zero() {
            return Err(VaultError::ZeroDeposit);
        }

        let shares = token_to_shares(amount, self.total_supply, self.total_assets(token))?;
        if shares.is_zero() {
            return Err(VaultError::ZeroShares);
        }

        let total_supply = self
            .total_supply
            .checked_add(shares)
            .ok_or(ShareError::Overflow)?;
        token.transfer_from(self.address, depositor, self.address, amount)?;
        self.total_supply = total_supply;
        *self.balances.entry(depositor).or_default() += shares;

        tracing::debug!(?depositor, %amount, %shares, "vault: deposit");
        Ok(shares)
    }

    fn withdraw<T: DepositToken>(
        &mut self,
        token: &mut T,
        owner: Address,
        max_shares: U256,
        max_loss_bps: u16,
    ) -> Result<U256> {
        self.check_token(token)?;
        validate_bps(max_loss_bps)?;

        let available = self.balance_of(owner);
        if max_shares > available {
            return Err(VaultError::InsufficientShares {
                requested: max_shares,
                available,
            });
        }
        if max_shares.is_zero() {
            return Err(VaultError::ZeroShares);
        }

        let value = shares_to_token(max_shares, self.total_supply, self.total_assets(token))?;
        let loss = bps_of(value, self.withdrawal_loss_bps)?;
        if loss > bps_of(value, max_loss_bps)? {
            return Err(VaultError::LossExceeded { loss, max_loss_bps });
        }

        let returned = value - loss;
        token.transfer(self.address, owner, returned)?;
        if !loss.is_zero() {
            token.transfer(self.address, Address::zero(), loss)?;
        }
        self.total_supply -= max_shares;
        self.balances.insert(owner, available - max_shares);

        tracing::debug!(?owner, shares = %max_shares, %returned, %loss, "vault: withdraw");
        Ok(returned)
    }
}
