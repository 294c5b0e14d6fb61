//! The yield source.
//!
//! A [`YieldSource`] owns its collaborators: the vault it routes deposits
//! into and the deposit token. Callers identify themselves with an explicit
//! `caller` address on every mutating call.
//!
//! ## Exchange rate
//!
//! ```text
//! total_assets = idle token balance + y_shares_to_token(vault shares held)
//! shares       = token_to_shares(amount, total_supply, total_assets)
//! ```
//!
//! ## Atomicity
//!
//! Every mutating call either completes or leaves the yield source, the
//! vault and the token exactly as they were, including the event log.

use ethereum_types::{Address, U256};
use ysrc_shares::bps::MAX_BPS;
use ysrc_shares::convert;
use ysrc_vault::vault::DEFAULT_MAX_LOSS_BPS;
use ysrc_vault::version::is_compatible_api_version;
use ysrc_vault::{DepositToken, YieldVault};

use crate::config::YieldSourceConfig;
use crate::events::{EventLog, YieldSourceEvent};
use crate::ledger::ShareLedger;
use crate::{Result, SourceError};

/// Yield source over a vault `V` holding deposit token `T`.
#[derive(Debug, Clone)]
pub struct YieldSource<V, T> {
    address: Address,
    owner: Address,
    config: YieldSourceConfig,
    max_losses: u16,
    vault: V,
    token: T,
    shares: ShareLedger,
    events: EventLog,
}

impl<V: YieldVault, T: DepositToken> YieldSource<V, T> {
    /// Bind a new yield source at `address` to `vault` and `token`.
    ///
    /// The deployer becomes the owner, and the vault is approved to pull
    /// any amount of the yield source's tokens.
    ///
    /// # Errors
    ///
    /// - [`SourceError::IncompatibleVault`] if the vault API version is refused
    /// - [`SourceError::IncorrectVault`] if the vault's token is not `token`
    /// - [`SourceError::LossesTooHigh`] or [`SourceError::InvalidConfig`] on a bad config
    pub fn initialize(
        address: Address,
        config: YieldSourceConfig,
        vault: V,
        mut token: T,
        deployer: Address,
    ) -> Result<Self> {
        config.validate()?;

        if !is_compatible_api_version(vault.api_version()) {
            tracing::warn!(api_version = vault.api_version(), "yield source: vault not compatible");
            return Err(SourceError::IncompatibleVault(vault.api_version().to_string()));
        }
        if vault.token() != token.address() {
            return Err(SourceError::IncorrectVault {
                vault_token: vault.token(),
                deposit_token: token.address(),
            });
        }

        token.approve(address, vault.address(), U256::MAX)?;

        let mut events = EventLog::default();
        events.emit(YieldSourceEvent::OwnershipTransferred {
            previous_owner: Address::zero(),
            new_owner: deployer,
        });
        events.emit(YieldSourceEvent::Initialized {
            vault: vault.address(),
            token: token.address(),
        });
        let max_losses = config.max_losses_bps;
        if max_losses != 0 {
            events.emit(YieldSourceEvent::MaxLossesChanged { max_losses });
        }

        tracing::info!(
            yield_source = ?address,
            vault = ?vault.address(),
            token = ?token.address(),
            api_version = vault.api_version(),
            "yield source initialized"
        );

        Ok(Self {
            address,
            owner: deployer,
            config,
            max_losses,
            vault,
            token,
            shares: ShareLedger::new(),
            events,
        })
    }

    /// Address of the yield source.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current owner. The zero address once ownership is renounced.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Name of the share token.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Symbol of the share token.
    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    /// Shares use the deposit token's decimals.
    pub fn decimals(&self) -> u8 {
        self.token.decimals()
    }

    /// Address of the token accepted for deposits.
    pub fn deposit_token(&self) -> Address {
        self.token.address()
    }

    /// Max loss tolerated on vault withdrawals, in basis points.
    pub fn max_losses(&self) -> u16 {
        self.max_losses
    }

    /// The wrapped vault.
    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Mutable access to the wrapped vault, for driving vault-side state
    /// such as deposit limits or shutdown.
    pub fn vault_mut(&mut self) -> &mut V {
        &mut self.vault
    }

    /// The deposit token.
    pub fn token(&self) -> &T {
        &self.token
    }

    /// Mutable access to the deposit token, for funding accounts and
    /// approvals made by other parties.
    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    /// Shares held by `holder`.
    pub fn balance_of(&self, holder: Address) -> U256 {
        self.shares.balance_of(holder)
    }

    /// Total shares outstanding.
    pub fn total_supply(&self) -> U256 {
        self.shares.total_supply()
    }

    /// Vault shares held by the yield source.
    pub fn balance_of_y_shares(&self) -> U256 {
        self.vault.balance_of(self.address)
    }

    /// Vault price per share, scaled by `10^vault.decimals()`.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Vault`] if the vault cannot price its shares
    pub fn price_per_y_share(&self) -> Result<U256> {
        Ok(self.vault.price_per_share(&self.token)?)
    }

    /// Convert a token amount into vault shares at the current price.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Shares`] if the vault price is zero
    pub fn token_to_y_shares(&self, amount: U256) -> Result<U256> {
        let price = self.price_per_y_share()?;
        Ok(convert::token_to_y_shares(amount, price, self.vault.decimals())?)
    }

    /// Convert vault shares into a token amount at the current price.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Shares`] on overflow
    pub fn y_shares_to_token(&self, y_shares: U256) -> Result<U256> {
        let price = self.price_per_y_share()?;
        Ok(convert::y_shares_to_token(y_shares, price, self.vault.decimals())?)
    }

    /// Tokens held idle plus the token value of the vault shares held.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Shares`] on overflow
    pub fn total_assets_in_token(&self) -> Result<U256> {
        let idle = self.token.balance_of(self.address);
        let invested = self.y_shares_to_token(self.balance_of_y_shares())?;
        Ok(idle
            .checked_add(invested)
            .ok_or(ysrc_shares::ShareError::Overflow)?)
    }

    /// Convert a token amount into shares at the current exchange rate.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Shares`] wrapping `DivisionByZero` if shares exist but the pool is drained
    pub fn token_to_shares(&self, amount: U256) -> Result<U256> {
        let total_supply = self.total_supply();
        if total_supply.is_zero() {
            return Ok(amount);
        }
        let total_assets = self.total_assets_in_token()?;
        Ok(convert::token_to_shares(amount, total_supply, total_assets)?)
    }

    /// Convert shares into a token amount at the current exchange rate.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Shares`] on overflow
    pub fn shares_to_token(&self, shares: U256) -> Result<U256> {
        let total_supply = self.total_supply();
        if total_supply.is_zero() {
            return Ok(shares);
        }
        let total_assets = self.total_assets_in_token()?;
        Ok(convert::shares_to_token(shares, total_supply, total_assets)?)
    }

    /// Token value of `holder`'s shares.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Shares`] on overflow
    pub fn balance_of_token(&self, holder: Address) -> Result<U256> {
        self.shares_to_token(self.balance_of(holder))
    }

    /// Events emitted since the last [`take_events`](Self::take_events).
    pub fn events(&self) -> &[YieldSourceEvent] {
        self.events.events()
    }

    /// Remove and return buffered events.
    pub fn take_events(&mut self) -> Vec<YieldSourceEvent> {
        self.events.drain()
    }

    fn only_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner || self.owner.is_zero() {
            return Err(SourceError::NotOwner);
        }
        Ok(())
    }

    /// Move idle tokens into the vault, up to its deposit limit.
    ///
    /// Returns the vault shares minted; zero when nothing could be deposited.
    fn deposit_in_vault(&mut self) -> Result<U256> {
        let vault_address = self.vault.address();
        let idle = self.token.balance_of(self.address);
        if self.token.allowance(self.address, vault_address) < idle {
            self.token.approve(self.address, vault_address, U256::zero())?;
            self.token.approve(self.address, vault_address, U256::MAX)?;
        }

        if idle.min(self.vault.available_deposit_limit(&self.token)).is_zero() {
            tracing::debug!(%idle, "yield source: vault deposit limit reached, tokens left idle");
            return Ok(U256::zero());
        }
        Ok(self.vault.deposit(&mut self.token, self.address)?)
    }

    /// Withdraw `amount` worth of vault shares and return the tokens received.
    fn withdraw_from_vault(&mut self, amount: U256) -> Result<U256> {
        let y_shares = self.token_to_y_shares(amount)?;
        let previous_balance = self.token.balance_of(self.address);
        let max_loss = if self.max_losses == 0 {
            DEFAULT_MAX_LOSS_BPS
        } else {
            self.max_losses
        };
        self.vault
            .withdraw(&mut self.token, self.address, y_shares, max_loss)?;
        let current_balance = self.token.balance_of(self.address);
        Ok(current_balance.saturating_sub(previous_balance))
    }
}

impl<V: YieldVault + Clone, T: DepositToken + Clone> YieldSource<V, T> {
    /// Run `op`, restoring the prior state if it fails.
    fn atomically<R>(&mut self, op: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let snapshot = self.clone();
        let result = op(self);
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "yield source: operation reverted");
            *self = snapshot;
        }
        result
    }

    /// Supply `amount` tokens from `caller` and credit `to` with shares.
    ///
    /// Shares are priced before the tokens arrive. The caller must have
    /// approved the yield source for `amount`. Returns the shares minted.
    ///
    /// # Errors
    ///
    /// - [`SourceError::ZeroAmount`] if `amount` or the resulting shares are zero
    /// - [`SourceError::ZeroAddress`] if `to` is the zero address
    /// - [`SourceError::Vault`] if the token transfer or vault deposit fails
    /// - [`SourceError::Shares`] if shares exist but the pool is drained
    pub fn supply_token_to(&mut self, caller: Address, amount: U256, to: Address) -> Result<U256> {
        if amount.is_zero() {
            return Err(SourceError::ZeroAmount);
        }
        if to.is_zero() {
            return Err(SourceError::ZeroAddress("share recipient"));
        }
        self.atomically(|source| {
            let shares = source.token_to_shares(amount)?;
            if shares.is_zero() {
                return Err(SourceError::ZeroAmount);
            }
            source
                .token
                .transfer_from(source.address, caller, source.address, amount)?;
            source.deposit_in_vault()?;
            source.shares.mint(to, shares)?;

            source.events.emit(YieldSourceEvent::SuppliedTokenTo {
                from: caller,
                shares,
                amount,
                to,
            });
            tracing::info!(from = ?caller, ?to, %amount, %shares, "yield source: supplied");
            Ok(shares)
        })
    }

    /// Burn `caller`'s shares worth `amount` tokens and pay out what the
    /// vault returns. Returns the tokens paid to `caller`.
    ///
    /// The shares burned are rounded up, so a non-zero `amount` always costs
    /// at least one share. The payout never exceeds `amount` and may fall
    /// short of it by vault losses within [`max_losses`](Self::max_losses)
    /// and by truncation. Any surplus the vault returns stays in the pool.
    ///
    /// # Errors
    ///
    /// - [`SourceError::ZeroAmount`] if `amount` is zero
    /// - [`SourceError::BurnExceedsBalance`] if `caller` holds too few shares
    /// - [`SourceError::Vault`] if the vault withdrawal fails or loses too much
    pub fn redeem_token(&mut self, caller: Address, amount: U256) -> Result<U256> {
        if amount.is_zero() {
            return Err(SourceError::ZeroAmount);
        }
        self.atomically(|source| {
            let total_supply = source.total_supply();
            let shares = if total_supply.is_zero() {
                amount
            } else {
                let total_assets = source.total_assets_in_token()?;
                convert::token_to_shares_rounding_up(amount, total_supply, total_assets)?
            };
            source.shares.burn(caller, shares)?;
            let withdrawn = source.withdraw_from_vault(amount)?.min(amount);
            source.token.transfer(source.address, caller, withdrawn)?;

            source.events.emit(YieldSourceEvent::RedeemedToken {
                from: caller,
                shares,
                amount,
            });
            tracing::info!(from = ?caller, %amount, %shares, %withdrawn, "yield source: redeemed");
            Ok(withdrawn)
        })
    }

    /// Add `amount` tokens from `caller` without minting shares.
    ///
    /// # Errors
    ///
    /// - [`SourceError::ZeroAmount`] if `amount` is zero
    /// - [`SourceError::Vault`] if the token transfer or vault deposit fails
    pub fn sponsor(&mut self, caller: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            return Err(SourceError::ZeroAmount);
        }
        self.atomically(|source| {
            source
                .token
                .transfer_from(source.address, caller, source.address, amount)?;
            source.deposit_in_vault()?;

            source
                .events
                .emit(YieldSourceEvent::Sponsored { from: caller, amount });
            tracing::info!(from = ?caller, %amount, "yield source: sponsored");
            Ok(())
        })
    }

    /// Set the max loss tolerated on vault withdrawals.
    ///
    /// # Errors
    ///
    /// - [`SourceError::NotOwner`] if `caller` is not the owner
    /// - [`SourceError::LossesTooHigh`] if `max_losses` exceeds 100%
    pub fn set_max_losses(&mut self, caller: Address, max_losses: u16) -> Result<()> {
        self.only_owner(caller)?;
        if max_losses > MAX_BPS {
            return Err(SourceError::LossesTooHigh(max_losses));
        }
        self.max_losses = max_losses;
        self.events
            .emit(YieldSourceEvent::MaxLossesChanged { max_losses });
        tracing::info!(max_losses, "yield source: max losses changed");
        Ok(())
    }

    /// Hand ownership to `new_owner`.
    ///
    /// # Errors
    ///
    /// - [`SourceError::NotOwner`] if `caller` is not the owner
    /// - [`SourceError::ZeroAddress`] if `new_owner` is the zero address
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        self.only_owner(caller)?;
        if new_owner.is_zero() {
            return Err(SourceError::ZeroAddress("new owner"));
        }
        self.set_owner(new_owner);
        Ok(())
    }

    /// Give up ownership. Owner-only calls fail afterwards.
    ///
    /// # Errors
    ///
    /// - [`SourceError::NotOwner`] if `caller` is not the owner
    pub fn renounce_ownership(&mut self, caller: Address) -> Result<()> {
        self.only_owner(caller)?;
        self.set_owner(Address::zero());
        Ok(())
    }

    fn set_owner(&mut self, new_owner: Address) {
        let previous_owner = self.owner;
        self.owner = new_owner;
        self.events.emit(YieldSourceEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        tracing::info!(?previous_owner, ?new_owner, "yield source: ownership transferred");
    }

    /// Move `shares` of `caller`'s shares to `to`.
    ///
    /// # Errors
    ///
    /// - [`SourceError::ZeroAddress`] if `to` is the zero address
    /// - [`SourceError::TransferExceedsBalance`] if `caller` holds too few shares
    pub fn transfer(&mut self, caller: Address, to: Address, shares: U256) -> Result<()> {
        if to.is_zero() {
            return Err(SourceError::ZeroAddress("share recipient"));
        }
        self.shares.transfer(caller, to, shares)
    }
}
