//! Deposit token trait and in-memory ledger.
//!
//! [`DepositToken`] mirrors the ERC-20 calls the yield source and the vault
//! make. Callers pass the acting account explicitly; there is no implicit
//! message sender.
//!
//! An allowance of `U256::MAX` is infinite and is never decremented.

use std::collections::HashMap;

use ethereum_types::{Address, U256};

use crate::{Result, VaultError};

/// ERC-20 subset used by the yield source and the vault.
pub trait DepositToken {
    /// Address of the token.
    fn address(&self) -> Address;

    /// Number of decimals of the smallest unit.
    fn decimals(&self) -> u8;

    /// Token balance held by `owner`.
    fn balance_of(&self, owner: Address) -> U256;

    /// Amount `spender` may still move on behalf of `owner`.
    fn allowance(&self, owner: Address, spender: Address) -> U256;

    /// Set the allowance of `spender` over `owner`'s tokens.
    fn approve(&mut self, owner: Address, spender: Address, amount: U256) -> Result<()>;

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InsufficientBalance`] if `from` holds less than `amount`
    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<()>;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InsufficientAllowance`] if the allowance is below `amount`
    /// - [`VaultError::InsufficientBalance`] if `from` holds less than `amount`
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()>;
}

/// In-memory ERC-20 ledger.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    address: Address,
    symbol: String,
    decimals: u8,
    total_supply: U256,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

impl TokenLedger {
    /// Create an empty ledger.
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
            total_supply: U256::zero(),
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// Token symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Total tokens in existence.
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Create `amount` new tokens for `to`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Shares`] wrapping an overflow if the supply would exceed `U256::MAX`
    pub fn mint(&mut self, to: Address, amount: U256) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(ysrc_shares::ShareError::Overflow)?;
        *self.balances.entry(to).or_default() += amount;
        tracing::debug!(symbol = %self.symbol, ?to, %amount, "token: minted");
        Ok(())
    }
}

impl DepositToken for TokenLedger {
    fn address(&self) -> Address {
        self.address
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: U256) -> Result<()> {
        self.allowances.insert((owner, spender), amount);
        tracing::trace!(?owner, ?spender, %amount, "token: approval");
        Ok(())
    }

    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(VaultError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        self.balances.insert(from, available - amount);
        *self.balances.entry(to).or_default() += amount;
        tracing::trace!(?from, ?to, %amount, "token: transfer");
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        let approved = self.allowance(from, spender);
        if approved < amount {
            return Err(VaultError::InsufficientAllowance {
                requested: amount,
                approved,
            });
        }
        self.transfer(from, to, amount)?;
        if approved != U256::MAX {
            self.allowances.insert((from, spender), approved - amount);
        }
        Ok(())
    }
}
