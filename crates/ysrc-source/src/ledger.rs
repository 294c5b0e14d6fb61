//! Internal share ledger.
//!
//! Balances of the yield source's own share token. Shares are minted on
//! supply, burned on redemption, and may move between holders.

use std::collections::HashMap;

use ethereum_types::{Address, U256};
use ysrc_shares::ShareError;

use crate::{Result, SourceError};

/// Share balances and total supply.
#[derive(Debug, Clone, Default)]
pub struct ShareLedger {
    total_supply: U256,
    balances: HashMap<Address, U256>,
}

impl ShareLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total shares outstanding.
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Shares held by `holder`.
    pub fn balance_of(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    /// Credit `holder` with `shares` new shares.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Shares`] if the supply would exceed `U256::MAX`
    pub fn mint(&mut self, holder: Address, shares: U256) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(shares)
            .ok_or(ShareError::Overflow)?;
        *self.balances.entry(holder).or_default() += shares;
        Ok(())
    }

    /// Destroy `shares` of `holder`'s shares.
    ///
    /// # Errors
    ///
    /// - [`SourceError::BurnExceedsBalance`] if `holder` has fewer than `shares`
    pub fn burn(&mut self, holder: Address, shares: U256) -> Result<()> {
        let balance = self.balance_of(holder);
        if balance < shares {
            return Err(SourceError::BurnExceedsBalance {
                requested: shares,
                balance,
            });
        }
        self.balances.insert(holder, balance - shares);
        self.total_supply -= shares;
        Ok(())
    }

    /// Move `shares` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`SourceError::TransferExceedsBalance`] if `from` has fewer than `shares`
    pub fn transfer(&mut self, from: Address, to: Address, shares: U256) -> Result<()> {
        let balance = self.balance_of(from);
        if balance < shares {
            return Err(SourceError::TransferExceedsBalance {
                requested: shares,
                balance,
            });
        }
        self.balances.insert(from, balance - shares);
        *self.balances.entry(to).or_default() += shares;
        Ok(())
    }
}
