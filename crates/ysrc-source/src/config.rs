//! Yield source configuration.

use serde::{Deserialize, Serialize};
use ysrc_shares::bps::MAX_BPS;

use crate::{Result, SourceError};

/// Configuration applied when a yield source is initialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldSourceConfig {
    /// Name of the internal share token.
    #[serde(default = "default_name")]
    pub name: String,
    /// Symbol of the internal share token.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Max loss tolerated on vault withdrawals, in basis points.
    /// 0 = use the vault's default.
    #[serde(default)]
    pub max_losses_bps: u16,
}

fn default_name() -> String {
    "Yearn V2 Yield Source".to_string()
}

fn default_symbol() -> String {
    "yvYS".to_string()
}

impl Default for YieldSourceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            max_losses_bps: 0,
        }
    }
}

impl YieldSourceConfig {
    /// Parse a configuration from TOML and validate it.
    ///
    /// # Errors
    ///
    /// - [`SourceError::InvalidConfig`] if the TOML does not parse
    /// - [`SourceError::LossesTooHigh`] if `max_losses_bps` exceeds 100%
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SourceError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check field ranges.
    ///
    /// # Errors
    ///
    /// - [`SourceError::LossesTooHigh`] if `max_losses_bps` exceeds 100%
    /// - [`SourceError::InvalidConfig`] if the symbol is empty
    pub fn validate(&self) -> Result<()> {
        if self.max_losses_bps > MAX_BPS {
            return Err(SourceError::LossesTooHigh(self.max_losses_bps));
        }
        if self.symbol.trim().is_empty() {
            return Err(SourceError::InvalidConfig("symbol is empty".to_string()));
        }
        Ok(())
    }
}
