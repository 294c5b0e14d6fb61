//! Scenario configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use ysrc_source::YieldSourceConfig;
use ysrc_vault::simulated::VaultParams;

/// Environment variable naming the scenario config file.
pub const CONFIG_ENV: &str = "YSRC_SIM_CONFIG";

/// Complete scenario configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// Deposit token settings.
    #[serde(default)]
    pub token: TokenConfig,
    /// Simulated vault settings.
    #[serde(default)]
    pub vault: VaultParams,
    /// Yield source settings.
    #[serde(default)]
    pub source: YieldSourceConfig,
    /// Amounts moved by the scenario.
    #[serde(default)]
    pub scenario: ScenarioConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Deposit token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Ticker used in log output.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Decimals of the smallest unit.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

/// Scenario amounts, in whole token units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Supplied by the depositor.
    #[serde(default = "default_deposit")]
    pub deposit: u64,
    /// Transferred straight into the vault to simulate yield.
    #[serde(default = "default_profit")]
    pub profit: u64,
    /// Added by a sponsor without minting shares. 0 = skip.
    #[serde(default)]
    pub sponsor: u64,
    /// Redeemed by the depositor at the end.
    #[serde(default = "default_withdraw")]
    pub withdraw: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_symbol() -> String {
    "USDC".to_string()
}

fn default_decimals() -> u8 {
    6
}

fn default_deposit() -> u64 {
    1_000
}

fn default_profit() -> u64 {
    10_000
}

fn default_withdraw() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimals: default_decimals(),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            deposit: default_deposit(),
            profit: default_profit(),
            sponsor: 0,
            withdraw: default_withdraw(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SimConfig {
    /// Load configuration from the file named by [`CONFIG_ENV`].
    ///
    /// Falls back to defaults if the variable is unset or the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)?;
                Self::from_toml_str(&content)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.source.validate()?;
        if config.scenario.withdraw > config.scenario.deposit {
            anyhow::bail!(
                "withdraw ({}) exceeds deposit ({})",
                config.scenario.withdraw,
                config.scenario.deposit
            );
        }
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        std::env::var(CONFIG_ENV).ok().map(PathBuf::from)
    }
}
