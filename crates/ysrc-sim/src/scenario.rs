//! End-to-end yield source scenario.
//!
//! 1. Fund a depositor (and a sponsor) on a fresh token ledger
//! 2. Initialize a yield source over a simulated vault
//! 3. Supply the deposit
//! 4. Transfer profit straight into the vault to simulate yield
//! 5. Sponsor, if configured
//! 6. Redeem part of the deposit
//!
//! Every amount in the report is rendered in whole tokens.

use anyhow::Context;
use ethereum_types::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::info;
use ysrc_shares::convert::scale;
use ysrc_source::{YieldSource, YieldSourceEvent};
use ysrc_vault::{DepositToken, SimulatedVault, TokenLedger, YieldVault};

use crate::config::SimConfig;

const OWNER: u64 = 0x0a;
const DEPOSITOR: u64 = 0x0b;
const SPONSOR: u64 = 0x0c;
const WHALE: u64 = 0x0d;
const TOKEN: u64 = 0xa0;
const VAULT: u64 = 0xb0;
const SOURCE: u64 = 0xc0;

/// Outcome of a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Token symbol.
    pub symbol: String,
    /// Tokens supplied by the depositor.
    pub deposited: String,
    /// Shares minted for the deposit.
    pub shares_minted: String,
    /// Vault price per share right after the deposit.
    pub price_per_share_before: String,
    /// Vault price per share after profit and sponsorship.
    pub price_per_share_after: String,
    /// Tokens added by the sponsor.
    pub sponsored: String,
    /// Token value of the yield source beyond what was put in.
    pub accrued_yield: String,
    /// Tokens returned to the depositor on redemption.
    pub withdrawn: String,
    /// Depositor's remaining balance in tokens.
    pub remaining_balance: String,
    /// Shares outstanding at the end.
    pub total_supply: String,
    /// Events emitted, oldest first.
    pub events: Vec<YieldSourceEvent>,
}

/// Render `amount` in whole tokens of `decimals` decimals.
///
/// Trailing fractional zeros are dropped, keeping at least one digit.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let Ok(unit) = scale(decimals) else {
        return amount.to_string();
    };
    let whole = amount / unit;
    let frac = amount % unit;
    if decimals == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = usize::from(decimals));
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{frac}")
    }
}

fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

/// Run the scenario described by `config`.
pub fn run(config: &SimConfig) -> anyhow::Result<ScenarioReport> {
    let decimals = config.token.decimals;
    let symbol = config.token.symbol.as_str();
    let unit = scale(decimals)?;
    let to_units = |whole: u64| -> anyhow::Result<U256> {
        U256::from(whole)
            .checked_mul(unit)
            .context("amount overflows token units")
    };
    let deposit = to_units(config.scenario.deposit)?;
    let profit = to_units(config.scenario.profit)?;
    let sponsorship = to_units(config.scenario.sponsor)?;
    let withdrawal = to_units(config.scenario.withdraw)?;
    let fmt = |amount: U256| format_units(amount, decimals);

    let mut token = TokenLedger::new(addr(TOKEN), symbol, decimals);
    token.mint(addr(DEPOSITOR), deposit)?;
    token.mint(addr(SPONSOR), sponsorship)?;
    token.mint(addr(WHALE), profit)?;
    for holder in [DEPOSITOR, SPONSOR] {
        token.approve(addr(holder), addr(SOURCE), U256::MAX)?;
    }

    info!("Deploying simulated vault...");
    let vault = SimulatedVault::with_params(addr(VAULT), &token, &config.vault)?;

    info!("Initializing yield source...");
    let mut source = YieldSource::initialize(
        addr(SOURCE),
        config.source.clone(),
        vault,
        token,
        addr(OWNER),
    )
    .context("yield source initialization failed")?;

    info!("Depositing {} {symbol}...", fmt(deposit));
    let shares_minted = source
        .supply_token_to(addr(DEPOSITOR), deposit, addr(DEPOSITOR))
        .context("deposit failed")?;
    let price_per_share_before = source.price_per_y_share()?;

    info!("Vault generated {} {symbol}", fmt(profit));
    if !profit.is_zero() {
        let vault_address = source.vault().address();
        source
            .token_mut()
            .transfer(addr(WHALE), vault_address, profit)?;
    }

    if !sponsorship.is_zero() {
        info!("Sponsoring {} {symbol}...", fmt(sponsorship));
        source
            .sponsor(addr(SPONSOR), sponsorship)
            .context("sponsorship failed")?;
    }
    let price_per_share_after = source.price_per_y_share()?;

    let principal = deposit + sponsorship;
    let accrued_yield = source
        .total_assets_in_token()?
        .saturating_sub(principal);
    info!("Accrued yield is {} {symbol}", fmt(accrued_yield));

    info!("Withdrawing {} {symbol}...", fmt(withdrawal));
    let withdrawn = if withdrawal.is_zero() {
        U256::zero()
    } else {
        source
            .redeem_token(addr(DEPOSITOR), withdrawal)
            .context("withdrawal failed")?
    };
    info!("Withdrawn {} {symbol}", fmt(withdrawn));

    let remaining_balance = source.balance_of_token(addr(DEPOSITOR))?;

    Ok(ScenarioReport {
        symbol: symbol.to_string(),
        deposited: fmt(deposit),
        shares_minted: fmt(shares_minted),
        price_per_share_before: fmt(price_per_share_before),
        price_per_share_after: fmt(price_per_share_after),
        sponsored: fmt(sponsorship),
        accrued_yield: fmt(accrued_yield),
        withdrawn: fmt(withdrawn),
        remaining_balance: fmt(remaining_balance),
        total_supply: fmt(source.total_supply()),
        events: source.take_events(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(1_000_000_000u64), 6), "1000.0");
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(1u64), 6), "0.000001");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_default_scenario() {
        let report = run(&SimConfig::default()).expect("scenario");
        assert_eq!(report.symbol, "USDC");
        assert_eq!(report.deposited, "1000.0");
        assert_eq!(report.shares_minted, "1000.0");
        assert_eq!(report.price_per_share_before, "1.0");
        // 11,000 USDC in the vault against 1,000 vault shares
        assert_eq!(report.price_per_share_after, "11.0");
        assert_eq!(report.accrued_yield, "10000.0");
        // 100 USDC buys floor(100 / 11) vault shares, worth 99.999999
        assert_eq!(report.withdrawn, "99.999999");
        assert_eq!(report.remaining_balance, "10900.000001");
        assert_eq!(report.events.len(), 4);
    }

    #[test]
    fn test_scenario_with_sponsor() {
        let config = SimConfig {
            scenario: ScenarioConfig {
                deposit: 100,
                profit: 0,
                sponsor: 100,
                withdraw: 0,
            },
            ..SimConfig::default()
        };
        let report = run(&config).expect("scenario");
        assert_eq!(report.sponsored, "100.0");
        assert_eq!(report.accrued_yield, "0.0");
        assert_eq!(report.remaining_balance, "200.0");
        assert_eq!(report.total_supply, "100.0");
    }

    #[test]
    fn test_scenario_incompatible_vault() {
        let mut config = SimConfig::default();
        config.vault.api_version = "0.3.3".to_string();
        assert!(run(&config).is_err());
    }
}
