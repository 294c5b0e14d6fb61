//! ysrc-sim: runs a yield source scenario against a simulated vault.
//!
//! Reads the scenario from the TOML file named by `YSRC_SIM_CONFIG`
//! (defaults otherwise) and prints a JSON report to stdout.

mod config;
mod scenario;

use tracing::info;

use crate::config::SimConfig;

fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = SimConfig::load()?;

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("ysrc={}", config.logging.level).parse()?),
        )
        .init();

    info!(
        token = %config.token.symbol,
        api_version = %config.vault.api_version,
        "ysrc-sim starting"
    );

    // 3. Run the scenario
    let report = scenario::run(&config)?;

    // 4. Report
    println!("{}", serde_json::to_string_pretty(&report)?);
    info!("ysrc-sim finished");
    Ok(())
}
