//! Reservoir Vault Keeper
//!
//! Off-chain service that drives the vault's permissionless maintenance
//! entrypoints (vest, take_performance_fees) over a configured scenario and
//! verifies the ledger invariants after every tick.

mod config;
mod scenario;

use anyhow::Result;
use config::Config;
use scenario::Runner;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Reservoir Vault Keeper");

    // Load configuration
    let config = Config::load().unwrap_or_else(|_| {
        log::warn!("Failed to load config, using built-in scenario");
        Config::default_scenario()
    });

    log::info!(
        "Scenario: {} ticks of {}s, window opens at +{}s for {}s",
        config.scenario.ticks,
        config.scenario.tick_seconds,
        config.vault.vesting_start_offset,
        config.vault.vesting_duration
    );

    let mut runner = Runner::new(config, 0)?;
    let summary = runner.run()?;

    log::info!("Scenario complete: {:#?}", summary);
    Ok(())
}
