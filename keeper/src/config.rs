//! Keeper configuration

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub vault: VaultConfig,
    pub scenario: ScenarioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Performance fee above the high-water mark (basis points)
    pub performance_fee_bps: u16,

    /// Redemption fee on positional redemptions (basis points)
    pub redemption_fee_bps: u16,

    /// Seconds from start until the redemption window opens
    pub vesting_start_offset: u64,

    /// Length of the redemption window in seconds
    pub vesting_duration: u64,

    /// Slippage tolerance for reserve interactions (basis points)
    pub max_slippage_bps: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    /// Number of ticks to run
    pub ticks: u64,

    /// Seconds per tick
    pub tick_seconds: u64,

    /// Assets deposited at each of the first `deposits_until_tick` ticks
    pub deposit_per_tick: u128,

    /// Tick after which the deposit schedule stops
    pub deposits_until_tick: u64,

    /// Per-tick appreciation of the liquid reserve (basis points)
    pub liquid_yield_bps_per_tick: u16,

    /// Per-tick appreciation of the yield reserve (basis points)
    pub yield_yield_bps_per_tick: u16,

    /// Par redemption attempted by the depositor each tick once the
    /// window is open (0 disables)
    pub redeem_per_tick: u128,
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("KEEPER_CONFIG").unwrap_or_else(|_| "keeper-config.toml".to_string());

        let config_str = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {}", config_path))?;

        let config: Config =
            toml::from_str(&config_str).context("Failed to parse config TOML")?;

        Ok(config)
    }

    /// Built-in scenario used when no config file is present
    pub fn default_scenario() -> Self {
        Self {
            vault: VaultConfig {
                performance_fee_bps: 2_000,
                redemption_fee_bps: 100,
                vesting_start_offset: 86_400,
                vesting_duration: 30 * 86_400,
                max_slippage_bps: 50,
            },
            scenario: ScenarioConfig {
                ticks: 96,
                tick_seconds: 3_600 * 8,
                deposit_per_tick: 10_000,
                deposits_until_tick: 3,
                liquid_yield_bps_per_tick: 2,
                yield_yield_bps_per_tick: 10,
                redeem_per_tick: 500,
            },
        }
    }
}
