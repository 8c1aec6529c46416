//! Scenario runner: drives a vault through a deposit/yield schedule while
//! performing the maintenance calls a keeper is responsible for

use anyhow::{bail, Result};
use reservoir_engine::testkit::{MockAsset, MockReserve, MockShares};
use reservoir_engine::{AssetToken, Pubkey, RedemptionMode, ShareLedger, Vault, VaultParams};

use crate::config::Config;

const VAULT_ID: Pubkey = [10u8; 32];
const OWNER: Pubkey = [11u8; 32];
const TREASURY: Pubkey = [12u8; 32];
const DEPOSITOR: Pubkey = [1u8; 32];

type ScenarioVault = Vault<MockReserve, MockReserve, MockShares, MockAsset>;

#[derive(Debug)]
pub struct Summary {
    pub ticks_run: u64,
    pub deposited: u128,
    pub redeemed: u128,
    pub fees_paid: u128,
    /// Redemption fees accumulated by the treasury in asset units
    pub treasury_asset_fees: u128,
    pub swept_to_yield: u128,
    pub final_liquid_value: u128,
    pub final_yield_value: u128,
    pub final_liability: u128,
    pub final_high_water_mark: u128,
    pub final_mode: RedemptionMode,
}

pub struct Runner {
    config: Config,
    vault: ScenarioVault,
    asset: MockAsset,
    liquid: MockReserve,
    yield_reserve: MockReserve,
    shares: MockShares,
    now: u64,
    vesting_end: u64,
    last_hwm: u128,
}

impl Runner {
    pub fn new(config: Config, start: u64) -> Result<Self> {
        let asset = MockAsset::new(20);
        let total_deposits =
            config.scenario.deposit_per_tick * config.scenario.deposits_until_tick as u128;
        asset.mint_to(&DEPOSITOR, total_deposits.max(1));

        let liquid = MockReserve::new(21, VAULT_ID, asset.book());
        let yield_reserve = MockReserve::new(22, VAULT_ID, asset.book());
        let shares = MockShares::new();

        let params = VaultParams {
            treasury: TREASURY,
            performance_fee_bps: config.vault.performance_fee_bps,
            redemption_fee_bps: config.vault.redemption_fee_bps,
            vesting_start: start + config.vault.vesting_start_offset,
            vesting_end: start + config.vault.vesting_start_offset + config.vault.vesting_duration,
        };
        let vesting_end = params.vesting_end;

        let vault = Vault::new(
            VAULT_ID,
            OWNER,
            params,
            config.vault.max_slippage_bps,
            liquid.clone(),
            yield_reserve.clone(),
            shares.clone(),
            asset.clone(),
            start,
        )?;

        Ok(Self {
            config,
            vault,
            asset,
            liquid,
            yield_reserve,
            shares,
            now: start,
            vesting_end,
            last_hwm: 0,
        })
    }

    pub fn run(&mut self) -> Result<Summary> {
        let scenario = self.config.scenario.clone();
        let mut deposited = 0u128;
        let mut redeemed = 0u128;
        let mut fees_paid = 0u128;
        let mut swept = 0u128;

        for tick in 0..scenario.ticks {
            self.now += scenario.tick_seconds;
            self.accrue_yield();

            // Scheduled inflows
            if scenario.deposit_per_tick > 0 && tick < scenario.deposits_until_tick {
                let receipt =
                    self.vault
                        .deposit(&DEPOSITOR, scenario.deposit_per_tick, &DEPOSITOR)?;
                deposited += receipt.assets;
                log::info!(
                    "tick {}: deposited {} for position {:?}",
                    tick,
                    receipt.assets,
                    receipt.position_id
                );
            }

            // Depositor behavior: redeem at par while the window allows it
            redeemed += self.try_redeem(scenario.redeem_per_tick);

            // Keeper duties: permissionless maintenance
            if self.vault.mode() == RedemptionMode::Initial {
                match self.vault.vest() {
                    Ok(moved) => {
                        if moved > 0 {
                            log::info!("tick {}: vested {} into the yield reserve", tick, moved);
                            swept += moved;
                        }
                    }
                    Err(e) => log::warn!("tick {}: vest failed: {}", tick, e),
                }
            }
            match self.vault.take_performance_fees() {
                Ok(fee) => {
                    if fee > 0 {
                        log::info!("tick {}: charged performance fee of {}", tick, fee);
                        fees_paid += fee;
                    }
                }
                Err(e) => log::warn!("tick {}: fee extraction failed: {}", tick, e),
            }

            // Once the window is closed the owner retires the vault: pull
            // capital back and switch to fully redeemable mode.
            if self.now > self.vesting_end && self.vault.mode() == RedemptionMode::Initial {
                let pulled = self.vault.liquidate(&OWNER)?;
                log::info!("window closed: pulled {} back into the liquid reserve", pulled);
                self.vault.enable_terminal_mode(&OWNER)?;
                log::info!("terminal mode enabled");
            }

            self.check_invariants(tick)?;
            for event in self.vault.take_events() {
                log::debug!("tick {}: {:?}", tick, event);
            }
        }

        Ok(Summary {
            ticks_run: scenario.ticks,
            deposited,
            redeemed,
            fees_paid,
            treasury_asset_fees: self.asset.balance_of(&TREASURY),
            swept_to_yield: swept,
            final_liquid_value: self.vault.liquid_value(),
            final_yield_value: self.vault.yield_value(),
            final_liability: self.vault.total_redemption_liability(),
            final_high_water_mark: self.vault.high_water_mark(),
            final_mode: self.vault.mode(),
        })
    }

    fn accrue_yield(&self) {
        let scenario = &self.config.scenario;
        let liquid_gain =
            self.liquid.total_assets() * scenario.liquid_yield_bps_per_tick as u128 / 10_000;
        if liquid_gain > 0 {
            self.liquid.accrue(liquid_gain);
        }
        let yield_gain = self.yield_reserve.total_assets()
            * scenario.yield_yield_bps_per_tick as u128
            / 10_000;
        if yield_gain > 0 {
            self.yield_reserve.accrue(yield_gain);
        }
    }

    /// Redeem up to `target` shares at par, scanning open positions.
    fn try_redeem(&mut self, target: u128) -> u128 {
        if target == 0 || self.vault.mode() != RedemptionMode::Initial {
            return 0;
        }
        let position_count = self.vault.ledger().positions().len() as u64;
        for id in 0..position_count {
            let redeemable = match self.vault.redeemable_shares(id, self.now) {
                Ok(r) => r,
                Err(_) => continue,
            };
            let burn = target.min(redeemable);
            if burn == 0 {
                continue;
            }
            match self
                .vault
                .redeem_position(&DEPOSITOR, id, burn, &DEPOSITOR, self.now)
            {
                Ok(net) => {
                    log::info!("redeemed {} shares of position {} for {}", burn, id, net);
                    return net;
                }
                Err(e) => log::debug!("redeem of position {} skipped: {}", id, e),
            }
        }
        0
    }

    fn check_invariants(&mut self, tick: u64) -> Result<()> {
        let positions = self.vault.ledger().positions();

        let assets_sum: u128 = positions.iter().map(|p| p.assets).sum();
        if self.vault.total_redemption_liability() != assets_sum {
            bail!(
                "tick {}: liability {} diverged from position assets {}",
                tick,
                self.vault.total_redemption_liability(),
                assets_sum
            );
        }

        let locked_sum: u128 = positions.iter().map(|p| p.shares).sum();
        if self.shares.balance_of(&VAULT_ID) != locked_sum {
            bail!(
                "tick {}: escrow {} diverged from locked shares {}",
                tick,
                self.shares.balance_of(&VAULT_ID),
                locked_sum
            );
        }

        if positions.iter().any(|p| p.shares > p.total_shares) {
            bail!("tick {}: a position exceeds its vesting denominator", tick);
        }

        let hwm = self.vault.high_water_mark();
        if hwm < self.last_hwm {
            bail!(
                "tick {}: high-water mark regressed {} -> {}",
                tick,
                self.last_hwm,
                hwm
            );
        }
        self.last_hwm = hwm;
        Ok(())
    }
}
