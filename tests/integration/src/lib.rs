//! Shared harness for the end-to-end vault scenarios

use reservoir_engine::testkit::{MockAsset, MockReserve, MockShares};
use reservoir_engine::{Pubkey, Vault, VaultParams};

pub const VAULT_ID: Pubkey = [10u8; 32];
pub const OWNER: Pubkey = [11u8; 32];
pub const TREASURY: Pubkey = [12u8; 32];
pub const ALICE: Pubkey = [1u8; 32];
pub const BOB: Pubkey = [2u8; 32];

pub const DAY: u64 = 86_400;
/// Deployment instant of every harness vault
pub const T0: u64 = 1_000_000;

pub type TestVault = Vault<MockReserve, MockReserve, MockShares, MockAsset>;

pub struct Harness {
    pub vault: TestVault,
    pub asset: MockAsset,
    pub liquid: MockReserve,
    pub yield_reserve: MockReserve,
    pub shares: MockShares,
}

impl Harness {
    pub fn new(params: VaultParams, max_slippage_bps: u16) -> Self {
        let asset = MockAsset::new(20);
        asset.mint_to(&ALICE, 1_000_000_000);
        asset.mint_to(&BOB, 1_000_000_000);
        let liquid = MockReserve::new(21, VAULT_ID, asset.book());
        let yield_reserve = MockReserve::new(22, VAULT_ID, asset.book());
        let shares = MockShares::new();
        let vault = Vault::new(
            VAULT_ID,
            OWNER,
            params,
            max_slippage_bps,
            liquid.clone(),
            yield_reserve.clone(),
            shares.clone(),
            asset.clone(),
            T0,
        )
        .expect("harness params are valid");
        Self {
            vault,
            asset,
            liquid,
            yield_reserve,
            shares,
        }
    }

    /// Zero-fee, zero-slippage vault with a 30-day window opening at
    /// `T0 + DAY`.
    pub fn default_vault() -> Self {
        Self::new(Harness::params(0, 0), 0)
    }

    pub fn params(performance_fee_bps: u16, redemption_fee_bps: u16) -> VaultParams {
        VaultParams {
            treasury: TREASURY,
            performance_fee_bps,
            redemption_fee_bps,
            vesting_start: T0 + DAY,
            vesting_end: T0 + DAY + 30 * DAY,
        }
    }

    /// Sum of live positions' par assets, for liability checks.
    pub fn positions_assets_sum(&self) -> u128 {
        self.vault
            .ledger()
            .positions()
            .iter()
            .map(|p| p.assets)
            .sum()
    }

}
