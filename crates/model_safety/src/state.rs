//! Pure state model for Kani verification

use crate::math::UNIT;

/// Small fixed bound for Kani tractability
pub const MAX_POSITIONS: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelPosition {
    pub owner: u8,
    pub assets: u128,
    pub shares: u128,
    pub total_shares: u128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Initial,
    Terminal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    pub performance_fee_bps: u16,
    pub redemption_fee_bps: u16,
    pub vesting_start: u64,
    pub vesting_end: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub positions: arrayvec::ArrayVec<ModelPosition, MAX_POSITIONS>,
    /// Sum of live positions' par-value obligations
    pub liability: u128,
    /// Asset value of the liquid reserve (zero-slippage model)
    pub liquid: u128,
    /// Asset value of the yield reserve
    pub yield_pool: u128,
    /// Share supply escrowed by the vault itself
    pub escrow_shares: u128,
    /// Total share supply
    pub supply: u128,
    /// High-water mark, 1e6 fixed point
    pub hwm: u128,
    pub mode: Mode,
    pub now: u64,
    /// For authorization proofs: owner-gated transitions are no-ops when false
    pub owner_authorized: bool,
    pub params: Params,
}

impl Default for ModelPosition {
    fn default() -> Self {
        Self {
            owner: 0,
            assets: 0,
            shares: 0,
            total_shares: 0,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            performance_fee_bps: 2_000,
            redemption_fee_bps: 0,
            vesting_start: 1_000,
            vesting_end: 2_000,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self {
            positions: arrayvec::ArrayVec::new(),
            liability: 0,
            liquid: 0,
            yield_pool: 0,
            escrow_shares: 0,
            supply: 0,
            hwm: UNIT,
            mode: Mode::Initial,
            now: 0,
            owner_authorized: true,
            params: Params::default(),
        }
    }
}
