//! Generators for arbitrary state (for Kani)

#[cfg(kani)]
use kani::any;
use model_safety::state::*;

// Small bounds for fast SAT solving
#[cfg(kani)]
const MAX_VAL: u128 = 1_000;

#[cfg(kani)]
pub fn any_position() -> ModelPosition {
    let owner_raw: u8 = any();
    let assets_raw: u16 = any();
    let shares_raw: u16 = any();
    let extra_raw: u16 = any();

    let shares = (shares_raw as u128) % MAX_VAL;
    ModelPosition {
        owner: owner_raw % 4,
        assets: (assets_raw as u128) % MAX_VAL,
        shares,
        total_shares: shares + (extra_raw as u128) % MAX_VAL,
    }
}

#[cfg(kani)]
pub fn any_state_bounded() -> State {
    let mut positions: arrayvec::ArrayVec<ModelPosition, MAX_POSITIONS> =
        arrayvec::ArrayVec::new();
    // Two positions keep the state space small while still exercising
    // cross-position interactions
    let count: u8 = any();
    for _ in 0..(count % 3) {
        let _ = positions.try_push(any_position());
    }

    let liquid_raw: u16 = any();
    let yield_raw: u16 = any();
    let supply_raw: u16 = any();
    let hwm_raw: u16 = any();
    let now_raw: u16 = any();
    let start_raw: u16 = any();
    let end_raw: u16 = any();
    let terminal: bool = any();
    let authorized: bool = any();

    State {
        positions,
        liability: 0, // aligned by the sanitizer
        liquid: liquid_raw as u128,
        yield_pool: yield_raw as u128,
        escrow_shares: 0, // aligned by the sanitizer
        supply: supply_raw as u128,
        hwm: hwm_raw as u128,
        mode: if terminal { Mode::Terminal } else { Mode::Initial },
        now: now_raw as u64,
        owner_authorized: authorized,
        params: Params {
            performance_fee_bps: any(),
            redemption_fee_bps: any(),
            vesting_start: start_raw as u64,
            vesting_end: end_raw as u64,
        },
    }
}
