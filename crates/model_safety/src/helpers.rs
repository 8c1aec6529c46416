//! Invariant checking helpers

use crate::math::*;
use crate::state::*;

/// Liability consistency: the global counter equals the sum of live
/// positions' par obligations (exact under the zero-slippage model).
pub fn liability_consistent(s: &State) -> bool {
    let sum = s
        .positions
        .iter()
        .fold(0u128, |acc, p| add_u128(acc, p.assets));
    s.liability == sum
}

/// Escrow consistency: the vault's escrowed share balance equals the sum of
/// locked shares across positions.
pub fn escrow_consistent(s: &State) -> bool {
    let sum = s
        .positions
        .iter()
        .fold(0u128, |acc, p| add_u128(acc, p.shares));
    s.escrow_shares == sum
}

/// Per-position bound: locked shares never exceed the vesting denominator.
pub fn shares_bounded(s: &State) -> bool {
    s.positions.iter().all(|p| p.shares <= p.total_shares)
}

/// The high-water mark never decreases across a transition.
pub fn hwm_not_decreased(before: &State, after: &State) -> bool {
    after.hwm >= before.hwm
}

/// The mode switch is one-way.
pub fn mode_one_way(before: &State, after: &State) -> bool {
    !(before.mode == Mode::Terminal && after.mode == Mode::Initial)
}

/// The vesting denominator is frozen once the window has opened.
pub fn total_shares_frozen(before: &State, after: &State) -> bool {
    if before.now < before.params.vesting_start {
        return true;
    }
    // New positions may appear after the snapshot; compare the shared prefix.
    before
        .positions
        .iter()
        .zip(after.positions.iter())
        .all(|(b, a)| a.total_shares == b.total_shares)
}

/// No balances moved (for unauthorized-transition proofs).
pub fn balances_unchanged(before: &State, after: &State) -> bool {
    before.liquid == after.liquid
        && before.yield_pool == after.yield_pool
        && before.supply == after.supply
        && before.escrow_shares == after.escrow_shares
        && before.liability == after.liability
        && before.positions == after.positions
}

/// Conservation of reserve value across a rebalance: vest/liquidate move
/// value between pools without creating or destroying it.
pub fn pools_conserved(before: &State, after: &State) -> bool {
    add_u128(before.liquid, before.yield_pool) == add_u128(after.liquid, after.yield_pool)
}
