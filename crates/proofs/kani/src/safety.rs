//! Kani safety proofs for the vault invariants

use kani::{any, assume};
use model_safety::math::BPS_FULL;
use model_safety::vesting::vesting_rate;
use model_safety::{helpers::*, state::*, transitions::*};

use crate::{adversary::*, sanitizer::*};

/// P1: Liability consistency
/// The global liability always equals the sum of live positions' assets
#[kani::proof]
fn p1_liability_consistent_under_any_step() {
    let s = crate::generators::any_state_bounded().sanitize();
    assume(liability_consistent(&s));

    let after = adversary_step(s);
    kani::assert(
        liability_consistent(&after),
        "P1: liability must equal the sum of position assets",
    );
}

/// P2: Locked shares never exceed the vesting denominator
#[kani::proof]
fn p2_shares_bounded_under_any_step() {
    let s = crate::generators::any_state_bounded().sanitize();
    assume(shares_bounded(&s));

    let after = adversary_step(s);
    kani::assert(
        shares_bounded(&after),
        "P2: shares must stay within total_shares",
    );
}

/// P3: The high-water mark never decreases
#[kani::proof]
#[kani::unwind(8)]
fn p3_hwm_monotone_under_short_adversary_sequences() {
    let mut s = crate::generators::any_state_bounded().sanitize();

    let mut steps: u8 = any();
    steps = (steps % MAX_STEPS) + 1;

    for _ in 0..steps {
        let before_hwm = s.hwm;
        s = adversary_step(s);
        kani::assert(s.hwm >= before_hwm, "P3: high-water mark must be monotone");
    }
}

/// P4: The vesting curve is full before the window, zero after, and
/// non-increasing in time
#[kani::proof]
fn p4_vesting_rate_shape() {
    let start = (any::<u16>() as u64) % 2_000;
    let params = Params {
        performance_fee_bps: any(),
        redemption_fee_bps: any(),
        vesting_start: start,
        vesting_end: start + (any::<u16>() as u64) % 2_000,
    };

    let t1 = (any::<u16>() as u64) % 5_000;
    let t2 = (any::<u16>() as u64) % 5_000;
    assume(t1 <= t2);

    let r1 = vesting_rate(t1, &params);
    let r2 = vesting_rate(t2, &params);
    kani::assert(r1 >= r2, "P4: vesting rate must be non-increasing");
    if t1 < params.vesting_start {
        kani::assert(r1 == BPS_FULL, "P4: full scale before the window");
    }
    if t2 >= params.vesting_end {
        kani::assert(r2 == 0, "P4: zero at/after the window end");
    }
}

/// P5: The vesting denominator is frozen once the window has opened
#[kani::proof]
fn p5_denominator_frozen_after_window_opens() {
    let s = crate::generators::any_state_bounded().sanitize();
    assume(s.now >= s.params.vesting_start);

    let before = s.clone();
    let after = adversary_step(s);
    kani::assert(
        total_shares_frozen(&before, &after),
        "P5: total_shares must not change after the window opens",
    );
}

/// P6: The Terminal switch is one-way and idempotent, and kills positional
/// redemption
#[kani::proof]
fn p6_terminal_one_way_and_idempotent() {
    let s = crate::generators::any_state_bounded().sanitize();

    let before = s.clone();
    let once = enable_terminal(s);
    kani::assert(mode_one_way(&before, &once), "P6: mode switch is one-way");

    let twice = enable_terminal(once.clone());
    kani::assert(once == twice, "P6: enabling twice equals enabling once");

    if once.mode == Mode::Terminal {
        let idx: usize = (any::<u8>() as usize) % 4;
        let shares: u16 = any();
        let redeemed = redeem(once.clone(), idx, shares as u128);
        kani::assert(
            redeemed == once,
            "P6: positional redemption is dead in Terminal mode",
        );
        let vested = vest(once.clone());
        kani::assert(vested == once, "P6: vest is dead in Terminal mode");
    }
}

/// P7: Unauthorized owner transitions are no-ops
#[kani::proof]
fn p7_unauthorized_owner_ops_are_noops() {
    let mut s = crate::generators::any_state_bounded().sanitize();
    s.owner_authorized = false;

    let before = s.clone();
    let after = liquidate(s.clone());
    kani::assert(
        balances_unchanged(&before, &after),
        "P7: unauthorized liquidate must not move balances",
    );

    let after = enable_terminal(s);
    kani::assert(
        after.mode == before.mode,
        "P7: unauthorized terminal switch must not change the mode",
    );
}

/// P8: Redemption never grows a position or the liability
#[kani::proof]
fn p8_redeem_never_grows_claims() {
    let s = crate::generators::any_state_bounded().sanitize();
    assume(!s.positions.is_empty());

    let idx: usize = (any::<u8>() as usize) % s.positions.len();
    let shares: u16 = any();

    let before = s.clone();
    let after = redeem(s, idx, shares as u128);

    kani::assert(
        after.liability <= before.liability,
        "P8: liability must not grow on redemption",
    );
    kani::assert(
        after.positions[idx].assets <= before.positions[idx].assets
            && after.positions[idx].shares <= before.positions[idx].shares,
        "P8: a position must only shrink on redemption",
    );
}

/// P9: Escrow consistency is preserved by every transition
#[kani::proof]
fn p9_escrow_consistent_under_any_step() {
    let s = crate::generators::any_state_bounded().sanitize();
    assume(escrow_consistent(&s));

    let after = adversary_step(s);
    kani::assert(
        escrow_consistent(&after),
        "P9: escrow must equal the sum of locked shares",
    );
}

/// P10: Rebalancing conserves combined reserve value
#[kani::proof]
fn p10_rebalance_conserves_pools() {
    let s = crate::generators::any_state_bounded().sanitize();

    let before = s.clone();
    let after = vest(s.clone());
    kani::assert(
        pools_conserved(&before, &after),
        "P10: vest must conserve combined pool value",
    );

    let after = liquidate(s);
    kani::assert(
        pools_conserved(&before, &after),
        "P10: liquidate must conserve combined pool value",
    );
}
