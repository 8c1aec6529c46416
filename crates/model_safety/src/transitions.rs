//! State transition functions - all total, no panics
//!
//! The model is deliberately simpler than the production engine: reserve
//! transport is zero-slippage and zero-fee, the yield reserve is always fully
//! withdrawable, and per-user share balances are not tracked. The ledger
//! arithmetic (position ratios, liability, vesting gate, high-water mark) is
//! the same as production.

use crate::math::*;
use crate::state::*;
use crate::vesting::*;

fn total_value(s: &State) -> u128 {
    add_u128(s.liquid, s.yield_pool)
}

fn shares_for_deposit(s: &State, assets: u128) -> u128 {
    let total = total_value(s);
    if s.supply == 0 || total == 0 {
        assets
    } else {
        mul_div_floor_sat(assets, s.supply, total)
    }
}

/// Deposit assets; in Initial mode this opens a position and escrows the
/// minted shares, in Terminal mode shares go straight to the depositor.
pub fn deposit(mut s: State, owner: u8, assets: u128) -> State {
    if assets == 0 {
        return s;
    }
    let shares = shares_for_deposit(&s, assets);
    if shares == 0 {
        return s;
    }

    match s.mode {
        Mode::Initial => {
            if s.positions.is_full() {
                return s;
            }
            let pos = ModelPosition {
                owner,
                assets,
                shares,
                total_shares: shares,
            };
            // push cannot fail: checked is_full above
            let _ = s.positions.try_push(pos);
            s.liability = add_u128(s.liability, assets);
            s.escrow_shares = add_u128(s.escrow_shares, shares);
        }
        Mode::Terminal => {}
    }

    s.liquid = add_u128(s.liquid, assets);
    s.supply = add_u128(s.supply, shares);
    s
}

/// The shared position-redemption primitive: burns locked shares and returns
/// the proportional par assets. Returns (state, assets_returned).
fn redeem_from_position(mut s: State, idx: usize, shares_to_burn: u128) -> (State, u128) {
    if idx >= s.positions.len() || shares_to_burn == 0 {
        return (s, 0);
    }
    let p = &s.positions[idx];
    if p.shares == 0 || shares_to_burn > p.shares {
        return (s, 0);
    }
    let assets_ret = mul_div_floor_sat(shares_to_burn, p.assets, p.shares);
    if assets_ret == 0 || assets_ret > p.assets {
        return (s, 0);
    }

    let freeze = s.now >= s.params.vesting_start;
    let p = &mut s.positions[idx];
    p.shares = sub_u128(p.shares, shares_to_burn);
    p.assets = sub_u128(p.assets, assets_ret);
    if !freeze {
        p.total_shares = sub_u128(p.total_shares, shares_to_burn);
    }
    s.liability = sub_u128(s.liability, assets_ret);
    (s, assets_ret)
}

/// Positional redemption: vesting-gated, pulls par assets out of the liquid
/// reserve and burns the escrowed shares.
pub fn redeem(s: State, idx: usize, shares_to_burn: u128) -> State {
    if s.mode != Mode::Initial {
        return s;
    }
    if idx >= s.positions.len() {
        return s;
    }
    let p = &s.positions[idx];
    let allowed = redeemable_shares(s.now, &s.params, p.shares, p.total_shares);
    if shares_to_burn > allowed {
        return s;
    }

    let before = s.clone();
    let (mut s, assets_ret) = redeem_from_position(s, idx, shares_to_burn);
    if assets_ret == 0 {
        return s;
    }
    // Zero-slippage model: the liquid reserve must cover the request exactly,
    // otherwise the whole call aborts.
    if assets_ret > s.liquid {
        return before;
    }
    s.liquid = sub_u128(s.liquid, assets_ret);
    s.escrow_shares = sub_u128(s.escrow_shares, shares_to_burn);
    s.supply = sub_u128(s.supply, shares_to_burn);
    s
}

/// Claim: converts locked shares into freely held shares, forfeiting the par
/// redemption right on that portion. No assets move.
pub fn claim(s: State, idx: usize, shares_to_burn: u128) -> State {
    if s.mode != Mode::Initial {
        return s;
    }
    let (mut s, assets_ret) = redeem_from_position(s, idx, shares_to_burn);
    if assets_ret == 0 {
        return s;
    }
    // Shares leave escrow but stay in circulation.
    s.escrow_shares = sub_u128(s.escrow_shares, shares_to_burn);
    s
}

/// Sweep liquid surplus above the redemption liability into the yield pool.
pub fn vest(mut s: State) -> State {
    if s.mode != Mode::Initial {
        return s;
    }
    if s.liquid <= s.liability {
        return s;
    }
    let surplus = sub_u128(s.liquid, s.liability);
    s.liquid = sub_u128(s.liquid, surplus);
    s.yield_pool = add_u128(s.yield_pool, surplus);
    s
}

/// Pull everything withdrawable out of the yield pool into the liquid
/// reserve (the model's yield pool is always fully withdrawable).
pub fn liquidate(mut s: State) -> State {
    if !s.owner_authorized {
        return s;
    }
    let moved = s.yield_pool;
    s.yield_pool = 0;
    s.liquid = add_u128(s.liquid, moved);
    s
}

/// Charge the performance fee above the high-water mark.
///
/// NAV-per-share uses ceiling rounding, matching production. The whole
/// operation is a no-op when extraction would fail (fee exceeds the liquid
/// pool), leaving the mark unchanged.
pub fn take_fees(mut s: State) -> State {
    if s.supply == 0 {
        return s;
    }
    let nav = mul_div_ceil_sat(total_value(&s), UNIT, s.supply);
    if nav <= s.hwm {
        return s;
    }
    let profit_per_share = sub_u128(nav, s.hwm);
    let total_profit = mul_div_ceil_sat(profit_per_share, s.supply, UNIT);
    let fee = mul_div_ceil_sat(total_profit, s.params.performance_fee_bps as u128, BPS_DENOM);
    if fee > s.liquid {
        return s;
    }
    s.hwm = nav;
    s.liquid = sub_u128(s.liquid, fee);
    s
}

/// One-way switch to Terminal mode (owner only, idempotent).
pub fn enable_terminal(mut s: State) -> State {
    if !s.owner_authorized {
        return s;
    }
    s.mode = Mode::Terminal;
    s
}

/// Terminal-mode fungible withdrawal: burns shares at NAV for assets.
pub fn withdraw_terminal(mut s: State, assets: u128) -> State {
    if s.mode != Mode::Terminal || assets == 0 {
        return s;
    }
    let total = total_value(&s);
    if s.supply == 0 || total == 0 || assets > s.liquid {
        return s;
    }
    let shares_to_burn = mul_div_ceil_sat(assets, s.supply, total);
    let circulating = sub_u128(s.supply, s.escrow_shares);
    if shares_to_burn == 0 || shares_to_burn > circulating {
        return s;
    }
    s.supply = sub_u128(s.supply, shares_to_burn);
    s.liquid = sub_u128(s.liquid, assets);
    s
}

/// Advance time (monotone)
pub fn advance_time(mut s: State, dt: u64) -> State {
    s.now = s.now.saturating_add(dt);
    s
}
