//! Reverse-linear decay schedule shared by the model transitions

use crate::math::*;
use crate::state::Params;

/// Current redemption window rate in basis points.
///
/// Full scale before the window opens, zero at/after the window closes,
/// linearly decaying inside: floor(10_000 * (end - now) / (end - start)).
pub fn vesting_rate(now: u64, params: &Params) -> u16 {
    if now < params.vesting_start {
        return BPS_FULL;
    }
    if now >= params.vesting_end {
        return 0;
    }
    let remaining = params.vesting_end - now;
    let window = params.vesting_end - params.vesting_start;
    // window > 0 here: now >= start and now < end
    let rate = mul_div_floor_sat(BPS_DENOM, remaining as u128, window as u128);
    rate as u16
}

/// Shares currently redeemable at par for a position:
/// max(0, floor(rate * total_shares / 10_000) - (total_shares - shares))
pub fn redeemable_shares(
    now: u64,
    params: &Params,
    shares: u128,
    total_shares: u128,
) -> u128 {
    let rate = vesting_rate(now, params);
    let unlocked = mul_div_floor_sat(total_shares, rate as u128, BPS_DENOM);
    let consumed = sub_u128(total_shares, shares);
    sub_u128(unlocked, consumed)
}
