//! Reverse vesting schedule
//!
//! The window works backwards from a conventional unlock: a position is
//! fully redeemable at par before the window opens, then the redeemable
//! fraction decays linearly to zero by the window's end. After the end the
//! par-redemption right is gone for good, forcing the move to Terminal mode
//! instead of allowing indefinite redemption at a stale par value.

use crate::state::position::Position;
use model_safety::math::{mul_div_floor_sat, sub_u128, BPS_DENOM, BPS_FULL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingSchedule {
    pub start: u64,
    pub end: u64,
}

impl VestingSchedule {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// True once the window has opened; from this instant a position's
    /// `total_shares` denominator is frozen.
    pub fn window_opened(&self, now: u64) -> bool {
        now >= self.start
    }

    /// Current redemption rate in basis points:
    /// full scale before `start`, zero at/after `end`,
    /// floor(10_000 * (end - now) / (end - start)) in between.
    pub fn rate_bps(&self, now: u64) -> u16 {
        if now < self.start {
            return BPS_FULL;
        }
        if now >= self.end {
            return 0;
        }
        let remaining = self.end - now;
        let window = self.end - self.start;
        mul_div_floor_sat(BPS_DENOM, remaining as u128, window as u128) as u16
    }

    /// Shares of `position` currently redeemable at par:
    /// max(0, floor(rate * total_shares / 10_000) - (total_shares - shares)).
    ///
    /// The curve applies to the position's original share count, so early
    /// redemptions consume allowance that would otherwise arrive later.
    pub fn redeemable_shares(&self, now: u64, position: &Position) -> u128 {
        let rate = self.rate_bps(now);
        let unlocked = mul_div_floor_sat(position.total_shares, rate as u128, BPS_DENOM);
        let consumed = sub_u128(position.total_shares, position.shares);
        sub_u128(unlocked, consumed)
    }
}
