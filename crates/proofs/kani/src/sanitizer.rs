//! State space sanitizer - bounds values for Kani exploration

use model_safety::math::{add_u128, UNIT};
use model_safety::state::*;

pub const N_POSITIONS: usize = 3;
pub const MAX_STEPS: u8 = 4;

/// Bounds for tractable verification
const MAX_AMOUNT: u128 = 1_000_000u128;
const MAX_POOL: u128 = 10_000_000u128;
const MAX_WINDOW: u64 = 2_000u64;

pub trait Sanitize {
    fn sanitize(self) -> Self;
}

impl Sanitize for State {
    fn sanitize(mut self) -> State {
        // Clamp position count
        while self.positions.len() > N_POSITIONS {
            self.positions.pop();
        }

        // Clamp per-position values and restore the shares bound
        for p in self.positions.iter_mut() {
            p.assets %= MAX_AMOUNT;
            p.shares %= MAX_AMOUNT;
            if p.total_shares < p.shares {
                p.total_shares = p.shares;
            } else {
                p.total_shares = p.shares + (p.total_shares - p.shares) % MAX_AMOUNT;
            }
        }

        // Align the global counters with the store so invariants start true
        self.liability = self
            .positions
            .iter()
            .fold(0u128, |acc, p| add_u128(acc, p.assets));
        self.escrow_shares = self
            .positions
            .iter()
            .fold(0u128, |acc, p| add_u128(acc, p.shares));

        // Supply covers at least the escrow
        if self.supply < self.escrow_shares {
            self.supply = self.escrow_shares;
        } else {
            self.supply = self.escrow_shares + (self.supply - self.escrow_shares) % MAX_POOL;
        }

        // The liquid reserve covers the liability, as the rebalancer keeps it
        if self.liquid < self.liability {
            self.liquid = self.liability;
        } else {
            self.liquid = self.liability + (self.liquid - self.liability) % MAX_POOL;
        }
        self.yield_pool %= MAX_POOL;

        // Keep the mark at or above par
        if self.hwm < UNIT {
            self.hwm = UNIT;
        } else {
            self.hwm = UNIT + (self.hwm - UNIT) % (10 * UNIT);
        }

        // Bounded schedule and clock
        self.params.vesting_start %= MAX_WINDOW;
        self.params.vesting_end =
            self.params.vesting_start + (self.params.vesting_end % MAX_WINDOW);
        self.params.performance_fee_bps %= 5_001;
        self.params.redemption_fee_bps %= 10_001;
        self.now %= 3 * MAX_WINDOW;

        self
    }
}
