//! High-water-mark performance fee engine
//!
//! NAV-per-share is computed with ceiling rounding. That direction inflates
//! the apparent price and therefore the apparent profit; it is reproduced
//! here exactly for behavioral parity with the system being modeled.

use crate::error::{VaultError, VaultResult};
use model_safety::math::{mul_div_ceil, sub_u128, BPS_DENOM, UNIT};

/// A fee computed from current reserve value but not yet charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeAssessment {
    /// The new NAV-per-share (1e6 fixed point) the mark will move to
    pub nav_per_share: u128,
    /// Fee in asset units, ceiling-rounded
    pub fee_assets: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEngine {
    /// Highest NAV-per-share ever observed, 1e6 fixed point
    pub high_water_mark: u128,
    pub performance_fee_bps: u16,
}

impl FeeEngine {
    pub fn new(performance_fee_bps: u16) -> Self {
        Self {
            high_water_mark: UNIT,
            performance_fee_bps,
        }
    }

    /// Assess the fee for the current combined reserve value and share
    /// supply. Returns None when no new high has been set. Pure: the mark
    /// moves only in [`FeeEngine::commit`], after extraction succeeds.
    pub fn assess(&self, total_value: u128, supply: u128) -> VaultResult<Option<FeeAssessment>> {
        if supply == 0 {
            return Ok(None);
        }
        let nav_per_share =
            mul_div_ceil(total_value, UNIT, supply).ok_or(VaultError::MathOverflow)?;
        if nav_per_share <= self.high_water_mark {
            return Ok(None);
        }
        let profit_per_share = sub_u128(nav_per_share, self.high_water_mark);
        let total_profit =
            mul_div_ceil(profit_per_share, supply, UNIT).ok_or(VaultError::MathOverflow)?;
        let fee_assets = mul_div_ceil(total_profit, self.performance_fee_bps as u128, BPS_DENOM)
            .ok_or(VaultError::MathOverflow)?;
        Ok(Some(FeeAssessment {
            nav_per_share,
            fee_assets,
        }))
    }

    /// Move the mark to a new high. Monotonic; called even when the fee
    /// rounded to zero.
    pub fn commit(&mut self, nav_per_share: u128) {
        if nav_per_share > self.high_water_mark {
            self.high_water_mark = nav_per_share;
        }
    }
}
