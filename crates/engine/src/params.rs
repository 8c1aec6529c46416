//! Construction-time vault configuration

use pinocchio::pubkey::Pubkey;

use crate::error::{VaultError, VaultResult};
use model_safety::math::BPS_FULL;

/// Hard cap on the performance fee (50%)
pub const MAX_PERFORMANCE_FEE_BPS: u16 = 5_000;

/// Vault parameters, fixed at construction. The slippage tolerance is the
/// one owner-mutable knob and lives on the vault itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultParams {
    /// Fee recipient
    pub treasury: Pubkey,
    /// Performance fee above the high-water mark, basis points
    pub performance_fee_bps: u16,
    /// Redemption fee on positional redemptions, basis points
    pub redemption_fee_bps: u16,
    /// Instant the redemption window starts decaying
    pub vesting_start: u64,
    /// Instant the redemption window is fully closed
    pub vesting_end: u64,
}

impl VaultParams {
    /// Validate against the construction-time clock.
    pub fn validate(&self, now: u64) -> VaultResult<()> {
        if self.treasury == Pubkey::default() {
            return Err(VaultError::ZeroAddress);
        }
        if self.performance_fee_bps > MAX_PERFORMANCE_FEE_BPS {
            return Err(VaultError::InvalidFeeRate);
        }
        if self.redemption_fee_bps > BPS_FULL {
            return Err(VaultError::InvalidFeeRate);
        }
        if self.vesting_start < now || self.vesting_end < self.vesting_start {
            return Err(VaultError::InvalidSchedule);
        }
        Ok(())
    }
}
