//! Position ledger: per-depositor par-redemption claims and the global
//! redemption liability
//!
//! Positions are created by deposits while the vault is in Initial mode,
//! mutated only by their owner, and never deleted - a fully redeemed
//! position stays in the store with all counters at zero.
//!
//! The redeem primitive is split into prepare/commit so the vault can run
//! reserve interactions between validation and the ledger mutation: an
//! aborted call leaves the ledger untouched.

use pinocchio::pubkey::Pubkey;

use crate::error::{VaultError, VaultResult};
use model_safety::math::{mul_div_floor, sub_u128};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub owner: Pubkey,
    /// Remaining par-redeemable asset amount
    pub assets: u128,
    /// Remaining locked share count
    pub shares: u128,
    /// Vesting denominator: the original share count, decremented only
    /// while the vesting window has not opened yet
    pub total_shares: u128,
}

impl Position {
    /// A fully drained position; it stays in the store forever.
    pub fn is_inert(&self) -> bool {
        self.shares == 0
    }
}

/// Validated outcome of a position redemption, not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRedeem {
    pub position_id: u64,
    pub shares: u128,
    pub assets: u128,
}

#[derive(Debug, Clone, Default)]
pub struct PositionLedger {
    positions: Vec<Position>,
    /// Sum of live positions' `assets` - the par obligation the liquid
    /// reserve must stay able to cover. See the drift note on
    /// [`PositionLedger::commit_redeem`].
    pub total_redemption_liability: u128,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are indices into the store: monotonic, never reused.
    pub fn next_position_id(&self) -> u64 {
        self.positions.len() as u64
    }

    pub fn get(&self, id: u64) -> VaultResult<&Position> {
        self.positions
            .get(id as usize)
            .ok_or(VaultError::UnknownPosition)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Open a position and grow the global liability by its par value.
    pub fn create_position(
        &mut self,
        owner: Pubkey,
        assets: u128,
        shares: u128,
    ) -> VaultResult<u64> {
        if assets == 0 || shares == 0 {
            return Err(VaultError::ZeroValue);
        }
        let liability = self
            .total_redemption_liability
            .checked_add(assets)
            .ok_or(VaultError::MathOverflow)?;

        let id = self.next_position_id();
        self.positions.push(Position {
            owner,
            assets,
            shares,
            total_shares: shares,
        });
        self.total_redemption_liability = liability;
        Ok(id)
    }

    /// Validate a redemption of `shares_to_burn` locked shares and compute
    /// the proportional par assets, without mutating anything.
    pub fn prepare_redeem(
        &self,
        caller: &Pubkey,
        id: u64,
        shares_to_burn: u128,
    ) -> VaultResult<PendingRedeem> {
        let pos = self.get(id)?;
        if pos.owner != *caller {
            return Err(VaultError::Unauthorized);
        }
        if shares_to_burn > pos.shares {
            return Err(VaultError::NotEnoughLockedShares);
        }
        if pos.shares == 0 {
            return Err(VaultError::ZeroValue);
        }
        let assets_to_return = mul_div_floor(shares_to_burn, pos.assets, pos.shares)
            .ok_or(VaultError::MathOverflow)?;
        if assets_to_return == 0 {
            return Err(VaultError::ZeroValue);
        }
        // Unreachable under exact math; kept as a hard stop.
        if assets_to_return > pos.assets {
            return Err(VaultError::InsufficientAssetsInPosition);
        }
        Ok(PendingRedeem {
            position_id: id,
            shares: shares_to_burn,
            assets: assets_to_return,
        })
    }

    /// Apply a prepared redemption. `freeze_denominator` is true once the
    /// vesting window has opened: from then on `total_shares` is frozen and
    /// the decay curve alone governs eligibility.
    ///
    /// The liability is decremented by the *requested* assets, not the
    /// amount a reserve later delivers. Under nonzero slippage tolerance the
    /// counter can therefore drift below the true outstanding obligation;
    /// this matches the system being modeled and is exercised by tests.
    pub fn commit_redeem(&mut self, pending: &PendingRedeem, freeze_denominator: bool) {
        let pos = &mut self.positions[pending.position_id as usize];
        pos.shares = sub_u128(pos.shares, pending.shares);
        pos.assets = sub_u128(pos.assets, pending.assets);
        if !freeze_denominator {
            pos.total_shares = sub_u128(pos.total_shares, pending.shares);
        }
        self.total_redemption_liability =
            sub_u128(self.total_redemption_liability, pending.assets);
    }
}
