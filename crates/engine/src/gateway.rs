//! Safe reserve gateway - the single chokepoint for reserve interaction
//!
//! Reserves are externally supplied and untrusted. The gateway converts that
//! unbounded trust assumption into a bounded, numerically verified one:
//! deposits must round-trip within the slippage tolerance and match the
//! reserve's own preview exactly; withdrawals are measured against the
//! vault's actual asset-balance delta, never the reserve's return value.
//! Callers must use the returned actual amounts downstream.

use pinocchio::pubkey::Pubkey;

use crate::adapters::{AssetToken, Reserve};
use crate::error::{VaultError, VaultResult};
use model_safety::math::min_out;

/// Deposit `assets` into a reserve.
///
/// Fails with `DepositShortfall` if the previewed round-trip value falls
/// below the slippage floor, and `DepositPreviewMismatch` if the measured
/// share delta differs from the reserve's own preview - the reserve must be
/// exactly compliant, with zero tolerance for deposit fees.
pub fn deposit_to<R: Reserve>(
    reserve: &mut R,
    vault_id: &Pubkey,
    assets: u128,
    max_slippage_bps: u16,
) -> VaultResult<u128> {
    let quoted_shares = reserve.preview_deposit(assets);
    let round_trip = reserve.preview_redeem(quoted_shares);
    let floor = min_out(assets, max_slippage_bps).ok_or(VaultError::MathOverflow)?;
    if round_trip < floor {
        return Err(VaultError::DepositShortfall);
    }

    let before = reserve.balance_of(vault_id);
    reserve.deposit(assets)?;
    let after = reserve.balance_of(vault_id);
    let minted = after.checked_sub(before).ok_or(VaultError::MathOverflow)?;
    if minted != quoted_shares {
        return Err(VaultError::DepositPreviewMismatch);
    }
    Ok(minted)
}

/// Withdraw `requested` assets from a reserve.
///
/// Returns the amount actually received, measured as the vault's
/// asset-balance delta; fails with `WithdrawShortfall` if it lands below
/// the slippage floor.
pub fn withdraw_from<R: Reserve, A: AssetToken>(
    reserve: &mut R,
    asset: &A,
    vault_id: &Pubkey,
    requested: u128,
    max_slippage_bps: u16,
) -> VaultResult<u128> {
    let before = asset.balance_of(vault_id);
    reserve.withdraw(requested)?;
    let after = asset.balance_of(vault_id);
    let received = after.checked_sub(before).ok_or(VaultError::MathOverflow)?;

    let floor = min_out(requested, max_slippage_bps).ok_or(VaultError::MathOverflow)?;
    if received < floor {
        return Err(VaultError::WithdrawShortfall);
    }
    Ok(received)
}
