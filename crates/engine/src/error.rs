//! Error taxonomy for the vault engine
//!
//! Every failure aborts the triggering call with no partial ledger mutation.
//! Collaborator failures are wrapped, never remapped, so callers can inspect
//! the original cause.

use thiserror::Error;

/// Failures raised by a token collaborator (share ledger or asset token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("insufficient token balance")]
    InsufficientBalance,
    #[error("insufficient delegated allowance")]
    InsufficientAllowance,
}

/// Failures raised by a reserve collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReserveError {
    #[error("reserve rejected the deposit")]
    DepositRejected,
    #[error("reserve rejected the withdrawal")]
    WithdrawRejected,
    #[error("insufficient reserve shares")]
    InsufficientShares,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VaultError {
    // --- validation ---
    #[error("zero value")]
    ZeroValue,
    #[error("zero address")]
    ZeroAddress,
    #[error("invalid fee rate")]
    InvalidFeeRate,
    #[error("invalid vesting schedule")]
    InvalidSchedule,
    #[error("invalid slippage tolerance")]
    InvalidSlippage,
    #[error("unknown position id")]
    UnknownPosition,
    #[error("cannot sweep a protected token")]
    SweepProtectedToken,
    #[error("arithmetic overflow")]
    MathOverflow,

    // --- state gating ---
    #[error("operation not available in the current redemption mode")]
    WrongMode,
    #[error("deposits are disabled")]
    DepositsDisabled,
    #[error("vault is paused")]
    Paused,
    #[error("reentrant call")]
    Reentrancy,

    // --- authorization ---
    #[error("caller is not authorized")]
    Unauthorized,

    // --- capacity ---
    #[error("not enough locked shares")]
    NotEnoughLockedShares,
    #[error("not enough redeemable shares")]
    NotEnoughRedeemableShares,
    #[error("insufficient assets in position")]
    InsufficientAssetsInPosition,

    // --- reserve integrity ---
    #[error("deposit round-trip value below slippage floor")]
    DepositShortfall,
    #[error("deposited share delta does not match preview")]
    DepositPreviewMismatch,
    #[error("withdrawal delivered less than the slippage floor")]
    WithdrawShortfall,

    // --- collaborator failures, propagated unchanged ---
    #[error("token collaborator: {0}")]
    Token(#[from] TokenError),
    #[error("reserve collaborator: {0}")]
    Reserve(#[from] ReserveError),
}

pub type VaultResult<T> = Result<T, VaultError>;
