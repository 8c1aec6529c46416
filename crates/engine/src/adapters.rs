//! Collaborator capabilities, late-bound at vault construction
//!
//! The vault never talks to a concrete reserve or token implementation; it is
//! generic over these traits and every reserve interaction goes through the
//! gateway chokepoint. The vault is always the caller, so the
//! receiver/owner parameters of the abstract interfaces are implicit.

use pinocchio::pubkey::Pubkey;

use crate::error::{ReserveError, TokenError};

/// A tokenized reserve holding the vault's capital. Preview functions are
/// infallible views; the gateway verifies the reserve against them.
pub trait Reserve {
    /// Deposit assets from the vault's balance, minting reserve shares to
    /// the vault. Returns the share count the reserve claims to have minted.
    fn deposit(&mut self, assets: u128) -> Result<u128, ReserveError>;

    /// Withdraw assets to the vault's balance, burning reserve shares.
    /// Returns the share count burned. The delivered asset amount is
    /// measured by the gateway, never trusted from here.
    fn withdraw(&mut self, assets: u128) -> Result<u128, ReserveError>;

    /// Shares that would be minted for a deposit of `assets`.
    fn preview_deposit(&self, assets: u128) -> u128;

    /// Assets that would be returned for redeeming `shares`.
    fn preview_redeem(&self, shares: u128) -> u128;

    /// Shares that would be burned to withdraw exactly `assets`.
    fn preview_withdraw(&self, assets: u128) -> u128;

    /// Maximum assets currently withdrawable by the vault.
    fn max_withdraw(&self) -> u128;

    /// Reserve-share balance of `owner`.
    fn balance_of(&self, owner: &Pubkey) -> u128;

    /// Transfer reserve shares out of the vault's balance.
    fn transfer_shares(&mut self, to: &Pubkey, shares: u128) -> Result<(), ReserveError>;
}

/// The vault's fungible share token.
pub trait ShareLedger {
    fn mint(&mut self, to: &Pubkey, amount: u128) -> Result<(), TokenError>;
    fn burn(&mut self, from: &Pubkey, amount: u128) -> Result<(), TokenError>;
    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<(), TokenError>;
    /// Consume `amount` of the allowance `owner` granted to `spender`.
    fn spend_allowance(
        &mut self,
        owner: &Pubkey,
        spender: &Pubkey,
        amount: u128,
    ) -> Result<(), TokenError>;
    fn balance_of(&self, owner: &Pubkey) -> u128;
    fn total_supply(&self) -> u128;
}

/// The single underlying asset token.
pub trait AssetToken {
    /// Identity of the token, used to protect it from reward sweeps.
    fn id(&self) -> Pubkey;
    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<(), TokenError>;
    fn balance_of(&self, owner: &Pubkey) -> u128;
}

/// Swappable authorization predicate for owner-gated entrypoints.
pub trait Authorizer {
    fn is_owner(&self, who: &Pubkey) -> bool;
}

/// The default single-owner trust model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleOwner(pub Pubkey);

impl Authorizer for SingleOwner {
    fn is_owner(&self, who: &Pubkey) -> bool {
        *who == self.0
    }
}
