//! Vault state: position ledger, vesting schedule, fee engine

pub mod fees;
pub mod position;
pub mod vesting;

pub use fees::*;
pub use position::*;
pub use vesting::*;

/// Redemption mode. The switch is one-way: once Terminal, positions can no
/// longer be redeemed at par and the fungible withdraw/redeem pair opens up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionMode {
    Initial,
    Terminal,
}
