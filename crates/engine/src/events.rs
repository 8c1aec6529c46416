//! Typed audit records - the externally visible trail of every state change

use pinocchio::pubkey::Pubkey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Initialized {
        treasury: Pubkey,
        performance_fee_bps: u16,
        redemption_fee_bps: u16,
        vesting_start: u64,
        vesting_end: u64,
    },
    Deposited {
        sender: Pubkey,
        receiver: Pubkey,
        assets: u128,
        shares: u128,
    },
    PositionOpened {
        id: u64,
        owner: Pubkey,
        assets: u128,
        shares: u128,
    },
    PositionRedeemed {
        id: u64,
        receiver: Pubkey,
        shares: u128,
        assets_requested: u128,
        assets_received: u128,
        fee: u128,
    },
    Claimed {
        id: u64,
        receiver: Pubkey,
        shares: u128,
        assets_forfeited: u128,
    },
    Withdrawn {
        owner: Pubkey,
        receiver: Pubkey,
        assets: u128,
        shares: u128,
    },
    Vested {
        moved: u128,
    },
    Liquidated {
        moved: u128,
    },
    FeesTaken {
        nav_per_share: u128,
        fee_assets: u128,
        fee_shares: u128,
    },
    TerminalModeEnabled,
    PausedSet {
        paused: bool,
    },
    DepositsEnabledSet {
        enabled: bool,
    },
    MaxSlippageSet {
        bps: u16,
    },
    RewardsSwept {
        token: Pubkey,
        amount: u128,
    },
}
