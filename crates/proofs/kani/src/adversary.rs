//! Adversarial step generator

#[cfg(kani)]
use kani::any;
use model_safety::{state::*, transitions::*};

#[derive(Clone, Copy)]
pub enum Step {
    Deposit,
    Redeem,
    Claim,
    Vest,
    Liquidate,
    TakeFees,
    EnableTerminal,
    WithdrawTerminal,
    AdvanceTime,
}

#[cfg(kani)]
impl kani::Arbitrary for Step {
    fn any() -> Self {
        let choice: u8 = any();
        match choice % 9 {
            0 => Step::Deposit,
            1 => Step::Redeem,
            2 => Step::Claim,
            3 => Step::Vest,
            4 => Step::Liquidate,
            5 => Step::TakeFees,
            6 => Step::EnableTerminal,
            7 => Step::WithdrawTerminal,
            _ => Step::AdvanceTime,
        }
    }
}

#[cfg(kani)]
pub fn adversary_step(s: State) -> State {
    let idx: usize = {
        let raw: u8 = any();
        if s.positions.is_empty() {
            0
        } else {
            (raw as usize) % s.positions.len()
        }
    };

    match any::<Step>() {
        Step::Deposit => {
            let owner: u8 = any();
            let amount: u16 = any();
            deposit(s, owner % 4, amount as u128)
        }
        Step::Redeem => {
            let shares: u16 = any();
            redeem(s, idx, shares as u128)
        }
        Step::Claim => {
            let shares: u16 = any();
            claim(s, idx, shares as u128)
        }
        Step::Vest => vest(s),
        Step::Liquidate => liquidate(s),
        Step::TakeFees => take_fees(s),
        Step::EnableTerminal => enable_terminal(s),
        Step::WithdrawTerminal => {
            let assets: u16 = any();
            withdraw_terminal(s, assets as u128)
        }
        Step::AdvanceTime => {
            let dt: u16 = any();
            advance_time(s, dt as u64)
        }
    }
}
