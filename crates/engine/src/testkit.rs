//! In-memory mock collaborators for tests and the keeper scenario runner
//!
//! All mocks are cheap `Rc` handles: the vault owns one handle and the test
//! harness keeps another to read balances and turn misbehavior knobs
//! (delivery slippage, preview skimming, withdrawal rate limits).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pinocchio::pubkey::Pubkey;

use crate::adapters::{AssetToken, Reserve, ShareLedger};
use crate::error::{ReserveError, TokenError};
use model_safety::math::{mul_div_ceil_sat, mul_div_floor_sat, BPS_DENOM};

/// Distinct test identity from a single byte.
pub fn key(byte: u8) -> Pubkey {
    [byte; 32]
}

/// A fungible ledger: balances, allowances, supply.
#[derive(Debug, Default)]
pub struct TokenBook {
    balances: HashMap<Pubkey, u128>,
    allowances: HashMap<(Pubkey, Pubkey), u128>,
    supply: u128,
}

pub type SharedBook = Rc<RefCell<TokenBook>>;

impl TokenBook {
    pub fn mint(&mut self, to: &Pubkey, amount: u128) {
        *self.balances.entry(*to).or_default() += amount;
        self.supply += amount;
    }

    pub fn burn(&mut self, from: &Pubkey, amount: u128) -> Result<(), TokenError> {
        let bal = self.balances.entry(*from).or_default();
        if *bal < amount {
            return Err(TokenError::InsufficientBalance);
        }
        *bal -= amount;
        self.supply -= amount;
        Ok(())
    }

    pub fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<(), TokenError> {
        let bal = self.balances.entry(*from).or_default();
        if *bal < amount {
            return Err(TokenError::InsufficientBalance);
        }
        *bal -= amount;
        *self.balances.entry(*to).or_default() += amount;
        Ok(())
    }

    pub fn approve(&mut self, owner: &Pubkey, spender: &Pubkey, amount: u128) {
        self.allowances.insert((*owner, *spender), amount);
    }

    pub fn spend_allowance(
        &mut self,
        owner: &Pubkey,
        spender: &Pubkey,
        amount: u128,
    ) -> Result<(), TokenError> {
        let allowed = self.allowances.entry((*owner, *spender)).or_default();
        if *allowed < amount {
            return Err(TokenError::InsufficientAllowance);
        }
        *allowed -= amount;
        Ok(())
    }

    pub fn balance_of(&self, who: &Pubkey) -> u128 {
        self.balances.get(who).copied().unwrap_or(0)
    }

    pub fn supply(&self) -> u128 {
        self.supply
    }
}

/// Mock underlying asset token.
#[derive(Clone)]
pub struct MockAsset {
    token_id: Pubkey,
    book: SharedBook,
}

impl MockAsset {
    pub fn new(id_byte: u8) -> Self {
        Self {
            token_id: key(id_byte),
            book: Rc::new(RefCell::new(TokenBook::default())),
        }
    }

    pub fn book(&self) -> SharedBook {
        self.book.clone()
    }

    pub fn mint_to(&self, who: &Pubkey, amount: u128) {
        self.book.borrow_mut().mint(who, amount);
    }
}

impl AssetToken for MockAsset {
    fn id(&self) -> Pubkey {
        self.token_id
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<(), TokenError> {
        self.book.borrow_mut().transfer(from, to, amount)
    }

    fn balance_of(&self, owner: &Pubkey) -> u128 {
        self.book.borrow().balance_of(owner)
    }
}

/// Mock vault share token.
#[derive(Clone)]
pub struct MockShares {
    book: SharedBook,
}

impl MockShares {
    pub fn new() -> Self {
        Self {
            book: Rc::new(RefCell::new(TokenBook::default())),
        }
    }

    pub fn approve(&self, owner: &Pubkey, spender: &Pubkey, amount: u128) {
        self.book.borrow_mut().approve(owner, spender, amount);
    }
}

impl Default for MockShares {
    fn default() -> Self {
        Self::new()
    }
}

impl ShareLedger for MockShares {
    fn mint(&mut self, to: &Pubkey, amount: u128) -> Result<(), TokenError> {
        self.book.borrow_mut().mint(to, amount);
        Ok(())
    }

    fn burn(&mut self, from: &Pubkey, amount: u128) -> Result<(), TokenError> {
        self.book.borrow_mut().burn(from, amount)
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<(), TokenError> {
        self.book.borrow_mut().transfer(from, to, amount)
    }

    fn spend_allowance(
        &mut self,
        owner: &Pubkey,
        spender: &Pubkey,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.book.borrow_mut().spend_allowance(owner, spender, amount)
    }

    fn balance_of(&self, owner: &Pubkey) -> u128 {
        self.book.borrow().balance_of(owner)
    }

    fn total_supply(&self) -> u128 {
        self.book.borrow().supply()
    }
}

#[derive(Debug)]
struct ReserveInner {
    share_balances: HashMap<Pubkey, u128>,
    total_shares: u128,
    total_assets: u128,
    /// bps of every withdrawal the reserve fails to deliver
    withdraw_slippage_bps: u16,
    /// shares short-minted on every deposit (preview noncompliance)
    deposit_share_skim: u128,
    /// momentary withdrawal capacity cap
    withdraw_limit: Option<u128>,
}

/// Mock tokenized reserve backed by the shared asset book.
#[derive(Clone)]
pub struct MockReserve {
    pub id: Pubkey,
    caller: Pubkey,
    asset: SharedBook,
    inner: Rc<RefCell<ReserveInner>>,
}

impl MockReserve {
    pub fn new(id_byte: u8, caller: Pubkey, asset: SharedBook) -> Self {
        Self {
            id: key(id_byte),
            caller,
            asset,
            inner: Rc::new(RefCell::new(ReserveInner {
                share_balances: HashMap::new(),
                total_shares: 0,
                total_assets: 0,
                withdraw_slippage_bps: 0,
                deposit_share_skim: 0,
                withdraw_limit: None,
            })),
        }
    }

    /// A handle to the same reserve as seen from a different caller.
    pub fn clone_for(other: &MockReserve, caller: Pubkey) -> Self {
        Self {
            id: other.id,
            caller,
            asset: other.asset.clone(),
            inner: other.inner.clone(),
        }
    }

    /// Force-seed the reserve with an arbitrary assets/shares ratio.
    pub fn deposit_raw(&mut self, assets: u128, shares: u128) {
        self.asset
            .borrow_mut()
            .transfer(&self.caller, &self.id, assets)
            .expect("seed caller unfunded");
        let mut inner = self.inner.borrow_mut();
        *inner.share_balances.entry(self.caller).or_default() += shares;
        inner.total_shares += shares;
        inner.total_assets += assets;
    }

    /// Let the reserve appreciate: value grows without new shares.
    pub fn accrue(&self, profit: u128) {
        self.asset.borrow_mut().mint(&self.id, profit);
        self.inner.borrow_mut().total_assets += profit;
    }

    pub fn set_withdraw_slippage_bps(&self, bps: u16) {
        self.inner.borrow_mut().withdraw_slippage_bps = bps;
    }

    pub fn set_deposit_share_skim(&self, shares: u128) {
        self.inner.borrow_mut().deposit_share_skim = shares;
    }

    pub fn set_withdraw_limit(&self, limit: Option<u128>) {
        self.inner.borrow_mut().withdraw_limit = limit;
    }

    pub fn total_assets(&self) -> u128 {
        self.inner.borrow().total_assets
    }

    /// Asset value of `owner`'s reserve shares.
    pub fn value_of(&self, owner: &Pubkey) -> u128 {
        self.preview_redeem(self.balance_of(owner))
    }
}

impl Reserve for MockReserve {
    fn deposit(&mut self, assets: u128) -> Result<u128, ReserveError> {
        let quoted = self.preview_deposit(assets);
        self.asset
            .borrow_mut()
            .transfer(&self.caller, &self.id, assets)
            .map_err(|_| ReserveError::DepositRejected)?;
        let mut inner = self.inner.borrow_mut();
        let minted = quoted.saturating_sub(inner.deposit_share_skim);
        *inner.share_balances.entry(self.caller).or_default() += minted;
        inner.total_shares += minted;
        inner.total_assets += assets;
        Ok(minted)
    }

    fn withdraw(&mut self, assets: u128) -> Result<u128, ReserveError> {
        let shares_needed = self.preview_withdraw(assets);
        let delivered;
        {
            let mut inner = self.inner.borrow_mut();
            if assets > inner.total_assets {
                return Err(ReserveError::WithdrawRejected);
            }
            let bal = inner.share_balances.entry(self.caller).or_default();
            if *bal < shares_needed {
                return Err(ReserveError::InsufficientShares);
            }
            *bal -= shares_needed;
            inner.total_shares -= shares_needed;
            inner.total_assets -= assets;
            let skim = mul_div_floor_sat(assets, inner.withdraw_slippage_bps as u128, BPS_DENOM);
            delivered = assets - skim;
        }
        self.asset
            .borrow_mut()
            .transfer(&self.id, &self.caller, delivered)
            .map_err(|_| ReserveError::WithdrawRejected)?;
        Ok(shares_needed)
    }

    fn preview_deposit(&self, assets: u128) -> u128 {
        let inner = self.inner.borrow();
        if inner.total_shares == 0 || inner.total_assets == 0 {
            assets
        } else {
            mul_div_floor_sat(assets, inner.total_shares, inner.total_assets)
        }
    }

    fn preview_redeem(&self, shares: u128) -> u128 {
        let inner = self.inner.borrow();
        if inner.total_shares == 0 {
            // 1:1 while empty, mirroring preview_deposit
            shares
        } else {
            mul_div_floor_sat(shares, inner.total_assets, inner.total_shares)
        }
    }

    fn preview_withdraw(&self, assets: u128) -> u128 {
        let inner = self.inner.borrow();
        if inner.total_shares == 0 || inner.total_assets == 0 {
            assets
        } else {
            mul_div_ceil_sat(assets, inner.total_shares, inner.total_assets)
        }
    }

    fn max_withdraw(&self) -> u128 {
        let inner = self.inner.borrow();
        let bal = inner.share_balances.get(&self.caller).copied().unwrap_or(0);
        let value = if inner.total_shares == 0 {
            0
        } else {
            mul_div_floor_sat(bal, inner.total_assets, inner.total_shares)
        };
        let value = value.min(inner.total_assets);
        match inner.withdraw_limit {
            Some(limit) => value.min(limit),
            None => value,
        }
    }

    fn balance_of(&self, owner: &Pubkey) -> u128 {
        self.inner
            .borrow()
            .share_balances
            .get(owner)
            .copied()
            .unwrap_or(0)
    }

    fn transfer_shares(&mut self, to: &Pubkey, shares: u128) -> Result<(), ReserveError> {
        let mut inner = self.inner.borrow_mut();
        let bal = inner.share_balances.entry(self.caller).or_default();
        if *bal < shares {
            return Err(ReserveError::InsufficientShares);
        }
        *bal -= shares;
        *inner.share_balances.entry(*to).or_default() += shares;
        Ok(())
    }
}
