//! The vault: redemption-mode controller over the position ledger, vesting
//! schedule, reserve gateway and fee engine
//!
//! Collaborators are injected at construction and never named concretely.
//! Every public mutating entrypoint runs inside the entry-scoped
//! mutual-exclusion guard; all ledger validation happens before any
//! collaborator interaction, and ledger mutations commit last, so an aborted
//! call leaves the ledger untouched.

use pinocchio::pubkey::Pubkey;

use crate::adapters::{AssetToken, Authorizer, Reserve, ShareLedger, SingleOwner};
use crate::error::{VaultError, VaultResult};
use crate::events::Event;
use crate::gateway;
use crate::params::VaultParams;
use crate::state::{FeeEngine, PositionLedger, RedemptionMode, VestingSchedule};
use model_safety::math::{bps_ceil, mul_div_ceil, mul_div_floor, sub_u128, BPS_FULL};

/// Outcome of a deposit or mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipt {
    pub assets: u128,
    pub shares: u128,
    /// Set in Initial mode, where the shares are escrowed into a position
    pub position_id: Option<u64>,
}

pub struct Vault<L, Y, S, A, O = SingleOwner>
where
    L: Reserve,
    Y: Reserve,
    S: ShareLedger,
    A: AssetToken,
    O: Authorizer,
{
    /// The vault's own identity: escrow account for shares and assets
    id: Pubkey,
    auth: O,
    params: VaultParams,
    vesting: VestingSchedule,
    max_slippage_bps: u16,
    mode: RedemptionMode,
    paused: bool,
    deposits_enabled: bool,
    /// Entry-scoped mutual exclusion flag
    entered: bool,
    ledger: PositionLedger,
    fees: FeeEngine,
    liquid: L,
    yield_reserve: Y,
    shares: S,
    asset: A,
    events: Vec<Event>,
}

impl<L, Y, S, A> Vault<L, Y, S, A, SingleOwner>
where
    L: Reserve,
    Y: Reserve,
    S: ShareLedger,
    A: AssetToken,
{
    /// Construct with the default single-owner trust model.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Pubkey,
        owner: Pubkey,
        params: VaultParams,
        max_slippage_bps: u16,
        liquid: L,
        yield_reserve: Y,
        shares: S,
        asset: A,
        now: u64,
    ) -> VaultResult<Self> {
        Self::with_authorizer(
            id,
            SingleOwner(owner),
            params,
            max_slippage_bps,
            liquid,
            yield_reserve,
            shares,
            asset,
            now,
        )
    }
}

impl<L, Y, S, A, O> Vault<L, Y, S, A, O>
where
    L: Reserve,
    Y: Reserve,
    S: ShareLedger,
    A: AssetToken,
    O: Authorizer,
{
    #[allow(clippy::too_many_arguments)]
    pub fn with_authorizer(
        id: Pubkey,
        auth: O,
        params: VaultParams,
        max_slippage_bps: u16,
        liquid: L,
        yield_reserve: Y,
        shares: S,
        asset: A,
        now: u64,
    ) -> VaultResult<Self> {
        if id == Pubkey::default() {
            return Err(VaultError::ZeroAddress);
        }
        params.validate(now)?;
        if max_slippage_bps > BPS_FULL {
            return Err(VaultError::InvalidSlippage);
        }

        let mut vault = Self {
            id,
            auth,
            params,
            vesting: VestingSchedule::new(params.vesting_start, params.vesting_end),
            max_slippage_bps,
            mode: RedemptionMode::Initial,
            paused: false,
            deposits_enabled: true,
            entered: false,
            ledger: PositionLedger::new(),
            fees: FeeEngine::new(params.performance_fee_bps),
            liquid,
            yield_reserve,
            shares,
            asset,
            events: Vec::new(),
        };
        vault.record(Event::Initialized {
            treasury: params.treasury,
            performance_fee_bps: params.performance_fee_bps,
            redemption_fee_bps: params.redemption_fee_bps,
            vesting_start: params.vesting_start,
            vesting_end: params.vesting_end,
        });
        Ok(vault)
    }

    // ----- views -----

    pub fn mode(&self) -> RedemptionMode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn deposits_enabled(&self) -> bool {
        self.deposits_enabled
    }

    pub fn params(&self) -> &VaultParams {
        &self.params
    }

    pub fn max_slippage_bps(&self) -> u16 {
        self.max_slippage_bps
    }

    pub fn high_water_mark(&self) -> u128 {
        self.fees.high_water_mark
    }

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    pub fn total_redemption_liability(&self) -> u128 {
        self.ledger.total_redemption_liability
    }

    /// Asset value of the vault's liquid-reserve holding, computed on demand.
    pub fn liquid_value(&self) -> u128 {
        self.liquid.preview_redeem(self.liquid.balance_of(&self.id))
    }

    /// Asset value of the vault's yield-reserve holding, computed on demand.
    pub fn yield_value(&self) -> u128 {
        self.yield_reserve
            .preview_redeem(self.yield_reserve.balance_of(&self.id))
    }

    pub fn total_assets(&self) -> VaultResult<u128> {
        self.liquid_value()
            .checked_add(self.yield_value())
            .ok_or(VaultError::MathOverflow)
    }

    /// Shares of a position currently redeemable at par.
    pub fn redeemable_shares(&self, position_id: u64, now: u64) -> VaultResult<u128> {
        let pos = self.ledger.get(position_id)?;
        Ok(self.vesting.redeemable_shares(now, pos))
    }

    /// Drain the accumulated audit records.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ----- entrypoints -----

    /// Deposit assets. In Initial mode the minted shares are escrowed into a
    /// new position redeemable at par; in Terminal mode they go straight to
    /// the receiver.
    pub fn deposit(
        &mut self,
        caller: &Pubkey,
        assets: u128,
        receiver: &Pubkey,
    ) -> VaultResult<DepositReceipt> {
        self.with_entry_guard(|this| {
            this.ensure_not_paused()?;
            this.ensure_deposits_enabled()?;
            if assets == 0 {
                return Err(VaultError::ZeroValue);
            }
            let shares = this.shares_for_deposit(assets)?;
            this.enter_capital(caller, receiver, assets, shares)
        })
    }

    /// Mint an exact share count, pricing the required assets upward.
    pub fn mint(
        &mut self,
        caller: &Pubkey,
        shares: u128,
        receiver: &Pubkey,
    ) -> VaultResult<DepositReceipt> {
        self.with_entry_guard(|this| {
            this.ensure_not_paused()?;
            this.ensure_deposits_enabled()?;
            if shares == 0 {
                return Err(VaultError::ZeroValue);
            }
            let assets = this.assets_for_mint(shares)?;
            this.enter_capital(caller, receiver, assets, shares)
        })
    }

    /// Redeem locked shares of a position at par (Initial mode only).
    /// Bounded by the vesting schedule; charges the redemption fee; returns
    /// the net assets delivered to `receiver`.
    pub fn redeem_position(
        &mut self,
        caller: &Pubkey,
        position_id: u64,
        shares_to_burn: u128,
        receiver: &Pubkey,
        now: u64,
    ) -> VaultResult<u128> {
        self.with_entry_guard(|this| {
            this.ensure_not_paused()?;
            this.ensure_mode(RedemptionMode::Initial)?;

            let pos = this.ledger.get(position_id)?;
            if shares_to_burn > this.vesting.redeemable_shares(now, pos) {
                return Err(VaultError::NotEnoughRedeemableShares);
            }
            let pending = this.ledger.prepare_redeem(caller, position_id, shares_to_burn)?;

            let received = gateway::withdraw_from(
                &mut this.liquid,
                &this.asset,
                &this.id,
                pending.assets,
                this.max_slippage_bps,
            )?;
            let fee = bps_ceil(received, this.params.redemption_fee_bps)
                .ok_or(VaultError::MathOverflow)?;

            this.ledger
                .commit_redeem(&pending, this.vesting.window_opened(now));
            this.shares.burn(&this.id, shares_to_burn)?;

            let net = sub_u128(received, fee);
            this.asset.transfer(&this.id, receiver, net)?;
            if fee > 0 {
                this.asset.transfer(&this.id, &this.params.treasury, fee)?;
            }
            this.record(Event::PositionRedeemed {
                id: position_id,
                receiver: *receiver,
                shares: shares_to_burn,
                assets_requested: pending.assets,
                assets_received: received,
                fee,
            });
            Ok(net)
        })
    }

    /// Convert locked shares of a position into freely held shares,
    /// permanently forfeiting the par-redemption right on that portion.
    /// Not vesting-gated; no underlying assets move.
    pub fn claim(
        &mut self,
        caller: &Pubkey,
        position_id: u64,
        shares_to_claim: u128,
        receiver: &Pubkey,
        now: u64,
    ) -> VaultResult<u128> {
        self.with_entry_guard(|this| {
            this.ensure_not_paused()?;
            this.ensure_mode(RedemptionMode::Initial)?;

            let pending = this
                .ledger
                .prepare_redeem(caller, position_id, shares_to_claim)?;
            this.shares.transfer(&this.id, receiver, shares_to_claim)?;
            this.ledger
                .commit_redeem(&pending, this.vesting.window_opened(now));

            this.record(Event::Claimed {
                id: position_id,
                receiver: *receiver,
                shares: shares_to_claim,
                assets_forfeited: pending.assets,
            });
            Ok(pending.assets)
        })
    }

    /// Fungible withdrawal at NAV (Terminal mode only). Burns the ceiling
    /// share count for `assets`; supports delegated calls via allowance.
    /// Returns the shares burned.
    pub fn withdraw(
        &mut self,
        caller: &Pubkey,
        assets: u128,
        receiver: &Pubkey,
        owner: &Pubkey,
    ) -> VaultResult<u128> {
        self.with_entry_guard(|this| {
            this.ensure_not_paused()?;
            this.ensure_mode(RedemptionMode::Terminal)?;
            if assets == 0 {
                return Err(VaultError::ZeroValue);
            }
            let shares_needed = this.shares_for_withdraw(assets)?;
            if caller != owner {
                this.shares.spend_allowance(owner, caller, shares_needed)?;
            }

            let received = gateway::withdraw_from(
                &mut this.liquid,
                &this.asset,
                &this.id,
                assets,
                this.max_slippage_bps,
            )?;
            this.shares.burn(owner, shares_needed)?;
            this.asset.transfer(&this.id, receiver, received)?;

            this.record(Event::Withdrawn {
                owner: *owner,
                receiver: *receiver,
                assets: received,
                shares: shares_needed,
            });
            Ok(shares_needed)
        })
    }

    /// Fungible redemption at NAV (Terminal mode only). Burns an exact share
    /// count for the floor asset value. Returns the assets delivered.
    pub fn redeem(
        &mut self,
        caller: &Pubkey,
        shares_to_burn: u128,
        receiver: &Pubkey,
        owner: &Pubkey,
    ) -> VaultResult<u128> {
        self.with_entry_guard(|this| {
            this.ensure_not_paused()?;
            this.ensure_mode(RedemptionMode::Terminal)?;
            if shares_to_burn == 0 {
                return Err(VaultError::ZeroValue);
            }
            let assets = this.assets_for_redeem(shares_to_burn)?;
            if assets == 0 {
                return Err(VaultError::ZeroValue);
            }
            if caller != owner {
                this.shares.spend_allowance(owner, caller, shares_to_burn)?;
            }

            let received = gateway::withdraw_from(
                &mut this.liquid,
                &this.asset,
                &this.id,
                assets,
                this.max_slippage_bps,
            )?;
            this.shares.burn(owner, shares_to_burn)?;
            this.asset.transfer(&this.id, receiver, received)?;

            this.record(Event::Withdrawn {
                owner: *owner,
                receiver: *receiver,
                assets: received,
                shares: shares_to_burn,
            });
            Ok(received)
        })
    }

    /// Sweep liquid-reserve surplus above the redemption liability into the
    /// yield reserve. Permissionless; dead once Terminal. Returns the amount
    /// moved.
    pub fn vest(&mut self) -> VaultResult<u128> {
        self.with_entry_guard(|this| {
            this.ensure_not_paused()?;
            this.ensure_mode(RedemptionMode::Initial)?;

            let value = this.liquid_value();
            let liability = this.ledger.total_redemption_liability;
            if value <= liability {
                return Ok(0);
            }
            let surplus = value - liability;

            let received = gateway::withdraw_from(
                &mut this.liquid,
                &this.asset,
                &this.id,
                surplus,
                this.max_slippage_bps,
            )?;
            gateway::deposit_to(&mut this.yield_reserve, &this.id, received, this.max_slippage_bps)?;

            this.record(Event::Vested { moved: received });
            Ok(received)
        })
    }

    /// Pull capital back from the yield reserve into the liquid reserve, up
    /// to the yield reserve's momentary capacity. Owner only; callable
    /// repeatedly. Returns the amount moved.
    pub fn liquidate(&mut self, caller: &Pubkey) -> VaultResult<u128> {
        self.with_entry_guard(|this| {
            this.ensure_not_paused()?;
            this.ensure_owner(caller)?;

            let available = this.yield_reserve.max_withdraw();
            if available == 0 {
                return Ok(0);
            }

            let received = gateway::withdraw_from(
                &mut this.yield_reserve,
                &this.asset,
                &this.id,
                available,
                this.max_slippage_bps,
            )?;
            gateway::deposit_to(&mut this.liquid, &this.id, received, this.max_slippage_bps)?;

            this.record(Event::Liquidated { moved: received });
            Ok(received)
        })
    }

    /// Charge the performance fee above the high-water mark, paying the
    /// treasury in liquid-reserve shares. Permissionless; not gated by
    /// pause. Returns the fee in asset units (zero when no new high).
    pub fn take_performance_fees(&mut self) -> VaultResult<u128> {
        self.with_entry_guard(|this| {
            let total = this.total_assets()?;
            let supply = this.shares.total_supply();
            let Some(assessment) = this.fees.assess(total, supply)? else {
                return Ok(0);
            };

            let mut fee_shares = 0;
            if assessment.fee_assets > 0 {
                fee_shares = this.liquid.preview_withdraw(assessment.fee_assets);
                this.liquid
                    .transfer_shares(&this.params.treasury, fee_shares)?;
            }
            // The mark moves only after extraction succeeded, and even when
            // the fee rounded to zero.
            this.fees.commit(assessment.nav_per_share);

            this.record(Event::FeesTaken {
                nav_per_share: assessment.nav_per_share,
                fee_assets: assessment.fee_assets,
                fee_shares,
            });
            Ok(assessment.fee_assets)
        })
    }

    // ----- administrative surface -----

    /// One-way switch to Terminal mode. Idempotent.
    pub fn enable_terminal_mode(&mut self, caller: &Pubkey) -> VaultResult<()> {
        self.ensure_owner(caller)?;
        if self.mode == RedemptionMode::Terminal {
            return Ok(());
        }
        self.mode = RedemptionMode::Terminal;
        self.record(Event::TerminalModeEnabled);
        Ok(())
    }

    pub fn set_paused(&mut self, caller: &Pubkey, paused: bool) -> VaultResult<()> {
        self.ensure_owner(caller)?;
        self.paused = paused;
        self.record(Event::PausedSet { paused });
        Ok(())
    }

    pub fn set_deposits_enabled(&mut self, caller: &Pubkey, enabled: bool) -> VaultResult<()> {
        self.ensure_owner(caller)?;
        self.deposits_enabled = enabled;
        self.record(Event::DepositsEnabledSet { enabled });
        Ok(())
    }

    pub fn set_max_slippage(&mut self, caller: &Pubkey, bps: u16) -> VaultResult<()> {
        self.ensure_owner(caller)?;
        if bps > BPS_FULL {
            return Err(VaultError::InvalidSlippage);
        }
        self.max_slippage_bps = bps;
        self.record(Event::MaxSlippageSet { bps });
        Ok(())
    }

    /// Sweep a stray token's full vault balance to the treasury. Refuses the
    /// underlying asset.
    pub fn sweep_rewards<T: AssetToken>(
        &mut self,
        caller: &Pubkey,
        token: &mut T,
    ) -> VaultResult<u128> {
        self.with_entry_guard(|this| {
            this.ensure_owner(caller)?;
            if token.id() == this.asset.id() {
                return Err(VaultError::SweepProtectedToken);
            }
            let amount = token.balance_of(&this.id);
            if amount == 0 {
                return Ok(0);
            }
            token.transfer(&this.id, &this.params.treasury, amount)?;
            this.record(Event::RewardsSwept {
                token: token.id(),
                amount,
            });
            Ok(amount)
        })
    }

    // ----- internals -----

    fn with_entry_guard<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> VaultResult<T>,
    ) -> VaultResult<T> {
        if self.entered {
            return Err(VaultError::Reentrancy);
        }
        self.entered = true;
        let out = f(self);
        self.entered = false;
        out
    }

    fn ensure_not_paused(&self) -> VaultResult<()> {
        if self.paused {
            return Err(VaultError::Paused);
        }
        Ok(())
    }

    fn ensure_deposits_enabled(&self) -> VaultResult<()> {
        if !self.deposits_enabled {
            return Err(VaultError::DepositsDisabled);
        }
        Ok(())
    }

    fn ensure_mode(&self, mode: RedemptionMode) -> VaultResult<()> {
        if self.mode != mode {
            return Err(VaultError::WrongMode);
        }
        Ok(())
    }

    fn ensure_owner(&self, caller: &Pubkey) -> VaultResult<()> {
        if !self.auth.is_owner(caller) {
            return Err(VaultError::Unauthorized);
        }
        Ok(())
    }

    /// Shared deposit/mint tail: pull assets, feed the liquid reserve, mint
    /// shares per mode. Ledger mutation commits last.
    fn enter_capital(
        &mut self,
        caller: &Pubkey,
        receiver: &Pubkey,
        assets: u128,
        shares: u128,
    ) -> VaultResult<DepositReceipt> {
        if *receiver == Pubkey::default() {
            return Err(VaultError::ZeroAddress);
        }
        if shares == 0 || assets == 0 {
            return Err(VaultError::ZeroValue);
        }

        self.asset.transfer(caller, &self.id, assets)?;
        gateway::deposit_to(&mut self.liquid, &self.id, assets, self.max_slippage_bps)?;

        let position_id = match self.mode {
            RedemptionMode::Initial => {
                self.shares.mint(&self.id, shares)?;
                let id = self.ledger.create_position(*receiver, assets, shares)?;
                self.record(Event::PositionOpened {
                    id,
                    owner: *receiver,
                    assets,
                    shares,
                });
                Some(id)
            }
            RedemptionMode::Terminal => {
                self.shares.mint(receiver, shares)?;
                None
            }
        };

        self.record(Event::Deposited {
            sender: *caller,
            receiver: *receiver,
            assets,
            shares,
        });
        Ok(DepositReceipt {
            assets,
            shares,
            position_id,
        })
    }

    /// floor(assets * supply / total); 1:1 while the vault is empty.
    fn shares_for_deposit(&self, assets: u128) -> VaultResult<u128> {
        let supply = self.shares.total_supply();
        let total = self.total_assets()?;
        if supply == 0 || total == 0 {
            return Ok(assets);
        }
        mul_div_floor(assets, supply, total).ok_or(VaultError::MathOverflow)
    }

    /// ceil(shares * total / supply); 1:1 while the vault is empty.
    fn assets_for_mint(&self, shares: u128) -> VaultResult<u128> {
        let supply = self.shares.total_supply();
        let total = self.total_assets()?;
        if supply == 0 || total == 0 {
            return Ok(shares);
        }
        mul_div_ceil(shares, total, supply).ok_or(VaultError::MathOverflow)
    }

    /// ceil(assets * supply / total) - the share cost of an exact-asset exit.
    fn shares_for_withdraw(&self, assets: u128) -> VaultResult<u128> {
        let supply = self.shares.total_supply();
        let total = self.total_assets()?;
        if supply == 0 || total == 0 {
            return Err(VaultError::ZeroValue);
        }
        mul_div_ceil(assets, supply, total).ok_or(VaultError::MathOverflow)
    }

    /// floor(shares * total / supply) - the asset value of an exact-share exit.
    fn assets_for_redeem(&self, shares: u128) -> VaultResult<u128> {
        let supply = self.shares.total_supply();
        let total = self.total_assets()?;
        if supply == 0 || total == 0 {
            return Err(VaultError::ZeroValue);
        }
        mul_div_floor(shares, total, supply).ok_or(VaultError::MathOverflow)
    }

    fn record(&mut self, event: Event) {
        log::debug!(target: "reservoir", "{:?}", event);
        self.events.push(event);
    }
}
