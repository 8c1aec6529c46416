//! End-to-end vault scenarios against mock collaborators

use model_safety::math::UNIT;
use reservoir_engine::{AssetToken, RedemptionMode, ShareLedger, VaultError};
use reservoir_integration_tests::*;

#[test]
fn scenario_a_deposit_and_par_redeem_before_window() {
    let mut h = Harness::default_vault();

    let receipt = h.vault.deposit(&ALICE, 1_000, &ALICE).unwrap();
    assert_eq!(receipt.shares, 1_000);

    let pos = *h.vault.ledger().get(0).unwrap();
    assert_eq!((pos.assets, pos.shares, pos.total_shares), (1_000, 1_000, 1_000));
    assert_eq!(h.vault.total_redemption_liability(), 1_000);

    // Redeem 500 with zero fee and zero slippage, before the window opens
    let net = h.vault.redeem_position(&ALICE, 0, 500, &ALICE, T0).unwrap();
    assert_eq!(net, 500);

    let pos = *h.vault.ledger().get(0).unwrap();
    assert_eq!((pos.assets, pos.shares, pos.total_shares), (500, 500, 500));
    assert_eq!(h.vault.total_redemption_liability(), 500);
}

#[test]
fn scenario_b_vesting_rate_halfway_through_window() {
    let mut h = Harness::default_vault();
    h.vault.deposit(&ALICE, 1_000, &ALICE).unwrap();

    let start = T0 + DAY;
    let halfway = start + 15 * DAY;
    assert_eq!(h.vault.redeemable_shares(0, halfway).unwrap(), 500);

    // 500 redeemable at the halfway mark, 501 is over the line
    assert_eq!(
        h.vault.redeem_position(&ALICE, 0, 501, &ALICE, halfway),
        Err(VaultError::NotEnoughRedeemableShares)
    );
    assert_eq!(
        h.vault.redeem_position(&ALICE, 0, 500, &ALICE, halfway).unwrap(),
        500
    );
}

#[test]
fn scenario_c_redemption_fee_splits_to_treasury() {
    let mut h = Harness::new(Harness::params(0, 100), 0);
    h.vault.deposit(&ALICE, 1_000, &ALICE).unwrap();

    let treasury_before = h.asset.balance_of(&TREASURY);
    let alice_before = h.asset.balance_of(&ALICE);

    // Assets-equivalent 100: fee = ceil(100 * 100 / 10_000) = 1
    let net = h.vault.redeem_position(&ALICE, 0, 100, &ALICE, T0).unwrap();
    assert_eq!(net, 99);
    assert_eq!(h.asset.balance_of(&ALICE) - alice_before, 99);
    assert_eq!(h.asset.balance_of(&TREASURY) - treasury_before, 1);
}

#[test]
fn scenario_d_terminal_mode_flips_the_gates() {
    let mut h = Harness::default_vault();
    h.vault.deposit(&ALICE, 1_000, &ALICE).unwrap();
    h.vault.claim(&ALICE, 0, 1_000, &ALICE, T0).unwrap();

    // Terminal-only operations are dead while Initial
    assert_eq!(
        h.vault.withdraw(&ALICE, 100, &ALICE, &ALICE),
        Err(VaultError::WrongMode)
    );
    assert_eq!(
        h.vault.redeem(&ALICE, 100, &ALICE, &ALICE),
        Err(VaultError::WrongMode)
    );

    h.vault.enable_terminal_mode(&OWNER).unwrap();
    assert_eq!(h.vault.mode(), RedemptionMode::Terminal);

    // Initial-only operations now fail with a mode error
    assert_eq!(h.vault.vest(), Err(VaultError::WrongMode));
    assert_eq!(
        h.vault.redeem_position(&ALICE, 0, 100, &ALICE, T0),
        Err(VaultError::WrongMode)
    );

    // The fungible pair succeeds for held shares
    assert_eq!(h.vault.withdraw(&ALICE, 100, &ALICE, &ALICE).unwrap(), 100);
    assert_eq!(h.vault.redeem(&ALICE, 900, &ALICE, &ALICE).unwrap(), 900);
    assert_eq!(h.shares.total_supply(), 0);
}

#[test]
fn scenario_e_performance_fee_on_doubled_nav() {
    let mut h = Harness::new(Harness::params(2_000, 0), 0);
    h.vault.deposit(&ALICE, 1_000, &ALICE).unwrap();
    assert_eq!(h.vault.high_water_mark(), UNIT);

    // Reserve value doubles NAV-per-share
    h.liquid.accrue(1_000);
    let fee = h.vault.take_performance_fees().unwrap();
    // fee = (2 - 1) * supply * 20%
    assert_eq!(fee, 200);
    assert_eq!(h.vault.high_water_mark(), 2 * UNIT);
    assert_eq!(h.liquid.value_of(&TREASURY), 200);

    // A second immediate call with no further NAV change returns 0
    assert_eq!(h.vault.take_performance_fees().unwrap(), 0);
    assert_eq!(h.vault.high_water_mark(), 2 * UNIT);
}

#[test]
fn deposit_then_full_redeem_is_identity() {
    let mut h = Harness::default_vault();
    let before = h.asset.balance_of(&ALICE);

    h.vault.deposit(&ALICE, 123_457, &ALICE).unwrap();
    let net = h
        .vault
        .redeem_position(&ALICE, 0, 123_457, &ALICE, T0)
        .unwrap();
    assert_eq!(net, 123_457);
    assert_eq!(h.asset.balance_of(&ALICE), before);
}

#[test]
fn enabling_terminal_twice_equals_once() {
    let mut h = Harness::default_vault();
    h.vault.enable_terminal_mode(&OWNER).unwrap();
    let events_after_first = h.vault.take_events();
    assert!(events_after_first
        .iter()
        .any(|e| matches!(e, reservoir_engine::Event::TerminalModeEnabled)));

    h.vault.enable_terminal_mode(&OWNER).unwrap();
    assert_eq!(h.vault.mode(), RedemptionMode::Terminal);
    // The second call records nothing
    assert!(h.vault.take_events().is_empty());
}

#[test]
fn redeemable_is_zero_for_every_position_after_window_end() {
    let mut h = Harness::default_vault();
    h.vault.deposit(&ALICE, 1_000, &ALICE).unwrap();
    h.vault.deposit(&BOB, 555, &BOB).unwrap();
    // Partially drain one position first
    h.vault.redeem_position(&ALICE, 0, 100, &ALICE, T0).unwrap();

    let past_end = T0 + DAY + 31 * DAY;
    assert_eq!(h.vault.redeemable_shares(0, past_end).unwrap(), 0);
    assert_eq!(h.vault.redeemable_shares(1, past_end).unwrap(), 0);
}

#[test]
fn vest_is_noop_when_liquid_covers_liability_only() {
    let mut h = Harness::default_vault();
    h.vault.deposit(&ALICE, 1_000, &ALICE).unwrap();

    // Liquid value == liability: nothing to sweep
    assert_eq!(h.vault.vest().unwrap(), 0);
    assert_eq!(h.vault.yield_value(), 0);

    // Appreciation pushes liquid value above the liability; only the
    // surplus moves
    h.liquid.accrue(300);
    assert_eq!(h.vault.vest().unwrap(), 300);
    assert_eq!(h.vault.liquid_value(), 1_000);
    assert_eq!(h.vault.yield_value(), 300);
}

#[test]
fn claim_then_vest_then_liquidate_cycle() {
    let mut h = Harness::default_vault();
    h.vault.deposit(&ALICE, 10_000, &ALICE).unwrap();

    // Alice gives up par on 40%: the freed capital vests into yield
    h.vault.claim(&ALICE, 0, 4_000, &ALICE, T0).unwrap();
    assert_eq!(h.vault.vest().unwrap(), 4_000);
    assert_eq!(h.vault.liquid_value(), 6_000);
    assert_eq!(h.vault.yield_value(), 4_000);

    // The owner pulls it back for redemptions
    assert_eq!(h.vault.liquidate(&OWNER).unwrap(), 4_000);
    assert_eq!(h.vault.liquid_value(), 10_000);
    assert_eq!(h.vault.yield_value(), 0);

    // Par redemption for the remaining locked shares still works in full
    let net = h
        .vault
        .redeem_position(&ALICE, 0, 6_000, &ALICE, T0)
        .unwrap();
    assert_eq!(net, 6_000);
    assert_eq!(h.vault.total_redemption_liability(), 0);
}

#[test]
fn hwm_never_decreases_across_a_session() {
    let mut h = Harness::new(Harness::params(2_000, 0), 0);
    h.vault.deposit(&ALICE, 1_000, &ALICE).unwrap();

    let mut last = h.vault.high_water_mark();
    for accrual in [500u128, 0, 250, 0, 1_000] {
        if accrual > 0 {
            h.liquid.accrue(accrual);
        }
        let _ = h.vault.take_performance_fees().unwrap();
        let mark = h.vault.high_water_mark();
        assert!(mark >= last, "mark decreased: {} -> {}", last, mark);
        last = mark;
    }
}

#[test]
fn liability_matches_positions_exactly_at_zero_slippage() {
    let mut h = Harness::default_vault();
    h.vault.deposit(&ALICE, 1_000, &ALICE).unwrap();
    h.vault.deposit(&BOB, 2_500, &BOB).unwrap();

    h.vault.redeem_position(&ALICE, 0, 333, &ALICE, T0).unwrap();
    h.vault.claim(&BOB, 1, 777, &BOB, T0).unwrap();
    h.vault.redeem_position(&BOB, 1, 1_000, &BOB, T0).unwrap();

    assert_eq!(
        h.vault.total_redemption_liability(),
        h.positions_assets_sum()
    );
}
