//! Property tests: ledger invariants under random operation sequences

use model_safety::math::BPS_FULL;
use proptest::prelude::*;
use reservoir_engine::{AssetToken, ShareLedger, VestingSchedule};
use reservoir_integration_tests::*;

#[derive(Debug, Clone)]
enum Op {
    Deposit(u32),
    Redeem { pos: u8, frac_bps: u16 },
    Claim { pos: u8, frac_bps: u16 },
    Vest,
    Liquidate,
    TakeFees,
    Accrue(u32),
    Advance(u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u32..1_000_000).prop_map(Op::Deposit),
        (any::<u8>(), 0u16..20_000).prop_map(|(pos, frac_bps)| Op::Redeem { pos, frac_bps }),
        (any::<u8>(), 0u16..20_000).prop_map(|(pos, frac_bps)| Op::Claim { pos, frac_bps }),
        Just(Op::Vest),
        Just(Op::Liquidate),
        Just(Op::TakeFees),
        (1u32..500_000).prop_map(Op::Accrue),
        (0u32..200_000).prop_map(Op::Advance),
    ]
}

proptest! {
    /// At zero slippage the ledger invariants hold after every operation:
    /// liability equals the sum of position assets, locked shares stay
    /// within their denominator, the escrow matches the locked total, and
    /// the high-water mark is monotone.
    #[test]
    fn prop_ledger_invariants_under_random_ops(
        ops in proptest::collection::vec(op_strategy(), 1..40)
    ) {
        let mut h = Harness::new(Harness::params(2_000, 0), 0);
        let mut now = T0;
        let mut last_hwm = h.vault.high_water_mark();

        for op in ops {
            match op {
                Op::Deposit(amount) => {
                    let _ = h.vault.deposit(&ALICE, amount as u128, &ALICE);
                }
                Op::Redeem { pos, frac_bps } => {
                    let count = h.vault.ledger().positions().len() as u64;
                    if count > 0 {
                        let id = (pos as u64) % count;
                        let p = *h.vault.ledger().get(id).unwrap();
                        let shares = p.shares * frac_bps as u128 / 10_000;
                        let _ = h.vault.redeem_position(&ALICE, id, shares, &ALICE, now);
                    }
                }
                Op::Claim { pos, frac_bps } => {
                    let count = h.vault.ledger().positions().len() as u64;
                    if count > 0 {
                        let id = (pos as u64) % count;
                        let p = *h.vault.ledger().get(id).unwrap();
                        let shares = p.shares * frac_bps as u128 / 10_000;
                        let _ = h.vault.claim(&ALICE, id, shares, &ALICE, now);
                    }
                }
                Op::Vest => {
                    let _ = h.vault.vest();
                }
                Op::Liquidate => {
                    let _ = h.vault.liquidate(&OWNER);
                }
                Op::TakeFees => {
                    let _ = h.vault.take_performance_fees();
                }
                Op::Accrue(amount) => h.liquid.accrue(amount as u128),
                Op::Advance(dt) => now += dt as u64,
            }

            prop_assert_eq!(
                h.vault.total_redemption_liability(),
                h.positions_assets_sum()
            );
            let locked: u128 = h.vault.ledger().positions().iter().map(|p| p.shares).sum();
            prop_assert_eq!(h.shares.balance_of(&VAULT_ID), locked);
            for p in h.vault.ledger().positions() {
                prop_assert!(p.shares <= p.total_shares);
            }

            let hwm = h.vault.high_water_mark();
            prop_assert!(hwm >= last_hwm);
            last_hwm = hwm;
        }
    }

    /// Depositing then immediately fully redeeming (zero fee, zero
    /// slippage, no NAV change) returns exactly the deposit.
    #[test]
    fn prop_deposit_full_redeem_round_trip(amount in 1u128..1_000_000_000) {
        let mut h = Harness::default_vault();
        let before = h.asset.balance_of(&ALICE);

        h.vault.deposit(&ALICE, amount, &ALICE).unwrap();
        let net = h.vault.redeem_position(&ALICE, 0, amount, &ALICE, T0).unwrap();

        prop_assert_eq!(net, amount);
        prop_assert_eq!(h.asset.balance_of(&ALICE), before);
    }

    /// The vesting curve is bounded by full scale, non-increasing in time,
    /// and exactly zero from the window's end onward.
    #[test]
    fn prop_vesting_rate_monotone(
        start in 0u64..10_000,
        len in 0u64..10_000,
        a in 0u64..40_000,
        b in 0u64..40_000,
    ) {
        let v = VestingSchedule::new(start, start + len);
        let (t1, t2) = if a <= b { (a, b) } else { (b, a) };

        prop_assert!(v.rate_bps(t1) <= BPS_FULL);
        prop_assert!(v.rate_bps(t1) >= v.rate_bps(t2));
        prop_assert_eq!(v.rate_bps(start + len), 0);
    }

    /// Redeemable shares never exceed the locked share count.
    #[test]
    fn prop_redeemable_bounded_by_locked(
        deposit in 1u128..1_000_000,
        burn_bps in 0u16..10_000,
        at in 0u64..5_000_000,
    ) {
        let mut h = Harness::default_vault();
        h.vault.deposit(&ALICE, deposit, &ALICE).unwrap();

        let burn = deposit * burn_bps as u128 / 10_000;
        if burn > 0 {
            h.vault.redeem_position(&ALICE, 0, burn, &ALICE, T0).unwrap();
        }

        let pos = *h.vault.ledger().get(0).unwrap();
        let redeemable = h.vault.redeemable_shares(0, T0 + at).unwrap();
        prop_assert!(redeemable <= pos.shares);
    }
}
