//! Property tests over the curve engine and the launchpad facade

use launchpad_common::{okb, tokens, LaunchpadError};
use launchpad_core::GraduationStatus;
use launchpad_curve::{
    apply_buy, apply_sell, current_price, quote_buy, quote_sell, CurveState, FeeSchedule,
};
use launchpad_integration_tests::*;
use proptest::prelude::*;

fn fresh_curve() -> CurveState {
    CurveState::new(okb(30), tokens(1_000_000_000)).unwrap()
}

/// Buy sizes between 0.001 and 79 OKB
fn buy_size() -> impl Strategy<Value = u128> {
    (1u64..79_000).prop_map(|milli| milli as u128 * okb(1) / 1_000)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_round_trip_never_profits(okb_in in buy_size()) {
        let curve = fresh_curve();
        let tokens_out = quote_buy(&curve, okb_in).unwrap();
        let after = apply_buy(&curve, okb_in).unwrap().curve;
        let okb_out = quote_sell(&after, tokens_out).unwrap();
        prop_assert!(okb_out <= okb_in);
    }

    #[test]
    fn prop_price_monotone(sizes in prop::collection::vec(buy_size(), 1..8)) {
        let mut curve = fresh_curve();
        let mut price = current_price(&curve).unwrap();
        let mut bought = Vec::new();

        for size in &sizes {
            if !curve.active() || curve.okb_collected() + size > okb(1_000) {
                break;
            }
            let outcome = apply_buy(&curve, *size).unwrap();
            prop_assert!(outcome.price >= price);
            prop_assert!(outcome.curve.virtual_token_reserve() > 0);
            price = outcome.price;
            bought.push(outcome.tokens_out);
            curve = outcome.curve;
        }

        for amount in bought.into_iter().rev() {
            let outcome = apply_sell(&curve, amount, &FeeSchedule::default()).unwrap();
            prop_assert!(outcome.price <= price);
            prop_assert!(outcome.curve.virtual_token_reserve() > 0);
            prop_assert!(outcome.gross_okb_out <= curve.okb_collected());
            price = outcome.price;
            curve = outcome.curve;
        }
        prop_assert_eq!(curve.tokens_sold(), 0);
    }

    #[test]
    fn prop_k_never_decreases(okb_in in buy_size(), sell_share in 1u128..=100) {
        let curve = fresh_curve();
        let k0 = curve.k();
        let bought = apply_buy(&curve, okb_in).unwrap();
        prop_assert!(bought.curve.k() >= k0);

        let amount = (bought.tokens_out * sell_share / 100).max(1);
        let sold = apply_sell(&bought.curve, amount, &FeeSchedule::ZERO).unwrap();
        prop_assert!(sold.curve.k() >= bought.curve.k());
    }

    #[test]
    fn prop_treasury_conserved(buys in prop::collection::vec(buy_size(), 1..6), sell_share in 0u128..=100) {
        let mut lp = launchpad();
        let token = launch(&mut lp, "PROP");

        for (i, size) in buys.iter().enumerate() {
            let buyer = if i % 2 == 0 { ALICE } else { BOB };
            match lp.buy(&ctx(buyer, *size), &token, 0) {
                Ok(_) => {}
                Err(LaunchpadError::CurveInactive) => break,
                Err(e) => return Err(TestCaseError::fail(format!("buy failed: {}", e))),
            }
            prop_assert_eq!(lp.treasury(), lp.accounted_okb());
        }

        let held = lp.balance_of(&token, &ALICE);
        let amount = held * sell_share / 100;
        if amount > 0 && lp.get_curve_info(&token).unwrap().active {
            approve_and_sell(&mut lp, ALICE, &token, amount).unwrap();
            prop_assert_eq!(lp.treasury(), lp.accounted_okb());
        }
    }

    #[test]
    fn prop_graduates_at_most_once(first in buy_size(), second in buy_size()) {
        let mut lp = launchpad_with(fee_free_config());
        let token = launch(&mut lp, "ONCE");

        let mut graduations = 0;
        for size in [first, second, okb(80)] {
            match lp.buy(&ctx(ALICE, size), &token, 0) {
                Ok(receipt) => {
                    if matches!(receipt.graduation, GraduationStatus::Graduated { .. }) {
                        graduations += 1;
                    }
                }
                Err(e) => prop_assert_eq!(e, LaunchpadError::CurveInactive),
            }
        }
        prop_assert_eq!(graduations, 1);
        prop_assert_eq!(lp.graduate(&token, 0), Err(LaunchpadError::AlreadyGraduated));
        prop_assert_eq!(lp.buy(&ctx(BOB, okb(1)), &token, 0), Err(LaunchpadError::CurveInactive));
    }
}
