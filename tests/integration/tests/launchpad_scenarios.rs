//! End-to-end launchpad scenarios
//!
//! Create -> trade -> graduate -> claim, checked against the ledger, the
//! bank and the event log after every step.

use launchpad_common::{okb, tokens, Address, LaunchpadError};
use launchpad_core::{GraduationStatus, LaunchpadEvent, DEFAULT_OWNER};
use launchpad_curve::Phase;
use launchpad_integration_tests::*;

#[test]
fn test_reference_curve_buy() {
    let mut lp = launchpad_with(fee_free_config());
    let token = launch(&mut lp, "REF");

    let receipt = lp.buy(&ctx(ALICE, okb(1)), &token, 0).unwrap();
    let curve = lp.get_curve_info(&token).unwrap();

    // 30 OKB / 1B token virtual reserves, 1 OKB in
    assert_eq!(receipt.tokens_out / tokens(1), 32_258_064);
    assert_eq!(curve.okb_collected, okb(1));
    assert_eq!(curve.tokens_sold, receipt.tokens_out);
    assert_eq!(curve.virtual_okb, okb(31));
    assert_eq!(curve.virtual_tokens, tokens(1_000_000_000) - receipt.tokens_out);
}

#[test]
fn test_full_lifecycle() {
    println!("Lifecycle: create -> buy -> sell -> graduate -> claim");

    let mut lp = launchpad();
    let token = launch(&mut lp, "LIFE");
    let launchpad_address = lp.config().launchpad_address;
    let start_price = lp.get_current_price(&token).unwrap();
    assert_eq!(start_price, 30_000_000_000);

    // Alice buys early, Bob pushes the curve over the threshold
    let alice_buy = lp.buy(&ctx(ALICE, okb(20)), &token, 0).unwrap();
    assert_eq!(alice_buy.graduation, GraduationStatus::NotReady);
    assert!(lp.get_current_price(&token).unwrap() > start_price);

    let sold = approve_and_sell(&mut lp, ALICE, &token, alice_buy.tokens_out / 4).unwrap();
    assert!(sold.net_okb_out > 0);
    assert_eq!(lp.bank().balance_of(&ALICE), sold.net_okb_out);

    let needed = lp.okb_to_graduation(&token).unwrap();
    let gross = needed * 10_000 / 9_800 + okb(1);
    let bob_buy = lp.buy(&ctx(BOB, gross), &token, 0).unwrap();
    let pool = match bob_buy.graduation {
        GraduationStatus::Graduated { pool } => pool,
        other => panic!("expected graduation, got {:?}", other),
    };

    let curve = lp.registry().resolve(&token).unwrap();
    assert_eq!(curve.phase(), Phase::Graduated);
    assert!(!curve.active());
    let lock = curve.liquidity_lock().unwrap();
    assert_eq!(lp.balance_of(&token, &pool), lock.token_amount);

    // Token conservation across holders
    let total = lp.balance_of(&token, &launchpad_address)
        + lp.balance_of(&token, &ALICE)
        + lp.balance_of(&token, &BOB)
        + lp.balance_of(&token, &pool);
    assert_eq!(total, tokens(1_000_000_000));

    // Post-graduation trading is closed
    assert_eq!(lp.buy(&ctx(ALICE, okb(1)), &token, 0), Err(LaunchpadError::CurveInactive));
    assert_eq!(
        approve_and_sell(&mut lp, BOB, &token, 1),
        Err(LaunchpadError::CurveInactive)
    );

    // Creator rewards: 1% of every trade
    let expected_rewards = okb(20) / 100 + sold.fee.creator + gross / 100;
    assert_eq!(lp.get_pending_rewards(&CREATOR), expected_rewards);
    assert_eq!(lp.claim_rewards(&ctx(CREATOR, 0)).unwrap(), expected_rewards);
    assert_eq!(lp.bank().balance_of(&CREATOR), expected_rewards);

    // Platform fees + graduation residue go to the fee recipient
    let platform = lp.get_platform_fees();
    assert_eq!(lp.withdraw_platform_fees(&ctx(DEFAULT_OWNER, 0)).unwrap(), platform);
    assert_eq!(lp.treasury(), 0);
    assert_eq!(lp.accounted_okb(), 0);

    println!("Lifecycle passed: pool {}", pool);
}

#[test]
fn test_threshold_edge() {
    let mut lp = launchpad_with(fee_free_config());
    let token = launch(&mut lp, "EDGE");

    let just_below = lp.buy(&ctx(ALICE, okb(80) - 1), &token, 0).unwrap();
    assert_eq!(just_below.graduation, GraduationStatus::NotReady);
    assert_eq!(lp.check_graduation(&token).unwrap(), (false, okb(80) - 1));

    // The last wei reaches the threshold
    let over = lp.buy(&ctx(ALICE, 1), &token, 0).unwrap();
    assert!(over.tokens_out > 0);
    assert!(matches!(over.graduation, GraduationStatus::Graduated { .. }));
    assert_eq!(lp.graduation_progress_bps(&token).unwrap(), 10_000);
}

#[test]
fn test_two_phase_graduation_with_retries() {
    let mut lp = launchpad();
    let token = launch(&mut lp, "RETRY");
    lp.pools_mut().fail_next(3);

    let receipt = lp.buy(&ctx(ALICE, okb(90)), &token, 0).unwrap();
    assert_eq!(receipt.graduation, GraduationStatus::Pending);
    let frozen = lp.registry().resolve(&token).unwrap().clone();
    assert_eq!(frozen.phase(), Phase::Graduating);
    assert_eq!(lp.stats().graduating, 1);

    for _ in 0..2 {
        assert!(matches!(
            lp.graduate(&token, 0),
            Err(LaunchpadError::PoolCreationFailed(_))
        ));
        assert_eq!(lp.registry().resolve(&token).unwrap(), &frozen);
    }

    let outcome = lp.graduate(&token, 0).unwrap();
    assert_eq!(Some(outcome.lock), frozen.liquidity_lock());
    assert_eq!(lp.get_pool_address(&token).unwrap(), Some(outcome.pool));
    assert_eq!(lp.graduate(&token, 0), Err(LaunchpadError::AlreadyGraduated));
    assert_eq!(lp.stats().graduated, 1);
    assert_eq!(lp.treasury(), lp.accounted_okb());

    let token_events: Vec<_> = lp.events().for_token(&token);
    assert!(matches!(token_events.last(), Some(LaunchpadEvent::TokenGraduated { .. })));
}

#[test]
fn test_many_tokens_isolated() {
    let mut lp = launchpad();
    let tokens_list: Vec<Address> = ["AAA", "BBB", "CCC"]
        .iter()
        .map(|s| launch(&mut lp, s))
        .collect();

    lp.buy(&ctx(ALICE, okb(5)), &tokens_list[0], 0).unwrap();
    lp.buy(&ctx(BOB, okb(100)), &tokens_list[1], 0).unwrap();

    assert_eq!(lp.get_all_tokens(), tokens_list);
    assert!(lp.get_curve_info(&tokens_list[0]).unwrap().active);
    assert!(lp.is_graduated(&tokens_list[1]).unwrap());
    assert_eq!(lp.get_curve_info(&tokens_list[2]).unwrap().okb_collected, 0);

    let stats = lp.stats();
    assert_eq!((stats.total, stats.active, stats.graduated), (3, 2, 1));
    assert_eq!(lp.tokens_in_phase(Phase::Active), vec![tokens_list[0], tokens_list[2]]);
    assert_eq!(lp.fee_ledger().token_fees(&tokens_list[1]).trades, 1);
}

#[test]
fn test_quotes_match_execution() {
    let mut lp = launchpad();
    let token = launch(&mut lp, "QUOTE");

    let quoted_tokens = lp.calculate_tokens_out(&token, okb(7)).unwrap();
    let receipt = lp.buy(&ctx(ALICE, okb(7)), &token, quoted_tokens).unwrap();
    assert_eq!(receipt.tokens_out, quoted_tokens);

    let quoted_okb = lp.calculate_okb_out(&token, quoted_tokens).unwrap();
    let sold = approve_and_sell(&mut lp, ALICE, &token, quoted_tokens).unwrap();
    assert_eq!(sold.net_okb_out, quoted_okb);
    // Round trip loses the fees on both legs plus rounding
    assert!(sold.net_okb_out < okb(7) * 98 / 100);
}

#[test]
fn test_event_log_serializes_to_json_lines() {
    let mut lp = launchpad();
    let token = launch(&mut lp, "JSON");
    lp.buy(&ctx(ALICE, okb(2)), &token, 0).unwrap();

    let lines: Vec<String> = lp
        .events()
        .events()
        .iter()
        .map(|e| serde_json::to_string(e).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(r#""event":"token_created""#));
    assert!(lines[1].contains(r#""event":"tokens_purchased""#));
    assert!(lines[1].contains(r#""okb_in":"2""#));
}
