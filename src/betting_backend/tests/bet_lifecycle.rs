//! Invariant tests over the stable maps: conditional transitions fire at
//! most once, idempotency keys admit a tx at most once, and the admission
//! gates count what they should. These exercise the same compare-and-set
//! paths the workers rely on, without a replica.

use anyhow::Result;

use betting_backend::stable_bet::bet_map;
use betting_backend::stable_bet::stable_bet::{BetStatus, PaymentMethod, StableBet};
use betting_backend::stable_challenge::challenge_map;
use betting_backend::stable_challenge::stable_challenge::{ChallengeStatus, StableChallenge};
use betting_backend::stable_prediction::prediction_map;
use betting_backend::stable_prediction::stable_prediction::{PredictionSide, PredictionStatus, StablePrediction};
use betting_backend::stable_referral::referral_map;
use betting_backend::stable_referral::stable_referral::{ReferralStatus, StableReferral};
use betting_backend::stable_revenue::revenue_claim_map;
use betting_backend::stable_revenue::stable_revenue_claim::StableRevenueClaim;
use betting_backend::stable_settled_event::settled_event_map;
use betting_backend::stable_settled_event::stable_settled_event::StableSettledEvent;
use betting_backend::stable_stake::stake_map;
use betting_backend::stable_stake::stable_stake::StableStake;
use betting_backend::stable_user::user_map;
use betting_backend::token::Currency;

fn make_bet(wallet: &str, event_id: &str, outcome: &str, created_at: u64) -> StableBet {
    StableBet {
        bet_id: String::new(),
        wallet_address: wallet.to_string(),
        event_id: event_id.to_string(),
        event_name: "Arsenal vs Chelsea".to_string(),
        home_team: "Arsenal".to_string(),
        away_team: "Chelsea".to_string(),
        market_id: "match_winner".to_string(),
        outcome_id: outcome.to_string(),
        prediction: String::new(),
        odds: 2.0,
        stake: 100.0,
        currency: Currency::SBETS,
        potential_payout: 200.0,
        status: BetStatus::Pending,
        payment_method: PaymentMethod::PlatformBalance,
        used_bonus: false,
        platform_fee: 1.0,
        is_live: false,
        match_minute: None,
        tx_hash: None,
        on_chain_bet_id: None,
        created_at,
        settled_at: None,
        settlement_tx_hash: None,
    }
}

#[test]
fn settlement_transition_fires_exactly_once() -> Result<()> {
    let bet_id = bet_map::insert(&make_bet("0xsettle", "fb-9001", "home", 1_000));

    // many settlers racing on the same bet: exactly one transition wins
    let mut wins = 0;
    for _ in 0..5 {
        if bet_map::update_status(&bet_id, &[BetStatus::Pending, BetStatus::Confirmed], BetStatus::Won, 2_000) {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);

    let bet = bet_map::get_by_bet_id(&bet_id).unwrap();
    assert_eq!(bet.status, BetStatus::Won);
    assert_eq!(bet.settled_at, Some(2_000));

    // won only pays out, never un-settles
    assert!(!bet_map::update_status(&bet_id, &[BetStatus::Won], BetStatus::Lost, 3_000));
    assert!(bet_map::update_status(&bet_id, &[BetStatus::Won], BetStatus::PaidOut, 3_000));
    Ok(())
}

#[test]
fn illegal_transitions_are_refused() {
    let bet_id = bet_map::insert(&make_bet("0xillegal", "fb-9002", "home", 1_000));
    // pending cannot jump straight to paid_out
    assert!(!bet_map::update_status(&bet_id, &[BetStatus::Pending], BetStatus::PaidOut, 2_000));
    // mismatched prior status is a no-op
    assert!(!bet_map::update_status(&bet_id, &[BetStatus::Confirmed], BetStatus::Won, 2_000));
    assert_eq!(bet_map::get_by_bet_id(&bet_id).unwrap().status, BetStatus::Pending);
}

#[test]
fn revert_reopens_the_bet_for_the_next_cycle() {
    let bet_id = bet_map::insert(&make_bet("0xrevert", "fb-9003", "home", 1_000));
    assert!(bet_map::update_status(&bet_id, &[BetStatus::Pending], BetStatus::Won, 2_000));
    bet_map::revert_status(&bet_id, BetStatus::Pending);

    let bet = bet_map::get_by_bet_id(&bet_id).unwrap();
    assert_eq!(bet.status, BetStatus::Pending);
    assert_eq!(bet.settled_at, None);
    // the retry settles normally
    assert!(bet_map::update_status(&bet_id, &[BetStatus::Pending], BetStatus::Won, 3_000));
}

#[test]
fn rate_gates_count_non_voided_bets() {
    let wallet = "0xgates";
    for i in 0..3 {
        bet_map::insert(&make_bet(wallet, &format!("fb-91{:02}", i), "home", 5_000 + i));
    }
    assert_eq!(bet_map::count_wallet_bets_since(wallet, 0), 3);

    // voided bets do not count against the window
    let void_id = bet_map::insert(&make_bet(wallet, "fb-9199", "home", 5_010));
    assert!(bet_map::update_status(&void_id, &[BetStatus::Pending], BetStatus::Void, 5_020));
    assert_eq!(bet_map::count_wallet_bets_since(wallet, 0), 3);

    // per-event limit counts both sides of a market
    let event = "fb-9150";
    bet_map::insert(&make_bet(wallet, event, "home", 6_000));
    bet_map::insert(&make_bet(wallet, event, "away", 6_001));
    assert_eq!(bet_map::count_wallet_event_bets(wallet, event), 2);
}

#[test]
fn duplicate_selection_detected_only_while_open() {
    let wallet = "0xdup";
    let event = "fb-9200";
    let bet_id = bet_map::insert(&make_bet(wallet, event, "draw", 1_000));
    assert!(bet_map::find_open_duplicate(wallet, event, "match_winner", "draw").is_some());
    assert!(bet_map::find_open_duplicate(wallet, event, "match_winner", "home").is_none());

    // a settled bet no longer blocks a new selection
    assert!(bet_map::update_status(&bet_id, &[BetStatus::Pending], BetStatus::Lost, 2_000));
    assert!(bet_map::find_open_duplicate(wallet, event, "match_winner", "draw").is_none());
}

#[test]
fn settlement_credit_is_idempotent_with_the_transition() -> Result<()> {
    let wallet = "0xcredit";
    user_map::get_or_create(wallet, 1_000);
    let bet_id = bet_map::insert(&make_bet(wallet, "fb-9300", "home", 1_000));

    // the worker's contract: only the task that wins the CAS credits
    let mut credited = 0.0;
    for _ in 0..3 {
        if bet_map::update_status(&bet_id, &[BetStatus::Pending, BetStatus::Confirmed], BetStatus::Won, 2_000) {
            // net = 200 gross - 1% of the 100 profit
            user_map::add_platform_balance(wallet, Currency::SBETS, 199.0).map_err(anyhow::Error::msg)?;
            credited += 199.0;
        }
    }
    assert_eq!(credited, 199.0);
    assert_eq!(user_map::get_by_wallet(wallet).unwrap().balance_sbets, 199.0);
    Ok(())
}

#[test]
fn settled_event_row_is_written_once() {
    let row = StableSettledEvent {
        event_id: "fb-9400".to_string(),
        sport_id: 1,
        home_team: "Arsenal".to_string(),
        away_team: "Chelsea".to_string(),
        home_score: 2,
        away_score: 1,
        winner: "home".to_string(),
        settled_at: 1_000,
        bets_settled: 4,
    };
    assert!(settled_event_map::insert_once(&row));
    // a second cycle over the same event is a no-op
    let mut second = row.clone();
    second.bets_settled = 99;
    assert!(!settled_event_map::insert_once(&second));
    assert_eq!(settled_event_map::get_by_event_id("fb-9400").unwrap().bets_settled, 4);
}

#[test]
fn prediction_terminal_transition_is_single_shot() {
    let prediction_id = prediction_map::insert(&StablePrediction {
        prediction_id: 0,
        creator_wallet: "0xcreator".to_string(),
        title: "Will it ship".to_string(),
        description: String::new(),
        category: "tech".to_string(),
        end_date: 1_000,
        total_yes_amount: 0,
        total_no_amount: 0,
        participant_count: 0,
        status: PredictionStatus::Active,
        resolved_outcome: None,
        resolved_at: None,
        created_at: 500,
    });
    prediction_map::add_bet_amount(prediction_id, PredictionSide::Yes, 1_000).unwrap();
    prediction_map::add_bet_amount(prediction_id, PredictionSide::No, 400).unwrap();

    assert!(prediction_map::finalize(prediction_id, PredictionStatus::ResolvedYes, Some(PredictionSide::Yes), 2_000));
    // the losing racer cannot finalize again
    assert!(!prediction_map::finalize(prediction_id, PredictionStatus::ResolvedNo, Some(PredictionSide::No), 2_001));

    // pool totals freeze after the terminal transition
    assert!(prediction_map::add_bet_amount(prediction_id, PredictionSide::Yes, 50).is_err());
    let row = prediction_map::get_by_prediction_id(prediction_id).unwrap();
    assert_eq!(row.total_yes_amount + row.total_no_amount, 1_400);
    assert_eq!(row.resolved_outcome, Some(PredictionSide::Yes));
}

#[test]
fn challenge_join_invariants() {
    let challenge_id = challenge_map::insert(&StableChallenge {
        challenge_id: 0,
        creator_wallet: "0xchal".to_string(),
        title: "1v2".to_string(),
        description: String::new(),
        stake_amount: 500,
        max_participants: 2,
        current_participants: 0,
        expires_at: 10_000,
        status: ChallengeStatus::Open,
        winner: None,
        created_at: 1_000,
        settled_at: None,
    });

    // creator cannot self-join
    assert!(challenge_map::add_participant(challenge_id, "0xchal").is_err());
    assert!(challenge_map::add_participant(challenge_id, "0xp1").is_ok());
    assert!(challenge_map::add_participant(challenge_id, "0xp2").is_ok());
    // capacity enforced
    assert!(challenge_map::add_participant(challenge_id, "0xp3").is_err());

    // no writes after the terminal transition
    assert!(challenge_map::finalize(challenge_id, ChallengeStatus::ExpiredRefunded, None, 20_000));
    assert!(!challenge_map::finalize(challenge_id, ChallengeStatus::Settled, None, 20_001));
    assert!(challenge_map::add_participant(challenge_id, "0xp4").is_err());
}

#[test]
fn revenue_claim_unique_per_wallet_week() {
    let claim = StableRevenueClaim {
        wallet_address: "0xholder".to_string(),
        week_start: 1_750_032_000_000_000_000,
        holder_balance: 5_000.0,
        share_percentage: 2.5,
        claimed_sui: 0.75,
        claimed_sbets: 300.0,
        sui_tx_hash: Some("41".to_string()),
        sbets_tx_hash: Some("42".to_string()),
        claimed_at: 1_750_032_100_000_000_000,
    };
    assert!(revenue_claim_map::insert_once(&claim).is_ok());

    // the replay gets the stored row back instead of a second payout
    let replay = revenue_claim_map::insert_once(&claim).unwrap_err();
    assert_eq!(replay.sui_tx_hash.as_deref(), Some("41"));

    // a different week claims independently
    let mut next_week = claim.clone();
    next_week.week_start += 7 * 24 * 3_600 * 1_000_000_000;
    assert!(revenue_claim_map::insert_once(&next_week).is_ok());
}

#[test]
fn stake_tx_and_deactivation_idempotency() {
    let stake = StableStake {
        stake_id: 0,
        wallet_address: "0xstaker".to_string(),
        amount: 200_000,
        staked_at: 1_000,
        locked_until: 2_000,
        active: true,
        unstaking_at: None,
        accumulated_reward: 0,
        tx_hash: "stake-tx-1".to_string(),
    };
    let stake_id = stake_map::insert(&stake).unwrap();
    // the tx hash is consumed forever
    assert!(stake_map::insert(&stake).is_err());

    // accrual snapshot is monotone
    stake_map::advance_accumulated(stake_id, 100);
    stake_map::advance_accumulated(stake_id, 40);
    assert_eq!(stake_map::get_by_stake_id(stake_id).unwrap().accumulated_reward, 100);

    // deactivation happens once
    assert!(stake_map::deactivate(stake_id, 120, 3_000).is_some());
    assert!(stake_map::deactivate(stake_id, 120, 3_001).is_none());
    let row = stake_map::get_by_stake_id(stake_id).unwrap();
    assert!(!row.active);
    assert_eq!(row.unstaking_at, Some(3_000));
    assert_eq!(row.accumulated_reward, 120);
}

#[test]
fn referral_rewarded_exactly_once() {
    referral_map::insert(&StableReferral {
        referred_wallet: "0xnewbie".to_string(),
        referrer_wallet: "0xog".to_string(),
        status: ReferralStatus::Pending,
        created_at: 1_000,
        rewarded_at: None,
    })
    .unwrap();

    assert_eq!(referral_map::mark_rewarded("0xnewbie", 2_000), Some("0xog".to_string()));
    // first bet only rewards once
    assert_eq!(referral_map::mark_rewarded("0xnewbie", 2_001), None);
}
