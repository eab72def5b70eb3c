use std::collections::HashMap;
use std::time::Duration;

use crate::event_registry::provider;
use crate::event_registry::raw_event::EventResult;
use crate::ic::delay::sleep;
use crate::ic::ledger;
use crate::ic::network::ICNetwork;
use crate::single_flight::SETTLING_EVENTS;
use crate::stable_bet::bet_map;
use crate::stable_bet::stable_bet::{BetStatus, StableBet};
use crate::stable_parlay::parlay_map;
use crate::stable_parlay::stable_parlay::StableParlay;
use crate::stable_settings::settings_map;
use crate::stable_settled_event::settled_event_map;
use crate::stable_settled_event::stable_settled_event::StableSettledEvent;

use super::settle_one::{settle_one, settle_selection};

const PAYOUT_GAP_SECS: u64 = 2;
const MAX_CONSECUTIVE_PAYOUT_FAILURES: u32 = 5;

/// One settlement cycle: find finished events with open bets and settle them.
/// Runs from the minute timer and on demand from the admin endpoint.
pub async fn run_settlement_cycle() {
    let results = match provider::fetch_results().await {
        Ok(results) => results,
        Err(e) => {
            ICNetwork::error_log(&format!("Results fetch failed: {}", e));
            Vec::new()
        }
    };
    let results_by_event: HashMap<String, EventResult> =
        results.into_iter().map(|r| (r.event_id.clone(), r)).collect();

    // snapshot of open bets grouped by event; membership is re-checked under
    // the event guard because other tasks run between awaits
    let mut event_ids: Vec<String> = bet_map::get_open_bets().into_iter().map(|bet| bet.event_id).collect();
    event_ids.extend(parlay_map::get_all_open_leg_event_ids());
    event_ids.sort();
    event_ids.dedup();

    for event_id in event_ids {
        let result = match settled_event_map::get_by_event_id(&event_id) {
            // a bet placed after the event settled still gets resolved
            // against the recorded final score
            Some(row) => EventResult {
                event_id: row.event_id.clone(),
                sport_id: row.sport_id,
                home_team: row.home_team.clone(),
                away_team: row.away_team.clone(),
                home_score: row.home_score,
                away_score: row.away_score,
                ht_home_score: None,
                ht_away_score: None,
                finished: true,
            },
            None => match results_by_event.get(&event_id) {
                Some(result) if result.finished => result.clone(),
                _ => continue,
            },
        };
        settle_event(&event_id, &result).await;
    }
}

/// Settle every open bet and parlay leg on one finished event, then record
/// the settled-event row. Guarded per event id; a concurrent caller returns
/// immediately.
pub async fn settle_event(event_id: &str, result: &EventResult) {
    let guard = SETTLING_EVENTS.with(|g| g.try_acquire(&event_id.to_string()));
    let _guard = match guard {
        Some(guard) => guard,
        None => return,
    };

    // refetch inside the lock; the snapshot taken before it may be stale
    let bets = bet_map::get_open_bets_for_event(event_id);
    let mut bets_settled = 0_u32;
    let mut consecutive_payout_failures = 0_u32;
    for bet in bets {
        match settle_and_credit(&bet, result).await {
            Ok(outcome) => {
                if outcome.settled {
                    bets_settled += 1;
                }
                if outcome.paid_onchain {
                    consecutive_payout_failures = 0;
                    sleep(Duration::from_secs(PAYOUT_GAP_SECS)).await;
                }
            }
            Err(e) => {
                ICNetwork::error_log(&format!("Settlement of bet {} failed: {}", bet.bet_id, e));
                consecutive_payout_failures += 1;
                if consecutive_payout_failures > MAX_CONSECUTIVE_PAYOUT_FAILURES {
                    ICNetwork::error_log("Too many consecutive settlement failures, stopping event");
                    break;
                }
            }
        }
    }

    for parlay in parlay_map::get_open_parlays_for_event(event_id) {
        if let Err(e) = settle_parlay_leg(&parlay, event_id, result).await {
            ICNetwork::error_log(&format!("Parlay {} settlement failed: {}", parlay.parlay_id, e));
        }
    }

    let row = StableSettledEvent {
        event_id: event_id.to_string(),
        sport_id: result.sport_id,
        home_team: result.home_team.clone(),
        away_team: result.away_team.clone(),
        home_score: result.home_score,
        away_score: result.away_score,
        winner: result.winner().to_string(),
        settled_at: ICNetwork::get_time(),
        bets_settled,
    };
    if settled_event_map::insert_once(&row) {
        ICNetwork::info_log(&format!(
            "Event {} settled {}-{}, {} bets resolved",
            event_id, result.home_score, result.away_score, bets_settled
        ));
    }
}

struct SettleOutcome {
    settled: bool,
    paid_onchain: bool,
}

const SKIPPED: SettleOutcome = SettleOutcome {
    settled: false,
    paid_onchain: false,
};
const SETTLED: SettleOutcome = SettleOutcome {
    settled: true,
    paid_onchain: false,
};
const SETTLED_AND_PAID: SettleOutcome = SettleOutcome {
    settled: true,
    paid_onchain: true,
};

/// Move one bet to its terminal status and credit the win. The conditional
/// update makes a concurrent settle of the same bet a no-op; the caller
/// paces on-chain payouts.
async fn settle_and_credit(bet: &StableBet, result: &EventResult) -> Result<SettleOutcome, String> {
    let settlement = settle_one(bet, result);
    let ts = ICNetwork::get_time();
    if !bet_map::update_status(&bet.bet_id, &[BetStatus::Pending, BetStatus::Confirmed], settlement.status, ts) {
        // someone else settled it between the snapshot and now
        return Ok(SKIPPED);
    }

    if settlement.status != BetStatus::Won {
        // lost and void stakes stay with the treasury; the settled row itself
        // is the revenue record
        return Ok(SETTLED);
    }

    let settings = settings_map::get();
    let profit = (settlement.gross - bet.stake).max(0.0);
    let fee = profit * settings.platform_fee_rate;
    let net = settlement.gross - fee;

    if let Err(e) = crate::stable_user::user_map::add_platform_balance(&bet.wallet_address, bet.currency, net) {
        // credit failed: put the bet back so the next cycle retries the
        // whole transition, and never half-settle
        bet_map::revert_status(&bet.bet_id, bet.status);
        return Err(format!("settlement reverted: {}", e));
    }

    if bet.tx_hash.is_some() && settings.payouts_onchain {
        match ledger::transfer_to_wallet(bet.currency, net, &bet.wallet_address).await {
            Ok(block_id) => {
                if bet_map::update_status(&bet.bet_id, &[BetStatus::Won], BetStatus::PaidOut, ICNetwork::get_time()) {
                    bet_map::set_settlement_tx_hash(&bet.bet_id, &block_id.to_string());
                }
                return Ok(SETTLED_AND_PAID);
            }
            Err(e) => {
                // keep won so a later run retries the payout; never re-credit
                ICNetwork::error_log(&format!("On-chain payout for bet {} failed: {}", bet.bet_id, e));
            }
        }
    }
    Ok(SETTLED)
}

/// Record one leg's result and settle the parlay once every leg is resolved.
/// A single lost leg loses the parlay immediately.
async fn settle_parlay_leg(parlay: &StableParlay, event_id: &str, result: &EventResult) -> Result<(), String> {
    let mut updated = parlay.clone();
    for leg in updated.legs.iter_mut() {
        if leg.event_id == event_id && leg.result.is_none() {
            leg.result = Some(settle_selection(
                &leg.market_id,
                &leg.outcome_id,
                &leg.prediction,
                &result.home_team,
                &result.away_team,
                result,
            ));
        }
    }
    parlay_map::update(&updated);

    let ts = ICNetwork::get_time();
    if updated.legs.iter().any(|leg| leg.result == Some(BetStatus::Lost)) {
        parlay_map::update_status(&updated.parlay_id, &[BetStatus::Pending, BetStatus::Confirmed], BetStatus::Lost, ts);
        return Ok(());
    }
    if updated.legs.iter().any(|leg| leg.result.is_none()) {
        return Ok(()); // still waiting on other events
    }

    // all legs resolved, none lost: void legs drop out of the product
    let effective_odds: f64 = updated
        .legs
        .iter()
        .filter(|leg| leg.result == Some(BetStatus::Won))
        .map(|leg| leg.odds)
        .product();
    let any_won = updated.legs.iter().any(|leg| leg.result == Some(BetStatus::Won));
    if !any_won {
        parlay_map::update_status(&updated.parlay_id, &[BetStatus::Pending, BetStatus::Confirmed], BetStatus::Void, ts);
        return Ok(());
    }

    if !parlay_map::update_status(&updated.parlay_id, &[BetStatus::Pending, BetStatus::Confirmed], BetStatus::Won, ts) {
        return Ok(());
    }
    let settings = settings_map::get();
    let gross = updated.stake * effective_odds;
    let profit = (gross - updated.stake).max(0.0);
    let net = gross - profit * settings.platform_fee_rate;
    if let Err(e) = crate::stable_user::user_map::add_platform_balance(&updated.wallet_address, updated.currency, net) {
        parlay_map::revert_status(&updated.parlay_id, parlay.status);
        return Err(format!("settlement reverted: {}", e));
    }
    if updated.tx_hash.is_some() && settings.payouts_onchain {
        match ledger::transfer_to_wallet(updated.currency, net, &updated.wallet_address).await {
            Ok(block_id) => {
                if parlay_map::update_status(&updated.parlay_id, &[BetStatus::Won], BetStatus::PaidOut, ICNetwork::get_time()) {
                    let mut paid = parlay_map::get_by_parlay_id(&updated.parlay_id).ok_or("parlay vanished")?;
                    paid.settlement_tx_hash = Some(block_id.to_string());
                    parlay_map::update(&paid);
                }
            }
            Err(e) => {
                ICNetwork::error_log(&format!("On-chain payout for parlay {} failed: {}", updated.parlay_id, e));
            }
        }
    }
    Ok(())
}
