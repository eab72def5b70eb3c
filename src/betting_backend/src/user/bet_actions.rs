use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::helpers::math_helpers::round_2;
use crate::helpers::time_helpers::{NANOS_PER_DAY, NANOS_PER_WEEK};
use crate::ic::network::ICNetwork;
use crate::stable_bet::bet_map;
use crate::stable_bet::stable_bet::{BetStatus, StableBet};
use crate::stable_parlay::parlay_map;
use crate::stable_parlay::stable_parlay::StableParlay;
use crate::stable_settings::settings_map;
use crate::stable_settled_event::settled_event_map;
use crate::stable_settled_event::stable_settled_event::StableSettledEvent;
use crate::stable_user::user_map;

pub fn get_bets(wallet_address: &str, status: Option<BetStatus>) -> Vec<StableBet> {
    bet_map::get_by_wallet(wallet_address, status)
}

pub fn get_parlays(wallet_address: &str) -> Vec<StableParlay> {
    parlay_map::get_by_wallet(wallet_address)
}

/// Settled matches for the results listing.
pub fn get_event_results(period: &str, sport_id: Option<u32>) -> Result<Vec<StableSettledEvent>, String> {
    let now = ICNetwork::get_time();
    let since = match period {
        "today" => now.saturating_sub(NANOS_PER_DAY),
        "week" => now.saturating_sub(NANOS_PER_WEEK),
        "month" => now.saturating_sub(30 * NANOS_PER_DAY),
        other => return Err(format!("Unknown period {}", other)),
    };
    Ok(settled_event_map::get_since(since, sport_id))
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct CashOutArgs {
    pub bet_id: String,
    pub wallet_address: String,
    pub current_odds: f64,
    pub percentage_winning: f64, // 0..=100
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct CashOutReply {
    pub bet_id: String,
    pub cash_out_value: f64,
    pub fee: f64,
    pub credited: f64,
}

/// Partial settle before the match ends. Only pending off-chain bets cash
/// out; the conditional transition stops a settle racing in behind it.
pub fn cash_out(args: CashOutArgs) -> Result<CashOutReply, String> {
    let wallet = args.wallet_address.to_lowercase();
    let bet = bet_map::get_by_bet_id(&args.bet_id).ok_or_else(|| format!("Bet {} not found", args.bet_id))?;
    if bet.wallet_address != wallet {
        return Err(format!("Bet {} does not belong to {}", args.bet_id, wallet));
    }
    if bet.status != BetStatus::Pending {
        return Err("Only pending bets can be cashed out".to_string());
    }
    if !args.current_odds.is_finite() || args.current_odds <= 0.0 {
        return Err("Invalid current odds".to_string());
    }
    if !(0.0..=100.0).contains(&args.percentage_winning) {
        return Err("Invalid winning percentage".to_string());
    }

    let settings = settings_map::get();
    let gross = bet.stake * args.current_odds * (args.percentage_winning / 100.0);
    let fee = gross * settings.platform_fee_rate;
    let credited = round_2(gross - fee);

    let ts = ICNetwork::get_time();
    if !bet_map::update_status(&args.bet_id, &[BetStatus::Pending], BetStatus::CashedOut, ts) {
        return Err("already settled".to_string());
    }
    if let Err(e) = user_map::add_platform_balance(&wallet, bet.currency, credited) {
        bet_map::revert_status(&args.bet_id, BetStatus::Pending);
        return Err(format!("cash-out reverted: {}", e));
    }
    Ok(CashOutReply {
        bet_id: args.bet_id,
        cash_out_value: round_2(gross),
        fee: round_2(fee),
        credited,
    })
}
