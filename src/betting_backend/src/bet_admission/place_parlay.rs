use std::collections::HashSet;

use crate::helpers::math_helpers::{round_2, usd_value};
use crate::ic::network::ICNetwork;
use crate::stable_bet::bet_map;
use crate::stable_bet::stable_bet::BetStatus;
use crate::stable_deposit::deposit_map;
use crate::stable_limits::stable_user_limits::LimitWindow;
use crate::stable_limits::user_limits_map;
use crate::stable_parlay::parlay_map;
use crate::stable_parlay::stable_parlay::{ParlayLeg, StableParlay};
use crate::stable_settings::settings_map;
use crate::stable_user::user_map;
use crate::token::Currency;

use super::bet_error::BetError;
use super::place_bet::check_selection;
use super::place_bet_args::{PlaceParlayArgs, PlaceParlayReply};

/// Parlay admission: every single-bet gate per leg, plus the cross-leg rules
/// (no two selections on one match, finite positive combined odds).
pub fn place_parlay(args: PlaceParlayArgs) -> Result<PlaceParlayReply, BetError> {
    let now = ICNetwork::get_time();
    let settings = settings_map::get();
    let wallet = args.wallet_address.to_lowercase();

    if settings.blocked_wallets.iter().any(|w| w == &wallet) {
        return Err(BetError::WalletBlocked);
    }
    if settings.sui_betting_paused && args.currency == Currency::SUI {
        return Err(BetError::SuiBettingPaused);
    }
    if args.selections.len() < 2 {
        return Err(BetError::InvalidParlayEvent);
    }
    if !args.stake.is_finite() || args.stake <= 0.0 {
        return Err(BetError::InvalidStake);
    }
    let max_stake = match args.currency {
        Currency::SUI => settings.max_stake_sui,
        Currency::SBETS => settings.max_stake_sbets,
    };
    if args.stake > max_stake {
        return Err(BetError::MaxStakeExceeded);
    }
    if let Some(tx_hash) = &args.tx_hash {
        if bet_map::tx_hash_exists(tx_hash) || deposit_map::tx_hash_exists(tx_hash) {
            return Err(BetError::DuplicateTransaction);
        }
    }

    // wallet-level rate gates apply once per parlay
    let day_ago = now.saturating_sub(24 * 60 * 60 * 1_000_000_000);
    if bet_map::count_wallet_bets_since(&wallet, day_ago) >= settings.max_bets_per_day {
        return Err(BetError::RateLimitExceeded);
    }
    if let Some(last_ts) = bet_map::last_bet_ts(&wallet) {
        if now.saturating_sub(last_ts) < settings.bet_cooldown_ns {
            return Err(BetError::BetCooldown);
        }
    }

    // per-leg gates; cannot bet multiple selections on the same match
    let mut seen_events = HashSet::new();
    let mut combined_odds = 1.0_f64;
    let mut legs = Vec::with_capacity(args.selections.len());
    for selection in &args.selections {
        if selection.event_id.trim().is_empty() {
            return Err(BetError::MissingEventId);
        }
        if !seen_events.insert(selection.event_id.clone()) {
            return Err(BetError::DuplicateEventInParlay);
        }
        if !selection.odds.is_finite() || selection.odds <= 1.0 {
            return Err(BetError::InvalidOdds);
        }
        let lookup = check_selection(
            &selection.event_id,
            &selection.market_id,
            &selection.outcome_id,
            &selection.prediction,
            selection.odds,
            selection.is_live,
            now,
            &settings,
        )?;
        combined_odds *= selection.odds;

        let event_name = selection
            .event_name
            .clone()
            .unwrap_or_else(|| format!("{} vs {}", lookup.home_team, lookup.away_team));
        legs.push(ParlayLeg {
            event_id: selection.event_id.clone(),
            event_name,
            market_id: selection.market_id.clone(),
            outcome_id: selection.outcome_id.clone(),
            prediction: selection.prediction.clone(),
            odds: selection.odds,
            result: None,
        });
    }
    if !combined_odds.is_finite() || combined_odds <= 1.0 {
        return Err(BetError::InvalidOdds);
    }

    let usd = usd_value(
        args.stake,
        match args.currency {
            Currency::SUI => settings.sui_price_usd,
            Currency::SBETS => settings.sbets_price_usd,
        },
    );
    let limits = user_limits_map::get_or_create(&wallet, now);
    if limits.is_self_excluded(now) {
        return Err(BetError::SelfExcluded);
    }
    match limits.exceeded_window(usd) {
        Some(LimitWindow::Daily) => return Err(BetError::DailyLimitExceeded),
        Some(LimitWindow::Weekly) => return Err(BetError::WeeklyLimitExceeded),
        Some(LimitWindow::Monthly) => return Err(BetError::MonthlyLimitExceeded),
        None => {}
    }

    user_map::get_or_create(&wallet, now);
    if args.tx_hash.is_none() {
        // validated against platform balance on the off-chain path only
        user_map::deduct_platform_balance(&wallet, args.currency, args.stake).map_err(|_| BetError::InsufficientBalance)?;
    }

    let parlay = StableParlay {
        parlay_id: args.on_chain_bet_id.clone().unwrap_or_default(),
        wallet_address: wallet.clone(),
        legs,
        combined_odds,
        stake: args.stake,
        currency: args.currency,
        potential_payout: round_2(args.stake * combined_odds),
        status: if args.tx_hash.is_some() { BetStatus::Confirmed } else { BetStatus::Pending },
        tx_hash: args.tx_hash.clone(),
        on_chain_bet_id: args.on_chain_bet_id.clone(),
        created_at: now,
        settled_at: None,
        settlement_tx_hash: None,
    };
    let parlay_id = parlay_map::insert(&parlay);

    user_limits_map::add_spent(&wallet, usd, now);
    user_map::add_loyalty_points(&wallet, usd.floor());
    user_map::add_bet_volume(&wallet, usd);
    ICNetwork::info_log(&format!(
        "Parlay {} accepted: wallet={} legs={} combined_odds={:.2}",
        parlay_id,
        wallet,
        args.selections.len(),
        combined_odds
    ));

    Ok(PlaceParlayReply {
        parlay_id,
        status: parlay.status.to_string(),
        combined_odds: parlay.combined_odds,
        potential_payout: parlay.potential_payout,
        created_at: parlay.created_at,
    })
}
