use crate::event_registry::registry::{self, EventLookup};
use crate::helpers::math_helpers::{round_2, usd_value};
use crate::ic::network::ICNetwork;
use crate::stable_bet::bet_map;
use crate::stable_bet::stable_bet::{BetStatus, PaymentMethod, StableBet};
use crate::stable_deposit::deposit_map;
use crate::stable_limits::stable_user_limits::LimitWindow;
use crate::stable_limits::user_limits_map;
use crate::stable_referral::referral_map;
use crate::stable_settings::settings_map;
use crate::stable_settings::stable_settings::StableSettings;
use crate::stable_user::user_map;
use crate::token::Currency;

use super::bet_error::BetError;
use super::event_checks;
use super::odds_guard;
use super::place_bet_args::{PlaceBetArgs, PlaceBetReply, ValidateBetArgs, ValidateBetReply};

/// Event-only validation, the pre-flight the frontend calls before asking
/// the wallet to sign.
pub fn validate_bet(args: ValidateBetArgs) -> Result<ValidateBetReply, BetError> {
    if args.event_id.trim().is_empty() {
        return Err(BetError::MissingEventId);
    }
    let now = ICNetwork::get_time();
    let settings = settings_map::get();
    let lookup = registry::lookup_event(&args.event_id, now);
    event_checks::check_event(
        &lookup,
        args.is_live,
        settings.live_cache_max_age_ns,
        settings.upcoming_cache_max_age_ns,
    )?;
    Ok(ValidateBetReply {
        valid: true,
        event_id: args.event_id,
        match_minute: lookup.minute,
        source: lookup.source,
    })
}

/// The admission pipeline. Ordered so free checks reject before the event
/// lookup and the event lookup rejects before anything is persisted; by the
/// time money or rows move, every gate has passed.
pub fn place_bet(args: PlaceBetArgs) -> Result<PlaceBetReply, BetError> {
    let now = ICNetwork::get_time();
    let settings = settings_map::get();
    let wallet = args.wallet_address.to_lowercase();

    // 1. policy gates
    check_policy(&args, &wallet, &settings)?;
    let (event_name, home_team, away_team) = resolve_teams(&args)?;

    // 2. durable rate / cooldown / per-event gates
    check_rate_gates(&wallet, &args.event_id, now, &settings)?;

    // 3. duplicate selection
    if bet_map::find_open_duplicate(&wallet, &args.event_id, &args.market_id, &args.outcome_id).is_some() {
        return Err(BetError::DuplicateBet);
    }

    // 4. event registry, fail-closed
    let lookup = registry::lookup_event(&args.event_id, now);
    event_checks::check_event(
        &lookup,
        args.is_live,
        settings.live_cache_max_age_ns,
        settings.upcoming_cache_max_age_ns,
    )?;

    // 5. market-time rules
    event_checks::check_live_market(&args.market_id, args.is_live, lookup.minute)?;

    // 6. anti-cheat odds-vs-score, on registry-verified scores only
    odds_guard::check_suspicious_odds(
        &args.market_id,
        &args.outcome_id,
        &args.prediction,
        &home_team,
        &away_team,
        lookup.home_score,
        lookup.away_score,
        lookup.minute,
        args.odds,
    )?;

    // 7. limits and promotion gates
    let usd = usd_value(args.stake, price_usd(args.currency, &settings));
    let payment_method = check_limits(&args, &wallet, usd, now)?;

    // 8. persist, consuming the funding source decided above
    let user = user_map::get_or_create(&wallet, now);
    let is_first_bet = bet_map::wallet_bet_count(&wallet) == 0;
    match payment_method {
        PaymentMethod::PlatformBalance => {
            user_map::deduct_platform_balance(&wallet, args.currency, args.stake).map_err(|_| BetError::InsufficientBalance)?
        }
        PaymentMethod::FreeBet => {
            user_map::consume_free_bet(&wallet, args.stake as u64).map_err(|_| BetError::InsufficientBalance)?
        }
        PaymentMethod::OnChain => {} // the contract already holds the stake
    }
    if args.use_bonus {
        let _ = user_map::consume_bonus(&wallet, usd);
    }

    let platform_fee = match payment_method {
        // the contract already takes fees on the wallet-signed path
        PaymentMethod::OnChain => 0.0,
        _ => args.stake * settings.platform_fee_rate,
    };
    let bet = StableBet {
        bet_id: args.on_chain_bet_id.clone().unwrap_or_default(),
        wallet_address: wallet.clone(),
        event_id: args.event_id.clone(),
        event_name,
        home_team,
        away_team,
        market_id: args.market_id.clone(),
        outcome_id: args.outcome_id.clone(),
        prediction: args.prediction.clone(),
        odds: args.odds,
        stake: args.stake,
        currency: args.currency,
        potential_payout: round_2(args.stake * args.odds),
        status: if args.tx_hash.is_some() { BetStatus::Confirmed } else { BetStatus::Pending },
        payment_method,
        used_bonus: args.use_bonus,
        platform_fee,
        is_live: args.is_live,
        match_minute: args.match_minute.or(lookup.minute),
        tx_hash: args.tx_hash.clone(),
        on_chain_bet_id: args.on_chain_bet_id.clone(),
        created_at: now,
        settled_at: None,
        settlement_tx_hash: None,
    };
    let bet_id = bet_map::insert(&bet);

    // 9. best-effort side effects; none of these can fail the bet
    user_limits_map::add_spent(&wallet, usd, now);
    user_map::add_loyalty_points(&wallet, usd.floor());
    user_map::add_bet_volume(&wallet, usd);
    if is_first_bet {
        if let Some(referrer) = referral_map::mark_rewarded(&wallet, now) {
            user_map::get_or_create(&referrer, now);
            if let Err(e) = user_map::add_platform_balance(&referrer, Currency::SBETS, settings.referral_bonus_sbets as f64) {
                ICNetwork::error_log(&format!("Referral bonus credit failed for {}: {}", referrer, e));
            }
        }
    }
    ICNetwork::info_log(&format!(
        "Bet {} accepted: wallet={} event={} stake={} {}",
        bet_id, user.wallet_address, args.event_id, args.stake, args.currency
    ));

    Ok(PlaceBetReply::from_bet(&StableBet { bet_id, ..bet }))
}

fn price_usd(currency: Currency, settings: &StableSettings) -> f64 {
    match currency {
        Currency::SUI => settings.sui_price_usd,
        Currency::SBETS => settings.sbets_price_usd,
    }
}

fn check_policy(args: &PlaceBetArgs, wallet: &str, settings: &StableSettings) -> Result<(), BetError> {
    if args.event_id.trim().is_empty() {
        return Err(BetError::MissingEventId);
    }
    if settings.blocked_wallets.iter().any(|w| w == wallet) {
        return Err(BetError::WalletBlocked);
    }
    if settings.sui_betting_paused && args.currency == Currency::SUI {
        return Err(BetError::SuiBettingPaused);
    }
    if !args.odds.is_finite() || args.odds <= 1.0 {
        return Err(BetError::InvalidOdds);
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
    if let Some(name) = &args.event_name {
        if name.trim().is_empty() || name.trim().eq_ignore_ascii_case("unknown") {
            return Err(BetError::InvalidEvent);
        }
    }
    if let Some(tx_hash) = &args.tx_hash {
        // on-chain tx ids are admitted once across the whole system
        if bet_map::tx_hash_exists(tx_hash) || deposit_map::tx_hash_exists(tx_hash) {
            return Err(BetError::DuplicateTransaction);
        }
    }
    Ok(())
}

/// Team names from args, falling back to the registry. A wallet-signed bet
/// whose teams cannot be resolved gets synthesized names so the funds it
/// already moved on-chain are not orphaned.
fn resolve_teams(args: &PlaceBetArgs) -> Result<(String, String, String), BetError> {
    let (home_team, away_team) = match (&args.home_team, &args.away_team) {
        (Some(home), Some(away)) if !home.trim().is_empty() && !away.trim().is_empty() => (home.clone(), away.clone()),
        _ => match registry::team_names(&args.event_id) {
            Some((home, away)) => (home, away),
            None => {
                if args.tx_hash.is_some() {
                    ICNetwork::error_log(&format!(
                        "Synthesizing team names for on-chain bet on {}: funds already moved",
                        args.event_id
                    ));
                    ("Home Team".to_string(), "Away Team".to_string())
                } else {
                    return Err(BetError::InvalidTeams);
                }
            }
        },
    };
    let event_name = args
        .event_name
        .clone()
        .unwrap_or_else(|| format!("{} vs {}", home_team, away_team));
    Ok((event_name, home_team, away_team))
}

fn check_rate_gates(wallet: &str, event_id: &str, now: u64, settings: &StableSettings) -> Result<(), BetError> {
    let day_ago = now.saturating_sub(24 * 60 * 60 * 1_000_000_000);
    if bet_map::count_wallet_bets_since(wallet, day_ago) >= settings.max_bets_per_day {
        return Err(BetError::RateLimitExceeded);
    }
    if let Some(last_ts) = bet_map::last_bet_ts(wallet) {
        if now.saturating_sub(last_ts) < settings.bet_cooldown_ns {
            return Err(BetError::BetCooldown);
        }
    }
    if bet_map::count_wallet_event_bets(wallet, event_id) >= settings.max_bets_per_event {
        return Err(BetError::EventBetLimit);
    }
    Ok(())
}

/// Limits, self-exclusion and the free-bet gate. Decides how the stake is
/// funded without consuming anything yet.
fn check_limits(args: &PlaceBetArgs, wallet: &str, usd: f64, now: u64) -> Result<PaymentMethod, BetError> {
    let limits = user_limits_map::get_or_create(wallet, now);
    if limits.is_self_excluded(now) {
        return Err(BetError::SelfExcluded);
    }
    match limits.exceeded_window(usd) {
        Some(LimitWindow::Daily) => return Err(BetError::DailyLimitExceeded),
        Some(LimitWindow::Weekly) => return Err(BetError::WeeklyLimitExceeded),
        Some(LimitWindow::Monthly) => return Err(BetError::MonthlyLimitExceeded),
        None => {}
    }

    if args.tx_hash.is_some() {
        return Ok(PaymentMethod::OnChain);
    }
    if args.use_free_bet && args.currency == Currency::SBETS {
        // free bets are once per wallet, ever
        if bet_map::wallet_has_used_free_bet(wallet) {
            return Err(BetError::FreeBetAlreadyUsed);
        }
        let user = user_map::get_or_create(wallet, now);
        if user.free_bet_balance < args.stake as u64 {
            return Err(BetError::InsufficientBalance);
        }
        return Ok(PaymentMethod::FreeBet);
    }
    let user = user_map::get_or_create(wallet, now);
    let balance = match args.currency {
        Currency::SUI => user.balance_sui,
        Currency::SBETS => user.balance_sbets,
    };
    if balance < args.stake {
        return Err(BetError::InsufficientBalance);
    }
    Ok(PaymentMethod::PlatformBalance)
}

/// Shared by the parlay pipeline: steps 4-6 for one selection.
pub fn check_selection(
    event_id: &str,
    market_id: &str,
    outcome_id: &str,
    prediction: &str,
    odds: f64,
    is_live: bool,
    now: u64,
    settings: &StableSettings,
) -> Result<EventLookup, BetError> {
    let lookup = registry::lookup_event(event_id, now);
    event_checks::check_event(&lookup, is_live, settings.live_cache_max_age_ns, settings.upcoming_cache_max_age_ns)
        .map_err(|e| match e {
            BetError::EventNotFound => BetError::InvalidParlayEvent,
            other => other,
        })?;
    event_checks::check_live_market(market_id, is_live, lookup.minute)?;
    odds_guard::check_suspicious_odds(
        market_id,
        outcome_id,
        prediction,
        &lookup.home_team,
        &lookup.away_team,
        lookup.home_score,
        lookup.away_score,
        lookup.minute,
        odds,
    )?;
    Ok(lookup)
}
