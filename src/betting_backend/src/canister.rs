use ic_cdk::{init, post_upgrade, query, update};
use ic_cdk_timers::set_timer_interval;
use std::time::Duration;

use crate::admin::session;
use crate::bet_admission::place_bet_args::{
    PlaceBetArgs, PlaceBetReply, PlaceParlayArgs, PlaceParlayReply, ValidateBetArgs, ValidateBetReply,
};
use crate::bet_admission::{place_bet, place_parlay};
use crate::controllers::settings as settings_controller;
use crate::controllers::status::{self, StatusReply};
use crate::event_registry::raw_event::{sport_list, Event, SportInfo};
use crate::event_registry::{refresh, registry};
use crate::ic::guards::not_in_maintenance_mode;
use crate::ic::network::ICNetwork;
use crate::revenue::claim::{ClaimReply, ClaimableReply};
use crate::revenue::revenue::RevenueStatsReply;
use crate::revenue::{claim as revenue_claim, revenue};
use crate::settlement::reconcile::{self, ReconcileReport};
use crate::settlement::{settle_bet as admin_settlement, worker as settlement_worker};
use crate::social::challenge_actions::{self, CreateChallengeArgs, JoinChallengeArgs};
use crate::social::challenge_refund;
use crate::social::prediction_actions::{self, CreatePredictionArgs, PredictionBetArgs};
use crate::social::prediction_resolver;
use crate::stable_bet::stable_bet::{BetStatus, StableBet};
use crate::stable_challenge::stable_challenge::{ChallengeStatus, ChallengeWinner, StableChallenge};
use crate::stable_limits::stable_user_limits::StableUserLimits;
use crate::stable_limits::user_limits_map;
use crate::stable_parlay::stable_parlay::StableParlay;
use crate::stable_prediction::stable_prediction::{PredictionSide, PredictionStatus, StablePrediction};
use crate::stable_referral::referral_map;
use crate::stable_referral::stable_referral::{ReferralStatus, StableReferral};
use crate::stable_settings::settings_map;
use crate::stable_settings::stable_settings::StableSettings;
use crate::stable_settled_event::stable_settled_event::StableSettledEvent;
use crate::staking::stake_actions::{self, ClaimRewardsReply, StakeArgs, StakingInfoReply, UnstakeReply};
use crate::staking::worker as staking_worker;
use crate::user::balance::{self, BalanceReply, DepositArgs, DepositReply, WithdrawArgs, WithdrawReply};
use crate::user::bet_actions::{self, CashOutArgs, CashOutReply};
use crate::{APP_NAME, APP_VERSION};

#[init]
fn init() {
    ICNetwork::info_log(&format!("{} canister is being initialized", APP_NAME));
    set_timer_processes();
}

#[post_upgrade]
fn post_upgrade() {
    ICNetwork::info_log(&format!("{} canister has been upgraded to {}", APP_NAME, APP_VERSION));
    set_timer_processes();
}

/// Start every background worker. In-memory guards and caches start empty;
/// everything durable is already in stable memory.
fn set_timer_processes() {
    let settings = settings_map::get();

    let _ = set_timer_interval(Duration::from_secs(settings.settlement_interval_secs), || {
        ic_cdk::futures::spawn(async {
            settlement_worker::run_settlement_cycle().await;
        });
    });
    let _ = set_timer_interval(Duration::from_secs(settings.social_resolver_interval_secs), || {
        ic_cdk::futures::spawn(async {
            prediction_resolver::run_prediction_resolver().await;
        });
    });
    let _ = set_timer_interval(Duration::from_secs(settings.social_resolver_interval_secs), || {
        ic_cdk::futures::spawn(async {
            challenge_refund::run_challenge_refunder().await;
        });
    });
    let _ = set_timer_interval(Duration::from_secs(settings.staking_accrual_interval_secs), || {
        staking_worker::run_staking_accrual();
    });
    let _ = set_timer_interval(Duration::from_secs(settings.session_sweep_interval_secs), || {
        session::sweep_expired();
    });
    let _ = set_timer_interval(Duration::from_secs(settings.live_refresh_interval_secs), || {
        ic_cdk::futures::spawn(async {
            refresh::refresh_live().await;
        });
    });
    let _ = set_timer_interval(Duration::from_secs(settings.upcoming_refresh_interval_secs), || {
        ic_cdk::futures::spawn(async {
            refresh::refresh_upcoming().await;
        });
    });
    let _ = set_timer_interval(Duration::from_secs(settings.odds_prefetch_interval_secs), || {
        ic_cdk::futures::spawn(async {
            refresh::prefetch_odds().await;
        });
    });
    let _ = set_timer_interval(Duration::from_secs(settings.free_sports_refresh_interval_secs), || {
        ic_cdk::futures::spawn(async {
            refresh::refresh_free_daily().await;
        });
    });
}

// events

#[query]
fn get_sports() -> Vec<SportInfo> {
    sport_list()
}

#[update]
async fn get_events(sport_id: u32, is_live: bool) -> Vec<Event> {
    if is_live {
        registry::get_live(sport_id).await
    } else {
        registry::get_upcoming(sport_id).await
    }
}

#[query]
fn get_event_results(period: String, sport_id: Option<u32>) -> Result<Vec<StableSettledEvent>, String> {
    bet_actions::get_event_results(&period, sport_id)
}

// bets

#[query]
fn validate_bet(args: ValidateBetArgs) -> Result<ValidateBetReply, String> {
    place_bet::validate_bet(args).map_err(|e| e.code())
}

#[update(guard = "not_in_maintenance_mode")]
fn place_single_bet(args: PlaceBetArgs) -> Result<PlaceBetReply, String> {
    place_bet::place_bet(args).map_err(|e| e.code())
}

#[update(guard = "not_in_maintenance_mode")]
fn place_parlay_bet(args: PlaceParlayArgs) -> Result<PlaceParlayReply, String> {
    place_parlay::place_parlay(args).map_err(|e| e.code())
}

#[query]
fn get_bets(wallet_address: String, status: Option<BetStatus>) -> Vec<StableBet> {
    bet_actions::get_bets(&wallet_address, status)
}

#[query]
fn get_parlays(wallet_address: String) -> Vec<StableParlay> {
    bet_actions::get_parlays(&wallet_address)
}

#[update(guard = "not_in_maintenance_mode")]
fn cash_out_bet(args: CashOutArgs) -> Result<CashOutReply, String> {
    bet_actions::cash_out(args)
}

// balance

#[update]
async fn get_user_balance(wallet_address: String) -> BalanceReply {
    balance::get_user_balance(&wallet_address).await
}

#[update(guard = "not_in_maintenance_mode")]
async fn deposit(args: DepositArgs) -> Result<DepositReply, String> {
    balance::deposit(args).await
}

#[update(guard = "not_in_maintenance_mode")]
async fn withdraw(args: WithdrawArgs) -> Result<WithdrawReply, String> {
    balance::withdraw(args).await
}

// limits & referrals

#[update(guard = "not_in_maintenance_mode")]
fn set_user_limits(
    wallet_address: String,
    daily: Option<f64>,
    weekly: Option<f64>,
    monthly: Option<f64>,
) -> StableUserLimits {
    user_limits_map::set_limits(&wallet_address, daily, weekly, monthly, ICNetwork::get_time())
}

#[update(guard = "not_in_maintenance_mode")]
fn set_self_exclusion(wallet_address: String, until: Option<u64>) -> StableUserLimits {
    user_limits_map::set_self_exclusion(&wallet_address, until, ICNetwork::get_time())
}

#[update(guard = "not_in_maintenance_mode")]
fn register_referral(referred_wallet: String, referrer_wallet: String) -> Result<(), String> {
    if referred_wallet.to_lowercase() == referrer_wallet.to_lowercase() {
        return Err("Cannot refer yourself".to_string());
    }
    referral_map::insert(&StableReferral {
        referred_wallet: referred_wallet.to_lowercase(),
        referrer_wallet: referrer_wallet.to_lowercase(),
        status: ReferralStatus::Pending,
        created_at: ICNetwork::get_time(),
        rewarded_at: None,
    })
}

// revenue

#[query]
fn get_revenue_stats() -> RevenueStatsReply {
    revenue::get_revenue_stats()
}

#[update]
async fn get_claimable_revenue(wallet_address: String) -> ClaimableReply {
    revenue_claim::get_claimable(&wallet_address).await
}

#[update(guard = "not_in_maintenance_mode")]
async fn claim_revenue(wallet_address: String) -> Result<ClaimReply, String> {
    revenue_claim::claim_revenue(&wallet_address).await
}

// staking

#[query]
fn get_staking_info(wallet_address: String) -> StakingInfoReply {
    stake_actions::get_staking_info(&wallet_address)
}

#[update(guard = "not_in_maintenance_mode")]
fn stake(args: StakeArgs) -> Result<u64, String> {
    stake_actions::stake(args)
}

#[update(guard = "not_in_maintenance_mode")]
async fn unstake(wallet_address: String, stake_id: u64) -> Result<UnstakeReply, String> {
    stake_actions::unstake(&wallet_address, stake_id).await
}

#[update(guard = "not_in_maintenance_mode")]
async fn claim_staking_rewards(wallet_address: String) -> Result<ClaimRewardsReply, String> {
    stake_actions::claim_rewards(&wallet_address).await
}

// social predictions

#[query]
fn get_predictions(status: Option<PredictionStatus>) -> Vec<StablePrediction> {
    prediction_actions::get_predictions(status)
}

#[update(guard = "not_in_maintenance_mode")]
fn create_prediction(args: CreatePredictionArgs) -> Result<u64, String> {
    prediction_actions::create_prediction(args)
}

#[update(guard = "not_in_maintenance_mode")]
fn place_prediction_bet(args: PredictionBetArgs) -> Result<u64, String> {
    prediction_actions::place_prediction_bet(args)
}

#[update(guard = "not_in_maintenance_mode")]
async fn resolve_prediction(prediction_id: u64, caller_wallet: String, outcome: PredictionSide) -> Result<String, String> {
    prediction_actions::resolve_prediction_manual(prediction_id, &caller_wallet, outcome).await
}

// social challenges

#[query]
fn get_challenges(status: Option<ChallengeStatus>) -> Vec<StableChallenge> {
    challenge_actions::get_challenges(status)
}

#[update(guard = "not_in_maintenance_mode")]
fn create_challenge(args: CreateChallengeArgs) -> Result<u64, String> {
    challenge_actions::create_challenge(args)
}

#[update(guard = "not_in_maintenance_mode")]
fn join_challenge(args: JoinChallengeArgs) -> Result<u64, String> {
    challenge_actions::join_challenge(args)
}

#[update(guard = "not_in_maintenance_mode")]
async fn settle_challenge(challenge_id: u64, caller_wallet: String, winner: ChallengeWinner) -> Result<String, String> {
    challenge_actions::settle_challenge(challenge_id, &caller_wallet, winner).await
}

// admin

#[update]
fn admin_login(password: String) -> Result<String, String> {
    session::login(&password)
}

#[update]
async fn admin_settle_bet(auth: String, bet_id: String, outcome: String) -> Result<String, String> {
    session::verify(&auth)?;
    admin_settlement::settle_bet(&bet_id, &outcome).await
}

#[update]
async fn admin_run_settlement(auth: String) -> Result<(), String> {
    session::verify(&auth)?;
    settlement_worker::run_settlement_cycle().await;
    Ok(())
}

#[update]
async fn admin_reconcile(auth: String) -> Result<ReconcileReport, String> {
    session::verify(&auth)?;
    reconcile::reconcile().await
}

#[update]
fn admin_set_sui_betting_paused(auth: String, paused: bool) -> Result<(), String> {
    settings_controller::set_sui_betting_paused(&auth, paused)
}

#[update]
fn admin_set_maintenance_mode(auth: String, enabled: bool) -> Result<(), String> {
    settings_controller::set_maintenance_mode(&auth, enabled)
}

#[update]
fn admin_block_wallet(auth: String, wallet_address: String) -> Result<(), String> {
    settings_controller::block_wallet(&auth, &wallet_address)
}

#[update]
fn admin_unblock_wallet(auth: String, wallet_address: String) -> Result<(), String> {
    settings_controller::unblock_wallet(&auth, &wallet_address)
}

#[update]
fn admin_get_settings(auth: String) -> Result<StableSettings, String> {
    settings_controller::get_settings(&auth)
}

#[update]
fn admin_update_settings(auth: String, settings: StableSettings) -> Result<(), String> {
    settings_controller::update_settings(&auth, settings)
}

#[query]
fn get_status() -> StatusReply {
    status::get_status()
}

ic_cdk::export_candid!();
