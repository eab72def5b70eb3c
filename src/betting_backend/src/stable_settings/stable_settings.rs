use candid::{CandidType, Principal};
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

use crate::helpers::time_helpers::{NANOS_PER_DAY, NANOS_PER_MINUTE, NANOS_PER_SECOND};

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StableSettings {
    // ledgers and platform accounts
    pub sui_ledger: Principal,
    pub sbets_ledger: Principal,
    pub platform_wallets: Vec<String>, // excluded from the holders snapshot
    pub blocked_wallets: Vec<String>,

    // operational flags
    pub maintenance_mode: bool,
    pub sui_betting_paused: bool,
    pub payouts_onchain: bool,

    // admin
    pub admin_password: String, // empty rejects all logins

    // price constants for USD valuation
    pub sui_price_usd: f64,
    pub sbets_price_usd: f64,

    // admission policy
    pub max_stake_sui: f64,
    pub max_stake_sbets: f64,
    pub max_bets_per_day: u32,
    pub max_bets_per_event: u32,
    pub bet_cooldown_ns: u64,
    pub platform_fee_rate: f64,

    // event registry freshness
    pub live_cache_max_age_ns: u64,
    pub upcoming_cache_max_age_ns: u64,
    pub snapshot_max_age_ns: u64,

    // revenue engine
    pub revenue_share_holders: f64,
    pub revenue_share_treasury: f64,
    pub revenue_share_profit: f64,
    pub revenue_cutoff_ts: u64, // bets settled before this are excluded
    pub min_claim_sui: f64,
    pub min_claim_sbets: f64,

    // staking
    pub staking_apy: f64,
    pub min_stake_sbets: u64,
    pub staking_lock_ns: u64,

    // promotion
    pub referral_bonus_sbets: u64,

    // upstream endpoints
    pub sports_api_url: String,
    pub sports_api_key: String,
    pub free_sports_api_url: String,
    pub holders_api_url: String,

    // worker intervals
    pub settlement_interval_secs: u64,
    pub social_resolver_interval_secs: u64,
    pub staking_accrual_interval_secs: u64,
    pub session_sweep_interval_secs: u64,
    pub odds_prefetch_interval_secs: u64,
    pub live_refresh_interval_secs: u64,
    pub upcoming_refresh_interval_secs: u64,
    pub free_sports_refresh_interval_secs: u64,

    // counters for stable maps
    pub bet_map_idx: u64,
    pub parlay_map_idx: u64,
    pub prediction_map_idx: u64,
    pub prediction_bet_map_idx: u64,
    pub challenge_map_idx: u64,
    pub participant_map_idx: u64,
    pub stake_map_idx: u64,
}

impl Default for StableSettings {
    fn default() -> Self {
        Self {
            sui_ledger: Principal::anonymous(),
            sbets_ledger: Principal::anonymous(),
            platform_wallets: Vec::new(),
            blocked_wallets: Vec::new(),
            maintenance_mode: false,
            sui_betting_paused: false,
            payouts_onchain: true,
            admin_password: String::new(),
            sui_price_usd: 1.50,
            sbets_price_usd: 0.000001,
            max_stake_sui: 100.0,
            max_stake_sbets: 10_000.0,
            max_bets_per_day: 7,
            max_bets_per_event: 2,
            bet_cooldown_ns: 30 * NANOS_PER_SECOND,
            platform_fee_rate: 0.01,
            live_cache_max_age_ns: 90 * NANOS_PER_SECOND,
            upcoming_cache_max_age_ns: 15 * NANOS_PER_MINUTE,
            snapshot_max_age_ns: 10 * NANOS_PER_MINUTE,
            revenue_share_holders: 0.30,
            revenue_share_treasury: 0.40,
            revenue_share_profit: 0.30,
            revenue_cutoff_ts: 0,
            min_claim_sui: 0.001,
            min_claim_sbets: 1.0,
            staking_apy: 0.05,
            min_stake_sbets: 100_000,
            staking_lock_ns: 7 * NANOS_PER_DAY,
            referral_bonus_sbets: 1_000,
            sports_api_url: String::new(),
            sports_api_key: String::new(),
            free_sports_api_url: String::new(),
            holders_api_url: String::new(),
            settlement_interval_secs: 60,
            social_resolver_interval_secs: 120,
            staking_accrual_interval_secs: 3_600,
            session_sweep_interval_secs: 300,
            odds_prefetch_interval_secs: 120,
            live_refresh_interval_secs: 30,
            upcoming_refresh_interval_secs: 300,
            free_sports_refresh_interval_secs: 86_400,
            bet_map_idx: 0,
            parlay_map_idx: 0,
            prediction_map_idx: 0,
            prediction_bet_map_idx: 0,
            challenge_map_idx: 0,
            participant_map_idx: 0,
            stake_map_idx: 0,
        }
    }
}

impl Storable for StableSettings {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableSettings").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        // if any error occurs retrieving the settings, use the default
        serde_cbor::from_slice(&bytes).unwrap_or_default()
    }

    const BOUND: Bound = Bound::Unbounded;
}
