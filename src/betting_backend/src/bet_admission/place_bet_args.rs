use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::event_registry::registry::EventSource;
use crate::stable_bet::stable_bet::StableBet;
use crate::token::Currency;

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct PlaceBetArgs {
    pub wallet_address: String,
    pub event_id: String,
    pub event_name: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub market_id: String,
    pub outcome_id: String,
    pub prediction: String,
    pub odds: f64,
    pub stake: f64,
    pub currency: Currency,
    pub is_live: bool,
    pub match_minute: Option<u32>,
    pub tx_hash: Option<String>,
    pub on_chain_bet_id: Option<String>,
    pub use_bonus: bool,
    pub use_free_bet: bool,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct PlaceBetReply {
    pub bet_id: String,
    pub status: String,
    pub potential_payout: f64,
    pub platform_fee: f64,
    pub created_at: u64,
}

impl PlaceBetReply {
    pub fn from_bet(bet: &StableBet) -> Self {
        Self {
            bet_id: bet.bet_id.clone(),
            status: bet.status.to_string(),
            potential_payout: bet.potential_payout,
            platform_fee: bet.platform_fee,
            created_at: bet.created_at,
        }
    }
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct ValidateBetArgs {
    pub event_id: String,
    pub is_live: bool,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct ValidateBetReply {
    pub valid: bool,
    pub event_id: String,
    pub match_minute: Option<u32>,
    pub source: EventSource,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct ParlayLegArgs {
    pub event_id: String,
    pub event_name: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub market_id: String,
    pub outcome_id: String,
    pub prediction: String,
    pub odds: f64,
    pub is_live: bool,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct PlaceParlayArgs {
    pub wallet_address: String,
    pub selections: Vec<ParlayLegArgs>,
    pub stake: f64,
    pub currency: Currency,
    pub tx_hash: Option<String>,
    pub on_chain_bet_id: Option<String>,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct PlaceParlayReply {
    pub parlay_id: String,
    pub status: String,
    pub combined_odds: f64,
    pub potential_payout: f64,
    pub created_at: u64,
}
