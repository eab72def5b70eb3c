use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

use crate::stable_bet::stable_bet::BetStatus;
use crate::token::Currency;

#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableParlayId(pub String);

impl Storable for StableParlayId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableParlayId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableParlayId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

/// One selection inside a parlay. Legs settle individually; the parlay
/// settles once every leg has a result.
#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct ParlayLeg {
    pub event_id: String,
    pub event_name: String,
    pub market_id: String,
    pub outcome_id: String,
    pub prediction: String,
    pub odds: f64,
    // None until the leg's event settles. Void legs drop out of the
    // combined odds at payout time.
    pub result: Option<BetStatus>,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StableParlay {
    pub parlay_id: String,
    pub wallet_address: String,
    pub legs: Vec<ParlayLeg>,
    pub combined_odds: f64, // product of leg odds
    pub stake: f64,
    pub currency: Currency,
    pub potential_payout: f64,
    pub status: BetStatus,
    pub tx_hash: Option<String>,
    pub on_chain_bet_id: Option<String>,
    pub created_at: u64,
    pub settled_at: Option<u64>,
    pub settlement_tx_hash: Option<String>,
}

impl Storable for StableParlay {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableParlay").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableParlay")
    }

    const BOUND: Bound = Bound::Unbounded;
}
