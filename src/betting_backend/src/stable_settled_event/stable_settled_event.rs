use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableSettledEventId(pub String);

impl Storable for StableSettledEventId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableSettledEventId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableSettledEventId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

/// Immutable record of a finished event. Written exactly once per event by
/// the settlement worker; its presence stops re-processing.
#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StableSettledEvent {
    pub event_id: String,
    pub sport_id: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub winner: String,
    pub settled_at: u64,
    pub bets_settled: u32,
}

impl Storable for StableSettledEvent {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableSettledEvent").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableSettledEvent")
    }

    const BOUND: Bound = Bound::Unbounded;
}
