use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

use super::stable_prediction::PredictionSide;

#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StablePredictionBetId(pub u64);

impl Storable for StablePredictionBetId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StablePredictionBetId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StablePredictionBetId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StablePredictionBet {
    pub bet_id: u64,
    pub prediction_id: u64,
    pub wallet_address: String,
    pub side: PredictionSide,
    pub amount: u64, // SBETS
    pub tx_id: String, // on-chain tx, admitted at most once across the system
    pub created_at: u64,
}

impl Storable for StablePredictionBet {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StablePredictionBet").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StablePredictionBet")
    }

    const BOUND: Bound = Bound::Unbounded;
}
