use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

/// One claim per wallet per ISO week.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableRevenueClaimId {
    pub wallet_address: String,
    pub week_start: u64,
}

impl Storable for StableRevenueClaimId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableRevenueClaimId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableRevenueClaimId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StableRevenueClaim {
    pub wallet_address: String,
    pub week_start: u64,
    pub holder_balance: f64, // SBETS balance snapshot at claim time
    pub share_percentage: f64,
    pub claimed_sui: f64,
    pub claimed_sbets: f64,
    pub sui_tx_hash: Option<String>,
    pub sbets_tx_hash: Option<String>,
    pub claimed_at: u64,
}

impl Storable for StableRevenueClaim {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableRevenueClaim").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableRevenueClaim")
    }

    const BOUND: Bound = Bound::Unbounded;
}
