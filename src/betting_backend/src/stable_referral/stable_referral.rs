use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

/// Keyed by the referred wallet: a wallet can only be referred once.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableReferralId(pub String);

impl Storable for StableReferralId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableReferralId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableReferralId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferralStatus {
    Pending,
    Rewarded,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StableReferral {
    pub referred_wallet: String,
    pub referrer_wallet: String,
    pub status: ReferralStatus,
    pub created_at: u64,
    pub rewarded_at: Option<u64>,
}

impl Storable for StableReferral {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableReferral").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableReferral")
    }

    const BOUND: Bound = Bound::Unbounded;
}
