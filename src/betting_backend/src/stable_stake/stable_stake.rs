use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableStakeId(pub u64);

impl Storable for StableStakeId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableStakeId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableStakeId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StableStake {
    pub stake_id: u64,
    pub wallet_address: String,
    pub amount: u64, // SBETS
    pub staked_at: u64,
    pub locked_until: u64, // staked_at + lock period
    pub active: bool,
    pub unstaking_at: Option<u64>,
    // cached accrual snapshot; invariant: accumulated <= amount * APY
    pub accumulated_reward: u64,
    pub tx_hash: String, // unique across the system
}

impl Storable for StableStake {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableStake").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableStake")
    }

    const BOUND: Bound = Bound::Unbounded;
}
