use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

/// Users are keyed by lowercased wallet address. Created on first wallet
/// connect, never destroyed.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableUserId(pub String);

impl Storable for StableUserId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableUserId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableUserId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StableUser {
    pub wallet_address: String,
    pub display_name: String,
    // platform balances in token units, credited by settlement and deposits
    pub balance_sui: f64,
    pub balance_sbets: f64,
    // integer count of SBETS free bets
    pub free_bet_balance: u64,
    pub welcome_bonus_claimed: bool,
    // promotion bonus in USD, consumed by use_bonus bets
    pub bonus_balance: f64,
    pub loyalty_points: f64,
    pub total_bet_volume_usd: f64,
    pub created_at: u64,
}

impl StableUser {
    pub fn new(wallet_address: &str, ts: u64) -> Self {
        Self {
            wallet_address: wallet_address.to_lowercase(),
            display_name: String::new(),
            balance_sui: 0.0,
            balance_sbets: 0.0,
            free_bet_balance: 0,
            welcome_bonus_claimed: false,
            bonus_balance: 0.0,
            loyalty_points: 0.0,
            total_bet_volume_usd: 0.0,
            created_at: ts,
        }
    }
}

impl Storable for StableUser {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableUser").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableUser")
    }

    const BOUND: Bound = Bound::Unbounded;
}
