use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableChallengeId(pub u64);

impl Storable for StableChallengeId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableChallengeId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableChallengeId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeStatus {
    Open,
    Settled,
    SettledPartial,
    SettledFailed,
    ExpiredRefunded,
    ExpiredPartialRefund,
    ExpiredRefundFailed,
}

impl ChallengeStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, ChallengeStatus::Open)
    }

    pub fn settled(paid: u32, failed: u32) -> Self {
        match (paid, failed) {
            (_, 0) => ChallengeStatus::Settled,
            (0, _) => ChallengeStatus::SettledFailed,
            _ => ChallengeStatus::SettledPartial,
        }
    }

    pub fn refunded(paid: u32, failed: u32) -> Self {
        match (paid, failed) {
            (_, 0) => ChallengeStatus::ExpiredRefunded,
            (0, _) => ChallengeStatus::ExpiredRefundFailed,
            _ => ChallengeStatus::ExpiredPartialRefund,
        }
    }
}

impl std::fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChallengeStatus::Open => "open",
            ChallengeStatus::Settled => "settled",
            ChallengeStatus::SettledPartial => "settled_partial",
            ChallengeStatus::SettledFailed => "settled_failed",
            ChallengeStatus::ExpiredRefunded => "expired_refunded",
            ChallengeStatus::ExpiredPartialRefund => "expired_partial_refund",
            ChallengeStatus::ExpiredRefundFailed => "expired_refund_failed",
        };
        write!(f, "{}", s)
    }
}

/// Which side wins a manual challenge settlement.
#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeWinner {
    Creator,
    Challengers,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StableChallenge {
    pub challenge_id: u64,
    pub creator_wallet: String,
    pub title: String,
    pub description: String,
    pub stake_amount: u64, // SBETS, staked by creator and each participant
    pub max_participants: u32,
    pub current_participants: u32,
    pub expires_at: u64,
    pub status: ChallengeStatus,
    pub winner: Option<ChallengeWinner>,
    pub created_at: u64,
    pub settled_at: Option<u64>,
}

impl Storable for StableChallenge {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableChallenge").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableChallenge")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_tri_state() {
        assert_eq!(ChallengeStatus::settled(3, 0), ChallengeStatus::Settled);
        assert_eq!(ChallengeStatus::settled(1, 2), ChallengeStatus::SettledPartial);
        assert_eq!(ChallengeStatus::settled(0, 3), ChallengeStatus::SettledFailed);
    }

    #[test]
    fn test_refunded_tri_state() {
        assert_eq!(ChallengeStatus::refunded(2, 0), ChallengeStatus::ExpiredRefunded);
        assert_eq!(ChallengeStatus::refunded(1, 1), ChallengeStatus::ExpiredPartialRefund);
        assert_eq!(ChallengeStatus::refunded(0, 2), ChallengeStatus::ExpiredRefundFailed);
    }
}
