use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StablePredictionId(pub u64);

impl Storable for StablePredictionId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StablePredictionId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StablePredictionId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionSide {
    Yes,
    No,
}

impl std::fmt::Display for PredictionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictionSide::Yes => write!(f, "yes"),
            PredictionSide::No => write!(f, "no"),
        }
    }
}

#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionStatus {
    Active,
    ResolvedYes,
    ResolvedNo,
    ResolvedYesPartial,
    ResolvedNoPartial,
    ResolvedYesFailed,
    ResolvedNoFailed,
    Expired,
    ExpiredRefunded,
    ExpiredPartialRefund,
    ExpiredRefundFailed,
    Cancelled,
}

impl PredictionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, PredictionStatus::Active)
    }

    /// Terminal status for a resolved side given the aggregate payout result.
    pub fn resolved(side: PredictionSide, paid: u32, failed: u32) -> Self {
        match (side, paid, failed) {
            (PredictionSide::Yes, _, 0) => PredictionStatus::ResolvedYes,
            (PredictionSide::No, _, 0) => PredictionStatus::ResolvedNo,
            (PredictionSide::Yes, 0, _) => PredictionStatus::ResolvedYesFailed,
            (PredictionSide::No, 0, _) => PredictionStatus::ResolvedNoFailed,
            (PredictionSide::Yes, _, _) => PredictionStatus::ResolvedYesPartial,
            (PredictionSide::No, _, _) => PredictionStatus::ResolvedNoPartial,
        }
    }
}

impl std::fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PredictionStatus::Active => "active",
            PredictionStatus::ResolvedYes => "resolved_yes",
            PredictionStatus::ResolvedNo => "resolved_no",
            PredictionStatus::ResolvedYesPartial => "resolved_yes_partial",
            PredictionStatus::ResolvedNoPartial => "resolved_no_partial",
            PredictionStatus::ResolvedYesFailed => "resolved_yes_failed",
            PredictionStatus::ResolvedNoFailed => "resolved_no_failed",
            PredictionStatus::Expired => "expired",
            PredictionStatus::ExpiredRefunded => "expired_refunded",
            PredictionStatus::ExpiredPartialRefund => "expired_partial_refund",
            PredictionStatus::ExpiredRefundFailed => "expired_refund_failed",
            PredictionStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StablePrediction {
    pub prediction_id: u64,
    pub creator_wallet: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub end_date: u64,
    // pool totals in SBETS, monotone-increasing while active
    pub total_yes_amount: u64,
    pub total_no_amount: u64,
    pub participant_count: u32,
    pub status: PredictionStatus,
    pub resolved_outcome: Option<PredictionSide>,
    pub resolved_at: Option<u64>,
    pub created_at: u64,
}

impl Storable for StablePrediction {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StablePrediction").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StablePrediction")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_status_tri_state() {
        assert_eq!(
            PredictionStatus::resolved(PredictionSide::Yes, 3, 0),
            PredictionStatus::ResolvedYes
        );
        assert_eq!(
            PredictionStatus::resolved(PredictionSide::No, 2, 1),
            PredictionStatus::ResolvedNoPartial
        );
        assert_eq!(
            PredictionStatus::resolved(PredictionSide::Yes, 0, 4),
            PredictionStatus::ResolvedYesFailed
        );
        // zero winners and zero failures resolves clean
        assert_eq!(PredictionStatus::resolved(PredictionSide::No, 0, 0), PredictionStatus::ResolvedNo);
    }
}
