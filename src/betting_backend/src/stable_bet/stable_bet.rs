use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

use crate::token::Currency;

#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableBetId(pub String);

impl Storable for StableBetId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableBetId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableBetId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetStatus {
    Pending,
    Confirmed,
    Won,
    Lost,
    Void,
    PaidOut,
    CashedOut,
}

impl BetStatus {
    /// Open bets are the ones settlement may still move.
    pub fn is_open(&self) -> bool {
        matches!(self, BetStatus::Pending | BetStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BetStatus::PaidOut | BetStatus::Lost | BetStatus::Void | BetStatus::CashedOut
        )
    }

    pub fn can_transition_to(&self, to: BetStatus) -> bool {
        match self {
            BetStatus::Pending => matches!(
                to,
                BetStatus::Won | BetStatus::Lost | BetStatus::Void | BetStatus::CashedOut
            ),
            BetStatus::Confirmed => matches!(to, BetStatus::Won | BetStatus::Lost | BetStatus::Void),
            BetStatus::Won => matches!(to, BetStatus::PaidOut),
            _ => false,
        }
    }
}

impl std::fmt::Display for BetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BetStatus::Pending => write!(f, "pending"),
            BetStatus::Confirmed => write!(f, "confirmed"),
            BetStatus::Won => write!(f, "won"),
            BetStatus::Lost => write!(f, "lost"),
            BetStatus::Void => write!(f, "void"),
            BetStatus::PaidOut => write!(f, "paid_out"),
            BetStatus::CashedOut => write!(f, "cashed_out"),
        }
    }
}

/// How the stake was funded. The free-bet gate inspects this across all of a
/// wallet's past bets.
#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    OnChain,
    PlatformBalance,
    FreeBet,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StableBet {
    pub bet_id: String, // on-chain object id when present, else synthetic
    pub wallet_address: String,
    pub event_id: String,
    pub event_name: String,
    pub home_team: String,
    pub away_team: String,
    pub market_id: String,
    pub outcome_id: String,
    pub prediction: String,
    pub odds: f64,
    pub stake: f64,
    pub currency: Currency,
    pub potential_payout: f64, // stake * odds, rounded to 2 decimals
    pub status: BetStatus,
    pub payment_method: PaymentMethod,
    pub used_bonus: bool,
    pub platform_fee: f64,
    pub is_live: bool,
    pub match_minute: Option<u32>,
    pub tx_hash: Option<String>,
    pub on_chain_bet_id: Option<String>,
    pub created_at: u64,
    pub settled_at: Option<u64>,
    pub settlement_tx_hash: Option<String>,
}

impl Storable for StableBet {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableBet").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableBet")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert!(BetStatus::Pending.can_transition_to(BetStatus::Won));
        assert!(BetStatus::Pending.can_transition_to(BetStatus::Lost));
        assert!(BetStatus::Pending.can_transition_to(BetStatus::Void));
        assert!(BetStatus::Pending.can_transition_to(BetStatus::CashedOut));
        assert!(!BetStatus::Pending.can_transition_to(BetStatus::PaidOut));
    }

    #[test]
    fn test_confirmed_cannot_cash_out() {
        assert!(!BetStatus::Confirmed.can_transition_to(BetStatus::CashedOut));
        assert!(BetStatus::Confirmed.can_transition_to(BetStatus::Void));
    }

    #[test]
    fn test_won_only_pays_out() {
        assert!(BetStatus::Won.can_transition_to(BetStatus::PaidOut));
        assert!(!BetStatus::Won.can_transition_to(BetStatus::Lost));
    }

    #[test]
    fn test_terminal_states_are_sinks() {
        for terminal in [BetStatus::PaidOut, BetStatus::Lost, BetStatus::Void, BetStatus::CashedOut] {
            assert!(terminal.is_terminal());
            for to in [BetStatus::Pending, BetStatus::Won, BetStatus::PaidOut] {
                assert!(!terminal.can_transition_to(to));
            }
        }
    }
}
