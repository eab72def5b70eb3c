use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::{DefaultMemoryImpl, StableBTreeMap, StableCell};
use std::cell::RefCell;

use crate::stable_bet::stable_bet::{StableBet, StableBetId};
use crate::stable_challenge::stable_challenge::{StableChallenge, StableChallengeId};
use crate::stable_challenge::stable_participant::{StableParticipant, StableParticipantId};
use crate::stable_deposit::stable_deposit::{StableDeposit, StableDepositId};
use crate::stable_limits::stable_user_limits::{StableUserLimits, StableUserLimitsId};
use crate::stable_parlay::stable_parlay::{StableParlay, StableParlayId};
use crate::stable_prediction::stable_prediction::{StablePrediction, StablePredictionId};
use crate::stable_prediction::stable_prediction_bet::{StablePredictionBet, StablePredictionBetId};
use crate::stable_referral::stable_referral::{StableReferral, StableReferralId};
use crate::stable_revenue::stable_revenue_claim::{StableRevenueClaim, StableRevenueClaimId};
use crate::stable_settings::stable_settings::StableSettings;
use crate::stable_settled_event::stable_settled_event::{StableSettledEvent, StableSettledEventId};
use crate::stable_stake::stable_stake::{StableStake, StableStakeId};
use crate::stable_user::stable_user::{StableUser, StableUserId};

pub type Memory = VirtualMemory<DefaultMemoryImpl>;

pub const SETTINGS_MEMORY_ID: MemoryId = MemoryId::new(0);
pub const USER_MEMORY_ID: MemoryId = MemoryId::new(1);
pub const BET_MEMORY_ID: MemoryId = MemoryId::new(2);
pub const PARLAY_MEMORY_ID: MemoryId = MemoryId::new(3);
pub const SETTLED_EVENT_MEMORY_ID: MemoryId = MemoryId::new(4);
pub const PREDICTION_MEMORY_ID: MemoryId = MemoryId::new(5);
pub const PREDICTION_BET_MEMORY_ID: MemoryId = MemoryId::new(6);
pub const CHALLENGE_MEMORY_ID: MemoryId = MemoryId::new(7);
pub const PARTICIPANT_MEMORY_ID: MemoryId = MemoryId::new(8);
pub const STAKE_MEMORY_ID: MemoryId = MemoryId::new(9);
pub const REVENUE_CLAIM_MEMORY_ID: MemoryId = MemoryId::new(10);
pub const USER_LIMITS_MEMORY_ID: MemoryId = MemoryId::new(11);
pub const REFERRAL_MEMORY_ID: MemoryId = MemoryId::new(12);
pub const DEPOSIT_MEMORY_ID: MemoryId = MemoryId::new(13);

thread_local! {
    pub static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> =
        RefCell::new(MemoryManager::init(DefaultMemoryImpl::default()));

    pub static SETTINGS: RefCell<StableCell<StableSettings, Memory>> = with_memory_manager(|memory_manager| {
        RefCell::new(
            StableCell::init(memory_manager.get(SETTINGS_MEMORY_ID), StableSettings::default())
                .expect("Failed to initialize settings"),
        )
    });

    pub static USER_MAP: RefCell<StableBTreeMap<StableUserId, StableUser, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(USER_MEMORY_ID))));

    pub static BET_MAP: RefCell<StableBTreeMap<StableBetId, StableBet, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(BET_MEMORY_ID))));

    pub static PARLAY_MAP: RefCell<StableBTreeMap<StableParlayId, StableParlay, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(PARLAY_MEMORY_ID))));

    pub static SETTLED_EVENT_MAP: RefCell<StableBTreeMap<StableSettledEventId, StableSettledEvent, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(SETTLED_EVENT_MEMORY_ID))));

    pub static PREDICTION_MAP: RefCell<StableBTreeMap<StablePredictionId, StablePrediction, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(PREDICTION_MEMORY_ID))));

    pub static PREDICTION_BET_MAP: RefCell<StableBTreeMap<StablePredictionBetId, StablePredictionBet, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(PREDICTION_BET_MEMORY_ID))));

    pub static CHALLENGE_MAP: RefCell<StableBTreeMap<StableChallengeId, StableChallenge, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(CHALLENGE_MEMORY_ID))));

    pub static PARTICIPANT_MAP: RefCell<StableBTreeMap<StableParticipantId, StableParticipant, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(PARTICIPANT_MEMORY_ID))));

    pub static STAKE_MAP: RefCell<StableBTreeMap<StableStakeId, StableStake, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(STAKE_MEMORY_ID))));

    pub static REVENUE_CLAIM_MAP: RefCell<StableBTreeMap<StableRevenueClaimId, StableRevenueClaim, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(REVENUE_CLAIM_MEMORY_ID))));

    pub static USER_LIMITS_MAP: RefCell<StableBTreeMap<StableUserLimitsId, StableUserLimits, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(USER_LIMITS_MEMORY_ID))));

    pub static REFERRAL_MAP: RefCell<StableBTreeMap<StableReferralId, StableReferral, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(REFERRAL_MEMORY_ID))));

    pub static DEPOSIT_MAP: RefCell<StableBTreeMap<StableDepositId, StableDeposit, Memory>> =
        with_memory_manager(|memory_manager| RefCell::new(StableBTreeMap::init(memory_manager.get(DEPOSIT_MEMORY_ID))));
}

pub fn with_memory_manager<R>(f: impl FnOnce(&MemoryManager<DefaultMemoryImpl>) -> R) -> R {
    MEMORY_MANAGER.with(|cell| f(&cell.borrow()))
}
