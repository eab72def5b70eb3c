use crate::stable_memory::CHALLENGE_MAP;
use crate::stable_settings::settings_map;

use super::stable_challenge::{ChallengeStatus, ChallengeWinner, StableChallenge, StableChallengeId};

pub fn get_by_challenge_id(challenge_id: u64) -> Option<StableChallenge> {
    CHALLENGE_MAP.with(|m| m.borrow().get(&StableChallengeId(challenge_id)))
}

pub fn insert(challenge: &StableChallenge) -> u64 {
    let challenge_id = settings_map::inc_challenge_map_idx();
    let insert_challenge = StableChallenge {
        challenge_id,
        ..challenge.clone()
    };
    CHALLENGE_MAP.with(|m| m.borrow_mut().insert(StableChallengeId(challenge_id), insert_challenge));
    challenge_id
}

pub fn get_all(status: Option<ChallengeStatus>) -> Vec<StableChallenge> {
    CHALLENGE_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, challenge)| match status {
                Some(s) if challenge.status != s => None,
                _ => Some(challenge.clone()),
            })
            .collect()
    })
}

/// Open challenges past expiry, for the auto-refund worker.
pub fn get_expired_open(now: u64) -> Vec<StableChallenge> {
    CHALLENGE_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, challenge)| {
                if challenge.status.is_open() && challenge.expires_at <= now {
                    Some(challenge.clone())
                } else {
                    None
                }
            })
            .collect()
    })
}

/// Register a join. All join invariants (creator cannot self-join, capacity,
/// no writes after terminal status) are enforced on the row itself.
pub fn add_participant(challenge_id: u64, wallet_address: &str) -> Result<(), String> {
    let key = StableChallengeId(challenge_id);
    let wallet = wallet_address.to_lowercase();
    CHALLENGE_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut challenge) => {
                if !challenge.status.is_open() {
                    return Err(format!("Challenge #{} is not open", challenge_id));
                }
                if challenge.creator_wallet == wallet {
                    return Err("Creator cannot join own challenge".to_string());
                }
                if challenge.current_participants >= challenge.max_participants {
                    return Err(format!("Challenge #{} is full", challenge_id));
                }
                challenge.current_participants += 1;
                map.insert(key, challenge);
                Ok(())
            }
            None => Err(format!("Challenge #{} not found", challenge_id)),
        }
    })
}

/// Terminal transition out of `Open`; false when already closed.
pub fn finalize(challenge_id: u64, status: ChallengeStatus, winner: Option<ChallengeWinner>, ts: u64) -> bool {
    let key = StableChallengeId(challenge_id);
    CHALLENGE_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut challenge) => {
                if !challenge.status.is_open() {
                    return false;
                }
                challenge.status = status;
                challenge.winner = winner;
                challenge.settled_at = Some(ts);
                map.insert(key, challenge);
                true
            }
            None => false,
        }
    })
}

pub fn set_terminal_status(challenge_id: u64, status: ChallengeStatus) {
    let key = StableChallengeId(challenge_id);
    CHALLENGE_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if let Some(mut challenge) = map.get(&key) {
            if !challenge.status.is_open() {
                challenge.status = status;
                map.insert(key, challenge);
            }
        }
    });
}
