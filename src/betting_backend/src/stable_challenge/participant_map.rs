use crate::stable_memory::PARTICIPANT_MAP;
use crate::stable_settings::settings_map;

use super::stable_participant::{StableParticipant, StableParticipantId};

pub fn tx_hash_exists(tx_hash: &str) -> bool {
    PARTICIPANT_MAP.with(|m| m.borrow().iter().any(|(_, p)| p.tx_hash == tx_hash))
}

pub fn insert(participant: &StableParticipant) -> Result<u64, String> {
    if tx_hash_exists(&participant.tx_hash) {
        return Err(format!("Transaction {} already used", participant.tx_hash));
    }
    let participant_id = settings_map::inc_participant_map_idx();
    let insert_participant = StableParticipant {
        participant_id,
        ..participant.clone()
    };
    PARTICIPANT_MAP.with(|m| m.borrow_mut().insert(StableParticipantId(participant_id), insert_participant));
    Ok(participant_id)
}

pub fn get_by_challenge_id(challenge_id: u64) -> Vec<StableParticipant> {
    PARTICIPANT_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, p)| if p.challenge_id == challenge_id { Some(p.clone()) } else { None })
            .collect()
    })
}

pub fn wallet_joined(challenge_id: u64, wallet_address: &str) -> bool {
    let wallet = wallet_address.to_lowercase();
    PARTICIPANT_MAP.with(|m| {
        m.borrow()
            .iter()
            .any(|(_, p)| p.challenge_id == challenge_id && p.wallet_address == wallet)
    })
}
