use crate::stable_memory::PARLAY_MAP;
use crate::stable_settings::settings_map;

use super::stable_parlay::{StableParlay, StableParlayId};
use crate::stable_bet::stable_bet::BetStatus;

pub fn get_by_parlay_id(parlay_id: &str) -> Option<StableParlay> {
    PARLAY_MAP.with(|m| m.borrow().get(&StableParlayId(parlay_id.to_string())))
}

pub fn insert(parlay: &StableParlay) -> String {
    let parlay_id = if parlay.parlay_id.is_empty() {
        format!("P{}", settings_map::inc_parlay_map_idx())
    } else {
        parlay.parlay_id.clone()
    };
    let insert_parlay = StableParlay {
        parlay_id: parlay_id.clone(),
        ..parlay.clone()
    };
    PARLAY_MAP.with(|m| m.borrow_mut().insert(StableParlayId(parlay_id.clone()), insert_parlay));
    parlay_id
}

pub fn update(parlay: &StableParlay) {
    let key = StableParlayId(parlay.parlay_id.clone());
    PARLAY_MAP.with(|m| m.borrow_mut().insert(key, parlay.clone()));
}

/// Compare-and-set, same contract as bet_map::update_status.
pub fn update_status(parlay_id: &str, from: &[BetStatus], to: BetStatus, ts: u64) -> bool {
    let key = StableParlayId(parlay_id.to_string());
    PARLAY_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut parlay) => {
                if !from.contains(&parlay.status) || !parlay.status.can_transition_to(to) {
                    return false;
                }
                parlay.status = to;
                parlay.settled_at = Some(ts);
                map.insert(key, parlay);
                true
            }
            None => false,
        }
    })
}

pub fn revert_status(parlay_id: &str, to: BetStatus) {
    let key = StableParlayId(parlay_id.to_string());
    PARLAY_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if let Some(mut parlay) = map.get(&key) {
            parlay.status = to;
            parlay.settled_at = None;
            map.insert(key, parlay);
        }
    });
}

pub fn get_by_wallet(wallet_address: &str) -> Vec<StableParlay> {
    let wallet = wallet_address.to_lowercase();
    PARLAY_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, parlay)| {
                if parlay.wallet_address == wallet {
                    Some(parlay.clone())
                } else {
                    None
                }
            })
            .collect()
    })
}

/// Event ids of unresolved legs across all open parlays. The settlement
/// worker folds these into its per-cycle event set.
pub fn get_all_open_leg_event_ids() -> Vec<String> {
    PARLAY_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter(|(_, parlay)| parlay.status.is_open())
            .flat_map(|(_, parlay)| {
                parlay
                    .legs
                    .iter()
                    .filter(|leg| leg.result.is_none())
                    .map(|leg| leg.event_id.clone())
                    .collect::<Vec<_>>()
            })
            .collect()
    })
}

/// Open parlays holding a leg on the given event.
pub fn get_open_parlays_for_event(event_id: &str) -> Vec<StableParlay> {
    PARLAY_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, parlay)| {
                if parlay.status.is_open() && parlay.legs.iter().any(|leg| leg.event_id == event_id) {
                    Some(parlay.clone())
                } else {
                    None
                }
            })
            .collect()
    })
}
