use crate::stable_memory::SETTLED_EVENT_MAP;

use super::stable_settled_event::{StableSettledEvent, StableSettledEventId};

pub fn get_by_event_id(event_id: &str) -> Option<StableSettledEvent> {
    SETTLED_EVENT_MAP.with(|m| m.borrow().get(&StableSettledEventId(event_id.to_string())))
}

pub fn exists(event_id: &str) -> bool {
    SETTLED_EVENT_MAP.with(|m| m.borrow().contains_key(&StableSettledEventId(event_id.to_string())))
}

/// Insert once. Returns false when the event was already settled, leaving the
/// first row untouched.
pub fn insert_once(event: &StableSettledEvent) -> bool {
    let key = StableSettledEventId(event.event_id.clone());
    SETTLED_EVENT_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if map.contains_key(&key) {
            return false;
        }
        map.insert(key, event.clone());
        true
    })
}

/// Settled events since `since_ts`, newest first. Feeds the results listing.
pub fn get_since(since_ts: u64, sport_id: Option<u32>) -> Vec<StableSettledEvent> {
    let mut events: Vec<StableSettledEvent> = SETTLED_EVENT_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, event)| {
                if event.settled_at < since_ts {
                    return None;
                }
                match sport_id {
                    Some(id) if event.sport_id != id => None,
                    _ => Some(event.clone()),
                }
            })
            .collect()
    });
    events.sort_by(|a, b| b.settled_at.cmp(&a.settled_at));
    events
}
