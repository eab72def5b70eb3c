use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::helpers::time_helpers::nanos_to_millis;
use crate::ic::network::ICNetwork;
use crate::single_flight::REFRESHING_EVENTS;
use crate::stable_settings::settings_map;

use super::odds_cache;
use super::provider;
use super::raw_event::{is_premium_sport, Event};

#[derive(Debug, Clone)]
pub struct CachedEvent {
    pub event: Event,
    pub cached_at: u64,
}

/// Snapshot pair: last good event list plus the time it was taken. Swapped
/// whole so readers never observe a torn {events, timestamp}.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub timestamp: u64,
}

thread_local! {
    static LIVE_CACHE: Rc<RefCell<HashMap<String, CachedEvent>>> = Rc::new(RefCell::default());
    static UPCOMING_CACHE: Rc<RefCell<HashMap<String, CachedEvent>>> = Rc::new(RefCell::default());
    static FREE_CACHE: Rc<RefCell<HashMap<String, CachedEvent>>> = Rc::new(RefCell::default());
    static LIVE_SNAPSHOT: Rc<RefCell<Snapshot>> = Rc::new(RefCell::default());
    static UPCOMING_SNAPSHOT: Rc<RefCell<Snapshot>> = Rc::new(RefCell::default());
}

// refresh endpoints for the single-flight key
pub const ENDPOINT_LIVE: u8 = 0;
pub const ENDPOINT_UPCOMING: u8 = 1;

#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSource {
    Live,
    Upcoming,
    Free,
    None,
}

/// What the admission pipeline sees. Never blocks on the network.
#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct EventLookup {
    pub found: bool,
    pub source: EventSource,
    pub start_time: Option<u64>,
    pub minute: Option<u32>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub home_team: String,
    pub away_team: String,
    pub should_be_live: bool,
    pub cache_age_ms: u64,
}

impl EventLookup {
    pub fn not_found() -> Self {
        Self {
            found: false,
            source: EventSource::None,
            start_time: None,
            minute: None,
            home_score: None,
            away_score: None,
            home_team: String::new(),
            away_team: String::new(),
            should_be_live: false,
            cache_age_ms: 0,
        }
    }

    fn from_cached(cached: &CachedEvent, source: EventSource, now: u64) -> Self {
        let should_be_live = match (source, cached.event.start_time) {
            (EventSource::Upcoming, Some(start)) | (EventSource::Free, Some(start)) => now > start,
            _ => false,
        };
        Self {
            found: true,
            source,
            start_time: cached.event.start_time,
            minute: cached.event.minute,
            home_score: cached.event.home_score,
            away_score: cached.event.away_score,
            home_team: cached.event.home_team.clone(),
            away_team: cached.event.away_team.clone(),
            should_be_live,
            cache_age_ms: nanos_to_millis(now.saturating_sub(cached.cached_at)),
        }
    }
}

/// Concatenate batches, keep the first occurrence of each event id, sort by
/// start time ascending with missing times last. The stable pass preserves
/// provider priority: earlier batches win duplicates.
pub fn merge_events(batches: Vec<Vec<Event>>) -> Vec<Event> {
    let mut seen = std::collections::HashSet::new();
    let mut merged: Vec<Event> = Vec::new();
    for batch in batches {
        for event in batch {
            if seen.insert(event.id.clone()) {
                merged.push(event);
            }
        }
    }
    merged.sort_by(|a, b| match (a.start_time, b.start_time) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    merged
}

/// Drop events whose start time has passed. The upcoming view never shows a
/// started match.
pub fn filter_not_started(events: Vec<Event>, now: u64) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| match event.start_time {
            Some(start) => start > now,
            None => true,
        })
        .collect()
}

pub fn save_live_cache(events: &[Event], now: u64) {
    LIVE_CACHE.with(|cache| {
        let mut map = cache.borrow_mut();
        map.clear();
        for event in events {
            map.insert(
                event.id.clone(),
                CachedEvent {
                    event: event.clone(),
                    cached_at: now,
                },
            );
        }
    });
}

pub fn save_upcoming_cache(events: &[Event], now: u64) {
    UPCOMING_CACHE.with(|cache| {
        let mut map = cache.borrow_mut();
        map.clear();
        for event in events {
            map.insert(
                event.id.clone(),
                CachedEvent {
                    event: event.clone(),
                    cached_at: now,
                },
            );
        }
    });
}

pub fn save_free_cache(events: &[Event], now: u64) {
    FREE_CACHE.with(|cache| {
        let mut map = cache.borrow_mut();
        for event in events {
            map.insert(
                event.id.clone(),
                CachedEvent {
                    event: event.clone(),
                    cached_at: now,
                },
            );
        }
    });
}

pub fn save_live_snapshot(events: Vec<Event>, now: u64) {
    LIVE_SNAPSHOT.with(|snapshot| {
        *snapshot.borrow_mut() = Snapshot { events, timestamp: now };
    });
}

pub fn save_upcoming_snapshot(events: Vec<Event>, now: u64) {
    UPCOMING_SNAPSHOT.with(|snapshot| {
        *snapshot.borrow_mut() = Snapshot { events, timestamp: now };
    });
}

pub fn get_live_snapshot() -> Snapshot {
    LIVE_SNAPSHOT.with(|snapshot| snapshot.borrow().clone())
}

pub fn get_upcoming_snapshot() -> Snapshot {
    UPCOMING_SNAPSHOT.with(|snapshot| snapshot.borrow().clone())
}

/// Freshness-tracked lookup across the three caches, in liveness priority.
/// Pure cache reads; the admission pipeline depends on this never blocking.
pub fn lookup_event(event_id: &str, now: u64) -> EventLookup {
    if let Some(cached) = LIVE_CACHE.with(|c| c.borrow().get(event_id).cloned()) {
        return EventLookup::from_cached(&cached, EventSource::Live, now);
    }
    if let Some(cached) = UPCOMING_CACHE.with(|c| c.borrow().get(event_id).cloned()) {
        return EventLookup::from_cached(&cached, EventSource::Upcoming, now);
    }
    if let Some(cached) = FREE_CACHE.with(|c| c.borrow().get(event_id).cloned()) {
        return EventLookup::from_cached(&cached, EventSource::Free, now);
    }
    EventLookup::not_found()
}

/// Live listing. May refresh upstream behind the single-flight guard;
/// concurrent callers are served the snapshot.
pub async fn get_live(sport_id: u32) -> Vec<Event> {
    let now = ICNetwork::get_time();
    if !is_premium_sport(sport_id) {
        // free-tier sports have no live feed; serve the daily cache
        return FREE_CACHE.with(|c| {
            c.borrow()
                .values()
                .filter(|cached| cached.event.sport_id == sport_id)
                .map(|cached| cached.event.clone())
                .collect()
        });
    }

    let key = (ENDPOINT_LIVE, sport_id);
    let guard = REFRESHING_EVENTS.with(|g| g.try_acquire(&key));
    let _guard = match guard {
        Some(guard) => guard,
        None => return get_live_snapshot().events,
    };

    match provider::fetch_live().await {
        Ok(raw) => {
            let events = merge_events(vec![raw.into_iter().map(|r| r.into_event()).collect()]);
            let events = odds_cache::apply_cached_odds(events);
            save_live_cache(&events, now);
            save_live_snapshot(events.clone(), now);
            events
        }
        Err(e) => {
            ICNetwork::error_log(&format!("Live events refresh failed: {}", e));
            get_live_snapshot().events
        }
    }
}

/// Upcoming listing with snapshot fallback: a fresh non-empty snapshot is
/// served as-is; otherwise refresh, and on upstream failure fall back to the
/// stale snapshot rather than returning empty when history exists.
pub async fn get_upcoming(sport_id: u32) -> Vec<Event> {
    let now = ICNetwork::get_time();
    if !is_premium_sport(sport_id) {
        let events = FREE_CACHE.with(|c| {
            c.borrow()
                .values()
                .filter(|cached| cached.event.sport_id == sport_id)
                .map(|cached| cached.event.clone())
                .collect::<Vec<_>>()
        });
        return filter_not_started(merge_events(vec![events]), now);
    }

    let settings = settings_map::get();
    let snapshot = get_upcoming_snapshot();
    if !snapshot.events.is_empty() && now.saturating_sub(snapshot.timestamp) < settings.snapshot_max_age_ns {
        return filter_not_started(snapshot.events, now);
    }

    let key = (ENDPOINT_UPCOMING, sport_id);
    let guard = REFRESHING_EVENTS.with(|g| g.try_acquire(&key));
    let _guard = match guard {
        Some(guard) => guard,
        None => return filter_not_started(snapshot.events, now),
    };

    match provider::fetch_upcoming().await {
        Ok(raw) => {
            let events = merge_events(vec![raw.into_iter().map(|r| r.into_event()).collect()]);
            let events = odds_cache::apply_cached_odds(events);
            save_upcoming_cache(&events, now);
            save_upcoming_snapshot(events.clone(), now);
            filter_not_started(events, now)
        }
        Err(e) => {
            ICNetwork::error_log(&format!("Upcoming events refresh failed: {}", e));
            filter_not_started(snapshot.events, now)
        }
    }
}

/// Enrich team names for a bet whose caller did not send them. Cache-only.
pub fn team_names(event_id: &str) -> Option<(String, String)> {
    let lookup = lookup_event(event_id, ICNetwork::get_time());
    if lookup.found && !lookup.home_team.is_empty() && !lookup.away_team.is_empty() {
        Some((lookup.home_team, lookup.away_team))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_registry::raw_event::FOOTBALL_SPORT_ID;
    use crate::helpers::time_helpers::{NANOS_PER_MINUTE, NANOS_PER_SECOND};

    fn event(id: &str, start_time: Option<u64>) -> Event {
        Event {
            id: id.to_string(),
            sport_id: FOOTBALL_SPORT_ID,
            sport: "football".to_string(),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            start_time,
            minute: None,
            home_score: None,
            away_score: None,
            is_live: false,
            odds: None,
        }
    }

    #[test]
    fn test_merge_keeps_first_occurrence() {
        let merged = merge_events(vec![
            vec![event("a", Some(300)), event("b", Some(100))],
            vec![event("a", Some(999)), event("c", Some(200))],
        ]);
        assert_eq!(merged.len(), 3);
        // first occurrence of "a" wins
        let a = merged.iter().find(|e| e.id == "a").unwrap();
        assert_eq!(a.start_time, Some(300));
    }

    #[test]
    fn test_merge_sorts_missing_times_last() {
        let merged = merge_events(vec![vec![event("x", None), event("y", Some(50)), event("z", Some(20))]]);
        let ids: Vec<&str> = merged.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_filter_not_started() {
        let now = 1_000 * NANOS_PER_SECOND;
        let events = vec![event("past", Some(now - 1)), event("future", Some(now + 1)), event("unknown", None)];
        let kept = filter_not_started(events, now);
        let ids: Vec<&str> = kept.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["future", "unknown"]);
    }

    #[test]
    fn test_lookup_should_be_live_and_age() {
        let now = 100 * NANOS_PER_MINUTE;
        let started = CachedEvent {
            event: event("fb-9", Some(now - NANOS_PER_MINUTE)),
            cached_at: now - 5 * NANOS_PER_SECOND,
        };
        let lookup = EventLookup::from_cached(&started, EventSource::Upcoming, now);
        assert!(lookup.should_be_live);
        assert_eq!(lookup.cache_age_ms, 5_000);

        let not_started = CachedEvent {
            event: event("fb-9", Some(now + NANOS_PER_MINUTE)),
            cached_at: now,
        };
        let lookup = EventLookup::from_cached(&not_started, EventSource::Upcoming, now);
        assert!(!lookup.should_be_live);
    }

    #[test]
    fn test_live_source_never_should_be_live() {
        let now = 100 * NANOS_PER_MINUTE;
        let cached = CachedEvent {
            event: event("fb-9", Some(now - NANOS_PER_MINUTE)),
            cached_at: now,
        };
        let lookup = EventLookup::from_cached(&cached, EventSource::Live, now);
        assert!(!lookup.should_be_live);
    }
}
