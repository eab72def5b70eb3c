use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::raw_event::{Event, MatchOdds};

thread_local! {
    static ODDS_CACHE: Rc<RefCell<HashMap<String, MatchOdds>>> = Rc::new(RefCell::default());
}

pub fn get(event_id: &str) -> Option<MatchOdds> {
    ODDS_CACHE.with(|cache| cache.borrow().get(event_id).cloned())
}

pub fn put(event_id: &str, odds: MatchOdds) {
    ODDS_CACHE.with(|cache| {
        cache.borrow_mut().insert(event_id.to_string(), odds);
    });
}

/// Enrich a listing from the cache only. The upcoming path never blocks on
/// an odds fetch; the prefetcher fills this in the background.
pub fn apply_cached_odds(events: Vec<Event>) -> Vec<Event> {
    ODDS_CACHE.with(|cache| {
        let map = cache.borrow();
        events
            .into_iter()
            .map(|mut event| {
                if event.odds.is_none() {
                    event.odds = map.get(&event.id).cloned();
                }
                event
            })
            .collect()
    })
}

/// Event ids currently missing odds, for the prefetch timer to warm.
pub fn missing_odds(events: &[Event]) -> Vec<String> {
    ODDS_CACHE.with(|cache| {
        let map = cache.borrow();
        events
            .iter()
            .filter(|event| event.odds.is_none() && !map.contains_key(&event.id))
            .map(|event| event.id.clone())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_registry::raw_event::FOOTBALL_SPORT_ID;

    fn event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            sport_id: FOOTBALL_SPORT_ID,
            sport: "football".to_string(),
            home_team: "H".to_string(),
            away_team: "A".to_string(),
            start_time: None,
            minute: None,
            home_score: None,
            away_score: None,
            is_live: false,
            odds: None,
        }
    }

    #[test]
    fn test_apply_cached_odds() {
        put(
            "fb-1",
            MatchOdds {
                home: 1.8,
                draw: 3.4,
                away: 4.2,
            },
        );
        let enriched = apply_cached_odds(vec![event("fb-1"), event("fb-2")]);
        assert!(enriched[0].odds.is_some());
        assert!(enriched[1].odds.is_none());
        assert_eq!(missing_odds(&enriched), vec!["fb-2".to_string()]);
    }
}
