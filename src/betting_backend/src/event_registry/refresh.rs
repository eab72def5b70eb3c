use crate::ic::network::ICNetwork;

use super::odds_cache;
use super::provider;
use super::raw_event::{is_premium_sport, SPORTS};
use super::registry;

/// Timer body: refresh the live cache. Failures are logged and elided; the
/// stale cache stays in place.
pub async fn refresh_live() {
    let now = ICNetwork::get_time();
    match provider::fetch_live().await {
        Ok(raw) => {
            let events = registry::merge_events(vec![raw.into_iter().map(|r| r.into_event()).collect()]);
            let events = odds_cache::apply_cached_odds(events);
            registry::save_live_cache(&events, now);
            registry::save_live_snapshot(events, now);
        }
        Err(e) => ICNetwork::error_log(&format!("Live refresh failed: {}", e)),
    }
}

/// Timer body: refresh the upcoming cache and snapshot.
pub async fn refresh_upcoming() {
    let now = ICNetwork::get_time();
    match provider::fetch_upcoming().await {
        Ok(raw) => {
            let events = registry::merge_events(vec![raw.into_iter().map(|r| r.into_event()).collect()]);
            let events = odds_cache::apply_cached_odds(events);
            registry::save_upcoming_cache(&events, now);
            registry::save_upcoming_snapshot(events, now);
        }
        Err(e) => ICNetwork::error_log(&format!("Upcoming refresh failed: {}", e)),
    }
}

/// Timer body: warm the odds cache for upcoming premium events missing odds.
/// The public upcoming path only ever reads the cache.
pub async fn prefetch_odds() {
    let snapshot = registry::get_upcoming_snapshot();
    let missing = odds_cache::missing_odds(&snapshot.events);
    for event_id in missing.into_iter().take(10) {
        match provider::fetch_odds(&event_id).await {
            Ok(odds) => odds_cache::put(&event_id, odds),
            Err(e) => ICNetwork::error_log(&format!("Odds prefetch failed for {}: {}", event_id, e)),
        }
    }
}

/// Timer body: daily batch for every free-tier sport.
pub async fn refresh_free_daily() {
    let now = ICNetwork::get_time();
    for (sport_id, _) in SPORTS.iter() {
        if is_premium_sport(*sport_id) {
            continue;
        }
        match provider::fetch_free_daily(*sport_id).await {
            Ok(raw) => {
                let events = registry::merge_events(vec![raw.into_iter().map(|r| r.into_event()).collect()]);
                registry::save_free_cache(&events, now);
            }
            Err(e) => ICNetwork::error_log(&format!("Free sports refresh failed for sport {}: {}", sport_id, e)),
        }
    }
}
