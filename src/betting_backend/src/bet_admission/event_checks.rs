use crate::event_registry::registry::{EventLookup, EventSource};
use crate::helpers::time_helpers::{nanos_to_millis, NANOS_PER_HOUR};

use super::bet_error::BetError;
use super::market_rules;

/// Live football closes to new bets at the 45th minute.
pub const LIVE_BET_CUTOFF_MINUTE: u32 = 45;

/// Free-tier data is a daily batch; anything older than a day plus slack is
/// considered dead.
pub const FREE_CACHE_MAX_AGE_NS: u64 = 26 * NANOS_PER_HOUR;

/// Fail-closed event validation against the registry lookup. A bet only
/// passes when the registry can positively vouch for the event's state.
/// Freshness uses the strict `age < max` comparison: age exactly at the
/// threshold is already stale.
pub fn check_event(
    lookup: &EventLookup,
    is_live: bool,
    live_max_age_ns: u64,
    upcoming_max_age_ns: u64,
) -> Result<(), BetError> {
    if !lookup.found {
        return Err(BetError::EventNotFound);
    }

    let max_age_ms = match lookup.source {
        EventSource::Live => nanos_to_millis(live_max_age_ns),
        EventSource::Upcoming => nanos_to_millis(upcoming_max_age_ns),
        EventSource::Free => nanos_to_millis(FREE_CACHE_MAX_AGE_NS),
        EventSource::None => return Err(BetError::EventNotFound),
    };
    if lookup.cache_age_ms >= max_age_ms {
        return Err(BetError::StaleEventData);
    }

    match lookup.source {
        EventSource::Upcoming if lookup.should_be_live => {
            // the match should have kicked off but the live feed does not
            // have it: state unknown
            Err(BetError::EventStatusUncertain)
        }
        EventSource::Live => {
            let minute = lookup.minute.ok_or(BetError::UnverifiableMatchTime)?;
            if minute >= LIVE_BET_CUTOFF_MINUTE {
                return Err(BetError::MatchCutoff);
            }
            Ok(())
        }
        EventSource::Free if lookup.should_be_live => Err(BetError::MatchStarted),
        _ => {
            if is_live {
                // caller claims live but the registry has no live row
                return Err(BetError::EventStatusUncertain);
            }
            Ok(())
        }
    }
}

/// Live-market rules on top of the event check: only match-winner markets
/// stay open in-play, and first-half markets close at half time.
pub fn check_live_market(market_id: &str, is_live: bool, minute: Option<u32>) -> Result<(), BetError> {
    if is_live && !market_rules::is_match_winner_market(market_id) {
        return Err(BetError::MarketClosedLive);
    }
    if market_rules::is_first_half_market(market_id) {
        if let Some(minute) = minute {
            if minute > LIVE_BET_CUTOFF_MINUTE {
                return Err(BetError::MarketClosedHalfTime);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::time_helpers::{NANOS_PER_MINUTE, NANOS_PER_SECOND};

    const LIVE_MAX: u64 = 90 * NANOS_PER_SECOND;
    const UPCOMING_MAX: u64 = 15 * NANOS_PER_MINUTE;

    fn lookup(source: EventSource, minute: Option<u32>, should_be_live: bool, cache_age_ms: u64) -> EventLookup {
        EventLookup {
            found: true,
            source,
            start_time: Some(0),
            minute,
            home_score: Some(0),
            away_score: Some(0),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            should_be_live,
            cache_age_ms,
        }
    }

    #[test]
    fn test_not_found() {
        let result = check_event(&EventLookup::not_found(), false, LIVE_MAX, UPCOMING_MAX);
        assert_eq!(result, Err(BetError::EventNotFound));
    }

    #[test]
    fn test_live_minute_44_allowed_45_rejected() {
        let ok = lookup(EventSource::Live, Some(44), false, 5_000);
        assert!(check_event(&ok, true, LIVE_MAX, UPCOMING_MAX).is_ok());

        let cutoff = lookup(EventSource::Live, Some(45), false, 5_000);
        assert_eq!(check_event(&cutoff, true, LIVE_MAX, UPCOMING_MAX), Err(BetError::MatchCutoff));
    }

    #[test]
    fn test_live_without_minute_rejected() {
        let no_minute = lookup(EventSource::Live, None, false, 5_000);
        assert_eq!(
            check_event(&no_minute, true, LIVE_MAX, UPCOMING_MAX),
            Err(BetError::UnverifiableMatchTime)
        );
    }

    #[test]
    fn test_cache_age_exactly_at_threshold_is_stale() {
        let at_threshold = lookup(EventSource::Live, Some(10), false, 90_000);
        assert_eq!(
            check_event(&at_threshold, true, LIVE_MAX, UPCOMING_MAX),
            Err(BetError::StaleEventData)
        );

        let just_fresh = lookup(EventSource::Live, Some(10), false, 89_999);
        assert!(check_event(&just_fresh, true, LIVE_MAX, UPCOMING_MAX).is_ok());
    }

    #[test]
    fn test_upcoming_should_be_live_uncertain() {
        // started a second ago but absent from the live cache
        let uncertain = lookup(EventSource::Upcoming, None, true, 1_000);
        assert_eq!(
            check_event(&uncertain, false, LIVE_MAX, UPCOMING_MAX),
            Err(BetError::EventStatusUncertain)
        );
    }

    #[test]
    fn test_upcoming_not_started_allowed() {
        let upcoming = lookup(EventSource::Upcoming, None, false, 1_000);
        assert!(check_event(&upcoming, false, LIVE_MAX, UPCOMING_MAX).is_ok());
    }

    #[test]
    fn test_free_source_started_rejected() {
        let started = lookup(EventSource::Free, None, true, 1_000);
        assert_eq!(check_event(&started, false, LIVE_MAX, UPCOMING_MAX), Err(BetError::MatchStarted));
    }

    #[test]
    fn test_live_flag_without_live_row() {
        let upcoming = lookup(EventSource::Upcoming, None, false, 1_000);
        assert_eq!(
            check_event(&upcoming, true, LIVE_MAX, UPCOMING_MAX),
            Err(BetError::EventStatusUncertain)
        );
    }

    #[test]
    fn test_live_market_rules() {
        assert!(check_live_market("match_winner", true, Some(30)).is_ok());
        assert_eq!(check_live_market("over_under_2.5", true, Some(30)), Err(BetError::MarketClosedLive));
        assert!(check_live_market("over_under_2.5", false, None).is_ok());
        assert_eq!(
            check_live_market("first_half_winner", true, Some(46)),
            Err(BetError::MarketClosedHalfTime)
        );
        assert!(check_live_market("first_half_winner", true, Some(40)).is_ok());
    }
}
