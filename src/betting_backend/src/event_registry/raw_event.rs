use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::helpers::time_helpers::NANOS_PER_SECOND;

pub const FOOTBALL_SPORT_ID: u32 = 1;

/// Sport catalog. Football rides the premium provider (upcoming + live +
/// odds); everything else comes from the free-tier daily batch.
pub const SPORTS: [(u32, &str); 5] = [
    (FOOTBALL_SPORT_ID, "football"),
    (2, "basketball"),
    (3, "tennis"),
    (4, "baseball"),
    (5, "hockey"),
];

pub fn sport_name(sport_id: u32) -> &'static str {
    SPORTS
        .iter()
        .find(|(id, _)| *id == sport_id)
        .map(|(_, name)| *name)
        .unwrap_or("unknown")
}

pub fn is_premium_sport(sport_id: u32) -> bool {
    sport_id == FOOTBALL_SPORT_ID
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct SportInfo {
    pub sport_id: u32,
    pub name: String,
    pub has_live: bool,
}

pub fn sport_list() -> Vec<SportInfo> {
    SPORTS
        .iter()
        .map(|(id, name)| SportInfo {
            sport_id: *id,
            name: name.to_string(),
            has_live: is_premium_sport(*id),
        })
        .collect()
}

/// Per-event match-winner odds, opaque numbers from the provider.
#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct MatchOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

/// Closed set of upstream payload shapes. Provider responses are parsed into
/// one of these and normalized through `into_event`; nothing downstream sees
/// provider JSON.
#[derive(Debug, Clone)]
pub enum RawEvent {
    Football {
        fixture_id: u64,
        start_time_secs: Option<u64>,
        status_short: String,
        elapsed_minute: Option<u32>,
        home_team: String,
        away_team: String,
        home_score: Option<u32>,
        away_score: Option<u32>,
        ht_home_score: Option<u32>,
        ht_away_score: Option<u32>,
    },
    Generic {
        id: String,
        sport_id: u32,
        start_time_secs: Option<u64>,
        home_team: String,
        away_team: String,
    },
}

impl RawEvent {
    pub fn into_event(self) -> Event {
        match self {
            RawEvent::Football {
                fixture_id,
                start_time_secs,
                status_short,
                elapsed_minute,
                home_team,
                away_team,
                home_score,
                away_score,
                ..
            } => Event {
                id: format!("fb-{}", fixture_id),
                sport_id: FOOTBALL_SPORT_ID,
                sport: sport_name(FOOTBALL_SPORT_ID).to_string(),
                home_team,
                away_team,
                start_time: start_time_secs.map(|s| s * NANOS_PER_SECOND),
                minute: elapsed_minute,
                home_score,
                away_score,
                is_live: matches!(status_short.as_str(), "1H" | "2H" | "HT" | "ET" | "P" | "LIVE"),
                odds: None,
            },
            RawEvent::Generic {
                id,
                sport_id,
                start_time_secs,
                home_team,
                away_team,
            } => Event {
                id,
                sport_id,
                sport: sport_name(sport_id).to_string(),
                home_team,
                away_team,
                start_time: start_time_secs.map(|s| s * NANOS_PER_SECOND),
                minute: None,
                home_score: None,
                away_score: None,
                is_live: false,
                odds: None,
            },
        }
    }
}

/// Normalized event, the registry's unit of storage.
#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub sport_id: u32,
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: Option<u64>, // nanoseconds; None sorts last
    pub minute: Option<u32>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub is_live: bool,
    pub odds: Option<MatchOdds>,
}

/// Final result of a finished event, consumed by the settlement worker.
#[derive(Debug, Clone)]
pub struct EventResult {
    pub event_id: String,
    pub sport_id: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub ht_home_score: Option<u32>,
    pub ht_away_score: Option<u32>,
    pub finished: bool,
}

impl EventResult {
    pub fn winner(&self) -> &'static str {
        if self.home_score > self.away_score {
            "home"
        } else if self.away_score > self.home_score {
            "away"
        } else {
            "draw"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_football_normalization() {
        let raw = RawEvent::Football {
            fixture_id: 1001,
            start_time_secs: Some(1_750_000_000),
            status_short: "1H".to_string(),
            elapsed_minute: Some(12),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            home_score: Some(1),
            away_score: Some(0),
            ht_home_score: None,
            ht_away_score: None,
        };
        let event = raw.into_event();
        assert_eq!(event.id, "fb-1001");
        assert!(event.is_live);
        assert_eq!(event.minute, Some(12));
        assert_eq!(event.start_time, Some(1_750_000_000 * NANOS_PER_SECOND));
    }

    #[test]
    fn test_finished_fixture_is_not_live() {
        let raw = RawEvent::Football {
            fixture_id: 1,
            start_time_secs: None,
            status_short: "FT".to_string(),
            elapsed_minute: Some(90),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            home_score: Some(2),
            away_score: Some(2),
            ht_home_score: None,
            ht_away_score: None,
        };
        assert!(!raw.into_event().is_live);
    }

    #[test]
    fn test_result_winner() {
        let mut result = EventResult {
            event_id: "fb-1".to_string(),
            sport_id: FOOTBALL_SPORT_ID,
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            home_score: 2,
            away_score: 1,
            ht_home_score: None,
            ht_away_score: None,
            finished: true,
        };
        assert_eq!(result.winner(), "home");
        result.away_score = 2;
        assert_eq!(result.winner(), "draw");
    }
}
