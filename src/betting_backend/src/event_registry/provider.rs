use ic_cdk::management_canister::{http_request, HttpHeader, HttpMethod, HttpRequestArgs};
use serde::Deserialize;

use crate::stable_settings::settings_map;

use super::raw_event::{EventResult, MatchOdds, RawEvent, FOOTBALL_SPORT_ID};

const MAX_RESPONSE_BYTES: u64 = 2_000_000;

async fn http_get(url: String, headers: Vec<HttpHeader>) -> Result<Vec<u8>, String> {
    let args = HttpRequestArgs {
        url,
        method: HttpMethod::GET,
        headers,
        body: None,
        max_response_bytes: Some(MAX_RESPONSE_BYTES),
        transform: None,
    };
    let response = http_request(&args).await.map_err(|e| format!("{:?}", e))?;
    Ok(response.body)
}

fn premium_headers() -> Vec<HttpHeader> {
    vec![HttpHeader {
        name: "x-apisports-key".to_string(),
        value: settings_map::get().sports_api_key,
    }]
}

// premium provider wire format

#[derive(Debug, Deserialize)]
struct FixtureResponse {
    response: Vec<FixtureEntry>,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    fixture: Fixture,
    teams: FixtureTeams,
    goals: FixtureGoals,
    #[serde(default)]
    score: Option<FixtureScore>,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    id: u64,
    timestamp: Option<u64>,
    status: FixtureStatus,
}

#[derive(Debug, Deserialize)]
struct FixtureStatus {
    short: String,
    elapsed: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FixtureTeams {
    home: TeamName,
    away: TeamName,
}

#[derive(Debug, Deserialize)]
struct TeamName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FixtureGoals {
    home: Option<u32>,
    away: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FixtureScore {
    halftime: Option<FixtureGoals>,
}

impl FixtureEntry {
    fn into_raw(self) -> RawEvent {
        let (ht_home, ht_away) = match self.score.and_then(|s| s.halftime) {
            Some(ht) => (ht.home, ht.away),
            None => (None, None),
        };
        RawEvent::Football {
            fixture_id: self.fixture.id,
            start_time_secs: self.fixture.timestamp,
            status_short: self.fixture.status.short,
            elapsed_minute: self.fixture.status.elapsed,
            home_team: self.teams.home.name,
            away_team: self.teams.away.name,
            home_score: self.goals.home,
            away_score: self.goals.away,
            ht_home_score: ht_home,
            ht_away_score: ht_away,
        }
    }
}

fn parse_fixtures(body: &[u8]) -> Result<Vec<RawEvent>, String> {
    let parsed: FixtureResponse = serde_json::from_slice(body).map_err(|e| format!("Fixture parse error: {}", e))?;
    Ok(parsed.response.into_iter().map(FixtureEntry::into_raw).collect())
}

/// Live fixtures from the premium provider.
pub async fn fetch_live() -> Result<Vec<RawEvent>, String> {
    let settings = settings_map::get();
    if settings.sports_api_url.is_empty() {
        return Err("Sports API is not configured".to_string());
    }
    let body = http_get(format!("{}/fixtures?live=all", settings.sports_api_url), premium_headers()).await?;
    parse_fixtures(&body)
}

/// Upcoming fixtures, next few days.
pub async fn fetch_upcoming() -> Result<Vec<RawEvent>, String> {
    let settings = settings_map::get();
    if settings.sports_api_url.is_empty() {
        return Err("Sports API is not configured".to_string());
    }
    let body = http_get(format!("{}/fixtures?next=50", settings.sports_api_url), premium_headers()).await?;
    parse_fixtures(&body)
}

/// Finished fixtures, for the settlement worker. Only entries the provider
/// marks full-time are returned.
pub async fn fetch_results() -> Result<Vec<EventResult>, String> {
    let settings = settings_map::get();
    if settings.sports_api_url.is_empty() {
        return Err("Sports API is not configured".to_string());
    }
    let body = http_get(
        format!("{}/fixtures?last=50&status=FT", settings.sports_api_url),
        premium_headers(),
    )
    .await?;
    let parsed: FixtureResponse = serde_json::from_slice(&body).map_err(|e| format!("Results parse error: {}", e))?;
    Ok(parsed
        .response
        .into_iter()
        .filter_map(|entry| {
            let finished = entry.fixture.status.short == "FT" || entry.fixture.status.short == "AET";
            let (home_score, away_score) = match (entry.goals.home, entry.goals.away) {
                (Some(h), Some(a)) => (h, a),
                _ => return None,
            };
            let (ht_home, ht_away) = match entry.score.and_then(|s| s.halftime) {
                Some(ht) => (ht.home, ht.away),
                None => (None, None),
            };
            Some(EventResult {
                event_id: format!("fb-{}", entry.fixture.id),
                sport_id: FOOTBALL_SPORT_ID,
                home_team: entry.teams.home.name,
                away_team: entry.teams.away.name,
                home_score,
                away_score,
                ht_home_score: ht_home,
                ht_away_score: ht_away,
                finished,
            })
        })
        .filter(|result| result.finished)
        .collect())
}

// odds wire format

#[derive(Debug, Deserialize)]
struct OddsResponse {
    response: Vec<OddsEntry>,
}

#[derive(Debug, Deserialize)]
struct OddsEntry {
    bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Deserialize)]
struct Bookmaker {
    bets: Vec<BookmakerBet>,
}

#[derive(Debug, Deserialize)]
struct BookmakerBet {
    name: String,
    values: Vec<BetValue>,
}

#[derive(Debug, Deserialize)]
struct BetValue {
    value: String,
    odd: String,
}

/// Match-winner odds for one fixture. The fixture id is the numeric part of
/// the registry event id.
pub async fn fetch_odds(event_id: &str) -> Result<MatchOdds, String> {
    let settings = settings_map::get();
    let fixture_id = event_id
        .strip_prefix("fb-")
        .ok_or_else(|| format!("Not a premium event id: {}", event_id))?;
    let body = http_get(
        format!("{}/odds?fixture={}", settings.sports_api_url, fixture_id),
        premium_headers(),
    )
    .await?;
    let parsed: OddsResponse = serde_json::from_slice(&body).map_err(|e| format!("Odds parse error: {}", e))?;

    let mut odds = MatchOdds {
        home: 0.0,
        draw: 0.0,
        away: 0.0,
    };
    for entry in parsed.response {
        for bookmaker in entry.bookmakers {
            for bet in bookmaker.bets {
                if bet.name != "Match Winner" {
                    continue;
                }
                for value in bet.values {
                    let parsed_odd = value.odd.parse::<f64>().unwrap_or(0.0);
                    match value.value.as_str() {
                        "Home" => odds.home = parsed_odd,
                        "Draw" => odds.draw = parsed_odd,
                        "Away" => odds.away = parsed_odd,
                        _ => {}
                    }
                }
            }
        }
    }
    if odds.home <= 1.0 || odds.away <= 1.0 {
        return Err(format!("No usable odds for {}", event_id));
    }
    Ok(odds)
}

// free-tier wire format: daily batch, no scores or minutes

#[derive(Debug, Deserialize)]
struct FreeEventsResponse {
    events: Vec<FreeEventEntry>,
}

#[derive(Debug, Deserialize)]
struct FreeEventEntry {
    id: String,
    sport_id: u32,
    home_team: String,
    away_team: String,
    start_time: Option<u64>, // seconds
}

/// Daily batch for a free-tier sport. Never called on the request path.
pub async fn fetch_free_daily(sport_id: u32) -> Result<Vec<RawEvent>, String> {
    let settings = settings_map::get();
    if settings.free_sports_api_url.is_empty() {
        return Err("Free sports API is not configured".to_string());
    }
    let body = http_get(format!("{}/events?sport={}", settings.free_sports_api_url, sport_id), Vec::new()).await?;
    let parsed: FreeEventsResponse = serde_json::from_slice(&body).map_err(|e| format!("Free events parse error: {}", e))?;
    Ok(parsed
        .events
        .into_iter()
        .map(|entry| RawEvent::Generic {
            id: entry.id,
            sport_id: entry.sport_id,
            start_time_secs: entry.start_time,
            home_team: entry.home_team,
            away_team: entry.away_team,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixtures() {
        let body = br#"{
            "response": [
                {
                    "fixture": {"id": 1001, "timestamp": 1750000000, "status": {"short": "1H", "elapsed": 12}},
                    "teams": {"home": {"name": "Arsenal"}, "away": {"name": "Chelsea"}},
                    "goals": {"home": 1, "away": 0},
                    "score": {"halftime": {"home": 1, "away": 0}}
                }
            ]
        }"#;
        let raw = parse_fixtures(body).unwrap();
        assert_eq!(raw.len(), 1);
        match &raw[0] {
            RawEvent::Football {
                fixture_id,
                elapsed_minute,
                home_score,
                ..
            } => {
                assert_eq!(*fixture_id, 1001);
                assert_eq!(*elapsed_minute, Some(12));
                assert_eq!(*home_score, Some(1));
            }
            _ => panic!("expected football raw event"),
        }
    }

    #[test]
    fn test_parse_fixtures_missing_score_block() {
        let body = br#"{
            "response": [
                {
                    "fixture": {"id": 7, "timestamp": null, "status": {"short": "NS", "elapsed": null}},
                    "teams": {"home": {"name": "A"}, "away": {"name": "B"}},
                    "goals": {"home": null, "away": null}
                }
            ]
        }"#;
        let raw = parse_fixtures(body).unwrap();
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn test_parse_fixtures_rejects_garbage() {
        assert!(parse_fixtures(b"not json").is_err());
    }
}
