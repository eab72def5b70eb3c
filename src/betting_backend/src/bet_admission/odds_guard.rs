use super::bet_error::BetError;
use super::market_rules::is_match_winner_market;

/// Which side of a match-winner market a bet backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    Home,
    Away,
    Draw,
    Unknown,
}

const HOME_OUTCOME_IDS: [&str; 5] = ["home", "h", "1", "home_team", "team1"];
const AWAY_OUTCOME_IDS: [&str; 5] = ["away", "a", "2", "away_team", "team2"];
const DRAW_OUTCOME_IDS: [&str; 3] = ["draw", "x", "tie"];

/// Combine outcome-id patterns with a prediction-text match against the
/// lowercased team names.
pub fn detect_side(outcome_id: &str, prediction: &str, home_team: &str, away_team: &str) -> TeamSide {
    let outcome = outcome_id.to_lowercase();
    if HOME_OUTCOME_IDS.contains(&outcome.as_str()) {
        return TeamSide::Home;
    }
    if AWAY_OUTCOME_IDS.contains(&outcome.as_str()) {
        return TeamSide::Away;
    }
    if DRAW_OUTCOME_IDS.contains(&outcome.as_str()) {
        return TeamSide::Draw;
    }

    let prediction = prediction.to_lowercase();
    let home = home_team.to_lowercase();
    let away = away_team.to_lowercase();
    if !home.is_empty() && prediction.contains(&home) {
        return TeamSide::Home;
    }
    if !away.is_empty() && prediction.contains(&away) {
        return TeamSide::Away;
    }
    TeamSide::Unknown
}

/// Late-game odds exploit guard. A bet on the team already winning by two or
/// more goals in the second half cannot carry long odds: a live odds feed
/// lagging the real score would hand out free money. Bets on the losing team
/// are never rejected here.
pub fn check_suspicious_odds(
    market_id: &str,
    outcome_id: &str,
    prediction: &str,
    home_team: &str,
    away_team: &str,
    home_score: Option<u32>,
    away_score: Option<u32>,
    minute: Option<u32>,
    odds: f64,
) -> Result<(), BetError> {
    // only match-winner markets with verified scores
    if !is_match_winner_market(market_id) {
        return Ok(());
    }
    let (home_score, away_score, minute) = match (home_score, away_score, minute) {
        (Some(h), Some(a), Some(m)) => (h, a, m),
        _ => return Ok(()),
    };

    let diff = home_score.abs_diff(away_score);
    if diff < 2 || minute < 45 {
        return Ok(());
    }

    let winning_side = if home_score > away_score { TeamSide::Home } else { TeamSide::Away };
    let bet_side = detect_side(outcome_id, prediction, home_team, away_team);
    if bet_side != winning_side {
        return Ok(());
    }

    let threshold = if minute >= 60 { 1.5 } else { 1.8 };
    if odds > threshold {
        return Err(BetError::SuspiciousOdds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_side_by_outcome_id() {
        assert_eq!(detect_side("home", "", "Arsenal", "Chelsea"), TeamSide::Home);
        assert_eq!(detect_side("2", "", "Arsenal", "Chelsea"), TeamSide::Away);
        assert_eq!(detect_side("X", "", "Arsenal", "Chelsea"), TeamSide::Draw);
    }

    #[test]
    fn test_detect_side_by_prediction_text() {
        assert_eq!(detect_side("win_55", "Arsenal to win", "Arsenal", "Chelsea"), TeamSide::Home);
        assert_eq!(detect_side("win_56", "chelsea win", "Arsenal", "Chelsea"), TeamSide::Away);
        assert_eq!(detect_side("win_57", "someone wins", "Arsenal", "Chelsea"), TeamSide::Unknown);
    }

    #[test]
    fn test_leader_bet_with_long_odds_rejected() {
        // 3-0 at minute 70: odds over 1.5 on the leader are suspicious
        let result = check_suspicious_odds(
            "match_winner",
            "home",
            "",
            "Arsenal",
            "Chelsea",
            Some(3),
            Some(0),
            Some(70),
            1.9,
        );
        assert_eq!(result, Err(BetError::SuspiciousOdds));
    }

    #[test]
    fn test_losing_team_exempt() {
        let result = check_suspicious_odds(
            "match_winner",
            "away",
            "",
            "Arsenal",
            "Chelsea",
            Some(3),
            Some(0),
            Some(70),
            8.0,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_threshold_relaxed_before_minute_60() {
        // minute 50 threshold is 1.8
        let ok = check_suspicious_odds("match_winner", "home", "", "A", "B", Some(2), Some(0), Some(50), 1.7);
        assert!(ok.is_ok());
        let bad = check_suspicious_odds("match_winner", "home", "", "A", "B", Some(2), Some(0), Some(50), 1.9);
        assert_eq!(bad, Err(BetError::SuspiciousOdds));
    }

    #[test]
    fn test_small_lead_or_early_minute_exempt() {
        let one_goal = check_suspicious_odds("match_winner", "home", "", "A", "B", Some(1), Some(0), Some(80), 5.0);
        assert!(one_goal.is_ok());
        let early = check_suspicious_odds("match_winner", "home", "", "A", "B", Some(3), Some(0), Some(30), 5.0);
        assert!(early.is_ok());
    }

    #[test]
    fn test_non_match_winner_and_missing_scores_exempt() {
        let other_market = check_suspicious_odds("over_under_2.5", "over", "", "A", "B", Some(3), Some(0), Some(70), 5.0);
        assert!(other_market.is_ok());
        let no_scores = check_suspicious_odds("match_winner", "home", "", "A", "B", None, None, Some(70), 5.0);
        assert!(no_scores.is_ok());
    }
}
