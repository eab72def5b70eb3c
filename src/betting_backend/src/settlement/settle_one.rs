use crate::bet_admission::market_rules::{is_first_half_market, is_match_winner_market};
use crate::bet_admission::odds_guard::{detect_side, TeamSide};
use crate::event_registry::raw_event::EventResult;
use crate::stable_bet::stable_bet::{BetStatus, StableBet};

/// Outcome of settling one bet against a final result.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub status: BetStatus,
    /// stake * odds when won, stake when void, 0 when lost
    pub gross: f64,
}

/// Resolve one selection against the final score. Pure; the worker and the
/// parlay path share it. Ambiguous or unknown markets settle void rather
/// than guessing.
pub fn settle_selection(
    market_id: &str,
    outcome_id: &str,
    prediction: &str,
    home_team: &str,
    away_team: &str,
    result: &EventResult,
) -> BetStatus {
    let market = market_id.to_lowercase();

    // first-half markets settle on the half-time score; without one, void
    let (home_score, away_score) = if is_first_half_market(&market) {
        match (result.ht_home_score, result.ht_away_score) {
            (Some(h), Some(a)) => (h, a),
            _ => return BetStatus::Void,
        }
    } else {
        (result.home_score, result.away_score)
    };

    if is_match_winner_market(&market) && !market.contains("double_chance") {
        let winner = if home_score > away_score {
            TeamSide::Home
        } else if away_score > home_score {
            TeamSide::Away
        } else {
            TeamSide::Draw
        };
        return match detect_side(outcome_id, prediction, home_team, away_team) {
            TeamSide::Unknown => BetStatus::Void,
            side if side == winner => BetStatus::Won,
            _ => BetStatus::Lost,
        };
    }

    if market.contains("over_under") || market.contains("total") {
        let line = match parse_line(&market).or_else(|| parse_line(&outcome_id.to_lowercase())) {
            Some(line) => line,
            None => return BetStatus::Void,
        };
        let total = (home_score + away_score) as f64;
        if (total - line).abs() < f64::EPSILON {
            return BetStatus::Void; // push on the exact line
        }
        let outcome = outcome_id.to_lowercase();
        let over = total > line;
        return match (outcome.contains("over"), outcome.contains("under")) {
            (true, false) => if over { BetStatus::Won } else { BetStatus::Lost },
            (false, true) => if over { BetStatus::Lost } else { BetStatus::Won },
            _ => BetStatus::Void,
        };
    }

    if market.contains("both_teams_score") || market.contains("btts") {
        let both = home_score > 0 && away_score > 0;
        let outcome = outcome_id.to_lowercase();
        return match (outcome.contains("yes"), outcome.contains("no")) {
            (true, false) => if both { BetStatus::Won } else { BetStatus::Lost },
            (false, true) => if both { BetStatus::Lost } else { BetStatus::Won },
            _ => BetStatus::Void,
        };
    }

    if market.contains("double_chance") {
        let outcome = outcome_id.to_lowercase();
        let home_win = home_score > away_score;
        let away_win = away_score > home_score;
        let draw = home_score == away_score;
        let won = match outcome.as_str() {
            o if o.contains("1x") || o.contains("home_draw") => home_win || draw,
            o if o.contains("x2") || o.contains("draw_away") => away_win || draw,
            o if o.contains("12") || o.contains("home_away") => home_win || away_win,
            _ => return BetStatus::Void,
        };
        return if won { BetStatus::Won } else { BetStatus::Lost };
    }

    if market.contains("handicap") {
        let line = match parse_line(&outcome_id.to_lowercase()).or_else(|| parse_line(&market)) {
            Some(line) => line,
            None => return BetStatus::Void,
        };
        let adjusted_home = home_score as f64 + line;
        let away = away_score as f64;
        if (adjusted_home - away).abs() < f64::EPSILON {
            return BetStatus::Void; // push
        }
        let outcome = outcome_id.to_lowercase();
        let side = if outcome.starts_with("home") {
            TeamSide::Home
        } else if outcome.starts_with("away") {
            TeamSide::Away
        } else {
            detect_side(outcome_id, prediction, home_team, away_team)
        };
        return match side {
            TeamSide::Home => if adjusted_home > away { BetStatus::Won } else { BetStatus::Lost },
            TeamSide::Away => if away > adjusted_home { BetStatus::Won } else { BetStatus::Lost },
            _ => BetStatus::Void,
        };
    }

    BetStatus::Void
}

pub fn settle_one(bet: &StableBet, result: &EventResult) -> Settlement {
    let status = settle_selection(
        &bet.market_id,
        &bet.outcome_id,
        &bet.prediction,
        &bet.home_team,
        &bet.away_team,
        result,
    );
    let gross = match status {
        BetStatus::Won => bet.potential_payout,
        BetStatus::Void => bet.stake,
        _ => 0.0,
    };
    Settlement { status, gross }
}

/// Last numeric token of a market or outcome id, e.g. 2.5 from
/// "over_under_2.5" or -1.5 from "home_-1.5".
fn parse_line(s: &str) -> Option<f64> {
    s.rsplit(['_', ' ']).find_map(|token| token.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_registry::raw_event::FOOTBALL_SPORT_ID;

    fn result(home: u32, away: u32, ht: Option<(u32, u32)>) -> EventResult {
        EventResult {
            event_id: "fb-2000".to_string(),
            sport_id: FOOTBALL_SPORT_ID,
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            home_score: home,
            away_score: away,
            ht_home_score: ht.map(|(h, _)| h),
            ht_away_score: ht.map(|(_, a)| a),
            finished: true,
        }
    }

    fn settle(market: &str, outcome: &str, result: &EventResult) -> BetStatus {
        settle_selection(market, outcome, "", "Arsenal", "Chelsea", result)
    }

    #[test]
    fn test_match_winner() {
        let r = result(2, 1, None);
        assert_eq!(settle("match_winner", "home", &r), BetStatus::Won);
        assert_eq!(settle("match_winner", "away", &r), BetStatus::Lost);
        assert_eq!(settle("match_winner", "draw", &r), BetStatus::Lost);
        assert_eq!(settle("match_winner", "draw", &result(1, 1, None)), BetStatus::Won);
    }

    #[test]
    fn test_match_winner_unknown_side_voids() {
        let r = result(2, 1, None);
        assert_eq!(settle("match_winner", "whoever", &r), BetStatus::Void);
    }

    #[test]
    fn test_over_under() {
        let r = result(2, 1, None);
        assert_eq!(settle("over_under_2.5", "over", &r), BetStatus::Won);
        assert_eq!(settle("over_under_2.5", "under", &r), BetStatus::Lost);
        assert_eq!(settle("over_under_3.5", "over", &r), BetStatus::Lost);
        // exact line is a push
        assert_eq!(settle("over_under_3", "over", &r), BetStatus::Void);
        // no parsable line voids
        assert_eq!(settle("over_under", "over", &r), BetStatus::Void);
    }

    #[test]
    fn test_both_teams_score() {
        assert_eq!(settle("both_teams_score", "yes", &result(2, 1, None)), BetStatus::Won);
        assert_eq!(settle("both_teams_score", "yes", &result(2, 0, None)), BetStatus::Lost);
        assert_eq!(settle("both_teams_score", "no", &result(2, 0, None)), BetStatus::Won);
    }

    #[test]
    fn test_double_chance() {
        let home_win = result(2, 0, None);
        assert_eq!(settle("double_chance", "1x", &home_win), BetStatus::Won);
        assert_eq!(settle("double_chance", "x2", &home_win), BetStatus::Lost);
        assert_eq!(settle("double_chance", "12", &home_win), BetStatus::Won);
        let draw = result(1, 1, None);
        assert_eq!(settle("double_chance", "1x", &draw), BetStatus::Won);
        assert_eq!(settle("double_chance", "12", &draw), BetStatus::Lost);
    }

    #[test]
    fn test_handicap() {
        let r = result(2, 0, None);
        assert_eq!(settle("handicap", "home_-1.5", &r), BetStatus::Won);
        assert_eq!(settle("handicap", "home_-2.5", &r), BetStatus::Lost);
        assert_eq!(settle("handicap", "away_+1.5", &r), BetStatus::Lost);
        // whole-number line landing exactly is a push
        assert_eq!(settle("handicap", "home_-2", &r), BetStatus::Void);
    }

    #[test]
    fn test_first_half_winner() {
        let r = result(2, 1, Some((0, 1)));
        assert_eq!(settle("first_half_winner", "away", &r), BetStatus::Won);
        assert_eq!(settle("first_half_winner", "home", &r), BetStatus::Lost);
        // no half-time score recorded: void
        assert_eq!(settle("first_half_winner", "away", &result(2, 1, None)), BetStatus::Void);
    }

    #[test]
    fn test_unknown_market_voids() {
        assert_eq!(settle("correct_score", "2-1", &result(2, 1, None)), BetStatus::Void);
    }

    #[test]
    fn test_settle_one_gross() {
        use crate::stable_bet::stable_bet::{PaymentMethod, StableBet};
        use crate::token::Currency;
        let bet = StableBet {
            bet_id: "B1".to_string(),
            wallet_address: "0xaaa".to_string(),
            event_id: "fb-2000".to_string(),
            event_name: "Arsenal vs Chelsea".to_string(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            market_id: "match_winner".to_string(),
            outcome_id: "home".to_string(),
            prediction: String::new(),
            odds: 2.0,
            stake: 100.0,
            currency: Currency::SBETS,
            potential_payout: 200.0,
            status: BetStatus::Pending,
            payment_method: PaymentMethod::PlatformBalance,
            used_bonus: false,
            platform_fee: 1.0,
            is_live: false,
            match_minute: None,
            tx_hash: None,
            on_chain_bet_id: None,
            created_at: 0,
            settled_at: None,
            settlement_tx_hash: None,
        };
        let settlement = settle_one(&bet, &result(2, 1, None));
        assert_eq!(settlement.status, BetStatus::Won);
        assert_eq!(settlement.gross, 200.0);

        let settlement = settle_one(&bet, &result(0, 1, None));
        assert_eq!(settlement.status, BetStatus::Lost);
        assert_eq!(settlement.gross, 0.0);
    }
}
