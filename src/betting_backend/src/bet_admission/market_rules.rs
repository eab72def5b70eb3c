use wildmatch::WildMatch;

/// Match-winner market family. Live betting only admits these.
const MATCH_WINNER_PATTERNS: [&str; 5] = ["*match_winner*", "*match_result*", "*1x2*", "*moneyline*", "*winner*"];

pub fn is_match_winner_market(market_id: &str) -> bool {
    let market = market_id.to_lowercase();
    MATCH_WINNER_PATTERNS.iter().any(|pattern| WildMatch::new(pattern).matches(&market))
}

/// Markets that only pay on first-half outcomes. Closed once the first half
/// is over.
pub fn is_first_half_market(market_id: &str) -> bool {
    let market = market_id.to_lowercase();
    WildMatch::new("*first_half*").matches(&market) || WildMatch::new("*1st_half*").matches(&market)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_winner_family() {
        assert!(is_match_winner_market("match_winner"));
        assert!(is_match_winner_market("MATCH_RESULT"));
        assert!(is_match_winner_market("ft_1x2"));
        assert!(is_match_winner_market("moneyline_3way"));
        assert!(is_match_winner_market("first_half_winner"));
        assert!(!is_match_winner_market("over_under_2.5"));
        assert!(!is_match_winner_market("both_teams_score"));
    }

    #[test]
    fn test_first_half_markets() {
        assert!(is_first_half_market("first_half_winner"));
        assert!(is_first_half_market("1st_half_goals"));
        assert!(!is_first_half_market("match_winner"));
    }
}
