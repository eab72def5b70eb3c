use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::helpers::time_helpers::{week_end, week_start};
use crate::ic::network::ICNetwork;
use crate::stable_bet::bet_map;
use crate::stable_bet::stable_bet::{BetStatus, StableBet};
use crate::stable_settings::settings_map;
use crate::token::Currency;

/// Revenue a settled bet contributed, in its own currency. Lost stakes stay
/// with the platform whole; winning bets contribute the 1% profit fee.
pub fn bet_revenue(bet: &StableBet) -> f64 {
    match bet.status {
        BetStatus::Lost | BetStatus::Void => bet.stake,
        BetStatus::Won | BetStatus::PaidOut => (bet.potential_payout - bet.stake).max(0.0) * 0.01,
        _ => 0.0,
    }
}

#[derive(CandidType, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CurrencyTotals {
    pub sui: f64,
    pub sbets: f64,
}

impl CurrencyTotals {
    pub fn add(&mut self, currency: Currency, amount: f64) {
        match currency {
            Currency::SUI => self.sui += amount,
            Currency::SBETS => self.sbets += amount,
        }
    }

    pub fn scaled(&self, factor: f64) -> CurrencyTotals {
        CurrencyTotals {
            sui: self.sui * factor,
            sbets: self.sbets * factor,
        }
    }
}

/// Sum per-currency revenue over a slice of settled bets.
pub fn total_revenue(bets: &[StableBet]) -> CurrencyTotals {
    let mut totals = CurrencyTotals::default();
    for bet in bets {
        totals.add(bet.currency, bet_revenue(bet));
    }
    totals
}

/// Revenue for the ISO week containing `ts`, reading only bets settled on or
/// after the deployment cutoff.
pub fn weekly_revenue(ts: u64) -> CurrencyTotals {
    let settings = settings_map::get();
    let start = week_start(ts).max(settings.revenue_cutoff_ts);
    let end = week_end(week_start(ts));
    let bets = bet_map::get_settled_in_window(start, end);
    total_revenue(&bets)
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct RevenueStatsReply {
    pub week_start: u64,
    pub total: CurrencyTotals,
    pub holders_pool: CurrencyTotals,
    pub treasury_pool: CurrencyTotals,
    pub profit_pool: CurrencyTotals,
}

/// Current-week stats with the 30/40/30 split applied.
pub fn get_revenue_stats() -> RevenueStatsReply {
    let now = ICNetwork::get_time();
    let settings = settings_map::get();
    let total = weekly_revenue(now);
    RevenueStatsReply {
        week_start: week_start(now),
        total,
        holders_pool: total.scaled(settings.revenue_share_holders),
        treasury_pool: total.scaled(settings.revenue_share_treasury),
        profit_pool: total.scaled(settings.revenue_share_profit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stable_bet::stable_bet::PaymentMethod;

    fn bet(status: BetStatus, stake: f64, payout: f64, currency: Currency) -> StableBet {
        StableBet {
            bet_id: "B1".to_string(),
            wallet_address: "0xaaa".to_string(),
            event_id: "fb-1".to_string(),
            event_name: String::new(),
            home_team: String::new(),
            away_team: String::new(),
            market_id: "match_winner".to_string(),
            outcome_id: "home".to_string(),
            prediction: String::new(),
            odds: payout / stake,
            stake,
            currency,
            potential_payout: payout,
            status,
            payment_method: PaymentMethod::PlatformBalance,
            used_bonus: false,
            platform_fee: 0.0,
            is_live: false,
            match_minute: None,
            tx_hash: None,
            on_chain_bet_id: None,
            created_at: 0,
            settled_at: Some(1),
            settlement_tx_hash: None,
        }
    }

    #[test]
    fn test_bet_revenue_rules() {
        assert_eq!(bet_revenue(&bet(BetStatus::Lost, 100.0, 200.0, Currency::SBETS)), 100.0);
        // won: 1% of the 100 profit
        assert!((bet_revenue(&bet(BetStatus::Won, 100.0, 200.0, Currency::SBETS)) - 1.0).abs() < 1e-9);
        assert!((bet_revenue(&bet(BetStatus::PaidOut, 100.0, 200.0, Currency::SBETS)) - 1.0).abs() < 1e-9);
        assert_eq!(bet_revenue(&bet(BetStatus::Void, 50.0, 100.0, Currency::SUI)), 50.0);
        assert_eq!(bet_revenue(&bet(BetStatus::Pending, 100.0, 200.0, Currency::SBETS)), 0.0);
    }

    #[test]
    fn test_total_revenue_partitions_by_currency() {
        let bets = vec![
            bet(BetStatus::Lost, 10.0, 20.0, Currency::SUI),
            bet(BetStatus::Lost, 500.0, 900.0, Currency::SBETS),
            bet(BetStatus::Won, 100.0, 300.0, Currency::SBETS),
        ];
        let totals = total_revenue(&bets);
        assert!((totals.sui - 10.0).abs() < 1e-9);
        assert!((totals.sbets - 502.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_sums_to_total() {
        let total = CurrencyTotals { sui: 100.0, sbets: 1_000.0 };
        let holders = total.scaled(0.30);
        let treasury = total.scaled(0.40);
        let profit = total.scaled(0.30);
        assert!((holders.sui + treasury.sui + profit.sui - total.sui).abs() < 1e-9);
        assert!((holders.sbets + treasury.sbets + profit.sbets - total.sbets).abs() < 1e-9);
    }
}
