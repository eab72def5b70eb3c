use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::ic::ledger;
use crate::stable_bet::bet_map;
use crate::token::Currency;

const EPSILON_SUI: f64 = 0.001;
const EPSILON_SBETS: f64 = 1.0;

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyReconciliation {
    pub currency: Currency,
    pub expected_liability: f64,
    pub onchain_balance: f64,
    pub delta: f64,
    pub within_epsilon: bool,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub currencies: Vec<CurrencyReconciliation>,
    pub balanced: bool,
}

/// Compare the ledger balances backing payouts against the sum of potential
/// payouts for open bets. Mismatches beyond epsilon are reported, never
/// auto-corrected.
pub async fn reconcile() -> Result<ReconcileReport, String> {
    let liabilities = bet_map::open_liability_by_currency();
    let mut currencies = Vec::new();

    for currency in [Currency::SUI, Currency::SBETS] {
        let expected = liabilities.get(&currency).copied().unwrap_or(0.0);
        let onchain_raw = ledger::balance_of(currency, ledger::canister_account()).await?;
        let onchain = ledger::from_base_units(&onchain_raw, currency.decimals());
        let delta = onchain - expected;
        let epsilon = match currency {
            Currency::SUI => EPSILON_SUI,
            Currency::SBETS => EPSILON_SBETS,
        };
        currencies.push(CurrencyReconciliation {
            currency,
            expected_liability: expected,
            onchain_balance: onchain,
            delta,
            within_epsilon: delta.abs() <= epsilon,
        });
    }

    let balanced = currencies.iter().all(|c| c.within_epsilon);
    Ok(ReconcileReport { currencies, balanced })
}
