use crate::stable_memory::REVENUE_CLAIM_MAP;

use super::stable_revenue_claim::{StableRevenueClaim, StableRevenueClaimId};

pub fn get(wallet_address: &str, week_start: u64) -> Option<StableRevenueClaim> {
    let key = StableRevenueClaimId {
        wallet_address: wallet_address.to_lowercase(),
        week_start,
    };
    REVENUE_CLAIM_MAP.with(|m| m.borrow().get(&key))
}

/// Insert once per (wallet, week). Returns the existing row on replay so the
/// caller can hand back the stored tx hashes.
pub fn insert_once(claim: &StableRevenueClaim) -> Result<(), StableRevenueClaim> {
    let key = StableRevenueClaimId {
        wallet_address: claim.wallet_address.to_lowercase(),
        week_start: claim.week_start,
    };
    REVENUE_CLAIM_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if let Some(existing) = map.get(&key) {
            return Err(existing);
        }
        map.insert(key, claim.clone());
        Ok(())
    })
}

/// Record the outcome of the two payout legs after the row exists.
pub fn set_tx_hashes(wallet_address: &str, week_start: u64, sui_tx: Option<String>, sbets_tx: Option<String>) {
    let key = StableRevenueClaimId {
        wallet_address: wallet_address.to_lowercase(),
        week_start,
    };
    REVENUE_CLAIM_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if let Some(mut claim) = map.get(&key) {
            claim.sui_tx_hash = sui_tx;
            claim.sbets_tx_hash = sbets_tx;
            map.insert(key, claim);
        }
    });
}

pub fn get_by_week(week_start: u64) -> Vec<StableRevenueClaim> {
    REVENUE_CLAIM_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, claim)| {
                if claim.week_start == week_start {
                    Some(claim.clone())
                } else {
                    None
                }
            })
            .collect()
    })
}
