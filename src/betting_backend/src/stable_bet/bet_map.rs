use std::collections::BTreeMap;

use crate::stable_memory::BET_MAP;
use crate::stable_settings::settings_map;
use crate::token::Currency;

use super::stable_bet::{BetStatus, PaymentMethod, StableBet, StableBetId};

pub fn get_by_bet_id(bet_id: &str) -> Option<StableBet> {
    BET_MAP.with(|m| m.borrow().get(&StableBetId(bet_id.to_string())))
}

/// Insert a bet. A synthetic id is minted when the caller did not bind an
/// on-chain object id.
pub fn insert(bet: &StableBet) -> String {
    let bet_id = if bet.bet_id.is_empty() {
        format!("B{}", settings_map::inc_bet_map_idx())
    } else {
        bet.bet_id.clone()
    };
    let insert_bet = StableBet {
        bet_id: bet_id.clone(),
        ..bet.clone()
    };
    BET_MAP.with(|m| m.borrow_mut().insert(StableBetId(bet_id.clone()), insert_bet));
    bet_id
}

/// Conditional status transition: compare-and-set on the prior status.
/// Returns false when the bet is missing, the prior status does not match, or
/// the transition is illegal. Settlement idempotence depends on this being
/// the only way a bet moves out of a non-terminal state.
pub fn update_status(bet_id: &str, from: &[BetStatus], to: BetStatus, ts: u64) -> bool {
    let key = StableBetId(bet_id.to_string());
    BET_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut bet) => {
                if !from.contains(&bet.status) || !bet.status.can_transition_to(to) {
                    return false;
                }
                bet.status = to;
                bet.settled_at = Some(ts);
                map.insert(key, bet);
                true
            }
            None => false,
        }
    })
}

/// Revert a settlement transition after a failed credit. Clears settled_at so
/// the next cycle re-processes the bet from scratch.
pub fn revert_status(bet_id: &str, to: BetStatus) {
    let key = StableBetId(bet_id.to_string());
    BET_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if let Some(mut bet) = map.get(&key) {
            bet.status = to;
            bet.settled_at = None;
            map.insert(key, bet);
        }
    });
}

pub fn set_settlement_tx_hash(bet_id: &str, tx_hash: &str) {
    let key = StableBetId(bet_id.to_string());
    BET_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if let Some(mut bet) = map.get(&key) {
            bet.settlement_tx_hash = Some(tx_hash.to_string());
            map.insert(key, bet);
        }
    });
}

pub fn get_by_wallet(wallet_address: &str, status: Option<BetStatus>) -> Vec<StableBet> {
    let wallet = wallet_address.to_lowercase();
    BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, bet)| {
                if bet.wallet_address != wallet {
                    return None;
                }
                match status {
                    Some(s) if bet.status != s => None,
                    _ => Some(bet.clone()),
                }
            })
            .collect()
    })
}

/// Non-voided bets a wallet placed since `since_ts`. The daily rate gate.
pub fn count_wallet_bets_since(wallet_address: &str, since_ts: u64) -> u32 {
    let wallet = wallet_address.to_lowercase();
    BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter(|(_, bet)| bet.wallet_address == wallet && bet.created_at >= since_ts && bet.status != BetStatus::Void)
            .count() as u32
    })
}

pub fn last_bet_ts(wallet_address: &str) -> Option<u64> {
    let wallet = wallet_address.to_lowercase();
    BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter(|(_, bet)| bet.wallet_address == wallet)
            .map(|(_, bet)| bet.created_at)
            .max()
    })
}

/// Non-voided bets a wallet holds on one event. The per-event limit gate.
pub fn count_wallet_event_bets(wallet_address: &str, event_id: &str) -> u32 {
    let wallet = wallet_address.to_lowercase();
    BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter(|(_, bet)| bet.wallet_address == wallet && bet.event_id == event_id && bet.status != BetStatus::Void)
            .count() as u32
    })
}

/// Duplicate check: same wallet + event + market + outcome still open.
pub fn find_open_duplicate(wallet_address: &str, event_id: &str, market_id: &str, outcome_id: &str) -> Option<StableBet> {
    let wallet = wallet_address.to_lowercase();
    BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .map(|(_, bet)| bet)
            .find(|bet| {
                bet.wallet_address == wallet
                    && bet.event_id == event_id
                    && bet.market_id == market_id
                    && bet.outcome_id == outcome_id
                    && bet.status.is_open()
            })
    })
}

pub fn tx_hash_exists(tx_hash: &str) -> bool {
    BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .any(|(_, bet)| bet.tx_hash.as_deref() == Some(tx_hash))
    })
}

pub fn wallet_has_used_free_bet(wallet_address: &str) -> bool {
    let wallet = wallet_address.to_lowercase();
    BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .any(|(_, bet)| bet.wallet_address == wallet && bet.payment_method == PaymentMethod::FreeBet)
    })
}

pub fn wallet_bet_count(wallet_address: &str) -> u32 {
    let wallet = wallet_address.to_lowercase();
    BET_MAP.with(|m| m.borrow().iter().filter(|(_, bet)| bet.wallet_address == wallet).count() as u32)
}

pub fn get_open_bets() -> Vec<StableBet> {
    BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, bet)| if bet.status.is_open() { Some(bet.clone()) } else { None })
            .collect()
    })
}

pub fn get_open_bets_for_event(event_id: &str) -> Vec<StableBet> {
    BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, bet)| {
                if bet.event_id == event_id && bet.status.is_open() {
                    Some(bet.clone())
                } else {
                    None
                }
            })
            .collect()
    })
}

/// Sum of potential payouts for open bets, per currency. Feeds the
/// reconciliation report.
pub fn open_liability_by_currency() -> BTreeMap<Currency, f64> {
    let mut liabilities = BTreeMap::new();
    BET_MAP.with(|m| {
        for (_, bet) in m.borrow().iter() {
            if bet.status.is_open() {
                *liabilities.entry(bet.currency).or_insert(0.0) += bet.potential_payout;
            }
        }
    });
    liabilities
}

/// Bets settled inside a time window, for the revenue engine.
pub fn get_settled_in_window(from_ts: u64, to_ts: u64) -> Vec<StableBet> {
    BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, bet)| match bet.settled_at {
                Some(settled_at) if settled_at >= from_ts && settled_at < to_ts => Some(bet.clone()),
                _ => None,
            })
            .collect()
    })
}
