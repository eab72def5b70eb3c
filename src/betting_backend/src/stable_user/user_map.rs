use crate::stable_memory::USER_MAP;
use crate::token::Currency;

use super::stable_user::{StableUser, StableUserId};

pub fn get_by_wallet(wallet_address: &str) -> Option<StableUser> {
    let key = StableUserId(wallet_address.to_lowercase());
    USER_MAP.with(|m| m.borrow().get(&key))
}

pub fn get_or_create(wallet_address: &str, ts: u64) -> StableUser {
    let key = StableUserId(wallet_address.to_lowercase());
    USER_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(user) => user,
            None => {
                let user = StableUser::new(wallet_address, ts);
                map.insert(key, user.clone());
                user
            }
        }
    })
}

pub fn update(user: &StableUser) {
    let key = StableUserId(user.wallet_address.clone());
    USER_MAP.with(|m| m.borrow_mut().insert(key, user.clone()));
}

pub fn all_wallets() -> Vec<String> {
    USER_MAP.with(|m| m.borrow().iter().map(|(k, _)| k.0.clone()).collect())
}

/// Credit a platform balance. Errors when the user row is missing so callers
/// can revert the state transition that earned the credit.
pub fn add_platform_balance(wallet_address: &str, currency: Currency, amount: f64) -> Result<(), String> {
    let key = StableUserId(wallet_address.to_lowercase());
    USER_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut user) => {
                match currency {
                    Currency::SUI => user.balance_sui += amount,
                    Currency::SBETS => user.balance_sbets += amount,
                }
                map.insert(key, user);
                Ok(())
            }
            None => Err(format!("User {} not found", wallet_address)),
        }
    })
}

pub fn deduct_platform_balance(wallet_address: &str, currency: Currency, amount: f64) -> Result<(), String> {
    let key = StableUserId(wallet_address.to_lowercase());
    USER_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut user) => {
                let balance = match currency {
                    Currency::SUI => &mut user.balance_sui,
                    Currency::SBETS => &mut user.balance_sbets,
                };
                if *balance < amount {
                    return Err(format!("Insufficient {} balance", currency));
                }
                *balance -= amount;
                map.insert(key, user);
                Ok(())
            }
            None => Err(format!("User {} not found", wallet_address)),
        }
    })
}

pub fn add_loyalty_points(wallet_address: &str, points: f64) {
    if let Some(mut user) = get_by_wallet(wallet_address) {
        user.loyalty_points += points;
        update(&user);
    }
}

pub fn add_bet_volume(wallet_address: &str, usd: f64) {
    if let Some(mut user) = get_by_wallet(wallet_address) {
        user.total_bet_volume_usd += usd;
        update(&user);
    }
}

/// Decrement the free-bet counter. Fails when no free bet is left.
pub fn consume_free_bet(wallet_address: &str, count: u64) -> Result<(), String> {
    let key = StableUserId(wallet_address.to_lowercase());
    USER_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut user) => {
                if user.free_bet_balance < count {
                    return Err("No free bet balance".to_string());
                }
                user.free_bet_balance -= count;
                map.insert(key, user);
                Ok(())
            }
            None => Err(format!("User {} not found", wallet_address)),
        }
    })
}

/// Consume up to `max_usd` from the promotion bonus. Returns the amount
/// actually consumed.
pub fn consume_bonus(wallet_address: &str, max_usd: f64) -> f64 {
    let key = StableUserId(wallet_address.to_lowercase());
    USER_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut user) => {
                let consumed = user.bonus_balance.min(max_usd).max(0.0);
                user.bonus_balance -= consumed;
                map.insert(key, user);
                consumed
            }
            None => 0.0,
        }
    })
}
