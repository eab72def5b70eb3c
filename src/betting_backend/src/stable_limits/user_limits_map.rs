use crate::stable_memory::USER_LIMITS_MAP;

use super::stable_user_limits::{StableUserLimits, StableUserLimitsId};

/// Fetch with lazy window resets applied and persisted.
pub fn get_or_create(wallet_address: &str, now: u64) -> StableUserLimits {
    let key = StableUserLimitsId(wallet_address.to_lowercase());
    USER_LIMITS_MAP.with(|m| {
        let mut map = m.borrow_mut();
        let mut limits = map
            .get(&key)
            .unwrap_or_else(|| StableUserLimits::new(wallet_address, now));
        limits.reset_expired_windows(now);
        map.insert(key, limits.clone());
        limits
    })
}

pub fn update(limits: &StableUserLimits) {
    let key = StableUserLimitsId(limits.wallet_address.clone());
    USER_LIMITS_MAP.with(|m| m.borrow_mut().insert(key, limits.clone()));
}

pub fn add_spent(wallet_address: &str, usd_value: f64, now: u64) {
    let mut limits = get_or_create(wallet_address, now);
    limits.add_spent(usd_value);
    update(&limits);
}

pub fn set_limits(
    wallet_address: &str,
    daily: Option<f64>,
    weekly: Option<f64>,
    monthly: Option<f64>,
    now: u64,
) -> StableUserLimits {
    let mut limits = get_or_create(wallet_address, now);
    limits.daily_limit = daily;
    limits.weekly_limit = weekly;
    limits.monthly_limit = monthly;
    update(&limits);
    limits
}

pub fn set_self_exclusion(wallet_address: &str, until: Option<u64>, now: u64) -> StableUserLimits {
    let mut limits = get_or_create(wallet_address, now);
    limits.self_exclusion_until = until;
    update(&limits);
    limits
}
