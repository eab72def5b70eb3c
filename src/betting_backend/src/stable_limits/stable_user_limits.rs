use candid::CandidType;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{Deserialize, Serialize};

use crate::helpers::time_helpers::{week_start, NANOS_PER_DAY};

#[derive(CandidType, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableUserLimitsId(pub String);

impl Storable for StableUserLimitsId {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableUserLimitsId").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableUserLimitsId")
    }

    const BOUND: Bound = Bound::Unbounded;
}

/// Windowed USD spend counters with lazy resets. The optional caps are player
/// protection limits; `self_exclusion_until` blocks betting outright.
#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StableUserLimits {
    pub wallet_address: String,
    pub daily_spent: f64,
    pub weekly_spent: f64,
    pub monthly_spent: f64,
    pub last_reset_daily: u64,
    pub last_reset_weekly: u64,
    pub last_reset_monthly: u64,
    pub daily_limit: Option<f64>,
    pub weekly_limit: Option<f64>,
    pub monthly_limit: Option<f64>,
    pub self_exclusion_until: Option<u64>,
}

impl StableUserLimits {
    pub fn new(wallet_address: &str, ts: u64) -> Self {
        Self {
            wallet_address: wallet_address.to_lowercase(),
            daily_spent: 0.0,
            weekly_spent: 0.0,
            monthly_spent: 0.0,
            last_reset_daily: ts,
            last_reset_weekly: ts,
            last_reset_monthly: ts,
            daily_limit: None,
            weekly_limit: None,
            monthly_limit: None,
            self_exclusion_until: None,
        }
    }

    /// Lazy reset: zero any window whose boundary has passed since the last
    /// write. Called on every read and write path.
    pub fn reset_expired_windows(&mut self, now: u64) {
        if now / NANOS_PER_DAY > self.last_reset_daily / NANOS_PER_DAY {
            self.daily_spent = 0.0;
            self.last_reset_daily = now;
        }
        if week_start(now) > week_start(self.last_reset_weekly) {
            self.weekly_spent = 0.0;
            self.last_reset_weekly = now;
        }
        if month_index(now) > month_index(self.last_reset_monthly) {
            self.monthly_spent = 0.0;
            self.last_reset_monthly = now;
        }
    }

    pub fn is_self_excluded(&self, now: u64) -> bool {
        matches!(self.self_exclusion_until, Some(until) if until > now)
    }

    /// Which cap, if any, `spent + usd_value` would exceed.
    pub fn exceeded_window(&self, usd_value: f64) -> Option<LimitWindow> {
        if let Some(limit) = self.daily_limit {
            if self.daily_spent + usd_value > limit {
                return Some(LimitWindow::Daily);
            }
        }
        if let Some(limit) = self.weekly_limit {
            if self.weekly_spent + usd_value > limit {
                return Some(LimitWindow::Weekly);
            }
        }
        if let Some(limit) = self.monthly_limit {
            if self.monthly_spent + usd_value > limit {
                return Some(LimitWindow::Monthly);
            }
        }
        None
    }

    pub fn add_spent(&mut self, usd_value: f64) {
        self.daily_spent += usd_value;
        self.weekly_spent += usd_value;
        self.monthly_spent += usd_value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitWindow {
    Daily,
    Weekly,
    Monthly,
}

/// Months since epoch, approximated by 30-day blocks. Good enough for a
/// rolling spend window.
fn month_index(ts: u64) -> u64 {
    ts / (30 * NANOS_PER_DAY)
}

impl Storable for StableUserLimits {
    fn to_bytes(&self) -> std::borrow::Cow<[u8]> {
        serde_cbor::to_vec(self).expect("Failed to encode StableUserLimits").into()
    }

    fn from_bytes(bytes: std::borrow::Cow<[u8]>) -> Self {
        serde_cbor::from_slice(&bytes).expect("Failed to decode StableUserLimits")
    }

    const BOUND: Bound = Bound::Unbounded;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::time_helpers::NANOS_PER_HOUR;

    #[test]
    fn test_daily_reset_crosses_midnight() {
        let morning = 100 * NANOS_PER_DAY + 8 * NANOS_PER_HOUR;
        let mut limits = StableUserLimits::new("0xabc", morning);
        limits.add_spent(40.0);
        assert_eq!(limits.daily_spent, 40.0);

        // same day, no reset
        limits.reset_expired_windows(morning + 2 * NANOS_PER_HOUR);
        assert_eq!(limits.daily_spent, 40.0);

        // next day resets daily only
        limits.reset_expired_windows(morning + NANOS_PER_DAY);
        assert_eq!(limits.daily_spent, 0.0);
        assert_eq!(limits.weekly_spent, 40.0);
    }

    #[test]
    fn test_exceeded_window_prefers_daily() {
        let mut limits = StableUserLimits::new("0xabc", 0);
        limits.daily_limit = Some(50.0);
        limits.weekly_limit = Some(200.0);
        limits.add_spent(45.0);
        assert_eq!(limits.exceeded_window(10.0), Some(LimitWindow::Daily));
        assert_eq!(limits.exceeded_window(5.0), None);
    }

    #[test]
    fn test_self_exclusion() {
        let mut limits = StableUserLimits::new("0xabc", 0);
        limits.self_exclusion_until = Some(1_000);
        assert!(limits.is_self_excluded(999));
        assert!(!limits.is_self_excluded(1_000));
    }
}
