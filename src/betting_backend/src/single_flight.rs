use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// In-process single-flight guard: at most one task runs a critical section
/// for a given key. Used for cheap deduplication only; durable correctness
/// comes from the conditional updates in the stable maps.
pub struct SingleFlight<K: Ord + Clone> {
    in_flight: Rc<RefCell<BTreeSet<K>>>,
}

impl<K: Ord + Clone> Default for SingleFlight<K> {
    fn default() -> Self {
        Self {
            in_flight: Rc::new(RefCell::new(BTreeSet::new())),
        }
    }
}

impl<K: Ord + Clone> SingleFlight<K> {
    /// None when another task already holds the key. The returned guard
    /// releases on drop, covering every exit path including early returns
    /// and awaits that never resume.
    pub fn try_acquire(&self, key: &K) -> Option<FlightGuard<K>> {
        if !self.in_flight.borrow_mut().insert(key.clone()) {
            return None;
        }
        Some(FlightGuard {
            in_flight: Rc::clone(&self.in_flight),
            key: key.clone(),
        })
    }

    pub fn is_held(&self, key: &K) -> bool {
        self.in_flight.borrow().contains(key)
    }
}

pub struct FlightGuard<K: Ord + Clone> {
    in_flight: Rc<RefCell<BTreeSet<K>>>,
    key: K,
}

impl<K: Ord + Clone> Drop for FlightGuard<K> {
    fn drop(&mut self) {
        self.in_flight.borrow_mut().remove(&self.key);
    }
}

thread_local! {
    /// Settlement worker, keyed by external event id.
    pub static SETTLING_EVENTS: SingleFlight<String> = SingleFlight::default();
    /// Shared between the prediction auto-resolver and the manual endpoint.
    pub static RESOLVING_PREDICTIONS: SingleFlight<u64> = SingleFlight::default();
    /// Shared between the challenge auto-refund and manual settle.
    pub static SETTLING_CHALLENGES: SingleFlight<u64> = SingleFlight::default();
    /// Unstake serialization per (wallet, stake).
    pub static UNSTAKING_LOCKS: SingleFlight<(String, u64)> = SingleFlight::default();
    /// Staking reward claims per wallet.
    pub static CLAIMING_REWARDS: SingleFlight<String> = SingleFlight::default();
    /// Upstream refreshes per (endpoint, sport) so concurrent callers share
    /// one in-flight request.
    pub static REFRESHING_EVENTS: SingleFlight<(u8, u32)> = SingleFlight::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let flight: SingleFlight<u64> = SingleFlight::default();
        let guard = flight.try_acquire(&7);
        assert!(guard.is_some());
        assert!(flight.try_acquire(&7).is_none());
        assert!(flight.try_acquire(&8).is_some());
    }

    #[test]
    fn test_release_on_drop() {
        let flight: SingleFlight<String> = SingleFlight::default();
        {
            let _guard = flight.try_acquire(&"ev-1".to_string()).unwrap();
            assert!(flight.is_held(&"ev-1".to_string()));
        }
        assert!(!flight.is_held(&"ev-1".to_string()));
        assert!(flight.try_acquire(&"ev-1".to_string()).is_some());
    }

    #[test]
    fn test_release_on_early_exit() {
        let flight: SingleFlight<u64> = SingleFlight::default();
        let attempt = |flight: &SingleFlight<u64>| -> Result<(), String> {
            let _guard = flight.try_acquire(&1).ok_or("busy")?;
            Err("bailed mid-section".to_string())
        };
        assert!(attempt(&flight).is_err());
        assert!(!flight.is_held(&1));
    }
}
