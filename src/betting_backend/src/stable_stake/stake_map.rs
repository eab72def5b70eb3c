use crate::stable_memory::STAKE_MAP;
use crate::stable_settings::settings_map;

use super::stable_stake::{StableStake, StableStakeId};

pub fn get_by_stake_id(stake_id: u64) -> Option<StableStake> {
    STAKE_MAP.with(|m| m.borrow().get(&StableStakeId(stake_id)))
}

pub fn tx_hash_exists(tx_hash: &str) -> bool {
    STAKE_MAP.with(|m| m.borrow().iter().any(|(_, stake)| stake.tx_hash == tx_hash))
}

pub fn insert(stake: &StableStake) -> Result<u64, String> {
    if tx_hash_exists(&stake.tx_hash) {
        return Err(format!("Transaction {} already used", stake.tx_hash));
    }
    let stake_id = settings_map::inc_stake_map_idx();
    let insert_stake = StableStake {
        stake_id,
        ..stake.clone()
    };
    STAKE_MAP.with(|m| m.borrow_mut().insert(StableStakeId(stake_id), insert_stake));
    Ok(stake_id)
}

pub fn get_by_wallet(wallet_address: &str) -> Vec<StableStake> {
    let wallet = wallet_address.to_lowercase();
    STAKE_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, stake)| {
                if stake.wallet_address == wallet {
                    Some(stake.clone())
                } else {
                    None
                }
            })
            .collect()
    })
}

pub fn get_active() -> Vec<StableStake> {
    STAKE_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, stake)| if stake.active { Some(stake.clone()) } else { None })
            .collect()
    })
}

/// Advance the cached accrual snapshot. The snapshot is monotone; a smaller
/// target is a no-op.
pub fn advance_accumulated(stake_id: u64, target: u64) {
    let key = StableStakeId(stake_id);
    STAKE_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if let Some(mut stake) = map.get(&key) {
            if stake.active && target > stake.accumulated_reward {
                stake.accumulated_reward = target;
                map.insert(key, stake);
            }
        }
    });
}

/// Conditional deactivation: only an active stake flips, and only once.
/// Returns the deactivated row so the caller pays out from a consistent
/// snapshot.
pub fn deactivate(stake_id: u64, final_reward: u64, ts: u64) -> Option<StableStake> {
    let key = StableStakeId(stake_id);
    STAKE_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut stake) => {
                if !stake.active {
                    return None;
                }
                stake.active = false;
                stake.unstaking_at = Some(ts);
                stake.accumulated_reward = final_reward;
                map.insert(key, stake.clone());
                Some(stake)
            }
            None => None,
        }
    })
}

/// Claim-only reset: zero the reward and restart accrual from `ts`, only if
/// still active. Returns the reward amount drained.
pub fn reset_reward(stake_id: u64, reward: u64, ts: u64) -> Option<u64> {
    let key = StableStakeId(stake_id);
    STAKE_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut stake) => {
                if !stake.active {
                    return None;
                }
                stake.accumulated_reward = 0;
                stake.staked_at = ts;
                map.insert(key, stake);
                Some(reward)
            }
            None => None,
        }
    })
}
