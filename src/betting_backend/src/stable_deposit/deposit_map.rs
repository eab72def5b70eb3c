use crate::stable_memory::DEPOSIT_MAP;

use super::stable_deposit::{StableDeposit, StableDepositId};

pub fn tx_hash_exists(tx_hash: &str) -> bool {
    DEPOSIT_MAP.with(|m| m.borrow().contains_key(&StableDepositId(tx_hash.to_string())))
}

/// Insert once per tx hash; false means the deposit was already credited.
pub fn insert_once(deposit: &StableDeposit) -> bool {
    let key = StableDepositId(deposit.tx_hash.clone());
    DEPOSIT_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if map.contains_key(&key) {
            return false;
        }
        map.insert(key, deposit.clone());
        true
    })
}
