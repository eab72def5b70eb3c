use crate::stable_memory::SETTINGS;

use super::stable_settings::StableSettings;

pub fn get() -> StableSettings {
    SETTINGS.with(|s| s.borrow().get().clone())
}

pub fn set(settings: StableSettings) -> Result<(), String> {
    SETTINGS.with(|s| {
        s.borrow_mut()
            .set(settings)
            .map(|_| ())
            .map_err(|e| format!("Failed to save settings: {:?}", e))
    })
}

fn update<F>(f: F) -> u64
where
    F: FnOnce(&mut StableSettings) -> u64,
{
    SETTINGS.with(|s| {
        let mut cell = s.borrow_mut();
        let mut settings = cell.get().clone();
        let idx = f(&mut settings);
        cell.set(settings).expect("Failed to save settings");
        idx
    })
}

pub fn inc_bet_map_idx() -> u64 {
    update(|s| {
        s.bet_map_idx += 1;
        s.bet_map_idx
    })
}

pub fn inc_parlay_map_idx() -> u64 {
    update(|s| {
        s.parlay_map_idx += 1;
        s.parlay_map_idx
    })
}

pub fn inc_prediction_map_idx() -> u64 {
    update(|s| {
        s.prediction_map_idx += 1;
        s.prediction_map_idx
    })
}

pub fn inc_prediction_bet_map_idx() -> u64 {
    update(|s| {
        s.prediction_bet_map_idx += 1;
        s.prediction_bet_map_idx
    })
}

pub fn inc_challenge_map_idx() -> u64 {
    update(|s| {
        s.challenge_map_idx += 1;
        s.challenge_map_idx
    })
}

pub fn inc_participant_map_idx() -> u64 {
    update(|s| {
        s.participant_map_idx += 1;
        s.participant_map_idx
    })
}

pub fn inc_stake_map_idx() -> u64 {
    update(|s| {
        s.stake_map_idx += 1;
        s.stake_map_idx
    })
}

pub fn set_sui_betting_paused(paused: bool) {
    update(|s| {
        s.sui_betting_paused = paused;
        0
    });
}

pub fn set_maintenance_mode(enabled: bool) {
    update(|s| {
        s.maintenance_mode = enabled;
        0
    });
}

pub fn block_wallet(wallet_address: &str) {
    let wallet = wallet_address.to_lowercase();
    update(|s| {
        if !s.blocked_wallets.contains(&wallet) {
            s.blocked_wallets.push(wallet.clone());
        }
        0
    });
}

pub fn unblock_wallet(wallet_address: &str) {
    let wallet = wallet_address.to_lowercase();
    update(|s| {
        s.blocked_wallets.retain(|w| w != &wallet);
        0
    });
}
