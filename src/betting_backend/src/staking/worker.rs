use crate::ic::network::ICNetwork;
use crate::stable_settings::settings_map;
use crate::stable_stake::stake_map;

use super::accrual::target_reward;

/// Hourly compounder: advance each active stake's cached reward to the
/// current target. Only writes rows whose floored reward actually moved.
pub fn run_staking_accrual() {
    let now = ICNetwork::get_time();
    let apy = settings_map::get().staking_apy;
    let mut advanced = 0_u32;
    for stake in stake_map::get_active() {
        let target = target_reward(stake.amount, stake.staked_at, now, apy);
        if target > stake.accumulated_reward {
            stake_map::advance_accumulated(stake.stake_id, target);
            advanced += 1;
        }
    }
    if advanced > 0 {
        ICNetwork::info_log(&format!("Staking accrual advanced {} stakes", advanced));
    }
}
