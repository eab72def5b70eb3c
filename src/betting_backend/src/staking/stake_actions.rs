use std::time::Duration;

use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::ic::delay::sleep;
use crate::ic::ledger;
use crate::ic::network::ICNetwork;
use crate::single_flight::{CLAIMING_REWARDS, UNSTAKING_LOCKS};
use crate::stable_settings::settings_map;
use crate::stable_stake::stake_map;
use crate::stable_stake::stable_stake::StableStake;
use crate::stable_user::user_map;
use crate::token::Currency;

use super::accrual::target_reward;

const TREASURY_SETTLE_SECS: u64 = 2;

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StakeArgs {
    pub wallet_address: String,
    pub amount: u64, // SBETS
    pub tx_hash: String,
}

pub fn stake(args: StakeArgs) -> Result<u64, String> {
    let now = ICNetwork::get_time();
    let settings = settings_map::get();
    if args.amount < settings.min_stake_sbets {
        return Err(format!("Minimum stake is {} SBETS", settings.min_stake_sbets));
    }
    if args.tx_hash.trim().is_empty() {
        return Err("Transaction hash is required".to_string());
    }
    user_map::get_or_create(&args.wallet_address, now);
    let stake = StableStake {
        stake_id: 0,
        wallet_address: args.wallet_address.to_lowercase(),
        amount: args.amount,
        staked_at: now,
        locked_until: now + settings.staking_lock_ns,
        active: true,
        unstaking_at: None,
        accumulated_reward: 0,
        tx_hash: args.tx_hash,
    };
    // tx uniqueness is enforced by the insert
    stake_map::insert(&stake)
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StakeInfo {
    pub stake_id: u64,
    pub amount: u64,
    pub staked_at: u64,
    pub locked_until: u64,
    pub active: bool,
    pub current_reward: u64,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StakingInfoReply {
    pub wallet_address: String,
    pub total_staked: u64,
    pub total_rewards: u64,
    pub stakes: Vec<StakeInfo>,
}

pub fn get_staking_info(wallet_address: &str) -> StakingInfoReply {
    let now = ICNetwork::get_time();
    let apy = settings_map::get().staking_apy;
    let stakes: Vec<StakeInfo> = stake_map::get_by_wallet(wallet_address)
        .into_iter()
        .map(|stake| {
            let current_reward = if stake.active {
                target_reward(stake.amount, stake.staked_at, now, apy)
            } else {
                stake.accumulated_reward
            };
            StakeInfo {
                stake_id: stake.stake_id,
                amount: stake.amount,
                staked_at: stake.staked_at,
                locked_until: stake.locked_until,
                active: stake.active,
                current_reward,
            }
        })
        .collect();
    StakingInfoReply {
        wallet_address: wallet_address.to_lowercase(),
        total_staked: stakes.iter().filter(|s| s.active).map(|s| s.amount).sum(),
        total_rewards: stakes.iter().filter(|s| s.active).map(|s| s.current_reward).sum(),
        stakes,
    }
}

/// Two-step treasury payout: withdraw into the sending account, wait for the
/// ledger to settle, then send to the user. On any failed step the amount is
/// credited to the platform balance instead so nothing is lost.
async fn treasury_payout(wallet_address: &str, amount: u64) -> Result<Option<String>, String> {
    let amount_tokens = amount as f64;
    let result = async {
        ledger::withdraw_from_treasury(Currency::SBETS, amount_tokens).await?;
        sleep(Duration::from_secs(TREASURY_SETTLE_SECS)).await;
        ledger::transfer_to_wallet(Currency::SBETS, amount_tokens, wallet_address).await
    }
    .await;

    match result {
        Ok(block_id) => Ok(Some(block_id.to_string())),
        Err(e) => {
            ICNetwork::error_log(&format!(
                "Treasury payout of {} SBETS to {} failed, crediting platform balance: {}",
                amount, wallet_address, e
            ));
            user_map::get_or_create(wallet_address, ICNetwork::get_time());
            user_map::add_platform_balance(wallet_address, Currency::SBETS, amount_tokens)?;
            Ok(None)
        }
    }
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct UnstakeReply {
    pub stake_id: u64,
    pub principal_returned: u64,
    pub reward: u64,
    pub tx_hash: Option<String>, // None when paid into the platform balance
}

pub async fn unstake(wallet_address: &str, stake_id: u64) -> Result<UnstakeReply, String> {
    let wallet = wallet_address.to_lowercase();
    let key = (wallet.clone(), stake_id);
    let guard = UNSTAKING_LOCKS.with(|g| g.try_acquire(&key));
    let _guard = match guard {
        Some(guard) => guard,
        None => return Err(format!("Stake #{} is already being unstaked", stake_id)),
    };

    let now = ICNetwork::get_time();
    let settings = settings_map::get();
    let stake = stake_map::get_by_stake_id(stake_id).ok_or_else(|| format!("Stake #{} not found", stake_id))?;
    if stake.wallet_address != wallet {
        return Err(format!("Stake #{} does not belong to {}", stake_id, wallet));
    }
    if now < stake.locked_until {
        return Err(format!("Stake #{} is locked until {}", stake_id, stake.locked_until));
    }

    let reward = target_reward(stake.amount, stake.staked_at, now, settings.staking_apy);
    // conditional deactivation; a raced second call sees active=false
    let stake = match stake_map::deactivate(stake_id, reward, now) {
        Some(stake) => stake,
        None => return Err(format!("Stake #{} is already unstaked", stake_id)),
    };

    let total = stake.amount + reward;
    let tx_hash = treasury_payout(&wallet, total).await?;
    Ok(UnstakeReply {
        stake_id,
        principal_returned: stake.amount,
        reward,
        tx_hash,
    })
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRewardsReply {
    pub total_claimed: u64,
    pub stakes_claimed: u32,
    pub tx_hash: Option<String>,
}

/// Claim accrued rewards without unstaking. Each active stake resets its
/// accrual clock atomically; the summed rewards ride one treasury payout.
pub async fn claim_rewards(wallet_address: &str) -> Result<ClaimRewardsReply, String> {
    let wallet = wallet_address.to_lowercase();
    let guard = CLAIMING_REWARDS.with(|g| g.try_acquire(&wallet));
    let _guard = match guard {
        Some(guard) => guard,
        None => return Err("A rewards claim is already in progress".to_string()),
    };

    let now = ICNetwork::get_time();
    let apy = settings_map::get().staking_apy;
    let mut total = 0_u64;
    let mut stakes_claimed = 0_u32;
    for stake in stake_map::get_by_wallet(&wallet) {
        if !stake.active {
            continue;
        }
        let reward = target_reward(stake.amount, stake.staked_at, now, apy);
        if reward == 0 {
            continue;
        }
        if let Some(claimed) = stake_map::reset_reward(stake.stake_id, reward, now) {
            total += claimed;
            stakes_claimed += 1;
        }
    }
    if total == 0 {
        return Err("No rewards to claim".to_string());
    }

    let tx_hash = treasury_payout(&wallet, total).await?;
    Ok(ClaimRewardsReply {
        total_claimed: total,
        stakes_claimed,
        tx_hash,
    })
}
