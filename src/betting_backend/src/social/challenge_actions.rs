use std::time::Duration;

use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::ic::delay::sleep;
use crate::ic::ledger;
use crate::ic::network::ICNetwork;
use crate::single_flight::SETTLING_CHALLENGES;
use crate::stable_challenge::challenge_map;
use crate::stable_challenge::participant_map;
use crate::stable_challenge::stable_challenge::{ChallengeStatus, ChallengeWinner, StableChallenge};
use crate::stable_challenge::stable_participant::StableParticipant;
use crate::stable_user::user_map;
use crate::token::Currency;

const PAYOUT_GAP_SECS: u64 = 3;

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct CreateChallengeArgs {
    pub creator_wallet: String,
    pub title: String,
    pub description: String,
    pub stake_amount: u64, // SBETS
    pub max_participants: u32,
    pub expires_at: u64,
}

pub fn create_challenge(args: CreateChallengeArgs) -> Result<u64, String> {
    let now = ICNetwork::get_time();
    if args.stake_amount == 0 {
        return Err("Stake amount must be positive".to_string());
    }
    if args.max_participants == 0 {
        return Err("Challenge needs at least one participant slot".to_string());
    }
    if args.expires_at <= now {
        return Err("Expiry must be in the future".to_string());
    }
    user_map::get_or_create(&args.creator_wallet, now);
    let challenge = StableChallenge {
        challenge_id: 0,
        creator_wallet: args.creator_wallet.to_lowercase(),
        title: args.title,
        description: args.description,
        stake_amount: args.stake_amount,
        max_participants: args.max_participants,
        current_participants: 0,
        expires_at: args.expires_at,
        status: ChallengeStatus::Open,
        winner: None,
        created_at: now,
        settled_at: None,
    };
    Ok(challenge_map::insert(&challenge))
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct JoinChallengeArgs {
    pub challenge_id: u64,
    pub wallet_address: String,
    pub tx_hash: String,
}

/// Join a challenge. Join tx is unique; the row enforces capacity, openness
/// and the creator self-join ban.
pub fn join_challenge(args: JoinChallengeArgs) -> Result<u64, String> {
    let now = ICNetwork::get_time();
    if args.tx_hash.trim().is_empty() {
        return Err("Transaction hash is required".to_string());
    }
    if participant_map::wallet_joined(args.challenge_id, &args.wallet_address) {
        return Err("Already joined this challenge".to_string());
    }
    user_map::get_or_create(&args.wallet_address, now);
    // counter first: it carries the capacity and status checks
    challenge_map::add_participant(args.challenge_id, &args.wallet_address)?;
    let participant = StableParticipant {
        participant_id: 0,
        challenge_id: args.challenge_id,
        wallet_address: args.wallet_address.to_lowercase(),
        tx_hash: args.tx_hash,
        joined_at: now,
    };
    participant_map::insert(&participant)
}

/// Creator-only settlement. The winning side takes the whole pool: the
/// creator alone, or the pool split evenly across participants.
pub async fn settle_challenge(challenge_id: u64, caller_wallet: &str, winner: ChallengeWinner) -> Result<String, String> {
    let guard = SETTLING_CHALLENGES.with(|g| g.try_acquire(&challenge_id));
    let _guard = match guard {
        Some(guard) => guard,
        None => return Err(format!("Challenge #{} is already being settled", challenge_id)),
    };

    let challenge =
        challenge_map::get_by_challenge_id(challenge_id).ok_or_else(|| format!("Challenge #{} not found", challenge_id))?;
    if challenge.creator_wallet != caller_wallet.to_lowercase() {
        return Err("Only the creator can settle a challenge".to_string());
    }
    if !challenge.status.is_open() {
        return Err(format!("Challenge #{} is not open", challenge_id));
    }

    let participants = participant_map::get_by_challenge_id(challenge_id);
    if participants.is_empty() {
        return Err(format!("Challenge #{} has no participants to settle against", challenge_id));
    }

    let now = ICNetwork::get_time();
    if !challenge_map::finalize(challenge_id, ChallengeStatus::Settled, Some(winner), now) {
        return Err(format!("Challenge #{} is not open", challenge_id));
    }

    let pool = challenge.stake_amount as f64 * (1 + participants.len() as u64) as f64;
    let payouts: Vec<(String, f64)> = match winner {
        ChallengeWinner::Creator => vec![(challenge.creator_wallet.clone(), pool)],
        ChallengeWinner::Challengers => {
            let share = pool / participants.len() as f64;
            participants.iter().map(|p| (p.wallet_address.clone(), share)).collect()
        }
    };

    let mut paid = 0_u32;
    let mut failed = 0_u32;
    for (i, (wallet, amount)) in payouts.iter().enumerate() {
        if i > 0 {
            sleep(Duration::from_secs(PAYOUT_GAP_SECS)).await;
        }
        match ledger::transfer_to_wallet(Currency::SBETS, *amount, wallet).await {
            Ok(_) => paid += 1,
            Err(e) => {
                failed += 1;
                ICNetwork::error_log(&format!(
                    "Challenge #{} payout of {} SBETS to {} failed: {}",
                    challenge_id, amount, wallet, e
                ));
            }
        }
    }

    let final_status = ChallengeStatus::settled(paid, failed);
    challenge_map::set_terminal_status(challenge_id, final_status);
    Ok(final_status.to_string())
}

pub fn get_challenges(status: Option<ChallengeStatus>) -> Vec<StableChallenge> {
    challenge_map::get_all(status)
}
