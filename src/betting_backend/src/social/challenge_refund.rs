use std::time::Duration;

use crate::ic::delay::sleep;
use crate::ic::ledger;
use crate::ic::network::ICNetwork;
use crate::single_flight::SETTLING_CHALLENGES;
use crate::stable_challenge::challenge_map;
use crate::stable_challenge::participant_map;
use crate::stable_challenge::stable_challenge::ChallengeStatus;
use crate::token::Currency;

const PAYOUT_GAP_SECS: u64 = 3;

/// Timer body: refund every open challenge past its expiry.
pub async fn run_challenge_refunder() {
    let now = ICNetwork::get_time();
    for challenge in challenge_map::get_expired_open(now) {
        match refund_challenge(challenge.challenge_id).await {
            Ok(status) => ICNetwork::info_log(&format!(
                "Challenge #{} auto-refunded: {}",
                challenge.challenge_id, status
            )),
            Err(e) => ICNetwork::error_log(&format!(
                "Challenge #{} auto-refund failed: {}",
                challenge.challenge_id, e
            )),
        }
    }
}

/// Refund the creator and every participant their stake. Guarded against
/// the manual settle endpoint; the terminal transition happens before any
/// transfer goes out.
pub async fn refund_challenge(challenge_id: u64) -> Result<String, String> {
    let guard = SETTLING_CHALLENGES.with(|g| g.try_acquire(&challenge_id));
    let _guard = match guard {
        Some(guard) => guard,
        None => return Err(format!("Challenge #{} is already being settled", challenge_id)),
    };

    let challenge =
        challenge_map::get_by_challenge_id(challenge_id).ok_or_else(|| format!("Challenge #{} not found", challenge_id))?;
    if !challenge.status.is_open() {
        return Err(format!("Challenge #{} is not open", challenge_id));
    }

    let now = ICNetwork::get_time();
    if !challenge_map::finalize(challenge_id, ChallengeStatus::ExpiredRefunded, None, now) {
        return Err(format!("Challenge #{} is not open", challenge_id));
    }

    let mut recipients = vec![challenge.creator_wallet.clone()];
    recipients.extend(
        participant_map::get_by_challenge_id(challenge_id)
            .into_iter()
            .map(|p| p.wallet_address),
    );

    let mut paid = 0_u32;
    let mut failed = 0_u32;
    for (i, wallet) in recipients.iter().enumerate() {
        if i > 0 {
            sleep(Duration::from_secs(PAYOUT_GAP_SECS)).await;
        }
        match ledger::transfer_to_wallet(Currency::SBETS, challenge.stake_amount as f64, wallet).await {
            Ok(_) => paid += 1,
            Err(e) => {
                failed += 1;
                ICNetwork::error_log(&format!(
                    "Challenge #{} refund of {} SBETS to {} failed: {}",
                    challenge_id, challenge.stake_amount, wallet, e
                ));
            }
        }
    }

    let final_status = ChallengeStatus::refunded(paid, failed);
    challenge_map::set_terminal_status(challenge_id, final_status);
    Ok(final_status.to_string())
}
