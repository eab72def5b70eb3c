use std::time::Duration;

use crate::ic::delay::sleep;
use crate::ic::ledger;
use crate::ic::network::ICNetwork;
use crate::single_flight::RESOLVING_PREDICTIONS;
use crate::stable_prediction::prediction_bet_map;
use crate::stable_prediction::prediction_map;
use crate::stable_prediction::stable_prediction::{PredictionSide, PredictionStatus, StablePrediction};
use crate::token::Currency;

/// Gap between successive winner payouts; one admin key signs everything.
const PAYOUT_GAP_SECS: u64 = 3;

/// Timer body: resolve every active prediction whose end date has passed.
pub async fn run_prediction_resolver() {
    let now = ICNetwork::get_time();
    for prediction in prediction_map::get_expired_active(now) {
        match resolve_prediction(prediction.prediction_id, None).await {
            Ok(status) => ICNetwork::info_log(&format!(
                "Prediction #{} auto-resolved: {}",
                prediction.prediction_id, status
            )),
            Err(e) => ICNetwork::error_log(&format!(
                "Prediction #{} auto-resolve failed: {}",
                prediction.prediction_id, e
            )),
        }
    }
}

/// Resolve one prediction. `forced_outcome` is the manual path; None settles
/// to the majority pool with yes winning ties. Shares the single-flight
/// guard with the manual endpoint, so the two can never double-pay.
pub async fn resolve_prediction(prediction_id: u64, forced_outcome: Option<PredictionSide>) -> Result<String, String> {
    let guard = RESOLVING_PREDICTIONS.with(|g| g.try_acquire(&prediction_id));
    let _guard = match guard {
        Some(guard) => guard,
        None => return Err(format!("Prediction #{} is already being resolved", prediction_id)),
    };

    // reload inside the guard
    let prediction =
        prediction_map::get_by_prediction_id(prediction_id).ok_or_else(|| format!("Prediction #{} not found", prediction_id))?;
    if !prediction.status.is_active() {
        return Err(format!("Prediction #{} is no longer active", prediction_id));
    }

    let now = ICNetwork::get_time();
    let yes_total = prediction.total_yes_amount;
    let no_total = prediction.total_no_amount;
    let total_pool = yes_total + no_total;

    if total_pool == 0 {
        prediction_map::finalize(prediction_id, PredictionStatus::Expired, None, now);
        return Ok("expired".to_string());
    }

    let side = forced_outcome.unwrap_or(if yes_total >= no_total { PredictionSide::Yes } else { PredictionSide::No });
    let winners_total = match side {
        PredictionSide::Yes => yes_total,
        PredictionSide::No => no_total,
    };

    // freeze the row before any payout; a lost race means someone else won
    // the terminal transition
    let provisional = PredictionStatus::resolved(side, 0, 0);
    if !prediction_map::finalize(prediction_id, provisional, Some(side), now) {
        return Err(format!("Prediction #{} is no longer active", prediction_id));
    }

    if winners_total == 0 {
        // nobody backed the winning side, nothing to pay
        return Ok(provisional.to_string());
    }

    let (paid, failed) = pay_winning_side(&prediction, side, winners_total, total_pool).await;
    let final_status = PredictionStatus::resolved(side, paid, failed);
    prediction_map::set_terminal_status(prediction_id, final_status);
    Ok(final_status.to_string())
}

/// Fan out pro-rata shares of the pool to every winning bet, serialized with
/// an inter-transaction gap. Returns (paid, failed).
async fn pay_winning_side(
    prediction: &StablePrediction,
    side: PredictionSide,
    winners_total: u64,
    total_pool: u64,
) -> (u32, u32) {
    let winners = prediction_bet_map::get_side_bets(prediction.prediction_id, side);
    let mut paid = 0_u32;
    let mut failed = 0_u32;
    for (i, bet) in winners.iter().enumerate() {
        if i > 0 {
            sleep(Duration::from_secs(PAYOUT_GAP_SECS)).await;
        }
        let share = (bet.amount as f64 / winners_total as f64) * total_pool as f64;
        match ledger::transfer_to_wallet(Currency::SBETS, share, &bet.wallet_address).await {
            Ok(_) => paid += 1,
            Err(e) => {
                failed += 1;
                ICNetwork::error_log(&format!(
                    "Prediction #{} payout of {} SBETS to {} failed: {}",
                    prediction.prediction_id, share, bet.wallet_address, e
                ));
            }
        }
    }
    (paid, failed)
}

#[cfg(test)]
mod tests {
    // payout share math is pure enough to check inline
    #[test]
    fn test_share_math() {
        // 1000 on yes, 400 on no, yes wins: a 250 bet gets (250/1000)*1400
        let winners_total = 1_000_u64;
        let total_pool = 1_400_u64;
        let share = (250.0 / winners_total as f64) * total_pool as f64;
        assert!((share - 350.0).abs() < 1e-9);
    }
}
