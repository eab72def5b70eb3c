use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::ic::network::ICNetwork;
use crate::stable_prediction::prediction_bet_map;
use crate::stable_prediction::prediction_map;
use crate::stable_prediction::stable_prediction::{PredictionSide, PredictionStatus, StablePrediction};
use crate::stable_prediction::stable_prediction_bet::StablePredictionBet;
use crate::stable_user::user_map;

use super::prediction_resolver::resolve_prediction;

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct CreatePredictionArgs {
    pub creator_wallet: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub end_date: u64,
}

pub fn create_prediction(args: CreatePredictionArgs) -> Result<u64, String> {
    let now = ICNetwork::get_time();
    if args.title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if args.end_date <= now {
        return Err("End date must be in the future".to_string());
    }
    user_map::get_or_create(&args.creator_wallet, now);
    let prediction = StablePrediction {
        prediction_id: 0,
        creator_wallet: args.creator_wallet.to_lowercase(),
        title: args.title,
        description: args.description,
        category: args.category,
        end_date: args.end_date,
        total_yes_amount: 0,
        total_no_amount: 0,
        participant_count: 0,
        status: PredictionStatus::Active,
        resolved_outcome: None,
        resolved_at: None,
        created_at: now,
    };
    Ok(prediction_map::insert(&prediction))
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct PredictionBetArgs {
    pub prediction_id: u64,
    pub wallet_address: String,
    pub side: PredictionSide,
    pub amount: u64, // SBETS
    pub tx_id: String,
}

/// Join a prediction pool. The tx id is the idempotency key: a replayed
/// transaction is refused before any total moves.
pub fn place_prediction_bet(args: PredictionBetArgs) -> Result<u64, String> {
    let now = ICNetwork::get_time();
    if args.amount == 0 {
        return Err("Amount must be positive".to_string());
    }
    if args.tx_id.trim().is_empty() {
        return Err("Transaction id is required".to_string());
    }
    let prediction = prediction_map::get_by_prediction_id(args.prediction_id)
        .ok_or_else(|| format!("Prediction #{} not found", args.prediction_id))?;
    if !prediction.status.is_active() {
        return Err(format!("Prediction #{} is no longer active", args.prediction_id));
    }
    if prediction.end_date <= now {
        return Err(format!("Prediction #{} has ended", args.prediction_id));
    }

    user_map::get_or_create(&args.wallet_address, now);
    let bet = StablePredictionBet {
        bet_id: 0,
        prediction_id: args.prediction_id,
        wallet_address: args.wallet_address.to_lowercase(),
        side: args.side,
        amount: args.amount,
        tx_id: args.tx_id,
        created_at: now,
    };
    // the unique tx check lives in the insert; totals only move after it
    let bet_id = prediction_bet_map::insert(&bet)?;
    prediction_map::add_bet_amount(args.prediction_id, args.side, args.amount)?;
    Ok(bet_id)
}

/// Manual resolution. Only the creator may force an outcome; payouts go
/// through the same guarded fan-out as the auto-resolver.
pub async fn resolve_prediction_manual(
    prediction_id: u64,
    caller_wallet: &str,
    outcome: PredictionSide,
) -> Result<String, String> {
    let prediction =
        prediction_map::get_by_prediction_id(prediction_id).ok_or_else(|| format!("Prediction #{} not found", prediction_id))?;
    if prediction.creator_wallet != caller_wallet.to_lowercase() {
        return Err("Only the creator can resolve a prediction".to_string());
    }
    resolve_prediction(prediction_id, Some(outcome)).await
}

pub fn get_predictions(status: Option<PredictionStatus>) -> Vec<StablePrediction> {
    prediction_map::get_all(status)
}
