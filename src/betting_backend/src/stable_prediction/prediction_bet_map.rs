use crate::stable_memory::PREDICTION_BET_MAP;
use crate::stable_settings::settings_map;

use super::stable_prediction::PredictionSide;
use super::stable_prediction_bet::{StablePredictionBet, StablePredictionBetId};

pub fn get_by_bet_id(bet_id: u64) -> Option<StablePredictionBet> {
    PREDICTION_BET_MAP.with(|m| m.borrow().get(&StablePredictionBetId(bet_id)))
}

/// The tx id is the durable idempotency key; a reused hash is refused here
/// regardless of what the in-memory fast path saw.
pub fn tx_id_exists(tx_id: &str) -> bool {
    PREDICTION_BET_MAP.with(|m| m.borrow().iter().any(|(_, bet)| bet.tx_id == tx_id))
}

pub fn insert(bet: &StablePredictionBet) -> Result<u64, String> {
    if tx_id_exists(&bet.tx_id) {
        return Err(format!("Transaction {} already used", bet.tx_id));
    }
    let bet_id = settings_map::inc_prediction_bet_map_idx();
    let insert_bet = StablePredictionBet {
        bet_id,
        ..bet.clone()
    };
    PREDICTION_BET_MAP.with(|m| m.borrow_mut().insert(StablePredictionBetId(bet_id), insert_bet));
    Ok(bet_id)
}

pub fn get_by_prediction_id(prediction_id: u64) -> Vec<StablePredictionBet> {
    PREDICTION_BET_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, bet)| {
                if bet.prediction_id == prediction_id {
                    Some(bet.clone())
                } else {
                    None
                }
            })
            .collect()
    })
}

pub fn get_side_bets(prediction_id: u64, side: PredictionSide) -> Vec<StablePredictionBet> {
    get_by_prediction_id(prediction_id)
        .into_iter()
        .filter(|bet| bet.side == side)
        .collect()
}
