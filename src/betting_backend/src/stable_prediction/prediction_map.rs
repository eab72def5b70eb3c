use crate::stable_memory::PREDICTION_MAP;
use crate::stable_settings::settings_map;

use super::stable_prediction::{PredictionSide, PredictionStatus, StablePrediction, StablePredictionId};

pub fn get_by_prediction_id(prediction_id: u64) -> Option<StablePrediction> {
    PREDICTION_MAP.with(|m| m.borrow().get(&StablePredictionId(prediction_id)))
}

pub fn insert(prediction: &StablePrediction) -> u64 {
    let prediction_id = settings_map::inc_prediction_map_idx();
    let insert_prediction = StablePrediction {
        prediction_id,
        ..prediction.clone()
    };
    PREDICTION_MAP.with(|m| m.borrow_mut().insert(StablePredictionId(prediction_id), insert_prediction));
    prediction_id
}

pub fn get_all(status: Option<PredictionStatus>) -> Vec<StablePrediction> {
    PREDICTION_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, prediction)| match status {
                Some(s) if prediction.status != s => None,
                _ => Some(prediction.clone()),
            })
            .collect()
    })
}

/// Active predictions whose end date has passed, for the auto-resolver.
pub fn get_expired_active(now: u64) -> Vec<StablePrediction> {
    PREDICTION_MAP.with(|m| {
        m.borrow()
            .iter()
            .filter_map(|(_, prediction)| {
                if prediction.status.is_active() && prediction.end_date <= now {
                    Some(prediction.clone())
                } else {
                    None
                }
            })
            .collect()
    })
}

/// Grow the pool. Refused once the prediction has left `Active`, which keeps
/// the totals frozen after the terminal transition.
pub fn add_bet_amount(prediction_id: u64, side: PredictionSide, amount: u64) -> Result<(), String> {
    let key = StablePredictionId(prediction_id);
    PREDICTION_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut prediction) => {
                if !prediction.status.is_active() {
                    return Err(format!("Prediction #{} is no longer active", prediction_id));
                }
                match side {
                    PredictionSide::Yes => prediction.total_yes_amount += amount,
                    PredictionSide::No => prediction.total_no_amount += amount,
                }
                prediction.participant_count += 1;
                map.insert(key, prediction);
                Ok(())
            }
            None => Err(format!("Prediction #{} not found", prediction_id)),
        }
    })
}

/// Terminal transition out of `Active`. Returns false when the row already
/// left `Active`, so resolver and manual endpoint cannot both pay out.
pub fn finalize(prediction_id: u64, status: PredictionStatus, outcome: Option<PredictionSide>, ts: u64) -> bool {
    let key = StablePredictionId(prediction_id);
    PREDICTION_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut prediction) => {
                if !prediction.status.is_active() {
                    return false;
                }
                prediction.status = status;
                prediction.resolved_outcome = outcome;
                prediction.resolved_at = Some(ts);
                map.insert(key, prediction);
                true
            }
            None => false,
        }
    })
}

/// Rewrite the terminal status after the payout fan-out finished, without
/// reopening the row.
pub fn set_terminal_status(prediction_id: u64, status: PredictionStatus) {
    let key = StablePredictionId(prediction_id);
    PREDICTION_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if let Some(mut prediction) = map.get(&key) {
            if !prediction.status.is_active() {
                prediction.status = status;
                map.insert(key, prediction);
            }
        }
    });
}
