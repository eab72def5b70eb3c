pub mod prediction_bet_map;
pub mod prediction_map;
pub mod stable_prediction;
pub mod stable_prediction_bet;
