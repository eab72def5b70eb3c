pub mod bet_map;
pub mod stable_bet;
