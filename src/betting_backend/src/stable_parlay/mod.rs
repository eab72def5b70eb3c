pub mod parlay_map;
pub mod stable_parlay;
