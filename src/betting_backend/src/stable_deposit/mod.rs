pub mod deposit_map;
pub mod stable_deposit;
