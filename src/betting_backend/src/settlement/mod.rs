pub mod reconcile;
pub mod settle_bet;
pub mod settle_one;
pub mod worker;
