pub mod accrual;
pub mod stake_actions;
pub mod worker;
