pub mod revenue_claim_map;
pub mod stable_revenue_claim;
