pub mod referral_map;
pub mod stable_referral;
