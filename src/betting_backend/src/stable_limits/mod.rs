pub mod stable_user_limits;
pub mod user_limits_map;
