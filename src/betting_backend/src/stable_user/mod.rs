pub mod stable_user;
pub mod user_map;
