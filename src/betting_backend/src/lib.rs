pub mod admin;
pub mod bet_admission;
pub mod canister;
pub mod controllers;
pub mod event_registry;
pub mod helpers;
pub mod ic;
pub mod revenue;
pub mod settlement;
pub mod single_flight;
pub mod social;
pub mod stable_bet;
pub mod stable_challenge;
pub mod stable_deposit;
pub mod stable_limits;
pub mod stable_memory;
pub mod stable_parlay;
pub mod stable_prediction;
pub mod stable_referral;
pub mod stable_revenue;
pub mod stable_settings;
pub mod stable_settled_event;
pub mod stable_stake;
pub mod stable_user;
pub mod staking;
pub mod token;
pub mod user;

pub const APP_NAME: &str = "SuiBets";
pub const APP_VERSION: &str = "v0.1.4";

// Custom getrandom implementation for IC canisters
use getrandom::{register_custom_getrandom, Error};

fn custom_getrandom(buf: &mut [u8]) -> Result<(), Error> {
    // Use IC's time-based entropy as a simple fallback
    // This is not cryptographically secure but sufficient for basic randomness needs
    let time_nanos = ic_cdk::api::time();
    let mut seed_bytes = time_nanos.to_le_bytes();

    for (i, byte) in buf.iter_mut().enumerate() {
        let idx = i % seed_bytes.len();
        *byte = seed_bytes[idx] ^ ((time_nanos >> (i % 64)) as u8);
        seed_bytes[idx] = seed_bytes[idx].wrapping_add(1);
    }

    Ok(())
}

register_custom_getrandom!(custom_getrandom);
