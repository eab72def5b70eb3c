use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::helpers::time_helpers::NANOS_PER_HOUR;
use crate::ic::network::ICNetwork;
use crate::stable_settings::settings_map;

const SESSION_TTL_NS: u64 = NANOS_PER_HOUR;

thread_local! {
    // token -> expires_at; process-local, resets on upgrade
    static SESSIONS: Rc<RefCell<HashMap<String, u64>>> = Rc::new(RefCell::default());
}

/// Password login. Returns a bearer token valid for an hour. An unset
/// password rejects every login rather than falling back to a default.
pub fn login(password: &str) -> Result<String, String> {
    let settings = settings_map::get();
    if settings.admin_password.is_empty() {
        return Err("Admin password is not configured".to_string());
    }
    if password != settings.admin_password {
        return Err("Invalid password".to_string());
    }

    let mut rng = StdRng::from_entropy();
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    let token: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();

    let expires_at = ICNetwork::get_time() + SESSION_TTL_NS;
    SESSIONS.with(|s| s.borrow_mut().insert(token.clone(), expires_at));
    Ok(token)
}

/// Privileged endpoints accept a live session token or the password itself
/// (for machine callers).
pub fn verify(auth: &str) -> Result<(), String> {
    let now = ICNetwork::get_time();
    let token_ok = SESSIONS.with(|s| matches!(s.borrow().get(auth), Some(expires_at) if *expires_at > now));
    if token_ok {
        return Ok(());
    }
    let settings = settings_map::get();
    if !settings.admin_password.is_empty() && auth == settings.admin_password {
        return Ok(());
    }
    Err("Unauthorized".to_string())
}

/// Timer body: drop expired sessions.
pub fn sweep_expired() {
    let now = ICNetwork::get_time();
    SESSIONS.with(|s| s.borrow_mut().retain(|_, expires_at| *expires_at > now));
}

pub fn active_session_count() -> usize {
    SESSIONS.with(|s| s.borrow().len())
}
