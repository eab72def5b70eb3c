use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::admin::session;
use crate::event_registry::registry;
use crate::helpers::time_helpers::nanos_to_millis;
use crate::ic::network::ICNetwork;
use crate::stable_memory::{BET_MAP, CHALLENGE_MAP, PREDICTION_MAP, SETTLED_EVENT_MAP, STAKE_MAP, USER_MAP};
use crate::{APP_NAME, APP_VERSION};

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct StatusReply {
    pub app_name: String,
    pub app_version: String,
    pub users: u64,
    pub bets: u64,
    pub settled_events: u64,
    pub predictions: u64,
    pub challenges: u64,
    pub stakes: u64,
    pub live_snapshot_age_ms: u64,
    pub upcoming_snapshot_age_ms: u64,
    pub active_admin_sessions: u64,
}

/// Operational snapshot for diagnostics.
pub fn get_status() -> StatusReply {
    let now = ICNetwork::get_time();
    let live = registry::get_live_snapshot();
    let upcoming = registry::get_upcoming_snapshot();
    StatusReply {
        app_name: APP_NAME.to_string(),
        app_version: APP_VERSION.to_string(),
        users: USER_MAP.with(|m| m.borrow().len()),
        bets: BET_MAP.with(|m| m.borrow().len()),
        settled_events: SETTLED_EVENT_MAP.with(|m| m.borrow().len()),
        predictions: PREDICTION_MAP.with(|m| m.borrow().len()),
        challenges: CHALLENGE_MAP.with(|m| m.borrow().len()),
        stakes: STAKE_MAP.with(|m| m.borrow().len()),
        live_snapshot_age_ms: nanos_to_millis(now.saturating_sub(live.timestamp)),
        upcoming_snapshot_age_ms: nanos_to_millis(now.saturating_sub(upcoming.timestamp)),
        active_admin_sessions: session::active_session_count() as u64,
    }
}
