use crate::ic::network::ICNetwork;
use crate::stable_settings::settings_map;

pub fn not_in_maintenance_mode() -> Result<(), String> {
    if settings_map::get().maintenance_mode {
        return Err("Canister is in maintenance mode".to_string());
    }
    Ok(())
}

pub fn caller_is_controller() -> Result<(), String> {
    if ICNetwork::is_caller_controller() {
        return Ok(());
    }
    Err("Caller is not a controller".to_string())
}
