use crate::admin::session;
use crate::ic::network::ICNetwork;
use crate::stable_settings::settings_map;
use crate::stable_settings::stable_settings::StableSettings;

pub fn get_settings(auth: &str) -> Result<StableSettings, String> {
    session::verify(auth)?;
    let mut settings = settings_map::get();
    // never hand the password back out
    settings.admin_password = String::new();
    Ok(settings)
}

/// Whole-struct settings replacement. The password survives unless the
/// update explicitly sets a new one.
pub fn update_settings(auth: &str, mut settings: StableSettings) -> Result<(), String> {
    session::verify(auth)?;
    if settings.admin_password.is_empty() {
        settings.admin_password = settings_map::get().admin_password;
    }
    settings_map::set(settings)?;
    ICNetwork::info_log("Settings updated");
    Ok(())
}

pub fn set_sui_betting_paused(auth: &str, paused: bool) -> Result<(), String> {
    session::verify(auth)?;
    settings_map::set_sui_betting_paused(paused);
    ICNetwork::info_log(&format!("SUI betting paused = {}", paused));
    Ok(())
}

pub fn set_maintenance_mode(auth: &str, enabled: bool) -> Result<(), String> {
    session::verify(auth)?;
    settings_map::set_maintenance_mode(enabled);
    ICNetwork::info_log(&format!("Maintenance mode = {}", enabled));
    Ok(())
}

pub fn block_wallet(auth: &str, wallet_address: &str) -> Result<(), String> {
    session::verify(auth)?;
    settings_map::block_wallet(wallet_address);
    ICNetwork::info_log(&format!("Wallet {} blocked", wallet_address));
    Ok(())
}

pub fn unblock_wallet(auth: &str, wallet_address: &str) -> Result<(), String> {
    session::verify(auth)?;
    settings_map::unblock_wallet(wallet_address);
    ICNetwork::info_log(&format!("Wallet {} unblocked", wallet_address));
    Ok(())
}
