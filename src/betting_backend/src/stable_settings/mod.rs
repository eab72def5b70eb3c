pub mod settings_map;
pub mod stable_settings;
