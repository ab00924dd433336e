// lib/src/config/config_defaults.rs

pub const DEFAULT_CONFIG_FILE: &str = "hospital.toml";
pub const CONFIG_ENV_VAR: &str = "HOSPITAL_CONFIG";

pub fn default_hospital_name() -> String {
    "Hospital Central".to_string()
}

pub fn default_hospital_address() -> String {
    "Av. Libertador 1234".to_string()
}

pub fn default_hospital_phone() -> String {
    "011-4567-8901".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

/// Days between now and the first demo booking.
pub fn default_first_day_offset() -> i64 {
    1
}
