// lib/src/config/config_structs.rs
use serde::{Deserialize, Serialize};

use crate::config::config_defaults::*;

/// Top-level configuration file. Every section and field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HospitalConfig {
    #[serde(default)]
    pub hospital: HospitalSection,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Identity of the hospital the demo seeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalSection {
    #[serde(default = "default_hospital_name")]
    pub name: String,
    #[serde(default = "default_hospital_address")]
    pub address: String,
    #[serde(default = "default_hospital_phone")]
    pub phone: String,
}

impl Default for HospitalSection {
    fn default() -> Self {
        HospitalSection {
            name: default_hospital_name(),
            address: default_hospital_address(),
            phone: default_hospital_phone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `env_logger` filter such as `info` or `hospital_core=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_first_day_offset")]
    pub first_day_offset: i64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            first_day_offset: default_first_day_offset(),
        }
    }
}
