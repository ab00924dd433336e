// lib/src/config/mod.rs

pub mod config_defaults;
pub mod config_structs;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info};

pub use config_defaults::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
pub use config_structs::{DemoConfig, HospitalConfig, HospitalSection, LoggingConfig};

impl HospitalConfig {
    /// Parses a TOML document. Missing keys fall back to their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: HospitalConfig =
            toml::from_str(content).context("Failed to parse hospital configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hospital.name.trim().is_empty() {
            bail!("[hospital] name must not be blank");
        }
        if self.demo.first_day_offset < 1 {
            bail!(
                "[demo] first_day_offset must be at least 1, got {}",
                self.demo.first_day_offset
            );
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize hospital configuration to TOML")
    }
}

/// Loads the configuration from `path`, or returns the defaults when no
/// path is given. An explicitly named file that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<HospitalConfig> {
    let Some(path) = path else {
        debug!("No configuration file given, using defaults");
        return Ok(HospitalConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let config = HospitalConfig::from_toml_str(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}
