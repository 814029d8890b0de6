//! Meter configuration
//!
//! The shared [`MeterConfig`] type lives in relink-act-types; this module adds
//! persistence through confy.

use std::path::PathBuf;

pub use relink_act_types::MeterConfig;

use super::error::ConfigError;

const APP_NAME: &str = "relink-act";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// MeterConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for MeterConfig persistence
pub trait MeterConfigExt: Sized {
    /// Load the stored configuration, falling back to defaults on any error.
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Option<PathBuf>;
}

impl MeterConfigExt for MeterConfig {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)?;
        tracing::info!(path = ?Self::config_path(), "configuration saved");
        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
    }
}
