//! Configuration for the analog tool
//!
//! Stored as TOML, by default in `<config dir>/wooting-analog/config.toml`.
//! Every field is optional in the file; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wooting_analog_ffi::KeycodeType;

/// Persistent settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalogConfig {
    /// Explicit path to the wrapper library (platform default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_path: Option<PathBuf>,
    /// Keycode mode applied right after initialise
    #[serde(default)]
    pub keycode_mode: KeycodeType,
    /// Capacity of full-buffer reads
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Capacity of device enumeration
    #[serde(default = "default_device_capacity")]
    pub device_capacity: usize,
    /// Poll interval of the watch command in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_buffer_size() -> usize {
    32
}
fn default_device_capacity() -> usize {
    16
}
fn default_poll_interval() -> u64 {
    20
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            keycode_mode: KeycodeType::default(),
            buffer_size: default_buffer_size(),
            device_capacity: default_device_capacity(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl AnalogConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wooting-analog")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: AnalogConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
