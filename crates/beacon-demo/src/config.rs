//! Demo configuration.
//!
//! Configuration can be loaded from:
//! - Environment variables (BEACON_*)
//! - TOML configuration file

use anyhow::{Context, Result};
use beacon_core::ObservableConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// State the observable starts with.
    #[serde(default = "default_initial_state")]
    pub initial_state: i64,

    /// Number of emit rounds to run.
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Observable settings.
    #[serde(default)]
    pub observable: ObservableConfig,
}

fn default_initial_state() -> i64 {
    std::env::var("BEACON_INITIAL_STATE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn default_rounds() -> u32 {
    std::env::var("BEACON_ROUNDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_state: default_initial_state(),
            rounds: default_rounds(),
            observable: ObservableConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the first existing default path, or defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_paths = [
            "beacon.toml",
            "/etc/beacon/beacon.toml",
            "~/.config/beacon/beacon.toml",
        ];

        for path in &config_paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::from_file(expanded.as_ref());
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}
