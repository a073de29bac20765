//! Observable configuration.
//!
//! ```toml
//! removal = "first"
//! diagnostics = "tracing"
//! ```

use crate::error::ConfigError;
use crate::sink::DiagnosticsTarget;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How many identical entries a removal takes out of the observer sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Remove every entry identical to the observer.
    #[default]
    All,
    /// Remove only the earliest identical entry.
    First,
}

/// Observable configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservableConfig {
    /// Policy used by `remove` and `removal`.
    pub removal: RemovalPolicy,

    /// Sink used for observers without callbacks.
    pub diagnostics: DiagnosticsTarget,
}

impl ObservableConfig {
    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid configuration.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Set the removal policy.
    #[must_use]
    pub fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    /// Set the diagnostics target.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsTarget) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}
