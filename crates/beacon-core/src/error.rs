//! Error types for Beacon.

use crate::observer::ObserverId;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The error type raised by observer callbacks and cleanup actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One or more cleanup actions failed during [`Observable::unsubscribe`].
///
/// Every supplied action has already run by the time this error is
/// returned. The captured errors are kept in the order the failing actions
/// ran.
///
/// [`Observable::unsubscribe`]: crate::Observable::unsubscribe
#[derive(Debug, Error)]
#[error("{}", render_aggregate(.errors))]
pub struct UnsubscriptionError {
    errors: Vec<BoxError>,
}

impl UnsubscriptionError {
    pub(crate) fn new(errors: Vec<BoxError>) -> Self {
        Self { errors }
    }

    /// The captured errors, in the order they were raised.
    #[must_use]
    pub fn errors(&self) -> &[BoxError] {
        &self.errors
    }

    /// Number of failed cleanup actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`; an aggregate is only built from at least one failure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the aggregate and return the underlying errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<BoxError> {
        self.errors
    }
}

fn render_aggregate(errors: &[BoxError]) -> String {
    let mut out = format!("{} errors occurred during unsubscription:", errors.len());
    for (i, err) in errors.iter().enumerate() {
        out.push_str(&format!("\n{}) {}", i + 1, err));
    }
    out
}

/// Emit errors.
#[derive(Debug, Error)]
pub enum EmitError {
    /// An observer's error handler failed while handling an emit failure.
    ///
    /// Observers after `index` in the snapshot were not notified.
    #[error("Error handler of observer {observer} (position {index}) failed: {source}")]
    Handler {
        /// Position of the observer in the emit snapshot.
        index: usize,
        /// Identity of the failing observer.
        observer: ObserverId,
        /// The error raised by the handler.
        #[source]
        source: BoxError,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A plain message error, handy for callbacks that fail with text only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure(pub String);

impl Failure {
    /// Create a new failure with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Failure {}
