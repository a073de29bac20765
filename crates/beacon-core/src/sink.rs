//! Diagnostic sinks.
//!
//! Observers that omit a callback fall back to the sink of the observable
//! delivering to them. Each observable owns exactly one sink.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Receives the output of default observer callbacks.
///
/// Implementations must not fail: a default handler always succeeds.
pub trait DiagnosticSink<T>: Send + Sync {
    /// Called when an observer without an emit callback receives a value.
    fn emitted(&self, value: &T);

    /// Called when an observer without an error callback sees a failure.
    fn error(&self, error: &(dyn Error + Send + Sync + 'static));
}

/// Writes values to stdout and errors to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl<T: Debug> DiagnosticSink<T> for ConsoleSink {
    fn emitted(&self, value: &T) {
        println!("Value: {value:?}");
    }

    fn error(&self, error: &(dyn Error + Send + Sync + 'static)) {
        eprintln!("Error {error}");
    }
}

/// Reports through `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl<T: Debug> DiagnosticSink<T> for TracingSink {
    fn emitted(&self, value: &T) {
        info!(value = ?value, "Observer received value");
    }

    fn error(&self, error: &(dyn Error + Send + Sync + 'static)) {
        warn!(error = %error, "Observer reported error");
    }
}

/// Discards all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl<T> DiagnosticSink<T> for SilentSink {
    fn emitted(&self, _value: &T) {}

    fn error(&self, _error: &(dyn Error + Send + Sync + 'static)) {}
}

/// Records diagnostics in memory.
///
/// Lines use the same format as [`ConsoleSink`]. Clones share the buffer, so
/// a test can keep one clone and hand the other to an observable.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

impl<T: Debug> DiagnosticSink<T> for MemorySink {
    fn emitted(&self, value: &T) {
        self.push(format!("Value: {value:?}"));
    }

    fn error(&self, error: &(dyn Error + Send + Sync + 'static)) {
        self.push(format!("Error {error}"));
    }
}

/// Selects the built-in sink an observable is created with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsTarget {
    /// [`ConsoleSink`].
    #[default]
    Console,
    /// [`TracingSink`].
    Tracing,
    /// [`SilentSink`].
    Silent,
}

impl DiagnosticsTarget {
    /// Construct the sink for this target.
    #[must_use]
    pub fn sink<T: Debug + 'static>(self) -> Arc<dyn DiagnosticSink<T>> {
        match self {
            Self::Console => Arc::new(ConsoleSink),
            Self::Tracing => Arc::new(TracingSink),
            Self::Silent => Arc::new(SilentSink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Failure;

    #[test]
    fn test_memory_sink_records_lines() {
        let sink = MemorySink::new();
        let shared = sink.clone();

        DiagnosticSink::<&str>::emitted(&sink, &"hello");
        DiagnosticSink::<&str>::error(&sink, &Failure::new("oops"));

        assert_eq!(shared.lines(), vec!["Value: \"hello\"", "Error oops"]);

        shared.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_silent_sink_accepts_any_type() {
        struct Opaque;
        let sink = SilentSink;
        sink.emitted(&Opaque);
        DiagnosticSink::<Opaque>::error(&sink, &Failure::new("ignored"));
    }

    #[test]
    fn test_diagnostics_target_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            target: DiagnosticsTarget,
        }

        let parsed: Wrapper = toml::from_str("target = \"tracing\"").unwrap();
        assert_eq!(parsed.target, DiagnosticsTarget::Tracing);
        assert_eq!(DiagnosticsTarget::default(), DiagnosticsTarget::Console);
    }
}
