//! The demo walkthrough.

use crate::config::Config;
use anyhow::{Context, Result};
use beacon_core::{cleanup, Failure, Observable, Observer, ObserverLike};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// What happened during a walkthrough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Total notifications delivered.
    pub notified: usize,
    /// Emit failures recovered by an error handler.
    pub recovered: usize,
    /// Cleanup failures reported by the final unsubscribe.
    pub cleanup_failures: usize,
    /// Observers left after unsubscribing.
    pub remaining: usize,
}

/// Subscribe three observers, emit `config.rounds` times with an increasing
/// state, then unsubscribe the first observer.
///
/// # Errors
///
/// Returns an error if an observer's error handler fails during an emit.
pub fn run(config: &Config) -> Result<Report> {
    let observable = Observable::with_config(
        config.initial_state,
        [],
        config.observable.clone(),
    );

    let total = Arc::new(AtomicU64::new(0));
    let summer = {
        let total = Arc::clone(&total);
        Observer::from_fn(move |v: &i64| {
            total.fetch_add(v.unsigned_abs(), Ordering::Relaxed);
            info!(value = v, "Summer received value");
            Ok(())
        })
    };
    let picky = ObserverLike::new()
        .on_emit(|v: &i64| {
            if v % 2 != 0 {
                return Err(Failure::new(format!("odd value {v}")).into());
            }
            Ok(())
        })
        .on_error(|e| {
            warn!(error = %e, "Picky observer rejected value");
            Ok(())
        })
        .build();
    let bare = ObserverLike::new().build();

    observable.subscribe([summer.clone(), picky, bare]);

    let mut report = Report::default();
    for round in 0..config.rounds {
        observable.set_state(config.initial_state + i64::from(round));
        let summary = observable
            .emit()
            .with_context(|| format!("Emit failed in round {round}"))?;
        report.notified += summary.notified;
        report.recovered += summary.recovered;
    }

    let released = Arc::clone(&total);
    let outcome = observable.unsubscribe(
        &summer,
        observable.removal(&summer),
        [cleanup(move || {
            info!(total = released.load(Ordering::Relaxed), "Summer released");
            Ok(())
        })],
    );
    if let Err(err) = outcome {
        warn!(error = %err, "Unsubscription reported failures");
        report.cleanup_failures = err.len();
    }

    report.remaining = observable.len();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::{DiagnosticsTarget, ObservableConfig};

    fn quiet_config(initial_state: i64, rounds: u32) -> Config {
        Config {
            initial_state,
            rounds,
            observable: ObservableConfig::default().with_diagnostics(DiagnosticsTarget::Silent),
        }
    }

    #[test]
    fn test_walkthrough_counts() {
        let report = run(&quiet_config(0, 3)).unwrap();

        // Three observers per round; states 0, 1, 2 make one odd value.
        assert_eq!(report.notified, 9);
        assert_eq!(report.recovered, 1);
        assert_eq!(report.cleanup_failures, 0);
        assert_eq!(report.remaining, 2);
    }

    #[test]
    fn test_walkthrough_without_rounds() {
        let report = run(&quiet_config(7, 0)).unwrap();
        assert_eq!(report.notified, 0);
        assert_eq!(report.remaining, 2);
    }
}
