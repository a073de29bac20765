//! The observable engine.
//!
//! An [`Observable`] holds a state value and an ordered sequence of
//! observers. [`Observable::emit`] pushes the state to every observer,
//! isolating failures per observer. [`Observable::unsubscribe`] runs a set of
//! caller-supplied cleanup actions and reports all their failures together.
//!
//! Unsubscribing never removes the observer by itself: removal is one of the
//! cleanup actions, usually the one built by [`Observable::removal`].

use crate::config::{ObservableConfig, RemovalPolicy};
use crate::error::{BoxError, EmitError, UnsubscriptionError};
use crate::metrics::{
    record_cleanup_failures, record_emit, record_observer_failure, record_removals,
    record_subscriptions,
};
use crate::observer::{adapt, Observer};
use crate::sink::DiagnosticSink;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace, warn};

/// A cleanup action run by [`Observable::unsubscribe`].
pub type CleanupAction<'a> = Box<dyn FnOnce() -> Result<(), BoxError> + 'a>;

/// Box a closure as a [`CleanupAction`].
pub fn cleanup<'a, F>(f: F) -> CleanupAction<'a>
where
    F: FnOnce() -> Result<(), BoxError> + 'a,
{
    Box::new(f)
}

/// Outcome of a successful [`Observable::emit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    /// Number of observers whose emit callback (or default) was invoked.
    pub notified: usize,
    /// Number of emit failures handled by the observer's error callback.
    pub recovered: usize,
}

/// State plus an ordered, duplicate-permitting sequence of observers.
///
/// All methods take `&self`; a single internal lock serializes access to the
/// observer sequence. The lock is never held while observer callbacks or
/// cleanup actions run, so they may call back into the observable.
pub struct Observable<T> {
    /// Current state, swapped wholesale by `set_state`.
    state: Mutex<Arc<T>>,
    /// Observers in subscription order.
    observers: Mutex<Vec<Observer<T>>>,
    /// Default handler target for partial observers.
    sink: Arc<dyn DiagnosticSink<T>>,
    config: ObservableConfig,
}

impl<T: fmt::Debug + 'static> Observable<T> {
    /// Create an observable that reports defaults to the console.
    ///
    /// The initial observers are copied into a fresh sequence.
    #[must_use]
    pub fn new(state: T, observers: impl IntoIterator<Item = Observer<T>>) -> Self {
        Self::with_config(state, observers, ObservableConfig::default())
    }

    /// Create an observable whose sink is chosen by `config.diagnostics`.
    #[must_use]
    pub fn with_config(
        state: T,
        observers: impl IntoIterator<Item = Observer<T>>,
        config: ObservableConfig,
    ) -> Self {
        let sink = config.diagnostics.sink();
        Self::with_config_and_sink(state, observers, config, sink)
    }
}

impl<T> Observable<T> {
    /// Create an observable with an explicit diagnostic sink.
    #[must_use]
    pub fn with_sink(
        state: T,
        observers: impl IntoIterator<Item = Observer<T>>,
        sink: Arc<dyn DiagnosticSink<T>>,
    ) -> Self {
        Self::with_config_and_sink(state, observers, ObservableConfig::default(), sink)
    }

    /// Create an observable with explicit configuration and sink.
    ///
    /// `config.diagnostics` is ignored in favour of `sink`.
    #[must_use]
    pub fn with_config_and_sink(
        state: T,
        observers: impl IntoIterator<Item = Observer<T>>,
        config: ObservableConfig,
        sink: Arc<dyn DiagnosticSink<T>>,
    ) -> Self {
        let observers: Vec<_> = observers.into_iter().collect();
        debug!(
            observers = observers.len(),
            removal = ?config.removal,
            "Creating observable"
        );
        Self {
            state: Mutex::new(Arc::new(state)),
            observers: Mutex::new(observers),
            sink,
            config,
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ObservableConfig {
        &self.config
    }

    /// Get the current state.
    #[must_use]
    pub fn state(&self) -> Arc<T> {
        Arc::clone(&self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the state broadcast by subsequent emits.
    pub fn set_state(&self, state: T) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(state);
        trace!("State replaced");
    }

    /// Get the number of registered entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_observers().len()
    }

    /// Check if no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_observers().is_empty()
    }

    /// Check if the observer is registered, by identity.
    #[must_use]
    pub fn contains(&self, observer: &Observer<T>) -> bool {
        self.lock_observers().iter().any(|o| o.same(observer))
    }

    /// Snapshot of the registered observers in subscription order.
    #[must_use]
    pub fn observers(&self) -> Vec<Observer<T>> {
        self.lock_observers().clone()
    }

    /// Append observers in the given order.
    ///
    /// Duplicates are kept as separate entries.
    pub fn subscribe(&self, observers: impl IntoIterator<Item = Observer<T>>) {
        let mut current = self.lock_observers();
        let before = current.len();
        current.extend(observers);
        let added = current.len() - before;
        debug!(added, observers = current.len(), "Observers subscribed");
        drop(current);
        record_subscriptions(added);
    }

    /// Append a single observer.
    pub fn subscribe_one(&self, observer: Observer<T>) {
        self.subscribe(std::iter::once(observer));
    }

    /// Run cleanup actions for a registered observer.
    ///
    /// If `observer` is not registered nothing runs and `Ok(())` is
    /// returned. Otherwise `first` and then every action of `rest` runs in
    /// order, regardless of earlier failures. The observer is not removed
    /// unless one of the actions removes it.
    ///
    /// # Errors
    ///
    /// Returns an [`UnsubscriptionError`] holding every failure, in the order
    /// the failing actions ran, once all actions have run.
    pub fn unsubscribe<'a>(
        &self,
        observer: &Observer<T>,
        first: CleanupAction<'a>,
        rest: impl IntoIterator<Item = CleanupAction<'a>>,
    ) -> Result<(), UnsubscriptionError> {
        if !self.contains(observer) {
            trace!(observer = %observer.id(), "Unsubscribe of unknown observer ignored");
            return Ok(());
        }

        let mut errors = Vec::new();
        let mut ran = 0usize;
        for action in std::iter::once(first).chain(rest) {
            ran += 1;
            if let Err(err) = action() {
                errors.push(err);
            }
        }

        if errors.is_empty() {
            debug!(observer = %observer.id(), actions = ran, "Observer unsubscribed");
            return Ok(());
        }

        warn!(
            observer = %observer.id(),
            actions = ran,
            failed = errors.len(),
            "Cleanup actions failed during unsubscription"
        );
        record_cleanup_failures(errors.len());
        Err(UnsubscriptionError::new(errors))
    }

    /// Remove the observer using the configured [`RemovalPolicy`].
    ///
    /// Returns the number of entries removed.
    pub fn remove(&self, observer: &Observer<T>) -> usize {
        self.remove_with(observer, self.config.removal)
    }

    /// Remove the observer using an explicit policy.
    ///
    /// Returns the number of entries removed.
    pub fn remove_with(&self, observer: &Observer<T>, policy: RemovalPolicy) -> usize {
        let mut current = self.lock_observers();
        let before = current.len();
        match policy {
            RemovalPolicy::All => current.retain(|o| !o.same(observer)),
            RemovalPolicy::First => {
                if let Some(pos) = current.iter().position(|o| o.same(observer)) {
                    current.remove(pos);
                }
            }
        }
        let removed = before - current.len();
        debug!(
            observer = %observer.id(),
            removed,
            observers = current.len(),
            "Observer removed"
        );
        drop(current);
        record_removals(removed);
        removed
    }

    /// Build a cleanup action that removes `observer` from this observable.
    pub fn removal(&self, observer: &Observer<T>) -> CleanupAction<'_> {
        let observer = observer.clone();
        cleanup(move || {
            self.remove(&observer);
            Ok(())
        })
    }

    /// Deliver the current state to every registered observer.
    ///
    /// Iterates a snapshot taken at the start of the call: observers
    /// subscribed or removed by a callback only affect later emits. An emit
    /// failure is passed to the same observer's error handler and delivery
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Handler`] if an error handler itself fails.
    /// Observers after the failing one are not notified.
    pub fn emit(&self) -> Result<EmitSummary, EmitError> {
        let state = self.state();
        let snapshot = self.observers();
        let mut summary = EmitSummary::default();

        trace!(observers = snapshot.len(), "Emitting state");

        for (index, observer) in snapshot.iter().enumerate() {
            let adapted = adapt(observer, &*self.sink);
            summary.notified += 1;

            let Err(err) = adapted.on_emit(&state) else {
                continue;
            };

            warn!(observer = %observer.id(), error = %err, "Observer failed to handle value");
            record_observer_failure("emit");

            if let Err(source) = adapted.on_error(&err) {
                warn!(
                    observer = %observer.id(),
                    error = %source,
                    skipped = snapshot.len() - index - 1,
                    "Observer error handler failed, aborting emit"
                );
                record_observer_failure("handler");
                record_emit(summary.notified);
                return Err(EmitError::Handler {
                    index,
                    observer: observer.id(),
                    source,
                });
            }
            summary.recovered += 1;
        }

        record_emit(summary.notified);
        Ok(summary)
    }

    fn lock_observers(&self) -> MutexGuard<'_, Vec<Observer<T>>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
