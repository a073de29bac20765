//! Observers and the observer adapter.
//!
//! An [`ObserverLike`] is a partial observer: the caller supplies only the
//! callbacks it cares about. [`adapt`] resolves the missing ones against a
//! [`DiagnosticSink`] at the point of use, so delivery code never has to
//! check for absent callbacks.

use crate::error::BoxError;
use crate::sink::DiagnosticSink;
use std::fmt;
use std::sync::Arc;

type EmitFn<T> = dyn Fn(&T) -> Result<(), BoxError> + Send + Sync;
type ErrorFn = dyn Fn(&BoxError) -> Result<(), BoxError> + Send + Sync;

/// A partial observer with two independently optional callbacks.
pub struct ObserverLike<T> {
    on_emit: Option<Box<EmitFn<T>>>,
    on_error: Option<Box<ErrorFn>>,
}

impl<T> ObserverLike<T> {
    /// Create an observer with no callbacks.
    ///
    /// Both callbacks fall back to the diagnostic sink when invoked.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_emit: None,
            on_error: None,
        }
    }

    /// Set the callback invoked with the state on every emit.
    #[must_use]
    pub fn on_emit<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.on_emit = Some(Box::new(f));
        self
    }

    /// Set the callback invoked when `on_emit` fails.
    #[must_use]
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&BoxError) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Whether an emit callback was supplied.
    #[must_use]
    pub fn has_on_emit(&self) -> bool {
        self.on_emit.is_some()
    }

    /// Whether an error callback was supplied.
    #[must_use]
    pub fn has_on_error(&self) -> bool {
        self.on_error.is_some()
    }

    /// Wrap into a shared, identity-compared [`Observer`] handle.
    #[must_use]
    pub fn build(self) -> Observer<T> {
        Observer::new(self)
    }
}

impl<T> Default for ObserverLike<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObserverLike<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverLike")
            .field("on_emit", &self.has_on_emit())
            .field("on_error", &self.has_on_error())
            .finish()
    }
}

/// Opaque identity of an [`Observer`], stable for the observer's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obs_{:x}", self.0)
    }
}

/// A shared handle to a partial observer.
///
/// Clones refer to the same observer. Equality is identity: two handles are
/// equal only when they point at the same observer, regardless of what their
/// callbacks do.
pub struct Observer<T> {
    inner: Arc<ObserverLike<T>>,
}

impl<T> Observer<T> {
    /// Create a handle for a partial observer.
    #[must_use]
    pub fn new(like: ObserverLike<T>) -> Self {
        Self {
            inner: Arc::new(like),
        }
    }

    /// Shorthand for an observer with only an emit callback.
    #[must_use]
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        ObserverLike::new().on_emit(f).build()
    }

    /// The identity of this observer.
    #[must_use]
    pub fn id(&self) -> ObserverId {
        ObserverId(Arc::as_ptr(&self.inner) as *const () as usize)
    }

    /// Check whether two handles refer to the same observer.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Access the partial observer.
    #[must_use]
    pub fn partial(&self) -> &ObserverLike<T> {
        &self.inner
    }
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Observer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<T> Eq for Observer<T> {}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("id", &self.id())
            .field("on_emit", &self.inner.has_on_emit())
            .field("on_error", &self.inner.has_on_error())
            .finish()
    }
}

impl<T> From<ObserverLike<T>> for Observer<T> {
    fn from(like: ObserverLike<T>) -> Self {
        Self::new(like)
    }
}

/// A total observer: every callback is present.
///
/// Produced by [`adapt`]. Missing callbacks are routed to the sink.
pub struct Adapted<'a, T> {
    observer: &'a ObserverLike<T>,
    sink: &'a dyn DiagnosticSink<T>,
}

impl<'a, T> Adapted<'a, T> {
    /// Deliver a value.
    ///
    /// # Errors
    ///
    /// Returns whatever the observer's emit callback raised. The default
    /// handler never fails.
    pub fn on_emit(&self, value: &T) -> Result<(), BoxError> {
        match &self.observer.on_emit {
            Some(f) => f(value),
            None => {
                self.sink.emitted(value);
                Ok(())
            }
        }
    }

    /// Report a delivery failure.
    ///
    /// # Errors
    ///
    /// Returns whatever the observer's error callback raised. The default
    /// handler never fails.
    pub fn on_error(&self, error: &BoxError) -> Result<(), BoxError> {
        match &self.observer.on_error {
            Some(f) => f(error),
            None => {
                self.sink.error(&**error);
                Ok(())
            }
        }
    }
}

/// Normalize a partial observer into a total one.
///
/// Pure: nothing is written to the sink until a default handler runs.
#[must_use]
pub fn adapt<'a, T>(observer: &'a Observer<T>, sink: &'a dyn DiagnosticSink<T>) -> Adapted<'a, T> {
    Adapted {
        observer: observer.partial(),
        sink,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Failure;
    use crate::sink::MemorySink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_observer_identity() {
        let a: Observer<i32> = Observer::from_fn(|_| Ok(()));
        let b: Observer<i32> = Observer::from_fn(|_| Ok(()));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.id(), a.clone().id());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_adapt_uses_supplied_callbacks() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let observer = ObserverLike::new()
            .on_emit(move |v: &usize| {
                counter.fetch_add(*v, Ordering::SeqCst);
                Ok(())
            })
            .build();
        let sink = MemorySink::new();

        adapt(&observer, &sink).on_emit(&3).unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_adapt_defaults_write_to_sink() {
        let observer: Observer<i32> = ObserverLike::new().build();
        let sink = MemorySink::new();

        let adapted = adapt(&observer, &sink);
        assert!(sink.lines().is_empty());

        adapted.on_emit(&7).unwrap();
        adapted.on_error(&Failure::new("bad value").into()).unwrap();

        assert_eq!(sink.lines(), vec!["Value: 7", "Error bad value"]);
    }

    #[test]
    fn test_adapt_propagates_handler_failure() {
        let observer: Observer<i32> = ObserverLike::new()
            .on_error(|e| Err(format!("handler saw {e}").into()))
            .build();
        let sink = MemorySink::new();

        let err = adapt(&observer, &sink)
            .on_error(&"original".into())
            .unwrap_err();
        assert_eq!(err.to_string(), "handler saw original");
    }
}
