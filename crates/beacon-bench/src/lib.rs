//! Shared fixtures for the Beacon benchmarks.

use beacon_core::{Observable, Observer, SilentSink};
use std::sync::Arc;

/// An observable over `u64` with `count` counting observers and a silent sink.
#[must_use]
pub fn fanout(count: usize) -> Observable<u64> {
    let observers = (0..count).map(|_| {
        Observer::from_fn(|v: &u64| {
            std::hint::black_box(v);
            Ok(())
        })
    });
    Observable::with_sink(0, observers, Arc::new(SilentSink))
}

/// An observer that fails every emit and recovers in its handler.
#[must_use]
pub fn recovering() -> Observer<u64> {
    beacon_core::ObserverLike::new()
        .on_emit(|_: &u64| Err("rejected".into()))
        .on_error(|_| Ok(()))
        .build()
}
