//! # beacon-core
//!
//! A minimal in-process publish/subscribe primitive.
//!
//! This crate provides:
//!
//! - **Observable** - State plus an ordered set of observers, with emit,
//!   subscribe and cleanup-driven unsubscribe
//! - **Observer** - Partial observers and the adapter that fills in defaults
//! - **Sink** - Where default observer callbacks report
//! - **Config** - Removal policy and diagnostics selection
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  emit   ┌─────────────┐  on_emit / on_error  ┌─────────────┐
//! │ Observable  │────────▶│   adapt()   │─────────────────────▶│  Observer   │
//! └─────────────┘         └─────────────┘                      └─────────────┘
//!                                │ missing callback
//!                                ▼
//!                         ┌─────────────┐
//!                         │    Sink     │
//!                         └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use beacon_core::{Observable, Observer};
//!
//! let observable = Observable::new(0, []);
//! let printer = Observer::from_fn(|v: &i32| {
//!     println!("got {v}");
//!     Ok(())
//! });
//! observable.subscribe([printer.clone()]);
//! observable.emit().unwrap();
//!
//! observable
//!     .unsubscribe(&printer, observable.removal(&printer), [])
//!     .unwrap();
//! assert!(observable.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod observable;
pub mod observer;
pub mod sink;

pub use config::{ObservableConfig, RemovalPolicy};
pub use error::{BoxError, ConfigError, EmitError, Failure, UnsubscriptionError};
pub use observable::{cleanup, CleanupAction, EmitSummary, Observable};
pub use observer::{adapt, Adapted, Observer, ObserverId, ObserverLike};
pub use sink::{
    ConsoleSink, DiagnosticSink, DiagnosticsTarget, MemorySink, SilentSink, TracingSink,
};
