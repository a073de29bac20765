//! # Beacon demo
//!
//! Walks an observable through subscribe, emit and unsubscribe.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default settings
//! beacon
//!
//! # Run with environment overrides
//! BEACON_ROUNDS=5 BEACON_INITIAL_STATE=10 RUST_LOG=beacon=trace beacon
//! ```

mod config;
mod walkthrough;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beacon=debug,beacon_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::load()?;

    tracing::info!(
        initial_state = config.initial_state,
        rounds = config.rounds,
        "Starting Beacon demo"
    );

    beacon_core::metrics::init_metrics();

    let report = walkthrough::run(&config)?;
    tracing::info!(?report, "Demo finished");

    Ok(())
}
