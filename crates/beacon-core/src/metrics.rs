//! Metrics instrumentation for Beacon.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! host installs a recorder.

use metrics::counter;

/// Metric names.
pub mod names {
    pub const SUBSCRIPTIONS_TOTAL: &str = "beacon_subscriptions_total";
    pub const EMITS_TOTAL: &str = "beacon_emits_total";
    pub const NOTIFICATIONS_TOTAL: &str = "beacon_notifications_total";
    pub const OBSERVER_FAILURES_TOTAL: &str = "beacon_observer_failures_total";
    pub const CLEANUP_FAILURES_TOTAL: &str = "beacon_cleanup_failures_total";
    pub const REMOVALS_TOTAL: &str = "beacon_removals_total";
}

/// Describe all Beacon metrics to the installed recorder.
pub fn init_metrics() {
    metrics::describe_counter!(
        names::SUBSCRIPTIONS_TOTAL,
        "Total number of observers subscribed"
    );
    metrics::describe_counter!(names::EMITS_TOTAL, "Total number of emit calls");
    metrics::describe_counter!(
        names::NOTIFICATIONS_TOTAL,
        "Total number of observer notifications delivered"
    );
    metrics::describe_counter!(
        names::OBSERVER_FAILURES_TOTAL,
        "Total number of observer callback failures"
    );
    metrics::describe_counter!(
        names::CLEANUP_FAILURES_TOTAL,
        "Total number of failed unsubscription cleanup actions"
    );
    metrics::describe_counter!(
        names::REMOVALS_TOTAL,
        "Total number of observer entries removed"
    );
}

pub(crate) fn record_subscriptions(count: usize) {
    counter!(names::SUBSCRIPTIONS_TOTAL).increment(count as u64);
}

pub(crate) fn record_emit(notified: usize) {
    counter!(names::EMITS_TOTAL).increment(1);
    counter!(names::NOTIFICATIONS_TOTAL).increment(notified as u64);
}

/// `stage` is `emit` for a recovered emit failure, `handler` for a failed
/// error handler.
pub(crate) fn record_observer_failure(stage: &'static str) {
    counter!(names::OBSERVER_FAILURES_TOTAL, "stage" => stage).increment(1);
}

pub(crate) fn record_cleanup_failures(count: usize) {
    counter!(names::CLEANUP_FAILURES_TOTAL).increment(count as u64);
}

pub(crate) fn record_removals(count: usize) {
    counter!(names::REMOVALS_TOTAL).increment(count as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder() {
        // No recorder installed: every call is a no-op.
        init_metrics();
        record_subscriptions(2);
        record_emit(2);
        record_observer_failure("emit");
        record_cleanup_failures(1);
        record_removals(1);
    }
}
