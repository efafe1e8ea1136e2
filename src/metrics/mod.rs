//! Prometheus collectors describing the engine's current load.
//!
//! Collectors are process-wide statics registered into a crate-local
//! [`REGISTRY`], rendered as text by [`encode_metrics`] for the admin
//! `/metrics` route.
use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use tracing::error;


pub(crate) const OUTCOME_DELIVERED: &str = "delivered";
pub(crate) const OUTCOME_FAILED: &str = "failed";

lazy_static! {
    pub static ref ACTIVE_WATCHES: IntGauge =
        IntGauge::new("seatwatch_active_watches", "Watches currently in the registry")
            .expect("metric can not be created");

    pub static ref ACTIVE_POLLERS: IntGauge =
        IntGauge::new("seatwatch_active_pollers", "Keys with a running poller")
            .expect("metric can not be created");

    pub static ref FETCH_FAILURES: IntCounter = IntCounter::new(
        "seatwatch_fetch_failures_total",
        "Poller cycles whose snapshot fetch failed, timed out or came back empty"
    )
    .expect("metric can not be created");

    pub static ref NOTIFICATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("seatwatch_notifications_total", "Notification delivery attempts"),
        &["outcome"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = {
        let registry = Registry::new();
        register_custom_metrics(&registry);
        registry
    };
}

fn register_custom_metrics(registry: &Registry) {
    registry
        .register(Box::new(ACTIVE_WATCHES.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(ACTIVE_POLLERS.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(FETCH_FAILURES.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(NOTIFICATIONS.clone()))
        .expect("collector can be registered");
}

/// Current gauge values after a registry or scheduler mutation
pub(crate) fn observe_state(
    watches: usize,
    pollers: usize,
) {
    ACTIVE_WATCHES.set(watches as i64);
    ACTIVE_POLLERS.set(pollers as i64);
}

pub(crate) fn record_notification(outcome: &str) {
    NOTIFICATIONS.with_label_values(&[outcome]).inc();
}

/// Text exposition of every collector in [`REGISTRY`]
pub fn encode_metrics() -> String {
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode custom metrics: {}", e);
    };

    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            error!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    }
}
