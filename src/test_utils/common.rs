use crate::CourseAttributes;
use crate::SeatWatchConfig;
use crate::Snapshot;
use crate::WatchRequest;

pub(crate) const POLL_INTERVAL_IN_SECS: u64 = 300;

pub(crate) fn course(seats: i64) -> CourseAttributes {
    CourseAttributes {
        subject: "CS".to_string(),
        course_number: "101".to_string(),
        title: "Intro".to_string(),
        days: "MWF".to_string(),
        time: "9:00".to_string(),
        instructor: "Smith".to_string(),
        available_seats: seats,
    }
}

pub(crate) fn snapshot(entries: &[(&str, i64)]) -> Snapshot {
    entries.iter().map(|(key, seats)| (key.to_string(), course(*seats))).collect()
}

pub(crate) fn watch_request(
    key: &str,
    email: &str,
) -> WatchRequest {
    WatchRequest {
        subscriber_name: "Ada".to_string(),
        subscriber_email: email.to_string(),
        subscriber_phone: "555-0100".to_string(),
        key: key.to_string(),
        submitted_at: 1,
        snapshot_at_submission: course(0),
    }
}

/// Defaults with deterministic timing for paused-clock tests
pub(crate) fn test_config() -> SeatWatchConfig {
    let mut config = SeatWatchConfig::default();
    config.poller.poll_interval_in_secs = POLL_INTERVAL_IN_SECS;
    config.poller.fetch_timeout_in_ms = 1_000;
    config.poller.jitter_in_ms = 0;
    config.poller.shutdown_timeout_in_ms = 500;
    config
}
