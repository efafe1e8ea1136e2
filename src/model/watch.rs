use serde::Deserialize;
use serde::Serialize;

use super::CourseAttributes;

/// A subscriber's standing request to be told when `key` has an open seat.
///
/// Never mutated after creation; it only leaves the registry by removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchRequest {
    pub subscriber_name: String,
    pub subscriber_email: String,
    pub subscriber_phone: String,
    pub key: String,
    /// Unix time in milliseconds
    pub submitted_at: u64,
    /// Course attributes seen when the watch was accepted
    pub snapshot_at_submission: CourseAttributes,
}

impl WatchRequest {
    /// Whether this watch is the one identified by `(key, email)`
    pub fn matches(
        &self,
        key: &str,
        email: &str,
    ) -> bool {
        self.key == key && self.subscriber_email == email
    }
}
