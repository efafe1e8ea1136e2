// -
// Poller timing

/// Fixed sleep between two fetch cycles of one poller
pub(crate) const DEFAULT_POLL_INTERVAL_IN_SECS: u64 = 300;

/// Upper bound for a single snapshot fetch
pub(crate) const DEFAULT_FETCH_TIMEOUT_IN_MS: u64 = 30_000;

/// Grace period given to pollers on shutdown before they are aborted
pub(crate) const DEFAULT_SHUTDOWN_TIMEOUT_IN_MS: u64 = 5_000;

// -
// Notification content

pub(crate) const DEFAULT_NOTIFICATION_SUBJECT: &str = "Seats Available!";
pub(crate) const TEST_NOTIFICATION_SUBJECT: &str = "Seat Watch Notification Test";

// -
// Files

pub(crate) const REGISTRY_TEMP_SUFFIX: &str = "tmp";

/// Maximum number of near-miss keys reported by a lookup
pub(crate) const MAX_SIMILAR_KEYS: usize = 5;
