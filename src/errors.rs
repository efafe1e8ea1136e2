//! Watch Engine Error Hierarchy
//!
//! Defines the error types surfaced by the watch-monitoring engine,
//! categorized by the boundary they originate from.
//!
//! Only validation and duplicate errors are ever returned to a subscriber
//! without side effects. Fetch, persistence and delivery failures are
//! swallowed and logged inside the engine's background paths; they reach a
//! caller only through the synchronous admin operations.

use std::path::PathBuf;
use std::time::Duration;

use config::ConfigError;
use tokio::task::JoinError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejected submission input, nothing was mutated
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The `(key, email)` pair is already watched, nothing was mutated
    #[error("Watch for key {key} by {email} already exists")]
    DuplicateWatch { key: String, email: String },

    /// Resource snapshot could not be obtained
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Registry could not be written to the durable store.
    /// The in-memory mutation that triggered the write still stands.
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// Notification could not be delivered
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Configuration sources could not be merged or parsed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration parsed but violates a rule
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Unrecoverable failures of process plumbing (signals, runtime)
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A required submission field was empty after trimming
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Email address does not look like `local@domain`
    #[error("Malformed email address: {0}")]
    MalformedEmail(String),

    /// Key is not present in the current resource snapshot
    #[error("Unknown key: {0}")]
    UnknownKey(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport level failure talking to the upstream source
    #[error("Snapshot request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Snapshot source answered with status {0}")]
    Status(u16),

    /// Upstream payload could not be decoded into a snapshot
    #[error("Snapshot decode failed: {0}")]
    Decode(String),

    /// Upstream answered successfully but listed no resources
    #[error("Snapshot is empty")]
    EmptySnapshot,

    /// Fetch did not complete in time
    #[error("Snapshot fetch timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Disk I/O failure while writing the registry file
    #[error("Registry write failed at path: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry could not be encoded
    #[error("Registry serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Transport level failure talking to the delivery relay
    #[error("Notification request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay answered with a non-success status
    #[error("Notification relay answered with status {0}")]
    Status(u16),

    /// Notifier refused the message (bad address, missing credentials)
    #[error("Notification rejected: {0}")]
    Rejected(String),
}

impl Error {
    /// Whether the error came from the durable store.
    ///
    /// Callers use this to tell "state changed but was not saved" apart from
    /// "nothing happened".
    pub fn is_persist(&self) -> bool {
        matches!(self, Error::Persist(_))
    }
}

// ============== Conversion Implementations ============== //
impl From<JoinError> for Error {
    fn from(err: JoinError) -> Self {
        Error::Fatal(format!("Background task failed: {err}"))
    }
}

