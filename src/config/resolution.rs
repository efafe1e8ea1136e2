use serde::Deserialize;
use serde::Serialize;

/// Who is notified when a key resolves
///
/// Either way every watch for the key is removed afterwards and its poller
/// is torn down.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FanOut {
    /// Only the representative (first) watch is notified. Other subscribers
    /// of the same key lose their watch without a notification.
    #[default]
    Representative,
    /// Every watch registered for the key is notified, one delivery each.
    AllSubscribers,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ResolutionConfig {
    #[serde(default)]
    pub fan_out: FanOut,
}
