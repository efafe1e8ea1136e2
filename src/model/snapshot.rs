use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Current state of one course section as reported by the upstream source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAttributes {
    #[serde(default = "not_available")]
    pub subject: String,

    #[serde(default = "not_available")]
    pub course_number: String,

    #[serde(default = "not_available")]
    pub title: String,

    #[serde(default = "not_available")]
    pub days: String,

    #[serde(default = "not_available")]
    pub time: String,

    #[serde(default = "not_available")]
    pub instructor: String,

    /// Open seats; the only input of the availability predicate
    #[serde(default)]
    pub available_seats: i64,
}

impl CourseAttributes {
    pub fn is_available(&self) -> bool {
        self.available_seats > 0
    }
}

/// Key (course registration number) to course attributes
pub type Snapshot = HashMap<String, CourseAttributes>;

/// Keys of `snapshot` that contain `key` or are contained in it, sorted,
/// excluding an exact match.
pub fn similar_keys(
    snapshot: &Snapshot,
    key: &str,
    limit: usize,
) -> Vec<String> {
    if key.is_empty() {
        return Vec::new();
    }

    let mut similar: Vec<String> = snapshot
        .keys()
        .filter(|candidate| candidate.as_str() != key && (candidate.contains(key) || key.contains(candidate.as_str())))
        .cloned()
        .collect();
    similar.sort();
    similar.truncate(limit);
    similar
}

fn not_available() -> String {
    "N/A".to_string()
}
