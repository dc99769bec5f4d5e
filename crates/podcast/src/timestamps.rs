// ABOUTME: Chapter marker extraction from podcast episode descriptions.
// ABOUTME: Finds "[H:]M:SS - label" markers and returns them in document order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Optional hour group, a minutes:seconds group, a dash or en dash, then the rest of the line.
/// The separator never spans a line break.
static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}:)?(\d{1,2}:\d{2})[ \t]*[-–][ \t]*(.+)").unwrap());

/// One chapter marker found in a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    /// The marker exactly as written, e.g. `12:45:10` or `1:30`.
    pub time: String,
    pub label: String,
}

/// Returns every chapter marker in `description`, one per match, in document order.
///
/// Markers may appear anywhere in a line; the label runs to the end of that line.
pub fn extract_timestamps(description: &str) -> Vec<Timestamp> {
    TIMESTAMP_RE
        .captures_iter(description)
        .filter_map(|caps| {
            let hours = caps.get(1).map_or("", |m| m.as_str());
            let rest = caps.get(2)?.as_str();
            let label = caps.get(3)?.as_str().trim();
            if label.is_empty() {
                return None;
            }
            Some(Timestamp {
                time: format!("{}{}", hours, rest),
                label: label.to_string(),
            })
        })
        .collect()
}
