//! Display helpers shared by list and player views.

use std::time::Duration;

/// Formats a duration as zero-padded `HH:MM:SS`.
///
/// Sub-second precision is dropped.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
