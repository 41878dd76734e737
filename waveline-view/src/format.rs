//! Time label formatting for the track list and scrubber overlay.

use std::time::Duration;

/// Format a duration as `m:ss` with zero-padded seconds.
///
/// Returns an empty string when the duration is zero or unknown, so rows
/// without vendor-reported durations render without a stray "0:00".
#[must_use]
pub fn format_duration(duration: Option<Duration>) -> String {
    let Some(duration) = duration else {
        return String::new();
    };
    if duration.is_zero() {
        return String::new();
    }
    let total_secs = duration.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes}:{seconds:02}")
}

/// `position / duration` readout for the scrubber overlay.
#[must_use]
pub fn format_position(position: Duration, duration: Duration) -> String {
    format!(
        "{} / {}",
        format_duration(Some(position)),
        format_duration(Some(duration))
    )
}
