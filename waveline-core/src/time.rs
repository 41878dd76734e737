//! Duration conversion utilities with explicit saturation behavior.

use std::time::Duration;

/// Extension trait for safe Duration conversions.
pub trait DurationExt {
    /// Convert duration to milliseconds as u64, saturating at `u64::MAX`.
    ///
    /// In practice, this is always safe because durations exceeding `u64::MAX`
    /// milliseconds would represent ~584 million years.
    fn as_millis_u64(&self) -> u64;

    /// Convert duration to milliseconds as f64.
    ///
    /// Used for fractional scrubber math; precision loss only occurs for
    /// durations far beyond any audio track.
    fn as_millis_f64(&self) -> f64;
}

impl DurationExt for Duration {
    fn as_millis_u64(&self) -> u64 {
        u64::try_from(self.as_millis()).unwrap_or(u64::MAX)
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_millis_f64(&self) -> f64 {
        self.as_millis_u64() as f64
    }
}
