//! Scrubber geometry: click-to-seek math and the played fraction.

use std::time::Duration;
use waveline_core::DurationExt;

/// Compute the seek target for a click at `offset_x` within a track rendered
/// `width` wide: `floor(duration × clamp(x/w, 0, 1))`, in milliseconds.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // fraction is clamped to [0,1]
pub fn scrub_target(offset_x: f64, width: f64, duration: Duration) -> Duration {
    if width <= 0.0 || duration.is_zero() {
        return Duration::ZERO;
    }
    let fraction = (offset_x / width).clamp(0.0, 1.0);
    let millis = (duration.as_millis_f64() * fraction).floor();
    Duration::from_millis(millis as u64)
}

/// Fraction of the scrubber that reads as played; 0 when the duration is 0.
#[must_use]
pub fn progress_fraction(position: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        0.0
    } else {
        (position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: Duration = Duration::from_millis(60_000);

    #[test]
    fn test_scrub_target_fractional_offsets() {
        assert_eq!(scrub_target(0.0, 400.0, TRACK), Duration::ZERO);
        assert_eq!(scrub_target(100.0, 400.0, TRACK), Duration::from_millis(15_000));
        assert_eq!(scrub_target(400.0, 400.0, TRACK), Duration::from_millis(60_000));
    }

    #[test]
    fn test_scrub_target_floors_to_whole_millis() {
        // 1/3 of 100ms is 33.33..ms; the target floors
        assert_eq!(
            scrub_target(1.0, 3.0, Duration::from_millis(100)),
            Duration::from_millis(33)
        );
    }

    #[test]
    fn test_scrub_target_clamps_outside_track() {
        assert_eq!(scrub_target(-50.0, 400.0, TRACK), Duration::ZERO);
        assert_eq!(scrub_target(900.0, 400.0, TRACK), TRACK);
    }

    #[test]
    fn test_scrub_target_degenerate_geometry() {
        assert_eq!(scrub_target(10.0, 0.0, TRACK), Duration::ZERO);
        assert_eq!(scrub_target(10.0, 400.0, Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_progress_fraction() {
        assert!((progress_fraction(Duration::from_millis(15_000), TRACK) - 0.25).abs() < 1e-9);
        assert!((progress_fraction(Duration::ZERO, Duration::ZERO)).abs() < f64::EPSILON);
    }
}
