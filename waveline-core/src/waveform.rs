//! Waveform data model, normalization, and the resolver contract.

use crate::error::Result;
use crate::track::Track;
use async_trait::async_trait;

/// Outcome of resolving a track's waveform descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum WaveformResult {
    /// Normalized amplitude sequence; every value lies in `[0.0, 1.0]`
    Samples(Vec<f32>),
    /// URL of a raster image usable as a static visual proxy
    Raster(String),
    /// No visual data obtainable; the view layer renders a placeholder
    Unavailable,
}

impl WaveformResult {
    /// Whether any renderable data was obtained
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    /// Get the sample sequence, if this is a sample result
    #[must_use]
    pub fn as_samples(&self) -> Option<&[f32]> {
        match self {
            Self::Samples(samples) => Some(samples),
            _ => None,
        }
    }
}

/// Normalize a raw sample sequence into the `[0, 1]` range.
///
/// Non-negative sequences are scaled by their maximum (so the loudest value
/// becomes exactly 1 unless the sequence is all zero). Sequences containing
/// negative values are folded to absolute amplitude and scaled by the larger
/// magnitude bound. Returns `None` for an empty sequence.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // values are scaled into [0,1] before narrowing
pub fn normalize_samples(raw: &[f64]) -> Option<Vec<f32>> {
    if raw.is_empty() {
        return None;
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in raw {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }

    let normalized = if min >= 0.0 {
        let denom = if max > 0.0 { max } else { 1.0 };
        raw.iter().map(|&v| (v / denom) as f32).collect()
    } else {
        let bound = min.abs().max(max.abs());
        let denom = if bound > 0.0 { bound } else { 1.0 };
        raw.iter().map(|&v| (v.abs() / denom) as f32).collect()
    };

    Some(normalized)
}

/// Trait for waveform resolvers.
///
/// A resolver turns a track's vendor-supplied waveform descriptor into
/// renderable data. Failures are recovered internally (falling through to a
/// cheaper representation); `Unavailable` is a valid, non-error outcome.
#[async_trait]
pub trait WaveformResolver: Send + Sync {
    /// Get the resolver name
    fn name(&self) -> &'static str;

    /// Resolve renderable waveform data for a track
    async fn resolve(&self, track: &Track) -> Result<WaveformResult>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_non_negative_scales_by_max() {
        let samples = normalize_samples(&[0.0, 2.0, 4.0]).unwrap();
        assert_eq!(samples, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_all_zero_divides_by_one() {
        let samples = normalize_samples(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(samples, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normalize_signed_uses_magnitude_bound() {
        let samples = normalize_samples(&[-8.0, 4.0, 0.0]).unwrap();
        assert_eq!(samples, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_normalize_empty_is_unavailable() {
        assert!(normalize_samples(&[]).is_none());
    }

    #[test]
    fn test_normalize_range_and_peak_properties() {
        let raw = vec![-3.0, 1.5, 2.9, -0.4, 0.0, 3.0];
        let samples = normalize_samples(&raw).unwrap();
        assert!(samples.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(samples.iter().any(|&v| (v - 1.0).abs() < f32::EPSILON));
    }

    #[test]
    fn test_normalize_idempotent_per_input() {
        let raw = vec![0.25, 0.5, 0.125, 0.75];
        let first = normalize_samples(&raw).unwrap();
        let second = normalize_samples(&raw).unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_result_helpers() {
        assert!(WaveformResult::Samples(vec![0.5]).is_available());
        assert!(WaveformResult::Raster("https://wis.sndcdn.com/a.png".into()).is_available());
        assert!(!WaveformResult::Unavailable.is_available());
        assert_eq!(
            WaveformResult::Samples(vec![0.5]).as_samples(),
            Some(&[0.5_f32][..])
        );
        assert_eq!(WaveformResult::Unavailable.as_samples(), None);
    }
}
