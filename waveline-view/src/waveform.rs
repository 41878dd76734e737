//! Waveform presentation: bar downsampling and the seeded placeholder.

use waveline_core::WaveformResult;

/// Seed used when no track is selected yet
const FALLBACK_SEED: u64 = 1337;
/// Minimum rendered bar height so quiet buckets stay visible
const MIN_BAR_HEIGHT: f32 = 0.08;
/// Maximum rendered bar height, leaving headroom inside the scrubber box
const MAX_BAR_HEIGHT: f32 = 0.98;

/// What the scrubber should draw, in fallback order.
#[derive(Debug, Clone, PartialEq)]
pub enum WaveformView {
    /// Downsampled real-amplitude bars, heights in `[0, 1]`
    Bars(Vec<f32>),
    /// Raster proxy, rendered twice: full opacity clipped to the played
    /// fraction, low opacity for the remainder
    Raster(String),
    /// Seeded placeholder bars for tracks with no obtainable waveform
    Placeholder(Vec<f32>),
}

impl WaveformView {
    /// Choose the best renderable form for a resolution result.
    #[must_use]
    pub fn from_result(
        result: &WaveformResult,
        track_id: Option<u64>,
        sample_columns: usize,
        placeholder_bars: usize,
    ) -> Self {
        match result {
            WaveformResult::Samples(samples) if !samples.is_empty() => {
                Self::Bars(downsample(samples, sample_columns))
            }
            WaveformResult::Raster(url) => Self::Raster(url.clone()),
            _ => Self::Placeholder(placeholder(track_id, placeholder_bars)),
        }
    }
}

/// Downsample a normalized sample sequence to roughly `columns` bars by
/// averaging absolute amplitude within each bucket, clamped to the rendered
/// height range.
#[must_use]
#[allow(clippy::cast_precision_loss)] // bucket lengths are tiny
pub fn downsample(samples: &[f32], columns: usize) -> Vec<f32> {
    if samples.is_empty() || columns == 0 {
        return Vec::new();
    }
    let step = (samples.len() / columns).max(1);
    samples
        .chunks(step)
        .map(|bucket| {
            let avg = bucket.iter().map(|v| v.abs()).sum::<f32>() / bucket.len() as f32;
            avg.clamp(MIN_BAR_HEIGHT, MAX_BAR_HEIGHT)
        })
        .collect()
}

/// Deterministic pseudo-random bar heights, seeded from the track id, so an
/// unresolved track still renders a populated, seekable scrubber with a
/// stable shape across rerenders.
#[must_use]
pub fn placeholder(track_id: Option<u64>, bars: usize) -> Vec<f32> {
    let seed = u32::try_from(track_id.unwrap_or(FALLBACK_SEED) & 0xffff).unwrap_or_default();
    let mut rng = Mulberry32::new(seed);
    (0..bars).map(|_| 0.6f32.mul_add(rng.next(), 0.35)).collect()
}

/// mulberry32 PRNG, kept for seed-stable placeholder shapes.
struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    #[allow(clippy::cast_possible_truncation)] // output is in [0,1)
    fn next(&mut self) -> f32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        (f64::from(t ^ (t >> 14)) / 4_294_967_296.0) as f32
    }
}
