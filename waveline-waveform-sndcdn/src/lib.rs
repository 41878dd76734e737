//! Waveform resolver for the vendor's waveform CDN.
//!
//! A track's waveform descriptor historically points at either a structured
//! JSON sample document on the sample host or a pre-rendered raster PNG on
//! the image host. Resolution prefers the true sample shape and falls back
//! to a raster proxy; when both fail the caller renders a placeholder, so
//! every failure here is recovered locally and never surfaced to the user.

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;
use waveline_core::{normalize_samples, CoreError, Track, WaveformResolver, WaveformResult};

/// Host serving structured JSON sample documents
const SAMPLE_HOST: &str = "wave.sndcdn.com";
/// Host serving pre-rendered raster waveforms
const RASTER_HOST: &str = "wis.sndcdn.com";

/// Default timeout for HTTP requests (10 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default number of retry attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Probe deciding whether a candidate raster URL actually loads.
#[async_trait]
pub trait RasterProbe: Send + Sync {
    /// Whether the candidate loads as an image
    async fn loads(&self, url: &str) -> bool;
}

/// HTTP probe: a candidate counts as loaded when the CDN answers with a
/// success status and an image content type.
struct HttpRasterProbe {
    client: ClientWithMiddleware,
}

#[async_trait]
impl RasterProbe for HttpRasterProbe {
    async fn loads(&self, url: &str) -> bool {
        match self.client.get(url).header("Accept", "image/*").send().await {
            Ok(response) => {
                response.status().is_success()
                    && response
                        .headers()
                        .get(reqwest::header::CONTENT_TYPE)
                        .and_then(|value| value.to_str().ok())
                        .is_some_and(|content_type| content_type.starts_with("image/"))
            }
            Err(e) => {
                debug!("Raster probe failed for {url}: {e}");
                false
            }
        }
    }
}

/// The historical shapes of the JSON sample document, tried in order.
///
/// New schema variants get a new tag here rather than field probing at the
/// use site.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SampleDocument {
    Samples { samples: Vec<f64> },
    Peaks { peaks: Vec<f64> },
    Data { data: Vec<f64> },
    Channels { channels: Vec<Vec<f64>> },
}

impl SampleDocument {
    /// Extract the raw sample sequence; per-channel documents use the first
    /// channel.
    fn into_samples(self) -> Vec<f64> {
        match self {
            Self::Samples { samples } => samples,
            Self::Peaks { peaks } => peaks,
            Self::Data { data } => data,
            Self::Channels { mut channels } => {
                if channels.is_empty() {
                    Vec::new()
                } else {
                    channels.swap_remove(0)
                }
            }
        }
    }
}

fn is_sample_document(url: &Url) -> bool {
    url.host_str() == Some(SAMPLE_HOST) && url.path().ends_with(".json")
}

fn strip_size_suffix(base: &str) -> (bool, &str) {
    for suffix in ["_m", "_l", "_s", "_M", "_L", "_S"] {
        if let Some(stripped) = base.strip_suffix(suffix) {
            return (true, stripped);
        }
    }
    (false, base)
}

/// Derive candidate raster URLs from a waveform descriptor.
///
/// Covers the already-a-raster case and up to four size-suffix variants of
/// the sample-host case, deduplicated preserving probe order.
#[must_use]
pub fn raster_candidates(descriptor_url: &str) -> Vec<String> {
    let Ok(url) = Url::parse(descriptor_url) else {
        return Vec::new();
    };
    let path = url.path().trim_start_matches('/');

    match url.host_str() {
        Some(RASTER_HOST) if path.ends_with(".png") => vec![descriptor_url.to_string()],
        Some(SAMPLE_HOST) if path.ends_with(".json") => {
            let base = path.trim_end_matches(".json");
            let (has_size, without_size) = strip_size_suffix(base);

            let mut candidates = Vec::new();
            if has_size {
                candidates.push(format!("https://{RASTER_HOST}/{base}.png"));
            }
            for variant in [
                format!("{without_size}_m"),
                without_size.to_string(),
                format!("{without_size}_l"),
                format!("{without_size}_s"),
            ] {
                let candidate = format!("https://{RASTER_HOST}/{variant}.png");
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
            candidates
        }
        _ => Vec::new(),
    }
}

/// Waveform resolver for sndcdn descriptors.
pub struct SndcdnResolver {
    client: ClientWithMiddleware,
    probe: Box<dyn RasterProbe>,
}

impl SndcdnResolver {
    /// Create a resolver with the default HTTP client and raster probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, CoreError> {
        let client = build_client()?;
        let probe = Box::new(HttpRasterProbe {
            client: build_client()?,
        });
        Ok(Self { client, probe })
    }

    /// Create a resolver with a custom raster probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_probe(probe: Box<dyn RasterProbe>) -> Result<Self, CoreError> {
        Ok(Self {
            client: build_client()?,
            probe,
        })
    }

    /// Fetch and normalize a sample document. Fails soft: network errors,
    /// non-success statuses, and unparsable bodies all yield `None`.
    async fn fetch_samples(&self, url: &Url) -> Option<Vec<f32>> {
        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Sample document fetch failed for {url}: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(
                "Sample document fetch for {url} returned status {}",
                response.status()
            );
            return None;
        }
        let document: SampleDocument = match response.json().await {
            Ok(document) => document,
            Err(e) => {
                debug!("Sample document for {url} did not parse: {e}");
                return None;
            }
        };
        normalize_samples(&document.into_samples())
    }
}

fn build_client() -> Result<ClientWithMiddleware, CoreError> {
    let base_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(5))
        .user_agent("Waveline/1.0 (https://github.com/waveline)")
        .build()?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(DEFAULT_MAX_RETRIES);
    Ok(ClientBuilder::new(base_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

#[async_trait]
impl WaveformResolver for SndcdnResolver {
    fn name(&self) -> &'static str {
        "sndcdn"
    }

    async fn resolve(&self, track: &Track) -> Result<WaveformResult, CoreError> {
        let Some(descriptor) = track.waveform_url.as_deref() else {
            debug!("Sound {} has no waveform descriptor", track.id);
            return Ok(WaveformResult::Unavailable);
        };

        // Prefer the true sample shape
        if let Ok(url) = Url::parse(descriptor) {
            if is_sample_document(&url) {
                if let Some(samples) = self.fetch_samples(&url).await {
                    info!(
                        "Resolved {} samples for sound {} from {descriptor}",
                        samples.len(),
                        track.id
                    );
                    return Ok(WaveformResult::Samples(samples));
                }
            }
        }

        // Fall back to a raster proxy
        for candidate in raster_candidates(descriptor) {
            if self.probe.loads(&candidate).await {
                info!("Resolved raster waveform for sound {}: {candidate}", track.id);
                return Ok(WaveformResult::Raster(candidate));
            }
        }

        debug!("No waveform data obtainable for sound {}", track.id);
        Ok(WaveformResult::Unavailable)
    }
}
