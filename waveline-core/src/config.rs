use crate::error::Result;
use crate::widget::LoadOptions;
use serde::{Deserialize, Serialize};

/// Top-level player configuration.
///
/// Every field has a default matching the documented constants, so an empty
/// TOML document is a valid config. The page layer may override any section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub waveform: WaveformConfig,
    #[serde(default)]
    pub load: LoadOptions,
}

impl PlayerConfig {
    /// Parse a config from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML for this schema.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

/// Widget discovery and binding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Bounded number of polls for the vendor control API before giving up
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
    /// Interval between polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

const fn default_poll_attempts() -> u32 {
    120
}

const fn default_poll_interval() -> u64 {
    100
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            poll_attempts: default_poll_attempts(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// Waveform presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformConfig {
    /// Column count real sample data is downsampled to
    #[serde(default = "default_sample_columns")]
    pub sample_columns: usize,
    /// Bar count for the seeded placeholder
    #[serde(default = "default_placeholder_bars")]
    pub placeholder_bars: usize,
}

const fn default_sample_columns() -> usize {
    160
}

const fn default_placeholder_bars() -> usize {
    64
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            sample_columns: default_sample_columns(),
            placeholder_bars: default_placeholder_bars(),
        }
    }
}
