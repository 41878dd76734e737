pub mod bridge;
pub mod config;
pub mod error;
pub mod playback;
pub mod store;
pub mod time;
pub mod track;
pub mod waveform;
pub mod widget;

pub use bridge::WidgetBridge;
pub use config::{PlayerConfig, WaveformConfig, WidgetConfig};
pub use error::{CoreError, Result};
pub use playback::PlaybackState;
pub use store::{PlayerEvent, PlayerStore};
pub use time::DurationExt;
pub use track::{Track, TrackCollection};
pub use waveform::{normalize_samples, WaveformResolver, WaveformResult};
pub use widget::{embed_url, LoadOptions, WidgetControl, WidgetEvent, WidgetHost};
