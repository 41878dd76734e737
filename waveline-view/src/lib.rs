pub mod controller;
pub mod format;
pub mod list;
pub mod scrubber;
pub mod waveform;

pub use controller::{PlayerController, PlayerViewModel};
pub use format::{format_duration, format_position};
pub use list::{track_rows, TrackRow};
pub use scrubber::{progress_fraction, scrub_target};
pub use waveform::{downsample, placeholder, WaveformView};
