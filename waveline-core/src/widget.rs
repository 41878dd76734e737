//! Capability contract for the embedded third-party player.
//!
//! The vendor widget lives in a sandboxed embed and is reachable only through
//! an asynchronous control API discovered at runtime. Nothing here performs
//! network or DOM work; the hosting environment supplies an implementation of
//! [`WidgetControl`] through a [`WidgetHost`].

use crate::error::Result;
use crate::track::Track;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Events emitted by the embedded player.
///
/// Delivered at-most-once, in emission order; the bridge applies them in that
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Control channel established and the player finished initializing
    Ready,
    /// Playback started or resumed
    Play,
    /// Playback paused
    Pause,
    /// Current track played to its end
    Finish,
    /// Periodic position report during playback
    PlayProgress { position: Duration },
    /// Position jumped because of a seek
    Seek { position: Duration },
}

/// Options forwarded to the embedded player when loading a collection.
///
/// Defaults suppress all vendor UI chrome; the page renders its own controls
/// from bridge state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    #[serde(default)]
    pub auto_play: bool,
    #[serde(default)]
    pub visual: bool,
    #[serde(default)]
    pub show_artwork: bool,
    #[serde(default)]
    pub show_user: bool,
    #[serde(default)]
    pub show_teaser: bool,
    #[serde(default = "default_true")]
    pub hide_related: bool,
    #[serde(default)]
    pub show_comments: bool,
    /// Accent color passed to the vendor player, hex without `#`
    #[serde(default = "default_color")]
    pub color: String,
    /// List position the player should start from
    #[serde(default)]
    pub start_track: Option<usize>,
}

const fn default_true() -> bool {
    true
}

fn default_color() -> String {
    "000000".to_string()
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            auto_play: false,
            visual: false,
            show_artwork: false,
            show_user: false,
            show_teaser: false,
            hide_related: true,
            show_comments: false,
            color: default_color(),
            start_track: None,
        }
    }
}

impl LoadOptions {
    /// Set auto-play
    #[must_use]
    pub const fn with_auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = auto_play;
        self
    }

    /// Set the starting list position
    #[must_use]
    pub const fn with_start_track(mut self, index: usize) -> Self {
        self.start_track = Some(index);
        self
    }
}

/// Build the embed URL the page layer uses to mount the hidden player.
///
/// The iframe is sized but invisible; it exists only as the playback engine
/// behind the custom controls.
#[must_use]
pub fn embed_url(collection_url: &str, options: &LoadOptions) -> String {
    format!(
        "https://w.soundcloud.com/player/?url={}&auto_play={}&hide_related={}&show_comments={}&show_user={}&show_reposts=false&show_teaser={}&visual={}&show_artwork={}&color={}",
        urlencoding::encode(collection_url),
        options.auto_play,
        options.hide_related,
        options.show_comments,
        options.show_user,
        options.show_teaser,
        options.visual,
        options.show_artwork,
        options.color,
    )
}

/// Control handle for the embedded player.
///
/// Every call crosses into vendor territory and may fail there; callers must
/// treat failures as no-ops so a vendor-side error never propagates into the
/// hosting page.
#[async_trait]
pub trait WidgetControl: Send + Sync {
    /// Subscribe to the player's event stream
    fn subscribe(&self) -> broadcast::Receiver<WidgetEvent>;

    /// Start or resume playback
    async fn play(&self) -> Result<()>;

    /// Pause playback
    async fn pause(&self) -> Result<()>;

    /// Load a collection URL into the player
    async fn load(&self, collection_url: &str, options: &LoadOptions) -> Result<()>;

    /// Jump to an absolute position in the current track
    async fn seek_to(&self, position: Duration) -> Result<()>;

    /// Full ordered sound list of the loaded collection
    async fn sounds(&self) -> Result<Vec<Track>>;

    /// Currently loaded sound, if any
    async fn current_sound(&self) -> Result<Option<Track>>;

    /// Duration of the current track
    async fn duration(&self) -> Result<Duration>;

    /// Whether the player is paused
    async fn is_paused(&self) -> Result<bool>;
}

/// Hosting environment that may eventually expose the widget control API.
///
/// The vendor script loads asynchronously and announces nothing on arrival,
/// so the bridge polls this with a bounded retry budget.
pub trait WidgetHost: Send + Sync {
    /// The control handle, once the vendor API has appeared
    fn control(&self) -> Option<Arc<dyn WidgetControl>>;
}
