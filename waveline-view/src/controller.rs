//! Player controller: snapshots store state into view models and translates
//! user gestures into bridge commands.

use crate::format::format_position;
use crate::list::{track_rows, TrackRow};
use crate::scrubber::{progress_fraction, scrub_target};
use crate::waveform::WaveformView;
use std::sync::Arc;
use waveline_core::{PlayerStore, WaveformConfig, WidgetBridge};

/// Everything the page layer needs to render one player instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerViewModel {
    /// Controls are disabled and a loading affordance shown while false
    pub ready: bool,
    pub is_playing: bool,
    /// Played fraction of the scrubber, in `[0, 1]`
    pub progress: f64,
    pub waveform: WaveformView,
    pub rows: Vec<TrackRow>,
    /// `position / duration` readout
    pub time_label: String,
}

/// Composes the store and bridge into an interactive scrubber and playlist.
pub struct PlayerController {
    store: Arc<PlayerStore>,
    bridge: Arc<WidgetBridge>,
    waveform_config: WaveformConfig,
}

impl PlayerController {
    /// Create a controller over a store/bridge pair
    pub fn new(
        store: Arc<PlayerStore>,
        bridge: Arc<WidgetBridge>,
        waveform_config: WaveformConfig,
    ) -> Self {
        Self {
            store,
            bridge,
            waveform_config,
        }
    }

    /// Snapshot the current state as a renderable view model
    pub async fn view(&self) -> PlayerViewModel {
        let state = self.store.state().await;
        let collection = self.store.collection().await;
        let waveform = self.store.waveform().await;
        let current_id = state
            .current_index
            .and_then(|index| collection.get(index))
            .map(|track| track.id);

        PlayerViewModel {
            ready: state.is_ready,
            is_playing: state.is_playing,
            progress: progress_fraction(state.position, state.duration),
            waveform: WaveformView::from_result(
                &waveform,
                current_id,
                self.waveform_config.sample_columns,
                self.waveform_config.placeholder_bars,
            ),
            rows: track_rows(&collection, &state),
            time_label: format_position(state.position, state.duration),
        }
    }

    /// Row control click: toggle playback for that list position
    pub async fn toggle_row(&self, index: usize) {
        self.bridge.toggle_playback(index).await;
    }

    /// Scrubber click at `offset_x` within a track rendered `width` wide
    pub async fn scrub(&self, offset_x: f64, width: f64) {
        let duration = self.store.state().await.duration;
        if duration.is_zero() {
            return;
        }
        self.bridge
            .seek_to(scrub_target(offset_x, width, duration))
            .await;
    }

    /// Skip to the next track in the collection
    pub async fn next(&self) {
        self.bridge.next_track().await;
    }

    /// Skip to the previous track in the collection
    pub async fn previous(&self) {
        self.bridge.previous_track().await;
    }
}
