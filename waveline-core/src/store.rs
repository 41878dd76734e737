use crate::playback::PlaybackState;
use crate::track::{Track, TrackCollection};
use crate::waveform::WaveformResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Events broadcast to the page layer as player state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Control channel bound and the player confirmed initialization
    Ready,
    /// Track list replaced from the embedded player
    CollectionLoaded { track_count: usize },
    /// Current track changed
    TrackChanged { index: usize },
    /// Playing/paused flipped
    PlaybackChanged { is_playing: bool },
    /// Playback position moved
    PositionChanged { position: Duration },
    /// Waveform data for the current track was applied
    WaveformChanged,
}

struct PlayerStoreInner {
    state: PlaybackState,
    collection: TrackCollection,
    waveform: WaveformResult,
    /// Sound id the stored waveform belongs to
    waveform_for: Option<u64>,
}

/// Shared player state, owned by the bridge/controller pair.
///
/// All mutation goes through the bridge (widget events or validated user
/// commands); the page layer only observes via [`PlayerEvent`]s and snapshot
/// getters.
pub struct PlayerStore {
    inner: RwLock<PlayerStoreInner>,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl PlayerStore {
    /// Create a new store with empty state
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Subscribe to player events
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    /// Get current playback state
    pub async fn state(&self) -> PlaybackState {
        self.inner.read().await.state.clone()
    }

    /// Get the loaded track collection
    pub async fn collection(&self) -> TrackCollection {
        self.inner.read().await.collection.clone()
    }

    /// Get the waveform data for the current track
    pub async fn waveform(&self) -> WaveformResult {
        self.inner.read().await.waveform.clone()
    }

    /// Sound id the stored waveform was resolved for, if any
    pub async fn waveform_track(&self) -> Option<u64> {
        self.inner.read().await.waveform_for
    }

    /// Get the current track, if one is selected and the collection knows it
    pub async fn current_track(&self) -> Option<Track> {
        let inner = self.inner.read().await;
        inner
            .state
            .current_index
            .and_then(|index| inner.collection.get(index))
            .cloned()
    }

    /// Mark the control channel ready.
    ///
    /// Readiness is monotonic for a live instance: false to true only.
    pub async fn mark_ready(&self) {
        let mut inner = self.inner.write().await;
        if inner.state.is_ready {
            return;
        }
        inner.state.is_ready = true;
        let _ = self.event_tx.send(PlayerEvent::Ready);
    }

    /// Replace the track collection wholesale
    pub async fn set_collection(&self, collection: TrackCollection) {
        let track_count = collection.len();
        self.inner.write().await.collection = collection;
        let _ = self.event_tx.send(PlayerEvent::CollectionLoaded { track_count });
    }

    /// Update the current track position in the list and its duration.
    ///
    /// `index` of `None` keeps the previous selection, defaulting to the first
    /// track, mirroring how the vendor reports sounds the list does not know
    /// yet. A change of selection invalidates the stored waveform.
    pub async fn set_current(&self, index: Option<usize>, duration: Duration) {
        let mut inner = self.inner.write().await;
        let resolved = index.or(inner.state.current_index).unwrap_or(0);
        let changed = inner.state.current_index != Some(resolved);
        inner.state.current_index = Some(resolved);
        inner.state.duration = duration;
        inner.state.position = inner.state.position.min(duration);
        if changed {
            inner.waveform = WaveformResult::Unavailable;
            inner.waveform_for = None;
            let _ = self.event_tx.send(PlayerEvent::TrackChanged { index: resolved });
        }
    }

    /// Set the playing flag, emitting an event only on change
    pub async fn set_playing(&self, is_playing: bool) {
        let mut inner = self.inner.write().await;
        if inner.state.is_playing == is_playing {
            return;
        }
        inner.state.is_playing = is_playing;
        let _ = self.event_tx.send(PlayerEvent::PlaybackChanged { is_playing });
    }

    /// Update the playback position, clamped to the current duration
    pub async fn set_position(&self, position: Duration) {
        let mut inner = self.inner.write().await;
        let clamped = inner.state.clamp_position(position);
        inner.state.position = clamped;
        let _ = self.event_tx.send(PlayerEvent::PositionChanged { position: clamped });
    }

    /// Reset the position to zero (track finished)
    pub async fn reset_position(&self) {
        self.set_position(Duration::ZERO).await;
    }

    /// Apply the optimistic local state for a `load_track` command: selection,
    /// playing flag, and position are set immediately and reconciled by the
    /// next real `ready`/`play` event from the player.
    pub async fn apply_optimistic_load(&self, index: usize) {
        let mut inner = self.inner.write().await;
        let changed = inner.state.current_index != Some(index);
        inner.state.current_index = Some(index);
        inner.state.position = Duration::ZERO;
        if let Some(duration) = inner.collection.get(index).and_then(|t| t.duration) {
            inner.state.duration = duration;
        }
        if changed {
            inner.waveform = WaveformResult::Unavailable;
            inner.waveform_for = None;
            let _ = self.event_tx.send(PlayerEvent::TrackChanged { index });
        }
        if !inner.state.is_playing {
            inner.state.is_playing = true;
            let _ = self
                .event_tx
                .send(PlayerEvent::PlaybackChanged { is_playing: true });
        }
        let _ = self.event_tx.send(PlayerEvent::PositionChanged {
            position: Duration::ZERO,
        });
    }

    /// Store a resolution result, unless the player has moved on to another
    /// track while it was in flight. Returns whether the result was applied.
    pub async fn set_waveform(&self, sound_id: u64, result: WaveformResult) -> bool {
        let mut inner = self.inner.write().await;
        let current_id = inner
            .state
            .current_index
            .and_then(|index| inner.collection.get(index))
            .map(|track| track.id);
        if current_id != Some(sound_id) {
            debug!("Discarding waveform result for sound {sound_id}: no longer current");
            return false;
        }
        inner.waveform = result;
        inner.waveform_for = Some(sound_id);
        let _ = self.event_tx.send(PlayerEvent::WaveformChanged);
        true
    }
}

impl Default for PlayerStore {
    fn default() -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            inner: RwLock::new(PlayerStoreInner {
                state: PlaybackState::default(),
                collection: TrackCollection::default(),
                waveform: WaveformResult::Unavailable,
                waveform_for: None,
            }),
            event_tx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_tracks() -> TrackCollection {
        TrackCollection::new(vec![
            Track::new(11, "First").with_duration(Duration::from_millis(60_000)),
            Track::new(22, "Second").with_duration(Duration::from_millis(125_000)),
            Track::new(33, "Third").with_duration(Duration::from_millis(40_000)),
        ])
    }

    #[tokio::test]
    async fn test_readiness_is_monotonic() {
        let store = PlayerStore::new();
        let mut rx = store.subscribe();
        store.mark_ready().await;
        store.mark_ready().await;
        assert!(store.state().await.is_ready);
        assert_eq!(rx.recv().await.ok(), Some(PlayerEvent::Ready));
        // Second mark_ready must not emit again
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_position_clamped_to_duration() {
        let store = PlayerStore::new();
        store.set_collection(three_tracks()).await;
        store.set_current(Some(0), Duration::from_millis(60_000)).await;
        store.set_position(Duration::from_millis(90_000)).await;
        assert_eq!(store.state().await.position, Duration::from_millis(60_000));
    }

    #[tokio::test]
    async fn test_track_change_invalidates_waveform() {
        let store = PlayerStore::new();
        store.set_collection(three_tracks()).await;
        store.set_current(Some(0), Duration::from_millis(60_000)).await;
        assert!(store.set_waveform(11, WaveformResult::Samples(vec![1.0])).await);
        store.set_current(Some(1), Duration::from_millis(125_000)).await;
        assert_eq!(store.waveform().await, WaveformResult::Unavailable);
        assert_eq!(store.waveform_track().await, None);
    }

    #[tokio::test]
    async fn test_stale_waveform_result_rejected() {
        let store = PlayerStore::new();
        store.set_collection(three_tracks()).await;
        store.set_current(Some(1), Duration::from_millis(125_000)).await;
        // Result for sound 11 arrives while sound 22 is current
        assert!(!store.set_waveform(11, WaveformResult::Samples(vec![1.0])).await);
        assert_eq!(store.waveform().await, WaveformResult::Unavailable);
        assert!(store.set_waveform(22, WaveformResult::Raster("https://wis.sndcdn.com/a.png".into())).await);
        assert!(store.waveform().await.is_available());
    }

    #[tokio::test]
    async fn test_set_current_keeps_previous_selection_for_unknown() {
        let store = PlayerStore::new();
        store.set_collection(three_tracks()).await;
        store.set_current(Some(2), Duration::from_millis(40_000)).await;
        store.set_current(None, Duration::from_millis(40_000)).await;
        assert_eq!(store.state().await.current_index, Some(2));
    }

    #[tokio::test]
    async fn test_optimistic_load_sets_local_state() {
        let store = PlayerStore::new();
        store.set_collection(three_tracks()).await;
        store.apply_optimistic_load(1).await;
        let state = store.state().await;
        assert_eq!(state.current_index, Some(1));
        assert!(state.is_playing);
        assert_eq!(state.position, Duration::ZERO);
        assert_eq!(state.duration, Duration::from_millis(125_000));
    }
}
