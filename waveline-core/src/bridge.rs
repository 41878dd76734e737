//! Bridge that owns the embedded player's control handle and translates its
//! native event stream into shared player state.
//!
//! The vendor control API arrives asynchronously, so the bridge polls the
//! host with a bounded retry budget. Exhausting the budget leaves the bridge
//! permanently un-ready; the page shows a loading affordance and nothing
//! crashes. All vendor calls are guarded so a vendor-side error never
//! propagates into the hosting page.

use crate::config::PlayerConfig;
use crate::store::PlayerStore;
use crate::track::{Track, TrackCollection};
use crate::waveform::{WaveformResolver, WaveformResult};
use crate::widget::{LoadOptions, WidgetControl, WidgetEvent, WidgetHost};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Bridge between the hosting page and the embedded vendor player.
pub struct WidgetBridge {
    store: Arc<PlayerStore>,
    host: Arc<dyn WidgetHost>,
    resolver: Arc<dyn WaveformResolver>,
    collection_url: String,
    load_options: LoadOptions,
    poll_attempts: u32,
    poll_interval: Duration,
    cancel_token: CancellationToken,
    control: RwLock<Option<Arc<dyn WidgetControl>>>,
}

impl WidgetBridge {
    /// Create a new bridge for one player instance.
    ///
    /// # Arguments
    /// * `store` - Shared state updated from widget events
    /// * `host` - Environment polled for the vendor control API
    /// * `resolver` - Waveform resolver invoked when the current track changes
    /// * `collection_url` - Vendor collection URL owning the track list
    /// * `config` - Poll budget and vendor load options
    /// * `cancel_token` - Optional external cancellation token for teardown
    pub fn new(
        store: Arc<PlayerStore>,
        host: Arc<dyn WidgetHost>,
        resolver: Arc<dyn WaveformResolver>,
        collection_url: impl Into<String>,
        config: &PlayerConfig,
        cancel_token: Option<CancellationToken>,
    ) -> Self {
        Self {
            store,
            host,
            resolver,
            collection_url: collection_url.into(),
            load_options: config.load.clone(),
            poll_attempts: config.widget.poll_attempts,
            poll_interval: Duration::from_millis(config.widget.poll_interval_ms),
            cancel_token: cancel_token.unwrap_or_default(),
            control: RwLock::new(None),
        }
    }

    /// Get a clone of the cancellation token
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Start the bridge in a background task: bind to the widget, then apply
    /// its events until teardown.
    #[must_use]
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        let Some(control) = self.bind().await else {
            warn!(
                "Widget control API did not appear within {} poll attempts; bridge stays un-ready",
                self.poll_attempts
            );
            return;
        };

        let mut rx = control.subscribe();
        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    info!("Widget bridge shutting down");
                    break;
                }
                event = rx.recv() => {
                    match event {
                        Ok(event) => self.apply_event(&control, event).await,
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(n)) => warn!("Missed {n} widget events"),
                    }
                }
            }
        }
    }

    /// Poll the host for the vendor control API, up to the configured budget.
    async fn bind(&self) -> Option<Arc<dyn WidgetControl>> {
        let mut interval = tokio::time::interval(self.poll_interval);
        for attempt in 1..=self.poll_attempts {
            tokio::select! {
                () = self.cancel_token.cancelled() => return None,
                _ = interval.tick() => {}
            }
            if let Some(control) = self.host.control() {
                debug!("Widget control API detected after {attempt} poll attempts");
                *self.control.write().await = Some(Arc::clone(&control));
                return Some(control);
            }
        }
        None
    }

    /// Apply one widget event. Events arrive at-most-once, in emission order,
    /// and state updates apply in that order.
    async fn apply_event(&self, control: &Arc<dyn WidgetControl>, event: WidgetEvent) {
        match event {
            WidgetEvent::Ready => {
                self.store.mark_ready().await;
                match control.sounds().await {
                    Ok(tracks) => {
                        self.store.set_collection(TrackCollection::new(tracks)).await;
                    }
                    Err(e) => warn!("Widget sound list fetch failed: {e}"),
                }
                self.refresh_current_sound(control).await;
                match control.is_paused().await {
                    Ok(paused) => self.store.set_playing(!paused).await,
                    Err(e) => warn!("Widget pause query failed: {e}"),
                }
            }
            WidgetEvent::Play => {
                self.store.set_playing(true).await;
                // The player may have advanced tracks on its own
                self.refresh_current_sound(control).await;
            }
            WidgetEvent::Pause => {
                self.store.set_playing(false).await;
            }
            WidgetEvent::Finish => {
                self.store.set_playing(false).await;
                self.store.reset_position().await;
            }
            WidgetEvent::PlayProgress { position } | WidgetEvent::Seek { position } => {
                self.store.set_position(position).await;
            }
        }
    }

    /// Re-query the current sound, reconcile it against the loaded list, and
    /// kick off waveform resolution if the track changed.
    async fn refresh_current_sound(&self, control: &Arc<dyn WidgetControl>) {
        let sound = match control.current_sound().await {
            Ok(Some(sound)) => sound,
            Ok(None) => return,
            Err(e) => {
                warn!("Widget current sound query failed: {e}");
                return;
            }
        };

        let duration = match sound.duration {
            Some(duration) => duration,
            None => control.duration().await.unwrap_or_default(),
        };

        let index = self.store.collection().await.index_of(sound.id);
        self.store.set_current(index, duration).await;

        if self.store.waveform_track().await != Some(sound.id) {
            self.spawn_waveform_resolution(sound);
        }
    }

    /// Resolve a track's waveform off the event loop. The result is validated
    /// against the current track when it lands; a stale result is discarded.
    fn spawn_waveform_resolution(&self, track: Track) {
        let resolver = Arc::clone(&self.resolver);
        let store = Arc::clone(&self.store);
        let cancel_token = self.cancel_token.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                () = cancel_token.cancelled() => return,
                result = resolver.resolve(&track) => result,
            };
            let result = match result {
                Ok(result) => result,
                Err(e) => {
                    debug!("Waveform resolution failed for sound {}: {e}", track.id);
                    WaveformResult::Unavailable
                }
            };
            if store.set_waveform(track.id, result).await {
                debug!("Applied waveform result for sound {}", track.id);
            }
        });
    }

    async fn control_if_ready(&self) -> Option<Arc<dyn WidgetControl>> {
        if !self.store.state().await.is_ready {
            return None;
        }
        self.control.read().await.clone()
    }

    /// Command the player to load the owning collection starting at `index`,
    /// with vendor chrome suppressed and auto-play on. Local state is updated
    /// optimistically and reconciled by the next real event. No-op before
    /// readiness.
    pub async fn load_track(&self, index: usize) {
        let Some(control) = self.control_if_ready().await else {
            return;
        };
        let options = self
            .load_options
            .clone()
            .with_auto_play(true)
            .with_start_track(index);
        if let Err(e) = control.load(&self.collection_url, &options).await {
            warn!("Widget load failed: {e}");
            return;
        }
        self.store.apply_optimistic_load(index).await;
    }

    /// Toggle playback for a list position: the current track inverts its
    /// queried pause state, any other track is loaded. No-op before readiness.
    pub async fn toggle_playback(&self, index: usize) {
        let Some(control) = self.control_if_ready().await else {
            return;
        };
        let current = self.store.state().await.current_index;
        if current == Some(index) {
            match control.is_paused().await {
                Ok(true) => {
                    if let Err(e) = control.play().await {
                        warn!("Widget play failed: {e}");
                    }
                }
                Ok(false) => {
                    if let Err(e) = control.pause().await {
                        warn!("Widget pause failed: {e}");
                    }
                }
                Err(e) => warn!("Widget pause query failed: {e}"),
            }
        } else {
            self.load_track(index).await;
        }
    }

    /// Command an absolute jump, with optimistic local position update for
    /// immediate visual feedback. No-op before readiness.
    pub async fn seek_to(&self, position: Duration) {
        let Some(control) = self.control_if_ready().await else {
            return;
        };
        if let Err(e) = control.seek_to(position).await {
            warn!("Widget seek failed: {e}");
            return;
        }
        self.store.set_position(position).await;
    }

    /// Load the next track in the collection, if there is one
    pub async fn next_track(&self) {
        let Some(current) = self.store.state().await.current_index else {
            return;
        };
        let len = self.store.collection().await.len();
        if current + 1 < len {
            self.load_track(current + 1).await;
        }
    }

    /// Load the previous track in the collection, if there is one
    pub async fn previous_track(&self) {
        let Some(current) = self.store.state().await.current_index else {
            return;
        };
        if current > 0 {
            self.load_track(current - 1).await;
        }
    }

    /// Tear down the bridge: cancel the poll/event tasks and release the
    /// control handle. The vendor exposes no destroy hook; dropping the
    /// reference is sufficient.
    pub async fn teardown(&self) {
        self.cancel_token.cancel();
        *self.control.write().await = None;
    }
}
