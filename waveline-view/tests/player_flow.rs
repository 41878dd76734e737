//! End-to-end flow: mock widget -> bridge -> store -> view models.

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use waveline_core::{
    LoadOptions, PlayerConfig, PlayerStore, Result, Track, WaveformResolver, WaveformResult,
    WidgetBridge, WidgetControl, WidgetEvent, WidgetHost,
};
use waveline_view::{PlayerController, WaveformView};

struct MockWidgetState {
    paused: bool,
    sounds: Vec<Track>,
    current: Option<Track>,
    duration: Duration,
}

struct MockWidget {
    event_tx: broadcast::Sender<WidgetEvent>,
    state: Mutex<MockWidgetState>,
    play_calls: AtomicUsize,
    pause_calls: AtomicUsize,
    seek_calls: Mutex<Vec<Duration>>,
    load_calls: Mutex<Vec<LoadOptions>>,
}

impl MockWidget {
    fn new(sounds: Vec<Track>) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(64);
        let current = sounds.first().cloned();
        let duration = current.as_ref().and_then(|t| t.duration).unwrap_or_default();
        Arc::new(Self {
            event_tx,
            state: Mutex::new(MockWidgetState {
                paused: true,
                sounds,
                current,
                duration,
            }),
            play_calls: AtomicUsize::new(0),
            pause_calls: AtomicUsize::new(0),
            seek_calls: Mutex::new(Vec::new()),
            load_calls: Mutex::new(Vec::new()),
        })
    }

    fn emit(&self, event: WidgetEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[async_trait]
impl WidgetControl for MockWidget {
    fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.event_tx.subscribe()
    }

    async fn play(&self) -> Result<()> {
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().paused = false;
        self.emit(WidgetEvent::Play);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().paused = true;
        self.emit(WidgetEvent::Pause);
        Ok(())
    }

    async fn load(&self, _collection_url: &str, options: &LoadOptions) -> Result<()> {
        self.load_calls.lock().unwrap().push(options.clone());
        {
            let mut state = self.state.lock().unwrap();
            if let Some(index) = options.start_track {
                state.current = state.sounds.get(index).cloned();
                state.duration = state
                    .current
                    .as_ref()
                    .and_then(|t| t.duration)
                    .unwrap_or_default();
            }
            state.paused = !options.auto_play;
        }
        if options.auto_play {
            self.emit(WidgetEvent::Play);
        }
        Ok(())
    }

    async fn seek_to(&self, position: Duration) -> Result<()> {
        self.seek_calls.lock().unwrap().push(position);
        self.emit(WidgetEvent::Seek { position });
        Ok(())
    }

    async fn sounds(&self) -> Result<Vec<Track>> {
        Ok(self.state.lock().unwrap().sounds.clone())
    }

    async fn current_sound(&self) -> Result<Option<Track>> {
        Ok(self.state.lock().unwrap().current.clone())
    }

    async fn duration(&self) -> Result<Duration> {
        Ok(self.state.lock().unwrap().duration)
    }

    async fn is_paused(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().paused)
    }
}

struct MockHost {
    control: Arc<dyn WidgetControl>,
}

impl WidgetHost for MockHost {
    fn control(&self) -> Option<Arc<dyn WidgetControl>> {
        Some(Arc::clone(&self.control))
    }
}

struct RasterResolver;

#[async_trait]
impl WaveformResolver for RasterResolver {
    fn name(&self) -> &'static str {
        "raster-stub"
    }

    async fn resolve(&self, track: &Track) -> Result<WaveformResult> {
        Ok(WaveformResult::Raster(format!(
            "https://wis.sndcdn.com/{}.png",
            track.id
        )))
    }
}

fn three_tracks() -> Vec<Track> {
    vec![
        Track::new(11, "First").with_duration(Duration::from_millis(60_000)),
        Track::new(22, "Second").with_duration(Duration::from_millis(125_000)),
        Track::new(33, "Third").with_duration(Duration::from_millis(40_000)),
    ]
}

struct Player {
    widget: Arc<MockWidget>,
    controller: PlayerController,
}

fn player() -> Player {
    let widget = MockWidget::new(three_tracks());
    let mut config = PlayerConfig::default();
    config.widget.poll_attempts = 5;
    config.widget.poll_interval_ms = 10;

    let store = PlayerStore::new();
    let bridge = Arc::new(WidgetBridge::new(
        Arc::clone(&store),
        Arc::new(MockHost {
            control: widget.clone(),
        }),
        Arc::new(RasterResolver),
        "https://soundcloud.com/label/sets/releases",
        &config,
        None,
    ));
    let _handle = Arc::clone(&bridge).start();
    let controller = PlayerController::new(store, bridge, config.waveform);
    Player { widget, controller }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test(start_paused = true)]
async fn test_full_player_flow() {
    let Player { widget, controller } = player();
    settle().await;

    // Before the widget announces readiness the page shows disabled rows
    let view = controller.view().await;
    assert!(!view.ready);
    assert!(view.rows.is_empty());

    widget.emit(WidgetEvent::Ready);
    settle().await;

    let view = controller.view().await;
    assert!(view.ready);
    assert!(!view.is_playing);
    let labels: Vec<_> = view
        .rows
        .iter()
        .map(|row| row.duration_label.as_str())
        .collect();
    assert_eq!(labels, vec!["1:00", "2:05", "0:40"]);
    assert!(view.rows[0].is_current);
    assert!(view.rows.iter().all(|row| row.enabled));
    assert_eq!(view.time_label, " / 1:00");
    assert_eq!(
        view.waveform,
        WaveformView::Raster("https://wis.sndcdn.com/11.png".into())
    );

    // Clicking the second row loads that list position with auto-play
    controller.toggle_row(1).await;
    settle().await;

    let loads = widget.load_calls.lock().unwrap().clone();
    assert_eq!(loads.len(), 1);
    assert!(loads[0].auto_play);
    assert_eq!(loads[0].start_track, Some(1));

    let view = controller.view().await;
    assert!(view.is_playing);
    assert!(view.rows[1].is_current);
    assert!(view.rows[1].is_playing);
    assert!(!view.rows[0].is_current);
    assert_eq!(
        view.waveform,
        WaveformView::Raster("https://wis.sndcdn.com/22.png".into())
    );

    // Toggling the now-current row pauses it
    controller.toggle_row(1).await;
    settle().await;
    assert_eq!(widget.pause_calls.load(Ordering::SeqCst), 1);
    let view = controller.view().await;
    assert!(!view.is_playing);
    assert!(view.rows[1].is_current);
    assert!(!view.rows[1].is_playing);
}

#[tokio::test(start_paused = true)]
async fn test_scrub_through_controller() {
    let Player { widget, controller } = player();
    settle().await;
    widget.emit(WidgetEvent::Ready);
    settle().await;

    // Quarter-width click on the 60s track seeks to 15s
    controller.scrub(100.0, 400.0).await;
    settle().await;
    assert_eq!(
        widget.seek_calls.lock().unwrap().clone(),
        vec![Duration::from_millis(15_000)]
    );

    let view = controller.view().await;
    assert!((view.progress - 0.25).abs() < 1e-9);
    assert_eq!(view.time_label, "0:15 / 1:00");
}

#[tokio::test(start_paused = true)]
async fn test_scrub_with_no_duration_is_noop() {
    let Player { widget, controller } = player();
    settle().await;
    // Never ready; duration stays zero
    controller.scrub(100.0, 400.0).await;
    assert!(widget.seek_calls.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_next_previous_walk_the_collection() {
    let Player { widget, controller } = player();
    settle().await;
    widget.emit(WidgetEvent::Ready);
    settle().await;

    controller.next().await;
    settle().await;
    let view = controller.view().await;
    assert!(view.rows[1].is_current);

    controller.previous().await;
    settle().await;
    let view = controller.view().await;
    assert!(view.rows[0].is_current);

    // No previous track before the first; no load issued
    controller.previous().await;
    settle().await;
    assert_eq!(widget.load_calls.lock().unwrap().len(), 2);
}
