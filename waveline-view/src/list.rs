//! Track list view models.

use crate::format::format_duration;
use waveline_core::{PlaybackState, TrackCollection};

/// One rendered row of the track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    /// List position, also the argument for the row's toggle control
    pub index: usize,
    pub title: String,
    /// `m:ss` label, empty when the duration is zero or unknown
    pub duration_label: String,
    /// Whether this row is the current track
    pub is_current: bool,
    /// Whether this row's control should read as "pause"
    pub is_playing: bool,
    /// Controls are disabled until the bridge is ready
    pub enabled: bool,
    pub permalink_url: Option<String>,
}

/// Build one row per track from the loaded collection and playback state.
#[must_use]
pub fn track_rows(collection: &TrackCollection, state: &PlaybackState) -> Vec<TrackRow> {
    collection
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let is_current = state.current_index == Some(index);
            TrackRow {
                index,
                title: track.title.clone(),
                duration_label: format_duration(track.duration),
                is_current,
                is_playing: is_current && state.is_playing,
                enabled: state.is_ready,
                permalink_url: track.permalink_url.clone(),
            }
        })
        .collect()
}
