//! Track and collection model for the embedded player.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A single sound as reported by the embedded player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Vendor sound id, unique within a collection
    pub id: u64,
    /// Track title
    pub title: String,
    /// Track duration, if the vendor reported one
    pub duration: Option<Duration>,
    /// Waveform descriptor URL; may point at a JSON sample document or a
    /// raster image depending on the track's age
    pub waveform_url: Option<String>,
    /// Public permalink for the track
    pub permalink_url: Option<String>,
}

impl Track {
    /// Create a new track with just an id and title
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            duration: None,
            waveform_url: None,
            permalink_url: None,
        }
    }

    /// Set the track duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the waveform descriptor URL
    #[must_use]
    pub fn with_waveform_url(mut self, url: impl Into<String>) -> Self {
        self.waveform_url = Some(url.into());
        self
    }

    /// Set the public permalink
    #[must_use]
    pub fn with_permalink_url(mut self, url: impl Into<String>) -> Self {
        self.permalink_url = Some(url.into());
        self
    }
}

/// Ordered set of tracks loaded from a single collection URL.
///
/// Immutable once loaded; the bridge replaces it wholesale when the embedded
/// player reloads. Keeps a sound-id index so events carrying a vendor id can
/// be reconciled against list positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackCollection {
    tracks: Vec<Track>,
    index_by_id: HashMap<u64, usize>,
}

impl TrackCollection {
    /// Build a collection from the ordered track list
    #[must_use]
    pub fn new(tracks: Vec<Track>) -> Self {
        let index_by_id = tracks
            .iter()
            .enumerate()
            .map(|(index, track)| (track.id, index))
            .collect();
        Self {
            tracks,
            index_by_id,
        }
    }

    /// Get a track by list position
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Find the list position of a vendor sound id
    #[must_use]
    pub fn index_of(&self, sound_id: u64) -> Option<usize> {
        self.index_by_id.get(&sound_id).copied()
    }

    /// Number of tracks in the collection
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the collection is empty (not yet loaded, or vendor returned nothing)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Iterate over tracks in list order
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }
}

impl<'a> IntoIterator for &'a TrackCollection {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
