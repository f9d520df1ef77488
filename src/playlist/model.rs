//! Playlist model types: `Track`, the `Playlist` and its navigation lookups.
//!
//! The navigation helpers are pure functions over the list length so both the
//! UI and the audio thread can share them without sharing the list itself.

use std::path::PathBuf;
use std::time::Duration;

/// A single playlist entry. Immutable once scanned.
#[derive(Clone)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub display: String,
}

/// Index of the entry after `current`, wrapping last -> first.
/// With no current entry, starts at the first. Used by manual navigation only.
pub fn next_wrapping(len: usize, current: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(i) if i + 1 < len => Some(i + 1),
        Some(_) => Some(0),
        None => Some(0),
    }
}

/// Index of the entry before `current`, wrapping first -> last.
/// With no current entry, starts at the last. Used by manual navigation only.
pub fn prev_wrapping(len: usize, current: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(0) | None => Some(len - 1),
        Some(i) => Some(i - 1),
    }
}

/// Index of the entry after `current` without wrapping.
/// Used by natural end-of-track advance: `None` on the last entry.
pub fn successor(len: usize, current: usize) -> Option<usize> {
    if current + 1 < len { Some(current + 1) } else { None }
}

/// The ordered track list plus the single "now loaded" marker.
///
/// The marker is the only mutable state here; the tracks themselves are never
/// touched after construction.
pub struct Playlist {
    tracks: Vec<Track>,
    selected: Option<usize>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, i: usize) -> Option<&Track> {
        self.tracks.get(i)
    }

    /// The single marked entry, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Mark `i` as the loaded entry. Out-of-range indices are ignored so the
    /// marker can never point outside the list.
    pub fn select(&mut self, i: usize) {
        if i < self.tracks.len() {
            self.selected = Some(i);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn next_wrapping(&self, current: Option<usize>) -> Option<usize> {
        next_wrapping(self.tracks.len(), current)
    }

    pub fn prev_wrapping(&self, current: Option<usize>) -> Option<usize> {
        prev_wrapping(self.tracks.len(), current)
    }

    pub fn successor(&self, current: usize) -> Option<usize> {
        successor(self.tracks.len(), current)
    }
}
