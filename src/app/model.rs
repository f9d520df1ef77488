//! Application model types: `App` and `PlaybackState`.
//!
//! The `App` struct holds the playlist, the list cursor, the volume
//! controller and a mirror of the device thread's session, refreshed once
//! per frame by the runtime.

use crate::audio::{SessionHandle, SessionInfo, SpectrumHandle};
use crate::playlist::{Playlist, Track};

use super::volume::VolumeControl;

/// The playback state of the application as mirrored from the device.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing loaded; the player pane is hidden.
    #[default]
    Idle,
    Playing,
    Paused,
}

/// The main application model.
pub struct App {
    pub playlist: Playlist,
    /// List cursor (which entry Enter would load). Independent of the
    /// playlist's "now loaded" marker.
    pub cursor: usize,
    pub playback: PlaybackState,
    pub volume: VolumeControl,
    /// Whether the player pane is shown. Follows the session's host-container
    /// signal: set on load, cleared after the dismiss fade finishes.
    pub player_visible: bool,

    pub session_handle: Option<SessionHandle>,
    pub spectrum_handle: Option<SpectrumHandle>,
    pub current_dir: Option<String>,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            playlist: Playlist::new(tracks),
            cursor: 0,
            playback: PlaybackState::Idle,
            volume: VolumeControl::new(1.0),
            player_visible: false,
            session_handle: None,
            spectrum_handle: None,
            current_dir: None,
        }
    }

    /// Attach the `SessionHandle` used to observe playback progress.
    pub fn set_session_handle(&mut self, h: SessionHandle) {
        self.session_handle = Some(h);
    }

    /// Attach the `SpectrumHandle` the visualizer reads each frame.
    pub fn set_spectrum_handle(&mut self, h: SpectrumHandle) {
        self.spectrum_handle = Some(h);
    }

    /// Record the current directory in the app state.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Return true if the playlist contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    /// Snapshot the shared session for this frame. Defaults when no handle is
    /// attached yet (startup) or the lock is poisoned.
    pub fn session_snapshot(&self) -> SessionInfo {
        self.session_handle
            .as_ref()
            .and_then(|h| h.lock().ok().map(|info| info.clone()))
            .unwrap_or_default()
    }

    /// Mirror a session snapshot into the UI-side state: playback state,
    /// player visibility and the single now-playing marker.
    pub fn apply_session(&mut self, info: &SessionInfo) {
        self.player_visible = info.visible;
        self.playback = if !info.visible {
            PlaybackState::Idle
        } else if info.playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };

        match info.index {
            Some(i) => self.playlist.select(i),
            None => self.playlist.clear_selection(),
        }
    }

    /// Move the list cursor down, wrapping at the end.
    pub fn cursor_next(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    /// Move the list cursor up, wrapping at the start.
    pub fn cursor_prev(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.cursor = (self.cursor + len - 1) % len;
        }
    }

    pub fn cursor_first(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_last(&mut self) {
        self.cursor = self.playlist.len().saturating_sub(1);
    }
}
