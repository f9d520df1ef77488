//! Audio-related small types and handles.
//!
//! This module defines the command enum understood by the device thread and
//! the shared playback session the UI observes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Load and start the track at the given playlist index, fading in.
    /// Out-of-range indices are silent no-ops.
    Load(usize),
    /// Toggle pause/resume on the current sink.
    TogglePause,
    /// Load the following track; the first when nothing is current.
    /// Wraps last -> first.
    Next,
    /// Rewind to the start when far enough into the track, otherwise load the
    /// preceding track; the last when nothing is current. Wraps first -> last.
    Prev,
    /// Seek to the given fraction of the track duration, in [0, 1].
    /// A no-op while the duration is unknown.
    SeekTo(f32),
    /// Apply the slider volume and mute flag to the output gain.
    SetVolume { level: f32, muted: bool },
    /// Fade the volume to zero, then pause, clear the source and hide the
    /// player. Teardown runs strictly after the fade completes.
    Dismiss,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// The live playback session shared with the UI.
///
/// Exactly one of these exists per player; it is rewritten wholesale on track
/// change and only ever mutated by the device thread.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Currently loaded track index in the playlist (if any).
    pub index: Option<usize>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Total duration of the current track, when metadata provided one.
    pub duration: Option<Duration>,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Slider volume in [0, 1]. The actual output gain may differ while a
    /// fade is in flight.
    pub volume: f32,
    /// Whether the output is muted.
    pub muted: bool,
    /// Host-container signal: true from load until dismiss teardown finishes.
    pub visible: bool,
    /// Last playback failure, kept for the status line. Cleared on load.
    pub last_error: Option<String>,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            index: None,
            elapsed: Duration::ZERO,
            duration: None,
            playing: false,
            volume: 1.0,
            muted: false,
            visible: false,
            last_error: None,
        }
    }
}

pub type SessionHandle = Arc<Mutex<SessionInfo>>;
