//! Audio subsystem: the transport thread, fade scheduling and the spectrum tap.
//!
//! The UI talks to the device thread through `AudioCmd` messages and observes
//! it through two shared handles: the playback session and the spectrum frame.

mod analyzer;
mod fade;
mod player;
mod sink;
mod thread;
mod types;

pub use analyzer::{SPECTRUM_BANDS, SpectrumFrame, SpectrumHandle};
pub use player::AudioPlayer;
pub use types::{AudioCmd, SessionHandle, SessionInfo};

#[cfg(test)]
mod tests;
