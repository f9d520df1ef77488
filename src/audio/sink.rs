//! Utilities for creating `rodio` sinks from `Track` values.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position, with every source routed
//! through the spectrum tap. Failures are reported, not fatal: a track that
//! cannot start leaves the player paused with the error on the session.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use rodio::{Decoder, MixerDeviceSink, Player, Source};
use thiserror::Error;

use crate::playlist::Track;

use super::analyzer::{SpectrumHandle, TapSource};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
}

/// Create a paused `Sink` for `track` that starts playback at `start_at`,
/// tapped for spectrum analysis.
pub(super) fn create_sink_at(
    handle: &MixerDeviceSink,
    track: &Track,
    start_at: Duration,
    spectrum: &SpectrumHandle,
) -> Result<Player, SinkError> {
    let file = File::open(&track.path).map_err(|source| SinkError::Open {
        path: track.path.clone(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|source| SinkError::Decode {
            path: track.path.clone(),
            source,
        })?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Player::connect_new(handle.mixer());
    sink.append(TapSource::new(source, spectrum.clone()));
    sink.pause();
    Ok(sink)
}
