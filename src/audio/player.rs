use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::playlist::Track;

use super::analyzer::{SpectrumFrame, SpectrumHandle};
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, SessionHandle, SessionInfo};

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    session: SessionHandle,
    spectrum: SpectrumHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(tracks: Vec<Track>, audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let session: SessionHandle = Arc::new(Mutex::new(SessionInfo::default()));
        // The analysis frame is created exactly once here and shared with
        // every sink the device thread builds; it is never reconnected.
        let spectrum: SpectrumHandle = Arc::new(Mutex::new(SpectrumFrame::default()));

        let audio_handle = spawn_audio_thread(
            tracks,
            rx,
            session.clone(),
            spectrum.clone(),
            audio_settings,
        );

        Self {
            tx,
            session,
            spectrum,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn session_handle(&self) -> SessionHandle {
        self.session.clone()
    }

    pub fn spectrum_handle(&self) -> SpectrumHandle {
        self.spectrum.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
