//! The device thread: owns the output stream, the current sink and the fade
//! scheduler, and runs the transport state machine.
//!
//! Everything here reacts to `AudioCmd` messages; between messages the loop
//! wakes every few milliseconds to advance fades, detect natural track end
//! and decay the spectrum while idle. Ordering matters in one place only:
//! dismiss teardown runs strictly after the fade-out reaches zero.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{DeviceSinkBuilder, MixerDeviceSink, Player};

use crate::config::AudioSettings;
use crate::playlist::{self, Track};

use super::analyzer::{SpectrumHandle, decay_idle};
use super::fade::{FadeScheduler, FadeThen, advance};
use super::sink::create_sink_at;
use super::types::{AudioCmd, SessionHandle};

/// How long idle bars take between decay steps.
const IDLE_DECAY_INTERVAL: Duration = Duration::from_millis(50);

/// What a "previous" press should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PrevAction {
    /// Far enough into the track: rewind it to the start.
    Restart,
    /// Near the start (or nothing playing): go to the preceding entry.
    Navigate,
}

/// Decide between scrub-back and track change, like the navigation lookups
/// in `playlist::model`. Without a live sink there is nothing to rewind.
pub(super) fn prev_action(has_sink: bool, elapsed: Duration, replay_window: Duration) -> PrevAction {
    if has_sink && elapsed > replay_window {
        PrevAction::Restart
    } else {
        PrevAction::Navigate
    }
}

struct Transport {
    stream: MixerDeviceSink,
    tracks: Vec<Track>,
    session: SessionHandle,
    spectrum: SpectrumHandle,
    settings: AudioSettings,

    sink: Option<Player>,
    index: Option<usize>,
    paused: bool,

    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,

    fades: FadeScheduler,
    /// Actual output gain right now; diverges from the slider level while a
    /// fade is in flight.
    gain: f32,
    /// Slider level, the target of fade-ins.
    level: f32,
    muted: bool,

    last_decay: Instant,
}

impl Transport {
    fn new(
        stream: MixerDeviceSink,
        tracks: Vec<Track>,
        session: SessionHandle,
        spectrum: SpectrumHandle,
        settings: AudioSettings,
    ) -> Self {
        Self {
            stream,
            tracks,
            session,
            spectrum,
            settings,
            sink: None,
            index: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            fades: FadeScheduler::new(),
            gain: 0.0,
            level: 1.0,
            muted: false,
            last_decay: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn fade_interval(&self) -> Duration {
        Duration::from_millis(self.settings.fade_tick_ms.max(1))
    }

    /// Fade-in target: the slider level, or silence while muted.
    fn fade_target(&self) -> f32 {
        if self.muted { 0.0 } else { self.level }
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(gain);
        }
    }

    /// Load track `i`, reset position and ramp the gain up from silence.
    /// Out-of-range indices are silent no-ops. A failed start leaves the
    /// player paused with the error recorded on the session.
    fn load(&mut self, i: usize) {
        let Some(track) = self.tracks.get(i) else {
            return;
        };
        let duration = track.duration;

        self.fades.cancel();
        if let Some(s) = self.sink.as_ref() {
            s.stop();
        }

        match create_sink_at(&self.stream, track, Duration::ZERO, &self.spectrum) {
            Ok(sink) => {
                sink.set_volume(0.0);
                sink.play();
                self.sink = Some(sink);
                self.index = Some(i);
                self.paused = false;
                self.started_at = Some(Instant::now());
                self.accumulated = Duration::ZERO;
                self.gain = 0.0;
                self.fades.ramp_to(
                    self.fade_target(),
                    self.settings.fade_step,
                    self.fade_interval(),
                    FadeThen::Settle,
                );

                if let Ok(mut info) = self.session.lock() {
                    info.index = Some(i);
                    info.elapsed = Duration::ZERO;
                    info.duration = duration;
                    info.playing = true;
                    info.visible = true;
                    info.last_error = None;
                }
            }
            Err(e) => {
                self.sink = None;
                self.index = Some(i);
                self.paused = true;
                self.started_at = None;
                self.accumulated = Duration::ZERO;

                if let Ok(mut info) = self.session.lock() {
                    info.index = Some(i);
                    info.elapsed = Duration::ZERO;
                    info.duration = duration;
                    info.playing = false;
                    info.visible = true;
                    info.last_error = Some(e.to_string());
                }
            }
        }
    }

    fn toggle_pause(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if self.paused {
            s.play();
            self.started_at = Some(Instant::now());
        } else {
            s.pause();
            if let Some(st) = self.started_at {
                self.accumulated += Instant::now() - st;
            }
            self.started_at = None;
        }
        self.paused = !self.paused;
        if let Ok(mut info) = self.session.lock() {
            info.playing = !self.paused;
        }
    }

    fn next(&mut self) {
        if let Some(i) = playlist::next_wrapping(self.tracks.len(), self.index) {
            self.load(i);
        }
    }

    fn prev(&mut self) {
        let replay_window = Duration::from_secs(self.settings.replay_window_secs);
        match prev_action(self.sink.is_some(), self.elapsed(), replay_window) {
            PrevAction::Restart => self.rebuild_at(Duration::ZERO),
            PrevAction::Navigate => {
                if let Some(i) = playlist::prev_wrapping(self.tracks.len(), self.index) {
                    self.load(i);
                }
            }
        }
    }

    /// Seek to `fraction` of the track duration. Silent no-op while the
    /// duration is unknown (metadata not available).
    fn seek_to(&mut self, fraction: f32) {
        let Some(duration) = self.index.and_then(|i| self.tracks[i].duration) else {
            return;
        };
        let fraction = fraction.clamp(0.0, 1.0);
        self.rebuild_at(duration.mul_f32(fraction));
    }

    /// Rebuild the current sink skipped to `pos`, preserving the paused flag
    /// and the current gain. This is the seeking primitive.
    fn rebuild_at(&mut self, pos: Duration) {
        let Some(i) = self.index else {
            return;
        };
        if self.sink.is_none() {
            return;
        }

        if let Some(s) = self.sink.as_ref() {
            s.stop();
        }

        let track = &self.tracks[i];
        match create_sink_at(&self.stream, track, pos, &self.spectrum) {
            Ok(new_sink) => {
                new_sink.set_volume(self.gain);
                if self.paused {
                    self.started_at = None;
                } else {
                    new_sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(new_sink);
                self.accumulated = pos;
                if let Ok(mut info) = self.session.lock() {
                    info.elapsed = pos;
                }
            }
            Err(e) => {
                self.sink = None;
                self.paused = true;
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                if let Ok(mut info) = self.session.lock() {
                    info.playing = false;
                    info.elapsed = Duration::ZERO;
                    info.last_error = Some(e.to_string());
                }
            }
        }
    }

    fn set_volume(&mut self, level: f32, muted: bool) {
        self.level = level.clamp(0.0, 1.0);
        self.muted = muted;
        // Applied immediately even mid-fade; an in-flight ramp keeps moving
        // toward the target it captured and will overwrite this on its next
        // tick, exactly like dragging the slider during a fade.
        self.set_gain(if muted { 0.0 } else { self.level });
        if let Ok(mut info) = self.session.lock() {
            info.volume = self.level;
            info.muted = muted;
        }
    }

    /// Start the dismiss fade. Teardown happens in `finish_dismiss`, strictly
    /// after the ramp reaches zero.
    fn dismiss(&mut self) {
        if self.sink.is_none() {
            self.finish_dismiss();
            return;
        }
        self.fades.ramp_to(
            0.0,
            self.settings.fade_step,
            self.fade_interval(),
            FadeThen::Dismiss,
        );
    }

    /// Dismiss teardown: pause, clear the source, drop the marker, hide.
    fn finish_dismiss(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.stop();
        }
        self.sink = None;
        self.index = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;

        if let Ok(mut info) = self.session.lock() {
            info.index = None;
            info.elapsed = Duration::ZERO;
            info.duration = None;
            info.playing = false;
            info.visible = false;
        }
    }

    /// Natural end of track: advance without wrapping. On the last entry the
    /// player stays put, paused at the start of the track it just finished.
    fn handle_ended(&mut self) {
        let Some(cur) = self.index else {
            return;
        };
        match playlist::successor(self.tracks.len(), cur) {
            Some(next) => self.load(next),
            None => {
                self.paused = true;
                self.rebuild_at(Duration::ZERO);
                if let Ok(mut info) = self.session.lock() {
                    info.playing = false;
                    info.elapsed = Duration::ZERO;
                }
            }
        }
    }

    /// Periodic work between commands: fade ticks, end-of-track detection and
    /// idle spectrum decay.
    fn tick(&mut self, now: Instant) {
        if let Some(t) = self.fades.tick(now, self.gain) {
            self.set_gain(t.volume);
            if let Some(then) = t.completed {
                match then {
                    FadeThen::Settle => {}
                    FadeThen::Dismiss => self.finish_dismiss(),
                }
            }
        }

        // Auto-advance, unless a dismiss is in flight and about to tear down.
        let dismissing = self.fades.active_then() == Some(FadeThen::Dismiss);
        if !dismissing && !self.paused {
            if let Some(s) = self.sink.as_ref() {
                if s.empty() {
                    self.handle_ended();
                }
            }
        }

        let playing = !self.paused && self.sink.is_some();
        if !playing && now.duration_since(self.last_decay) >= IDLE_DECAY_INTERVAL {
            self.last_decay = now;
            decay_idle(&self.spectrum);
        }
    }

    /// Fade out gently and stop. Blocking is fine here: the thread exits
    /// right after.
    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.as_ref() {
            if fade_out_ms == 0 {
                s.set_volume(0.0);
            } else {
                let steps: u64 = 20;
                let step_ms = (fade_out_ms / steps).max(1);
                let step = (self.gain / steps as f32).max(f32::EPSILON);
                let mut gain = self.gain;
                loop {
                    let (next, done) = advance(gain, 0.0, step);
                    gain = next;
                    s.set_volume(gain);
                    if done {
                        break;
                    }
                    thread::sleep(Duration::from_millis(step_ms));
                }
            }
            s.stop();
        }
        if let Ok(mut info) = self.session.lock() {
            info.playing = false;
        }
    }
}

pub(super) fn spawn_audio_thread(
    tracks: Vec<Track>,
    rx: Receiver<AudioCmd>,
    session: SessionHandle,
    spectrum: SpectrumHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream =
            DeviceSinkBuilder::open_default_sink().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        // Spawn a ticker thread to update session.elapsed periodically.
        let session_for_ticker = session.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(Duration::from_millis(500));
                let mut info = session_for_ticker.lock().unwrap();
                if info.playing {
                    info.elapsed += Duration::from_millis(500);
                }
            }
        });

        let mut transport = Transport::new(stream, tracks, session, spectrum, audio_settings);

        loop {
            // Short timeout so fade ticks stay responsive even while commands
            // keep arriving.
            match rx.recv_timeout(Duration::from_millis(10)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load(i) => transport.load(i),
                    AudioCmd::TogglePause => transport.toggle_pause(),
                    AudioCmd::Next => transport.next(),
                    AudioCmd::Prev => transport.prev(),
                    AudioCmd::SeekTo(fraction) => transport.seek_to(fraction),
                    AudioCmd::SetVolume { level, muted } => transport.set_volume(level, muted),
                    AudioCmd::Dismiss => transport.dismiss(),
                    AudioCmd::Quit { fade_out_ms } => {
                        transport.quit(fade_out_ms);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            transport.tick(Instant::now());
        }
    })
}
