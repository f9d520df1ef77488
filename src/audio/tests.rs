use std::num::NonZero;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rodio::buffer::SamplesBuffer;

use super::analyzer::{SPECTRUM_BANDS, SpectrumFrame, TapSource, decay_idle};
use super::fade::{FadeScheduler, FadeThen, advance};
use super::thread::{PrevAction, prev_action};

// --- Fade math ---

#[test]
fn advance_moves_toward_target_by_step() {
    assert_eq!(advance(0.0, 1.0, 0.1), (0.1, false));
    assert_eq!(advance(0.5, 0.0, 0.1), (0.4, false));
}

#[test]
fn advance_snaps_within_one_step() {
    assert_eq!(advance(0.95, 1.0, 0.1), (1.0, true));
    assert_eq!(advance(0.08, 0.0, 0.1), (0.0, true));
    assert_eq!(advance(0.5, 0.5, 0.1), (0.5, true));
}

#[test]
fn advance_never_leaves_unit_range() {
    let (v, _) = advance(0.0, 1.0, 0.3);
    assert!((0.0..=1.0).contains(&v));
    // Target outside range is clamped before stepping.
    let (v, done) = advance(0.9, 2.0, 0.3);
    assert_eq!((v, done), (1.0, true));
}

// --- Scheduler behavior ---

fn drain(fades: &mut FadeScheduler, start: f32) -> (Vec<f32>, Option<FadeThen>) {
    // Zero interval: every tick is due immediately.
    let mut volumes = Vec::new();
    let mut current = start;
    for _ in 0..100 {
        let Some(t) = fades.tick(Instant::now(), current) else {
            break;
        };
        volumes.push(t.volume);
        current = t.volume;
        if let Some(then) = t.completed {
            return (volumes, Some(then));
        }
    }
    (volumes, None)
}

#[test]
fn fade_out_strictly_decreases_then_snaps_to_zero() {
    let mut fades = FadeScheduler::new();
    fades.ramp_to(0.0, 0.1, Duration::ZERO, FadeThen::Dismiss);

    let (volumes, completed) = drain(&mut fades, 1.0);
    assert_eq!(completed, Some(FadeThen::Dismiss));
    assert_eq!(*volumes.last().unwrap(), 0.0);
    for pair in volumes.windows(2) {
        assert!(pair[1] < pair[0], "volume must strictly decrease per tick");
    }
    assert!(volumes.iter().all(|v| (0.0..=1.0).contains(v)));
    // Completion fires exactly once; the scheduler is idle afterwards.
    assert!(!fades.is_active());
    assert!(fades.tick(Instant::now(), 0.0).is_none());
}

#[test]
fn starting_fade_out_cancels_active_fade_in() {
    let mut fades = FadeScheduler::new();
    let in_ticket = fades.ramp_to(1.0, 0.1, Duration::ZERO, FadeThen::Settle);

    // Fade-in runs a few ticks, then a dismiss arrives.
    let mut current = 0.0;
    for _ in 0..3 {
        current = fades.tick(Instant::now(), current).unwrap().volume;
    }
    let out_ticket = fades.ramp_to(0.0, 0.1, Duration::ZERO, FadeThen::Dismiss);
    assert_ne!(in_ticket, out_ticket);
    assert_eq!(fades.active_ticket(), Some(out_ticket));
    assert_eq!(fades.active_then(), Some(FadeThen::Dismiss));

    let (volumes, completed) = drain(&mut fades, current);
    assert_eq!(completed, Some(FadeThen::Dismiss));
    assert_eq!(*volumes.last().unwrap(), 0.0);
    assert!(volumes.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn cancel_discards_the_active_ramp() {
    let mut fades = FadeScheduler::new();
    fades.ramp_to(1.0, 0.1, Duration::ZERO, FadeThen::Settle);
    fades.cancel();
    assert!(!fades.is_active());
    assert!(fades.tick(Instant::now(), 0.5).is_none());
}

#[test]
fn tick_respects_the_interval() {
    let mut fades = FadeScheduler::new();
    fades.ramp_to(1.0, 0.1, Duration::from_secs(60), FadeThen::Settle);
    // First adjustment is one interval away, so nothing fires yet.
    assert!(fades.tick(Instant::now(), 0.0).is_none());
    assert!(fades.is_active());
}

// --- Previous-press decision ---

#[test]
fn prev_beyond_replay_window_restarts_the_track() {
    let window = Duration::from_secs(3);
    assert_eq!(
        prev_action(true, Duration::from_secs(4), window),
        PrevAction::Restart
    );
    assert_eq!(
        prev_action(true, Duration::from_millis(3001), window),
        PrevAction::Restart
    );
}

#[test]
fn prev_within_replay_window_changes_track() {
    let window = Duration::from_secs(3);
    assert_eq!(
        prev_action(true, Duration::ZERO, window),
        PrevAction::Navigate
    );
    assert_eq!(
        prev_action(true, Duration::from_secs(2), window),
        PrevAction::Navigate
    );
    // Exactly at the boundary still navigates; restart needs strictly more.
    assert_eq!(
        prev_action(true, Duration::from_secs(3), window),
        PrevAction::Navigate
    );
}

#[test]
fn prev_without_a_sink_never_restarts() {
    let window = Duration::from_secs(3);
    assert_eq!(
        prev_action(false, Duration::from_secs(10), window),
        PrevAction::Navigate
    );
}

// --- Spectrum frame ---

#[test]
fn decay_idle_sinks_bands_toward_zero() {
    let handle = Arc::new(Mutex::new(SpectrumFrame {
        bands: [0.8; SPECTRUM_BANDS],
    }));

    decay_idle(&handle);
    let after_one = handle.lock().unwrap().bands[0];
    assert!(after_one < 0.8);

    for _ in 0..200 {
        decay_idle(&handle);
    }
    assert!(handle.lock().unwrap().bands.iter().all(|&b| b == 0.0));
}

// --- Tap passthrough ---

#[test]
fn tap_passes_samples_through_unchanged_mono() {
    let input: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
    let source = SamplesBuffer::new(
        NonZero::new(1).unwrap(),
        NonZero::new(44100).unwrap(),
        input.clone(),
    );
    let frame = Arc::new(Mutex::new(SpectrumFrame::default()));
    let tapped = TapSource::new(source, frame);

    let output: Vec<f32> = tapped.collect();
    assert_eq!(output, input);
}

#[test]
fn tap_passes_samples_through_unchanged_stereo() {
    let input: Vec<f32> = (0..200).map(|i| (i as f32 - 100.0) / 100.0).collect();
    let source = SamplesBuffer::new(
        NonZero::new(2).unwrap(),
        NonZero::new(44100).unwrap(),
        input.clone(),
    );
    let frame = Arc::new(Mutex::new(SpectrumFrame::default()));
    let tapped = TapSource::new(source, frame);

    let output: Vec<f32> = tapped.collect();
    assert_eq!(output, input);
}

#[test]
fn tap_writes_band_energy_for_a_tone() {
    // A loud 440 Hz tone across several FFT windows must light up something.
    let sample_rate = 44100.0f32;
    let input: Vec<f32> = (0..4096)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate).sin())
        .collect();
    let source = SamplesBuffer::new(
        NonZero::new(1).unwrap(),
        NonZero::new(44100).unwrap(),
        input,
    );
    let frame = Arc::new(Mutex::new(SpectrumFrame::default()));
    let tapped = TapSource::new(source, frame.clone());
    tapped.for_each(drop);

    let bands = frame.lock().unwrap().bands;
    assert!(bands.iter().any(|&b| b > 0.0));
    assert!(bands.iter().all(|&b| (0.0..=1.0).contains(&b)));
}
