//! Frequency analysis tap.
//!
//! `TapSource` wraps any `rodio::Source<Item = f32>`, passes samples through
//! unchanged and writes periodic band magnitudes into a shared
//! `SpectrumFrame`. The frame is created once per player lifetime and every
//! new sink writes into the same one, so the visualizer never reconnects
//! across track changes.

use std::num::NonZero;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Source;
use rustfft::{FftPlanner, num_complex::Complex};

/// Number of frequency bands exposed to the visualizer. Coarse on purpose:
/// the display favors responsiveness over spectral detail.
pub const SPECTRUM_BANDS: usize = 32;

/// Samples per analysis window.
const FFT_SIZE: usize = 512;

/// Weight of the previous band value when a new window lands.
const SMOOTHING: f32 = 0.6;

/// Per-tick multiplier applied while nothing is playing, so the bars sink
/// toward silence instead of freezing.
const IDLE_DECAY: f32 = 0.85;

/// The latest frequency-magnitude snapshot, all values in [0, 1].
#[derive(Debug, Clone)]
pub struct SpectrumFrame {
    pub bands: [f32; SPECTRUM_BANDS],
}

impl Default for SpectrumFrame {
    fn default() -> Self {
        Self {
            bands: [0.0; SPECTRUM_BANDS],
        }
    }
}

pub type SpectrumHandle = Arc<Mutex<SpectrumFrame>>;

/// Decay all bands one step toward zero. Called by the device thread while
/// the output is paused or empty.
pub(super) fn decay_idle(handle: &SpectrumHandle) {
    if let Ok(mut frame) = handle.lock() {
        for band in frame.bands.iter_mut() {
            *band *= IDLE_DECAY;
            if *band < 1e-3 {
                *band = 0.0;
            }
        }
    }
}

/// Pass-through source that captures samples for visualization.
pub(super) struct TapSource<S> {
    inner: S,
    frame: SpectrumHandle,
    buffer: Vec<f32>,
    channels: NonZero<u16>,
    sample_rate: NonZero<u32>,
    channel_phase: u16,
    fft_planner: FftPlanner<f32>,
}

impl<S> TapSource<S>
where
    S: Source<Item = f32>,
{
    pub(super) fn new(source: S, frame: SpectrumHandle) -> Self {
        let channels = source.channels();
        let sample_rate = source.sample_rate();
        Self {
            inner: source,
            frame,
            buffer: Vec::with_capacity(FFT_SIZE),
            channels,
            sample_rate,
            channel_phase: 0,
            fft_planner: FftPlanner::new(),
        }
    }

    fn process_window(&mut self) {
        let fft = self.fft_planner.plan_fft_forward(FFT_SIZE);
        let mut fft_input: Vec<Complex<f32>> = self
            .buffer
            .iter()
            .take(FFT_SIZE)
            .enumerate()
            .map(|(i, &s)| {
                // Hann window
                let window =
                    0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / FFT_SIZE as f32).cos());
                Complex::new(s * window, 0.0)
            })
            .collect();

        fft.process(&mut fft_input);

        let nyquist = FFT_SIZE / 2;
        let bins_per_band = nyquist / SPECTRUM_BANDS;
        let fft_norm = 1.0 / FFT_SIZE as f32;

        let mut bands = [0.0f32; SPECTRUM_BANDS];
        for (band, value) in bands.iter_mut().enumerate() {
            let start = band * bins_per_band;
            let end = (start + bins_per_band).min(nyquist);

            let mut max_mag = 0.0f32;
            for item in &fft_input[start..end] {
                let mag = item.norm() * fft_norm;
                max_mag = max_mag.max(mag);
            }

            *value = (max_mag * 8.0).sqrt().min(1.0);
        }

        if let Ok(mut frame) = self.frame.lock() {
            for (slot, value) in frame.bands.iter_mut().zip(bands.iter()) {
                *slot = *slot * SMOOTHING + value * (1.0 - SMOOTHING);
            }
        }

        self.buffer.clear();
    }
}

impl<S> Iterator for TapSource<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.inner.next()?;

        // Analyze the first channel only; enough for a coarse display.
        if self.channel_phase == 0 {
            self.buffer.push(sample);
        }
        self.channel_phase = (self.channel_phase + 1) % self.channels.get();

        if self.buffer.len() >= FFT_SIZE {
            self.process_window();
        }

        Some(sample)
    }
}

impl<S> Source for TapSource<S>
where
    S: Source<Item = f32>,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> NonZero<u16> {
        self.channels
    }

    fn sample_rate(&self) -> NonZero<u32> {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}
