//! Volume controller: the UI-side model of output gain and mute.
//!
//! Every volume mutation (slider drag, keyboard step, mute toggle) goes
//! through `set_level`, so the rendered slider fill and icon tier can never
//! diverge from the state sent to the device.

use crate::audio::AudioCmd;

pub const VOLUME_MIN: f32 = 0.0;
pub const VOLUME_MAX: f32 = 1.0;

/// Icon intensity tiers: silent, quiet, full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconTier {
    Silent,
    Low,
    Full,
}

#[derive(Debug, Clone)]
pub struct VolumeControl {
    level: f32,
    /// Level remembered at mute time, restored on unmute.
    last_level: f32,
}

impl VolumeControl {
    pub fn new(level: f32) -> Self {
        Self {
            level: level.clamp(VOLUME_MIN, VOLUME_MAX),
            last_level: 1.0,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Muted is derived, not stored: the output is muted exactly when the
    /// level sits at zero.
    pub fn muted(&self) -> bool {
        self.level == 0.0
    }

    /// Set the level, clamped to [0, 1].
    pub fn set_level(&mut self, v: f32) {
        self.level = v.clamp(VOLUME_MIN, VOLUME_MAX);
    }

    /// Step the level by `delta` (keyboard volume keys). Routes through
    /// `set_level` so clamping and mute derivation stay in one place.
    pub fn step(&mut self, delta: f32) {
        self.set_level(self.level + delta);
    }

    /// Mute remembers the current level and zeroes the slider; unmute
    /// restores whatever was remembered.
    pub fn toggle_mute(&mut self) {
        if self.muted() {
            let restore = self.last_level;
            self.set_level(restore);
        } else {
            self.last_level = self.level;
            self.set_level(0.0);
        }
    }

    /// Fill proportion of the slider affordance.
    pub fn fill_ratio(&self) -> f32 {
        (self.level - VOLUME_MIN) / (VOLUME_MAX - VOLUME_MIN)
    }

    pub fn icon_tier(&self) -> IconTier {
        if self.muted() {
            IconTier::Silent
        } else if self.level < 0.5 {
            IconTier::Low
        } else {
            IconTier::Full
        }
    }

    /// The device command matching the current state.
    pub fn as_cmd(&self) -> AudioCmd {
        AudioCmd::SetVolume {
            level: self.level,
            muted: self.muted(),
        }
    }
}
