//! Timed linear gain ramps.
//!
//! The scheduler owns at most one ramp at a time: starting a new one
//! unconditionally cancels the previous one, so a fade-in interrupted by a
//! dismiss converges to the dismiss target and never fights it. Ticks are
//! driven by the device thread's wakeups; a stale ticket simply never fires
//! again.

use std::time::{Duration, Instant};

/// What to do once a ramp reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeThen {
    /// Nothing beyond settling the gain (fade-in on load).
    Settle,
    /// Run dismiss teardown: pause, clear the source, hide the player.
    Dismiss,
}

#[derive(Debug)]
struct Fade {
    target: f32,
    step: f32,
    interval: Duration,
    ticket: u64,
    last_tick: Instant,
    then: FadeThen,
}

/// Result of one due tick: the new gain value and, when the ramp just
/// finished, the completion action to run strictly after the gain settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeTick {
    pub volume: f32,
    pub completed: Option<FadeThen>,
}

#[derive(Debug)]
pub struct FadeScheduler {
    active: Option<Fade>,
    next_ticket: u64,
}

/// Move `current` one step toward `target`, clamped to [0, 1].
/// Returns the new value and whether the target was reached: within one step
/// the value snaps exactly to the target.
pub fn advance(current: f32, target: f32, step: f32) -> (f32, bool) {
    let target = target.clamp(0.0, 1.0);
    if (current - target).abs() <= step {
        return (target, true);
    }
    let next = if current < target {
        current + step
    } else {
        current - step
    };
    (next.clamp(0.0, 1.0), false)
}

impl FadeScheduler {
    pub fn new() -> Self {
        Self {
            active: None,
            next_ticket: 0,
        }
    }

    /// Start a ramp toward `target`, cancelling any in-flight ramp.
    /// Returns the new ramp's ticket.
    pub fn ramp_to(&mut self, target: f32, step: f32, interval: Duration, then: FadeThen) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.active = Some(Fade {
            target: target.clamp(0.0, 1.0),
            step: step.max(f32::EPSILON),
            interval,
            ticket,
            // First adjustment happens one interval from now, like the
            // original interval timer.
            last_tick: Instant::now(),
            then,
        });
        ticket
    }

    /// Drop the active ramp, if any. Its ticket will never fire again.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The completion action of the active ramp, if any.
    pub fn active_then(&self) -> Option<FadeThen> {
        self.active.as_ref().map(|f| f.then)
    }

    /// The ticket of the active ramp, if any.
    pub fn active_ticket(&self) -> Option<u64> {
        self.active.as_ref().map(|f| f.ticket)
    }

    /// Advance the active ramp if a tick is due at `now`, given the current
    /// gain. Returns `None` when no ramp is active or the tick is not due
    /// yet. A completed ramp is discarded before this returns.
    pub fn tick(&mut self, now: Instant, current: f32) -> Option<FadeTick> {
        let fade = self.active.as_mut()?;
        if now.duration_since(fade.last_tick) < fade.interval {
            return None;
        }
        fade.last_tick = now;

        let (volume, done) = advance(current, fade.target, fade.step);
        if done {
            let then = fade.then;
            self.active = None;
            Some(FadeTick {
                volume,
                completed: Some(then),
            })
        } else {
            Some(FadeTick {
                volume,
                completed: None,
            })
        }
    }
}

impl Default for FadeScheduler {
    fn default() -> Self {
        Self::new()
    }
}
