//! Frame timing for the simulation loop.
//!
//! The clock is fed elapsed time by its owner rather than reading the wall
//! clock, so a recorded sequence of frame times always replays the same way.

use std::time::Duration;

/// Longest frame the clock accepts before clamping, to avoid a spiral of
/// catch-up ticks after a stall.
const MAX_FRAME: Duration = Duration::from_millis(250);

/// Converts variable frame times into fixed simulation ticks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Fixed timestep for simulation ticks (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time not yet consumed by ticks.
    accumulator: Duration,
    /// Total simulated time.
    elapsed: Duration,
    /// Ticks consumed since start.
    tick_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock ticking at 60 Hz.
    pub fn new() -> Self {
        Self::with_rate(60.0)
    }

    /// Create a clock ticking at `hz`.
    pub fn with_rate(hz: f64) -> Self {
        Self {
            fixed_timestep: Duration::from_secs_f64(1.0 / hz),
            accumulator: Duration::ZERO,
            elapsed: Duration::ZERO,
            tick_count: 0,
        }
    }

    /// Feed the time that passed since the previous frame.
    pub fn advance(&mut self, frame: Duration) {
        if frame > MAX_FRAME {
            log::trace!("Frame of {:?} clamped to {:?}", frame, MAX_FRAME);
        }
        self.accumulator += frame.min(MAX_FRAME);
    }

    /// Check if a fixed tick should run and consume the time.
    pub fn should_tick(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            self.elapsed += self.fixed_timestep;
            self.tick_count += 1;
            true
        } else {
            false
        }
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Get total simulated time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
