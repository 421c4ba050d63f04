//! Frame timing for the main loop
//!
//! `FrameClock` measures wall-clock frame deltas and feeds a fixed-step
//! accumulator so the engine can run `fixed_update` at a constant rate while
//! `update` runs once per rendered frame.

use std::time::Instant;

/// Frame clock with a fixed-step accumulator
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    fixed_step: f32,
    max_delta: f32,
    accumulator: f32,
}

impl FrameClock {
    /// Create a clock with the given fixed step and per-frame delta ceiling
    pub fn new(fixed_step: f32, max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            fixed_step,
            max_delta,
            accumulator: 0.0,
        }
    }

    /// Sample the wall clock and advance by the elapsed time
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance by an explicit delta (headless runs and tests)
    ///
    /// Negative and NaN deltas are treated as zero and large ones are clamped
    /// to the configured ceiling so a stall never produces a burst of fixed
    /// steps.
    pub fn advance(&mut self, delta: f32) -> f32 {
        // `clamp` would panic on a NaN ceiling
        let delta = delta.max(0.0).min(self.max_delta);
        self.delta_time = delta;
        self.total_time += delta;
        self.frame_count += 1;
        self.accumulator += delta;
        delta
    }

    /// Consume whole fixed steps from the accumulator
    pub fn drain_fixed_steps(&mut self) -> u32 {
        if self.fixed_step <= 0.0 {
            self.accumulator = 0.0;
            return 0;
        }
        let mut steps = 0;
        while self.accumulator >= self.fixed_step {
            self.accumulator -= self.fixed_step;
            steps += 1;
        }
        steps
    }

    /// Fixed step length in seconds
    pub fn fixed_step(&self) -> f32 {
        self.fixed_step
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total advanced time
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since the clock was created
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_steps_accumulate() {
        let mut clock = FrameClock::new(0.1, 1.0);
        clock.advance(0.25);
        assert_eq!(clock.drain_fixed_steps(), 2);
        clock.advance(0.06);
        assert_eq!(clock.drain_fixed_steps(), 1);
        assert_eq!(clock.frame_count(), 2);
        assert_relative_eq!(clock.total_time(), 0.31, epsilon = 1e-6);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::new(0.1, 0.2);
        assert_relative_eq!(clock.advance(5.0), 0.2);
        assert_relative_eq!(clock.advance(-1.0), 0.0);
        assert_relative_eq!(clock.advance(f32::NAN), 0.0);
    }

    #[test]
    fn test_nan_ceiling_does_not_panic() {
        let mut clock = FrameClock::new(0.1, f32::NAN);
        assert_relative_eq!(clock.advance(0.05), 0.05);
    }
}
