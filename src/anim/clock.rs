//! Logical and wall-clock time sources.

use std::time::Instant;

/// Logical time source for tween scheduling.
///
/// Time only moves when [`LogicalClock::advance`] is called, which lets the
/// render loop feed real frame deltas while tests fast-forward deterministically.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogicalClock {
    now: f64,
}

impl LogicalClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Moves time forward; negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f32) -> f64 {
        if dt.is_finite() && dt > 0.0 {
            self.now += f64::from(dt);
        }
        self.now
    }
}

/// Converts wall-clock time into per-frame deltas.
#[derive(Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    max_step: f32,
}

impl FrameClock {
    /// `max_step` caps a single delta so a stalled window does not make every
    /// running tween jump straight to its end.
    pub fn new(max_step: f32) -> Self {
        Self {
            last: None,
            max_step,
        }
    }

    /// Seconds since the previous tick; zero on the first call.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        dt.min(self.max_step)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_clock_only_moves_forward() {
        let mut clock = LogicalClock::new();
        clock.advance(0.25);
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.now(), 0.25);
    }

    #[test]
    fn test_frame_clock_first_tick_is_zero_and_capped() {
        let mut clock = FrameClock::new(0.05);
        assert_eq!(clock.tick(), 0.0);
        assert!(clock.tick() <= 0.05);
    }
}
