use std::time::Instant;

/// Source of per-frame elapsed time.
pub trait Clock {
    /// Seconds elapsed since the previous call.
    fn delta_seconds(&mut self) -> f32;
}

/// Wall-clock timing. The first call measures from construction.
#[derive(Debug)]
pub struct MonotonicClock {
    last: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn delta_seconds(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

/// Constant step, for headless runs and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    pub step: f32,
}

impl FixedClock {
    pub fn new(step: f32) -> Self {
        Self { step }
    }
}

impl Clock for FixedClock {
    fn delta_seconds(&mut self) -> f32 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_repeats_step() {
        let mut clock = FixedClock::new(0.25);
        assert_eq!(clock.delta_seconds(), 0.25);
        assert_eq!(clock.delta_seconds(), 0.25);
    }

    #[test]
    fn monotonic_clock_is_non_negative() {
        let mut clock = MonotonicClock::new();
        assert!(clock.delta_seconds() >= 0.0);
        assert!(clock.delta_seconds() >= 0.0);
    }
}
