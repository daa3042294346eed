//! Logical animation clock
//!
//! Fixed-step and never locked to wall time: `t = steps · Δt`, so two clocks
//! with the same step agree exactly after the same number of ticks.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationClock {
    dt: f64,
    steps: u64,
}

impl AnimationClock {
    pub fn new(dt: f64) -> Self {
        Self { dt, steps: 0 }
    }

    /// Current logical time
    pub fn time(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of ticks taken
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance by one step, returning the new time
    pub fn tick(&mut self) -> f64 {
        self.steps += 1;
        self.time()
    }

    pub fn reset(&mut self) {
        self.steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_accumulate() {
        let mut clock = AnimationClock::new(0.05);
        assert_eq!(clock.time(), 0.0);
        clock.tick();
        assert_eq!(clock.tick(), 0.1);
        assert_eq!(clock.time(), 0.10);
        assert_eq!(clock.steps(), 2);
    }

    #[test]
    fn no_drift_over_many_ticks() {
        let mut clock = AnimationClock::new(0.05);
        for _ in 0..1000 {
            clock.tick();
        }
        assert_eq!(clock.time(), 1000.0 * 0.05);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut clock = AnimationClock::new(0.25);
        clock.tick();
        clock.reset();
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.steps(), 0);
    }
}
