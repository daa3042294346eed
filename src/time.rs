//! Frame timestamps
//!
//! Milliseconds since app start, the same unit browser frame callbacks use.

use std::collections::VecDeque;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn now_millis() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Rolling frame-rate estimate over the last 60 frames
pub struct FpsCounter {
    frames: VecDeque<f64>,
}

impl FpsCounter {
    const WINDOW: usize = 60;

    pub fn new() -> Self {
        Self {
            frames: VecDeque::with_capacity(Self::WINDOW + 1),
        }
    }

    pub fn tick(&mut self, now_ms: f64) {
        self.frames.push_back(now_ms);
        if self.frames.len() > Self::WINDOW {
            self.frames.pop_front();
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.front(), self.frames.back()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / (elapsed / 1000.0)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn monotonic() {
        let a = now_millis();
        let b = now_millis();
        assert!(b >= a);
    }

    #[test]
    fn fps_needs_two_frames() {
        let mut fps = FpsCounter::new();
        assert_eq!(fps.fps(), 0.0);
        fps.tick(10.0);
        assert_eq!(fps.fps(), 0.0);
    }

    #[test]
    fn fps_from_steady_frames() {
        let mut fps = FpsCounter::new();
        for i in 0..=50 {
            fps.tick(i as f64 * 20.0);
        }
        assert!((fps.fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn window_forgets_old_frames() {
        let mut fps = FpsCounter::new();
        // a long stall, then 60 frames at 100 Hz
        fps.tick(0.0);
        for i in 0..60 {
            fps.tick(10_000.0 + i as f64 * 10.0);
        }
        assert!((fps.fps() - 100.0).abs() < 1e-9);
    }
}
