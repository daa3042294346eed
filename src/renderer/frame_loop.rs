//! Renderer-side animation for client-driven scenes
//!
//! Runs inside the renderer's own frame callback. Frames arriving faster than
//! the redraw rate are skipped; the remainder of the elapsed time is carried so
//! the average rate stays on target.

use tracing::trace;

use super::Renderer;
use crate::core::{config, AnimationClock, FieldSampler, Position, SceneSetup, VisResult};

#[derive(Debug)]
pub struct FrameLoop {
    sampler: FieldSampler,
    clock: AnimationClock,
    positions: Vec<Position>,
    frame_interval_ms: f64,
    last_frame_ms: f64,
    enabled: bool,
}

impl FrameLoop {
    pub fn new(setup: &SceneSetup) -> VisResult<Self> {
        setup.field.validate()?;
        config::rate_interval("redraw_rate", setup.redraw_rate)?;
        Ok(Self {
            sampler: FieldSampler::new(setup.field),
            clock: AnimationClock::new(setup.field.dt),
            positions: setup.positions.clone(),
            frame_interval_ms: 1000.0 / setup.redraw_rate,
            last_frame_ms: 0.0,
            enabled: true,
        })
    }

    /// Called once per displayed frame with a millisecond timestamp.
    ///
    /// Returns `true` when the frame advanced the animation.
    pub fn on_frame<R: Renderer + ?Sized>(&mut self, now_ms: f64, renderer: &mut R) -> VisResult<bool> {
        if !self.enabled {
            return Ok(false);
        }

        let elapsed = now_ms - self.last_frame_ms;
        if elapsed < self.frame_interval_ms {
            return Ok(false);
        }
        self.last_frame_ms = now_ms - (elapsed % self.frame_interval_ms);

        self.step(renderer)?;
        Ok(true)
    }

    /// Advance one clock step unconditionally and push the new heights
    pub fn step<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> VisResult<()> {
        let t = self.clock.tick();
        self.sampler.fill_heights(&mut self.positions, t);
        renderer.update_positions(&self.positions)?;
        trace!(t, step = self.clock.steps(), "Local frame");
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn steps(&self) -> u64 {
        self.clock.steps()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }
}
