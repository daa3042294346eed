//! Client-driven animation
//!
//! The server side only builds the scene setup and hands it over once. Time
//! and heights are advanced afterwards by the renderer's `FrameLoop`, which
//! runs the same sampler with the same parameters.

use std::sync::Arc;

use tracing::{debug, trace};

use super::boundary::{Delivery, SyncBoundary};
use crate::core::{colors, AnimationConfig, FieldSampler, Grid, SceneSetup, VisResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Setup handed across the boundary
    Emitted,
    /// Setup already handed over earlier; nothing sent
    AlreadyEmitted,
    /// Nobody attached; a later attempt will send it
    Dropped,
}

#[derive(Debug)]
pub struct ClientAnimator {
    setup: Arc<SceneSetup>,
    emitted: bool,
}

impl ClientAnimator {
    pub fn new(config: &AnimationConfig) -> VisResult<Self> {
        config.validate()?;
        let grid = Grid::new(config.grid)?;
        let sampler = FieldSampler::new(config.field);

        // initial phase: heights at t = 0
        let positions = grid.iter().map(|(x, y)| [x, y, sampler.height(x, y, 0.0)]).collect();

        let setup = SceneSetup {
            positions,
            colors: colors(&grid),
            point_size: config.point_size,
            field: config.field,
            domain_min: config.grid.domain_min,
            domain_max: config.grid.domain_max,
            redraw_rate: config.redraw_rate,
        };
        debug!(points = grid.len(), redraw_rate = config.redraw_rate, "Client-driven scene built");

        Ok(Self {
            setup: Arc::new(setup),
            emitted: false,
        })
    }

    pub fn setup(&self) -> &SceneSetup {
        &self.setup
    }

    pub fn is_emitted(&self) -> bool {
        self.emitted
    }

    /// Hand the setup over, at most once per animator
    pub fn emit<B>(&mut self, boundary: &mut B) -> VisResult<EmitOutcome>
    where
        B: SyncBoundary<Arc<SceneSetup>> + ?Sized,
    {
        if self.emitted {
            trace!("Scene setup already emitted");
            return Ok(EmitOutcome::AlreadyEmitted);
        }
        match boundary.publish(self.setup.clone())? {
            Delivery::Dropped => Ok(EmitOutcome::Dropped),
            Delivery::Delivered | Delivery::Superseded => {
                self.emitted = true;
                Ok(EmitOutcome::Emitted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::boundary::{LatestSlot, RendererBoundary};
    use crate::core::{GridSpec, VisError};
    use crate::renderer::PointBuffer;

    fn config() -> AnimationConfig {
        AnimationConfig {
            grid: GridSpec::new(-1.0, 1.0, 3),
            ..Default::default()
        }
    }

    #[test]
    fn emits_exactly_once() {
        let mut animator = ClientAnimator::new(&config()).unwrap();
        let mut slot = LatestSlot::new();
        let rx = slot.attach();

        assert_eq!(animator.emit(&mut slot).unwrap(), EmitOutcome::Emitted);
        assert_eq!(animator.emit(&mut slot).unwrap(), EmitOutcome::AlreadyEmitted);

        let setup = rx.take().unwrap();
        assert_eq!(setup.positions.len(), 9);
        assert_eq!(setup.colors.len(), 9);
        assert!(rx.take().is_none());
    }

    #[test]
    fn unattached_emit_is_retried() {
        let mut animator = ClientAnimator::new(&config()).unwrap();
        let mut slot = LatestSlot::new();
        assert_eq!(animator.emit(&mut slot).unwrap(), EmitOutcome::Dropped);
        assert!(!animator.is_emitted());

        let rx = slot.attach();
        assert_eq!(animator.emit(&mut slot).unwrap(), EmitOutcome::Emitted);
        assert!(rx.take().is_some());
    }

    #[test]
    fn setup_carries_initial_phase_and_parameters() {
        let config = config();
        let animator = ClientAnimator::new(&config).unwrap();
        let setup = animator.setup();
        assert_eq!(setup.field, config.field);
        assert_eq!(setup.redraw_rate, config.redraw_rate);
        // center cell (0, 0) at t = 0
        assert_eq!(setup.positions[4], [0.0, 0.0, 1.0]);
        assert_eq!(setup.colors[4], [0.5, 0.5, 0.5]);
    }

    #[test]
    fn emit_initializes_attached_renderer() {
        let mut animator = ClientAnimator::new(&config()).unwrap();
        let mut boundary = RendererBoundary::detached();
        boundary.attach_uninitialized(PointBuffer::new());
        assert_eq!(animator.emit(&mut boundary).unwrap(), EmitOutcome::Emitted);
        assert_eq!(boundary.renderer().map(|r| r.len()), Some(9));
    }

    #[test]
    fn invalid_resolution_fails() {
        let config = AnimationConfig { grid: GridSpec::new(-1.0, 1.0, 0), ..Default::default() };
        assert!(matches!(ClientAnimator::new(&config), Err(VisError::InvalidConfiguration { .. })));
    }
}
