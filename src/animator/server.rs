//! Server-driven animation
//!
//! The animator owns the clock and the position buffer. Each tick rewrites the
//! z column in place, then copies the finished buffer into an immutable frame
//! before it is published, so a half-written frame is never observable.

use std::sync::Arc;

use tracing::trace;

use super::boundary::{Delivery, SyncBoundary};
use crate::core::{
    colors, AnimationClock, AnimationConfig, Color, FieldSampler, Grid, PointSet, Position, VisResult,
};

/// Result of a single tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    pub frame: u64,
    pub t: f64,
    pub delivery: Delivery,
}

/// Running totals of tick outcomes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimatorStats {
    pub delivered: u64,
    pub superseded: u64,
    pub dropped: u64,
}

impl AnimatorStats {
    fn record(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Delivered => self.delivered += 1,
            Delivery::Superseded => self.superseded += 1,
            Delivery::Dropped => self.dropped += 1,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.delivered + self.superseded + self.dropped
    }
}

#[derive(Debug)]
pub struct ServerAnimator {
    grid: Grid,
    sampler: FieldSampler,
    clock: AnimationClock,
    positions: Vec<Position>,
    colors: Arc<[Color]>,
    point_size: f32,
    next_frame: u64,
    last_delivered_t: Option<f64>,
    stats: AnimatorStats,
}

impl ServerAnimator {
    pub fn new(config: &AnimationConfig) -> VisResult<Self> {
        config.validate()?;
        let grid = Grid::new(config.grid)?;
        let sampler = FieldSampler::new(config.field);
        let clock = AnimationClock::new(config.field.dt);

        let t = clock.time();
        let positions = grid.iter().map(|(x, y)| [x, y, sampler.height(x, y, t)]).collect();
        let colors: Arc<[Color]> = colors(&grid).into();

        Ok(Self {
            grid,
            sampler,
            clock,
            positions,
            colors,
            point_size: config.point_size,
            next_frame: 1,
            last_delivered_t: None,
            stats: AnimatorStats::default(),
        })
    }

    /// Full point set at the current time, used to initialize a renderer
    pub fn snapshot(&self) -> VisResult<PointSet> {
        PointSet::new(0, self.clock.time(), self.positions.clone(), self.colors.clone())
    }

    /// Advance the clock one step, resample and publish
    pub fn tick<B>(&mut self, boundary: &mut B) -> VisResult<TickOutcome>
    where
        B: SyncBoundary<Arc<PointSet>> + ?Sized,
    {
        let t = self.clock.tick();
        self.sampler.fill_heights(&mut self.positions, t);

        let frame = self.next_frame;
        self.next_frame += 1;
        let points = PointSet::new(frame, t, self.positions.clone(), self.colors.clone())?;

        let delivery = boundary.publish(Arc::new(points))?;
        self.stats.record(delivery);
        if delivery.was_handed_over() {
            self.last_delivered_t = Some(t);
        }

        trace!(frame, t, ?delivery, "Tick");
        Ok(TickOutcome { frame, t, delivery })
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    /// Time of the newest frame handed across the boundary
    pub fn last_delivered_t(&self) -> Option<f64> {
        self.last_delivered_t
    }

    pub fn stats(&self) -> AnimatorStats {
        self.stats
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn point_count(&self) -> usize {
        self.positions.len()
    }
}
