//! Height field sampler
//!
//! `z = sin(x·ω + t) · cos(y·ω + t) + offset`, a standing wave travelling in time.
//! This is the only definition of the formula: the server animator and the
//! renderer frame loop both call into it.

use super::config::FieldParams;
use super::grid::Grid;

/// Constant blue channel of the color mapping
pub const BLUE_CHANNEL: f32 = 0.5;

/// Normalized channel value used when the domain has zero width
pub const DEGENERATE_CHANNEL: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSampler {
    params: FieldParams,
}

impl FieldSampler {
    pub fn new(params: FieldParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    #[inline]
    pub fn height(&self, x: f32, y: f32, t: f64) -> f32 {
        let t = t as f32;
        let omega = self.params.omega;
        (x * omega + t).sin() * (y * omega + t).cos() + self.params.offset
    }

    /// Heights for every grid cell at time `t`
    pub fn sample(&self, grid: &Grid, t: f64) -> Vec<f32> {
        grid.iter().map(|(x, y)| self.height(x, y, t)).collect()
    }

    /// Rewrite the z column in place, reading x/y from the positions themselves
    pub fn fill_heights(&self, positions: &mut [[f32; 3]], t: f64) {
        for p in positions.iter_mut() {
            p[2] = self.height(p[0], p[1], t);
        }
    }
}

/// Time-invariant color of a grid cell
pub fn color_at(x: f32, y: f32, domain_min: f32, domain_max: f32) -> [f32; 3] {
    let span = domain_max - domain_min;
    if span == 0.0 {
        return [DEGENERATE_CHANNEL, DEGENERATE_CHANNEL, BLUE_CHANNEL];
    }
    [(x - domain_min) / span, (y - domain_min) / span, BLUE_CHANNEL]
}

/// Color for every grid cell, index-aligned with the grid
pub fn colors(grid: &Grid) -> Vec<[f32; 3]> {
    let spec = grid.spec();
    grid.iter()
        .map(|(x, y)| color_at(x, y, spec.domain_min, spec.domain_max))
        .collect()
}
