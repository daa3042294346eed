//! Fixed sample grid
//!
//! The grid is generated once per session and only read afterwards. Its order is
//! the join key between position and color arrays in every frame.

use tracing::debug;

use super::config::GridSpec;
use super::error::VisResult;

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    spec: GridSpec,
    /// Row-major `(x, y)` pairs: `index = row * resolution + col`
    coords: Vec<[f32; 2]>,
}

impl Grid {
    /// Generate the grid; fails with `InvalidConfiguration` before allocating
    pub fn new(spec: GridSpec) -> VisResult<Self> {
        let count = spec.point_count()?;
        let axis = linspace(spec.domain_min, spec.domain_max, spec.resolution);

        let mut coords = Vec::with_capacity(count);
        for &y in &axis {
            for &x in &axis {
                coords.push([x, y]);
            }
        }

        debug!(
            resolution = spec.resolution,
            points = coords.len(),
            domain_min = spec.domain_min,
            domain_max = spec.domain_max,
            "Grid generated"
        );
        Ok(Self { spec, coords })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn coords(&self) -> &[[f32; 2]] {
        &self.coords
    }

    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.coords.iter().map(|&[x, y]| (x, y))
    }
}

/// `n` evenly spaced values from `start` to `stop` inclusive; `n == 1` yields `[start]`
fn linspace(start: f32, stop: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let span = stop - start;
            let last = (n - 1) as f32;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + span * (i as f32 / last) })
                .collect()
        }
    }
}
