//! Per-frame point data
//!
//! A `PointSet` is immutable once built. Colors never change with time, so they
//! are shared between frames instead of copied.

use std::sync::Arc;

use super::error::{VisError, VisResult};

pub type Position = [f32; 3];
pub type Color = [f32; 3];

#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    /// Monotonic frame number assigned by the producer
    pub frame: u64,
    /// Logical time the heights were sampled at
    pub t: f64,
    positions: Vec<Position>,
    colors: Arc<[Color]>,
}

impl PointSet {
    pub fn new(frame: u64, t: f64, positions: Vec<Position>, colors: Arc<[Color]>) -> VisResult<Self> {
        if positions.len() != colors.len() {
            return Err(VisError::DimensionMismatch {
                expected: colors.len(),
                actual: positions.len(),
            });
        }
        Ok(Self { frame, t, positions, colors })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn shared_colors(&self) -> Arc<[Color]> {
        self.colors.clone()
    }

    /// `(min, max)` of the z column, `None` when empty
    pub fn z_range(&self) -> Option<(f32, f32)> {
        z_range(&self.positions)
    }
}

pub fn z_range(positions: &[Position]) -> Option<(f32, f32)> {
    positions.iter().map(|p| p[2]).fold(None, |acc, z| match acc {
        None => Some((z, z)),
        Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
    })
}
