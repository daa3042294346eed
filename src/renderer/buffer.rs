//! CPU-side point geometry
//!
//! Holds the position and color attributes the way a GPU vertex buffer would.
//! Updates are validated in full before any entry is written, so a rejected
//! update leaves the previous frame intact.

use tracing::trace;

use super::Renderer;
use crate::core::{point_set, Color, Position, VisError, VisResult};

#[derive(Debug, Default)]
pub struct PointBuffer {
    positions: Vec<Position>,
    colors: Vec<Color>,
    point_size: f32,
    initialized: bool,
    /// Bumped on every accepted update
    revision: u64,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
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

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn z_range(&self) -> Option<(f32, f32)> {
        point_set::z_range(&self.positions)
    }

    fn check_len(&self, actual: usize) -> VisResult<()> {
        if !self.initialized {
            return Err(VisError::Uninitialized);
        }
        if actual != self.positions.len() {
            return Err(VisError::DimensionMismatch {
                expected: self.positions.len(),
                actual,
            });
        }
        Ok(())
    }
}

impl Renderer for PointBuffer {
    fn initialize(&mut self, positions: &[Position], colors: &[Color], point_size: f32) -> VisResult<()> {
        if positions.len() != colors.len() {
            return Err(VisError::DimensionMismatch {
                expected: positions.len(),
                actual: colors.len(),
            });
        }
        self.positions = positions.to_vec();
        self.colors = colors.to_vec();
        self.point_size = point_size;
        self.initialized = true;
        self.revision += 1;
        Ok(())
    }

    fn update_positions(&mut self, positions: &[Position]) -> VisResult<()> {
        self.check_len(positions.len())?;
        self.positions.copy_from_slice(positions);
        self.revision += 1;
        trace!(revision = self.revision, "Positions updated");
        Ok(())
    }

    fn update_colors(&mut self, colors: &[Color]) -> VisResult<()> {
        self.check_len(colors.len())?;
        self.colors.copy_from_slice(colors);
        self.revision += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized(n: usize) -> PointBuffer {
        let mut buffer = PointBuffer::new();
        buffer.initialize(&vec![[0.0; 3]; n], &vec![[0.5; 3]; n], 0.15).unwrap();
        buffer
    }

    #[test]
    fn update_replaces_every_position() {
        let mut buffer = initialized(9);
        let next: Vec<Position> = (0..9).map(|i| [i as f32, 0.0, 1.0]).collect();
        buffer.update_positions(&next).unwrap();
        assert_eq!(buffer.positions(), next.as_slice());
        assert_eq!(buffer.revision(), 2);
    }

    #[test]
    fn mismatched_positions_fail_without_writing() {
        let mut buffer = initialized(9);
        let err = buffer.update_positions(&[[1.0; 3]; 8]).unwrap_err();
        assert!(matches!(err, VisError::DimensionMismatch { expected: 9, actual: 8 }));
        let err = buffer.update_positions(&[[1.0; 3]; 10]).unwrap_err();
        assert!(matches!(err, VisError::DimensionMismatch { expected: 9, actual: 10 }));
        assert!(buffer.positions().iter().all(|p| *p == [0.0; 3]));
        assert_eq!(buffer.revision(), 1);
    }

    #[test]
    fn mismatched_colors_fail() {
        let mut buffer = initialized(4);
        let err = buffer.update_colors(&[[1.0; 3]; 5]).unwrap_err();
        assert!(matches!(err, VisError::DimensionMismatch { expected: 4, actual: 5 }));
    }

    #[test]
    fn update_before_initialize_fails() {
        let mut buffer = PointBuffer::new();
        assert!(matches!(buffer.update_positions(&[]), Err(VisError::Uninitialized)));
        assert!(matches!(buffer.update_colors(&[[0.0; 3]]), Err(VisError::Uninitialized)));
    }

    #[test]
    fn initialize_rejects_misaligned_arrays() {
        let mut buffer = PointBuffer::new();
        let err = buffer.initialize(&[[0.0; 3]; 3], &[[0.5; 3]; 2], 0.15).unwrap_err();
        assert!(matches!(err, VisError::DimensionMismatch { .. }));
        assert!(!buffer.is_initialized());
    }

    #[test]
    fn reinitialize_changes_point_count() {
        let mut buffer = initialized(4);
        buffer.initialize(&[[0.0; 3]; 2], &[[0.5; 3]; 2], 0.3).unwrap();
        assert_eq!(buffer.len(), 2);
        assert!(buffer.update_positions(&[[1.0; 3]; 2]).is_ok());
    }
}
