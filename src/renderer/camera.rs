//! Perspective orbit camera for painting points in 2D
//!
//! The cloud is rotated (yaw around Y, then pitch around X) and viewed from a
//! camera on the +Z axis looking at the origin.

use crate::core::Position;

const NEAR: f32 = 0.1;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 20.0;
/// Radians of rotation per dragged pixel
const ROTATE_SPEED: f32 = 0.01;
/// Distance change per scrolled unit
const ZOOM_SPEED: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Vertical field of view in degrees
    pub fov_deg: f32,
}

/// A point mapped to normalized device coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// [-1, 1], right is positive
    pub x: f32,
    /// [-1, 1], up is positive
    pub y: f32,
    /// Distance in front of the camera
    pub depth: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 8.0,
            fov_deg: 75.0,
        }
    }
}

impl OrbitCamera {
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * ROTATE_SPEED;
        self.pitch += dy * ROTATE_SPEED;
    }

    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance + scroll * ZOOM_SPEED).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    fn focal(&self) -> f32 {
        1.0 / (self.fov_deg.to_radians() * 0.5).tan()
    }

    /// Project into NDC; `None` for points behind the near plane
    pub fn project(&self, p: Position, aspect: f32) -> Option<Projected> {
        let [x, y, z] = p;

        let (sy, cy) = self.yaw.sin_cos();
        let (x, z) = (x * cy + z * sy, -x * sy + z * cy);

        let (sp, cp) = self.pitch.sin_cos();
        let (y, z) = (y * cp - z * sp, y * sp + z * cp);

        let depth = self.distance - z;
        if depth <= NEAR {
            return None;
        }

        let f = self.focal();
        Some(Projected {
            x: f * x / (aspect * depth),
            y: f * y / depth,
            depth,
        })
    }

    /// On-screen diameter in pixels of a point with world size `size`
    pub fn point_pixels(&self, size: f32, depth: f32, viewport_height: f32) -> f32 {
        size * self.focal() * viewport_height * 0.5 / depth
    }
}
