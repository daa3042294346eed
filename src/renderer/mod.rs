//! Renderer boundary
//!
//! A renderer consumes index-aligned position and color arrays and redraws.
//! `PointBuffer` is the CPU-side geometry store used by the CLI probe and the
//! browser viewer; `FrameLoop` animates a client-driven scene locally.

mod buffer;
mod camera;
mod frame_loop;

pub use buffer::PointBuffer;
pub use camera::{OrbitCamera, Projected};
pub use frame_loop::FrameLoop;

use tracing::debug;

use crate::core::{Color, Position, ServerMessage, VisResult};

pub trait Renderer {
    /// Start a new scene with `positions.len()` points
    fn initialize(&mut self, positions: &[Position], colors: &[Color], point_size: f32) -> VisResult<()>;

    /// Replace every position; the length must equal the initialized point count
    fn update_positions(&mut self, positions: &[Position]) -> VisResult<()>;

    /// Replace every color; the length must equal the initialized point count
    fn update_colors(&mut self, colors: &[Color]) -> VisResult<()>;
}

/// What applying a server message did to the renderer
#[derive(Debug)]
pub enum Applied {
    Initialized { points: usize },
    Frame { frame: u64, t: f64 },
    Colors,
    /// Scene set up for local animation; the caller drives the returned loop
    ClientDriven(FrameLoop),
}

/// Dispatch a decoded server message onto a renderer
pub fn apply_message<R: Renderer + ?Sized>(renderer: &mut R, msg: ServerMessage) -> VisResult<Applied> {
    match msg {
        ServerMessage::Initialize { positions, colors, point_size } => {
            renderer.initialize(&positions, &colors, point_size)?;
            debug!(points = positions.len(), point_size, "Scene initialized");
            Ok(Applied::Initialized { points: positions.len() })
        }
        ServerMessage::UpdatePositions { frame, t, positions } => {
            renderer.update_positions(&positions)?;
            Ok(Applied::Frame { frame, t })
        }
        ServerMessage::UpdateColors { colors } => {
            renderer.update_colors(&colors)?;
            Ok(Applied::Colors)
        }
        ServerMessage::ClientDriven(setup) => {
            let frame_loop = FrameLoop::new(&setup)?;
            renderer.initialize(&setup.positions, &setup.colors, setup.point_size)?;
            debug!(
                points = setup.positions.len(),
                redraw_rate = setup.redraw_rate,
                "Client-driven scene initialized"
            );
            Ok(Applied::ClientDriven(frame_loop))
        }
    }
}
