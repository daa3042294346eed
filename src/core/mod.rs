//! Platform-agnostic core - shared between the server, the CLI probe and the browser viewer

pub mod clock;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod point_set;
pub mod protocol;

pub use clock::AnimationClock;
pub use config::{AnimationConfig, FieldParams, GridSpec, Mode};
pub use error::{VisError, VisResult};
pub use field::{color_at, colors, FieldSampler};
pub use grid::Grid;
pub use point_set::{Color, PointSet, Position};
pub use protocol::{ClientMessage, SceneSetup, ServerMessage};
