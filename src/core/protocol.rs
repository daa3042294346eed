//! Wire messages exchanged over the WebSocket boundary
//!
//! JSON, adjacently tagged: `{"type": "UpdatePositions", "data": {...}}`.
//! Arrays are index-aligned with the grid and carry no other metadata.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::config::FieldParams;
use super::error::VisResult;
use super::point_set::{Color, PointSet, Position};

/// Everything the renderer needs to animate a scene on its own
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneSetup {
    pub positions: Vec<Position>,
    pub colors: Vec<Color>,
    pub point_size: f32,
    pub field: FieldParams,
    pub domain_min: f32,
    pub domain_max: f32,
    pub redraw_rate: f64,
}

/// Server → renderer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    Initialize {
        positions: Vec<Position>,
        colors: Vec<Color>,
        point_size: f32,
    },
    UpdatePositions {
        frame: u64,
        t: f64,
        positions: Vec<Position>,
    },
    UpdateColors {
        colors: Vec<Color>,
    },
    ClientDriven(SceneSetup),
}

impl ServerMessage {
    pub fn initialize(points: &PointSet, point_size: f32) -> Self {
        ServerMessage::Initialize {
            positions: points.positions().to_vec(),
            colors: points.colors().to_vec(),
            point_size,
        }
    }

    pub fn update_positions(points: &PointSet) -> Self {
        ServerMessage::UpdatePositions {
            frame: points.frame,
            t: points.t,
            positions: points.positions().to_vec(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Initialize { .. } => "Initialize",
            ServerMessage::UpdatePositions { .. } => "UpdatePositions",
            ServerMessage::UpdateColors { .. } => "UpdateColors",
            ServerMessage::ClientDriven(_) => "ClientDriven",
        }
    }
}

/// Renderer → server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    /// The frame was applied to the renderer
    Ack { frame: u64 },
}

pub fn encode<T: Serialize>(msg: &T) -> VisResult<String> {
    Ok(serde_json::to_string(msg)?)
}

pub fn decode_server(text: &str) -> VisResult<ServerMessage> {
    trace!(len = text.len(), "Decoding server message");
    serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "Failed to decode server message");
        e.into()
    })
}

pub fn decode_client(text: &str) -> VisResult<ClientMessage> {
    serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "Failed to decode client message");
        e.into()
    })
}
