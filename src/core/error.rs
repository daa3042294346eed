//! Error type shared by the sampler, animators and renderers

use thiserror::Error;

/// Result alias for wave-cloud operations
pub type VisResult<T> = Result<T, VisError>;

#[derive(Debug, Error)]
pub enum VisError {
    /// Rejected before any array is allocated
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Array length disagrees with the point count the renderer was initialized with
    #[error("dimension mismatch: expected {expected} points, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Update issued before `initialize`
    #[error("renderer not initialized")]
    Uninitialized,

    #[error("malformed message: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "cli")]
    #[error("websocket error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
}

impl VisError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        VisError::InvalidConfiguration { reason: reason.into() }
    }
}
