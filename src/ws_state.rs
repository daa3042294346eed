//! Connection state of the link to the animation server
//!
//! Written by the browser WebSocket callbacks, read by the viewer header.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Connected,
    Disconnected,
    Error(String),
}

impl LinkState {
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkState::Connected)
    }

    pub fn label(&self) -> &str {
        match self {
            LinkState::Connecting => "Connecting...",
            LinkState::Connected => "Connected",
            LinkState::Disconnected => "Disconnected",
            LinkState::Error(_) => "Error",
        }
    }
}
