//! Typed messages carried over the event channel.
//!
//! - **server -> browser**: [`ServerCommand`], pushed by the server-driven UI
//!   process under a wire name (`toggle_fullscreen`, `scroll-to-top`, ...).
//! - **browser -> server**: [`ClientEvent`], emitted by a hook and pushed to
//!   the server as `(name, payload)`.

use serde::{Deserialize, Serialize};

use crate::errors::BridgeError;

/// A command pushed by the server to the hooks on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerCommand {
    #[serde(rename = "toggle_fullscreen")]
    ToggleFullscreen,
    #[serde(rename = "enter_fullscreen")]
    EnterFullscreen,
    #[serde(rename = "exit_fullscreen")]
    ExitFullscreen,
    #[serde(rename = "scroll-to-top")]
    ScrollToTop,
}

impl ServerCommand {
    pub const ALL: [ServerCommand; 4] = [
        ServerCommand::ToggleFullscreen,
        ServerCommand::EnterFullscreen,
        ServerCommand::ExitFullscreen,
        ServerCommand::ScrollToTop,
    ];

    /// Event name on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            ServerCommand::ToggleFullscreen => "toggle_fullscreen",
            ServerCommand::EnterFullscreen => "enter_fullscreen",
            ServerCommand::ExitFullscreen => "exit_fullscreen",
            ServerCommand::ScrollToTop => "scroll-to-top",
        }
    }

    /// Parse a wire name. Names are case-sensitive.
    pub fn from_wire(name: &str) -> Result<Self, BridgeError> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.wire_name() == name)
            .ok_or_else(|| BridgeError::UnknownCommand(name.to_string()))
    }
}

/// An event emitted by a hook for the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum ClientEvent {
    #[serde(rename = "fullscreen_changed")]
    FullscreenChanged {
        #[serde(rename = "isFullscreen")]
        is_fullscreen: bool,
    },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::FullscreenChanged { .. } => "fullscreen_changed",
        }
    }

    /// The payload object pushed alongside [`ClientEvent::name`].
    pub fn payload(&self) -> serde_json::Value {
        match self {
            ClientEvent::FullscreenChanged { is_fullscreen } => {
                serde_json::json!({ "isFullscreen": is_fullscreen })
            }
        }
    }
}
