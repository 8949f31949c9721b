use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::BridgeError;

/// Identifier of a mounted hook instance, unique within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HookId(pub u32);

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hook-{}", self.0)
    }
}

/// The bridge behaviors a page element can attach to.
///
/// The serialized form is the hook name used in the page markup
/// (`phx-hook="FullscreenHook"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookKind {
    #[serde(rename = "FullscreenHook")]
    Fullscreen,
    #[serde(rename = "ResponsiveImageHook")]
    ResponsiveImage,
    #[serde(rename = "ScrollToTop")]
    ScrollToTop,
}

impl HookKind {
    pub const ALL: [HookKind; 3] = [
        HookKind::Fullscreen,
        HookKind::ResponsiveImage,
        HookKind::ScrollToTop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HookKind::Fullscreen => "FullscreenHook",
            HookKind::ResponsiveImage => "ResponsiveImageHook",
            HookKind::ScrollToTop => "ScrollToTop",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, BridgeError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| BridgeError::UnknownHook(name.to_string()))
    }
}

/// Where a browser event listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Window,
    Document,
}

/// Browser-originated events a hook can listen for.
///
/// None of them carry data: handlers read the current state from the host
/// at the moment the event is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserEvent {
    FullscreenChange,
    Resize,
    OrientationChange,
}

impl BrowserEvent {
    /// DOM event type passed to `addEventListener`.
    pub fn dom_name(self) -> &'static str {
        match self {
            BrowserEvent::FullscreenChange => "fullscreenchange",
            BrowserEvent::Resize => "resize",
            BrowserEvent::OrientationChange => "orientationchange",
        }
    }

    pub fn source(self) -> EventSource {
        match self {
            BrowserEvent::FullscreenChange => EventSource::Document,
            BrowserEvent::Resize | BrowserEvent::OrientationChange => EventSource::Window,
        }
    }
}
