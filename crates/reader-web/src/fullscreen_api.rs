//! Names of the Fullscreen API variants browsers expose.
//!
//! Safari and iPadOS only ship the `webkit`-prefixed API; everything else
//! ships the standard one. [`FullscreenApi::detect`] picks a variant once per
//! document and the host reads every property, method and event through it.

use reader_common::BrowserEvent;

/// Property, method and event names of one Fullscreen API variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenApi {
    /// `document` boolean telling whether fullscreen may be requested.
    pub enabled: &'static str,
    /// `document` property holding the current fullscreen element.
    pub element: &'static str,
    /// `Element` method that requests fullscreen.
    pub request: &'static str,
    /// `document` method that leaves fullscreen.
    pub exit: &'static str,
    /// Event fired on `document` when fullscreen state changes.
    pub change_event: &'static str,
}

impl FullscreenApi {
    pub const STANDARD: Self = Self {
        enabled: "fullscreenEnabled",
        element: "fullscreenElement",
        request: "requestFullscreen",
        exit: "exitFullscreen",
        change_event: "fullscreenchange",
    };

    pub const WEBKIT: Self = Self {
        enabled: "webkitFullscreenEnabled",
        element: "webkitFullscreenElement",
        request: "webkitRequestFullscreen",
        exit: "webkitExitFullscreen",
        change_event: "webkitfullscreenchange",
    };

    /// Pick the variant whose exit method the document has.
    ///
    /// `has` answers whether `document` has a property of the given name.
    /// The standard API is preferred when both exist, so a change is never
    /// observed twice. With neither, the standard names are returned and
    /// `enabled` reads as false.
    pub fn detect(has: impl Fn(&str) -> bool) -> Self {
        [Self::STANDARD, Self::WEBKIT]
            .into_iter()
            .find(|api| has(api.exit))
            .unwrap_or(Self::STANDARD)
    }

    /// DOM event name to listen on for `event`.
    pub fn event_name(&self, event: BrowserEvent) -> &'static str {
        match event {
            BrowserEvent::FullscreenChange => self.change_event,
            other => other.dom_name(),
        }
    }
}
