//! The browser surface hooks act on.

use std::fmt;

use reader_common::{BridgeError, BrowserEvent, HookId, ScrollTarget, ServerCommand, ViewportState};

/// Everything a hook may do to or observe from the page.
///
/// Implementations use interior mutability: all methods take `&self`, the
/// same way DOM calls do.
pub trait Host: 'static {
    /// Handle to a DOM element.
    type Node: Clone + fmt::Debug + 'static;

    /// Guard for a browser listener or a server command handler. Dropping it
    /// detaches the underlying callback.
    type Subscription: 'static;

    /// First descendant of `root` matching `selector`. `root` itself never
    /// matches.
    fn query_selector(&self, root: &Self::Node, selector: &str) -> Option<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    fn viewport(&self) -> ViewportState;

    fn scroll_to(&self, target: ScrollTarget);

    /// Feature detection for the native fullscreen API.
    fn fullscreen_enabled(&self) -> bool;

    fn is_fullscreen(&self) -> bool;

    /// `Ok` means the request was issued. Backends whose request settles
    /// later log a late rejection themselves.
    fn request_fullscreen(&self, target: &Self::Node) -> Result<(), BridgeError>;

    fn exit_fullscreen(&self);

    /// Attach a listener for `event` on behalf of `owner`.
    fn listen(&self, owner: HookId, event: BrowserEvent) -> Self::Subscription;

    /// Register `owner` as a handler of `command` on the event channel.
    fn on_command(&self, owner: HookId, command: ServerCommand) -> Self::Subscription;
}
