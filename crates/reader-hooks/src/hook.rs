//! The lifecycle contract every bridge hook implements.

use reader_common::{BrowserEvent, ClientEvent, HookId, HookKind, ServerCommand};
use reader_config::BridgeConfig;
use tracing::debug;

use crate::channel::Outbox;
use crate::fullscreen::FullscreenBridge;
use crate::host::Host;
use crate::responsive_image::AdaptiveImageResolver;
use crate::scroll::ScrollCommandExecutor;
use crate::subscriptions::Subscriptions;

/// What a hook sees while one of its callbacks runs.
pub struct HookContext<'a, H: Host> {
    pub(crate) id: HookId,
    pub(crate) host: &'a H,
    pub(crate) element: &'a H::Node,
    pub(crate) outbox: &'a Outbox,
    pub(crate) subscriptions: &'a mut Subscriptions<H::Subscription>,
}

impl<'a, H: Host> HookContext<'a, H> {
    pub fn id(&self) -> HookId {
        self.id
    }

    pub fn host(&self) -> &'a H {
        self.host
    }

    /// The element the hook is attached to.
    pub fn element(&self) -> &'a H::Node {
        self.element
    }

    /// Push an event to the server.
    pub fn emit(&self, event: ClientEvent) {
        self.outbox.push(self.id, event);
    }

    /// Start listening for a browser event. Listening twice to the same
    /// event keeps the first listener only.
    pub fn listen(&mut self, event: BrowserEvent) {
        if self.subscriptions.listens_to(event) {
            debug!(hook = %self.id, ?event, "already listening");
            return;
        }
        let guard = self.host.listen(self.id, event);
        self.subscriptions.add_listener(event, guard);
    }

    /// Start handling a server command.
    pub fn subscribe(&mut self, command: ServerCommand) {
        if self.subscriptions.handles(command) {
            debug!(hook = %self.id, command = command.wire_name(), "already subscribed");
            return;
        }
        let guard = self.host.on_command(self.id, command);
        self.subscriptions.add_command(command, guard);
    }
}

/// A bridge behavior attached to one element.
///
/// Callbacks only run while the instance is mounted; the owning
/// [`HookInstance`](crate::HookInstance) enforces that and releases every
/// subscription after `destroyed`.
pub trait Hook<H: Host> {
    fn kind(&self) -> HookKind;

    fn mounted(&mut self, ctx: &mut HookContext<'_, H>);

    fn updated(&mut self, _ctx: &mut HookContext<'_, H>) {}

    fn on_command(&mut self, _command: ServerCommand, _ctx: &mut HookContext<'_, H>) {}

    fn on_browser_event(&mut self, _event: BrowserEvent, _ctx: &mut HookContext<'_, H>) {}

    fn destroyed(&mut self, _ctx: &mut HookContext<'_, H>) {}
}

/// Build the hook for `kind` from the current configuration.
pub fn create_hook<H: Host>(kind: HookKind, config: &BridgeConfig) -> Box<dyn Hook<H>> {
    match kind {
        HookKind::Fullscreen => Box::new(FullscreenBridge::<H>::new(config.fullscreen.clone())),
        HookKind::ResponsiveImage => Box::new(AdaptiveImageResolver::new(config.image.clone())),
        HookKind::ScrollToTop => Box::new(ScrollCommandExecutor::new(config.scroll.behavior)),
    }
}
