//! Fullscreen bridge: keeps native fullscreen and the server in sync.
//!
//! - **server -> browser**: `toggle_fullscreen`, `enter_fullscreen`,
//!   `exit_fullscreen` drive the native capability.
//! - **browser -> server**: every native `fullscreenchange` is reported as
//!   `fullscreen_changed {isFullscreen}`.
//!
//! Without a native capability the bridge stays inert for the lifetime of
//! the instance.

use reader_common::{BrowserEvent, ClientEvent, HookFault, HookKind, ServerCommand};
use reader_config::FullscreenConfig;
use tracing::{debug, warn};

use crate::hook::{Hook, HookContext};
use crate::host::Host;

enum Capability<N> {
    Undetected,
    Inert,
    Active { target: N },
}

pub struct FullscreenBridge<H: Host> {
    config: FullscreenConfig,
    capability: Capability<H::Node>,
}

impl<H: Host> FullscreenBridge<H> {
    pub fn new(config: FullscreenConfig) -> Self {
        Self {
            config,
            capability: Capability::Undetected,
        }
    }

    /// The element fullscreen is requested on, once mounted with a capability.
    pub fn target(&self) -> Option<&H::Node> {
        match &self.capability {
            Capability::Active { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_inert(&self) -> bool {
        !matches!(self.capability, Capability::Active { .. })
    }

    fn request(host: &H, target: &H::Node) {
        if let Err(e) = host.request_fullscreen(target) {
            warn!(error = %e, "fullscreen request rejected");
        }
    }
}

impl<H: Host> Hook<H> for FullscreenBridge<H> {
    fn kind(&self) -> HookKind {
        HookKind::Fullscreen
    }

    fn mounted(&mut self, ctx: &mut HookContext<'_, H>) {
        let host = ctx.host();
        let target = host
            .query_selector(ctx.element(), &self.config.target_selector)
            .unwrap_or_else(|| ctx.element().clone());

        if !host.fullscreen_enabled() {
            debug!(hook = %ctx.id(), fault = %HookFault::CapabilityUnavailable, "fullscreen bridge inert");
            self.capability = Capability::Inert;
            return;
        }

        ctx.listen(BrowserEvent::FullscreenChange);
        ctx.subscribe(ServerCommand::ToggleFullscreen);
        ctx.subscribe(ServerCommand::EnterFullscreen);
        ctx.subscribe(ServerCommand::ExitFullscreen);

        debug!(hook = %ctx.id(), ?target, "fullscreen bridge active");
        self.capability = Capability::Active { target };
    }

    fn on_command(&mut self, command: ServerCommand, ctx: &mut HookContext<'_, H>) {
        let Capability::Active { target } = &self.capability else {
            return;
        };
        let host = ctx.host();

        match command {
            ServerCommand::ToggleFullscreen => {
                if host.is_fullscreen() {
                    host.exit_fullscreen();
                } else {
                    Self::request(host, target);
                }
            }
            ServerCommand::EnterFullscreen => {
                if !host.is_fullscreen() {
                    Self::request(host, target);
                }
            }
            ServerCommand::ExitFullscreen => {
                if host.is_fullscreen() {
                    host.exit_fullscreen();
                }
            }
            ServerCommand::ScrollToTop => {}
        }
    }

    fn on_browser_event(&mut self, event: BrowserEvent, ctx: &mut HookContext<'_, H>) {
        if event != BrowserEvent::FullscreenChange || self.is_inert() {
            return;
        }
        let is_fullscreen = ctx.host().is_fullscreen();
        ctx.emit(ClientEvent::FullscreenChanged { is_fullscreen });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{self, Inbox};
    use crate::memory::{MemoryHost, NodeId};
    use crate::registry::HookRegistry;
    use reader_common::{HookId, LifecycleState};
    use reader_config::BridgeConfig;

    struct Page {
        registry: HookRegistry<MemoryHost>,
        inbox: Inbox,
        host: MemoryHost,
        root: NodeId,
        marked: NodeId,
    }

    fn page(supported: bool, marked: bool) -> Page {
        let host = MemoryHost::default();
        host.set_fullscreen_supported(supported);
        let root = host.create_element("div");
        let marked_node = host.create_element("section");
        host.append_child(root, marked_node);
        if marked {
            host.patch_attribute(marked_node, "data-fullscreen-target", "");
        }
        let (outbox, inbox) = channel::channel();
        let registry = HookRegistry::new(host.clone(), BridgeConfig::default(), outbox);
        Page {
            registry,
            inbox,
            host,
            root,
            marked: marked_node,
        }
    }

    impl Page {
        fn mount(&mut self) -> HookId {
            self.registry.mount(HookKind::Fullscreen, self.root)
        }

        /// Deliver queued native events to whoever still has a listener.
        fn pump(&mut self) {
            for event in self.host.take_pending_events() {
                for owner in self.host.bound_hooks(crate::Binding::Listener(event)) {
                    self.registry.dispatch_browser_event(owner, event);
                }
            }
        }
    }

    #[test]
    fn target_prefers_marked_descendant() {
        let mut p = page(true, true);
        let id = p.mount();
        p.registry.deliver_command(id, ServerCommand::ToggleFullscreen);
        assert_eq!(p.host.fullscreen_requests(), vec![p.marked]);
    }

    #[test]
    fn target_falls_back_to_element() {
        let mut p = page(true, false);
        let id = p.mount();
        p.registry.deliver_command(id, ServerCommand::EnterFullscreen);
        assert_eq!(p.host.fullscreen_requests(), vec![p.root]);
    }

    #[test]
    fn mount_registers_one_listener_and_three_commands() {
        let mut p = page(true, false);
        p.mount();
        assert_eq!(p.host.listener_count(BrowserEvent::FullscreenChange), 1);
        assert_eq!(p.host.active_bindings(), 4);
    }

    #[test]
    fn toggle_requests_when_not_fullscreen() {
        let mut p = page(true, false);
        let id = p.mount();
        p.registry.deliver_command(id, ServerCommand::ToggleFullscreen);

        assert_eq!(p.host.fullscreen_requests().len(), 1);
        assert_eq!(p.host.fullscreen_exits(), 0);
    }

    #[test]
    fn toggle_exits_when_fullscreen() {
        let mut p = page(true, false);
        let id = p.mount();
        p.host.set_fullscreen_element(Some(p.root));
        p.registry.deliver_command(id, ServerCommand::ToggleFullscreen);

        assert_eq!(p.host.fullscreen_requests().len(), 0);
        assert_eq!(p.host.fullscreen_exits(), 1);
    }

    #[test]
    fn enter_twice_requests_once() {
        let mut p = page(true, false);
        let id = p.mount();
        p.registry.deliver_command(id, ServerCommand::EnterFullscreen);
        p.registry.deliver_command(id, ServerCommand::EnterFullscreen);
        assert_eq!(p.host.fullscreen_requests().len(), 1);
    }

    #[test]
    fn exit_twice_exits_once() {
        let mut p = page(true, false);
        let id = p.mount();
        p.host.set_fullscreen_element(Some(p.root));
        p.registry.deliver_command(id, ServerCommand::ExitFullscreen);
        p.registry.deliver_command(id, ServerCommand::ExitFullscreen);
        assert_eq!(p.host.fullscreen_exits(), 1);
    }

    #[test]
    fn exit_when_not_fullscreen_is_noop() {
        let mut p = page(true, false);
        let id = p.mount();
        p.registry.deliver_command(id, ServerCommand::ExitFullscreen);
        assert_eq!(p.host.fullscreen_exits(), 0);
    }

    #[test]
    fn native_change_emits_current_state() {
        let mut p = page(true, false);
        let id = p.mount();
        p.registry.deliver_command(id, ServerCommand::EnterFullscreen);
        p.pump();
        p.registry.deliver_command(id, ServerCommand::ExitFullscreen);
        p.pump();

        let events: Vec<_> = p.inbox.drain().into_iter().map(|e| e.event).collect();
        assert_eq!(
            events,
            vec![
                ClientEvent::FullscreenChanged { is_fullscreen: true },
                ClientEvent::FullscreenChanged { is_fullscreen: false },
            ]
        );
    }

    #[test]
    fn user_initiated_change_is_reported() {
        let mut p = page(true, false);
        let id = p.mount();
        p.host.set_fullscreen_element(Some(p.root));
        p.pump();

        let events = p.inbox.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].hook, id);
        assert_eq!(
            events[0].event,
            ClientEvent::FullscreenChanged { is_fullscreen: true }
        );
    }

    #[test]
    fn no_emission_after_destroy() {
        let mut p = page(true, false);
        let id = p.mount();
        assert!(p.registry.destroy(id));

        p.host.set_fullscreen_element(Some(p.root));
        p.pump();
        p.registry.dispatch_browser_event(id, BrowserEvent::FullscreenChange);

        assert!(p.inbox.drain().is_empty());
        assert_eq!(p.host.listener_count(BrowserEvent::FullscreenChange), 0);
    }

    #[test]
    fn destroy_releases_listener_exactly_once() {
        let mut p = page(true, false);
        let id = p.mount();
        p.registry.destroy(id);
        p.registry.destroy(id);

        let released: Vec<_> = p
            .host
            .released_bindings()
            .into_iter()
            .filter(|(_, b)| *b == crate::Binding::Listener(BrowserEvent::FullscreenChange))
            .collect();
        assert_eq!(released, vec![(id, crate::Binding::Listener(BrowserEvent::FullscreenChange))]);
    }

    #[test]
    fn rejected_request_is_absorbed() {
        let mut p = page(true, false);
        let id = p.mount();
        p.host.set_fullscreen_supported(false);

        p.registry.deliver_command(id, ServerCommand::EnterFullscreen);
        p.registry.deliver_command(id, ServerCommand::ToggleFullscreen);
        p.pump();

        assert!(p.host.fullscreen_requests().is_empty());
        assert!(!p.host.is_fullscreen());
        assert!(p.inbox.drain().is_empty());
        assert_eq!(p.registry.state(id), Some(LifecycleState::Mounted));
    }

    #[test]
    fn request_after_rejection_still_works() {
        let mut p = page(true, false);
        let id = p.mount();
        p.host.set_fullscreen_supported(false);
        p.registry.deliver_command(id, ServerCommand::EnterFullscreen);

        p.host.set_fullscreen_supported(true);
        p.registry.deliver_command(id, ServerCommand::EnterFullscreen);
        p.pump();

        assert_eq!(p.host.fullscreen_requests(), vec![p.root]);
        let events: Vec<_> = p.inbox.drain().into_iter().map(|e| e.event).collect();
        assert_eq!(events, vec![ClientEvent::FullscreenChanged { is_fullscreen: true }]);
    }

    #[test]
    fn unavailable_capability_is_inert() {
        let mut p = page(false, true);
        let id = p.mount();
        assert_eq!(p.host.active_bindings(), 0);

        p.registry.deliver_command(id, ServerCommand::ToggleFullscreen);
        p.registry.deliver_command(id, ServerCommand::EnterFullscreen);
        p.registry.dispatch_browser_event(id, BrowserEvent::FullscreenChange);

        assert!(p.host.fullscreen_requests().is_empty());
        assert!(p.inbox.drain().is_empty());
        assert!(p.registry.destroy(id));
        assert!(p.host.released_bindings().is_empty());
    }

    #[test]
    fn inert_bridge_reports_no_target() {
        let host = MemoryHost::default();
        host.set_fullscreen_supported(false);
        let bridge = FullscreenBridge::<MemoryHost>::new(FullscreenConfig::default());
        assert!(bridge.is_inert());
        assert!(bridge.target().is_none());
    }
}
