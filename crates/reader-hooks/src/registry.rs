use std::collections::BTreeMap;

use reader_common::{
    BridgeError, BrowserEvent, HookId, HookKind, LifecycleState, Result, ServerCommand,
};
use reader_config::BridgeConfig;
use tracing::{debug, info, warn};

use crate::channel::Outbox;
use crate::hook::create_hook;
use crate::host::Host;
use crate::instance::HookInstance;

/// A registry that maps hook IDs to mounted hook instances.
///
/// Owns the host, routes server commands and browser events to the
/// instances subscribed to them, and removes instances on destroy so that
/// nothing reaches them afterwards.
pub struct HookRegistry<H: Host> {
    host: H,
    config: BridgeConfig,
    outbox: Outbox,
    instances: BTreeMap<HookId, HookInstance<H>>,
    next_id: u32,
}

impl<H: Host> HookRegistry<H> {
    pub fn new(host: H, config: BridgeConfig, outbox: Outbox) -> Self {
        Self {
            host,
            config,
            outbox,
            instances: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Replace the configuration. Only hooks mounted afterwards see it.
    pub fn set_config(&mut self, config: BridgeConfig) {
        self.config = config;
    }

    /// Reserve an ID for [`HookRegistry::mount_as`].
    pub fn allocate_id(&mut self) -> HookId {
        self.next_id += 1;
        HookId(self.next_id)
    }

    /// Create a hook for `element` and mount it.
    pub fn mount(&mut self, kind: HookKind, element: H::Node) -> HookId {
        let id = self.allocate_id();
        self.attach(id, kind, element);
        id
    }

    /// Mount under a previously allocated ID.
    pub fn mount_as(&mut self, id: HookId, kind: HookKind, element: H::Node) -> Result<HookId> {
        if self.instances.contains_key(&id) {
            return Err(BridgeError::Other(format!("{id} is already mounted")));
        }
        self.attach(id, kind, element);
        Ok(id)
    }

    fn attach(&mut self, id: HookId, kind: HookKind, element: H::Node) {
        let hook = create_hook(kind, &self.config);
        let mut instance = HookInstance::new(id, element, hook);
        if let Err(e) = instance.mount(&self.host, &self.outbox) {
            warn!(hook = %id, error = %e, "mount failed");
            return;
        }
        info!(
            hook = %id,
            kind = kind.name(),
            subscriptions = instance.subscription_count(),
            "hook mounted"
        );
        self.instances.insert(id, instance);
    }

    /// Re-run the hook after the server patched its element.
    pub fn update(&mut self, id: HookId) -> Result<()> {
        let instance = self
            .instances
            .get_mut(&id)
            .ok_or_else(|| BridgeError::HookNotFound(id.to_string()))?;
        debug!(hook = %id, "hook updated");
        instance.update(&self.host, &self.outbox)
    }

    /// Deliver a command to one instance.
    pub fn deliver_command(&mut self, id: HookId, command: ServerCommand) -> bool {
        match self.instances.get_mut(&id) {
            Some(instance) => instance.deliver_command(&self.host, &self.outbox, command),
            None => {
                debug!(hook = %id, command = command.wire_name(), "command for unknown hook dropped");
                false
            }
        }
    }

    /// Deliver a command to every instance subscribed to it. Returns how
    /// many instances handled it.
    pub fn broadcast_command(&mut self, command: ServerCommand) -> usize {
        let mut delivered = 0;
        for instance in self.instances.values_mut() {
            if instance.deliver_command(&self.host, &self.outbox, command) {
                delivered += 1;
            }
        }
        debug!(command = command.wire_name(), delivered, "command broadcast");
        delivered
    }

    /// Deliver a browser event to one instance.
    pub fn dispatch_browser_event(&mut self, id: HookId, event: BrowserEvent) -> bool {
        match self.instances.get_mut(&id) {
            Some(instance) => instance.deliver_browser_event(&self.host, &self.outbox, event),
            None => {
                debug!(hook = %id, ?event, "browser event for unknown hook dropped");
                false
            }
        }
    }

    /// Deliver a browser event to every instance listening for it.
    pub fn broadcast_browser_event(&mut self, event: BrowserEvent) -> usize {
        let mut delivered = 0;
        for instance in self.instances.values_mut() {
            if instance.deliver_browser_event(&self.host, &self.outbox, event) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Destroy a hook by ID, releasing all its subscriptions.
    pub fn destroy(&mut self, id: HookId) -> bool {
        let Some(mut instance) = self.instances.remove(&id) else {
            return false;
        };
        match instance.destroy(&self.host, &self.outbox) {
            Ok(released) => info!(hook = %id, released, "hook destroyed"),
            Err(e) => warn!(hook = %id, error = %e, "destroy failed"),
        }
        true
    }

    /// Destroy all active hooks. Used when the page goes away.
    pub fn destroy_all(&mut self) {
        for id in self.active_hooks() {
            self.destroy(id);
        }
    }

    pub fn active_hooks(&self) -> Vec<HookId> {
        self.instances.keys().copied().collect()
    }

    pub fn state(&self, id: HookId) -> Option<LifecycleState> {
        self.instances.get(&id).map(|i| i.state())
    }

    pub fn kind(&self, id: HookId) -> Option<HookKind> {
        self.instances.get(&id).map(|i| i.kind())
    }

    pub fn count(&self) -> usize {
        self.instances.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{self, Inbox};
    use crate::memory::{Binding, MemoryHost, NodeId};
    use reader_common::ClientEvent;

    fn registry() -> (HookRegistry<MemoryHost>, Inbox, MemoryHost) {
        let host = MemoryHost::new(800.0, 1200.0);
        let (outbox, inbox) = channel::channel();
        (
            HookRegistry::new(host.clone(), BridgeConfig::default(), outbox),
            inbox,
            host,
        )
    }

    fn element(host: &MemoryHost) -> NodeId {
        let root = host.create_element("div");
        let img = host.create_element("img");
        host.append_child(root, img);
        root
    }

    #[test]
    fn ids_are_unique_and_displayable() {
        let (mut reg, _inbox, host) = registry();
        let a = reg.mount(HookKind::ScrollToTop, element(&host));
        let b = reg.mount(HookKind::ScrollToTop, element(&host));
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "hook-1");
        assert_eq!(reg.count(), 2);
        assert_eq!(reg.active_hooks(), vec![a, b]);
    }

    #[test]
    fn mount_records_kind_and_state() {
        let (mut reg, _inbox, host) = registry();
        let id = reg.mount(HookKind::ResponsiveImage, element(&host));
        assert_eq!(reg.kind(id), Some(HookKind::ResponsiveImage));
        assert_eq!(reg.state(id), Some(LifecycleState::Mounted));

        reg.update(id).unwrap();
        assert_eq!(reg.state(id), Some(LifecycleState::Updated));
    }

    #[test]
    fn update_unknown_hook_fails() {
        let (mut reg, _inbox, _host) = registry();
        let err = reg.update(HookId(99)).unwrap_err();
        assert!(matches!(err, BridgeError::HookNotFound(ref id) if id == "hook-99"));
    }

    #[test]
    fn update_after_destroy_fails() {
        let (mut reg, _inbox, host) = registry();
        let id = reg.mount(HookKind::ResponsiveImage, element(&host));
        assert!(reg.destroy(id));
        assert!(reg.update(id).is_err());
        assert_eq!(reg.state(id), None);
        assert!(!reg.destroy(id));
    }

    #[test]
    fn mount_as_uses_reserved_id() {
        let (mut reg, _inbox, host) = registry();
        let id = reg.allocate_id();
        assert_eq!(reg.mount_as(id, HookKind::ScrollToTop, element(&host)).unwrap(), id);
        assert!(reg
            .mount_as(id, HookKind::ScrollToTop, element(&host))
            .is_err());
        assert_eq!(reg.count(), 1);
    }

    #[test]
    fn broadcast_reaches_subscribed_hooks_only() {
        let (mut reg, _inbox, host) = registry();
        reg.mount(HookKind::ScrollToTop, element(&host));
        reg.mount(HookKind::ScrollToTop, element(&host));
        reg.mount(HookKind::ResponsiveImage, element(&host));

        assert_eq!(reg.broadcast_command(ServerCommand::ScrollToTop), 2);
        assert_eq!(reg.broadcast_command(ServerCommand::ToggleFullscreen), 0);
        assert_eq!(host.scrolls().len(), 2);
    }

    #[test]
    fn broadcast_browser_event_reaches_listeners() {
        let (mut reg, _inbox, host) = registry();
        reg.mount(HookKind::ResponsiveImage, element(&host));
        reg.mount(HookKind::ScrollToTop, element(&host));
        assert_eq!(reg.broadcast_browser_event(BrowserEvent::Resize), 1);
        assert_eq!(reg.broadcast_browser_event(BrowserEvent::FullscreenChange), 0);
    }

    #[test]
    fn full_page_session() {
        let (mut reg, mut inbox, host) = registry();
        let viewer = element(&host);
        host.patch_attribute(viewer, "data-base-url", "/api/comics/5/page/3");
        let fullscreen = reg.mount(HookKind::Fullscreen, viewer);
        let image = reg.mount(HookKind::ResponsiveImage, viewer);
        reg.mount(HookKind::ScrollToTop, element(&host));

        reg.broadcast_command(ServerCommand::ToggleFullscreen);
        for event in host.take_pending_events() {
            for owner in host.bound_hooks(Binding::Listener(event)) {
                reg.dispatch_browser_event(owner, event);
            }
        }
        reg.broadcast_command(ServerCommand::ScrollToTop);

        let events = inbox.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].hook, fullscreen);
        assert_eq!(
            events[0].event,
            ClientEvent::FullscreenChanged { is_fullscreen: true }
        );
        assert_eq!(
            host.get_attribute(NodeId(1), "src").as_deref(),
            Some("/api/comics/5/page/3?height=1200")
        );
        assert_eq!(host.scrolls().len(), 1);
        assert_eq!(reg.kind(image), Some(HookKind::ResponsiveImage));
    }

    #[test]
    fn destroy_all_releases_every_binding() {
        let (mut reg, _inbox, host) = registry();
        reg.mount(HookKind::Fullscreen, element(&host));
        reg.mount(HookKind::ResponsiveImage, element(&host));
        reg.mount(HookKind::ScrollToTop, element(&host));
        assert_eq!(host.active_bindings(), 7);

        reg.destroy_all();
        assert_eq!(reg.count(), 0);
        assert_eq!(host.active_bindings(), 0);
        assert_eq!(host.released_bindings().len(), 7);
    }

    #[test]
    fn config_change_applies_to_later_mounts() {
        let (mut reg, _inbox, host) = registry();
        let root = element(&host);
        host.patch_attribute(root, "data-base-url", "/p");

        let mut config = BridgeConfig::default();
        config.image.portrait_height = 900;
        reg.set_config(config);
        reg.mount(HookKind::ResponsiveImage, root);

        assert_eq!(reg.config().image.portrait_height, 900);
        assert_eq!(host.get_attribute(NodeId(1), "src").as_deref(), Some("/p?height=900"));
    }
}
