//! One hook attached to one element, with its lifecycle and subscriptions.

use reader_common::{
    BrowserEvent, HookId, HookKind, LifecycleState, Result, ServerCommand,
};
use tracing::debug;

use crate::channel::Outbox;
use crate::hook::{Hook, HookContext};
use crate::host::Host;
use crate::subscriptions::Subscriptions;

pub struct HookInstance<H: Host> {
    id: HookId,
    element: H::Node,
    state: LifecycleState,
    hook: Box<dyn Hook<H>>,
    subscriptions: Subscriptions<H::Subscription>,
}

impl<H: Host> HookInstance<H> {
    pub fn new(id: HookId, element: H::Node, hook: Box<dyn Hook<H>>) -> Self {
        Self {
            id,
            element,
            state: LifecycleState::Unmounted,
            hook,
            subscriptions: Subscriptions::new(),
        }
    }

    pub fn id(&self) -> HookId {
        self.id
    }

    pub fn kind(&self) -> HookKind {
        self.hook.kind()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn element(&self) -> &H::Node {
        &self.element
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn split<'a>(
        &'a mut self,
        host: &'a H,
        outbox: &'a Outbox,
    ) -> (&'a mut Box<dyn Hook<H>>, HookContext<'a, H>) {
        let ctx = HookContext {
            id: self.id,
            host,
            element: &self.element,
            outbox,
            subscriptions: &mut self.subscriptions,
        };
        (&mut self.hook, ctx)
    }

    pub fn mount(&mut self, host: &H, outbox: &Outbox) -> Result<()> {
        self.state = self.state.transition(LifecycleState::Mounted)?;
        let (hook, mut ctx) = self.split(host, outbox);
        hook.mounted(&mut ctx);
        Ok(())
    }

    pub fn update(&mut self, host: &H, outbox: &Outbox) -> Result<()> {
        self.state = self.state.transition(LifecycleState::Updated)?;
        let (hook, mut ctx) = self.split(host, outbox);
        hook.updated(&mut ctx);
        Ok(())
    }

    /// Run a command if the instance is live and subscribed to it.
    pub fn deliver_command(&mut self, host: &H, outbox: &Outbox, command: ServerCommand) -> bool {
        if !self.state.is_live() || !self.subscriptions.handles(command) {
            debug!(hook = %self.id, command = command.wire_name(), state = %self.state, "command not delivered");
            return false;
        }
        let (hook, mut ctx) = self.split(host, outbox);
        hook.on_command(command, &mut ctx);
        true
    }

    /// Run a browser event if the instance is live and listening for it.
    pub fn deliver_browser_event(&mut self, host: &H, outbox: &Outbox, event: BrowserEvent) -> bool {
        if !self.state.is_live() || !self.subscriptions.listens_to(event) {
            debug!(hook = %self.id, ?event, state = %self.state, "browser event not delivered");
            return false;
        }
        let (hook, mut ctx) = self.split(host, outbox);
        hook.on_browser_event(event, &mut ctx);
        true
    }

    /// Move to `Destroyed` and release every subscription before returning.
    /// Returns how many subscriptions were released.
    pub fn destroy(&mut self, host: &H, outbox: &Outbox) -> Result<usize> {
        self.state = self.state.transition(LifecycleState::Destroyed)?;
        let (hook, mut ctx) = self.split(host, outbox);
        hook.destroyed(&mut ctx);
        Ok(self.subscriptions.release_all())
    }
}
