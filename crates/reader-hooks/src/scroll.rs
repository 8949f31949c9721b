use reader_common::{HookKind, ScrollBehavior, ScrollTarget, ServerCommand};
use tracing::debug;

use crate::hook::{Hook, HookContext};
use crate::host::Host;

/// Scrolls the window to the top when the server sends `scroll-to-top`.
pub struct ScrollCommandExecutor {
    behavior: ScrollBehavior,
}

impl ScrollCommandExecutor {
    pub fn new(behavior: ScrollBehavior) -> Self {
        Self { behavior }
    }
}

impl<H: Host> Hook<H> for ScrollCommandExecutor {
    fn kind(&self) -> HookKind {
        HookKind::ScrollToTop
    }

    fn mounted(&mut self, ctx: &mut HookContext<'_, H>) {
        ctx.subscribe(ServerCommand::ScrollToTop);
    }

    fn on_command(&mut self, command: ServerCommand, ctx: &mut HookContext<'_, H>) {
        if command == ServerCommand::ScrollToTop {
            debug!(hook = %ctx.id(), "scrolling to top");
            ctx.host().scroll_to(ScrollTarget::top_of_page(self.behavior));
        }
    }
}
