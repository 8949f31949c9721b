mod console;
mod host;
mod live_view;
mod runtime;

pub use host::{WebHost, WebSubscription};
pub use live_view::LiveViewHook;
pub use runtime::{configure, mount_hook, start, MountedHook};
