//! Browser bridge hooks for a server-driven reader page.
//!
//! Provides:
//! - `FullscreenBridge`: native fullscreen <-> server state sync
//! - `AdaptiveImageResolver`: orientation-aware image URL and layout class
//! - `ScrollCommandExecutor`: server-requested scroll to top
//! - `HookRegistry`: lifecycle, routing and subscription release per instance
//! - `MemoryHost`: an in-memory DOM/window used by tests and the replay CLI
//!
//! Hooks never touch the browser directly. Everything goes through the
//! [`Host`] trait, so the same logic runs against `web-sys` in the browser
//! and against [`MemoryHost`] natively.

pub mod channel;
pub mod fullscreen;
pub mod hook;
pub mod host;
pub mod instance;
pub mod memory;
pub mod registry;
pub mod responsive_image;
pub mod scroll;
pub mod subscriptions;

pub use channel::{Envelope, Inbox, Outbox};
pub use fullscreen::FullscreenBridge;
pub use hook::{create_hook, Hook, HookContext};
pub use host::Host;
pub use instance::HookInstance;
pub use memory::{Binding, MemoryEffect, MemoryHost, NodeId};
pub use registry::HookRegistry;
pub use responsive_image::{AdaptiveImageResolver, ImageDescriptor, ResolvedImage};
pub use scroll::ScrollCommandExecutor;
pub use subscriptions::Subscriptions;
