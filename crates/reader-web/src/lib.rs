//! Browser backend for the reader bridge hooks.
//!
//! On `wasm32` this exposes a `web-sys` [`Host`](reader_hooks::Host) and a
//! small exported API (`configure`, `mountHook`) that the LiveView hook
//! objects in [`HOOKS_SHIM`] call into. Everything else compiles on every
//! target so the shim can be served by native tooling.
//!
//! In the browser, `tracing` output goes to the console at the configured
//! `logging.level`.

pub mod fullscreen_api;
#[cfg(any(target_arch = "wasm32", test))]
mod log_line;
pub mod shim;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use fullscreen_api::FullscreenApi;
pub use shim::{HOOKS_SHIM, SHIM_GLOBAL};

#[cfg(target_arch = "wasm32")]
pub use wasm::{configure, mount_hook, start, LiveViewHook, MountedHook, WebHost, WebSubscription};
