//! Types shared by the reader bridge crates: wire messages, hook identity,
//! viewport and lifecycle types, and the error taxonomy.

pub mod errors;
pub mod messages;
pub mod types;

pub use errors::{BridgeError, ConfigError, HookFault};
pub use messages::{ClientEvent, ServerCommand};
pub use types::{
    BrowserEvent, EventSource, HookId, HookKind, LifecycleState, Orientation, ScrollBehavior,
    ScrollTarget, ViewportState,
};

pub type Result<T> = std::result::Result<T, BridgeError>;
