use std::path::PathBuf;

use crate::types::LifecycleState;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Errors that cross an API boundary: wire parsing, registry lookups,
/// configuration and the CLI.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("unknown server command: {0}")]
    UnknownCommand(String),

    #[error("unknown hook: {0}")]
    UnknownHook(String),

    #[error("hook not found: {0}")]
    HookNotFound(String),

    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    #[error("host error: {0}")]
    Host(String),

    #[error("{0}")]
    Other(String),
}

/// Failures a hook absorbs at its own boundary. They are logged and never
/// returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookFault {
    #[error("native fullscreen capability unavailable")]
    CapabilityUnavailable,

    #[error("no element matches `{0}`")]
    MissingElement(String),

    #[error("data attribute `{0}` is missing")]
    AttributeMissing(&'static str),
}
