use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::BridgeError;

/// Attachment state of a hook instance.
///
/// `Unmounted -> Mounted -> Updated* -> Destroyed`. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LifecycleState {
    #[default]
    Unmounted,
    Mounted,
    Updated,
    Destroyed,
}

impl LifecycleState {
    /// Whether the instance may execute commands and emit events.
    pub fn is_live(self) -> bool {
        matches!(self, LifecycleState::Mounted | LifecycleState::Updated)
    }

    pub fn transition(self, to: LifecycleState) -> Result<LifecycleState, BridgeError> {
        use LifecycleState::*;
        match (self, to) {
            (Unmounted, Mounted) | (Mounted | Updated, Updated) | (Mounted | Updated, Destroyed) => {
                Ok(to)
            }
            (from, to) => Err(BridgeError::InvalidTransition { from, to }),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Unmounted => "unmounted",
            LifecycleState::Mounted => "mounted",
            LifecycleState::Updated => "updated",
            LifecycleState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}
