//! Fullscreen and scroll configuration types.

use reader_common::ScrollBehavior;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FullscreenConfig {
    /// Marker selecting the descendant that goes fullscreen. The hook
    /// element itself is used when nothing matches.
    pub target_selector: String,
}

impl Default for FullscreenConfig {
    fn default() -> Self {
        Self {
            target_selector: "[data-fullscreen-target]".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct ScrollConfig {
    pub behavior: ScrollBehavior,
}
