//! Configuration schema types for the reader bridge.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! The defaults reproduce the hook behavior the page markup expects.

mod fullscreen;
mod image;
mod system;

pub use fullscreen::*;
pub use image::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct BridgeConfig {
    pub image: ImageConfig,
    pub fullscreen: FullscreenConfig,
    pub scroll: ScrollConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
