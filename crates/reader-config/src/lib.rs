//! Reader bridge configuration.
//!
//! TOML-based configuration with validation. All sections use defaults so
//! partial configs work; the defaults reproduce the behavior the page
//! markup and the image endpoint rely on.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use reader_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    BridgeConfig, FullscreenConfig, ImageConfig, LogLevel, LoggingConfig, ScrollConfig,
    CONFIG_SCHEMA_VERSION,
};
pub use toml_loader::{load_default, load_from_path};

use reader_common::ConfigError;

/// Load the config file from the platform default path, falling back to
/// defaults when none exists.
pub fn load_config() -> Result<BridgeConfig, ConfigError> {
    toml_loader::load_default()
}

/// Parse and validate a JSON config, as handed over by the browser page.
pub fn config_from_json(json: &str) -> Result<BridgeConfig, ConfigError> {
    let config: BridgeConfig = serde_json::from_str(json)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse JSON: {e}")))?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &BridgeConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
