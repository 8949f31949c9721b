//! Reading the TOML config file used by the command-line tools.

use std::io;
use std::path::{Path, PathBuf};

use crate::schema::BridgeConfig;
use crate::validation;
use reader_common::ConfigError;
use tracing::debug;

/// `<config dir>/reader-bridge/config.toml`, when the platform has one.
fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reader-bridge").join("config.toml"))
}

/// Parse and validate TOML text. Absent sections and fields take defaults.
pub fn parse(content: &str) -> Result<BridgeConfig, ConfigError> {
    let config: BridgeConfig = toml::from_str(content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate the file at `path`.
pub fn load_from_path(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("failed to read {}: {e}", path.display())),
    })?;
    let config = parse(&content)?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load the file at the platform default path, or the defaults when there
/// is no such file.
pub fn load_default() -> Result<BridgeConfig, ConfigError> {
    match default_path() {
        Some(path) if path.exists() => load_from_path(&path),
        _ => {
            debug!("no config file, using defaults");
            Ok(BridgeConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LogLevel, ScrollConfig};
    use reader_common::ScrollBehavior;

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(p) if p == path));
    }

    #[test]
    fn loads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[image]\nportrait_height = 900\n").unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.image.portrait_height, 900);
        assert_eq!(config.image.selector, "img");
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = parse("[image\nportrait_height = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[image]\nportrait_height = 0\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_text_is_the_default_config() {
        assert_eq!(parse("").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn every_section_can_be_overridden() {
        let config = parse(
            r##"
[image]
portrait_class = "tall"

[fullscreen]
target_selector = "#viewer"

[scroll]
behavior = "instant"

[logging]
level = "DEBUG"
"##,
        )
        .unwrap();
        assert_eq!(config.image.portrait_class, "tall");
        assert_eq!(config.fullscreen.target_selector, "#viewer");
        assert_eq!(
            config.scroll,
            ScrollConfig {
                behavior: ScrollBehavior::Instant
            }
        );
        assert_eq!(config.logging.level, LogLevel::Debug);
    }
}
