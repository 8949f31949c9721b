//! Full configuration validation.
//!
//! Validates numeric ranges and rejects empty selectors or class sets.

use crate::schema::BridgeConfig;
use reader_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &BridgeConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(
        &mut errors,
        "image.portrait_height",
        config.image.portrait_height,
        1,
        10_000,
    );
    validate_non_empty(&mut errors, "image.selector", &config.image.selector);
    validate_non_empty(&mut errors, "image.portrait_class", &config.image.portrait_class);
    validate_non_empty(&mut errors, "image.landscape_class", &config.image.landscape_class);
    validate_non_empty(&mut errors, "image.page_route", &config.image.page_route);
    validate_non_empty(
        &mut errors,
        "fullscreen.target_selector",
        &config.fullscreen.target_selector,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_non_empty(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    }
}
