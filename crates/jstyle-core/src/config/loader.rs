//! Converts the TOML DTO layer into the [`CheckConfig`] domain tree.

use std::path::Path;

use crate::error::{ConfigCause, ConfigError};

use super::dto::{ModuleDto, RootDto};
use super::CheckConfig;

/// Name of the implicit root module every configuration file describes.
pub const ROOT_MODULE: &str = "Checker";

/// Loads a configuration file.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the file cannot be read or parsed.
pub fn from_file(path: &Path) -> Result<CheckConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(ConfigCause::Invalid(format!(
            "unable to read {}: {e}",
            path.display()
        )))
    })?;
    from_str(&content)
}

/// Parses configuration from a TOML string.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the TOML is invalid.
pub fn from_str(content: &str) -> Result<CheckConfig, ConfigError> {
    let dto: RootDto = toml::from_str(content)
        .map_err(|e| ConfigError::new(ConfigCause::Invalid(e.to_string())))?;

    let mut root = CheckConfig::new(ROOT_MODULE);
    for (name, value) in dto.properties {
        root = root.with_property(name, value);
    }
    for module in dto.modules {
        root = root.with_child(convert(module));
    }
    Ok(root)
}

fn convert(dto: ModuleDto) -> CheckConfig {
    let mut config = CheckConfig::new(dto.name);
    for (name, value) in dto.properties {
        config = config.with_property(name, value);
    }
    for child in dto.modules {
        config = config.with_child(convert(child));
    }
    config
}
