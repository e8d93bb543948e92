//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ViewerConfig;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "vcdscope.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ViewerConfig, ConfigError> {
    let config: ViewerConfig =
        toml::from_str(content).map_err(|e| ConfigError::Syntax(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Resolves the configuration to use.
///
/// An explicit path must exist. Otherwise `<dir>/vcdscope.toml` is used if
/// present, and defaults if not. Returns the config and the file it came from.
pub fn discover_config(
    explicit: Option<&Path>,
    dir: &Path,
) -> Result<(ViewerConfig, Option<PathBuf>), ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                return Ok((ViewerConfig::default(), None));
            }
            candidate
        }
    };
    let config = load_config(&path)?;
    Ok((config, Some(path)))
}

/// Rejects values the viewer cannot work with.
fn validate_config(config: &ViewerConfig) -> Result<(), ConfigError> {
    let view = &config.view;
    let positive = [
        ("view.stride", view.stride),
        ("view.length", view.length),
        ("view.name_width", view.name_width as u64),
    ];
    if let Some(&(key, _)) = positive.iter().find(|(_, value)| *value == 0) {
        return Err(ConfigError::OutOfRange {
            key,
            requirement: "must be at least 1",
        });
    }
    if config.selection.file.as_os_str().is_empty() {
        return Err(ConfigError::OutOfRange {
            key: "selection.file",
            requirement: "must not be empty",
        });
    }
    Ok(())
}
