//! Parsing and validation of `vcdscope.toml` viewer configuration files.
//!
//! Every section is optional; a missing file means defaults throughout.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{discover_config, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
