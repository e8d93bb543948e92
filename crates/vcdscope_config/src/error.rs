//! Why a `vcdscope.toml` was not accepted.

use std::path::PathBuf;

/// Errors from reading, parsing or validating a viewer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file named by `--config` (or found in the working directory) could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        /// The file that was opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Not TOML, an unknown key, or a value of the wrong type (such as an unknown `time_policy`).
    #[error("invalid config: {0}")]
    Syntax(String),

    /// A well-typed setting the viewer cannot use.
    #[error("invalid config: `{key}` {requirement}")]
    OutOfRange {
        /// Dotted path of the setting, e.g. `view.stride`.
        key: &'static str,
        /// What the value has to satisfy.
        requirement: &'static str,
    },
}
