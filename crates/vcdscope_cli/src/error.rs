//! Errors surfaced by the `vcdscope` commands.

use std::io;
use vcdscope_config::ConfigError;
use vcdscope_vcd::{QueryError, VcdError};

use crate::selection::SelectionError;

/// Everything a command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The waveform file could not be opened, read or decompressed.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The file that failed.
        path: String,
        /// The underlying error.
        source: io::Error,
    },

    /// The waveform file did not decode.
    #[error("{path}:{source}")]
    Parse {
        /// The file that failed.
        path: String,
        /// The decoder error, which carries the position.
        source: VcdError,
    },

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The selection file could not be saved or loaded.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// A window or point query was rejected.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A canonical signal key did not match any signal.
    #[error("no signal named `{0}`")]
    UnknownKey(String),

    /// Writing output failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Serializing JSON output failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcdscope_source::Location;

    #[test]
    fn parse_error_prefixes_path() {
        let err = CliError::Parse {
            path: "dump.vcd".into(),
            source: VcdError::structural(
                "$upscope with no open scope",
                "$upscope",
                Location::resolve("$upscope", 0),
            ),
        };
        assert_eq!(
            err.to_string(),
            "dump.vcd:1:1: $upscope with no open scope (at `$upscope`)"
        );
    }

    #[test]
    fn unknown_key_message() {
        assert_eq!(
            CliError::UnknownKey("top:nope".into()).to_string(),
            "no signal named `top:nope`"
        );
    }
}
