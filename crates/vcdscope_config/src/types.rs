//! Configuration types deserialized from `vcdscope.toml`.

use serde::Deserialize;
use std::path::PathBuf;
use vcdscope_vcd::{ParseOptions, TimePolicy};

/// The top-level viewer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewerConfig {
    /// How dumps are decoded.
    #[serde(default)]
    pub parse: ParseConfig,
    /// The initial window of the command loop and `show`.
    #[serde(default)]
    pub view: ViewConfig,
    /// Where the signal selection is persisted.
    #[serde(default)]
    pub selection: SelectionConfig,
}

impl ViewerConfig {
    /// Converts the `[parse]` section into decoder options.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            time_policy: self.parse.time_policy,
        }
    }
}

/// The `[parse]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParseConfig {
    /// `"strict"` (default) or `"lenient"`.
    #[serde(default)]
    pub time_policy: TimePolicy,
}

/// The `[view]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Initial window start time.
    pub start: u64,
    /// Initial window length in time units.
    pub length: u64,
    /// Time units per rendered column.
    pub stride: u64,
    /// Characters of the signal name shown at the start of each row.
    pub name_width: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            start: 0,
            length: 50,
            stride: 1,
            name_width: 5,
        }
    }
}

/// The `[selection]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// File used by `sc`/`lc`, relative to the working directory.
    pub file: PathBuf,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("signals.json"),
        }
    }
}
