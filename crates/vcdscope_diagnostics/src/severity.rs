//! Whether a diagnostic stopped the load.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a diagnostic affected loading the dump. `Warning < Error`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The store was built; the offending change or marker was skipped or reordered.
    Warning,
    /// No store was built.
    Error,
}

impl Severity {
    /// Returns `true` when the load did not produce a store.
    pub fn is_fatal(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}
