//! The user's ordered list of selected signal keys and its JSON persistence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Version written into saved selection files.
pub const SELECTION_FORMAT_VERSION: u32 = 1;

/// Errors from saving or loading a selection file.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// Reading or writing the file failed.
    #[error("selection file I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid selection document.
    #[error("malformed selection file: {0}")]
    Json(#[from] serde_json::Error),
    /// The file was written by an incompatible version.
    #[error("unsupported selection file version {0} (expected {expected})", expected = SELECTION_FORMAT_VERSION)]
    UnsupportedVersion(u32),
}

#[derive(Serialize, Deserialize)]
struct SelectionFile {
    version: u32,
    signals: Vec<String>,
}

/// Canonical keys of the selected signals, in display order, without duplicates.
///
/// Keys that are not present in the loaded file are kept so that a selection
/// survives loading a different dump.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    keys: Vec<String>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key` unless it is already selected. Returns whether it was added.
    pub fn add(&mut self, key: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.keys.push(key.to_string());
        true
    }

    /// Removes `key`. Returns whether it was selected.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        self.keys.len() != before
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Returns `true` if `key` is selected.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Selected keys in display order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of selected keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Writes the selection as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), SelectionError> {
        let file = SelectionFile {
            version: SELECTION_FORMAT_VERSION,
            signals: self.keys.clone(),
        };
        let mut json = serde_json::to_string_pretty(&file)?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    /// Reads a selection written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self, SelectionError> {
        let content = fs::read_to_string(path)?;
        let file: SelectionFile = serde_json::from_str(&content)?;
        if file.version != SELECTION_FORMAT_VERSION {
            return Err(SelectionError::UnsupportedVersion(file.version));
        }
        let mut selection = Self::new();
        for key in &file.signals {
            selection.add(key);
        }
        Ok(selection)
    }
}
