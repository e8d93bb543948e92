//! Content hashing for recognising an unchanged dump on reload.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 digest of a waveform text buffer.
///
/// The command loop compares the digest of a freshly read file against the
/// digest of the loaded one to report whether a reload changed anything.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(u128);

impl ContentHash {
    /// Hashes a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data))
    }

    /// Hashes UTF-8 text.
    pub fn of_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Returns the first 8 hex digits, enough to tell two loads apart in a log line.
    pub fn short(&self) -> String {
        format!("{:08x}", (self.0 >> 96) as u32)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({}..)", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(ContentHash::of_text("#0\n1!\n"), ContentHash::of_text("#0\n1!\n"));
    }

    #[test]
    fn different_inputs_differ() {
        assert_ne!(ContentHash::of_text("#0"), ContentHash::of_text("#1"));
    }

    #[test]
    fn display_is_32_hex_chars() {
        let s = ContentHash::of_text("vcd").to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn short_is_prefix_of_display() {
        let h = ContentHash::of_text("vcd");
        assert!(h.to_string().starts_with(&h.short()));
        assert_eq!(format!("{h:?}"), format!("ContentHash({}..)", h.short()));
    }
}
