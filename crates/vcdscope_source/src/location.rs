//! Human-readable positions with line/column coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A byte offset resolved to 1-indexed line and column coordinates.
///
/// Columns count bytes, not characters; dumps are ASCII in practice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset into the buffer.
    pub offset: usize,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl Location {
    /// Resolves `offset` against `text` by scanning for newlines.
    ///
    /// Intended for one-off error reporting; use [`LineIndex`](crate::LineIndex)
    /// when resolving many offsets in the same buffer.
    pub fn resolve(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text.as_bytes()[..offset];
        let line = before.iter().filter(|b| **b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |pos| pos + 1);
        Self {
            offset,
            line: line as u32,
            column: (offset - line_start + 1) as u32,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_first_line() {
        let loc = Location::resolve("abc\ndef", 1);
        assert_eq!((loc.line, loc.column), (1, 2));
    }

    #[test]
    fn resolve_later_line() {
        let loc = Location::resolve("abc\ndef\nghi", 9);
        assert_eq!((loc.line, loc.column), (3, 2));
        assert_eq!(loc.offset, 9);
    }

    #[test]
    fn resolve_clamps_past_end() {
        let loc = Location::resolve("ab\n", 100);
        assert_eq!(loc.offset, 3);
        assert_eq!((loc.line, loc.column), (2, 1));
    }

    #[test]
    fn display_format() {
        let loc = Location {
            offset: 0,
            line: 10,
            column: 5,
        };
        assert_eq!(loc.to_string(), "10:5");
    }
}
