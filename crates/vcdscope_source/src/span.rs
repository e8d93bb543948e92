//! Byte-offset ranges within a waveform text buffer.

use serde::{Deserialize, Serialize};

/// A byte offset range within the parsed buffer.
///
/// The `start` is inclusive and `end` is exclusive. Every token, event and
/// diagnostic produced by the parser carries one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the start of the span (inclusive).
    pub start: usize,
    /// Byte offset of the end of the span (exclusive).
    pub end: usize,
}

impl Span {
    /// A placeholder span for diagnostics that have no source location.
    pub const DUMMY: Span = Span {
        start: usize::MAX,
        end: usize::MAX,
    };

    /// Creates a new span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Produces a span that covers both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if this span has zero length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if this is the dummy span.
    pub fn is_dummy(&self) -> bool {
        *self == Span::DUMMY
    }
}
