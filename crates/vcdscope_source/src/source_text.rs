//! A named text buffer with line-start indexing for fast line/column lookup.

use crate::location::Location;
use crate::span::Span;

/// Precomputed byte offsets of every line start in a buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Scans `content` once and records where each line begins.
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: content.len(),
        }
    }

    /// Converts a byte offset into a [`Location`] using binary search.
    pub fn location(&self, offset: usize) -> Location {
        let offset = offset.min(self.len);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        Location {
            offset,
            line: (line_idx + 1) as u32,
            column: (offset - self.line_starts[line_idx] + 1) as u32,
        }
    }

    /// Returns the number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A borrowed waveform buffer together with the name it was loaded from.
///
/// Used by the diagnostic renderer to quote the offending line.
pub struct SourceText<'a> {
    /// The display name (usually the file path).
    pub name: &'a str,
    /// The full text content.
    pub content: &'a str,
    index: LineIndex,
}

impl<'a> SourceText<'a> {
    /// Wraps a buffer and indexes its lines.
    pub fn new(name: &'a str, content: &'a str) -> Self {
        Self {
            name,
            content,
            index: LineIndex::new(content),
        }
    }

    /// Resolves a byte offset to line/column coordinates.
    pub fn location(&self, offset: usize) -> Location {
        self.index.location(offset)
    }

    /// Returns the text covered by `span`, clamped to the buffer.
    pub fn snippet(&self, span: Span) -> &'a str {
        let end = span.end.min(self.content.len());
        let start = span.start.min(end);
        &self.content[start..end]
    }

    /// Returns the full line containing `offset`, without its line terminator.
    pub fn line_text(&self, offset: usize) -> &'a str {
        let offset = offset.min(self.content.len());
        let start = self.content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
        let end = self.content[offset..]
            .find('\n')
            .map_or(self.content.len(), |pos| offset + pos);
        self.content[start..end].trim_end_matches('\r')
    }

    /// Formats `span` as `name:line:column`.
    pub fn describe(&self, span: Span) -> String {
        let loc = self.location(span.start);
        format!("{}:{}", self.name, loc)
    }
}
