//! Byte spans into a waveform text buffer and their line/column resolution.
//!
//! The parser works on a single in-memory buffer, so spans are plain byte
//! ranges. [`SourceText`] pairs a buffer with a display name and a line index
//! for turning offsets into [`Location`]s when reporting diagnostics.

#![warn(missing_docs)]

pub mod location;
pub mod source_text;
pub mod span;

pub use location::Location;
pub use source_text::{LineIndex, SourceText};
pub use span::Span;
