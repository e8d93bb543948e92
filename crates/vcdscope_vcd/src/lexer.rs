//! Lazy whitespace tokenizer.
//!
//! The dump grammar is almost entirely whitespace-delimited, so the lexer
//! does nothing more than find runs of non-whitespace bytes. Interpretation
//! happens in the parser.

use vcdscope_source::Span;

/// A run of non-whitespace text and where it sits in the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'src> {
    /// The token text, borrowed from the buffer.
    pub text: &'src str,
    /// The byte range of the token.
    pub span: Span,
}

/// Yields [`Token`]s one at a time without allocating.
#[derive(Clone, Debug)]
pub struct Lexer<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer positioned at the start of `src`.
    pub fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }

    /// Returns the byte offset just past the last token returned.
    pub fn offset(&self) -> usize {
        self.pos
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        let bytes = self.src.as_bytes();
        let start = self.pos + bytes[self.pos..]
            .iter()
            .position(|b| !b.is_ascii_whitespace())?;
        let end = bytes[start..]
            .iter()
            .position(|b| b.is_ascii_whitespace())
            .map_or(bytes.len(), |len| start + len);
        self.pos = end;
        Some(Token {
            text: &self.src[start..end],
            span: Span::new(start, end),
        })
    }
}
