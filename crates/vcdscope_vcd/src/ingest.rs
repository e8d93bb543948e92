//! Drives the parser into a [`WaveformStore`].
//!
//! Every event passes through a single exhaustive match over
//! [`VcdEvent`]. Fatal problems stop the parse; recoverable ones become
//! diagnostics in the [`ParseReport`].

use crate::error::VcdError;
use crate::event::{Spanned, VcdEvent};
use crate::parser::VcdParser;
use crate::store::{Declared, ScopeInfo, StoreError, WaveformStore};
use crate::value::decode;
use serde::{Deserialize, Serialize};
use vcdscope_diagnostics::{Diagnostic, DiagnosticSink};
use vcdscope_source::{LineIndex, Location, Span};

pub use vcdscope_diagnostics::code::{ALIASED_DECLARATION, TIME_WENT_BACKWARDS, UNRESOLVED_ID};

/// How to treat a time marker lower than the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePolicy {
    /// Fail the parse with [`VcdError::NonMonotonicTime`].
    #[default]
    Strict,
    /// Emit a warning and keep going; later changes are inserted in time order.
    Lenient,
}

/// Options for [`parse_with`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Handling of backwards time markers.
    pub time_policy: TimePolicy,
}

/// A value change for an identifier that no declaration introduced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnresolvedRef {
    /// The identifier code as written.
    pub id: String,
    /// The active time when the change appeared.
    pub time: u64,
    /// Where the change appeared.
    pub location: Location,
}

/// Recoverable findings of a successful parse.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseReport {
    /// Warnings in file order.
    pub diagnostics: Vec<Diagnostic>,
    /// Dropped changes for undeclared identifiers, in file order.
    pub unresolved: Vec<UnresolvedRef>,
}

impl ParseReport {
    /// Returns `true` if nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.unresolved.is_empty()
    }
}

/// The result of a successful parse.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedWaveform {
    /// The populated store.
    pub store: WaveformStore,
    /// Warnings and unresolved references.
    pub report: ParseReport,
}

/// Parses `text` with default options.
///
/// # Errors
///
/// Returns the first fatal [`VcdError`]; no partial store is produced.
pub fn parse(text: &str) -> Result<ParsedWaveform, VcdError> {
    parse_with(text, &ParseOptions::default())
}

/// Parses `text` with explicit options.
///
/// # Errors
///
/// Returns the first fatal [`VcdError`]; no partial store is produced.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<ParsedWaveform, VcdError> {
    let mut ingestor = Ingestor::new(text, options);
    for event in VcdParser::new(text) {
        ingestor.apply(event?)?;
    }
    Ok(ingestor.finish())
}

struct Ingestor<'src, 'opt> {
    src: &'src str,
    options: &'opt ParseOptions,
    lines: Option<LineIndex>,
    store: WaveformStore,
    sink: DiagnosticSink,
    unresolved: Vec<UnresolvedRef>,
}

impl<'src, 'opt> Ingestor<'src, 'opt> {
    fn new(src: &'src str, options: &'opt ParseOptions) -> Self {
        Self {
            src,
            options,
            lines: None,
            store: WaveformStore::new(),
            sink: DiagnosticSink::new(),
            unresolved: Vec::new(),
        }
    }

    fn location(&mut self, offset: usize) -> Location {
        let src = self.src;
        self.lines
            .get_or_insert_with(|| LineIndex::new(src))
            .location(offset)
    }

    fn token(&self, span: Span) -> &'src str {
        self.src.get(span.start..span.end).unwrap_or_default()
    }

    fn apply(&mut self, event: Spanned<VcdEvent<'src>>) -> Result<(), VcdError> {
        let Spanned { node, span } = event;
        match node {
            VcdEvent::Date(date) => self.store.metadata_mut().date = Some(date),
            VcdEvent::Version(version) => self.store.metadata_mut().version = Some(version),
            VcdEvent::TimescaleSet(timescale) => {
                self.store.metadata_mut().timescale = Some(timescale);
            }
            VcdEvent::ScopeOpen { kind, path } => self.store.add_scope(ScopeInfo { kind, path }),
            VcdEvent::ScopeClose | VcdEvent::EndDefinitions => {}
            VcdEvent::VarDecl(signal) => {
                let key = signal.key();
                match self.store.declare(signal) {
                    Ok(Declared::New) => {}
                    Ok(Declared::Alias) => self.sink.emit(
                        Diagnostic::warning(
                            ALIASED_DECLARATION,
                            format!("`{key}` is declared more than once with the same identifier"),
                            span,
                        )
                        .with_note("later declarations are treated as aliases of the first"),
                    ),
                    Err(err) => {
                        let location = self.location(span.start);
                        return Err(VcdError::structural(err.to_string(), self.token(span), location));
                    }
                }
            }
            VcdEvent::TimeMark(time) => self.time_mark(time, span)?,
            VcdEvent::DumpBegin(_) | VcdEvent::DumpEnd(_) => {}
            VcdEvent::ValueChange { value, id } => {
                let time = self.store.active_time();
                let Some(signal) = self.store.signal(id) else {
                    self.unresolved_ref(id, time, span);
                    return Ok(());
                };
                let decoded = match decode(&value, signal) {
                    Ok(decoded) => decoded,
                    Err(err) => {
                        let location = self.location(span.start);
                        return Err(VcdError::grammar(err.to_string(), self.token(span), location));
                    }
                };
                if let Err(err) = self.store.record_change(id, time, decoded) {
                    let location = self.location(span.start);
                    return Err(VcdError::structural(err.to_string(), id, location));
                }
            }
        }
        Ok(())
    }

    fn time_mark(&mut self, time: u64, span: Span) -> Result<(), VcdError> {
        match self.store.advance_time(time) {
            Ok(()) => Ok(()),
            Err(StoreError::NonMonotonicTime { previous, time }) => match self.options.time_policy {
                TimePolicy::Strict => Err(VcdError::NonMonotonicTime {
                    previous,
                    time,
                    location: self.location(span.start),
                }),
                TimePolicy::Lenient => {
                    self.sink.emit(
                        Diagnostic::warning(
                            TIME_WENT_BACKWARDS,
                            format!("time went backwards from #{previous} to #{time}"),
                            span,
                        )
                        .with_note("changes after this marker are inserted in time order"),
                    );
                    self.store.force_time(time);
                    Ok(())
                }
            },
            Err(err) => {
                let location = self.location(span.start);
                Err(VcdError::structural(err.to_string(), self.token(span), location))
            }
        }
    }

    fn unresolved_ref(&mut self, id: &str, time: u64, span: Span) {
        self.sink.emit(
            Diagnostic::warning(
                UNRESOLVED_ID,
                format!("value change for undeclared identifier `{id}`"),
                span,
            )
            .with_note(format!("the change at #{time} was dropped")),
        );
        let location = self.location(span.start);
        self.unresolved.push(UnresolvedRef {
            id: id.to_string(),
            time,
            location,
        });
    }

    fn finish(self) -> ParsedWaveform {
        ParsedWaveform {
            store: self.store,
            report: ParseReport {
                diagnostics: self.sink.take_all(),
                unresolved: self.unresolved,
            },
        }
    }
}
