//! Structured diagnostics for waveform loading.
//!
//! Recoverable problems found while ingesting a dump (undeclared identifier
//! codes, time going backwards in lenient mode, aliased declarations) are
//! reported as [`Diagnostic`]s rather than dropped. The [`DiagnosticSink`]
//! accumulates them during a parse, and [`TerminalRenderer`] formats them for
//! the command line.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::TerminalRenderer;
pub use severity::Severity;
pub use sink::DiagnosticSink;
