//! Rustc-style terminal rendering of diagnostics.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use crossterm::style::{style, Stylize};
use vcdscope_source::SourceText;

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[W101]: value change for undeclared identifier `%`
///  --> dump.vcd:12:1
///   |
/// 12 | 1%
///   | ^^
///   |
///   = note: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// The terminal width; quoted source lines are truncated to fit.
    pub width: u16,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool, width: u16) -> Self {
        Self { color, width }
    }

    /// Renders a single diagnostic against the buffer it was reported for.
    pub fn render(&self, diag: &Diagnostic, source: &SourceText<'_>) -> String {
        let mut out = String::new();

        let header = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!("{}: {}\n", self.paint(&header, diag.severity), diag.message));

        if !diag.span.is_dummy() {
            let loc = source.location(diag.span.start);
            out.push_str(&format!(" --> {}\n", source.describe(diag.span)));

            let line_num = loc.line.to_string();
            let padding = " ".repeat(line_num.len());
            let line_text = self.truncate(source.line_text(diag.span.start));

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {line_text}\n"));

            let col_padding = " ".repeat((loc.column as usize).saturating_sub(1));
            let remaining = line_text.len().saturating_sub(col_padding.len()).max(1);
            let carets = "^".repeat(diag.span.len().clamp(1, remaining));
            out.push_str(&format!(
                "{padding} | {col_padding}{}\n",
                self.paint(&carets, diag.severity)
            ));
        }

        for note in &diag.notes {
            out.push_str(&format!("  = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("  = help: {help}\n"));
        }

        out
    }

    /// Renders a batch of diagnostics followed by a summary line, if any were given.
    pub fn render_all(&self, diags: &[Diagnostic], source: &SourceText<'_>) -> String {
        let mut out = String::new();
        for diag in diags {
            out.push_str(&self.render(diag, source));
        }
        let mut tally: Vec<(DiagnosticCode, usize)> = Vec::new();
        for diag in diags.iter().filter(|d| d.severity == Severity::Warning) {
            match tally.iter_mut().find(|(code, _)| *code == diag.code) {
                Some((_, count)) => *count += 1,
                None => tally.push((diag.code, 1)),
            }
        }
        let warnings: usize = tally.iter().map(|(_, count)| count).sum();
        if warnings > 0 {
            let plural = if warnings == 1 { "" } else { "s" };
            let breakdown = tally
                .iter()
                .map(|(code, count)| match code.name() {
                    Some(name) => format!("{count} {name}"),
                    None => format!("{count} {code}"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "{}: {} generated {warnings} warning{plural} ({breakdown})\n",
                self.paint("warning", Severity::Warning),
                source.name
            ));
        }
        out
    }

    fn paint(&self, text: &str, severity: Severity) -> String {
        if !self.color {
            return text.to_string();
        }
        match severity {
            Severity::Error => style(text).red().bold().to_string(),
            Severity::Warning => style(text).yellow().bold().to_string(),
        }
    }

    fn truncate<'a>(&self, line: &'a str) -> &'a str {
        let limit = usize::from(self.width).saturating_sub(8).max(16);
        match line.char_indices().nth(limit) {
            Some((idx, _)) => &line[..idx],
            None => line,
        }
    }
}
