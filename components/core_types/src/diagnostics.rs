//! Diagnostics and the reporter interface.
//!
//! Every error or warning produced while parsing flows through a
//! [`DiagnosticSink`], which de-duplicates on `(source, line, column,
//! message)` and forwards the survivors to an injected [`ErrorReporter`].

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::SourcePosition;

/// Whether a diagnostic is fatal in batch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// An error; in batch mode the parse produces no tree
    Error,
    /// A warning; never aborts
    Warning,
}

/// A single reported problem.
///
/// # Examples
///
/// ```
/// use core_types::{Diagnostic, Severity};
///
/// let d = Diagnostic::error("input.js", 1, 4, "invalid assignment target");
/// assert_eq!(d.severity, Severity::Error);
/// assert_eq!(d.to_string(), "input.js:1:4: ERROR - invalid assignment target");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the source the diagnostic refers to
    pub source_name: String,
    /// Line, 1-based
    pub line: u32,
    /// Column, 0-based
    pub column: u32,
    /// Human-readable message
    pub message: String,
    /// Error or warning
    pub severity: Severity,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error(source_name: &str, line: u32, column: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            source_name: source_name.to_string(),
            line,
            column,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates a warning diagnostic.
    pub fn warning(source_name: &str, line: u32, column: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(source_name, line, column, message)
        }
    }

    /// True for errors.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        write!(
            f,
            "{}:{}:{}: {} - {}",
            self.source_name, self.line, self.column, label, self.message
        )
    }
}

/// Receives diagnostics from a parse.
pub trait ErrorReporter {
    /// Called once per distinct diagnostic, in the order they were found.
    fn report(&mut self, source_name: &str, line: u32, column: u32, message: &str, is_error: bool);
}

/// A reporter that keeps everything it is given.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    /// Diagnostics in report order
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of all reported errors.
    pub fn errors(&self) -> Vec<&str> {
        self.messages(Severity::Error)
    }

    /// Messages of all reported warnings.
    pub fn warnings(&self) -> Vec<&str> {
        self.messages(Severity::Warning)
    }

    fn messages(&self, severity: Severity) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.as_str())
            .collect()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&mut self, source_name: &str, line: u32, column: u32, message: &str, is_error: bool) {
        let diagnostic = if is_error {
            Diagnostic::error(source_name, line, column, message)
        } else {
            Diagnostic::warning(source_name, line, column, message)
        };
        self.diagnostics.push(diagnostic);
    }
}

/// De-duplicating front end to an [`ErrorReporter`].
pub struct DiagnosticSink<'r> {
    source_name: String,
    reporter: &'r mut dyn ErrorReporter,
    seen: HashSet<(u32, u32, String)>,
    error_count: usize,
    warning_count: usize,
}

impl<'r> DiagnosticSink<'r> {
    /// Creates a sink for diagnostics about `source_name`.
    pub fn new(source_name: &str, reporter: &'r mut dyn ErrorReporter) -> Self {
        DiagnosticSink {
            source_name: source_name.to_string(),
            reporter,
            seen: HashSet::new(),
            error_count: 0,
            warning_count: 0,
        }
    }

    /// Name of the source being parsed.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Reports an error at `pos`.
    pub fn error(&mut self, pos: SourcePosition, message: impl Into<String>) {
        self.emit(pos, message.into(), Severity::Error);
    }

    /// Reports a warning at `pos`.
    pub fn warning(&mut self, pos: SourcePosition, message: impl Into<String>) {
        self.emit(pos, message.into(), Severity::Warning);
    }

    /// Reports a diagnostic with an explicit severity.
    pub fn emit(&mut self, pos: SourcePosition, message: String, severity: Severity) {
        let key = (pos.line, pos.column, message);
        if self.seen.contains(&key) {
            trace!(line = pos.line, column = pos.column, "duplicate diagnostic dropped");
            return;
        }
        let is_error = severity == Severity::Error;
        self.reporter
            .report(&self.source_name, pos.line, pos.column, &key.2, is_error);
        if is_error {
            self.error_count += 1;
        } else {
            self.warning_count += 1;
        }
        self.seen.insert(key);
    }

    /// Number of distinct errors reported so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of distinct warnings reported so far.
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_deduplicates_same_key() {
        let mut reporter = CollectingReporter::new();
        {
            let mut sink = DiagnosticSink::new("a.js", &mut reporter);
            let pos = SourcePosition::new(1, 4, 4);
            sink.warning(pos, "String continuations are not recommended.");
            sink.warning(pos, "String continuations are not recommended.");
            sink.error(pos, "other");
            assert_eq!(sink.warning_count(), 1);
            assert_eq!(sink.error_count(), 1);
        }
        assert_eq!(reporter.diagnostics.len(), 2);
    }

    #[test]
    fn test_sink_keeps_distinct_positions() {
        let mut reporter = CollectingReporter::new();
        let mut sink = DiagnosticSink::new("a.js", &mut reporter);
        sink.error(SourcePosition::new(1, 0, 0), "x");
        sink.error(SourcePosition::new(2, 0, 5), "x");
        assert_eq!(sink.error_count(), 2);
    }

    #[test]
    fn test_collecting_reporter_partitions() {
        let mut reporter = CollectingReporter::new();
        reporter.report("a.js", 1, 0, "bad", true);
        reporter.report("a.js", 1, 2, "meh", false);
        assert_eq!(reporter.errors(), vec!["bad"]);
        assert_eq!(reporter.warnings(), vec!["meh"]);
    }
}
