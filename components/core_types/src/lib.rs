//! Shared source-location and diagnostic types.
//!
//! This crate provides the leaf types every parsing component depends on.
//!
//! # Overview
//!
//! - [`SourcePosition`] / [`Span`] - Source locations (1-based lines, 0-based columns)
//! - [`LineMap`] - Offset to line/column lookup
//! - [`Diagnostic`] / [`Severity`] - Reported problems
//! - [`ErrorReporter`] - Injected receiver of diagnostics
//! - [`DiagnosticSink`] - De-duplicating front end to a reporter
//! - [`ParseError`] - Failure type for grammar productions
//!
//! # Examples
//!
//! ```
//! use core_types::{CollectingReporter, DiagnosticSink, SourcePosition};
//!
//! let mut reporter = CollectingReporter::new();
//! {
//!     let mut sink = DiagnosticSink::new("input.js", &mut reporter);
//!     sink.error(SourcePosition::new(1, 0, 0), "primary expression expected");
//! }
//! assert_eq!(reporter.errors(), vec!["primary expression expected"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod diagnostics;
mod error;
mod source;

pub use diagnostics::{CollectingReporter, Diagnostic, DiagnosticSink, ErrorReporter, Severity};
pub use error::ParseError;
pub use source::{LineMap, SourcePosition, Span};
