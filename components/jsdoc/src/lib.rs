//! JSDoc annotation parsing.
//!
//! Reads the text of documentation comments into a [`JsDocInfo`] record,
//! parsing bracketed type expressions into [`TypeExpr`] trees. All problems
//! are reported as warnings; parsing always continues with the rest of the
//! comment.
//!
//! # Overview
//!
//! - [`parse_jsdoc`] - Parse a `/** ... */` block
//! - [`parse_inline_type`] - Parse a tagless `/** T */` inline annotation
//! - [`merge_file_overview`] - Fold file-level blocks together
//!
//! # Example
//!
//! ```
//! use core_types::{CollectingReporter, DiagnosticSink, SourcePosition};
//! use jsdoc::{parse_jsdoc, JsDocOptions};
//!
//! let mut reporter = CollectingReporter::new();
//! let mut sink = DiagnosticSink::new("a.js", &mut reporter);
//! let info = parse_jsdoc(
//!     "/** @param {Array<string>} names */",
//!     SourcePosition::new(1, 0, 0),
//!     &JsDocOptions::default(),
//!     &mut sink,
//! )
//! .unwrap();
//! assert_eq!(info.param_type("names").unwrap().to_string(), "Array<string>");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod fileoverview;
mod info;
mod parser;
mod text;
mod type_parser;
mod types;

pub use fileoverview::merge_file_overview;
pub use info::{JsDocInfo, ParamDoc, Visibility};
pub use parser::{parse_inline_type, parse_jsdoc, JsDocOptions};
pub use type_parser::{TypeSyntaxError, BAD_TYPE_WIKI_LINK};
pub use types::{FunctionType, RecordField, TypeExpr};
