//! Integration test suite for the JavaScript parser
//!
//! This crate provides integration tests that verify the scanner, parser,
//! tree builder and JSDoc components work together across crate boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use js_parser;
    pub use jsdoc;
}

use js_parser::{parse, CollectingReporter, Config, ParseResult};

/// Parses `source` and returns the result with everything reported.
pub fn parse_collecting(source: &str, config: &Config) -> (ParseResult, CollectingReporter) {
    let mut reporter = CollectingReporter::new();
    let result = parse("integration.js", source, config, &mut reporter);
    (result, reporter)
}
