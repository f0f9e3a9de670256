//! JavaScript Parser Component
//!
//! Turns JavaScript source text into an annotated syntax tree, reporting
//! syntax errors and language-mode warnings through an injected
//! [`ErrorReporter`].
//!
//! # Overview
//!
//! - [`parse`] - Parses one source file into a [`ParseResult`]
//! - [`Config`] - Language mode, strictness, comment handling and error policy
//! - [`Node`] - Uniform tree node with kind, payload, children, span and flags
//! - [`FeatureSet`] - Language features used by the source
//! - [`lexer::Lexer`] - Tokenizer, usable on its own
//!
//! # Example
//!
//! ```
//! use js_parser::{parse, CollectingReporter, Config, NodeKind};
//!
//! let mut reporter = CollectingReporter::new();
//! let result = parse("input.js", "let x = 42;", &Config::default(), &mut reporter);
//!
//! let root = result.root.unwrap();
//! assert_eq!(root.kind, NodeKind::Script);
//! assert_eq!(root.first_child().unwrap().kind, NodeKind::Let);
//! assert!(reporter.errors().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod builder;
mod comments;
pub mod config;
mod cst;
mod error;
pub mod features;
pub mod lexer;
pub mod node;
mod parser;

pub use config::{CommentParsing, Config, LanguageMode, RunMode, StrictMode};
pub use core_types::{
    CollectingReporter, Diagnostic, DiagnosticSink, ErrorReporter, LineMap, ParseError, Severity,
    SourcePosition, Span,
};
pub use features::{Feature, FeatureSet};
pub use jsdoc::{JsDocInfo, TypeExpr};
pub use lexer::{Comment, CommentKind};
pub use node::{Node, NodeFlags, NodeKind, NonJsDocComment, Payload};

use builder::TreeBuilder;
use parser::Parser;
use tracing::debug;

/// Headroom below which a recursive step moves to a fresh stack segment.
const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each heap-allocated stack segment.
const STACK_SEGMENT: usize = 4 * 1024 * 1024;

/// Runs `f`, first growing the stack onto the heap when it is nearly used up.
/// Nested literals, parentheses and blocks recurse once per level in both the
/// parser and the builder.
pub(crate) fn ensure_stack<T>(f: impl FnOnce() -> T) -> T {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, f)
}

/// Everything produced by one call to [`parse`].
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The `SCRIPT` root; absent when an error stopped the parse
    pub root: Option<Node>,
    /// Language features the source uses
    pub features: FeatureSet,
    /// Every comment in source order, kept only in [`CommentParsing::All`] mode
    pub comments: Vec<Comment>,
    /// URL from a final `//# sourceMappingURL=` comment
    pub source_map_url: Option<String>,
}

/// Parses `source` and attaches its comments.
///
/// Diagnostics go to `reporter`, de-duplicated by position and message. In
/// [`RunMode::StopOnError`] any reported error leaves [`ParseResult::root`]
/// empty; in [`RunMode::KeepGoing`] a tree is always returned, with `EMPTY`
/// placeholders where statements failed to parse.
pub fn parse(
    source_name: &str,
    source: &str,
    config: &Config,
    reporter: &mut dyn ErrorReporter,
) -> ParseResult {
    debug!(
        source = source_name,
        mode = config.language_mode.name(),
        chars = source.chars().count(),
        "parse started"
    );

    let sink = DiagnosticSink::new(source_name, reporter);
    let builder = TreeBuilder::new(source, *config, sink);
    let output = Parser::new(source, *config, builder).parse();
    let (features, mut sink) = output.builder.into_parts();
    let mut root = output.root;
    let comments = output.comments;

    let code_end = root
        .as_ref()
        .and_then(|root| root.last_child())
        .map(|last| last.span.end())
        .unwrap_or(0);
    let source_map_url = comments::source_map_url(&comments, code_end);

    if let Some(root) = root.as_mut() {
        comments::attach(root, &comments, source, config, &mut sink);
    }

    if !config.keep_going() && sink.error_count() > 0 {
        root = None;
    }

    debug!(
        source = source_name,
        nodes = root.as_ref().map_or(0, |root| root.descendants().count()),
        features = features.len(),
        comments = comments.len(),
        errors = sink.error_count(),
        warnings = sink.warning_count(),
        "parse finished"
    );

    let comments = if config.comment_parsing == CommentParsing::All {
        comments
    } else {
        Vec::new()
    };
    ParseResult {
        root,
        features,
        comments,
        source_map_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str, config: Config) -> (ParseResult, Vec<String>) {
        let mut reporter = CollectingReporter::new();
        let result = parse("test.js", source, &config, &mut reporter);
        let errors = reporter.errors().into_iter().map(String::from).collect();
        (result, errors)
    }

    #[test]
    fn test_stop_on_error_drops_the_tree() {
        let (result, errors) = run("var {x: 5} = foo();", Config::default());
        assert!(result.root.is_none());
        assert_eq!(errors, vec!["invalid assignment target"]);
    }

    #[test]
    fn test_keep_going_keeps_the_tree() {
        let config = Config::default().with_run_mode(RunMode::KeepGoing);
        let (result, errors) = run("var {x: 5} = foo();", config);
        assert!(result.root.is_some());
        assert_eq!(errors, vec!["invalid assignment target"]);
    }

    #[test]
    fn test_grammar_error_in_batch_mode() {
        let (result, errors) = run("var = ;", Config::default());
        assert!(result.root.is_none());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_warnings_do_not_drop_the_tree() {
        let config = Config::default().with_language_mode(LanguageMode::Ecmascript5);
        let mut reporter = CollectingReporter::new();
        let result = parse("test.js", "let x = 1;", &config, &mut reporter);
        assert!(result.root.is_some());
        assert!(result.features.contains(Feature::LetDeclarations));
        assert_eq!(reporter.warnings().len(), 1);
    }

    #[test]
    fn test_comments_returned_only_in_all_mode() {
        let source = "// a\n/** @const */ var x = 1; /* b */";
        let (jsdoc_only, _) = run(source, Config::default());
        assert!(jsdoc_only.comments.is_empty());
        let (all, _) = run(source, Config::default().with_comment_parsing(CommentParsing::All));
        let kinds: Vec<_> = all.comments.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CommentKind::Line, CommentKind::JsDoc, CommentKind::Block]);
    }

    #[test]
    fn test_source_map_url() {
        let (result, _) = run("var x;\n//# sourceMappingURL=foo.js.map\n", Config::default());
        assert_eq!(result.source_map_url.as_deref(), Some("foo.js.map"));

        let (result, _) = run("//# sourceMappingURL=foo.js.map\nvar x;", Config::default());
        assert_eq!(result.source_map_url, None);
    }

    #[test]
    fn test_empty_source() {
        let (result, errors) = run("", Config::default());
        let root = result.root.unwrap();
        assert_eq!(root.kind, NodeKind::Script);
        assert_eq!(root.child_count(), 0);
        assert!(errors.is_empty());
    }
}
