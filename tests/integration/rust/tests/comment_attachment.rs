//! Comment and JSDoc Integration Tests
//!
//! Verifies that the parser hands comments to the JSDoc component and
//! attaches the results to the right nodes.

use integration_tests::parse_collecting;
use js_parser::{CommentKind, CommentParsing, Config, Node, NodeKind};

fn with_mode(mode: CommentParsing) -> Config {
    Config::default().with_comment_parsing(mode)
}

fn parse_ok(source: &str, mode: CommentParsing) -> Node {
    let (result, reporter) = parse_collecting(source, &with_mode(mode));
    assert!(reporter.errors().is_empty(), "{:?}", reporter.errors());
    result.root.expect("tree")
}

/// Test: A documented function gets parameter and return types
#[test]
fn test_function_jsdoc() {
    let root = parse_ok(
        "/**\n * Adds.\n * @param {number} a\n * @param {number=} b\n * @return {number}\n */\nfunction add(a, b) { return a + (b || 0); }",
        CommentParsing::JsDocOnly,
    );
    let function = root.first_child().unwrap();
    assert_eq!(function.kind, NodeKind::Function);
    let info = function.jsdoc.as_ref().expect("jsdoc on function");
    assert_eq!(info.params.len(), 2);
    assert_eq!(info.params[0].name, "a");
    assert_eq!(info.params[1].type_expr.as_ref().unwrap().to_string(), "number=");
    assert_eq!(info.return_type.as_ref().unwrap().to_string(), "number");
}

/// Test: Inline parameter types attach to the parameter names
#[test]
fn test_inline_parameter_types() {
    let root = parse_ok(
        "function f(/** string */ a, /** number= */ b) {}",
        CommentParsing::JsDocOnly,
    );
    let params = root.first_child().unwrap().child(1).unwrap();
    let types: Vec<String> = params
        .children
        .iter()
        .map(|p| p.jsdoc.as_ref().unwrap().get_type().unwrap().to_string())
        .collect();
    assert_eq!(types, vec!["string", "number="]);
}

/// Test: A cast keeps its type on the parenthesized expression
#[test]
fn test_cast() {
    let root = parse_ok("var x = /** @type {Foo} */ (y);", CommentParsing::JsDocOnly);
    let name = root.first_child().unwrap().first_child().unwrap();
    let value = name.first_child().unwrap();
    assert!(value.flags.parenthesized);
    assert_eq!(
        value.jsdoc.as_ref().unwrap().get_type().unwrap().to_string(),
        "Foo"
    );
}

/// Test: File overviews merge onto the root and are not attached elsewhere
#[test]
fn test_file_overview_on_root() {
    let root = parse_ok(
        "/** @fileoverview First. */\n/** @fileoverview Second. */\nvar x;",
        CommentParsing::JsDocOnly,
    );
    let info = root.jsdoc.as_ref().expect("file jsdoc");
    assert_eq!(info.file_overview.as_deref(), Some("First."));
    assert!(root.first_child().unwrap().jsdoc.is_none());
}

/// Test: A JSDoc nobody claims is dropped instead of leaking forward
#[test]
fn test_unclaimed_jsdoc_is_dropped() {
    let root = parse_ok(
        "function f() { /** @const */ }\nvar x;",
        CommentParsing::JsDocOnly,
    );
    assert_eq!(root.descendants().filter(|n| n.jsdoc.is_some()).count(), 0);
}

/// Test: Bad type annotations warn without failing the parse
#[test]
fn test_bad_annotation_warns() {
    let (result, reporter) = parse_collecting(
        "/** @type {Array<string} */ var x;",
        &with_mode(CommentParsing::JsDocOnly),
    );
    assert!(result.root.is_some());
    assert!(reporter.errors().is_empty());
    assert_eq!(reporter.warnings().len(), 1);
    assert!(reporter.warnings()[0].starts_with("Bad type annotation. missing closing >"));
}

/// Test: NONE mode attaches nothing
#[test]
fn test_none_mode() {
    let root = parse_ok("/** @const */ var x; // trailing", CommentParsing::None);
    assert!(root
        .descendants()
        .all(|n| n.jsdoc.is_none() && n.comment.is_none() && n.trailing_comment.is_none()));
}

/// Test: Plain comments lead and trail statements in ALL mode
#[test]
fn test_plain_comments_in_all_mode() {
    let (result, reporter) = parse_collecting(
        "// lead\nvar a = 1; // trail\nvar b = 2;",
        &with_mode(CommentParsing::All),
    );
    assert!(reporter.errors().is_empty());
    let root = result.root.unwrap();
    let first = root.child(0).unwrap();
    assert_eq!(first.comment.as_ref().unwrap().text, "// lead");
    assert!(first.comment.as_ref().unwrap().ends_as_line_comment);
    assert_eq!(first.trailing_comment.as_ref().unwrap().text, "// trail");
    assert!(root.child(1).unwrap().comment.is_none());

    let kinds: Vec<_> = result.comments.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![CommentKind::Line, CommentKind::Line]);
}

/// Test: Comments at the end of a function body join the last statement
#[test]
fn test_end_of_block_comments() {
    let root = parse_ok(
        "function f() {\n  a();\n  // one\n  // two\n}",
        CommentParsing::All,
    );
    let body = root.first_child().unwrap().child(2).unwrap();
    let last = body.last_child().unwrap();
    assert_eq!(
        last.trailing_comment.as_ref().unwrap().text,
        "\n// one\n// two"
    );
}

/// Test: The source map URL is read from the final comment only
#[test]
fn test_source_map_url() {
    let (result, _) = parse_collecting(
        "var x;\n//# sourceMappingURL=data:application/json;base64,e30=",
        &Config::default(),
    );
    assert_eq!(
        result.source_map_url.as_deref(),
        Some("data:application/json;base64,e30=")
    );

    let (result, _) = parse_collecting(
        "//# sourceMappingURL=a.map\nvar x;\n// done",
        &Config::default(),
    );
    assert_eq!(result.source_map_url, None);
}
