//! Contract tests for the public JSDoc API

use core_types::{CollectingReporter, DiagnosticSink, SourcePosition};
use jsdoc::{
    merge_file_overview, parse_inline_type, parse_jsdoc, JsDocInfo, JsDocOptions, TypeExpr,
    Visibility, BAD_TYPE_WIKI_LINK,
};
use rstest::rstest;

fn parse(src: &str) -> (Option<JsDocInfo>, Vec<String>) {
    let mut reporter = CollectingReporter::new();
    let info = {
        let mut sink = DiagnosticSink::new("contract.js", &mut reporter);
        parse_jsdoc(
            src,
            SourcePosition::new(1, 0, 0),
            &JsDocOptions::default(),
            &mut sink,
        )
    };
    let warnings = reporter.warnings().into_iter().map(str::to_string).collect();
    (info, warnings)
}

// ============================================================================
// Type expressions
// ============================================================================

#[rstest]
#[case("/** @type {number} */", "number")]
#[case("/** @type {!Array<string>} */", "!Array<string>")]
#[case("/** @type {?Object} */", "?Object")]
#[case("/** @type {(string|number)} */", "(string|number)")]
#[case("/** @type {string|null} */", "(string|null)")]
#[case("/** @type {{a: number, b: string}} */", "{a: number, b: string}")]
#[case("/** @type {function(this:T, ...number): boolean} */", "function(this:T,...number):boolean")]
#[case("/** @type {*} */", "*")]
#[case("/** @type {?} */", "?")]
#[case("/** @type {typeof goog.foo} */", "typeof goog.foo")]
fn test_type_tag_round_trips_to_display(#[case] src: &str, #[case] expected: &str) {
    let (info, warnings) = parse(src);
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    assert_eq!(info.unwrap().type_expr.unwrap().to_string(), expected);
}

#[rstest]
#[case("/** @type {Array<number} */", "missing closing >")]
#[case("/** @type {Array.<number} */", "missing closing >")]
#[case("/** @type {(string|number} */", "missing closing )")]
#[case("/** @type {string */", "expected closing }")]
#[case("/** @type {%} */", "type not recognized due to syntax error.")]
fn test_malformed_types_warn_with_link(#[case] src: &str, #[case] reason: &str) {
    let (info, warnings) = parse(src);
    assert!(info.unwrap().type_expr.is_none());
    assert_eq!(
        warnings,
        vec![format!("Bad type annotation. {}{}", reason, BAD_TYPE_WIKI_LINK)]
    );
}

// ============================================================================
// Tags
// ============================================================================

#[test]
fn test_constructor_with_params() {
    let (info, _) = parse(
        "/**\n * Makes a thing.\n * @constructor\n * @param {string} name\n * @param {number=} opt_n\n */",
    );
    let info = info.unwrap();
    assert!(info.is_constructor);
    assert_eq!(info.params.len(), 2);
    assert!(info.param_type("opt_n").unwrap().is_optional_arg());
    assert_eq!(info.description.as_deref(), Some("Makes a thing."));
}

#[test]
fn test_visibility_and_flags() {
    let (info, _) = parse("/** @private @const @override @nosideeffects */");
    let info = info.unwrap();
    assert_eq!(info.visibility, Visibility::Private);
    assert!(info.is_const && info.is_override && info.no_side_effects);
}

#[test]
fn test_define_is_const() {
    let (info, _) = parse("/** @define {boolean} */");
    let info = info.unwrap();
    assert_eq!(info.define_type, Some(TypeExpr::named("boolean")));
    assert!(info.is_const);
}

#[test]
fn test_template_names() {
    let (info, _) = parse("/** @template K, V */");
    assert_eq!(info.unwrap().template_names, vec!["K", "V"]);
}

#[test]
fn test_bare_enum_defaults_to_number() {
    let (info, _) = parse("/** @enum */");
    assert_eq!(info.unwrap().enum_type, Some(TypeExpr::named("number")));
}

#[test]
fn test_optional_bracket_param() {
    let (info, _) = parse("/** @param {string} [label] */");
    assert!(info.unwrap().param_type("label").unwrap().is_optional_arg());
}

#[test]
fn test_extra_type_tag() {
    let (_, warnings) = parse("/** @type {string} @type {number} */");
    assert_eq!(warnings, vec!["extra @type tag"]);
}

#[test]
fn test_type_with_return_is_incompatible() {
    let (_, warnings) = parse("/** @return {string} @type {number} */");
    assert_eq!(
        warnings,
        vec!["type annotation incompatible with other annotations"]
    );
}

#[test]
fn test_license_keeps_raw_text() {
    let (info, _) = parse("/** @license MIT */");
    assert_eq!(info.unwrap().license.as_deref(), Some(" MIT "));
}

// ============================================================================
// Inline annotations and file-level merging
// ============================================================================

#[test]
fn test_inline_record_type() {
    let mut reporter = CollectingReporter::new();
    let mut sink = DiagnosticSink::new("a.js", &mut reporter);
    let info = parse_inline_type("/** {attr: number} */", SourcePosition::new(1, 0, 0), &mut sink)
        .unwrap();
    assert_eq!(info.type_expr.unwrap().to_string(), "{attr: number}");
}

#[test]
fn test_inline_garbage_warns_and_keeps_empty_info() {
    let mut reporter = CollectingReporter::new();
    let info = {
        let mut sink = DiagnosticSink::new("a.js", &mut reporter);
        parse_inline_type("/** string string */", SourcePosition::new(1, 0, 0), &mut sink)
    };
    assert!(!info.unwrap().has_type());
    assert_eq!(reporter.warnings().len(), 1);
}

#[test]
fn test_merge_chain_keeps_first_overview() {
    let (a, _) = parse("/** @fileoverview First */");
    let (b, _) = parse("/** @fileoverview Second @suppress {checkTypes} */");
    let (c, _) = parse("/** @externs */");
    let merged = [b.unwrap(), c.unwrap()]
        .into_iter()
        .fold(a, |acc, next| Some(merge_file_overview(acc, next)))
        .unwrap();
    assert_eq!(merged.file_overview.as_deref(), Some("First"));
    assert_eq!(merged.suppressions, vec!["checkTypes"]);
    assert!(merged.is_externs);
}
