//! Contract tests for parser API
//!
//! These tests verify the parser component implements its contract correctly.

use js_parser::lexer::{Keyword, Lexer, Punctuator, TokenKind};
use js_parser::{
    parse, CollectingReporter, CommentParsing, Config, Feature, LanguageMode, Node, NodeKind,
    ParseResult, Payload, RunMode, Severity, StrictMode,
};

fn run(source: &str, config: &Config) -> (ParseResult, CollectingReporter) {
    let mut reporter = CollectingReporter::new();
    let result = parse("contract.js", source, config, &mut reporter);
    (result, reporter)
}

fn keep_going() -> Config {
    Config::default().with_run_mode(RunMode::KeepGoing)
}

fn first_statement(source: &str) -> Node {
    let (result, reporter) = run(source, &Config::default());
    assert!(reporter.errors().is_empty(), "{:?}", reporter.errors());
    result.root.unwrap().children.remove(0)
}

// =============================================================================
// Lexer Contract Tests
// =============================================================================

#[test]
fn test_lexer_identifier_token() {
    let mut lexer = Lexer::new("myVar", true);
    let token = lexer.next_token();
    assert_eq!(token.kind, TokenKind::Identifier("myVar".to_string()));
    assert_eq!(token.span.length, 5);
}

#[test]
fn test_lexer_number_token() {
    let mut lexer = Lexer::new("42.5", true);
    assert_eq!(lexer.next_token().kind, TokenKind::Number(42.5));
}

#[test]
fn test_lexer_string_token() {
    let mut lexer = Lexer::new(r#""hello""#, true);
    let token = lexer.next_token();
    assert_eq!(token.kind, TokenKind::String("hello".to_string()));
    assert_eq!(token.span.length, 7);
}

#[test]
fn test_lexer_keyword_and_punctuator() {
    let mut lexer = Lexer::new("var ;", true);
    assert!(lexer.next_token().is_keyword(Keyword::Var));
    assert!(lexer.next_token().is(Punctuator::Semicolon));
    assert!(lexer.next_token().is_eof());
}

#[test]
fn test_lexer_records_comments_on_the_side() {
    let mut lexer = Lexer::new("a /* b */ c // d", true);
    let mut names = Vec::new();
    loop {
        let token = lexer.next_token();
        if token.is_eof() {
            break;
        }
        names.push(token.identifier_name().map(str::to_string));
    }
    assert_eq!(names, vec![Some("a".to_string()), Some("c".to_string())]);
    let texts: Vec<_> = lexer.comments().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["/* b */", "// d"]);
}

#[test]
fn test_lexer_newline_before() {
    let mut lexer = Lexer::new("a\nb", true);
    assert!(!lexer.next_token().newline_before);
    assert!(lexer.next_token().newline_before);
}

// =============================================================================
// Parse Contract Tests
// =============================================================================

#[test]
fn test_parse_returns_script_root() {
    let (result, _) = run("let x = 42;", &Config::default());
    let root = result.root.unwrap();
    assert_eq!(root.kind, NodeKind::Script);
    assert_eq!(root.child_count(), 1);
}

#[test]
fn test_parse_positions_are_character_based() {
    let statement = first_statement("'안녕세계!';");
    let string = statement.first_child().unwrap();
    assert_eq!(string.kind, NodeKind::String);
    assert_eq!(string.span.length, 7);
    assert_eq!(string.span.line, 1);
    assert_eq!(string.span.column, 0);
}

#[test]
fn test_module_root_wraps_body() {
    let (result, _) = run("export const a = 1;", &Config::default());
    let root = result.root.unwrap();
    assert_eq!(root.first_child().unwrap().kind, NodeKind::ModuleBody);
    assert!(result.features.contains(Feature::Modules));
}

#[test]
fn test_numeric_separator_literal() {
    let statement = first_statement("1_000_000;");
    let number = statement.first_child().unwrap();
    assert_eq!(number.payload, Payload::Number(1_000_000.0));
}

#[test]
fn test_bigint_literal() {
    let statement = first_statement("0n;");
    let bigint = statement.first_child().unwrap();
    assert_eq!(bigint.kind, NodeKind::BigInt);
    assert_eq!(bigint.bigint_value().map(|v| v.to_string()), Some("0".to_string()));
    assert_eq!(bigint.span.length, 2);
    assert_eq!(bigint.span.column, 0);
}

#[test]
fn test_optional_chain_start_flags() {
    let statement = first_statement("a?.b?.c;");
    let outer = statement.first_child().unwrap();
    assert_eq!(outer.kind, NodeKind::OptChainGetProp);
    assert!(!outer.flags.optional_chain_start);
    let inner = outer.first_child().unwrap();
    assert_eq!(inner.kind, NodeKind::OptChainGetProp);
    assert!(inner.flags.optional_chain_start);

    let statement = first_statement("(a?.b).c;");
    assert_eq!(statement.first_child().unwrap().kind, NodeKind::GetProp);
}

// =============================================================================
// Configuration Contract Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.language_mode, LanguageMode::Unsupported);
    assert_eq!(config.strict_mode, StrictMode::Strict);
    assert_eq!(config.comment_parsing, CommentParsing::JsDocOnly);
    assert_eq!(config.run_mode, RunMode::StopOnError);
    assert!(!config.closure_unaware_code_allowed);
}

#[test]
fn test_language_modes_are_ordered() {
    assert!(LanguageMode::Ecmascript3 < LanguageMode::Ecmascript5);
    assert!(LanguageMode::Ecmascript2021 < LanguageMode::EcmascriptNext);
    assert!(LanguageMode::EcmascriptNext < LanguageMode::Unsupported);
}

#[test]
fn test_feature_warning_names_the_minimum_mode() {
    let config = Config::default().with_language_mode(LanguageMode::Ecmascript2015);
    let (result, reporter) = run("10n;", &config);
    assert!(result.root.is_some());
    assert_eq!(
        reporter.warnings(),
        vec!["This language feature is only supported for ECMASCRIPT_2020 mode or better: bigint"]
    );
}

#[test]
fn test_sloppy_mode_octal_is_a_warning() {
    let config = Config::default().with_strict_mode(StrictMode::Sloppy);
    let (result, reporter) = run("017;", &config);
    assert!(result.root.is_some());
    assert!(reporter.errors().is_empty());
    assert_eq!(
        reporter.warnings(),
        vec!["Octal integer literals are not supported in strict mode."]
    );
}

// =============================================================================
// Error Handling Contract Tests
// =============================================================================

#[test]
fn test_batch_mode_aborts_on_first_grammar_error() {
    let (result, reporter) = run("var = 1; var = 2;", &Config::default());
    assert!(result.root.is_none());
    assert_eq!(reporter.errors(), vec!["'identifier' expected"]);
}

#[test]
fn test_keep_going_reports_every_statement() {
    let (result, reporter) = run("var = 1; var = 2;", &keep_going());
    let root = result.root.unwrap();
    assert_eq!(root.child_count(), 2);
    assert_eq!(reporter.errors().len(), 2);
}

#[test]
fn test_diagnostics_carry_positions() {
    let (_, reporter) = run("a;\n  break;", &keep_going());
    let diagnostic = &reporter.diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.source_name, "contract.js");
    assert_eq!((diagnostic.line, diagnostic.column), (2, 2));
    assert_eq!(diagnostic.message, "unlabelled break must be inside loop or switch");
}

#[test]
fn test_for_of_with_comma_head() {
    let (_, reporter) = run("for (a, b of c) d;", &keep_going());
    assert_eq!(reporter.errors(), vec!["invalid assignment target"]);
}

#[test]
fn test_getter_constructor() {
    let (_, reporter) = run("class C { get constructor() {} }", &keep_going());
    assert_eq!(
        reporter.errors(),
        vec!["Class constructor may not be getter, setter, async, or generator."]
    );
}

// =============================================================================
// ES2024 Feature Tests
// =============================================================================

#[test]
fn test_parse_arrow_function() {
    let statement = first_statement("const f = async (a, ...b) => a;");
    let function = statement.find(NodeKind::Function).unwrap();
    assert!(function.flags.arrow);
    assert!(function.flags.is_async);
    let params = function.child(1).unwrap();
    assert_eq!(params.kind, NodeKind::ParamList);
    assert_eq!(params.child(1).unwrap().kind, NodeKind::IterRest);
}

#[test]
fn test_parse_template_literal() {
    let statement = first_statement("`a${b}c`;");
    let template = statement.first_child().unwrap();
    assert_eq!(template.kind, NodeKind::TemplateLit);
    let kinds: Vec<_> = template.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::TemplateLitString,
            NodeKind::TemplateLitSub,
            NodeKind::TemplateLitString
        ]
    );
}

#[test]
fn test_parse_class_with_private_field() {
    let (result, reporter) = run(
        "class C { #x = 1; static { this.y = 2; } m() { return this.#x; } }",
        &Config::default(),
    );
    assert!(reporter.errors().is_empty(), "{:?}", reporter.errors());
    assert!(result.features.contains(Feature::ClassStaticBlock));
    let class = result.root.unwrap().children.remove(0);
    assert_eq!(class.kind, NodeKind::Class);
    assert_eq!(class.child(2).unwrap().child_count(), 3);
}

#[test]
fn test_private_name_outside_class() {
    let (_, reporter) = run("this.#x;", &keep_going());
    assert_eq!(
        reporter.errors(),
        vec!["Private identifiers may not be used in this context"]
    );
}

#[test]
fn test_jsdoc_type_on_declaration_name() {
    let (result, _) = run("let /** string */ x = 'a';", &Config::default());
    let root = result.root.unwrap();
    let name = root.first_child().unwrap().first_child().unwrap();
    let info = name.jsdoc.as_ref().unwrap();
    assert_eq!(info.get_type().unwrap().to_string(), "string");
    assert_eq!(root.descendants().filter(|n| n.jsdoc.is_some()).count(), 1);
}
