//! Diagnostic Integration Tests
//!
//! Table-driven checks that each kind of problem is reported with the
//! expected text, and that the run mode decides whether a tree survives.

use integration_tests::parse_collecting;
use js_parser::{Config, Feature, LanguageMode, RunMode, StrictMode};
use rstest::rstest;

fn keep_going() -> Config {
    Config::default().with_run_mode(RunMode::KeepGoing)
}

/// Grammar errors stop a batch parse at the first problem.
#[rstest]
#[case("a ?? b || c;", "Logical OR and logical AND require parentheses when used with '??'")]
#[case("-x ** 2;", "Unary operator '-' requires parentheses before '**'")]
#[case("();", "invalid parenthesized expression")]
#[case("new.foo;", "'target' expected")]
#[case("new a?.b();", "Optional chaining is forbidden in construction contexts.")]
#[case("a?.b`x`;", "template literal cannot be used within optional chaining")]
#[case("a?.{};", "syntax error: { not allowed in optional chain")]
#[case("var = 1;", "'identifier' expected")]
#[case("function foo() { import bar from './x'; }", "'(' expected")]
#[case("if (x) { export var y; }", "primary expression expected")]
#[case("class #PC {}", "Private identifiers may not be used in this context")]
#[case("l: while (1) { break #l; }", "Private identifiers may not be used in this context")]
#[case("l: while (1) { continue #l; }", "Private identifiers may not be used in this context")]
#[case("`a ${b c}`;", "Expected '}' after expression in template literal")]
#[case("var \\u12 = 2;", "Invalid escape sequence")]
#[case("var \\uDEFG;", "Invalid escape sequence")]
fn test_grammar_errors(#[case] source: &str, #[case] message: &str) {
    let (result, reporter) = parse_collecting(source, &Config::default());
    assert!(result.root.is_none(), "{}", source);
    assert_eq!(reporter.errors(), vec![message], "{}", source);
}

/// Semantic errors are reported once the tree is built; the tree is kept
/// only when parsing keeps going.
#[rstest]
#[case("var {x: 5} = foo();", "invalid assignment target")]
#[case("for (a, b of c) d;", "invalid assignment target")]
#[case("[...a, b] = c;", "A rest parameter must be last in a parameter list.")]
#[case("class C { get constructor() {} }", "Class constructor may not be getter, setter, async, or generator.")]
#[case("break;", "unlabelled break must be inside loop or switch")]
#[case("continue;", "continue must be inside loop")]
#[case("while (1) { break a; }", "undefined label \"a\"")]
#[case("return;", "return must be inside function")]
#[case("function f() { await 1; }", "await must be inside asynchronous function")]
#[case("const a;", "const variables must have an initializer")]
#[case("let [a];", "destructuring must have an initializer")]
#[case("a()++;", "Invalid postfix increment operand.")]
#[case("delete f();", "Invalid delete operand. Only properties can be deleted.")]
#[case("+1n;", "Cannot convert a BigInt value to a number")]
#[case("/a/gg;", "Invalid RegExp flag 'g'")]
#[case("({a = 1});", "Default value cannot appear at top level of an object literal.")]
#[case("class C { m() { this.#x; } }", "Private fields must be declared in an enclosing class")]
#[case("class C { m() { this.#x(); } }", "Private methods must be declared in an enclosing class")]
#[case("class C { constructor() {} constructor() {} }", "Class may have only one constructor.")]
#[case("((...xs,) => xs);", "A trailing comma must not follow a rest parameter.")]
#[case("c.#f;", "Private identifiers may not be used in this context")]
#[case("class C { static isC(x) { return #f in x; } }", "Private fields must be declared in an enclosing class")]
#[case("var {implements} = foo();", "cannot use keyword 'implements' here.")]
#[case("new.target;", "new.target must be inside a function")]
#[case("({set a(...x) {}});", "Setter must not have a rest parameter")]
fn test_semantic_errors(#[case] source: &str, #[case] message: &str) {
    let (batch, reporter) = parse_collecting(source, &Config::default());
    assert!(batch.root.is_none(), "{}", source);
    assert_eq!(reporter.errors(), vec![message], "{}", source);

    let (interactive, reporter) = parse_collecting(source, &keep_going());
    assert!(interactive.root.is_some(), "{}", source);
    assert_eq!(reporter.errors(), vec![message], "{}", source);
}

/// Features newer than the configured mode warn and never drop the tree.
#[rstest]
#[case(LanguageMode::Ecmascript5, "let x = 1;", "ECMASCRIPT_2015", "let declaration")]
#[case(LanguageMode::Ecmascript2015, "10n;", "ECMASCRIPT_2020", "bigint")]
#[case(LanguageMode::Ecmascript2019, "a?.b;", "ECMASCRIPT_2020", "Optional chaining")]
fn test_feature_warnings(
    #[case] mode: LanguageMode,
    #[case] source: &str,
    #[case] minimum: &str,
    #[case] feature: &str,
) {
    let config = Config::default().with_language_mode(mode);
    let (result, reporter) = parse_collecting(source, &config);
    assert!(result.root.is_some());
    assert!(reporter.errors().is_empty());
    let expected = format!(
        "This language feature is only supported for {} mode or better: {}",
        minimum, feature
    );
    assert_eq!(reporter.warnings(), vec![expected.as_str()]);
}

#[test]
fn test_strict_octal_is_an_error() {
    let (result, reporter) = parse_collecting("017;", &Config::default());
    assert!(result.root.is_none());
    assert_eq!(
        reporter.errors(),
        vec!["Octal integer literals are not supported in strict mode."]
    );

    let sloppy = Config::default().with_strict_mode(StrictMode::Sloppy);
    let (result, reporter) = parse_collecting("017;", &sloppy);
    assert!(result.root.is_some());
    assert!(reporter.errors().is_empty());
}

/// Programs that must parse without any diagnostic.
#[rstest]
#[case("class A { get 'constructor'() {} }")]
#[case("class A { async 'constructor'() {} }")]
#[case("class A { *'constructor'() {} }")]
#[case("class A { constructor() {} 'constructor'() {} }")]
#[case("if (true) function foo() {}")]
#[case("if (true) function foo() {} else {}")]
#[case("if (true) {} else function foo() {}")]
#[case("if (true) function foo() {} else function bar() {}")]
#[case("class C { #f = 1; static isC(x) { return #f in x; } }")]
#[case("class C { #m() {} static isC(x) { return #m in x; } }")]
fn test_clean_programs(#[case] source: &str) {
    let (result, reporter) = parse_collecting(source, &Config::default());
    assert!(result.root.is_some(), "{}", source);
    assert!(reporter.diagnostics.is_empty(), "{}: {:?}", source, reporter.diagnostics);
}

#[test]
fn test_if_body_function_records_block_scoping() {
    let (result, _) = parse_collecting("if (true) function foo() {}", &Config::default());
    assert!(result.features.contains(Feature::BlockScopedFunctionDeclaration));
}

#[test]
fn test_nested_module_items_are_not_declarations() {
    let (result, _) = parse_collecting("function foo() { import bar from './x'; }", &keep_going());
    assert!(!result.features.contains(Feature::Modules));
}

#[test]
fn test_constructor_error_does_not_resynchronise() {
    let (result, reporter) =
        parse_collecting("class C { get constructor() {} m() {} }", &keep_going());
    assert_eq!(
        reporter.errors(),
        vec!["Class constructor may not be getter, setter, async, or generator."]
    );
    assert!(result.root.is_some());
}

#[test]
fn test_es5_class_warns_for_each_feature() {
    let config = Config::default().with_language_mode(LanguageMode::Ecmascript5);
    let (_, reporter) = parse_collecting("class C { m() {} }", &config);
    assert_eq!(
        reporter.warnings(),
        vec![
            "This language feature is only supported for ECMASCRIPT_2015 mode or better: class",
            "This language feature is only supported for ECMASCRIPT_2015 mode or better: member declaration",
        ]
    );
}

#[test]
fn test_reserved_shorthand_in_es5_object_literal() {
    let config = Config::default()
        .with_language_mode(LanguageMode::Ecmascript5)
        .with_strict_mode(StrictMode::Sloppy);
    let (_, reporter) = parse_collecting("var a = { let };", &config);
    assert_eq!(reporter.errors(), vec!["Cannot use keyword in short object literal"]);
}

#[test]
fn test_duplicate_diagnostics_collapse() {
    let source = "var s = 'a\\\nb\\\nc';";
    let (_, reporter) = parse_collecting(source, &keep_going());
    let continuation = reporter
        .warnings()
        .into_iter()
        .filter(|w| w.starts_with("String continuations are not recommended."))
        .count();
    assert_eq!(continuation, 1);
}

#[test]
fn test_keep_going_reports_across_statements() {
    let (result, reporter) = parse_collecting("break; continue; return;", &keep_going());
    assert_eq!(result.root.unwrap().child_count(), 3);
    assert_eq!(
        reporter.errors(),
        vec![
            "unlabelled break must be inside loop or switch",
            "continue must be inside loop",
            "return must be inside function",
        ]
    );
}

#[test]
fn test_diagnostics_serialize_to_json() {
    let (_, reporter) = parse_collecting("a;\nbreak;", &keep_going());
    let json = serde_json::to_value(&reporter.diagnostics).unwrap();
    assert_eq!(json[0]["line"], 2);
    assert_eq!(json[0]["column"], 0);
    assert_eq!(json[0]["source_name"], "integration.js");
    assert_eq!(
        json[0]["message"],
        "unlabelled break must be inside loop or switch"
    );
}
