//! Property-based tests for the parser.
//!
//! Programs are assembled from a corpus of statement fragments, some of them
//! deliberately broken, and run through the public entry point:
//!
//! 1. **Determinism** - two parses give identical trees, features and diagnostics
//! 2. **Keep-going always yields a tree** - recovery never loses the root
//! 3. **Positions stay inside the input** - every node span ends within the source
//! 4. **Batch and interactive agree** - the first error is the same in both modes

use integration_tests::parse_collecting;
use js_parser::{CommentParsing, Config, Diagnostic, ParseResult, RunMode};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "var a = 1;",
    "let {b, c: [d = 2]} = e;",
    "const f = (g, ...h) => g + h.length;",
    "function i(j = 1) { return j ** 2; }",
    "async function* k() { yield* await l; }",
    "class M extends N { #o = 1; static p() { return this.#o; } }",
    "q?.r?.[s]?.(t);",
    "u ??= v || w;",
    "`x${y}z`;",
    "for (const aa of bb) { if (aa) continue; else break; }",
    "label: while (cc) { break label; }",
    "switch (dd) { case 1: ee(); default: ff(); }",
    "try { gg(); } catch ({hh}) { } finally { }",
    "/** @type {number} */ var ii = 3;",
    "// line comment\njj();",
    "/* block */ kk /* inline */ (ll);",
    "1_000n;",
    "/ab+c/gi.test(mm);",
    // Broken on purpose
    "var = ;",
    "a + = b;",
    "break;",
    "class { }",
    "for (a, b of c) d;",
    "({a = 1});",
    "'unterminated",
    "function (",
    "}",
];

fn fragment() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(str::to_string)
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..8).prop_map(|parts| parts.join("\n"))
}

fn comment_mode() -> impl Strategy<Value = CommentParsing> {
    prop_oneof![
        Just(CommentParsing::None),
        Just(CommentParsing::JsDocOnly),
        Just(CommentParsing::All),
    ]
}

fn run(source: &str, config: &Config) -> (ParseResult, Vec<Diagnostic>) {
    let (result, reporter) = parse_collecting(source, config);
    (result, reporter.diagnostics)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn parse_is_deterministic(source in program(), mode in comment_mode()) {
        let config = Config::default()
            .with_comment_parsing(mode)
            .with_run_mode(RunMode::KeepGoing);
        let (first, first_diagnostics) = run(&source, &config);
        let (second, second_diagnostics) = run(&source, &config);
        prop_assert_eq!(&first.root, &second.root);
        prop_assert_eq!(&first.features, &second.features);
        prop_assert_eq!(&first.comments, &second.comments);
        prop_assert_eq!(
            serde_json::to_value(&first_diagnostics).unwrap(),
            serde_json::to_value(&second_diagnostics).unwrap()
        );
    }

    #[test]
    fn keep_going_always_yields_a_tree(source in program()) {
        let config = Config::default().with_run_mode(RunMode::KeepGoing);
        let (result, _) = run(&source, &config);
        prop_assert!(result.root.is_some());
    }

    #[test]
    fn spans_stay_inside_the_input(source in program()) {
        let config = Config::default().with_run_mode(RunMode::KeepGoing);
        let (result, _) = run(&source, &config);
        let length = source.chars().count();
        let root = result.root.unwrap();
        for node in root.descendants() {
            prop_assert!(
                node.span.end() <= length,
                "{:?} ends at {} past {} in {:?}",
                node.kind,
                node.span.end(),
                length,
                source
            );
        }
    }

    #[test]
    fn batch_stops_at_the_first_interactive_error(source in program()) {
        let (batch, batch_diagnostics) = run(&source, &Config::default());
        let interactive = Config::default().with_run_mode(RunMode::KeepGoing);
        let (_, interactive_diagnostics) = run(&source, &interactive);
        let batch_errors: Vec<_> = batch_diagnostics.iter().filter(|d| d.is_error()).collect();
        let interactive_errors: Vec<_> =
            interactive_diagnostics.iter().filter(|d| d.is_error()).collect();
        prop_assert_eq!(batch.root.is_none(), !batch_errors.is_empty());
        prop_assert_eq!(batch_errors.is_empty(), interactive_errors.is_empty());
        if let (Some(first), Some(expected)) = (batch_errors.first(), interactive_errors.first()) {
            prop_assert_eq!(&first.message, &expected.message);
        }
    }
}
