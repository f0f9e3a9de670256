//! End-to-End Parse Tests
//!
//! Runs whole programs through the public `parse` entry point and checks
//! the resulting tree, feature set and positions.

use integration_tests::parse_collecting;
use js_parser::{Config, Feature, FeatureSet, LanguageMode, Node, NodeKind, Payload};

fn parse_ok(source: &str) -> (Node, FeatureSet) {
    let (result, reporter) = parse_collecting(source, &Config::default());
    assert!(reporter.errors().is_empty(), "{:?}", reporter.errors());
    (result.root.expect("tree"), result.features)
}

/// Test: A small program with most statement forms
#[test]
fn test_statement_forms() {
    let source = r#"
        var a = 1;
        label: for (let i = 0; i < 10; i++) {
            if (i % 2) continue label;
            else break;
        }
        for (const k in obj) {}
        for (const v of list) {}
        do { a--; } while (a > 0)
        switch (a) { case 1: a = 2; break; default: a = 3; }
        try { throw new Error('x'); } catch { } finally { debugger; }
        with (obj) { a; }
    "#;
    let mut reporter = js_parser::CollectingReporter::new();
    let config = Config::default().with_strict_mode(js_parser::StrictMode::Sloppy);
    let result = js_parser::parse("program.js", source, &config, &mut reporter);
    assert!(reporter.errors().is_empty(), "{:?}", reporter.errors());
    let root = result.root.unwrap();
    let kinds: Vec<_> = root.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Var,
            NodeKind::Label,
            NodeKind::ForIn,
            NodeKind::ForOf,
            NodeKind::Do,
            NodeKind::Switch,
            NodeKind::Try,
            NodeKind::With,
        ]
    );
    assert!(result.features.contains(Feature::OptionalCatchBinding));
    assert!(result.features.contains(Feature::ForOf));
}

/// Test: Binary chains keep their operands in source order
#[test]
fn test_binary_chain_shape() {
    let (root, _) = parse_ok("a + b * c - d;");
    let sub = root.first_child().unwrap().first_child().unwrap();
    assert_eq!(sub.kind, NodeKind::Sub);
    let add = sub.child(0).unwrap();
    assert_eq!(add.kind, NodeKind::Add);
    assert_eq!(add.child(1).unwrap().kind, NodeKind::Mul);
    assert_eq!(sub.child(1).unwrap().string_value(), Some("d"));
    assert_eq!(sub.span.column, 0);
    assert_eq!(sub.span.length, 13);
}

/// Test: Very long operator chains do not exhaust the stack
#[test]
fn test_long_binary_chain() {
    let source = format!("{}1;", "1 + ".repeat(50_000));
    let (root, _) = parse_ok(&source);
    assert_eq!(root.descendants().filter(|n| n.kind == NodeKind::Number).count(), 50_001);
}

/// Test: Deeply nested literals, parentheses and blocks parse completely
#[test]
fn test_deep_nesting() {
    const DEPTH: usize = 10_000;
    let count = |root: &Node, kind: NodeKind| root.descendants().filter(|n| n.kind == kind).count();

    let arrays = format!("x = {}{};", "[".repeat(DEPTH), "]".repeat(DEPTH));
    let (root, _) = parse_ok(&arrays);
    assert_eq!(count(&root, NodeKind::ArrayLit), DEPTH);

    let objects = format!("x = {}1{};", "{a:".repeat(DEPTH), "}".repeat(DEPTH));
    let (root, _) = parse_ok(&objects);
    assert_eq!(count(&root, NodeKind::ObjectLit), DEPTH);

    let parens = format!("x = {}1{};", "(".repeat(2 * DEPTH), ")".repeat(2 * DEPTH));
    let (root, _) = parse_ok(&parens);
    assert_eq!(count(&root, NodeKind::Number), 1);

    let blocks = format!("{}{}", "{".repeat(DEPTH), "}".repeat(DEPTH));
    let (root, _) = parse_ok(&blocks);
    assert_eq!(count(&root, NodeKind::Block), DEPTH);

    let patterns = format!("var {}a{} = b;", "[".repeat(DEPTH), "]".repeat(DEPTH));
    let (root, _) = parse_ok(&patterns);
    assert_eq!(count(&root, NodeKind::ArrayPattern), DEPTH);
}

/// Test: Property access positions point at the property name
#[test]
fn test_getprop_position() {
    let (root, _) = parse_ok("foo.bar;");
    let getprop = root.first_child().unwrap().first_child().unwrap();
    assert_eq!(getprop.kind, NodeKind::GetProp);
    assert_eq!(getprop.string_value(), Some("bar"));
    assert_eq!(getprop.span.column, 4);
    assert_eq!(getprop.span.length, 3);
}

/// Test: Array holes become zero-length EMPTY nodes
#[test]
fn test_array_elisions() {
    let (root, _) = parse_ok("[, a, , b];");
    let array = root.first_child().unwrap().first_child().unwrap();
    assert_eq!(array.kind, NodeKind::ArrayLit);
    let kinds: Vec<_> = array.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Empty, NodeKind::Name, NodeKind::Empty, NodeKind::Name]
    );
    assert_eq!(array.child(0).unwrap().span.length, 0);
}

/// Test: Functions of all four kinds carry their flags
#[test]
fn test_function_flags() {
    let (root, features) = parse_ok(
        "function* g() { yield* x; } async function a() { await x; } async function* ag() {} const f = () => 1;",
    );
    let g = root.child(0).unwrap();
    assert!(g.flags.generator);
    assert!(g.find(NodeKind::Yield).unwrap().flags.yield_all);
    let a = root.child(1).unwrap();
    assert!(a.flags.is_async && !a.flags.generator);
    let ag = root.child(2).unwrap();
    assert!(ag.flags.is_async && ag.flags.generator);
    let arrow = root.child(3).unwrap().find(NodeKind::Function).unwrap();
    assert!(arrow.flags.arrow);
    for feature in [
        Feature::Generators,
        Feature::AsyncFunctions,
        Feature::AsyncGenerators,
        Feature::ArrowFunctions,
    ] {
        assert!(features.contains(feature), "{:?}", feature);
    }
}

/// Test: Classes with every member kind
#[test]
fn test_class_members() {
    let (root, features) = parse_ok(
        "class A extends B { constructor() { super(); } static s = 1; #p; get x() { return this.#p; } set x(v) {} [k]() {} static { } }",
    );
    let class = root.first_child().unwrap();
    assert_eq!(class.kind, NodeKind::Class);
    assert_eq!(class.child(1).unwrap().string_value(), Some("B"));
    let members = class.child(2).unwrap();
    let kinds: Vec<_> = members.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::MemberFunctionDef,
            NodeKind::MemberFieldDef,
            NodeKind::MemberFieldDef,
            NodeKind::GetterDef,
            NodeKind::SetterDef,
            NodeKind::ComputedProp,
            NodeKind::Block,
        ]
    );
    assert!(members.child(1).unwrap().flags.is_static);
    assert_eq!(members.child(2).unwrap().string_value(), Some("#p"));
    assert!(features.contains(Feature::PublicClassFields));
    assert!(features.contains(Feature::PrivateClassProperties));
}

/// Test: Template literals keep cooked and raw text
#[test]
fn test_template_payload() {
    let (root, _) = parse_ok(r"tag`a\n${b}`;");
    let tagged = root.first_child().unwrap().first_child().unwrap();
    assert_eq!(tagged.kind, NodeKind::TaggedTemplateLit);
    let template = tagged.child(1).unwrap();
    let first = template.first_child().unwrap();
    assert_eq!(
        first.payload,
        Payload::Template {
            cooked: Some("a\n".to_string()),
            raw: "a\\n".to_string(),
        }
    );
}

/// Test: Modules are detected from import and export
#[test]
fn test_module_detection() {
    let (root, features) = parse_ok("import x from 'm'; export { x };");
    let body = root.first_child().unwrap();
    assert_eq!(body.kind, NodeKind::ModuleBody);
    assert_eq!(body.child_count(), 2);
    assert!(features.contains(Feature::Modules));
}

/// Test: Top-level await is legal only in modules
#[test]
fn test_top_level_await() {
    let (_, reporter) = parse_collecting("await x;", &Config::default());
    assert_eq!(reporter.errors(), vec!["await must be inside asynchronous function"]);
    let (result, reporter) = parse_collecting("import 'm'; await x;", &Config::default());
    assert!(reporter.errors().is_empty(), "{:?}", reporter.errors());
    assert!(result.root.is_some());
}

/// Test: The feature set serializes for snapshots
#[test]
fn test_feature_set_json() {
    let config = Config::default().with_language_mode(LanguageMode::Ecmascript2021);
    let (result, _) = parse_collecting("a ?? b;", &config);
    let json = serde_json::to_string(&result.features).unwrap();
    assert!(json.contains("NULL_COALESCE_OP"), "{}", json);
    let back: FeatureSet = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result.features);
}
