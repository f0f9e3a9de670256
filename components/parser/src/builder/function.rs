//! Functions, parameter lists and classes

use super::scope::{ClassScope, PrivateMember, ScopeKind};
use super::TreeBuilder;
use crate::cst::{
    AssignmentOperator, Class, ClassMember, Expression, Function, FunctionBody, FunctionKind,
    Params, PropertyKey,
};
use crate::error::*;
use crate::features::Feature;
use crate::node::{Node, NodeKind, Payload};
use core_types::Span;
use std::collections::HashSet;

impl<'r> TreeBuilder<'r> {
    /// `FUNCTION(NAME, PARAM_LIST, body)` for any function flavour.
    pub(super) fn lower_function(&mut self, function: Function) -> Node {
        let start = function.span.start();
        let is_arrow = function.kind == FunctionKind::Arrow;
        if is_arrow {
            self.record_feature(Feature::ArrowFunctions, start);
        }
        match (function.is_async, function.is_generator) {
            (true, true) => self.record_feature(Feature::AsyncGenerators, start),
            (true, false) => self.record_feature(Feature::AsyncFunctions, start),
            (false, true) => self.record_feature(Feature::Generators, start),
            (false, false) => {}
        }

        let name = match function.name {
            Some(ident) => self.lower_identifier(ident),
            None => Node::name("", Span::empty_at(function.params.span.start())),
        };

        let kind = if is_arrow { ScopeKind::Arrow } else { ScopeKind::Function };
        self.scopes
            .enter_function(kind, function.is_generator, function.is_async);
        let params = self.lower_params(function.params, function.kind);
        let body = match function.body {
            FunctionBody::Block(block) => self.lower_block(block, false),
            FunctionBody::Expression(expression) => self.lower_expression(*expression),
        };
        self.scopes.exit_function();

        let mut node = Node::with_children(NodeKind::Function, function.span, vec![name, params, body]);
        node.flags.generator = function.is_generator;
        node.flags.is_async = function.is_async;
        node.flags.arrow = is_arrow;
        node
    }

    fn lower_params(&mut self, params: Params, kind: FunctionKind) -> Node {
        let count = params.items.len();
        let position = params.span.start();
        let mut accessor_error = false;
        match kind {
            FunctionKind::Getter if count > 0 => {
                self.error(position, format!("Getter must not have any parameters, found {}", count));
                accessor_error = true;
            }
            FunctionKind::Setter if count != 1 => {
                self.error(position, format!("Setter must have exactly 1 parameter, found {}", count));
                accessor_error = true;
            }
            FunctionKind::Setter if matches!(params.items.first(), Some(Expression::Spread { .. })) => {
                self.error(position, "Setter must not have a rest parameter");
                accessor_error = true;
            }
            _ => {}
        }

        let mut node = Node::new(NodeKind::ParamList, params.span);
        node.flags.trailing_comma = params.trailing_comma;
        for (index, item) in params.items.into_iter().enumerate() {
            let param = match item {
                Expression::Spread { argument, span } => {
                    self.record_feature(Feature::RestParameters, span.start());
                    if index + 1 < count {
                        if !accessor_error {
                            self.error(span.start(), REST_NOT_LAST);
                        }
                    } else if params.trailing_comma {
                        self.error(span.start(), COMMA_AFTER_REST);
                    }
                    let target = self.lower_binding_target(*argument);
                    Node::with_children(NodeKind::IterRest, span, vec![target])
                }
                Expression::Assignment {
                    operator: AssignmentOperator::Assign,
                    left,
                    right,
                    span,
                } => {
                    self.record_feature(Feature::DefaultParameters, span.start());
                    let target = self.lower_binding_target(*left);
                    let default = self.lower_expression(*right);
                    self.check_parameter_default(&default);
                    Node::with_children(NodeKind::DefaultValue, span, vec![target, default])
                }
                other => self.lower_binding_target(other),
            };
            node.add_child(param);
        }

        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for param in &node.children {
            collect_bound_names(param, &mut names);
        }
        for (name, span) in names {
            if !seen.insert(name) {
                self.warning(span.start(), format!("Duplicate parameter name \"{}\"", name));
            }
        }
        node
    }

    /// `yield` and `await` may not appear in a default, outside nested
    /// functions and classes.
    fn check_parameter_default(&mut self, default: &Node) {
        let mut stack = vec![default];
        while let Some(node) = stack.pop() {
            match node.kind {
                NodeKind::Function | NodeKind::Class => continue,
                NodeKind::Yield => self.error(node.span.start(), YIELD_IN_PARAMETER_DEFAULT),
                NodeKind::Await => self.error(node.span.start(), AWAIT_IN_PARAMETER_DEFAULT),
                _ => {}
            }
            stack.extend(node.children.iter().rev());
        }
    }

    /// Methods and accessors of object literals.
    pub(super) fn lower_object_method(&mut self, key: PropertyKey, function: Function, span: Span) -> Node {
        let kind = function.kind;
        let (def_kind, feature) = match kind {
            FunctionKind::Getter => (NodeKind::GetterDef, Feature::Getter),
            FunctionKind::Setter => (NodeKind::SetterDef, Feature::Setter),
            _ => (NodeKind::MemberFunctionDef, Feature::MemberDeclarations),
        };
        self.record_feature(feature, span.start());
        if let PropertyKey::Computed { expression, .. } = key {
            self.record_feature(Feature::ComputedProperties, span.start());
            let key = self.lower_expression(*expression);
            let function = self.lower_function(function);
            let mut node = Node::with_children(NodeKind::ComputedProp, span, vec![key, function]);
            node.flags.getter = kind == FunctionKind::Getter;
            node.flags.setter = kind == FunctionKind::Setter;
            return node;
        }
        let key = self.key_name(key);
        let mut function = self.lower_function(function);
        function.span = span;
        let mut node = Node::with_string(def_kind, key.name, key.span);
        node.flags.quoted = key.quoted;
        node.add_child(function);
        node
    }

    /// `CLASS(NAME|EMPTY, superclass|EMPTY, CLASS_MEMBERS)`.
    pub(super) fn lower_class(&mut self, class: Class) -> Node {
        self.record_feature(Feature::Classes, class.span.start());
        let name = match class.name {
            Some(ident) => self.lower_identifier(ident),
            None => Node::empty(Span::empty_at(class.span.start())),
        };
        let super_class = match class.super_class {
            Some(expression) => self.lower_expression(expression),
            None => Node::empty(Span::empty_at(class.body_span.start())),
        };

        let mut private_names = ClassScope::default();
        for member in &class.members {
            match member {
                ClassMember::Method {
                    key: PropertyKey::Private(ident),
                    is_static,
                    ..
                } => private_names.declare(
                    &ident.name,
                    PrivateMember {
                        is_method: true,
                        is_static: *is_static,
                    },
                ),
                ClassMember::Field {
                    key: PropertyKey::Private(ident),
                    is_static,
                    ..
                } => private_names.declare(
                    &ident.name,
                    PrivateMember {
                        is_method: false,
                        is_static: *is_static,
                    },
                ),
                _ => {}
            }
        }

        self.check_constructors(&class.members);

        self.scopes.enter_class(private_names);
        let mut members = Node::new(NodeKind::ClassMembers, class.body_span);
        for member in class.members {
            let member = self.lower_class_member(member);
            members.add_child(member);
        }
        self.scopes.exit_class();

        Node::with_children(NodeKind::Class, class.span, vec![name, super_class, members])
    }

    /// Only the non-static, non-computed `constructor` name counts; quoted
    /// keys are treated like computed ones.
    fn check_constructors(&mut self, members: &[ClassMember]) {
        let mut seen = false;
        for member in members {
            let ClassMember::Method {
                key: PropertyKey::Identifier(ident),
                function,
                is_static: false,
                ..
            } = member
            else {
                continue;
            };
            if ident.name != "constructor" {
                continue;
            }
            if function.kind != FunctionKind::Method || function.is_async || function.is_generator {
                self.error(ident.span.start(), CONSTRUCTOR_MODIFIERS);
            } else if seen {
                self.error(ident.span.start(), DUPLICATE_CONSTRUCTOR);
            }
            seen = true;
        }
    }

    fn lower_class_member(&mut self, member: ClassMember) -> Node {
        match member {
            ClassMember::Method {
                key,
                function,
                is_static,
                span,
            } => {
                let kind = function.kind;
                let def_kind = match kind {
                    FunctionKind::Getter => NodeKind::GetterDef,
                    FunctionKind::Setter => NodeKind::SetterDef,
                    _ => NodeKind::MemberFunctionDef,
                };
                self.record_feature(Feature::MemberDeclarations, span.start());
                let mut node = match key {
                    PropertyKey::Identifier(_) | PropertyKey::Private(_) => {
                        if let PropertyKey::Private(ident) = &key {
                            self.record_feature(Feature::PrivateClassProperties, ident.span.start());
                        }
                        let key = self.key_name(key);
                        let mut function = self.lower_function(*function);
                        function.span = span;
                        let mut node = Node::with_string(def_kind, key.name, key.span);
                        node.add_child(function);
                        node
                    }
                    key => {
                        let key = self.computed_key(key);
                        let mut function = self.lower_function(*function);
                        function.span = span;
                        let mut node = Node::with_children(NodeKind::ComputedProp, span, vec![key, function]);
                        node.flags.getter = kind == FunctionKind::Getter;
                        node.flags.setter = kind == FunctionKind::Setter;
                        node
                    }
                };
                node.flags.is_static = is_static;
                node
            }
            ClassMember::Field {
                key,
                value,
                is_static,
                span,
            } => {
                let feature = if matches!(key, PropertyKey::Private(_)) {
                    Feature::PrivateClassProperties
                } else {
                    Feature::PublicClassFields
                };
                self.record_feature(feature, span.start());
                let mut node = match key {
                    PropertyKey::Identifier(_) | PropertyKey::Private(_) => {
                        let key = self.key_name(key);
                        Node::with_string(NodeKind::MemberFieldDef, key.name, span)
                    }
                    key => {
                        let key = self.computed_key(key);
                        Node::with_children(NodeKind::ComputedFieldDef, span, vec![key])
                    }
                };
                if let Some(value) = value {
                    self.scopes.enter_function(ScopeKind::FieldInitializer, false, false);
                    let value = self.lower_expression(value);
                    self.scopes.exit_function();
                    node.add_child(value);
                }
                node.flags.is_static = is_static;
                node
            }
            ClassMember::StaticBlock(block) => {
                self.record_feature(Feature::ClassStaticBlock, block.span.start());
                self.scopes.enter_function(ScopeKind::StaticBlock, false, false);
                let mut node = self.lower_block(block, false);
                self.scopes.exit_function();
                node.flags.is_static = true;
                node
            }
        }
    }

    /// The key expression of a computed or literal-keyed class member.
    fn computed_key(&mut self, key: PropertyKey) -> Node {
        match key {
            PropertyKey::Computed { expression, span } => {
                self.record_feature(Feature::ComputedProperties, span.start());
                self.lower_expression(*expression)
            }
            PropertyKey::String(s) => Node::with_string(NodeKind::String, s.value, s.span),
            PropertyKey::Number { value, span } => {
                let mut node = Node::new(NodeKind::Number, span);
                node.payload = Payload::Number(value);
                node
            }
            PropertyKey::BigInt { value, span } => {
                self.record_feature(Feature::Bigint, span.start());
                let mut node = Node::new(NodeKind::BigInt, span);
                node.payload = Payload::BigInt(value);
                node
            }
            PropertyKey::Identifier(ident) | PropertyKey::Private(ident) => {
                Node::with_string(NodeKind::String, ident.name, ident.span)
            }
        }
    }
}

/// Names bound by a parameter, in source order.
fn collect_bound_names<'n>(node: &'n Node, out: &mut Vec<(&'n str, Span)>) {
    match node.kind {
        NodeKind::Name => {
            if let Some(name) = node.string_value() {
                out.push((name, node.span));
            }
        }
        NodeKind::DefaultValue | NodeKind::IterRest | NodeKind::ObjectRest | NodeKind::StringKey => {
            if let Some(target) = node.first_child() {
                collect_bound_names(target, out);
            }
        }
        NodeKind::ComputedProp => {
            if let Some(target) = node.child(1) {
                collect_bound_names(target, out);
            }
        }
        NodeKind::ArrayPattern | NodeKind::ObjectPattern => {
            for child in &node.children {
                collect_bound_names(child, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LanguageMode, RunMode};
    use crate::parser::Parser;
    use core_types::{CollectingReporter, DiagnosticSink};

    fn run(source: &str) -> (Option<Node>, CollectingReporter) {
        let mut reporter = CollectingReporter::new();
        let config = Config::default().with_run_mode(RunMode::KeepGoing);
        let root = {
            let sink = DiagnosticSink::new("test.js", &mut reporter);
            let builder = TreeBuilder::new(source, config, sink);
            Parser::new(source, config, builder).parse().root
        };
        (root, reporter)
    }

    fn errors(source: &str) -> Vec<String> {
        run(source).1.errors().into_iter().map(String::from).collect()
    }

    fn warnings(source: &str) -> Vec<String> {
        run(source).1.warnings().into_iter().map(String::from).collect()
    }

    #[test]
    fn test_function_shape() {
        let (root, reporter) = run("function f(a, b = 1, ...c) {}");
        assert!(reporter.errors().is_empty());
        let root = root.unwrap();
        let function = root.first_child().unwrap();
        assert_eq!(function.kind, NodeKind::Function);
        let params = function.child(1).unwrap();
        let kinds: Vec<_> = params.children.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![NodeKind::Name, NodeKind::DefaultValue, NodeKind::IterRest]);
    }

    #[test]
    fn test_rest_must_be_last() {
        assert_eq!(errors("function f(...y, z) {}"), vec![REST_NOT_LAST]);
    }

    #[test]
    fn test_arrow_rest_with_trailing_comma() {
        assert_eq!(errors("((...xs,) => xs);"), vec![COMMA_AFTER_REST]);
        assert!(errors("((...xs) => xs);").is_empty());
        assert!(errors("((a, b,) => a);").is_empty());
    }

    #[test]
    fn test_accessor_parameter_counts() {
        assert_eq!(
            errors("({set a(x, y) {}})"),
            vec!["Setter must have exactly 1 parameter, found 2"]
        );
        assert_eq!(
            errors("({set a(...x, y) {}})"),
            vec!["Setter must have exactly 1 parameter, found 2"]
        );
        assert_eq!(errors("({set a(...x) {}})"), vec!["Setter must not have a rest parameter"]);
        assert_eq!(
            errors("class C { get a(x) {} }"),
            vec!["Getter must not have any parameters, found 1"]
        );
        assert!(errors("({get a() {}, set a(v) {}})").is_empty());
    }

    #[test]
    fn test_duplicate_parameters_warn() {
        assert_eq!(warnings("function f(x, x) {}"), vec!["Duplicate parameter name \"x\""]);
        assert_eq!(warnings("function f(x, {x}) {}"), vec!["Duplicate parameter name \"x\""]);
        assert_eq!(warnings("function f(x, ...[x]) {}"), vec!["Duplicate parameter name \"x\""]);
        assert!(warnings("function f(x = x) {}").is_empty());
        assert!(warnings("function f({x: y}) {}").is_empty());
    }

    #[test]
    fn test_yield_and_await_in_defaults() {
        assert_eq!(
            errors("function* g(a = yield) {}"),
            vec![YIELD_IN_PARAMETER_DEFAULT]
        );
        assert_eq!(
            errors("async function f(a = await b) {}"),
            vec![AWAIT_IN_PARAMETER_DEFAULT]
        );
        assert!(errors("async function f(a = async () => { await b; }) {}").is_empty());
    }

    #[test]
    fn test_class_members() {
        let (root, reporter) = run("class C { static m() {} #x = 1; 'a'() {} [b] = 2; static {} }");
        assert!(reporter.errors().is_empty(), "{:?}", reporter.errors());
        let root = root.unwrap();
        let members = root.first_child().unwrap().child(2).unwrap();
        let kinds: Vec<_> = members.children.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::MemberFunctionDef,
                NodeKind::MemberFieldDef,
                NodeKind::ComputedProp,
                NodeKind::ComputedFieldDef,
                NodeKind::Block,
            ]
        );
        let method = members.child(0).unwrap();
        assert!(method.flags.is_static);
        assert_eq!(method.span.column, 17);
        assert_eq!(method.first_child().unwrap().span.column, 10);
        assert_eq!(members.child(1).unwrap().string_value(), Some("#x"));
    }

    #[test]
    fn test_constructor_members() {
        assert_eq!(errors("class C { get constructor() {} }"), vec![CONSTRUCTOR_MODIFIERS]);
        assert_eq!(errors("class C { async constructor() {} }"), vec![CONSTRUCTOR_MODIFIERS]);
        assert_eq!(errors("class C { *constructor() {} }"), vec![CONSTRUCTOR_MODIFIERS]);
        assert_eq!(
            errors("class C { constructor() {} constructor() {} }"),
            vec![DUPLICATE_CONSTRUCTOR]
        );
        assert!(errors("class C { static constructor() {} constructor() {} }").is_empty());
        assert!(errors("class C { get 'constructor'() {} }").is_empty());
        assert!(errors("class C { async 'constructor'() {} *'constructor'() {} }").is_empty());
        assert!(errors("class C { constructor() {} 'constructor'() {} }").is_empty());
    }

    #[test]
    fn test_constructor_error_keeps_the_class() {
        let (root, reporter) = run("class C { get constructor() {} m() {} }");
        assert_eq!(reporter.errors(), vec![CONSTRUCTOR_MODIFIERS]);
        let root = root.unwrap();
        let members = root.first_child().unwrap().child(2).unwrap();
        assert_eq!(members.child_count(), 2);
    }

    #[test]
    fn test_class_methods_are_member_declarations() {
        let mut reporter = CollectingReporter::new();
        let config = Config::default().with_language_mode(LanguageMode::Ecmascript5);
        {
            let sink = DiagnosticSink::new("test.js", &mut reporter);
            let builder = TreeBuilder::new("class C { m() {} }", config, sink);
            Parser::new("class C { m() {} }", config, builder).parse();
        }
        let warnings = reporter.warnings();
        assert!(
            warnings.iter().any(|w| w == &"This language feature is only supported for ECMASCRIPT_2015 mode or better: member declaration"),
            "{:?}",
            warnings
        );
    }

    #[test]
    fn test_static_block_context() {
        assert_eq!(
            errors("function* f(ind) {class C{ static {yield ind; ind++;}}}"),
            vec![UNEXPECTED_YIELD]
        );
        assert_eq!(errors("class C {static {await 1;}}"), vec![UNEXPECTED_AWAIT]);
        assert_eq!(errors("while (true) {class C {static {continue;}}}"), vec![UNEXPECTED_CONTINUE]);
        assert!(errors("class C {static {x: while (true) {continue x;}}}").is_empty());
    }
}
