//! Expression lowering

use super::TreeBuilder;
use crate::cst::{
    Arguments, ArrayElement, AssignmentOperator, BinaryOperator, Expression, Ident, MemberProperty,
    Property, PropertyKey, Template, UnaryOperator,
};
use crate::error::*;
use crate::features::Feature;
use crate::lexer::{Keyword, ES3_RESERVED_WORDS, STRICT_RESERVED_WORDS};
use crate::node::{Node, NodeKind, Payload};
use core_types::Span;

const BIGINT_TO_NUMBER: &str = "Cannot convert a BigInt value to a number";
const INVALID_DELETE: &str = "Invalid delete operand. Only properties can be deleted.";
const KEYWORD_IN_SHORTHAND: &str = "Cannot use keyword in short object literal";
const REGEXP_FLAGS: &str = "gimsuydv";

/// A non-computed property key, ready to become a node payload.
pub(super) struct KeyName {
    pub name: String,
    pub span: Span,
    /// Written as a string literal
    pub quoted: bool,
}

impl<'r> TreeBuilder<'r> {
    pub(super) fn lower_expression(&mut self, expression: Expression) -> Node {
        crate::ensure_stack(|| self.lower_expression_inner(expression))
    }

    fn lower_expression_inner(&mut self, expression: Expression) -> Node {
        match expression {
            Expression::Identifier(ident) => self.lower_identifier(ident),
            Expression::This(span) => Node::new(NodeKind::This, span),
            Expression::Super(span) => {
                self.record_feature(Feature::Super, span.start());
                Node::new(NodeKind::Super, span)
            }
            Expression::Null(span) => Node::new(NodeKind::Null, span),
            Expression::Boolean { value, span } => {
                Node::new(if value { NodeKind::True } else { NodeKind::False }, span)
            }
            Expression::Number { value, span } => {
                let mut node = Node::new(NodeKind::Number, span);
                node.payload = Payload::Number(value);
                node
            }
            Expression::BigInt { value, span } => {
                self.record_feature(Feature::Bigint, span.start());
                let mut node = Node::new(NodeKind::BigInt, span);
                node.payload = Payload::BigInt(value);
                node
            }
            Expression::String(s) => Node::with_string(NodeKind::String, s.value, s.span),
            Expression::RegExp {
                pattern,
                flags,
                span,
            } => self.lower_regexp(pattern, flags, span),
            Expression::Template(template) => self.lower_template(template, false),
            Expression::TaggedTemplate {
                tag,
                template,
                span,
            } => {
                let tag = self.lower_expression(*tag);
                let template = self.lower_template(template, true);
                Node::with_children(NodeKind::TaggedTemplateLit, span, vec![tag, template])
            }
            Expression::Array {
                elements,
                trailing_comma,
                span,
            } => self.lower_array_literal(elements, trailing_comma, span),
            Expression::Object {
                properties,
                trailing_comma,
                span,
            } => self.lower_object_literal(properties, trailing_comma, span),
            Expression::Function(function) => self.lower_function(*function),
            Expression::Class(class) => self.lower_class(*class),
            Expression::Unary {
                operator,
                argument,
                span,
            } => self.lower_unary(operator, *argument, span),
            Expression::Update {
                increment,
                postfix,
                argument,
                span,
            } => {
                if !is_simple_target(&argument) {
                    let message = format!(
                        "Invalid {} {} operand.",
                        if postfix { "postfix" } else { "prefix" },
                        if increment { "increment" } else { "decrement" }
                    );
                    self.error(argument.span().start(), message);
                }
                let argument = self.lower_expression(*argument);
                let kind = if increment { NodeKind::Inc } else { NodeKind::Dec };
                let mut node = Node::with_children(kind, span, vec![argument]);
                node.flags.postfix = postfix;
                node
            }
            binary @ Expression::Binary { .. } => self.lower_binary(binary),
            Expression::Assignment {
                operator,
                left,
                right,
                span,
            } => {
                let target = if operator == AssignmentOperator::Assign {
                    self.lower_assignment_target(*left)
                } else {
                    self.lower_simple_target(*left)
                };
                match operator {
                    AssignmentOperator::Exponent => self.record_feature(Feature::ExponentOp, span.start()),
                    AssignmentOperator::And | AssignmentOperator::Or | AssignmentOperator::Coalesce => {
                        self.record_feature(Feature::LogicalAssignment, span.start())
                    }
                    _ => {}
                }
                let value = self.lower_expression(*right);
                Node::with_children(assignment_kind(operator), span, vec![target, value])
            }
            Expression::Conditional {
                test,
                consequent,
                alternate,
                span,
            } => {
                let children = vec![
                    self.lower_expression(*test),
                    self.lower_expression(*consequent),
                    self.lower_expression(*alternate),
                ];
                Node::with_children(NodeKind::Hook, span, children)
            }
            Expression::Sequence { expressions, .. } => {
                let mut nodes = expressions.into_iter().map(|e| self.lower_expression(e));
                let Some(mut node) = nodes.next() else {
                    return Node::empty(Span::default());
                };
                for right in nodes {
                    let span = node.span.to(right.span);
                    node = Node::with_children(NodeKind::Comma, span, vec![node, right]);
                }
                node
            }
            Expression::Member {
                object,
                property,
                optional,
                span,
            } => self.lower_member(*object, property, optional, span, false),
            Expression::Call {
                callee,
                arguments,
                optional,
                span,
            } => self.lower_call(*callee, arguments, optional, span),
            Expression::New {
                callee,
                arguments,
                span,
            } => {
                let mut node = Node::with_children(NodeKind::New, span, vec![self.lower_expression(*callee)]);
                if let Some(arguments) = arguments {
                    node.flags.trailing_comma = arguments.trailing_comma;
                    node.children.extend(self.lower_arguments(arguments));
                }
                node
            }
            Expression::Spread { argument, span } => {
                self.record_feature(Feature::SpreadExpressions, span.start());
                let argument = self.lower_expression(*argument);
                Node::with_children(NodeKind::Spread, span, vec![argument])
            }
            Expression::Yield {
                argument,
                delegate,
                span,
            } => {
                if !self.scopes.in_generator() {
                    self.error(span.start(), UNEXPECTED_YIELD);
                }
                let mut node = Node::new(NodeKind::Yield, span);
                node.flags.yield_all = delegate;
                if let Some(argument) = argument {
                    node.add_child(self.lower_expression(*argument));
                }
                node
            }
            Expression::Await { argument, span } => {
                self.check_await(span.start(), UNEXPECTED_AWAIT);
                let argument = self.lower_expression(*argument);
                Node::with_children(NodeKind::Await, span, vec![argument])
            }
            Expression::PrivateName(ident) => {
                self.error(ident.span.start(), INVALID_PRIVATE_ID);
                Node::with_string(NodeKind::Name, format!("#{}", ident.name), ident.span)
            }
            Expression::NewTarget(span) => {
                if !self.scopes.new_target_allowed() {
                    self.error(span.start(), UNEXPECTED_NEW_TARGET);
                }
                self.record_feature(Feature::NewTarget, span.start());
                Node::new(NodeKind::NewTarget, span)
            }
            Expression::ImportMeta(span) => {
                self.mark_module(span.start());
                self.record_feature(Feature::ImportMeta, span.start());
                Node::new(NodeKind::ImportMeta, span)
            }
            Expression::DynamicImport { argument, span } => {
                self.record_feature(Feature::DynamicImport, span.start());
                let argument = self.lower_expression(*argument);
                Node::with_children(NodeKind::DynamicImport, span, vec![argument])
            }
            Expression::Paren { expression, .. } => {
                let mut node = self.lower_expression(*expression);
                node.flags.parenthesized = true;
                node
            }
        }
    }

    /// A `NAME` for an identifier reference or binding.
    pub(super) fn lower_identifier(&mut self, ident: Ident) -> Node {
        if ES3_RESERVED_WORDS.contains(&ident.name.as_str()) {
            self.record_feature(Feature::Es3KeywordsAsIdentifiers, ident.span.start());
        }
        Node::name(ident.name, ident.span)
    }

    fn lower_regexp(&mut self, pattern: String, flags: String, span: Span) -> Node {
        let mut seen = String::new();
        for flag in flags.chars() {
            if !REGEXP_FLAGS.contains(flag) || seen.contains(flag) {
                self.error(span.start(), format!("Invalid RegExp flag '{}'", flag));
                continue;
            }
            seen.push(flag);
            let feature = match flag {
                'u' => Feature::RegexpFlagU,
                'y' => Feature::RegexpFlagY,
                's' => Feature::RegexpFlagS,
                'd' => Feature::RegexpFlagD,
                'v' => Feature::RegexpFlagV,
                _ => continue,
            };
            self.record_feature(feature, span.start());
        }
        let mut node = Node::new(NodeKind::RegExp, span);
        node.add_child(Node::with_string(NodeKind::String, pattern, span));
        if !flags.is_empty() {
            node.add_child(Node::with_string(NodeKind::String, flags, span));
        }
        node
    }

    /// Escape problems in template text are errors only when no tag
    /// function receives the raw strings.
    fn lower_template(&mut self, template: Template, tagged: bool) -> Node {
        self.record_feature(Feature::TemplateLiterals, template.span.start());
        let mut node = Node::new(NodeKind::TemplateLit, template.span);
        let mut substitutions = template.expressions.into_iter();
        for quasi in template.quasis {
            if !tagged {
                for problem in quasi.problems {
                    self.emit_lexical(problem);
                }
            }
            let mut text = Node::new(NodeKind::TemplateLitString, quasi.span);
            text.payload = Payload::Template {
                cooked: quasi.cooked,
                raw: quasi.raw,
            };
            node.add_child(text);
            if let Some(expression) = substitutions.next() {
                let span = expression.span();
                let expression = self.lower_expression(expression);
                node.add_child(Node::with_children(NodeKind::TemplateLitSub, span, vec![expression]));
            }
        }
        node
    }

    fn lower_unary(&mut self, operator: UnaryOperator, argument: Expression, span: Span) -> Node {
        match operator {
            UnaryOperator::Plus if matches!(argument, Expression::BigInt { .. }) => {
                self.error(span.start(), BIGINT_TO_NUMBER);
            }
            UnaryOperator::Delete => match strip_parens(&argument) {
                Expression::Member {
                    property: MemberProperty::Private(_),
                    ..
                } => self.error(span.start(), PRIVATE_FIELD_DELETED),
                Expression::Member { .. } | Expression::Identifier(_) => {}
                _ => self.error(argument.span().start(), INVALID_DELETE),
            },
            _ => {}
        }
        let kind = match operator {
            UnaryOperator::Minus => NodeKind::Neg,
            UnaryOperator::Plus => NodeKind::Pos,
            UnaryOperator::Not => NodeKind::Not,
            UnaryOperator::BitwiseNot => NodeKind::BitNot,
            UnaryOperator::Typeof => NodeKind::TypeOf,
            UnaryOperator::Void => NodeKind::Void,
            UnaryOperator::Delete => NodeKind::DelProp,
        };
        let argument = self.lower_expression(argument);
        Node::with_children(kind, span, vec![argument])
    }

    /// Lowers a binary chain without recursing down its left spine.
    fn lower_binary(&mut self, expression: Expression) -> Node {
        let mut spine = Vec::new();
        let mut current = expression;
        while let Expression::Binary {
            operator,
            left,
            right,
            span,
        } = current
        {
            spine.push((operator, *right, span));
            current = *left;
        }
        let mut node = match current {
            Expression::PrivateName(ident)
                if matches!(spine.last(), Some((BinaryOperator::In, _, _))) =>
            {
                self.lower_private_in_operand(ident)
            }
            other => self.lower_expression(other),
        };
        while let Some((operator, right, span)) = spine.pop() {
            match operator {
                BinaryOperator::Exponent => self.record_feature(Feature::ExponentOp, span.start()),
                BinaryOperator::Coalesce => self.record_feature(Feature::NullCoalesceOp, span.start()),
                _ => {}
            }
            let right = self.lower_expression(right);
            node = Node::with_children(binary_kind(operator), span, vec![node, right]);
        }
        node
    }

    /// Property access. `is_callee` tells a method-shaped private reference
    /// from a field-shaped one.
    pub(super) fn lower_member(
        &mut self,
        object: Expression,
        property: MemberProperty,
        optional: bool,
        span: Span,
        is_callee: bool,
    ) -> Node {
        let in_chain = optional || object.is_optional_chain();
        let starts_chain = optional && !object.is_optional_chain();
        if optional {
            self.record_feature(Feature::OptionalChaining, span.start());
        }
        let receiver = self.lower_expression(object);
        let mut node = match property {
            MemberProperty::Name(name) => {
                if Keyword::from_name(&name.name).is_some() {
                    self.record_feature(Feature::KeywordsAsProperties, name.span.start());
                }
                let kind = if in_chain { NodeKind::OptChainGetProp } else { NodeKind::GetProp };
                let mut node = Node::with_string(kind, name.name, span);
                node.add_child(receiver);
                node
            }
            MemberProperty::Private(name) => {
                self.record_feature(Feature::PrivateClassProperties, name.span.start());
                if !self.scopes.in_class() {
                    self.error(name.span.start(), INVALID_PRIVATE_ID);
                } else if self.scopes.lookup_private(&name.name).is_none() {
                    let message = if is_callee {
                        PRIVATE_METHOD_NOT_DEFINED
                    } else {
                        PRIVATE_FIELD_NOT_DEFINED
                    };
                    self.error(name.span.start(), message);
                }
                let kind = if in_chain { NodeKind::OptChainGetProp } else { NodeKind::GetProp };
                let mut node = Node::with_string(kind, format!("#{}", name.name), span);
                node.add_child(receiver);
                node
            }
            MemberProperty::Computed(key) => {
                let key = self.lower_expression(*key);
                let kind = if in_chain { NodeKind::OptChainGetElem } else { NodeKind::GetElem };
                Node::with_children(kind, span, vec![receiver, key])
            }
        };
        node.flags.optional_chain_start = starts_chain;
        node
    }

    /// A shorthand property names a binding, so reserved words are out.
    /// Before ES2015 the future-reserved words count even in sloppy code.
    pub(super) fn is_reserved_shorthand(&self, name: &str) -> bool {
        if Keyword::from_name(name).is_some() {
            return true;
        }
        let reserves_future_words =
            self.strict || !self.allowed.contains(Feature::ExtendedObjectLiterals);
        reserves_future_words && STRICT_RESERVED_WORDS.contains(&name)
    }

    /// `#name` in `#name in object`, resolved like a field reference.
    fn lower_private_in_operand(&mut self, ident: Ident) -> Node {
        self.record_feature(Feature::PrivateClassProperties, ident.span.start());
        if !self.scopes.in_class() {
            self.error(ident.span.start(), INVALID_PRIVATE_ID);
        } else if self.scopes.lookup_private(&ident.name).is_none() {
            self.error(ident.span.start(), PRIVATE_FIELD_NOT_DEFINED);
        }
        Node::with_string(NodeKind::Name, format!("#{}", ident.name), ident.span)
    }

    fn lower_call(&mut self, callee: Expression, arguments: Arguments, optional: bool, span: Span) -> Node {
        let in_chain = optional || callee.is_optional_chain();
        let starts_chain = optional && !callee.is_optional_chain();
        let free_call = matches!(callee, Expression::Identifier(_));
        if optional {
            self.record_feature(Feature::OptionalChaining, span.start());
        }
        let callee = match callee {
            Expression::Member {
                object,
                property,
                optional,
                span,
            } => self.lower_member(*object, property, optional, span, true),
            other => self.lower_expression(other),
        };
        let kind = if in_chain { NodeKind::OptChainCall } else { NodeKind::Call };
        let mut node = Node::with_children(kind, span, vec![callee]);
        node.flags.trailing_comma = arguments.trailing_comma;
        node.flags.optional_chain_start = starts_chain;
        node.flags.free_call = free_call;
        node.children.extend(self.lower_arguments(arguments));
        node
    }

    fn lower_arguments(&mut self, arguments: Arguments) -> Vec<Node> {
        arguments
            .items
            .into_iter()
            .map(|argument| self.lower_expression(argument))
            .collect()
    }

    fn lower_array_literal(&mut self, elements: Vec<ArrayElement>, trailing_comma: bool, span: Span) -> Node {
        if trailing_comma {
            self.record_feature(Feature::TrailingComma, span.start());
        }
        let mut node = Node::new(NodeKind::ArrayLit, span);
        node.flags.trailing_comma = trailing_comma;
        for element in elements {
            let child = match element {
                ArrayElement::Hole(hole) => Node::empty(Span::empty_at(hole.start())),
                ArrayElement::Expression(expression) => self.lower_expression(expression),
                ArrayElement::Spread { argument, span } => {
                    self.record_feature(Feature::SpreadExpressions, span.start());
                    let argument = self.lower_expression(argument);
                    Node::with_children(NodeKind::Spread, span, vec![argument])
                }
            };
            node.add_child(child);
        }
        node
    }

    fn lower_object_literal(&mut self, properties: Vec<Property>, trailing_comma: bool, span: Span) -> Node {
        if trailing_comma {
            self.record_feature(Feature::TrailingComma, span.start());
        }
        let mut node = Node::new(NodeKind::ObjectLit, span);
        node.flags.trailing_comma = trailing_comma;
        for property in properties {
            let child = match property {
                Property::KeyValue { key, value, span } => match key {
                    PropertyKey::Computed { expression, .. } => {
                        self.record_feature(Feature::ComputedProperties, span.start());
                        let key = self.lower_expression(*expression);
                        let value = self.lower_expression(value);
                        Node::with_children(NodeKind::ComputedProp, span, vec![key, value])
                    }
                    key => {
                        let mut node = self.string_key(key);
                        node.add_child(self.lower_expression(value));
                        node
                    }
                },
                Property::Shorthand { name, init, span } => {
                    self.record_feature(Feature::ExtendedObjectLiterals, span.start());
                    if self.is_reserved_shorthand(&name.name) {
                        self.error(name.span.start(), KEYWORD_IN_SHORTHAND);
                    }
                    let mut key = Node::with_string(NodeKind::StringKey, name.name.clone(), name.span);
                    key.flags.shorthand = true;
                    let mut value = self.lower_identifier(name);
                    if let Some(init) = init {
                        self.error(init.span().start(), DEFAULT_VALUE_IN_OBJECT_LITERAL);
                        let init = self.lower_expression(init);
                        value = Node::with_children(NodeKind::DefaultValue, span, vec![value, init]);
                    }
                    key.add_child(value);
                    key
                }
                Property::Method { key, function, span } => self.lower_object_method(key, *function, span),
                Property::Spread { argument, span } => {
                    self.record_feature(Feature::ObjectLiteralsWithSpread, span.start());
                    let argument = self.lower_expression(argument);
                    Node::with_children(NodeKind::ObjectSpread, span, vec![argument])
                }
            };
            node.add_child(child);
        }
        node
    }

    /// Resolves a non-computed key to its property name.
    pub(super) fn key_name(&mut self, key: PropertyKey) -> KeyName {
        match key {
            PropertyKey::Identifier(ident) => {
                if Keyword::from_name(&ident.name).is_some() {
                    self.record_feature(Feature::KeywordsAsProperties, ident.span.start());
                }
                KeyName {
                    name: ident.name,
                    span: ident.span,
                    quoted: false,
                }
            }
            PropertyKey::Private(ident) => KeyName {
                name: format!("#{}", ident.name),
                span: ident.span,
                quoted: false,
            },
            PropertyKey::String(s) => KeyName {
                name: s.value,
                span: s.span,
                quoted: true,
            },
            PropertyKey::Number { value, span } => KeyName {
                name: js_number_string(value),
                span,
                quoted: false,
            },
            PropertyKey::BigInt { value, span } => {
                self.record_feature(Feature::Bigint, span.start());
                KeyName {
                    name: value.to_string(),
                    span,
                    quoted: false,
                }
            }
            PropertyKey::Computed { span, .. } => KeyName {
                name: String::new(),
                span,
                quoted: false,
            },
        }
    }

    /// A childless `STRING_KEY` for a non-computed key.
    pub(super) fn string_key(&mut self, key: PropertyKey) -> Node {
        let key = self.key_name(key);
        let mut node = Node::with_string(NodeKind::StringKey, key.name, key.span);
        node.flags.quoted = key.quoted;
        node
    }
}

/// Strips any number of enclosing parentheses.
pub(super) fn strip_parens(expression: &Expression) -> &Expression {
    let mut current = expression;
    while let Expression::Paren { expression, .. } = current {
        current = expression;
    }
    current
}

/// Names and non-optional property accesses, possibly parenthesized.
pub(super) fn is_simple_target(expression: &Expression) -> bool {
    match strip_parens(expression) {
        Expression::Identifier(_) => true,
        member @ Expression::Member { .. } => !member.is_optional_chain(),
        _ => false,
    }
}

/// JavaScript's `Number.prototype.toString()` for property names.
pub(crate) fn js_number_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if value.fract() == 0.0 && magnitude < 1e21 {
        return format!("{}", value as i128);
    }
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    format!("{}", value)
}

fn binary_kind(operator: BinaryOperator) -> NodeKind {
    match operator {
        BinaryOperator::Coalesce => NodeKind::Coalesce,
        BinaryOperator::Or => NodeKind::Or,
        BinaryOperator::And => NodeKind::And,
        BinaryOperator::BitwiseOr => NodeKind::BitOr,
        BinaryOperator::BitwiseXor => NodeKind::BitXor,
        BinaryOperator::BitwiseAnd => NodeKind::BitAnd,
        BinaryOperator::Equal => NodeKind::Eq,
        BinaryOperator::NotEqual => NodeKind::Ne,
        BinaryOperator::StrictEqual => NodeKind::Sheq,
        BinaryOperator::StrictNotEqual => NodeKind::Shne,
        BinaryOperator::Less => NodeKind::Lt,
        BinaryOperator::Greater => NodeKind::Gt,
        BinaryOperator::LessEqual => NodeKind::Le,
        BinaryOperator::GreaterEqual => NodeKind::Ge,
        BinaryOperator::Instanceof => NodeKind::InstanceOf,
        BinaryOperator::In => NodeKind::In,
        BinaryOperator::LeftShift => NodeKind::Lsh,
        BinaryOperator::RightShift => NodeKind::Rsh,
        BinaryOperator::UnsignedRightShift => NodeKind::Ursh,
        BinaryOperator::Add => NodeKind::Add,
        BinaryOperator::Subtract => NodeKind::Sub,
        BinaryOperator::Multiply => NodeKind::Mul,
        BinaryOperator::Divide => NodeKind::Div,
        BinaryOperator::Modulo => NodeKind::Mod,
        BinaryOperator::Exponent => NodeKind::Exponent,
    }
}

fn assignment_kind(operator: AssignmentOperator) -> NodeKind {
    match operator {
        AssignmentOperator::Assign => NodeKind::Assign,
        AssignmentOperator::Add => NodeKind::AssignAdd,
        AssignmentOperator::Subtract => NodeKind::AssignSub,
        AssignmentOperator::Multiply => NodeKind::AssignMul,
        AssignmentOperator::Divide => NodeKind::AssignDiv,
        AssignmentOperator::Modulo => NodeKind::AssignMod,
        AssignmentOperator::Exponent => NodeKind::AssignExponent,
        AssignmentOperator::LeftShift => NodeKind::AssignLsh,
        AssignmentOperator::RightShift => NodeKind::AssignRsh,
        AssignmentOperator::UnsignedRightShift => NodeKind::AssignUrsh,
        AssignmentOperator::BitwiseAnd => NodeKind::AssignBitAnd,
        AssignmentOperator::BitwiseOr => NodeKind::AssignBitOr,
        AssignmentOperator::BitwiseXor => NodeKind::AssignBitXor,
        AssignmentOperator::And => NodeKind::AssignAnd,
        AssignmentOperator::Or => NodeKind::AssignOr,
        AssignmentOperator::Coalesce => NodeKind::AssignCoalesce,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LanguageMode, RunMode, StrictMode};
    use crate::features::FeatureSet;
    use crate::parser::Parser;
    use core_types::{CollectingReporter, DiagnosticSink};

    fn run(source: &str, config: Config) -> (Option<Node>, FeatureSet, CollectingReporter) {
        let mut reporter = CollectingReporter::new();
        let (root, features) = {
            let sink = DiagnosticSink::new("test.js", &mut reporter);
            let builder = TreeBuilder::new(source, config, sink);
            let output = Parser::new(source, config, builder).parse();
            (output.root, output.builder.features().clone())
        };
        (root, features, reporter)
    }

    fn expression(source: &str) -> Node {
        let (root, _, reporter) = run(source, Config::default());
        assert!(reporter.errors().is_empty(), "{:?}", reporter.errors());
        let mut root = root.expect("tree");
        let mut statement = root.children.remove(0);
        assert_eq!(statement.kind, NodeKind::ExprResult);
        statement.children.remove(0)
    }

    fn errors(source: &str) -> Vec<String> {
        let config = Config::default().with_run_mode(RunMode::KeepGoing);
        let (_, _, reporter) = run(source, config);
        reporter.errors().into_iter().map(String::from).collect()
    }

    #[test]
    fn test_binary_spans_start_at_left_operand() {
        let node = expression("a + b * c");
        assert_eq!(node.kind, NodeKind::Add);
        assert_eq!(node.span.column, 0);
        assert_eq!(node.span.length, 9);
        assert_eq!(node.child(1).unwrap().kind, NodeKind::Mul);
    }

    #[test]
    fn test_long_chain_lowers() {
        let source = vec!["x"; 5000].join(" + ");
        let node = expression(&source);
        assert_eq!(node.kind, NodeKind::Add);
    }

    #[test]
    fn test_optional_chain_start_flags() {
        let node = expression("a?.b?.c");
        assert_eq!(node.kind, NodeKind::OptChainGetProp);
        assert!(!node.flags.optional_chain_start);
        let inner = node.first_child().unwrap();
        assert!(inner.flags.optional_chain_start);

        let node = expression("(a?.b).c");
        assert_eq!(node.kind, NodeKind::GetProp);
        assert!(!node.flags.optional_chain_start);
        assert!(node.first_child().unwrap().flags.parenthesized);
    }

    #[test]
    fn test_getprop_positioned_at_name() {
        let node = expression("foo.bar");
        assert_eq!(node.string_value(), Some("bar"));
        assert_eq!(node.span.column, 4);
        assert_eq!(node.span.length, 3);
    }

    #[test]
    fn test_free_call() {
        assert!(expression("f(1)").flags.free_call);
        assert!(!expression("a.f(1)").flags.free_call);
        assert!(expression("f(1,)").flags.trailing_comma);
    }

    #[test]
    fn test_sequence_is_left_nested() {
        let node = expression("a, b, c");
        assert_eq!(node.kind, NodeKind::Comma);
        assert_eq!(node.first_child().unwrap().kind, NodeKind::Comma);
        assert_eq!(node.span.length, 7);
    }

    #[test]
    fn test_update_and_delete_operands() {
        assert_eq!(errors("a()++"), vec!["Invalid postfix increment operand."]);
        assert_eq!(errors("--{a: 1}"), vec!["Invalid prefix decrement operand."]);
        assert_eq!(errors("++this"), vec!["Invalid prefix increment operand."]);
        assert!(errors("/** @type {number} */ (a)++;").is_empty());
        assert_eq!(errors("delete f()"), vec![INVALID_DELETE]);
        assert_eq!(errors("delete 6n"), vec![INVALID_DELETE]);
        assert_eq!(errors("+1n"), vec![BIGINT_TO_NUMBER]);
    }

    #[test]
    fn test_bigint_literal() {
        let node = expression("0n");
        assert_eq!(node.kind, NodeKind::BigInt);
        assert_eq!(node.span.column, 0);
        assert_eq!(node.span.length, 2);
    }

    #[test]
    fn test_regexp_flags() {
        assert_eq!(errors("/a/gg"), vec!["Invalid RegExp flag 'g'"]);
        assert_eq!(errors("/a/c"), vec!["Invalid RegExp flag 'c'"]);
        let config = Config::default().with_language_mode(LanguageMode::Ecmascript2015);
        let (_, features, reporter) = run("/a/s", config);
        assert!(features.contains(Feature::RegexpFlagS));
        assert_eq!(reporter.warnings().len(), 1);
        let node = expression("/ab+c/i");
        assert_eq!(node.child(0).unwrap().string_value(), Some("ab+c"));
        assert_eq!(node.child(1).unwrap().string_value(), Some("i"));
    }

    #[test]
    fn test_array_holes_have_zero_length() {
        let node = expression("[1, , 2]");
        let hole = node.child(1).unwrap();
        assert_eq!(hole.kind, NodeKind::Empty);
        assert_eq!(hole.span.length, 0);
    }

    #[test]
    fn test_object_literal_keys() {
        let node = expression("({a: 1, 'b': 2, 3: 4, c, [d]: 5, ...e})");
        let kinds: Vec<_> = node.children.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::StringKey,
                NodeKind::StringKey,
                NodeKind::StringKey,
                NodeKind::StringKey,
                NodeKind::ComputedProp,
                NodeKind::ObjectSpread,
            ]
        );
        assert!(node.child(1).unwrap().flags.quoted);
        assert_eq!(node.child(2).unwrap().string_value(), Some("3"));
        assert!(node.child(3).unwrap().flags.shorthand);
    }

    #[test]
    fn test_object_literal_diagnostics() {
        assert_eq!(errors("({a = 1})"), vec![DEFAULT_VALUE_IN_OBJECT_LITERAL]);
        assert_eq!(errors("({if})"), vec![KEYWORD_IN_SHORTHAND]);
    }

    #[test]
    fn test_es3_warnings() {
        let config = Config::default().with_language_mode(LanguageMode::Ecmascript3);
        let (_, _, reporter) = run("var x = [1, 2,]; x.class;", config);
        assert_eq!(reporter.warnings(), vec![TRAILING_COMMA_ES3, KEYWORD_AS_PROPERTY_ES3]);
    }

    #[test]
    fn test_private_references() {
        assert!(errors("class C { #x; m() { this.#x; } }").is_empty());
        assert_eq!(errors("class C { m() { this.#x; } }"), vec![PRIVATE_FIELD_NOT_DEFINED]);
        assert_eq!(errors("class C { m() { this.#x(); } }"), vec![PRIVATE_METHOD_NOT_DEFINED]);
        assert_eq!(errors("class C { #f = 1; m() { delete this.#f; } }"), vec![PRIVATE_FIELD_DELETED]);
        assert!(errors("class C { #x; m() { class D { n() { this.#x; } } } }").is_empty());
        assert_eq!(
            errors("class C { m() { class D { #x; } this.#x; } }"),
            vec![PRIVATE_FIELD_NOT_DEFINED]
        );
    }

    #[test]
    fn test_reserved_shorthand_names() {
        assert_eq!(errors("({implements});"), vec![KEYWORD_IN_SHORTHAND]);
        let sloppy = Config::default()
            .with_strict_mode(StrictMode::Sloppy)
            .with_run_mode(RunMode::KeepGoing);
        let (_, _, reporter) = run("({implements});", sloppy);
        assert!(reporter.errors().is_empty(), "{:?}", reporter.errors());
        let es5 = sloppy.with_language_mode(LanguageMode::Ecmascript5);
        let (_, _, reporter) = run("var a = { let };", es5);
        assert_eq!(reporter.errors(), vec![KEYWORD_IN_SHORTHAND]);
    }

    #[test]
    fn test_private_brand_checks() {
        assert!(errors("class C { #f = 1; static isC(x) { return #f in x; } }").is_empty());
        assert!(errors("class C { #m() {} static isC(x) { return #m in x && 1; } }").is_empty());
        assert_eq!(
            errors("class C { static isC(x) { return #f in x; } }"),
            vec![PRIVATE_FIELD_NOT_DEFINED]
        );
        assert_eq!(errors("#f in x;"), vec![INVALID_PRIVATE_ID]);
        assert_eq!(errors("class C { #f; m(x) { return a + #f in x; } }"), vec![INVALID_PRIVATE_ID]);
    }

    #[test]
    fn test_private_reference_outside_any_class() {
        assert_eq!(errors("this.#x;"), vec![INVALID_PRIVATE_ID]);
        assert_eq!(errors("function f() { this.#x(); }"), vec![INVALID_PRIVATE_ID]);
    }

    #[test]
    fn test_yield_and_new_target_placement() {
        assert!(errors("function* g() { yield 1; }").is_empty());
        assert_eq!(errors("new.target"), vec![UNEXPECTED_NEW_TARGET]);
        assert!(errors("function f() { return () => new.target; }").is_empty());
    }

    #[test]
    fn test_number_strings() {
        assert_eq!(js_number_string(1.0), "1");
        assert_eq!(js_number_string(0.5), "0.5");
        assert_eq!(js_number_string(1e21), "1e+21");
        assert_eq!(js_number_string(-0.0), "0");
        assert_eq!(js_number_string(1e-7), "1e-7");
    }
}
