//! Binding and assignment targets
//!
//! The parser keeps patterns in their expression form. Here they are checked
//! and turned into `ARRAY_PATTERN`/`OBJECT_PATTERN` trees. Binding positions
//! (declarations, parameters, catch) accept only names and nested patterns;
//! assignment positions additionally accept property accesses.

use super::expression::is_simple_target;
use super::TreeBuilder;
use crate::cst::{ArrayElement, AssignmentOperator, Expression, Property, PropertyKey};
use crate::error::*;
use crate::features::Feature;
use crate::node::{Node, NodeKind};
use core_types::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    Binding,
    Assignment,
}

impl<'r> TreeBuilder<'r> {
    /// Declaration names, parameters and catch bindings.
    pub(super) fn lower_binding_target(&mut self, target: Expression) -> Node {
        self.lower_target(target, TargetKind::Binding)
    }

    /// Left side of `=` and of for-in/of heads.
    pub(super) fn lower_assignment_target(&mut self, target: Expression) -> Node {
        self.lower_target(target, TargetKind::Assignment)
    }

    /// Left side of compound assignments: no patterns allowed.
    pub(super) fn lower_simple_target(&mut self, target: Expression) -> Node {
        if !is_simple_target(&target) {
            self.error(target.span().start(), INVALID_ASSIGNMENT_TARGET);
        }
        self.lower_expression(target)
    }

    fn lower_target(&mut self, target: Expression, kind: TargetKind) -> Node {
        crate::ensure_stack(|| self.lower_target_inner(target, kind))
    }

    fn lower_target_inner(&mut self, target: Expression, kind: TargetKind) -> Node {
        match target {
            Expression::Identifier(ident) => self.lower_identifier(ident),
            Expression::Array {
                elements,
                trailing_comma,
                span,
            } => self.lower_array_pattern(elements, trailing_comma, span, kind),
            Expression::Object {
                properties, span, ..
            } => self.lower_object_pattern(properties, span, kind),
            other if kind == TargetKind::Assignment && is_simple_target(&other) => {
                self.lower_expression(other)
            }
            other => {
                self.error(other.span().start(), INVALID_ASSIGNMENT_TARGET);
                self.lower_expression(other)
            }
        }
    }

    /// A target optionally followed by `= default`.
    fn lower_target_with_default(&mut self, target: Expression, kind: TargetKind) -> Node {
        match target {
            Expression::Assignment {
                operator: AssignmentOperator::Assign,
                left,
                right,
                span,
            } => {
                let target = self.lower_target(*left, kind);
                let default = self.lower_expression(*right);
                Node::with_children(NodeKind::DefaultValue, span, vec![target, default])
            }
            other => self.lower_target(other, kind),
        }
    }

    /// The operand of `...` in a pattern; defaults are not allowed there.
    fn lower_rest_target(&mut self, argument: Expression, kind: TargetKind) -> Node {
        if let Expression::Assignment { span, .. } = &argument {
            self.error(span.start(), DEFAULT_AFTER_REST);
        }
        let argument = match argument {
            Expression::Assignment {
                operator: AssignmentOperator::Assign,
                left,
                ..
            } => *left,
            other => other,
        };
        self.lower_target(argument, kind)
    }

    fn lower_array_pattern(
        &mut self,
        elements: Vec<ArrayElement>,
        trailing_comma: bool,
        span: Span,
        kind: TargetKind,
    ) -> Node {
        self.record_feature(Feature::ArrayDestructuring, span.start());
        let mut node = Node::new(NodeKind::ArrayPattern, span);
        let count = elements.len();
        for (index, element) in elements.into_iter().enumerate() {
            let child = match element {
                ArrayElement::Hole(hole) => Node::empty(Span::empty_at(hole.start())),
                ArrayElement::Expression(expression) => self.lower_target_with_default(expression, kind),
                ArrayElement::Spread { argument, span } => {
                    self.record_feature(Feature::ArrayPatternRest, span.start());
                    if index + 1 < count {
                        self.error(span.start(), REST_NOT_LAST);
                    } else if trailing_comma {
                        self.error(span.start(), COMMA_AFTER_REST);
                    }
                    let target = self.lower_rest_target(argument, kind);
                    Node::with_children(NodeKind::IterRest, span, vec![target])
                }
            };
            node.add_child(child);
        }
        node
    }

    fn lower_object_pattern(&mut self, properties: Vec<Property>, span: Span, kind: TargetKind) -> Node {
        self.record_feature(Feature::ObjectDestructuring, span.start());
        let mut node = Node::new(NodeKind::ObjectPattern, span);
        let count = properties.len();
        for (index, property) in properties.into_iter().enumerate() {
            let child = match property {
                Property::KeyValue { key, value, span } => match key {
                    PropertyKey::Computed { expression, .. } => {
                        self.record_feature(Feature::ComputedProperties, span.start());
                        let key = self.lower_expression(*expression);
                        let target = self.lower_target_with_default(value, kind);
                        Node::with_children(NodeKind::ComputedProp, span, vec![key, target])
                    }
                    key => {
                        let mut node = self.string_key(key);
                        node.add_child(self.lower_target_with_default(value, kind));
                        node
                    }
                },
                Property::Shorthand { name, init, span } => {
                    if self.is_reserved_shorthand(&name.name) {
                        self.error(name.span.start(), keyword_not_allowed(&name.name));
                    }
                    let mut key = Node::with_string(NodeKind::StringKey, name.name.clone(), name.span);
                    key.flags.shorthand = true;
                    let mut target = self.lower_identifier(name);
                    if let Some(init) = init {
                        let init = self.lower_expression(init);
                        target = Node::with_children(NodeKind::DefaultValue, span, vec![target, init]);
                    }
                    key.add_child(target);
                    key
                }
                Property::Method { span, .. } => {
                    self.error(span.start(), INVALID_ASSIGNMENT_TARGET);
                    Node::empty(span)
                }
                Property::Spread { argument, span } => {
                    self.record_feature(Feature::ObjectPatternRest, span.start());
                    if index + 1 < count {
                        self.error(span.start(), REST_NOT_LAST);
                    }
                    let nested = matches!(
                        argument,
                        Expression::Array { .. } | Expression::Object { .. }
                    );
                    if nested {
                        self.error(argument.span().start(), INVALID_ASSIGNMENT_TARGET);
                    }
                    let target = self.lower_rest_target(argument, kind);
                    Node::with_children(NodeKind::ObjectRest, span, vec![target])
                }
            };
            node.add_child(child);
        }
        node
    }
}
