//! Tree builder: lowers the concrete syntax tree into [`Node`]s
//!
//! The builder receives each finished top-level statement from the parser
//! and turns it into the final tree while applying the rules the grammar
//! cannot express: assignment-target legality, label and jump resolution,
//! `return`/`yield`/`await`/`new.target` placement, private-name visibility
//! and parameter-list rules. Every construct also records the language
//! features it uses; a feature newer than the configured mode produces a
//! warning and the node is built regardless.
//!
//! Semantic problems never unwind. They go to the diagnostic sink and the
//! offending node is still produced.

mod expression;
mod function;
mod module;
mod pattern;
mod scope;

use crate::config::Config;
use crate::cst::{
    Block, Expression, ForInit, Statement, SwitchCase, VariableDeclaration, VariableKind,
};
use crate::error::*;
use crate::features::{Feature, FeatureSet};
use crate::lexer::LexDiagnostic;
use crate::node::{Node, NodeKind};
use core_types::{DiagnosticSink, LineMap, SourcePosition, Span};
use scope::{AwaitContext, ScopeStack};
use tracing::trace;

const FOR_IN: &str = "for-in";
const FOR_OF: &str = "for-of";
const FOR_AWAIT_OF: &str = "for-await-of";
const FOR_AWAIT_OUTSIDE_ASYNC: &str = "'for-await-of' used in a non-async function context";
const CONST_WITHOUT_INITIALIZER: &str = "const variables must have an initializer";
const DESTRUCTURING_WITHOUT_INITIALIZER: &str = "destructuring must have an initializer";

/// Builds and validates the final tree.
pub(crate) struct TreeBuilder<'r> {
    /// Everything the configured mode accepts
    allowed: FeatureSet,
    /// Everything seen so far
    features: FeatureSet,
    sink: DiagnosticSink<'r>,
    /// Strict mode reserves `implements`, `let` and friends
    strict: bool,
    line_map: LineMap,
    scopes: ScopeStack,
    /// An import, export or `import.meta` was seen
    is_module: bool,
    /// Top-level `await` uses, legal only in modules
    pending_top_level_await: Vec<(SourcePosition, &'static str)>,
}

impl<'r> TreeBuilder<'r> {
    /// Creates a builder reporting to `sink`.
    pub(crate) fn new(source: &str, config: Config, sink: DiagnosticSink<'r>) -> Self {
        TreeBuilder {
            allowed: FeatureSet::for_mode(config.language_mode),
            features: FeatureSet::new(),
            sink,
            strict: config.is_strict(),
            line_map: LineMap::new(source),
            scopes: ScopeStack::new(),
            is_module: false,
            pending_top_level_await: Vec::new(),
        }
    }

    // ========================================================================
    // Diagnostics and features
    // ========================================================================

    pub(crate) fn error(&mut self, position: SourcePosition, message: impl Into<String>) {
        self.sink.error(position, message);
    }

    pub(crate) fn warning(&mut self, position: SourcePosition, message: impl Into<String>) {
        self.sink.warning(position, message);
    }

    /// Forwards a scanner diagnostic.
    pub(crate) fn emit_lexical(&mut self, diagnostic: LexDiagnostic) {
        self.sink
            .emit(diagnostic.position, diagnostic.message, diagnostic.severity);
    }

    /// Records a feature and warns when the mode does not accept it.
    pub(crate) fn record_feature(&mut self, feature: Feature, position: SourcePosition) {
        if self.features.add(feature) {
            trace!(%feature, line = position.line, "feature recorded");
        }
        if self.allowed.contains(feature) {
            return;
        }
        match feature {
            Feature::TrailingComma => self.warning(position, TRAILING_COMMA_ES3),
            Feature::KeywordsAsProperties => self.warning(position, KEYWORD_AS_PROPERTY_ES3),
            Feature::Es3KeywordsAsIdentifiers => self.error(position, RESERVED_ES3_IDENTIFIER),
            // Reported by the parser with a list-specific message.
            Feature::TrailingCommaInParamList => {}
            _ => self.warning(position, feature.unsupported_message()),
        }
    }

    pub(crate) fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub(crate) fn error_count(&self) -> usize {
        self.sink.error_count()
    }

    /// Gives back the feature set and the sink for the comment pass.
    pub(crate) fn into_parts(self) -> (FeatureSet, DiagnosticSink<'r>) {
        (self.features, self.sink)
    }

    /// A zero-length span at a character offset.
    fn empty_span_at(&self, offset: usize) -> Span {
        Span::empty_at(self.line_map.position(offset))
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Lowers one top-level statement.
    pub(crate) fn build_statement(&mut self, statement: Statement) -> Node {
        if matches!(statement, Statement::Import(_) | Statement::Export(_)) {
            self.is_module = true;
        }
        self.lower_statement(statement)
    }

    /// Wraps the lowered statements in the root node.
    pub(crate) fn finish_script(&mut self, body: Vec<Node>, span: Span) -> Node {
        if self.is_module {
            self.pending_top_level_await.clear();
            let module = Node::with_children(NodeKind::ModuleBody, span, body);
            return Node::with_children(NodeKind::Script, span, vec![module]);
        }
        for (position, message) in std::mem::take(&mut self.pending_top_level_await) {
            self.error(position, message);
        }
        Node::with_children(NodeKind::Script, span, body)
    }

    /// Marks the file as a module.
    fn mark_module(&mut self, position: SourcePosition) {
        self.is_module = true;
        self.record_feature(Feature::Modules, position);
    }

    /// Checks an `await` (or `for await`) against the enclosing function.
    fn check_await(&mut self, position: SourcePosition, message: &'static str) {
        match self.scopes.await_context() {
            AwaitContext::Allowed => {}
            AwaitContext::TopLevel => self.pending_top_level_await.push((position, message)),
            AwaitContext::Denied => self.error(position, message),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn lower_statement(&mut self, statement: Statement) -> Node {
        crate::ensure_stack(|| self.lower_statement_inner(statement))
    }

    fn lower_statement_inner(&mut self, statement: Statement) -> Node {
        match statement {
            Statement::Block(block) => self.lower_block(block, true),
            Statement::Empty(span) | Statement::Error(span) => Node::empty(span),
            Statement::Variable(decl) => self.lower_variable_declaration(decl, None),
            Statement::Expression { expression, span } => {
                let expression = self.lower_expression(expression);
                Node::with_children(NodeKind::ExprResult, span, vec![expression])
            }
            Statement::If {
                test,
                consequent,
                alternate,
                span,
            } => {
                let mut children = vec![self.lower_expression(test), self.lower_body(*consequent)];
                if let Some(alternate) = alternate {
                    children.push(self.lower_body(*alternate));
                }
                Node::with_children(NodeKind::If, span, children)
            }
            Statement::DoWhile { body, test, span } => {
                self.scopes.enter_loop();
                let body = self.lower_body(*body);
                self.scopes.exit_loop();
                let test = self.lower_expression(test);
                Node::with_children(NodeKind::Do, span, vec![body, test])
            }
            Statement::While { test, body, span } => {
                let test = self.lower_expression(test);
                self.scopes.enter_loop();
                let body = self.lower_body(*body);
                self.scopes.exit_loop();
                Node::with_children(NodeKind::While, span, vec![test, body])
            }
            Statement::For {
                init,
                test,
                update,
                body,
                span,
            } => {
                let placeholder = Span::empty_at(span.start());
                let init = match init {
                    Some(ForInit::Variable(decl)) => self.lower_variable_declaration(decl, None),
                    Some(ForInit::Expression(expression)) => self.lower_expression(expression),
                    None => Node::empty(placeholder),
                };
                let test = match test {
                    Some(test) => self.lower_expression(test),
                    None => Node::empty(placeholder),
                };
                let update = match update {
                    Some(update) => self.lower_expression(update),
                    None => Node::empty(placeholder),
                };
                self.scopes.enter_loop();
                let body = self.lower_body(*body);
                self.scopes.exit_loop();
                Node::with_children(NodeKind::For, span, vec![init, test, update, body])
            }
            Statement::ForIn {
                left,
                right,
                body,
                span,
            } => self.lower_for_each(NodeKind::ForIn, left, right, *body, span),
            Statement::ForOf {
                left,
                right,
                body,
                is_await,
                span,
            } => {
                let kind = if is_await {
                    self.record_feature(Feature::ForAwaitOf, span.start());
                    self.check_await(span.start(), FOR_AWAIT_OUTSIDE_ASYNC);
                    NodeKind::ForAwaitOf
                } else {
                    self.record_feature(Feature::ForOf, span.start());
                    NodeKind::ForOf
                };
                self.lower_for_each(kind, left, right, *body, span)
            }
            Statement::Continue { label, span } => {
                let mut node = Node::new(NodeKind::Continue, span);
                match label {
                    Some(label) => {
                        match self.scopes.find_label(&label.name) {
                            None => self.error(label.span.start(), undefined_label(&label.name)),
                            Some(info) if !info.is_iteration => {
                                self.error(span.start(), UNEXPECTED_LABELLED_CONTINUE)
                            }
                            Some(_) => {}
                        }
                        node.add_child(Node::with_string(NodeKind::LabelName, label.name, label.span));
                    }
                    None if !self.scopes.in_loop() => self.error(span.start(), UNEXPECTED_CONTINUE),
                    None => {}
                }
                node
            }
            Statement::Break { label, span } => {
                let mut node = Node::new(NodeKind::Break, span);
                match label {
                    Some(label) => {
                        if self.scopes.find_label(&label.name).is_none() {
                            self.error(label.span.start(), undefined_label(&label.name));
                        }
                        node.add_child(Node::with_string(NodeKind::LabelName, label.name, label.span));
                    }
                    None if !self.scopes.in_breakable() => self.error(span.start(), UNLABELED_BREAK),
                    None => {}
                }
                node
            }
            Statement::Return { argument, span } => {
                if !self.scopes.return_allowed() {
                    self.error(span.start(), UNEXPECTED_RETURN);
                }
                let mut node = Node::new(NodeKind::Return, span);
                if let Some(argument) = argument {
                    node.add_child(self.lower_expression(argument));
                }
                node
            }
            Statement::With { object, body, span } => {
                let object = self.lower_expression(object);
                let body = self.lower_body(*body);
                Node::with_children(NodeKind::With, span, vec![object, body])
            }
            Statement::Switch {
                discriminant,
                cases,
                span,
            } => {
                let mut children = vec![self.lower_expression(discriminant)];
                self.scopes.enter_switch();
                for case in cases {
                    children.push(self.lower_case(case));
                }
                self.scopes.exit_switch();
                Node::with_children(NodeKind::Switch, span, children)
            }
            Statement::Labeled { label, body, span } => {
                let is_iteration = labels_iteration(&body);
                let pushed = self.scopes.push_label(&label.name, is_iteration);
                if !pushed {
                    self.error(label.span.start(), format!("Duplicate label \"{}\"", label.name));
                }
                let body = self.lower_statement(*body);
                if pushed {
                    self.scopes.pop_label(&label.name);
                }
                let name = Node::with_string(NodeKind::LabelName, label.name, label.span);
                Node::with_children(NodeKind::Label, span, vec![name, body])
            }
            Statement::Throw { argument, span } => {
                let argument = self.lower_expression(argument);
                Node::with_children(NodeKind::Throw, span, vec![argument])
            }
            Statement::Try {
                block,
                handler,
                finalizer,
                span,
            } => {
                let block_end = block.span.end();
                let block = self.lower_block(block, true);
                let mut catch_block = Node::new(NodeKind::Block, self.empty_span_at(block_end));
                if let Some(handler) = handler {
                    let param = match handler.param {
                        Some(param) => self.lower_binding_target(param),
                        None => {
                            self.record_feature(Feature::OptionalCatchBinding, handler.span.start());
                            Node::empty(handler.param_gap)
                        }
                    };
                    let body = self.lower_block(handler.body, true);
                    catch_block.span = handler.span;
                    catch_block.add_child(Node::with_children(
                        NodeKind::Catch,
                        handler.span,
                        vec![param, body],
                    ));
                }
                let mut children = vec![block, catch_block];
                if let Some(finalizer) = finalizer {
                    children.push(self.lower_block(finalizer, true));
                }
                Node::with_children(NodeKind::Try, span, children)
            }
            Statement::Debugger(span) => Node::new(NodeKind::Debugger, span),
            Statement::Function(function) => self.lower_function(*function),
            Statement::Class(class) => self.lower_class(*class),
            Statement::Import(import) => self.lower_import(*import),
            Statement::Export(export) => self.lower_export(*export),
        }
    }

    /// A block; `nested` is false for function bodies.
    fn lower_block(&mut self, block: Block, nested: bool) -> Node {
        let statements = self.lower_statement_list(block.body, nested);
        Node::with_children(NodeKind::Block, block.span, statements)
    }

    fn lower_statement_list(&mut self, statements: Vec<Statement>, nested: bool) -> Vec<Node> {
        statements
            .into_iter()
            .map(|statement| {
                if nested {
                    if let Statement::Function(function) = &statement {
                        self.record_feature(Feature::BlockScopedFunctionDeclaration, function.span.start());
                    }
                }
                self.lower_statement(statement)
            })
            .collect()
    }

    /// Loop and `if` bodies are always blocks in the final tree.
    fn lower_body(&mut self, statement: Statement) -> Node {
        match statement {
            Statement::Block(block) => self.lower_block(block, true),
            other => {
                let span = other.span();
                if let Statement::Function(function) = &other {
                    self.record_feature(Feature::BlockScopedFunctionDeclaration, function.span.start());
                }
                let node = self.lower_statement(other);
                Node::with_children(NodeKind::Block, span, vec![node])
            }
        }
    }

    fn lower_case(&mut self, case: SwitchCase) -> Node {
        let body_span = match (case.consequent.first(), case.consequent.last()) {
            (Some(first), Some(last)) => first.span().to(last.span()),
            _ => self.empty_span_at(case.span.end()),
        };
        let statements = self.lower_statement_list(case.consequent, true);
        let body = Node::with_children(NodeKind::Block, body_span, statements);
        match case.test {
            Some(test) => {
                let test = self.lower_expression(test);
                Node::with_children(NodeKind::Case, case.span, vec![test, body])
            }
            None => Node::with_children(NodeKind::DefaultCase, case.span, vec![body]),
        }
    }

    /// `var`/`let`/`const`. `for_head` names the loop when the declaration
    /// is the left side of a for-in/of statement.
    fn lower_variable_declaration(
        &mut self,
        decl: VariableDeclaration,
        for_head: Option<&'static str>,
    ) -> Node {
        let kind = match decl.kind {
            VariableKind::Var => NodeKind::Var,
            VariableKind::Let => {
                self.record_feature(Feature::LetDeclarations, decl.span.start());
                NodeKind::Let
            }
            VariableKind::Const => {
                self.record_feature(Feature::ConstDeclarations, decl.span.start());
                NodeKind::Const
            }
        };
        let mut node = Node::new(kind, decl.span);
        for declarator in decl.declarations {
            let start = declarator.span.start();
            let is_pattern = !matches!(declarator.target, Expression::Identifier(_));
            match (for_head, &declarator.init) {
                (Some(head), Some(_)) => {
                    self.error(start, format!("{} statement may not have initializer", head))
                }
                (None, None) if decl.kind == VariableKind::Const => {
                    self.error(start, CONST_WITHOUT_INITIALIZER)
                }
                (None, None) if is_pattern => self.error(start, DESTRUCTURING_WITHOUT_INITIALIZER),
                _ => {}
            }
            let target = self.lower_binding_target(declarator.target);
            let init = declarator.init.map(|init| self.lower_expression(init));
            let child = if is_pattern {
                let mut children = vec![target];
                children.extend(init);
                Node::with_children(NodeKind::DestructuringLhs, declarator.span, children)
            } else {
                let mut name = target;
                name.span = declarator.span;
                name.children.extend(init);
                name
            };
            node.add_child(child);
        }
        node
    }

    fn lower_for_each(
        &mut self,
        kind: NodeKind,
        left: ForInit,
        right: Expression,
        body: Statement,
        span: Span,
    ) -> Node {
        let head = match kind {
            NodeKind::ForIn => FOR_IN,
            NodeKind::ForOf => FOR_OF,
            _ => FOR_AWAIT_OF,
        };
        let target = match left {
            ForInit::Variable(decl) => {
                if let Some(extra) = decl.declarations.get(1) {
                    self.error(
                        extra.span.start(),
                        format!("{} statement may not have more than one variable declaration", head),
                    );
                }
                self.lower_variable_declaration(decl, Some(head))
            }
            ForInit::Expression(expression) => self.lower_assignment_target(expression),
        };
        let right = self.lower_expression(right);
        self.scopes.enter_loop();
        let body = self.lower_body(body);
        self.scopes.exit_loop();
        Node::with_children(kind, span, vec![target, right, body])
    }
}

fn undefined_label(name: &str) -> String {
    format!("undefined label \"{}\"", name)
}

/// A label targets an iteration statement when, past any further labels,
/// its statement is a loop.
fn labels_iteration(statement: &Statement) -> bool {
    let mut current = statement;
    while let Statement::Labeled { body, .. } = current {
        current = body;
    }
    current.is_iteration()
}
