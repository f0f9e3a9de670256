//! Statements, declarations and module items

use super::{Parser, StatementContext};
use crate::cst::*;
use crate::error::*;
use crate::lexer::{Keyword, Punctuator, TokenKind};
use core_types::{SourcePosition, Span};

impl<'r> Parser<'r> {
    /// Parse a single statement
    pub(super) fn parse_statement(&mut self, context: StatementContext) -> PResult<Statement> {
        crate::ensure_stack(|| self.parse_statement_inner(context))
    }

    fn parse_statement_inner(&mut self, context: StatementContext) -> PResult<Statement> {
        let start = self.position();
        match &self.current.kind {
            TokenKind::Punctuator(Punctuator::LBrace) => Ok(Statement::Block(self.parse_block()?)),
            TokenKind::Punctuator(Punctuator::Semicolon) => {
                self.advance();
                Ok(Statement::Empty(self.span_from(start)))
            }
            TokenKind::Keyword(Keyword::Var) => {
                let decl = self.parse_variable_declaration(VariableKind::Var)?;
                self.consume_semicolon()?;
                Ok(Statement::Variable(self.with_statement_end(decl, start)))
            }
            TokenKind::Keyword(Keyword::Const) => {
                self.check_declaration_context(context)?;
                let decl = self.parse_variable_declaration(VariableKind::Const)?;
                self.consume_semicolon()?;
                Ok(Statement::Variable(self.with_statement_end(decl, start)))
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::For) => self.parse_for_statement(),
            TokenKind::Keyword(Keyword::While) => self.parse_while_statement(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_while_statement(),
            TokenKind::Keyword(Keyword::Continue) => self.parse_continue_statement(),
            TokenKind::Keyword(Keyword::Break) => self.parse_break_statement(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_statement(),
            TokenKind::Keyword(Keyword::With) => self.parse_with_statement(),
            TokenKind::Keyword(Keyword::Switch) => self.parse_switch_statement(),
            TokenKind::Keyword(Keyword::Throw) => self.parse_throw_statement(),
            TokenKind::Keyword(Keyword::Try) => self.parse_try_statement(),
            TokenKind::Keyword(Keyword::Debugger) => {
                self.advance();
                self.consume_semicolon()?;
                Ok(Statement::Debugger(self.span_from(start)))
            }
            TokenKind::Keyword(Keyword::Function) => {
                let function = self.parse_function_declaration(false, start, false)?;
                Ok(Statement::Function(Box::new(function)))
            }
            TokenKind::Keyword(Keyword::Class) => {
                self.check_declaration_context(context)?;
                let class = self.parse_class(false, false)?;
                Ok(Statement::Class(Box::new(class)))
            }
            TokenKind::Keyword(Keyword::Import) if context == StatementContext::TopLevel => {
                let next = self.peek_next();
                if next.is(Punctuator::LParen) || next.is(Punctuator::Dot) {
                    self.parse_expression_statement()
                } else {
                    Ok(Statement::Import(Box::new(self.parse_import_declaration()?)))
                }
            }
            TokenKind::Keyword(Keyword::Export) if context == StatementContext::TopLevel => {
                Ok(Statement::Export(Box::new(self.parse_export_declaration()?)))
            }
            TokenKind::Identifier(name) if !self.current.escaped => {
                let name = name.clone();
                self.parse_identifier_statement(&name, context)
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Statements that begin with an identifier: `let`, `async function`,
    /// labels, or plain expressions.
    fn parse_identifier_statement(
        &mut self,
        name: &str,
        context: StatementContext,
    ) -> PResult<Statement> {
        let start = self.position();
        let next = self.peek_next();
        if name == "let" && self.is_let_declaration_start(&next) {
            self.check_declaration_context(context)?;
            let decl = self.parse_variable_declaration(VariableKind::Let)?;
            self.consume_semicolon()?;
            return Ok(Statement::Variable(self.with_statement_end(decl, start)));
        }
        if name == "async" && next.is_keyword(Keyword::Function) && !next.newline_before {
            self.check_declaration_context(context)?;
            self.advance();
            let function = self.parse_function_declaration(true, start, false)?;
            return Ok(Statement::Function(Box::new(function)));
        }
        if next.is(Punctuator::Colon) {
            return self.parse_labeled_statement();
        }
        self.parse_expression_statement()
    }

    fn is_let_declaration_start(&self, next: &crate::lexer::Token) -> bool {
        match &next.kind {
            TokenKind::Identifier(name) => !(name == "in" || name == "instanceof" || name == "of"),
            TokenKind::Punctuator(Punctuator::LBracket | Punctuator::LBrace) => true,
            TokenKind::Keyword(_) => !next.newline_before,
            _ => false,
        }
    }

    fn check_declaration_context(&self, context: StatementContext) -> PResult<()> {
        if context == StatementContext::Nested {
            return Err(syntax_error(LEXICAL_DECLARATION_CONTEXT, self.position()));
        }
        Ok(())
    }

    fn with_statement_end(
        &self,
        mut decl: VariableDeclaration,
        start: SourcePosition,
    ) -> VariableDeclaration {
        decl.span = self.span_from(start);
        decl
    }

    /// Parse `{ ... }`
    pub(super) fn parse_block(&mut self) -> PResult<Block> {
        let start = self.position();
        self.expect_punctuator(Punctuator::LBrace)?;
        let body = self.parse_statement_list()?;
        self.expect_punctuator(Punctuator::RBrace)?;
        Ok(Block {
            body,
            span: self.span_from(start),
        })
    }

    /// Parse variable declaration (let, const, var) without the terminator
    pub(super) fn parse_variable_declaration(
        &mut self,
        kind: VariableKind,
    ) -> PResult<VariableDeclaration> {
        let start = self.position();
        self.advance();
        let mut declarations = Vec::new();
        loop {
            let decl_start = self.position();
            let target = self.parse_binding_target()?;
            let init = if self.eat(Punctuator::Eq) {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            declarations.push(VariableDeclarator {
                target,
                init,
                span: self.span_from(decl_start),
            });
            if !self.eat(Punctuator::Comma) {
                break;
            }
        }
        Ok(VariableDeclaration {
            kind,
            declarations,
            span: self.span_from(start),
        })
    }

    /// Parses a binding name or a destructuring pattern in literal form.
    pub(super) fn parse_binding_target(&mut self) -> PResult<Expression> {
        if self.check(Punctuator::LBracket) {
            self.with_in_allowed(|p| p.parse_array_literal())
        } else if self.check(Punctuator::LBrace) {
            self.with_in_allowed(|p| p.parse_object_literal())
        } else {
            Ok(Expression::Identifier(self.parse_binding_identifier()?))
        }
    }

    fn parse_expression_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Statement::Expression {
            expression,
            span: self.span_from(start),
        })
    }

    fn parse_labeled_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        let label = self.parse_binding_identifier()?;
        self.expect_punctuator(Punctuator::Colon)?;
        let body = self.parse_statement(StatementContext::Nested)?;
        Ok(Statement::Labeled {
            label,
            body: Box::new(body),
            span: self.span_from(start),
        })
    }

    fn parse_parenthesized_condition(&mut self) -> PResult<Expression> {
        self.expect_punctuator(Punctuator::LParen)?;
        let test = self.with_in_allowed(|p| p.parse_expression())?;
        self.expect_punctuator(Punctuator::RParen)?;
        Ok(test)
    }

    fn parse_if_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        let test = self.parse_parenthesized_condition()?;
        let consequent = Box::new(self.parse_statement(StatementContext::Nested)?);
        let alternate = if self.check_keyword(Keyword::Else) {
            self.advance();
            Some(Box::new(self.parse_statement(StatementContext::Nested)?))
        } else {
            None
        };
        Ok(Statement::If {
            test,
            consequent,
            alternate,
            span: self.span_from(start),
        })
    }

    fn parse_while_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        let test = self.parse_parenthesized_condition()?;
        let body = Box::new(self.parse_statement(StatementContext::Nested)?);
        Ok(Statement::While {
            test,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_do_while_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        let body = Box::new(self.parse_statement(StatementContext::Nested)?);
        self.expect_keyword(Keyword::While)?;
        let test = self.parse_parenthesized_condition()?;
        self.consume_semicolon_do_while();
        Ok(Statement::DoWhile {
            body,
            test,
            span: self.span_from(start),
        })
    }

    fn parse_for_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        let is_await = self.check_contextual("await");
        if is_await {
            self.advance();
        }
        self.expect_punctuator(Punctuator::LParen)?;

        let saved_no_in = self.no_in;
        self.no_in = true;
        let init = self.parse_for_init();
        self.no_in = saved_no_in;
        let init = init?;

        if let Some(left) = init {
            if !is_await && self.check_keyword(Keyword::In) {
                self.advance();
                let right = self.with_in_allowed(|p| p.parse_expression())?;
                self.expect_punctuator(Punctuator::RParen)?;
                let body = Box::new(self.parse_statement(StatementContext::Nested)?);
                return Ok(Statement::ForIn {
                    left,
                    right,
                    body,
                    span: self.span_from(start),
                });
            }
            if self.check_contextual("of") {
                self.advance();
                let right = self.with_in_allowed(|p| p.parse_assignment_expression())?;
                self.expect_punctuator(Punctuator::RParen)?;
                let body = Box::new(self.parse_statement(StatementContext::Nested)?);
                return Ok(Statement::ForOf {
                    left,
                    right,
                    body,
                    is_await,
                    span: self.span_from(start),
                });
            }
            if is_await {
                return Err(expected("of", self.position()));
            }
            return self.parse_regular_for(Some(left), start);
        }
        if is_await {
            return Err(expected("of", self.position()));
        }
        self.parse_regular_for(None, start)
    }

    fn parse_for_init(&mut self) -> PResult<Option<ForInit>> {
        if self.check(Punctuator::Semicolon) {
            return Ok(None);
        }
        if self.check_keyword(Keyword::Var) {
            return Ok(Some(ForInit::Variable(self.parse_variable_declaration(VariableKind::Var)?)));
        }
        if self.check_keyword(Keyword::Const) {
            return Ok(Some(ForInit::Variable(self.parse_variable_declaration(VariableKind::Const)?)));
        }
        if self.check_contextual("let") {
            let next = self.peek_next();
            if self.is_let_declaration_start(&next) {
                return Ok(Some(ForInit::Variable(self.parse_variable_declaration(VariableKind::Let)?)));
            }
        }
        Ok(Some(ForInit::Expression(self.parse_expression()?)))
    }

    fn parse_regular_for(
        &mut self,
        init: Option<ForInit>,
        start: SourcePosition,
    ) -> PResult<Statement> {
        self.expect_punctuator(Punctuator::Semicolon)?;
        let test = if self.check(Punctuator::Semicolon) {
            None
        } else {
            Some(self.with_in_allowed(|p| p.parse_expression())?)
        };
        self.expect_punctuator(Punctuator::Semicolon)?;
        let update = if self.check(Punctuator::RParen) {
            None
        } else {
            Some(self.with_in_allowed(|p| p.parse_expression())?)
        };
        self.expect_punctuator(Punctuator::RParen)?;
        let body = Box::new(self.parse_statement(StatementContext::Nested)?);
        Ok(Statement::For {
            init,
            test,
            update,
            body,
            span: self.span_from(start),
        })
    }

    /// Optional label after `break`/`continue`; a line break ends the statement.
    fn parse_jump_label(&mut self) -> PResult<Option<Ident>> {
        if self.current.newline_before {
            return Ok(None);
        }
        match self.current.kind {
            TokenKind::Identifier(_) => Ok(Some(self.parse_binding_identifier()?)),
            TokenKind::PrivateName(_) => Err(syntax_error(INVALID_PRIVATE_ID, self.position())),
            _ => Ok(None),
        }
    }

    fn parse_continue_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        let label = self.parse_jump_label()?;
        self.consume_semicolon()?;
        Ok(Statement::Continue {
            label,
            span: self.span_from(start),
        })
    }

    fn parse_break_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        let label = self.parse_jump_label()?;
        self.consume_semicolon()?;
        Ok(Statement::Break {
            label,
            span: self.span_from(start),
        })
    }

    fn parse_return_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        let argument = if self.check(Punctuator::Semicolon)
            || self.check(Punctuator::RBrace)
            || self.current.is_eof()
            || self.current.newline_before
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;
        Ok(Statement::Return {
            argument,
            span: self.span_from(start),
        })
    }

    fn parse_with_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        let object = self.parse_parenthesized_condition()?;
        let body = Box::new(self.parse_statement(StatementContext::Nested)?);
        Ok(Statement::With {
            object,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_switch_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        let discriminant = self.parse_parenthesized_condition()?;
        self.expect_punctuator(Punctuator::LBrace)?;
        let mut cases = Vec::new();
        while !self.check(Punctuator::RBrace) {
            let case_start = self.position();
            let test = if self.check_keyword(Keyword::Case) {
                self.advance();
                Some(self.with_in_allowed(|p| p.parse_expression())?)
            } else if self.check_keyword(Keyword::Default) {
                self.advance();
                None
            } else {
                return Err(expected("}", self.position()));
            };
            self.expect_punctuator(Punctuator::Colon)?;
            let consequent = self.parse_statement_list()?;
            cases.push(SwitchCase {
                test,
                consequent,
                span: self.span_from(case_start),
            });
        }
        self.expect_punctuator(Punctuator::RBrace)?;
        Ok(Statement::Switch {
            discriminant,
            cases,
            span: self.span_from(start),
        })
    }

    fn parse_throw_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        if self.current.newline_before
            || self.check(Punctuator::Semicolon)
            || self.check(Punctuator::RBrace)
            || self.current.is_eof()
        {
            return Err(syntax_error(
                "semicolon/newline not allowed after 'throw'",
                self.position(),
            ));
        }
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Statement::Throw {
            argument,
            span: self.span_from(start),
        })
    }

    fn parse_try_statement(&mut self) -> PResult<Statement> {
        let start = self.position();
        self.advance();
        let block = self.parse_block()?;
        let handler = if self.check_keyword(Keyword::Catch) {
            let catch_start = self.position();
            let keyword = self.advance();
            let gap_start = SourcePosition::new(
                keyword.span.line,
                keyword.span.column + keyword.span.length as u32,
                keyword.span.end(),
            );
            let param_gap = Span::between(gap_start, self.current.span.offset);
            let param = if self.eat(Punctuator::LParen) {
                let target = self.parse_binding_target()?;
                self.expect_punctuator(Punctuator::RParen)?;
                Some(target)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause {
                param,
                param_gap,
                body,
                span: self.span_from(catch_start),
            })
        } else {
            None
        };
        let finalizer = if self.check_keyword(Keyword::Finally) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(expected("catch", self.position()));
        }
        Ok(Statement::Try {
            block,
            handler,
            finalizer,
            span: self.span_from(start),
        })
    }

    // ========================================================================
    // Modules
    // ========================================================================

    fn parse_module_specifier(&mut self) -> PResult<StringLit> {
        let token = self.current.clone();
        match token.kind {
            TokenKind::String(value) => {
                self.advance();
                Ok(StringLit {
                    value,
                    span: token.span,
                })
            }
            _ => Err(syntax_error("'String' expected", token.start())),
        }
    }

    fn parse_module_export_name(&mut self) -> PResult<ModuleExportName> {
        let token = self.current.clone();
        if let TokenKind::String(value) = token.kind {
            self.advance();
            return Ok(ModuleExportName::String(StringLit {
                value,
                span: token.span,
            }));
        }
        Ok(ModuleExportName::Identifier(self.parse_identifier_name()?))
    }

    /// Binding name in an import clause; keywords get a dedicated message.
    fn parse_import_binding(&mut self, keyword_message: bool) -> PResult<Ident> {
        if keyword_message {
            if let TokenKind::Keyword(k) = self.current.kind {
                return Err(syntax_error(keyword_not_allowed(k.as_str()), self.position()));
            }
        }
        self.parse_binding_identifier()
    }

    fn parse_import_declaration(&mut self) -> PResult<ImportDeclaration> {
        let start = self.position();
        self.advance();
        let mut default = None;
        let mut namespace = None;
        let mut named = None;
        let mut namespace_span = Span::empty_at(self.position());
        let mut named_span = Span::empty_at(self.position());

        if let TokenKind::String(_) = self.current.kind {
            let source = self.parse_module_specifier()?;
            self.consume_semicolon()?;
            return Ok(ImportDeclaration {
                default,
                namespace,
                namespace_span,
                named,
                named_span,
                source,
                span: self.span_from(start),
            });
        }

        let mut needs_clause = true;
        if !self.check(Punctuator::Star) && !self.check(Punctuator::LBrace) {
            default = Some(self.parse_import_binding(true)?);
            needs_clause = self.eat(Punctuator::Comma);
        }
        if needs_clause {
            if self.check(Punctuator::Star) {
                let star_start = self.position();
                self.advance();
                self.expect_contextual("as")?;
                namespace = Some(self.parse_import_binding(false)?);
                namespace_span = self.span_from(star_start);
            } else if self.check(Punctuator::LBrace) {
                let brace_start = self.position();
                self.advance();
                let mut specifiers = Vec::new();
                while !self.check(Punctuator::RBrace) {
                    let spec_start = self.position();
                    let imported = self.parse_module_export_name()?;
                    let local = if self.check_contextual("as") {
                        self.advance();
                        Some(self.parse_import_binding(false)?)
                    } else {
                        if let ModuleExportName::Identifier(ident) = &imported {
                            if crate::lexer::Keyword::from_name(&ident.name).is_some()
                                || (self.config.is_strict()
                                    && crate::lexer::STRICT_RESERVED_WORDS
                                        .contains(&ident.name.as_str()))
                            {
                                return Err(syntax_error(
                                    keyword_not_allowed(&ident.name),
                                    ident.span.start(),
                                ));
                            }
                        }
                        None
                    };
                    specifiers.push(ImportSpecifier {
                        imported,
                        local,
                        span: self.span_from(spec_start),
                    });
                    if !self.eat(Punctuator::Comma) {
                        break;
                    }
                }
                self.expect_punctuator(Punctuator::RBrace)?;
                named = Some(specifiers);
                named_span = self.span_from(brace_start);
            } else {
                return Err(expected("{", self.position()));
            }
        }
        self.expect_contextual("from")?;
        let source = self.parse_module_specifier()?;
        self.consume_semicolon()?;
        Ok(ImportDeclaration {
            default,
            namespace,
            namespace_span,
            named,
            named_span,
            source,
            span: self.span_from(start),
        })
    }

    fn parse_export_declaration(&mut self) -> PResult<ExportDeclaration> {
        let start = self.position();
        self.advance();

        if self.check_keyword(Keyword::Default) {
            self.advance();
            let value_start = self.position();
            let value = if self.check_keyword(Keyword::Function) {
                Statement::Function(Box::new(self.parse_function_declaration(
                    false,
                    value_start,
                    true,
                )?))
            } else if self.check_contextual("async")
                && self.peek_next().is_keyword(Keyword::Function)
            {
                self.advance();
                Statement::Function(Box::new(self.parse_function_declaration(
                    true,
                    value_start,
                    true,
                )?))
            } else if self.check_keyword(Keyword::Class) {
                Statement::Class(Box::new(self.parse_class(false, true)?))
            } else {
                let expression = self.parse_assignment_expression()?;
                self.consume_semicolon()?;
                Statement::Expression {
                    expression,
                    span: self.span_from(value_start),
                }
            };
            return Ok(ExportDeclaration::Default {
                value,
                span: self.span_from(start),
            });
        }

        if self.check(Punctuator::Star) {
            self.advance();
            let alias = if self.check_contextual("as") {
                self.advance();
                Some(self.parse_module_export_name()?)
            } else {
                None
            };
            self.expect_contextual("from")?;
            let source = self.parse_module_specifier()?;
            self.consume_semicolon()?;
            return Ok(ExportDeclaration::All {
                alias,
                source,
                span: self.span_from(start),
            });
        }

        if self.check(Punctuator::LBrace) {
            let brace_start = self.position();
            self.advance();
            let mut specifiers = Vec::new();
            while !self.check(Punctuator::RBrace) {
                let spec_start = self.position();
                let local = self.parse_module_export_name()?;
                let exported = if self.check_contextual("as") {
                    self.advance();
                    Some(self.parse_module_export_name()?)
                } else {
                    None
                };
                specifiers.push(ExportSpecifier {
                    local,
                    exported,
                    span: self.span_from(spec_start),
                });
                if !self.eat(Punctuator::Comma) {
                    break;
                }
            }
            self.expect_punctuator(Punctuator::RBrace)?;
            let specifiers_span = self.span_from(brace_start);
            let source = if self.check_contextual("from") {
                self.advance();
                Some(self.parse_module_specifier()?)
            } else {
                None
            };
            if source.is_none() {
                self.check_export_locals(&specifiers)?;
            }
            self.consume_semicolon()?;
            return Ok(ExportDeclaration::Named {
                specifiers,
                specifiers_span,
                source,
                span: self.span_from(start),
            });
        }

        let declaration = match &self.current.kind {
            TokenKind::Keyword(Keyword::Var) | TokenKind::Keyword(Keyword::Const) => {
                self.parse_statement(StatementContext::List)?
            }
            TokenKind::Keyword(Keyword::Function) | TokenKind::Keyword(Keyword::Class) => {
                self.parse_statement(StatementContext::List)?
            }
            TokenKind::Identifier(name) if name == "let" || name == "async" => {
                self.parse_statement(StatementContext::List)?
            }
            _ => return Err(syntax_error("'{' expected", self.position())),
        };
        Ok(ExportDeclaration::Declaration {
            declaration,
            span: self.span_from(start),
        })
    }

    /// Local names of a non-re-exporting `export { ... }` must be bindable.
    fn check_export_locals(&self, specifiers: &[ExportSpecifier]) -> PResult<()> {
        for spec in specifiers {
            let ModuleExportName::Identifier(ident) = &spec.local else {
                return Err(syntax_error(IDENTIFIER_EXPECTED, spec.local.span().start()));
            };
            let reserved = Keyword::from_name(&ident.name).is_some()
                || crate::lexer::STRICT_RESERVED_WORDS.contains(&ident.name.as_str());
            if reserved {
                return Err(syntax_error(
                    keyword_not_allowed(&ident.name),
                    ident.span.start(),
                ));
            }
        }
        Ok(())
    }
}
