//! Expression grammar
//!
//! Binary operators are parsed with an explicit operand/operator stack so
//! that long operator chains cannot exhaust the call stack. Arrow functions
//! are recognised at the primary-expression level: a parenthesized list is
//! parsed as a cover grammar and reinterpreted as parameters when `=>`
//! follows.

use super::{Parser, FUTURE_RESERVED_WORDS};
use crate::cst::*;
use crate::error::*;
use crate::lexer::{Keyword, Punctuator, TokenKind, STRICT_RESERVED_WORDS};
use core_types::{SourcePosition, Span};

const INVALID_PARENTHESIZED: &str = "invalid parenthesized expression";
const NEWLINE_BEFORE_ARROW: &str = "No newline allowed before '=>'";
const MIXED_COALESCE: &str = "Logical OR and logical AND require parentheses when used with '??'";
const YIELD_STAR_ARGUMENT: &str = "yield* requires an expression";

impl<'r> Parser<'r> {
    /// Expression, including the comma operator
    pub(super) fn parse_expression(&mut self) -> PResult<Expression> {
        let first = self.parse_assignment_expression()?;
        if !self.check(Punctuator::Comma) {
            return Ok(first);
        }
        let start = first.span().start();
        let mut expressions = vec![first];
        while self.eat(Punctuator::Comma) {
            expressions.push(self.parse_assignment_expression()?);
        }
        Ok(Expression::Sequence {
            expressions,
            span: self.span_from(start),
        })
    }

    /// AssignmentExpression: yield, arrows, conditionals and assignments
    pub(super) fn parse_assignment_expression(&mut self) -> PResult<Expression> {
        crate::ensure_stack(|| self.parse_assignment_expression_inner())
    }

    fn parse_assignment_expression_inner(&mut self) -> PResult<Expression> {
        if self.in_generator && self.check_contextual("yield") {
            return self.parse_yield_expression();
        }
        let start = self.position();
        let left = self.parse_conditional_expression()?;
        if matches!(&left, Expression::Function(f) if f.kind == FunctionKind::Arrow) {
            return Ok(left);
        }
        let Some(operator) = self.current_assignment_operator() else {
            return Ok(left);
        };
        self.advance();
        let right = self.parse_assignment_expression()?;
        Ok(Expression::Assignment {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            span: self.span_from(start),
        })
    }

    fn current_assignment_operator(&self) -> Option<AssignmentOperator> {
        let TokenKind::Punctuator(p) = self.current.kind else {
            return None;
        };
        let operator = match p {
            Punctuator::Eq => AssignmentOperator::Assign,
            Punctuator::PlusEq => AssignmentOperator::Add,
            Punctuator::MinusEq => AssignmentOperator::Subtract,
            Punctuator::StarEq => AssignmentOperator::Multiply,
            Punctuator::SlashEq => AssignmentOperator::Divide,
            Punctuator::PercentEq => AssignmentOperator::Modulo,
            Punctuator::StarStarEq => AssignmentOperator::Exponent,
            Punctuator::LtLtEq => AssignmentOperator::LeftShift,
            Punctuator::GtGtEq => AssignmentOperator::RightShift,
            Punctuator::GtGtGtEq => AssignmentOperator::UnsignedRightShift,
            Punctuator::AndEq => AssignmentOperator::BitwiseAnd,
            Punctuator::OrEq => AssignmentOperator::BitwiseOr,
            Punctuator::XorEq => AssignmentOperator::BitwiseXor,
            Punctuator::AndAndEq => AssignmentOperator::And,
            Punctuator::OrOrEq => AssignmentOperator::Or,
            Punctuator::NullishCoalesceEq => AssignmentOperator::Coalesce,
            _ => return None,
        };
        Some(operator)
    }

    fn parse_yield_expression(&mut self) -> PResult<Expression> {
        let start = self.position();
        self.advance();
        let mut delegate = false;
        let mut argument = None;
        if !self.current.newline_before {
            if self.eat(Punctuator::Star) {
                delegate = true;
                if !self.starts_yield_operand() {
                    return Err(syntax_error(YIELD_STAR_ARGUMENT, self.position()));
                }
                argument = Some(Box::new(self.parse_assignment_expression()?));
            } else if self.starts_yield_operand() {
                argument = Some(Box::new(self.parse_assignment_expression()?));
            }
        }
        Ok(Expression::Yield {
            argument,
            delegate,
            span: self.span_from(start),
        })
    }

    fn starts_yield_operand(&self) -> bool {
        match &self.current.kind {
            TokenKind::Eof => false,
            TokenKind::Keyword(Keyword::In) => false,
            TokenKind::Punctuator(p) => !matches!(
                p,
                Punctuator::RParen
                    | Punctuator::RBracket
                    | Punctuator::RBrace
                    | Punctuator::Comma
                    | Punctuator::Semicolon
                    | Punctuator::Colon
                    | Punctuator::Question
                    | Punctuator::Arrow
            ),
            _ => true,
        }
    }

    fn parse_conditional_expression(&mut self) -> PResult<Expression> {
        let start = self.position();
        let test = self.parse_binary_expression()?;
        if matches!(&test, Expression::Function(f) if f.kind == FunctionKind::Arrow) {
            return Ok(test);
        }
        if !self.eat(Punctuator::Question) {
            return Ok(test);
        }
        let consequent = self.with_in_allowed(|p| p.parse_assignment_expression())?;
        self.expect_punctuator(Punctuator::Colon)?;
        let alternate = self.parse_assignment_expression()?;
        Ok(Expression::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: self.span_from(start),
        })
    }

    fn current_binary_operator(&self) -> Option<BinaryOperator> {
        let operator = match &self.current.kind {
            TokenKind::Keyword(Keyword::In) if !self.no_in => BinaryOperator::In,
            TokenKind::Keyword(Keyword::Instanceof) => BinaryOperator::Instanceof,
            TokenKind::Punctuator(p) => match p {
                Punctuator::NullishCoalesce => BinaryOperator::Coalesce,
                Punctuator::OrOr => BinaryOperator::Or,
                Punctuator::AndAnd => BinaryOperator::And,
                Punctuator::Or => BinaryOperator::BitwiseOr,
                Punctuator::Xor => BinaryOperator::BitwiseXor,
                Punctuator::And => BinaryOperator::BitwiseAnd,
                Punctuator::EqEq => BinaryOperator::Equal,
                Punctuator::NotEq => BinaryOperator::NotEqual,
                Punctuator::EqEqEq => BinaryOperator::StrictEqual,
                Punctuator::NotEqEq => BinaryOperator::StrictNotEqual,
                Punctuator::Lt => BinaryOperator::Less,
                Punctuator::Gt => BinaryOperator::Greater,
                Punctuator::LtEq => BinaryOperator::LessEqual,
                Punctuator::GtEq => BinaryOperator::GreaterEqual,
                Punctuator::LtLt => BinaryOperator::LeftShift,
                Punctuator::GtGt => BinaryOperator::RightShift,
                Punctuator::GtGtGt => BinaryOperator::UnsignedRightShift,
                Punctuator::Plus => BinaryOperator::Add,
                Punctuator::Minus => BinaryOperator::Subtract,
                Punctuator::Star => BinaryOperator::Multiply,
                Punctuator::Slash => BinaryOperator::Divide,
                Punctuator::Percent => BinaryOperator::Modulo,
                Punctuator::StarStar => BinaryOperator::Exponent,
                _ => return None,
            },
            _ => return None,
        };
        Some(operator)
    }

    /// Binary operators by precedence climbing over explicit stacks.
    fn parse_binary_expression(&mut self) -> PResult<Expression> {
        let first = self.parse_unary_expression()?;
        if matches!(&first, Expression::Function(f) if f.kind == FunctionKind::Arrow) {
            return Ok(first);
        }
        let mut operands = vec![first];
        let mut operators: Vec<(BinaryOperator, SourcePosition)> = Vec::new();

        while let Some(operator) = self.current_binary_operator() {
            let precedence = operator.precedence();
            while let Some(&(top, _)) = operators.last() {
                let reduce = if operator == BinaryOperator::Exponent {
                    top.precedence() > precedence
                } else {
                    top.precedence() >= precedence
                };
                if !reduce {
                    break;
                }
                reduce_binary(&mut operands, &mut operators)?;
            }
            let position = self.position();
            if operator == BinaryOperator::Exponent {
                if let Some(left) = operands.last() {
                    check_exponent_base(left)?;
                }
            }
            self.advance();
            operators.push((operator, position));
            operands.push(self.parse_unary_expression()?);
        }
        while !operators.is_empty() {
            reduce_binary(&mut operands, &mut operators)?;
        }
        operands
            .pop()
            .ok_or_else(|| syntax_error(PRIMARY_EXPRESSION_EXPECTED, self.position()))
    }

    fn parse_unary_expression(&mut self) -> PResult<Expression> {
        crate::ensure_stack(|| self.parse_unary_expression_inner())
    }

    fn parse_unary_expression_inner(&mut self) -> PResult<Expression> {
        let start = self.position();
        let operator = match &self.current.kind {
            TokenKind::Punctuator(Punctuator::Minus) => Some(UnaryOperator::Minus),
            TokenKind::Punctuator(Punctuator::Plus) => Some(UnaryOperator::Plus),
            TokenKind::Punctuator(Punctuator::Bang) => Some(UnaryOperator::Not),
            TokenKind::Punctuator(Punctuator::Tilde) => Some(UnaryOperator::BitwiseNot),
            TokenKind::Keyword(Keyword::Typeof) => Some(UnaryOperator::Typeof),
            TokenKind::Keyword(Keyword::Void) => Some(UnaryOperator::Void),
            TokenKind::Keyword(Keyword::Delete) => Some(UnaryOperator::Delete),
            _ => None,
        };
        if let Some(operator) = operator {
            self.advance();
            let argument = self.parse_unary_expression()?;
            return Ok(Expression::Unary {
                operator,
                argument: Box::new(argument),
                span: self.span_from(start),
            });
        }
        if self.check(Punctuator::PlusPlus) || self.check(Punctuator::MinusMinus) {
            let increment = self.check(Punctuator::PlusPlus);
            self.advance();
            let argument = self.parse_unary_expression()?;
            return Ok(Expression::Update {
                increment,
                postfix: false,
                argument: Box::new(argument),
                span: self.span_from(start),
            });
        }
        if self.is_await_operator() {
            self.advance();
            let argument = self.parse_unary_expression()?;
            return Ok(Expression::Await {
                argument: Box::new(argument),
                span: self.span_from(start),
            });
        }
        self.parse_postfix_expression()
    }

    /// `await` is an operator inside async code, and also where it can only
    /// be read as one so that misplaced uses get a precise diagnostic.
    fn is_await_operator(&mut self) -> bool {
        if !self.check_contextual("await") {
            return false;
        }
        if self.in_async {
            return true;
        }
        let next = self.peek_next();
        if next.newline_before {
            return false;
        }
        match next.kind {
            TokenKind::Identifier(_)
            | TokenKind::Number(_)
            | TokenKind::BigInt(_)
            | TokenKind::String(_)
            | TokenKind::Template(_) => true,
            TokenKind::Keyword(k) => matches!(
                k,
                Keyword::This
                    | Keyword::New
                    | Keyword::Function
                    | Keyword::Class
                    | Keyword::Null
                    | Keyword::True
                    | Keyword::False
                    | Keyword::Typeof
                    | Keyword::Void
                    | Keyword::Delete
                    | Keyword::Super
                    | Keyword::Import
            ),
            TokenKind::Punctuator(p) => matches!(p, Punctuator::Bang | Punctuator::Tilde),
            _ => false,
        }
    }

    fn parse_postfix_expression(&mut self) -> PResult<Expression> {
        let start = self.position();
        let expression = self.parse_lhs_expression()?;
        if !self.current.newline_before
            && (self.check(Punctuator::PlusPlus) || self.check(Punctuator::MinusMinus))
        {
            let increment = self.check(Punctuator::PlusPlus);
            self.advance();
            return Ok(Expression::Update {
                increment,
                postfix: true,
                argument: Box::new(expression),
                span: self.span_from(start),
            });
        }
        Ok(expression)
    }

    /// LeftHandSideExpression: member accesses, calls and `new`
    pub(super) fn parse_lhs_expression(&mut self) -> PResult<Expression> {
        let expression = if self.check_keyword(Keyword::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        if matches!(&expression, Expression::Function(f) if f.kind == FunctionKind::Arrow) {
            return Ok(expression);
        }
        self.parse_suffixes(expression, true)
    }

    fn parse_new_expression(&mut self) -> PResult<Expression> {
        let start = self.position();
        self.advance();
        if self.eat(Punctuator::Dot) {
            if self.check_contextual("target") {
                self.advance();
                return Ok(Expression::NewTarget(self.span_from(start)));
            }
            return Err(expected("target", self.position()));
        }
        let callee = if self.check_keyword(Keyword::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        let callee = self.parse_suffixes(callee, false)?;
        let arguments = if self.check(Punctuator::LParen) {
            Some(self.parse_arguments()?)
        } else {
            None
        };
        Ok(Expression::New {
            callee: Box::new(callee),
            arguments,
            span: self.span_from(start),
        })
    }

    /// Member, call, optional-chain and tagged-template suffixes.
    /// Calls are excluded while parsing the callee of `new`.
    fn parse_suffixes(&mut self, mut expression: Expression, allow_call: bool) -> PResult<Expression> {
        loop {
            let start = expression.span().start();
            match &self.current.kind {
                TokenKind::Punctuator(Punctuator::Dot) => {
                    self.advance();
                    let property = self.parse_member_name()?;
                    let span = property_span(&property);
                    expression = Expression::Member {
                        object: Box::new(expression),
                        property,
                        optional: false,
                        span,
                    };
                }
                TokenKind::Punctuator(Punctuator::OptionalChain) => {
                    if !allow_call {
                        return Err(syntax_error(OPTIONAL_CHAIN_IN_CONSTRUCTION, self.position()));
                    }
                    if matches!(expression, Expression::Super(_)) {
                        return Err(syntax_error(OPTIONAL_CHAIN_ON_SUPER, self.position()));
                    }
                    self.advance();
                    expression = self.parse_optional_suffix(expression, start)?;
                }
                TokenKind::Punctuator(Punctuator::LBracket) => {
                    self.advance();
                    let index = self.with_in_allowed(|p| p.parse_expression())?;
                    self.expect_punctuator(Punctuator::RBracket)?;
                    expression = Expression::Member {
                        object: Box::new(expression),
                        property: MemberProperty::Computed(Box::new(index)),
                        optional: false,
                        span: self.span_from(start),
                    };
                }
                TokenKind::Punctuator(Punctuator::LParen) if allow_call => {
                    let arguments = self.parse_arguments()?;
                    expression = Expression::Call {
                        callee: Box::new(expression),
                        arguments,
                        optional: false,
                        span: self.span_from(start),
                    };
                }
                TokenKind::Template(_) => {
                    if expression.is_optional_chain() {
                        return Err(syntax_error(TEMPLATE_IN_OPTIONAL_CHAIN, self.position()));
                    }
                    let template = self.parse_template()?;
                    expression = Expression::TaggedTemplate {
                        tag: Box::new(expression),
                        template,
                        span: self.span_from(start),
                    };
                }
                _ => return Ok(expression),
            }
        }
    }

    /// What follows `?.`
    fn parse_optional_suffix(
        &mut self,
        expression: Expression,
        start: SourcePosition,
    ) -> PResult<Expression> {
        match &self.current.kind {
            TokenKind::Punctuator(Punctuator::LParen) => {
                let arguments = self.parse_arguments()?;
                Ok(Expression::Call {
                    callee: Box::new(expression),
                    arguments,
                    optional: true,
                    span: self.span_from(start),
                })
            }
            TokenKind::Punctuator(Punctuator::LBracket) => {
                self.advance();
                let index = self.with_in_allowed(|p| p.parse_expression())?;
                self.expect_punctuator(Punctuator::RBracket)?;
                Ok(Expression::Member {
                    object: Box::new(expression),
                    property: MemberProperty::Computed(Box::new(index)),
                    optional: true,
                    span: self.span_from(start),
                })
            }
            TokenKind::Punctuator(Punctuator::LBrace) => {
                Err(syntax_error(BRACE_IN_OPTIONAL_CHAIN, self.position()))
            }
            TokenKind::Template(_) => Err(syntax_error(TEMPLATE_IN_OPTIONAL_CHAIN, self.position())),
            _ => {
                let property = self.parse_member_name()?;
                let span = property_span(&property);
                Ok(Expression::Member {
                    object: Box::new(expression),
                    property,
                    optional: true,
                    span,
                })
            }
        }
    }

    /// Property name after `.` or `?.`; keywords and private names allowed.
    fn parse_member_name(&mut self) -> PResult<MemberProperty> {
        if let TokenKind::PrivateName(name) = &self.current.kind {
            let ident = Ident {
                name: name.clone(),
                span: self.current.span,
            };
            self.advance();
            return Ok(MemberProperty::Private(ident));
        }
        Ok(MemberProperty::Name(self.parse_identifier_name()?))
    }

    /// Argument list of a call or `new`
    pub(super) fn parse_arguments(&mut self) -> PResult<Arguments> {
        let start = self.position();
        self.expect_punctuator(Punctuator::LParen)?;
        let mut items = Vec::new();
        let mut trailing_comma = false;
        while !self.check(Punctuator::RParen) {
            let item_start = self.position();
            let item = if self.eat(Punctuator::Spread) {
                let argument = self.with_in_allowed(|p| p.parse_assignment_expression())?;
                Expression::Spread {
                    argument: Box::new(argument),
                    span: self.span_from(item_start),
                }
            } else {
                self.with_in_allowed(|p| p.parse_assignment_expression())?
            };
            items.push(item);
            if self.check(Punctuator::RParen) {
                break;
            }
            let comma = self.expect_punctuator(Punctuator::Comma)?;
            if self.check(Punctuator::RParen) {
                trailing_comma = true;
                self.note_trailing_comma(comma.start(), TRAILING_COMMA_ARGUMENTS);
            }
        }
        self.expect_punctuator(Punctuator::RParen)?;
        Ok(Arguments {
            items,
            trailing_comma,
            span: self.span_from(start),
        })
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary_expression(&mut self) -> PResult<Expression> {
        let token = self.current.clone();
        let start = token.start();
        match token.kind {
            TokenKind::Identifier(name) => self.parse_identifier_expression(name),
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expression::Number {
                    value,
                    span: token.span,
                })
            }
            TokenKind::BigInt(value) => {
                self.advance();
                Ok(Expression::BigInt {
                    value,
                    span: token.span,
                })
            }
            TokenKind::String(value) => {
                self.advance();
                Ok(Expression::String(StringLit {
                    value,
                    span: token.span,
                }))
            }
            TokenKind::Template(_) => Ok(Expression::Template(self.parse_template()?)),
            TokenKind::Punctuator(Punctuator::Slash | Punctuator::SlashEq) => {
                let slash = self.current.clone();
                self.current = self.lexer.rescan_regex(&slash);
                let token = self.advance();
                match token.kind {
                    TokenKind::RegExp { pattern, flags } => Ok(Expression::RegExp {
                        pattern,
                        flags,
                        span: token.span,
                    }),
                    _ => Err(syntax_error(PRIMARY_EXPRESSION_EXPECTED, start)),
                }
            }
            TokenKind::Punctuator(Punctuator::LParen) => self.parse_parenthesized_or_arrow(start, false),
            TokenKind::Punctuator(Punctuator::LBracket) => self.parse_array_literal(),
            TokenKind::Punctuator(Punctuator::LBrace) => self.parse_object_literal(),
            TokenKind::Keyword(keyword) => self.parse_keyword_expression(keyword, start),
            TokenKind::PrivateName(name) => {
                if self.no_in || !self.peek_next().is_keyword(Keyword::In) {
                    return Err(syntax_error(INVALID_PRIVATE_ID, start));
                }
                self.advance();
                Ok(Expression::PrivateName(Ident {
                    name,
                    span: token.span,
                }))
            }
            _ => Err(syntax_error(PRIMARY_EXPRESSION_EXPECTED, start)),
        }
    }

    fn parse_keyword_expression(
        &mut self,
        keyword: Keyword,
        start: SourcePosition,
    ) -> PResult<Expression> {
        match keyword {
            Keyword::This => {
                let token = self.advance();
                Ok(Expression::This(token.span))
            }
            Keyword::Null => {
                let token = self.advance();
                Ok(Expression::Null(token.span))
            }
            Keyword::True | Keyword::False => {
                let token = self.advance();
                Ok(Expression::Boolean {
                    value: keyword == Keyword::True,
                    span: token.span,
                })
            }
            Keyword::Function => {
                let function = self.parse_function_expression(false, start)?;
                Ok(Expression::Function(Box::new(function)))
            }
            Keyword::Class => {
                let class = self.parse_class(true, true)?;
                Ok(Expression::Class(Box::new(class)))
            }
            Keyword::Super => {
                let token = self.advance();
                let follows = self.check(Punctuator::LParen)
                    || self.check(Punctuator::Dot)
                    || self.check(Punctuator::LBracket)
                    || self.check(Punctuator::OptionalChain);
                if !follows {
                    return Err(expected("(", self.position()));
                }
                Ok(Expression::Super(token.span))
            }
            Keyword::Import => {
                self.advance();
                if self.eat(Punctuator::Dot) {
                    self.expect_contextual("meta")?;
                    return Ok(Expression::ImportMeta(self.span_from(start)));
                }
                self.expect_punctuator(Punctuator::LParen)?;
                let argument = self.with_in_allowed(|p| p.parse_assignment_expression())?;
                self.expect_punctuator(Punctuator::RParen)?;
                Ok(Expression::DynamicImport {
                    argument: Box::new(argument),
                    span: self.span_from(start),
                })
            }
            _ => Err(syntax_error(PRIMARY_EXPRESSION_EXPECTED, start)),
        }
    }

    /// Identifiers, including the arrow and async forms they can begin.
    fn parse_identifier_expression(&mut self, name: String) -> PResult<Expression> {
        let token = self.current.clone();
        let start = token.start();
        let contextual = !token.escaped;

        if contextual && name == "async" {
            let next = self.peek_next();
            if !next.newline_before {
                if next.is_keyword(Keyword::Function) {
                    self.advance();
                    let function = self.parse_function_expression(true, start)?;
                    return Ok(Expression::Function(Box::new(function)));
                }
                if let TokenKind::Identifier(_) = next.kind {
                    self.advance();
                    let saved = self.in_async;
                    self.in_async = true;
                    let param = self.parse_binding_identifier();
                    self.in_async = saved;
                    let param = param?;
                    if !self.check(Punctuator::Arrow) {
                        return Err(expected("=>", self.position()));
                    }
                    let params = Params {
                        span: param.span,
                        items: vec![Expression::Identifier(param)],
                        trailing_comma: false,
                    };
                    return self.parse_arrow_body(params, true, start);
                }
                if next.is(Punctuator::LParen) {
                    return self.parse_async_call_or_arrow(token.span);
                }
            }
        }

        self.check_expression_identifier(&name, start)?;
        self.advance();
        let ident = Ident {
            name,
            span: token.span,
        };
        if self.check(Punctuator::Arrow) {
            if self.current.newline_before {
                return Err(syntax_error(NEWLINE_BEFORE_ARROW, self.position()));
            }
            let params = Params {
                span: ident.span,
                items: vec![Expression::Identifier(ident)],
                trailing_comma: false,
            };
            return self.parse_arrow_body(params, false, start);
        }
        Ok(Expression::Identifier(ident))
    }

    /// Reserved words that may not be read as identifier references.
    fn check_expression_identifier(&self, name: &str, position: SourcePosition) -> PResult<()> {
        let reserved = FUTURE_RESERVED_WORDS.contains(&name)
            || (self.config.is_strict() && STRICT_RESERVED_WORDS.contains(&name))
            || (name == "yield" && self.in_generator);
        if reserved {
            return Err(syntax_error(PRIMARY_EXPRESSION_EXPECTED, position));
        }
        Ok(())
    }

    /// `async(...)` is a call unless `=>` follows the argument list.
    fn parse_async_call_or_arrow(&mut self, async_span: Span) -> PResult<Expression> {
        let start = async_span.start();
        self.advance();
        let saved = self.in_async;
        self.in_async = true;
        let arguments = self.parse_arguments();
        self.in_async = saved;
        let arguments = arguments?;
        if self.check(Punctuator::Arrow) {
            if self.current.newline_before {
                return Err(syntax_error(NEWLINE_BEFORE_ARROW, self.position()));
            }
            let params = Params {
                items: arguments.items,
                trailing_comma: arguments.trailing_comma,
                span: arguments.span,
            };
            return self.parse_arrow_body(params, true, start);
        }
        Ok(Expression::Call {
            callee: Box::new(Expression::Identifier(Ident {
                name: "async".to_string(),
                span: async_span,
            })),
            arguments,
            optional: false,
            span: self.span_from(start),
        })
    }

    /// A parenthesized expression, or the parameter list of an arrow function.
    fn parse_parenthesized_or_arrow(
        &mut self,
        start: SourcePosition,
        is_async: bool,
    ) -> PResult<Expression> {
        self.advance();
        let mut items = Vec::new();
        let mut trailing_comma = None;
        let mut has_spread = false;
        while !self.check(Punctuator::RParen) {
            let item_start = self.position();
            if self.eat(Punctuator::Spread) {
                has_spread = true;
                let argument = self.with_in_allowed(|p| p.parse_assignment_expression())?;
                items.push(Expression::Spread {
                    argument: Box::new(argument),
                    span: self.span_from(item_start),
                });
            } else {
                items.push(self.with_in_allowed(|p| p.parse_assignment_expression())?);
            }
            if self.check(Punctuator::RParen) {
                break;
            }
            let comma = self.expect_punctuator(Punctuator::Comma)?;
            if self.check(Punctuator::RParen) {
                trailing_comma = Some(comma.start());
            }
        }
        self.expect_punctuator(Punctuator::RParen)?;

        if self.check(Punctuator::Arrow) {
            if self.current.newline_before {
                return Err(syntax_error(NEWLINE_BEFORE_ARROW, self.position()));
            }
            if let Some(position) = trailing_comma {
                self.note_trailing_comma(position, TRAILING_COMMA_PARAMS);
            }
            let params = Params {
                items,
                trailing_comma: trailing_comma.is_some(),
                span: self.span_from(start),
            };
            return self.parse_arrow_body(params, is_async, start);
        }

        if items.is_empty() || has_spread || trailing_comma.is_some() {
            return Err(syntax_error(INVALID_PARENTHESIZED, start));
        }
        let expression = if items.len() == 1 {
            items.remove(0)
        } else {
            let first = items[0].span().start();
            let last = items[items.len() - 1].span().end();
            Expression::Sequence {
                expressions: items,
                span: Span::between(first, last),
            }
        };
        Ok(Expression::Paren {
            expression: Box::new(expression),
            span: self.span_from(start),
        })
    }

    /// Body of an arrow function; the cursor is on `=>`.
    fn parse_arrow_body(
        &mut self,
        params: Params,
        is_async: bool,
        start: SourcePosition,
    ) -> PResult<Expression> {
        self.expect_punctuator(Punctuator::Arrow)?;
        let saved_generator = self.in_generator;
        let saved_async = self.in_async;
        self.in_generator = false;
        self.in_async = is_async;
        let body = if self.check(Punctuator::LBrace) {
            self.with_in_allowed(|p| p.parse_block()).map(FunctionBody::Block)
        } else {
            self.parse_assignment_expression()
                .map(|expression| FunctionBody::Expression(Box::new(expression)))
        };
        self.in_generator = saved_generator;
        self.in_async = saved_async;
        Ok(Expression::Function(Box::new(Function {
            name: None,
            params,
            body: body?,
            kind: FunctionKind::Arrow,
            is_async,
            is_generator: false,
            span: self.span_from(start),
        })))
    }

    /// Template literal; the current token is its first piece.
    fn parse_template(&mut self) -> PResult<Template> {
        let start = self.position();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        let mut token = self.advance();
        loop {
            let TokenKind::Template(part) = token.kind else {
                return Err(expected("`", token.start()));
            };
            quasis.push(TemplateElement {
                cooked: part.cooked,
                raw: part.raw,
                problems: part.problems,
                span: token.span,
            });
            if part.tail {
                break;
            }
            expressions.push(self.with_in_allowed(|p| p.parse_expression())?);
            if !self.check(Punctuator::RBrace) {
                return Err(syntax_error(UNCLOSED_SUBSTITUTION, self.position()));
            }
            let brace = self.current.clone();
            self.current = self.lexer.rescan_template_continuation(&brace);
            token = self.advance();
        }
        Ok(Template {
            quasis,
            expressions,
            span: self.span_from(start),
        })
    }

    /// `[ ... ]`, also used for array patterns
    pub(super) fn parse_array_literal(&mut self) -> PResult<Expression> {
        let start = self.position();
        self.advance();
        let mut elements = Vec::new();
        let mut trailing_comma = false;
        loop {
            if self.check(Punctuator::RBracket) {
                break;
            }
            if self.check(Punctuator::Comma) {
                let position = self.position();
                self.advance();
                elements.push(ArrayElement::Hole(Span::empty_at(position)));
                if self.check(Punctuator::RBracket) {
                    trailing_comma = true;
                }
                continue;
            }
            let element_start = self.position();
            if self.eat(Punctuator::Spread) {
                let argument = self.parse_assignment_expression()?;
                elements.push(ArrayElement::Spread {
                    argument,
                    span: self.span_from(element_start),
                });
            } else {
                elements.push(ArrayElement::Expression(self.parse_assignment_expression()?));
            }
            if self.check(Punctuator::RBracket) {
                break;
            }
            self.expect_punctuator(Punctuator::Comma)?;
            if self.check(Punctuator::RBracket) {
                trailing_comma = true;
            }
        }
        self.expect_punctuator(Punctuator::RBracket)?;
        Ok(Expression::Array {
            elements,
            trailing_comma,
            span: self.span_from(start),
        })
    }

    /// `{ ... }`, also used for object patterns
    pub(super) fn parse_object_literal(&mut self) -> PResult<Expression> {
        let start = self.position();
        self.advance();
        let mut properties = Vec::new();
        let mut trailing_comma = false;
        while !self.check(Punctuator::RBrace) {
            properties.push(self.parse_object_property()?);
            if self.check(Punctuator::RBrace) {
                break;
            }
            self.expect_punctuator(Punctuator::Comma)?;
            if self.check(Punctuator::RBrace) {
                trailing_comma = true;
            }
        }
        self.expect_punctuator(Punctuator::RBrace)?;
        Ok(Expression::Object {
            properties,
            trailing_comma,
            span: self.span_from(start),
        })
    }

    fn parse_object_property(&mut self) -> PResult<Property> {
        let start = self.position();
        if self.eat(Punctuator::Spread) {
            let argument = self.parse_assignment_expression()?;
            return Ok(Property::Spread {
                argument,
                span: self.span_from(start),
            });
        }

        let (kind, is_async, is_generator) = self.parse_method_modifiers();
        let key = self.parse_property_key()?;
        if let PropertyKey::Private(ident) = &key {
            return Err(syntax_error(INVALID_PRIVATE_ID, ident.span.start()));
        }

        if self.check(Punctuator::LParen) || kind != FunctionKind::Method || is_async || is_generator {
            let function = self.parse_method(kind, is_async, is_generator)?;
            return Ok(Property::Method {
                key,
                function: Box::new(function),
                span: self.span_from(start),
            });
        }

        if self.eat(Punctuator::Colon) {
            let value = self.parse_assignment_expression()?;
            return Ok(Property::KeyValue {
                key,
                value,
                span: self.span_from(start),
            });
        }

        let PropertyKey::Identifier(name) = key else {
            return Err(expected(":", self.position()));
        };
        let init = if self.eat(Punctuator::Eq) {
            Some(self.with_in_allowed(|p| p.parse_assignment_expression())?)
        } else {
            None
        };
        Ok(Property::Shorthand {
            name,
            init,
            span: self.span_from(start),
        })
    }
}

fn property_span(property: &MemberProperty) -> Span {
    match property {
        MemberProperty::Name(ident) | MemberProperty::Private(ident) => ident.span,
        MemberProperty::Computed(expression) => expression.span(),
    }
}

/// Pops one operator and its operands into a binary node.
fn reduce_binary(
    operands: &mut Vec<Expression>,
    operators: &mut Vec<(BinaryOperator, SourcePosition)>,
) -> PResult<()> {
    let Some((operator, position)) = operators.pop() else {
        return Ok(());
    };
    let (Some(right), Some(left)) = (operands.pop(), operands.pop()) else {
        return Err(syntax_error(PRIMARY_EXPRESSION_EXPECTED, position));
    };
    check_coalesce_mixing(operator, &left, position)?;
    check_coalesce_mixing(operator, &right, position)?;
    let span = Span::between(left.span().start(), right.span().end());
    operands.push(Expression::Binary {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span,
    });
    Ok(())
}

/// `??` cannot be combined with `||` or `&&` without parentheses.
fn check_coalesce_mixing(
    operator: BinaryOperator,
    operand: &Expression,
    position: SourcePosition,
) -> PResult<()> {
    let Expression::Binary { operator: inner, .. } = operand else {
        return Ok(());
    };
    let logical = |op: BinaryOperator| matches!(op, BinaryOperator::Or | BinaryOperator::And);
    let mixed = (operator == BinaryOperator::Coalesce && logical(*inner))
        || (logical(operator) && *inner == BinaryOperator::Coalesce);
    if mixed {
        return Err(syntax_error(MIXED_COALESCE, position));
    }
    Ok(())
}

/// The left side of `**` may not be an unparenthesized unary expression.
fn check_exponent_base(left: &Expression) -> PResult<()> {
    let operator = match left {
        Expression::Unary { operator, .. } => match operator {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::Typeof => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::Delete => "delete",
        },
        Expression::Await { .. } => "await",
        _ => return Ok(()),
    };
    Err(syntax_error(
        format!("Unary operator '{}' requires parentheses before '**'", operator),
        left.span().start(),
    ))
}
