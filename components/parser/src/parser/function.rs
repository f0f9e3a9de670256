//! Functions, parameters, methods and classes

use super::Parser;
use crate::config::LanguageMode;
use crate::cst::*;
use crate::error::*;
use crate::features::Feature;
use crate::lexer::{Keyword, Punctuator, Token, TokenKind};
use core_types::SourcePosition;

impl<'r> Parser<'r> {
    /// `function` declaration; the cursor is on the `function` keyword.
    /// `start` is where the declaration began, which is `async` when present.
    pub(super) fn parse_function_declaration(
        &mut self,
        is_async: bool,
        start: SourcePosition,
        allow_anonymous: bool,
    ) -> PResult<Function> {
        self.expect_keyword(Keyword::Function)?;
        let is_generator = self.eat(Punctuator::Star);
        let name = if allow_anonymous && self.check(Punctuator::LParen) {
            None
        } else {
            Some(self.parse_binding_identifier()?)
        };
        let params = self.parse_formal_parameters(is_async, is_generator)?;
        let body = self.parse_function_body(is_async, is_generator)?;
        Ok(Function {
            name,
            params,
            body: FunctionBody::Block(body),
            kind: FunctionKind::Declaration,
            is_async,
            is_generator,
            span: self.span_from(start),
        })
    }

    /// `function` expression; the name, if any, follows the function's own
    /// generator and async rules.
    pub(super) fn parse_function_expression(
        &mut self,
        is_async: bool,
        start: SourcePosition,
    ) -> PResult<Function> {
        self.expect_keyword(Keyword::Function)?;
        let is_generator = self.eat(Punctuator::Star);
        let name = if self.check(Punctuator::LParen) {
            None
        } else {
            let (saved_generator, saved_async) = (self.in_generator, self.in_async);
            self.in_generator = is_generator;
            self.in_async = is_async;
            let name = self.parse_binding_identifier();
            self.in_generator = saved_generator;
            self.in_async = saved_async;
            Some(name?)
        };
        let params = self.parse_formal_parameters(is_async, is_generator)?;
        let body = self.parse_function_body(is_async, is_generator)?;
        Ok(Function {
            name,
            params,
            body: FunctionBody::Block(body),
            kind: FunctionKind::Expression,
            is_async,
            is_generator,
            span: self.span_from(start),
        })
    }

    /// Parameters and body of a method, getter or setter.
    pub(super) fn parse_method(
        &mut self,
        kind: FunctionKind,
        is_async: bool,
        is_generator: bool,
    ) -> PResult<Function> {
        let start = self.position();
        let params = self.parse_formal_parameters(is_async, is_generator)?;
        let body = self.parse_function_body(is_async, is_generator)?;
        Ok(Function {
            name: None,
            params,
            body: FunctionBody::Block(body),
            kind,
            is_async,
            is_generator,
            span: self.span_from(start),
        })
    }

    /// `( params )` of a non-arrow function
    fn parse_formal_parameters(&mut self, is_async: bool, is_generator: bool) -> PResult<Params> {
        let (saved_generator, saved_async) = (self.in_generator, self.in_async);
        self.in_generator = is_generator;
        self.in_async = is_async;
        let params = self.with_in_allowed(|p| p.parse_parameter_list());
        self.in_generator = saved_generator;
        self.in_async = saved_async;
        params
    }

    fn parse_parameter_list(&mut self) -> PResult<Params> {
        let start = self.position();
        self.expect_punctuator(Punctuator::LParen)?;
        let mut items = Vec::new();
        let mut trailing_comma = false;
        while !self.check(Punctuator::RParen) {
            let item_start = self.position();
            if self.eat(Punctuator::Spread) {
                let target = self.parse_binding_target()?;
                if self.check(Punctuator::Eq) {
                    return Err(syntax_error(DEFAULT_AFTER_REST, self.position()));
                }
                items.push(Expression::Spread {
                    argument: Box::new(target),
                    span: self.span_from(item_start),
                });
                if !self.check(Punctuator::Comma) {
                    break;
                }
                let comma = self.advance();
                if self.check(Punctuator::RParen) {
                    return Err(syntax_error(COMMA_AFTER_REST, comma.start()));
                }
                continue;
            }

            let target = self.parse_binding_target()?;
            let item = if self.eat(Punctuator::Eq) {
                let value = self.parse_assignment_expression()?;
                Expression::Assignment {
                    operator: AssignmentOperator::Assign,
                    left: Box::new(target),
                    right: Box::new(value),
                    span: self.span_from(item_start),
                }
            } else {
                target
            };
            items.push(item);

            if self.check(Punctuator::RParen) {
                break;
            }
            let comma = self.expect_punctuator(Punctuator::Comma)?;
            if self.check(Punctuator::Comma) {
                return Err(expected(")", self.position()));
            }
            if self.check(Punctuator::RParen) {
                trailing_comma = true;
                self.note_trailing_comma(comma.start(), TRAILING_COMMA_PARAMS);
            }
        }
        self.expect_punctuator(Punctuator::RParen)?;
        Ok(Params {
            items,
            trailing_comma,
            span: self.span_from(start),
        })
    }

    /// A comma before `)` in parameters or arguments.
    pub(super) fn note_trailing_comma(&mut self, position: SourcePosition, message: &str) {
        self.builder
            .record_feature(Feature::TrailingCommaInParamList, position);
        if self.config.language_mode < LanguageMode::Ecmascript2017 {
            self.builder.error(position, message);
        }
    }

    /// `{ ... }` of a function, parsed with its own yield and await rules.
    pub(super) fn parse_function_body(&mut self, is_async: bool, is_generator: bool) -> PResult<Block> {
        let (saved_generator, saved_async) = (self.in_generator, self.in_async);
        self.in_generator = is_generator;
        self.in_async = is_async;
        let body = self.with_in_allowed(|p| p.parse_block());
        self.in_generator = saved_generator;
        self.in_async = saved_async;
        body
    }

    /// Property name of an object literal or class member.
    pub(super) fn parse_property_key(&mut self) -> PResult<PropertyKey> {
        let token = self.current.clone();
        match token.kind {
            TokenKind::String(value) => {
                self.advance();
                Ok(PropertyKey::String(StringLit {
                    value,
                    span: token.span,
                }))
            }
            TokenKind::Number(value) => {
                self.advance();
                Ok(PropertyKey::Number {
                    value,
                    span: token.span,
                })
            }
            TokenKind::BigInt(value) => {
                self.advance();
                Ok(PropertyKey::BigInt {
                    value,
                    span: token.span,
                })
            }
            TokenKind::PrivateName(name) => {
                self.advance();
                Ok(PropertyKey::Private(Ident {
                    name,
                    span: token.span,
                }))
            }
            TokenKind::Punctuator(Punctuator::LBracket) => {
                let start = token.start();
                self.advance();
                let expression = self.with_in_allowed(|p| p.parse_assignment_expression())?;
                self.expect_punctuator(Punctuator::RBracket)?;
                Ok(PropertyKey::Computed {
                    expression: Box::new(expression),
                    span: self.span_from(start),
                })
            }
            _ => Ok(PropertyKey::Identifier(self.parse_identifier_name()?)),
        }
    }

    /// `async`, `*`, `get` and `set` in front of a property name. A modifier
    /// word directly followed by the end of the name is the name itself.
    pub(super) fn parse_method_modifiers(&mut self) -> (FunctionKind, bool, bool) {
        let mut is_async = false;
        if self.check_contextual("async") {
            let next = self.peek_next();
            if !next.newline_before && !ends_property_name(&next) {
                self.advance();
                is_async = true;
            }
        }
        let is_generator = self.eat(Punctuator::Star);
        let mut kind = FunctionKind::Method;
        if !is_async && !is_generator {
            let accessor = if self.check_contextual("get") {
                Some(FunctionKind::Getter)
            } else if self.check_contextual("set") {
                Some(FunctionKind::Setter)
            } else {
                None
            };
            if let Some(accessor) = accessor {
                let next = self.peek_next();
                if !ends_property_name(&next) {
                    self.advance();
                    kind = accessor;
                }
            }
        }
        (kind, is_async, is_generator)
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// Class declaration or expression; the cursor is on `class`.
    pub(super) fn parse_class(&mut self, is_expression: bool, allow_anonymous: bool) -> PResult<Class> {
        let start = self.position();
        self.expect_keyword(Keyword::Class)?;
        let name = match self.current.kind {
            TokenKind::Identifier(_) => Some(self.parse_binding_identifier()?),
            TokenKind::PrivateName(_) => return Err(syntax_error(INVALID_PRIVATE_ID, self.position())),
            _ if is_expression || allow_anonymous => None,
            _ => return Err(syntax_error(IDENTIFIER_EXPECTED, self.position())),
        };
        let super_class = if self.check_keyword(Keyword::Extends) {
            self.advance();
            Some(self.parse_lhs_expression()?)
        } else {
            None
        };

        let body_start = self.position();
        self.expect_punctuator(Punctuator::LBrace)?;
        let members = self.parse_class_members()?;
        self.expect_punctuator(Punctuator::RBrace)?;
        let body_span = self.span_from(body_start);

        Ok(Class {
            name,
            super_class,
            members,
            body_span,
            span: self.span_from(start),
        })
    }

    fn parse_class_members(&mut self) -> PResult<Vec<ClassMember>> {
        let mut members = Vec::new();
        while !self.check(Punctuator::RBrace) {
            if self.current.is_eof() {
                return Err(expected("}", self.position()));
            }
            if self.eat(Punctuator::Semicolon) {
                continue;
            }
            members.push(self.parse_class_member()?);
        }
        Ok(members)
    }

    fn parse_class_member(&mut self) -> PResult<ClassMember> {
        let start = self.position();
        let mut is_static = false;
        if self.check_contextual("static") {
            let next = self.peek_next();
            if next.is(Punctuator::LBrace) {
                self.advance();
                let block = self.with_in_allowed(|p| p.parse_block())?;
                return Ok(ClassMember::StaticBlock(block));
            }
            if !ends_property_name(&next) {
                self.advance();
                is_static = true;
            }
        }

        let (kind, is_async, is_generator) = self.parse_method_modifiers();
        let key = self.parse_property_key()?;

        if self.check(Punctuator::LParen) {
            let function = self.parse_method(kind, is_async, is_generator)?;
            return Ok(ClassMember::Method {
                key,
                function: Box::new(function),
                is_static,
                span: self.span_from(start),
            });
        }

        if kind != FunctionKind::Method || is_async || is_generator {
            return Err(expected("(", self.position()));
        }
        let value = if self.eat(Punctuator::Eq) {
            Some(self.with_in_allowed(|p| p.parse_assignment_expression())?)
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(ClassMember::Field {
            key,
            value,
            is_static,
            span: self.span_from(start),
        })
    }
}

/// Tokens that end a property name, making a preceding modifier word the name.
fn ends_property_name(token: &Token) -> bool {
    match token.kind {
        TokenKind::Eof => true,
        TokenKind::Punctuator(p) => matches!(
            p,
            Punctuator::LParen
                | Punctuator::Eq
                | Punctuator::Semicolon
                | Punctuator::RBrace
                | Punctuator::Comma
                | Punctuator::Colon
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeBuilder;
    use crate::config::Config;
    use crate::parser::StatementContext;
    use core_types::{CollectingReporter, DiagnosticSink};

    fn parse_stmt(source: &str) -> PResult<Statement> {
        let mut reporter = CollectingReporter::new();
        let sink = DiagnosticSink::new("test.js", &mut reporter);
        let builder = TreeBuilder::new(source, Config::default(), sink);
        let mut parser = Parser::new(source, Config::default(), builder);
        parser.parse_statement(StatementContext::List)
    }

    #[test]
    fn test_rest_parameter_rules() {
        assert!(parse_stmt("function f(...a, b) {}").is_ok());
        assert_eq!(
            parse_stmt("function f(...a,) {}").unwrap_err().message(),
            Some(COMMA_AFTER_REST)
        );
        assert_eq!(
            parse_stmt("function f(...a = 1) {}").unwrap_err().message(),
            Some(DEFAULT_AFTER_REST)
        );
    }

    #[test]
    fn test_double_comma_in_parameters() {
        assert_eq!(
            parse_stmt("function f(a,,) {}").unwrap_err().message(),
            Some("')' expected")
        );
    }

    #[test]
    fn test_class_members() {
        let Statement::Class(class) =
            parse_stmt("class C { static x = 1; get y() {} static { } async *z() {} #p; }").unwrap()
        else {
            panic!("expected class");
        };
        assert_eq!(class.members.len(), 5);
        assert!(matches!(class.members[0], ClassMember::Field { is_static: true, .. }));
        assert!(matches!(
            &class.members[1],
            ClassMember::Method { function, .. } if function.kind == FunctionKind::Getter
        ));
        assert!(matches!(class.members[2], ClassMember::StaticBlock(_)));
        assert!(matches!(
            &class.members[3],
            ClassMember::Method { function, .. } if function.is_async && function.is_generator
        ));
        assert!(matches!(
            &class.members[4],
            ClassMember::Field { key: PropertyKey::Private(_), .. }
        ));
    }

    #[test]
    fn test_modifier_words_as_names() {
        let Statement::Class(class) = parse_stmt("class C { static() {} get = 1; async }").unwrap()
        else {
            panic!("expected class");
        };
        assert_eq!(class.members.len(), 3);
        assert!(matches!(class.members[0], ClassMember::Method { is_static: false, .. }));
    }

    #[test]
    fn test_constructor_members_parse() {
        assert!(parse_stmt("class C { get constructor() {} }").is_ok());
        assert!(parse_stmt("class C { constructor() {} constructor() {} }").is_ok());
    }
}
