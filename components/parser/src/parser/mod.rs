//! Recursive descent parser for JavaScript
//!
//! The parser produces the concrete syntax tree one top-level statement at a
//! time and hands each finished statement to the [`TreeBuilder`], so
//! semantic checks run as soon as a statement is complete.
//!
//! Grammar failures unwind through [`PResult`] to the nearest statement list.
//! In keep-going mode the list reports the error, leaves a placeholder and
//! resynchronises; otherwise the error travels back to the driver.

mod expression;
mod function;
mod statement;

use crate::builder::TreeBuilder;
use crate::config::Config;
use crate::cst::{Ident, Statement};
use crate::error::*;
use crate::lexer::{Comment, Keyword, Lexer, Punctuator, Token, TokenKind, STRICT_RESERVED_WORDS};
use crate::node::Node;
use core_types::{ParseError, SourcePosition, Span};
use tracing::trace;

/// Words that are never identifiers in expression position.
const FUTURE_RESERVED_WORDS: [&str; 6] = [
    "implements",
    "interface",
    "package",
    "private",
    "protected",
    "public",
];

/// What a finished parse hands back to the driver.
pub(crate) struct ParseOutput<'r> {
    /// Root node, if the program parsed
    pub root: Option<Node>,
    /// Every comment in source order
    pub comments: Vec<Comment>,
    /// Builder with the feature set and diagnostic sink
    pub builder: TreeBuilder<'r>,
}

/// Where a statement appears; declarations are restricted in nested positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementContext {
    /// Statement list of the script itself; the only place for `import` and `export`
    TopLevel,
    /// Statement list of a block, function body or case clause
    List,
    /// Body of `if`, loops, `with` and labels
    Nested,
}

/// JavaScript parser
pub(crate) struct Parser<'r> {
    lexer: Lexer,
    /// Token under the cursor
    current: Token,
    /// End offset of the last consumed token
    last_end: usize,
    /// Builds and validates the final tree
    builder: TreeBuilder<'r>,
    config: Config,
    /// Track if we're inside a generator function (for yield expressions)
    in_generator: bool,
    /// Track if we're inside an async function (for await expressions)
    in_async: bool,
    /// Track if we're in for loop init (disallows 'in' as relational operator)
    no_in: bool,
}

impl<'r> Parser<'r> {
    /// Create a new parser for the given source code
    pub(crate) fn new(source: &str, config: Config, builder: TreeBuilder<'r>) -> Self {
        let mut lexer = Lexer::new(source, config.is_strict());
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            last_end: 0,
            builder,
            config,
            in_generator: false,
            in_async: false,
            no_in: false,
        }
    }

    /// Parse the whole source.
    pub(crate) fn parse(mut self) -> ParseOutput<'r> {
        let start = SourcePosition::new(1, 0, 0);
        let mut body = Vec::new();
        let mut failed = false;
        while !self.current.is_eof() {
            let statement_start = self.position();
            match self.parse_statement(StatementContext::TopLevel) {
                Ok(statement) => {
                    self.flush_lexer();
                    body.push(self.builder.build_statement(statement));
                }
                Err(err) => {
                    self.flush_lexer();
                    self.report(&err);
                    if !self.config.keep_going() {
                        failed = true;
                        break;
                    }
                    self.synchronize(true);
                    let placeholder = Statement::Error(Span::between(statement_start, self.last_end));
                    body.push(self.builder.build_statement(placeholder));
                }
            }
        }
        self.flush_lexer();
        let root = if failed {
            None
        } else {
            let span = Span::between(start, self.current.span.end());
            Some(self.builder.finish_script(body, span))
        };
        ParseOutput {
            root,
            comments: self.lexer.take_comments(),
            builder: self.builder,
        }
    }

    /// Parses statements up to a closing brace or the end of input,
    /// recovering from failures in keep-going mode.
    fn parse_statement_list(&mut self) -> PResult<Vec<Statement>> {
        let mut statements = Vec::new();
        while !self.check(Punctuator::RBrace) && !self.current.is_eof() {
            if self.is_case_clause_start() {
                break;
            }
            let start = self.position();
            match self.parse_statement(StatementContext::List) {
                Ok(statement) => statements.push(statement),
                Err(err) if self.config.keep_going() => {
                    self.report(&err);
                    self.synchronize(false);
                    statements.push(Statement::Error(Span::between(start, self.last_end)));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(statements)
    }

    fn is_case_clause_start(&self) -> bool {
        self.check_keyword(Keyword::Case) || self.check_keyword(Keyword::Default)
    }

    /// Skips to a likely statement boundary after an error.
    fn synchronize(&mut self, top_level: bool) {
        let start = self.current.span.offset;
        loop {
            if self.current.is_eof() {
                break;
            }
            if self.check(Punctuator::Semicolon) {
                self.advance();
                break;
            }
            if self.check(Punctuator::RBrace) {
                if top_level || self.current.span.offset == start {
                    self.advance();
                }
                break;
            }
            self.advance();
            if self.current.newline_before && self.starts_statement() {
                break;
            }
        }
        trace!(from = start, to = self.current.span.offset, "resynchronised after syntax error");
    }

    fn starts_statement(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Keyword(
                Keyword::Var
                    | Keyword::Const
                    | Keyword::Function
                    | Keyword::Class
                    | Keyword::If
                    | Keyword::For
                    | Keyword::While
                    | Keyword::Do
                    | Keyword::Return
                    | Keyword::Try
                    | Keyword::Switch
                    | Keyword::Throw
            )
        )
    }

    fn report(&mut self, err: &ParseError) {
        if let ParseError::Syntax { message, position } = err {
            self.builder.error(*position, message.clone());
        }
    }

    /// Moves scanner diagnostics and features into the builder.
    fn flush_lexer(&mut self) {
        for diagnostic in self.lexer.take_diagnostics() {
            self.builder.emit_lexical(diagnostic);
        }
        for (feature, position) in self.lexer.take_features() {
            self.builder.record_feature(feature, position);
        }
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    /// Consumes the current token and returns it.
    fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        let token = std::mem::replace(&mut self.current, next);
        self.last_end = token.span.end();
        token
    }

    /// The token after the current one.
    fn peek_next(&mut self) -> Token {
        let state = self.lexer.save();
        let token = self.lexer.next_token();
        self.lexer.restore(state);
        token
    }

    /// Start position of the current token.
    fn position(&self) -> SourcePosition {
        self.current.start()
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: SourcePosition) -> Span {
        Span::between(start, self.last_end)
    }

    fn check(&self, p: Punctuator) -> bool {
        self.current.is(p)
    }

    fn check_keyword(&self, k: Keyword) -> bool {
        self.current.is_keyword(k)
    }

    /// True for an unescaped contextual keyword such as `of` or `async`.
    fn check_contextual(&self, name: &str) -> bool {
        self.current.is_identifier(name) && !self.current.escaped
    }

    fn eat(&mut self, p: Punctuator) -> bool {
        if self.check(p) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punctuator(&mut self, p: Punctuator) -> PResult<Token> {
        if self.check(p) {
            Ok(self.advance())
        } else {
            Err(expected(p.as_str(), self.position()))
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> PResult<Token> {
        if self.check_keyword(k) {
            Ok(self.advance())
        } else {
            Err(expected(k.as_str(), self.position()))
        }
    }

    /// Consumes a contextual keyword such as `from`.
    fn expect_contextual(&mut self, name: &str) -> PResult<Token> {
        if self.check_contextual(name) {
            Ok(self.advance())
        } else {
            Err(expected(name, self.position()))
        }
    }

    /// Consume a semicolon, implementing Automatic Semicolon Insertion (ASI)
    fn consume_semicolon(&mut self) -> PResult<()> {
        if self.eat(Punctuator::Semicolon) {
            return Ok(());
        }
        if self.current.newline_before || self.check(Punctuator::RBrace) || self.current.is_eof() {
            return Ok(());
        }
        Err(syntax_error(SEMICOLON_EXPECTED, self.position()))
    }

    /// `do ... while (x)` is always followed by an implicit semicolon.
    fn consume_semicolon_do_while(&mut self) {
        self.eat(Punctuator::Semicolon);
    }

    /// Parses an identifier in binding position.
    fn parse_binding_identifier(&mut self) -> PResult<Ident> {
        let token = self.current.clone();
        match &token.kind {
            TokenKind::Identifier(name) => {
                if self.is_reserved_binding_name(name) {
                    return Err(syntax_error(IDENTIFIER_EXPECTED, token.start()));
                }
                let name = name.clone();
                self.advance();
                Ok(Ident {
                    name,
                    span: token.span,
                })
            }
            TokenKind::PrivateName(_) => Err(syntax_error(INVALID_PRIVATE_ID, token.start())),
            _ => Err(syntax_error(IDENTIFIER_EXPECTED, token.start())),
        }
    }

    fn is_reserved_binding_name(&self, name: &str) -> bool {
        if name == "yield" && (self.in_generator || self.config.is_strict()) {
            return true;
        }
        if name == "await" && self.in_async {
            return true;
        }
        self.config.is_strict() && STRICT_RESERVED_WORDS.contains(&name)
    }

    /// Parses an identifier name, where keywords are allowed.
    fn parse_identifier_name(&mut self) -> PResult<Ident> {
        let token = self.current.clone();
        match token.identifier_name() {
            Some(name) => {
                let name = name.to_string();
                self.advance();
                Ok(Ident {
                    name,
                    span: token.span,
                })
            }
            None => match token.kind {
                TokenKind::PrivateName(_) => Err(syntax_error(INVALID_PRIVATE_ID, token.start())),
                _ => Err(syntax_error(IDENTIFIER_EXPECTED, token.start())),
            },
        }
    }

    /// Runs `f` with `in` allowed as a relational operator.
    fn with_in_allowed<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = self.no_in;
        self.no_in = false;
        let result = f(self);
        self.no_in = saved;
        result
    }
}
