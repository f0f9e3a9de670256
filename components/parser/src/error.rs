//! Parser error types and helpers
//!
//! Messages shared by the grammar parser and the tree builder live here so
//! that both report identical text.

use crate::lexer::{Token, TokenKind};
use core_types::{ParseError, SourcePosition};

/// Result of a grammar production.
pub type PResult<T> = Result<T, ParseError>;

pub(crate) const IDENTIFIER_EXPECTED: &str = "'identifier' expected";
pub(crate) const PRIMARY_EXPRESSION_EXPECTED: &str = "primary expression expected";
pub(crate) const SEMICOLON_EXPECTED: &str = "Semi-colon expected";
pub(crate) const INVALID_ASSIGNMENT_TARGET: &str = "invalid assignment target";
pub(crate) const INVALID_PRIVATE_ID: &str = "Private identifiers may not be used in this context";
pub(crate) const PRIVATE_FIELD_NOT_DEFINED: &str =
    "Private fields must be declared in an enclosing class";
pub(crate) const PRIVATE_METHOD_NOT_DEFINED: &str =
    "Private methods must be declared in an enclosing class";
pub(crate) const PRIVATE_FIELD_DELETED: &str = "Private fields cannot be deleted";
pub(crate) const UNLABELED_BREAK: &str = "unlabelled break must be inside loop or switch";
pub(crate) const UNEXPECTED_CONTINUE: &str = "continue must be inside loop";
pub(crate) const UNEXPECTED_LABELLED_CONTINUE: &str =
    "continue can only use labels of iteration statements";
pub(crate) const UNEXPECTED_RETURN: &str = "return must be inside function";
pub(crate) const UNEXPECTED_YIELD: &str = "yield must be inside generator function";
pub(crate) const UNEXPECTED_AWAIT: &str = "await must be inside asynchronous function";
pub(crate) const UNEXPECTED_NEW_TARGET: &str = "new.target must be inside a function";
pub(crate) const LEXICAL_DECLARATION_CONTEXT: &str =
    "Lexical declarations are only allowed at top level or inside a block.";
pub(crate) const CONSTRUCTOR_MODIFIERS: &str =
    "Class constructor may not be getter, setter, async, or generator.";
pub(crate) const DUPLICATE_CONSTRUCTOR: &str = "Class may have only one constructor.";
pub(crate) const DEFAULT_VALUE_IN_OBJECT_LITERAL: &str =
    "Default value cannot appear at top level of an object literal.";
pub(crate) const OPTIONAL_CHAIN_IN_CONSTRUCTION: &str =
    "Optional chaining is forbidden in construction contexts.";
pub(crate) const OPTIONAL_CHAIN_ON_SUPER: &str = "Optional chaining is forbidden in super?.";
pub(crate) const UNCLOSED_SUBSTITUTION: &str = "Expected '}' after expression in template literal";
pub(crate) const TEMPLATE_IN_OPTIONAL_CHAIN: &str =
    "template literal cannot be used within optional chaining";
pub(crate) const BRACE_IN_OPTIONAL_CHAIN: &str = "syntax error: { not allowed in optional chain";
pub(crate) const TRAILING_COMMA_PARAMS: &str = "Invalid trailing comma in formal parameter list";
pub(crate) const TRAILING_COMMA_ARGUMENTS: &str = "Invalid trailing comma in arguments list";
pub(crate) const TRAILING_COMMA_ES3: &str =
    "Trailing comma is not legal in an ECMA-262 object initializer";
pub(crate) const REST_NOT_LAST: &str = "A rest parameter must be last in a parameter list.";
pub(crate) const COMMA_AFTER_REST: &str = "A trailing comma must not follow a rest parameter.";
pub(crate) const DEFAULT_AFTER_REST: &str = "A default value cannot be specified after '...'";
pub(crate) const YIELD_IN_PARAMETER_DEFAULT: &str = "`yield` is illegal in parameter default value.";
pub(crate) const AWAIT_IN_PARAMETER_DEFAULT: &str = "`await` is illegal in parameter default value.";
pub(crate) const RESERVED_ES3_IDENTIFIER: &str = "identifier is a reserved word";
pub(crate) const KEYWORD_AS_PROPERTY_ES3: &str = "Keywords and reserved words are not allowed as unquoted property names in older versions of JavaScript. If you are targeting newer versions of JavaScript, set the appropriate language_in option.";

/// Create a syntax error at a given position
pub fn syntax_error(message: impl Into<String>, position: SourcePosition) -> ParseError {
    ParseError::syntax(message, position)
}

/// Create the standard "'x' expected" error
pub fn expected(what: &str, position: SourcePosition) -> ParseError {
    ParseError::expected(what, position)
}

/// Message for a keyword used where a binding name is required.
pub fn keyword_not_allowed(word: &str) -> String {
    format!("cannot use keyword '{}' here.", word)
}

/// Describes a token the way diagnostics quote it.
pub fn describe_token(token: &Token) -> String {
    match &token.kind {
        TokenKind::Identifier(name) => name.clone(),
        TokenKind::PrivateName(name) => format!("#{}", name),
        TokenKind::Keyword(k) => k.as_str().to_string(),
        TokenKind::Punctuator(p) => p.as_str().to_string(),
        TokenKind::Number(n) => n.to_string(),
        TokenKind::BigInt(n) => format!("{}n", n),
        TokenKind::String(s) => format!("'{}'", s),
        TokenKind::Template(_) => "template literal".to_string(),
        TokenKind::RegExp { pattern, flags } => format!("/{}/{}", pattern, flags),
        TokenKind::Eof => "end of input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Punctuator;
    use core_types::Span;

    #[test]
    fn test_syntax_error() {
        let err = syntax_error("test", SourcePosition::new(1, 2, 2));
        assert_eq!(err.message(), Some("test"));
        assert_eq!(err.position().map(|p| p.column), Some(2));
    }

    #[test]
    fn test_expected() {
        let err = expected(")", SourcePosition::default());
        assert_eq!(err.message(), Some("')' expected"));
    }

    #[test]
    fn test_keyword_message() {
        assert_eq!(keyword_not_allowed("class"), "cannot use keyword 'class' here.");
    }

    #[test]
    fn test_describe_token() {
        let token = Token {
            kind: TokenKind::Punctuator(Punctuator::Arrow),
            span: Span::default(),
            newline_before: false,
            escaped: false,
        };
        assert_eq!(describe_token(&token), "=>");
    }
}
