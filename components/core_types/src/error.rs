//! Parse failure types.
//!
//! Grammar productions return [`ParseError`] to unwind to the nearest
//! recovery point; lexical and semantic problems are reported through the
//! diagnostic sink instead and never unwind.

use thiserror::Error;

use crate::SourcePosition;

/// Why a production could not be completed.
///
/// # Examples
///
/// ```
/// use core_types::{ParseError, SourcePosition};
///
/// let err = ParseError::syntax("';' expected", SourcePosition::new(3, 7, 40));
/// assert_eq!(err.to_string(), "3:7: ';' expected");
/// assert_eq!(err.position().map(|p| p.line), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Unexpected token or malformed production
    #[error("{}:{}: {message}", .position.line, .position.column)]
    Syntax {
        /// Human-readable message, already reported
        message: String,
        /// Where the production failed
        position: SourcePosition,
    },
    /// The parse was abandoned after errors in batch mode
    #[error("parse aborted after {errors} error(s)")]
    Aborted {
        /// Number of distinct errors reported
        errors: usize,
    },
}

impl ParseError {
    /// Builds a syntax error.
    pub fn syntax(message: impl Into<String>, position: SourcePosition) -> Self {
        ParseError::Syntax {
            message: message.into(),
            position,
        }
    }

    /// Builds the standard "'x' expected" error.
    pub fn expected(what: &str, position: SourcePosition) -> Self {
        ParseError::syntax(format!("'{}' expected", what), position)
    }

    /// Position of a syntax error.
    pub fn position(&self) -> Option<SourcePosition> {
        match self {
            ParseError::Syntax { position, .. } => Some(*position),
            ParseError::Aborted { .. } => None,
        }
    }

    /// Message of a syntax error.
    pub fn message(&self) -> Option<&str> {
        match self {
            ParseError::Syntax { message, .. } => Some(message),
            ParseError::Aborted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_message() {
        let err = ParseError::expected(")", SourcePosition::new(1, 3, 3));
        assert_eq!(err.message(), Some("')' expected"));
    }

    #[test]
    fn test_aborted_has_no_position() {
        let err = ParseError::Aborted { errors: 2 };
        assert!(err.position().is_none());
        assert_eq!(err.to_string(), "parse aborted after 2 error(s)");
    }
}
