//! Parse error types.

use crate::Span;
use thiserror::Error;

/// An error that occurred during parsing.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, Error)]
pub enum ParseErrorKind {
    /// An unexpected token was encountered.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: String,
    },

    /// An unexpected end of file was encountered.
    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: String,
    },

    /// An element was never closed.
    #[error("unclosed tag: <{tag_name}>")]
    UnclosedTag {
        /// The name of the unclosed tag.
        tag_name: String,
    },

    /// A closing tag did not match the open element.
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        /// The expected tag name.
        expected: String,
        /// The found tag name.
        found: String,
    },

    /// The same attribute appeared twice on one tag.
    #[error("duplicate attribute: {name}")]
    DuplicateAttribute {
        /// The name of the duplicated attribute.
        name: String,
    },

    /// A tag name was missing or malformed.
    #[error("invalid tag name: {name}")]
    InvalidTagName {
        /// The invalid tag name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let error = ParseError::new(
            ParseErrorKind::MismatchedClosingTag {
                expected: "div".to_string(),
                found: "span".to_string(),
            },
            Span::new(0u32, 7u32),
        );
        assert_eq!(
            error.to_string(),
            "mismatched closing tag: expected </div>, found </span>"
        );
    }
}
