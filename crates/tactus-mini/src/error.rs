use crate::span::Span;
use tactus_core::ArithmeticError;
use thiserror::Error;

/// Errors from parsing or compiling mini-notation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("unclosed delimiter '{delimiter}' opened at {open_span}")]
    UnclosedDelimiter { delimiter: char, open_span: Span },
    #[error("{message} at {span}")]
    InvalidArgument { message: String, span: Span },
}

impl ParseError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
        }
    }

    pub fn unclosed_delimiter(delimiter: char, open_span: Span) -> Self {
        ParseError::UnclosedDelimiter {
            delimiter,
            open_span,
        }
    }

    pub fn invalid_argument(message: impl Into<String>, span: Span) -> Self {
        ParseError::InvalidArgument {
            message: message.into(),
            span,
        }
    }

    /// Source location, when one is known.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. } => Some(*span),
            ParseError::UnexpectedEof { .. } => None,
            ParseError::UnclosedDelimiter { open_span, .. } => Some(*open_span),
            ParseError::InvalidArgument { span, .. } => Some(*span),
        }
    }
}

/// Anything that can go wrong between source text and a queryable pattern.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}
