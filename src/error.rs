use thiserror::Error;

use crate::parser::ParseError;

/// Errors raised while compiling a parsed expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A property name that the record type does not declare
    #[error("Unknown field '{name}'")]
    UnknownField { name: String },

    /// Operands that cannot be combined, or a constant that does not fit the
    /// field it is compared with
    #[error("Type mismatch: {message}")]
    TypeMismatch { message: String },
}

impl CompileError {
    pub(crate) fn unknown_field(name: &str) -> Self {
        CompileError::UnknownField {
            name: name.to_string(),
        }
    }

    pub(crate) fn mismatch(message: impl Into<String>) -> Self {
        CompileError::TypeMismatch {
            message: message.into(),
        }
    }
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    UnknownField,
    TypeMismatch,
}

/// Any failure between expression text and a compiled filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(ParseError::Lex(_)) => ErrorKind::Lexical,
            Error::Parse(_) => ErrorKind::Syntax,
            Error::Compile(CompileError::UnknownField { .. }) => ErrorKind::UnknownField,
            Error::Compile(CompileError::TypeMismatch { .. }) => ErrorKind::TypeMismatch,
        }
    }
}

impl From<crate::lexer::LexError> for Error {
    fn from(e: crate::lexer::LexError) -> Self {
        Error::Parse(ParseError::Lex(e))
    }
}
