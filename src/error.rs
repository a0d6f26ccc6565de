//! Error types for xtree

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    /// True for spans that carry no source location
    pub const fn is_empty(&self) -> bool {
        self.start.line == 0 && self.end.line == 0
    }
}

/// Coarse error grouping, one per failure family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Input text is not well-formed markup
    Parse,
    /// Markup is well-formed but lacks an element or attribute an operation needs
    Structure,
    /// A CSV record has the wrong shape
    Format,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "parse error"),
            Self::Structure => write!(f, "structure error"),
            Self::Format => write!(f, "format error"),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("invalid token")]
    InvalidToken,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedTag { expected: String, found: String },
    #[error("duplicate attribute: {name}")]
    DuplicateAttribute { name: String },
    #[error("undeclared namespace prefix: {prefix}")]
    UndeclaredPrefix { prefix: String },
    #[error("invalid entity reference: &{entity};")]
    InvalidEntity { entity: String },
    #[error("invalid utf-8")]
    InvalidUtf8,
    #[error("max depth exceeded: {max}")]
    MaxDepthExceeded { max: u16 },
    #[error("max size exceeded: {max}")]
    MaxSizeExceeded { max: usize },
    #[error("<{parent}> has no <{name}> element")]
    MissingElement { parent: String, name: String },
    #[error("<{element}> has no {name} attribute")]
    MissingAttribute { element: String, name: String },
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
    #[error("no product with Id {key:?}")]
    UnmatchedProduct { key: String },
    #[error("record {record}: expected {expected} fields, found {found}")]
    FieldCount {
        record: usize,
        expected: usize,
        found: usize,
    },
}

impl ErrorKind {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidToken
            | Self::UnexpectedEof
            | Self::MismatchedTag { .. }
            | Self::DuplicateAttribute { .. }
            | Self::UndeclaredPrefix { .. }
            | Self::InvalidEntity { .. }
            | Self::InvalidUtf8
            | Self::MaxDepthExceeded { .. }
            | Self::MaxSizeExceeded { .. } => ErrorCategory::Parse,
            Self::MissingElement { .. }
            | Self::MissingAttribute { .. }
            | Self::InvalidValue { .. }
            | Self::UnmatchedProduct { .. } => ErrorCategory::Structure,
            Self::FieldCount { .. } => ErrorCategory::Format,
        }
    }
}

/// Main error type for xtree
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// Errors raised after parsing carry no source location
impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_empty() {
            write!(f, "{}: {}", self.category(), self.message)
        } else {
            write!(
                f,
                "{} at {}: {}",
                self.category(),
                self.span.start,
                self.message
            )
        }
    }
}

/// Result type alias for xtree
pub type Result<T> = std::result::Result<T, Error>;
