//! Errors reported by the reader.
use smol_str::SmolStr;

use crate::location::{Position, Span};

/// The reason a read failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("unterminated list")]
    UnterminatedList,
    #[error("unmatched closing paren")]
    UnmatchedCloseParen,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid escape sequence")]
    InvalidEscapeSequence,
    #[error("escape is not a valid unicode codepoint")]
    InvalidCodePoint,
    #[error("malformed numeric literal")]
    InvalidNumericLiteral,
    #[error("decimal literal with leading zero")]
    LeadingZeroDecimal,
    #[error("width must be a positive integer")]
    InvalidWidth,
    #[error("integer out of range for word width")]
    IntegerOutOfWidthRange,
    #[error("character code out of range for array width")]
    CodePointExceedsWidth,
    #[error("malformed character literal")]
    InvalidCharLiteral,
    #[error("unknown token")]
    UnknownToken,
    #[error("reserved character `{0}`")]
    ReservedCharacter(char),
    #[error("no whitespace after token")]
    MissingSeparator,
    #[error("`##` is not followed by a value")]
    DanglingDiscard,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("unexpected input after value")]
    TrailingInput,
}

/// A read error, positioned at the first offending character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{filename}:{position}: {kind}")]
pub struct SyntaxError {
    kind: ErrorKind,
    span: Span,
    position: Position,
    filename: SmolStr,
}

impl SyntaxError {
    /// Creates an error for `span` within `source`.
    pub fn new(kind: ErrorKind, span: Span, source: &str) -> Self {
        SyntaxError {
            position: Position::of(source, span.start),
            kind,
            span,
            filename: SmolStr::new_inline(DEFAULT_FILENAME),
        }
    }

    pub(crate) fn with_filename(mut self, filename: &SmolStr) -> Self {
        self.filename = filename.clone();
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// File name used when the caller does not configure one.
pub const DEFAULT_FILENAME: &str = "<string>";

/// Shorthand for a result specialised to syntax errors.
pub type Result<T, E = SyntaxError> = std::result::Result<T, E>;
