//! Error type returned by every fallible operation in this workspace.
//!
//! Mirrors the plain struct-plus-enum error shape used throughout this
//! codebase's runtime crates: a closed `ErrorKind`, a `Cow<'static, str>`
//! message that is almost always a static string literal, and a byte-offset
//! span into the source the error refers to. No `thiserror`, no `anyhow`:
//! construction is explicit and `Display`/`std::error::Error` are hand-written.

use std::borrow::Cow;
use std::fmt;

/// Byte-offset span `(start, end)` into the original input, end-exclusive.
pub type Span = (usize, usize);

/// The closed set of failure categories a reader can report.
///
/// Closed deliberately: callers match exhaustively rather than treating
/// errors as an open string space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A token or delimiter did not fit the grammar at all.
    InvalidSyntax,
    /// Input ended while a form was still open.
    UnexpectedEof,
    /// A list/vector/map/set was opened but never closed.
    UnterminatedCollection,
    /// A closing delimiter did not match the collection it closed.
    UnmatchedDelimiter,
    /// A numeric literal's digits did not fit its classified shape.
    InvalidNumber,
    /// A string literal contained a malformed escape sequence.
    InvalidString,
    /// A character literal used an unknown name or malformed code point.
    InvalidCharacter,
    /// A `#_` discard had no following form to discard.
    InvalidDiscard,
    /// A `#tag` form used a tag with no registered reader and no fallback.
    UnknownTag,
    /// A map literal repeated a key.
    DuplicateKey,
    /// A set literal repeated an element.
    DuplicateElement,
    /// The arena could not satisfy an allocation request.
    OutOfMemory,
    /// Input bytes were not valid UTF-8.
    InvalidUtf8,
}

impl ErrorKind {
    /// Kebab-case name matching the wire vocabulary external tooling expects.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidSyntax => "invalid-syntax",
            ErrorKind::UnexpectedEof => "unexpected-eof",
            ErrorKind::UnterminatedCollection => "unterminated-collection",
            ErrorKind::UnmatchedDelimiter => "unmatched-delimiter",
            ErrorKind::InvalidNumber => "invalid-number",
            ErrorKind::InvalidString => "invalid-string",
            ErrorKind::InvalidCharacter => "invalid-character",
            ErrorKind::InvalidDiscard => "invalid-discard",
            ErrorKind::UnknownTag => "unknown-tag",
            ErrorKind::DuplicateKey => "duplicate-key",
            ErrorKind::DuplicateElement => "duplicate-element",
            ErrorKind::OutOfMemory => "out-of-memory",
            ErrorKind::InvalidUtf8 => "invalid-utf8",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A read failure: category, human-readable message, and the span it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Cow<'static, str>,
    pub span: Span,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>, span: Span) -> Self {
        Error {
            kind,
            message: message.into(),
            span,
        }
    }

    /// Construct with a static message. The common path: no allocation.
    pub fn with_static(kind: ErrorKind, message: &'static str, span: Span) -> Self {
        Error::new(kind, Cow::Borrowed(message), span)
    }

    /// Construct with an owned message, for errors that interpolate input
    /// (e.g. naming an unknown tag).
    pub fn with_owned(kind: ErrorKind, message: String, span: Span) -> Self {
        Error::new(kind, Cow::Owned(message), span)
    }

    pub fn start(&self) -> usize {
        self.span.0
    }

    pub fn end(&self) -> usize {
        self.span.1
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.kind.as_str(),
            self.span.0,
            self.span.1,
            self.message
        )
    }
}

impl std::error::Error for Error {}

/// Result alias used by every fallible operation in this workspace.
pub type ReadResult<T> = Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_as_str_matches_wire_vocabulary() {
        assert_eq!(ErrorKind::InvalidSyntax.as_str(), "invalid-syntax");
        assert_eq!(ErrorKind::DuplicateKey.as_str(), "duplicate-key");
        assert_eq!(ErrorKind::UnknownTag.as_str(), "unknown-tag");
    }

    #[test]
    fn static_message_does_not_allocate_a_new_string() {
        let err = Error::with_static(ErrorKind::UnexpectedEof, "unexpected end of input", (3, 3));
        assert!(matches!(err.message, Cow::Borrowed(_)));
    }

    #[test]
    fn owned_message_round_trips() {
        let err = Error::with_owned(
            ErrorKind::UnknownTag,
            format!("no reader registered for tag '{}'", "my/tag"),
            (0, 8),
        );
        assert_eq!(err.message, "no reader registered for tag 'my/tag'");
        assert_eq!(err.span, (0, 8));
    }

    #[test]
    fn display_includes_kind_span_and_message() {
        let err = Error::with_static(ErrorKind::InvalidNumber, "bad exponent", (10, 14));
        let rendered = err.to_string();
        assert!(rendered.contains("invalid-number"));
        assert!(rendered.contains("10..14"));
        assert!(rendered.contains("bad exponent"));
    }
}
