use bstr::BString;
use thiserror::Error;

/// A fatal parse failure, annotated with the input position at which the
/// scan stopped.
#[derive(Error, Debug, PartialEq)]
#[error("{kind} at {line}:{column}")]
pub struct ParserError {
    pub(crate) kind: ErrorKind,
    /// 1-based line of the last character read.
    pub line: usize,
    /// Number of characters read on `line` when the failure occurred.
    pub column: usize,
}

impl ParserError {
    pub(crate) fn new(kind: ErrorKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    /// The underlying failure.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

/// Every way a parse can fail. None of these are recoverable: the scan aborts
/// at the first one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("cannot unread: already at the beginning of the input")]
    AtBeginning,
    #[error("binary run of {wanted} bytes exceeds the {available} bytes left")]
    TruncatedBinaryRun { wanted: usize, available: usize },
    #[error("unbalanced group close")]
    UnbalancedGroup,
    #[error("keyword encountered during a binary run")]
    KeywordDuringBinaryRun,
    #[error("invalid hex escape \\'{0}")]
    InvalidHexEscape(BString),
    #[error("keyword exceeds 30 characters")]
    KeywordTooLong,
    #[error("keyword parameter exceeds 20 digits")]
    KeywordParamTooLong,
    #[error("invalid keyword parameter '{0}'")]
    InvalidKeywordParam(String),
    #[error("unicode codepoint {0} is outside the 16-bit range")]
    InvalidUnicodeCodepoint(i32),
    #[error("negative binary length {0}")]
    InvalidBinaryLength(i32),
    #[error("\\bin requires a length parameter")]
    MissingBinaryLength,
    #[error("no destination to receive content")]
    NoRoutableDestination,
    #[error("document does not begin with '{{'")]
    NotAnRtfDocument,
    #[error("document ended with open groups")]
    TruncatedDocument,
    #[error("groups nested deeper than {0}")]
    NestingTooDeep(usize),
    #[error("destination error: {0}")]
    Destination(String),
    #[error("deferred task failed: {0}")]
    DeferredTask(String),
}

impl ErrorKind {
    /// Convenience for destinations reporting their own failures.
    pub fn destination(message: impl Into<String>) -> Self {
        Self::Destination(message.into())
    }
}
