use crate::operator::OperatorError;
use std::io;
use thiserror::Error as ThisError;

///
/// CodecError
/// Operator stream encode/decode failures. Every decode failure is fatal;
/// nothing is skipped or guessed.
///

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("unsupported operator format version: {version}")]
    UnsupportedVersion { version: i32 },

    #[error("unknown operator kind tag: {tag:#04x}")]
    UnknownKind { tag: u8 },

    #[error("unknown value tag: {tag:#04x}")]
    UnknownValueTag { tag: u8 },

    #[error("invalid boolean byte: {byte:#04x}")]
    InvalidBool { byte: u8 },

    #[error("string payload is not valid utf-8")]
    InvalidUtf8,

    #[error("operator nesting exceeds maximum depth of {max}")]
    DepthExceeded { max: usize },

    #[error("{what} of {found} exceeds limit of {max}")]
    LimitExceeded {
        what: &'static str,
        found: usize,
        max: usize,
    },

    #[error("operator stream ended unexpectedly")]
    Truncated,

    #[error("{count} trailing bytes after operator payload")]
    TrailingBytes { count: usize },

    #[error("{what} of {len} does not fit the u32 length prefix")]
    LengthOverflow { what: &'static str, len: usize },

    #[error("decoded operator is invalid: {0}")]
    Invalid(#[from] OperatorError),

    #[error("operator stream i/o failed: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    pub(super) const fn unsupported_version(version: i32) -> Self {
        Self::UnsupportedVersion { version }
    }

    // Short reads are a malformed payload, not a transport failure.
    pub(super) fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Io(err)
        }
    }

    /// True when the failure is a format error rather than transport.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
