use crate::{
    codec::CodecError,
    config::ConfigError,
    operator::{EvalError, OperatorError},
    wildcard::PatternError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error wrapping every per-concern failure, with a stable
/// class and origin for callers that route on kind rather than message.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Operator(#[from] OperatorError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Evaluate(#[from] EvalError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Operator(_) | Self::Pattern(_) | Self::Config(_) => ErrorClass::InvalidInput,
            Self::Evaluate(err) => match err {
                EvalError::UnknownAttribute { .. } => ErrorClass::NotFound,
                EvalError::TypeMismatch { .. } | EvalError::Context { .. } => {
                    ErrorClass::InvalidInput
                }
            },
            Self::Codec(err) => match err {
                CodecError::UnsupportedVersion { .. }
                | CodecError::LengthOverflow { .. }
                | CodecError::DepthExceeded { .. }
                | CodecError::LimitExceeded { .. } => ErrorClass::Unsupported,
                CodecError::Io(_) => ErrorClass::Internal,
                _ => ErrorClass::Corruption,
            },
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Operator(OperatorError::Pattern(_)) | Self::Pattern(_) => ErrorOrigin::Pattern,
            Self::Operator(_) => ErrorOrigin::Operator,
            Self::Evaluate(_) => ErrorOrigin::Evaluate,
            Self::Codec(_) => ErrorOrigin::Codec,
            Self::Config(_) => ErrorOrigin::Config,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidInput,
    NotFound,
    Unsupported,
    Corruption,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
            Self::Corruption => "corruption",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Operator,
    Pattern,
    Evaluate,
    Codec,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Operator => "operator",
            Self::Pattern => "pattern",
            Self::Evaluate => "evaluate",
            Self::Codec => "codec",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
