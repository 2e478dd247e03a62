use crate::wildcard::PatternError;
use thiserror::Error as ThisError;

///
/// OperatorError
/// Construction-time contract violations. Operators are never built in an
/// invalid shape; the offending builder call fails instead.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum OperatorError {
    #[error("{connective} requires at least one operand")]
    EmptyOperands { connective: &'static str },

    #[error("{operator} requires a non-empty attribute name")]
    EmptyAttribute { operator: &'static str },

    #[error("{operator} on '{attribute}' does not accept a null literal")]
    NullLiteral {
        operator: &'static str,
        attribute: String,
    },

    #[error("{operator} on '{attribute}' does not accept a NaN literal")]
    NanLiteral {
        operator: &'static str,
        attribute: String,
    },

    #[error("isIn on '{attribute}' requires at least one value")]
    EmptyValueList { attribute: String },

    #[error("invalid wildcard pattern: {0}")]
    Pattern(#[from] PatternError),
}

///
/// EvalError
/// Failures surfaced while evaluating an operator against one bean.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EvalError {
    #[error("unknown attribute '{attribute}'")]
    UnknownAttribute { attribute: String },

    #[error("{operator} cannot compare '{attribute}' ({found}) with a {expected} literal")]
    TypeMismatch {
        operator: &'static str,
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("failed to resolve '{attribute}': {message}")]
    Context { attribute: String, message: String },
}

impl EvalError {
    pub fn unknown_attribute(attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            attribute: attribute.into(),
        }
    }

    pub fn context(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Context {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}
