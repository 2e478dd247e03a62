//! Operator algebra over attributed records.
//!
//! An [`Operator`] is an immutable boolean filter tree. Every pass over it
//! (evaluation, canonicalization, splitting, encoding) is an exhaustive match
//! over the closed variant set below; rewrites always build new trees.

mod canonical;
mod display;
mod error;
mod eval;
mod split;

#[cfg(test)]
mod tests;

use crate::{value::Value, wildcard::WildcardPattern};
use std::ops::{BitAnd, BitOr};

pub use error::{EvalError, OperatorError};
pub use eval::{FieldMapContext, OperatorContext};

///
/// OperatorKind
///
/// Variant discriminant. The `repr(u8)` tag is the persisted kind byte.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum OperatorKind {
    True = 0x00,
    False = 0x01,
    And = 0x02,
    Or = 0x03,
    Not = 0x04,
    EqualTo = 0x05,
    GreaterThan = 0x06,
    LessThan = 0x07,
    In = 0x08,
    Like = 0x09,
}

impl OperatorKind {
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0x00 => Self::True,
            0x01 => Self::False,
            0x02 => Self::And,
            0x03 => Self::Or,
            0x04 => Self::Not,
            0x05 => Self::EqualTo,
            0x06 => Self::GreaterThan,
            0x07 => Self::LessThan,
            0x08 => Self::In,
            0x09 => Self::Like,
            _ => return None,
        })
    }

    /// Name used in rendered text and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::EqualTo => "equals",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::In => "isIn",
            Self::Like => "matches",
        }
    }
}

///
/// Compound
///
/// Ordered, non-empty operand list shared by `And` and `Or`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Compound {
    operands: Vec<Operator>,
}

impl Compound {
    fn new(kind: OperatorKind, operands: Vec<Operator>) -> Result<Self, OperatorError> {
        if operands.is_empty() {
            return Err(OperatorError::EmptyOperands {
                connective: kind.name(),
            });
        }

        Ok(Self { operands })
    }

    #[must_use]
    pub fn operands(&self) -> &[Operator] {
        &self.operands
    }

    fn into_operands(self) -> Vec<Operator> {
        self.operands
    }
}

///
/// ValueOperator
///
/// Attribute compared against one literal (`EqualTo`, `GreaterThan`,
/// `LessThan`).
///

#[derive(Clone, Debug, PartialEq)]
pub struct ValueOperator {
    attribute: String,
    value: Value,
}

impl ValueOperator {
    fn new(
        kind: OperatorKind,
        attribute: String,
        value: Value,
        allow_null: bool,
    ) -> Result<Self, OperatorError> {
        check_attribute(kind, &attribute)?;
        check_literal(kind, &attribute, &value, allow_null)?;

        Ok(Self { attribute, value })
    }

    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

///
/// InOperator
///
/// Attribute equal to any of a non-empty literal list.
///

#[derive(Clone, Debug, PartialEq)]
pub struct InOperator {
    attribute: String,
    values: Vec<Value>,
}

impl InOperator {
    fn new(attribute: String, values: Vec<Value>) -> Result<Self, OperatorError> {
        check_attribute(OperatorKind::In, &attribute)?;
        if values.is_empty() {
            return Err(OperatorError::EmptyValueList { attribute });
        }
        for value in &values {
            check_literal(OperatorKind::In, &attribute, value, true)?;
        }

        Ok(Self { attribute, values })
    }

    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

///
/// LikeOperator
///
/// Attribute matched against a compiled wildcard pattern.
///

#[derive(Clone, Debug, PartialEq)]
pub struct LikeOperator {
    attribute: String,
    pattern: WildcardPattern,
}

impl LikeOperator {
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[must_use]
    pub const fn pattern(&self) -> &WildcardPattern {
        &self.pattern
    }
}

fn check_attribute(kind: OperatorKind, attribute: &str) -> Result<(), OperatorError> {
    if attribute.is_empty() {
        return Err(OperatorError::EmptyAttribute {
            operator: kind.name(),
        });
    }

    Ok(())
}

fn check_literal(
    kind: OperatorKind,
    attribute: &str,
    value: &Value,
    allow_null: bool,
) -> Result<(), OperatorError> {
    if value.is_null() && !allow_null {
        return Err(OperatorError::NullLiteral {
            operator: kind.name(),
            attribute: attribute.to_string(),
        });
    }
    if value.is_nan() {
        return Err(OperatorError::NanLiteral {
            operator: kind.name(),
            attribute: attribute.to_string(),
        });
    }

    Ok(())
}

///
/// Operator
///

#[derive(Clone, Debug, PartialEq)]
pub enum Operator {
    True,
    False,
    And(Compound),
    Or(Compound),
    Not(Box<Self>),
    EqualTo(ValueOperator),
    GreaterThan(ValueOperator),
    LessThan(ValueOperator),
    In(InOperator),
    Like(LikeOperator),
}

impl Operator {
    pub const TRUE: Self = Self::True;
    pub const FALSE: Self = Self::False;

    pub fn and(operands: impl IntoIterator<Item = Self>) -> Result<Self, OperatorError> {
        Compound::new(OperatorKind::And, operands.into_iter().collect()).map(Self::And)
    }

    pub fn or(operands: impl IntoIterator<Item = Self>) -> Result<Self, OperatorError> {
        Compound::new(OperatorKind::Or, operands.into_iter().collect()).map(Self::Or)
    }

    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(operand: Self) -> Self {
        Self::Not(Box::new(operand))
    }

    /// Equality test; a `Null` literal tests for a null attribute value.
    pub fn equal_to(
        attribute: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, OperatorError> {
        ValueOperator::new(OperatorKind::EqualTo, attribute.into(), value.into(), true)
            .map(Self::EqualTo)
    }

    pub fn greater_than(
        attribute: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, OperatorError> {
        ValueOperator::new(
            OperatorKind::GreaterThan,
            attribute.into(),
            value.into(),
            false,
        )
        .map(Self::GreaterThan)
    }

    pub fn less_than(
        attribute: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, OperatorError> {
        ValueOperator::new(OperatorKind::LessThan, attribute.into(), value.into(), false)
            .map(Self::LessThan)
    }

    pub fn in_<V: Into<Value>>(
        attribute: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, OperatorError> {
        InOperator::new(
            attribute.into(),
            values.into_iter().map(Into::into).collect(),
        )
        .map(Self::In)
    }

    pub fn like(
        attribute: impl Into<String>,
        pattern: WildcardPattern,
    ) -> Result<Self, OperatorError> {
        let attribute = attribute.into();
        check_attribute(OperatorKind::Like, &attribute)?;

        Ok(Self::Like(LikeOperator { attribute, pattern }))
    }

    #[must_use]
    pub const fn kind(&self) -> OperatorKind {
        match self {
            Self::True => OperatorKind::True,
            Self::False => OperatorKind::False,
            Self::And(_) => OperatorKind::And,
            Self::Or(_) => OperatorKind::Or,
            Self::Not(_) => OperatorKind::Not,
            Self::EqualTo(_) => OperatorKind::EqualTo,
            Self::GreaterThan(_) => OperatorKind::GreaterThan,
            Self::LessThan(_) => OperatorKind::LessThan,
            Self::In(_) => OperatorKind::In,
            Self::Like(_) => OperatorKind::Like,
        }
    }

    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_))
    }

    /// Child operators: the list of a compound, the single child of `Not`,
    /// nothing for leaves.
    #[must_use]
    pub fn operands(&self) -> &[Self] {
        match self {
            Self::And(compound) | Self::Or(compound) => compound.operands(),
            Self::Not(inner) => std::slice::from_ref(inner.as_ref()),
            _ => &[],
        }
    }

    #[must_use]
    pub fn operand_count(&self) -> usize {
        self.operands().len()
    }

    /// Attribute a leaf reads, if any.
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::EqualTo(op) | Self::GreaterThan(op) | Self::LessThan(op) => {
                Some(op.attribute())
            }
            Self::In(op) => Some(op.attribute()),
            Self::Like(op) => Some(op.attribute()),
            _ => None,
        }
    }

    /// Single literal of a comparison leaf, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::EqualTo(op) | Self::GreaterThan(op) | Self::LessThan(op) => Some(op.value()),
            _ => None,
        }
    }

    /// Rendered text of the canonical form; two operators are equivalent
    /// under canonicalization iff these strings match.
    #[must_use]
    pub fn canonical_text(&self) -> String {
        self.canonical().to_string()
    }
}

impl BitAnd for Operator {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::And(Compound {
            operands: vec![self, rhs],
        })
    }
}

impl BitAnd for &Operator {
    type Output = Operator;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.clone() & rhs.clone()
    }
}

impl BitOr for Operator {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(Compound {
            operands: vec![self, rhs],
        })
    }
}

impl BitOr for &Operator {
    type Output = Operator;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.clone() | rhs.clone()
    }
}
