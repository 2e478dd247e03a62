use crate::{
    operator::{EvalError, LikeOperator, Operator, OperatorKind, ValueOperator},
    value::{Value, strict_order_cmp},
};
use std::{cmp::Ordering, collections::BTreeMap};

///
/// OperatorContext
///
/// Attribute resolution for one bean type. Implementations must not mutate
/// the bean; an unresolvable attribute is an error, not a null.
///

pub trait OperatorContext<B: ?Sized> {
    fn value(&self, bean: &B, attribute: &str) -> Result<Value, EvalError>;
}

///
/// FieldMapContext
///
/// Context for beans stored as a plain attribute map.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct FieldMapContext;

impl OperatorContext<BTreeMap<String, Value>> for FieldMapContext {
    fn value(&self, bean: &BTreeMap<String, Value>, attribute: &str) -> Result<Value, EvalError> {
        bean.get(attribute)
            .cloned()
            .ok_or_else(|| EvalError::unknown_attribute(attribute))
    }
}

impl Operator {
    /// Evaluate this operator against one bean.
    ///
    /// `And` stops at the first false operand and `Or` at the first true one,
    /// so resolver failures in operands that are never reached do not surface.
    pub fn evaluate<B, C>(&self, context: &C, bean: &B) -> Result<bool, EvalError>
    where
        B: ?Sized,
        C: OperatorContext<B> + ?Sized,
    {
        match self {
            Self::True => Ok(true),
            Self::False => Ok(false),

            Self::And(compound) => {
                for operand in compound.operands() {
                    if !operand.evaluate(context, bean)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Or(compound) => {
                for operand in compound.operands() {
                    if operand.evaluate(context, bean)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::Not(inner) => Ok(!inner.evaluate(context, bean)?),

            Self::EqualTo(op) => {
                let actual = context.value(bean, op.attribute())?;
                Ok(actual.loose_eq(op.value()))
            }
            Self::GreaterThan(op) => eval_order(context, bean, op, OperatorKind::GreaterThan),
            Self::LessThan(op) => eval_order(context, bean, op, OperatorKind::LessThan),
            Self::In(op) => {
                let actual = context.value(bean, op.attribute())?;
                Ok(op.values().iter().any(|value| actual.loose_eq(value)))
            }
            Self::Like(op) => eval_like(context, bean, op),
        }
    }
}

// Ordered comparison; a null attribute value never satisfies it.
fn eval_order<B, C>(
    context: &C,
    bean: &B,
    op: &ValueOperator,
    kind: OperatorKind,
) -> Result<bool, EvalError>
where
    B: ?Sized,
    C: OperatorContext<B> + ?Sized,
{
    let actual = context.value(bean, op.attribute())?;
    if actual.is_null() {
        return Ok(false);
    }

    let ordering =
        strict_order_cmp(&actual, op.value()).ok_or_else(|| EvalError::TypeMismatch {
            operator: kind.name(),
            attribute: op.attribute().to_string(),
            expected: op.value().type_name(),
            found: actual.type_name(),
        })?;

    Ok(match kind {
        OperatorKind::GreaterThan => ordering == Ordering::Greater,
        _ => ordering == Ordering::Less,
    })
}

// Pattern match; null never matches, other non-text values match their
// rendered form.
fn eval_like<B, C>(context: &C, bean: &B, op: &LikeOperator) -> Result<bool, EvalError>
where
    B: ?Sized,
    C: OperatorContext<B> + ?Sized,
{
    let actual = context.value(bean, op.attribute())?;
    if actual.is_null() {
        return Ok(false);
    }

    Ok(match actual.as_text() {
        Some(text) => op.pattern().matches(text),
        None => op.pattern().matches(&actual.to_string()),
    })
}
