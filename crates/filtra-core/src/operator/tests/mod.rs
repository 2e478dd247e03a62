mod canonical;

use crate::{operator::Operator, value::Value, wildcard::WildcardPattern};
use std::collections::BTreeMap;

// ---- helpers -----------------------------------------------------------

pub(super) fn eq(attribute: &str, value: impl Into<Value>) -> Operator {
    Operator::equal_to(attribute, value).expect("valid equal_to")
}

pub(super) fn gt(attribute: &str, value: impl Into<Value>) -> Operator {
    Operator::greater_than(attribute, value).expect("valid greater_than")
}

pub(super) fn lt(attribute: &str, value: impl Into<Value>) -> Operator {
    Operator::less_than(attribute, value).expect("valid less_than")
}

pub(super) fn like(attribute: &str, pattern: &str) -> Operator {
    let pattern = WildcardPattern::case_sensitive(pattern).expect("valid pattern");
    Operator::like(attribute, pattern).expect("valid like")
}

pub(super) fn like_ci(attribute: &str, pattern: &str) -> Operator {
    let pattern = WildcardPattern::case_insensitive(pattern).expect("valid pattern");
    Operator::like(attribute, pattern).expect("valid like")
}

pub(super) fn and(operands: impl IntoIterator<Item = Operator>) -> Operator {
    Operator::and(operands).expect("non-empty and")
}

pub(super) fn or(operands: impl IntoIterator<Item = Operator>) -> Operator {
    Operator::or(operands).expect("non-empty or")
}

pub(super) fn bean(fields: &[(&str, Value)]) -> BTreeMap<String, Value> {
    fields
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}
