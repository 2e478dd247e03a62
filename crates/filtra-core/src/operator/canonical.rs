use crate::{
    combination::Combinations,
    obs::LOG_TARGET,
    operator::{Compound, InOperator, LikeOperator, Operator, ValueOperator},
    value::{Value, canonical_cmp},
};
use std::{cmp::Ordering, collections::BTreeMap};
use tracing::debug;

impl Operator {
    ///
    /// Rewrite this operator into the canonical representative of its
    /// equivalence class.
    ///
    /// Canonical guarantees:
    /// - logical equivalence is preserved
    /// - nested AND / OR nodes are flattened
    /// - identity and absorbing constants are folded away
    /// - duplicate operands collapse; operands are ordered by rendered text
    /// - negation is pushed down to leaves (double negation eliminated)
    /// - AND distributes over OR, so compound results are in DNF
    /// - canonicalizing a canonical operator returns identical text
    ///
    #[must_use]
    pub fn canonical(&self) -> Self {
        canonicalize(self)
    }
}

fn canonicalize(operator: &Operator) -> Operator {
    match operator {
        Operator::True
        | Operator::False
        | Operator::EqualTo(_)
        | Operator::GreaterThan(_)
        | Operator::LessThan(_) => operator.clone(),

        Operator::And(compound) => collect_and(compound.operands().iter().map(canonicalize)),
        Operator::Or(compound) => collect_or(compound.operands().iter().map(canonicalize)),
        Operator::Not(inner) => negate(canonicalize(inner)),

        Operator::In(op) => canonical_in(op),
        Operator::Like(op) => canonical_like(op),
    }
}

///
/// TermSet
///
/// Deduplicated operand set keyed by rendered text, which is also the
/// canonical operand order.
///

#[derive(Default)]
struct TermSet {
    terms: BTreeMap<String, Operator>,
}

impl TermSet {
    fn insert(&mut self, term: Operator) {
        self.terms.entry(term.to_string()).or_insert(term);
    }

    fn into_sorted(self) -> Vec<Operator> {
        self.terms.into_values().collect()
    }
}

///
/// Combine already-canonical conjuncts.
///
/// Rules:
/// - AND(False, x)       → False
/// - AND(True, x)        → x
/// - AND(AND(a, b), c)   → AND(a, b, c)
/// - AND(x, x)           → x
/// - AND(OR(a, b), c)    → OR(AND(a, c), AND(b, c))
///
fn collect_and(terms: impl IntoIterator<Item = Operator>) -> Operator {
    let mut conjuncts = TermSet::default();
    let mut or_groups: Vec<Vec<Operator>> = Vec::new();

    for term in terms {
        match term {
            Operator::False => return Operator::False,
            Operator::True => {}
            Operator::And(inner) => {
                for conjunct in inner.into_operands() {
                    match conjunct {
                        Operator::False => return Operator::False,
                        Operator::True => {}
                        other => conjuncts.insert(other),
                    }
                }
            }
            Operator::Or(group) => or_groups.push(group.into_operands()),
            other => conjuncts.insert(other),
        }
    }

    if or_groups.is_empty() {
        return join(conjuncts.into_sorted(), Operator::True, Operator::And);
    }

    distribute(conjuncts, or_groups)
}

// Each plain conjunct becomes a singleton group; every pick across the
// groups is one AND term of the resulting disjunction.
fn distribute(conjuncts: TermSet, mut groups: Vec<Vec<Operator>>) -> Operator {
    groups.extend(conjuncts.into_sorted().into_iter().map(|term| vec![term]));

    let combinations = Combinations::new(&groups);
    debug!(
        target: LOG_TARGET,
        shape = %combinations.shape(),
        terms = combinations.total(),
        "distributing conjunction over disjunction"
    );

    // picks never contain an OR (canonical OR operands are not OR), so
    // collect_and does not recurse back into distribution
    collect_or(combinations.map(collect_and))
}

///
/// Combine already-canonical disjuncts.
///
/// Rules:
/// - OR(True, x)        → True
/// - OR(False, x)       → x
/// - OR(OR(a, b), c)    → OR(a, b, c)
/// - OR(x, x)           → x
///
fn collect_or(terms: impl IntoIterator<Item = Operator>) -> Operator {
    let mut disjuncts = TermSet::default();

    for term in terms {
        match term {
            Operator::True => return Operator::True,
            Operator::False => {}
            Operator::Or(inner) => {
                for disjunct in inner.into_operands() {
                    match disjunct {
                        Operator::True => return Operator::True,
                        Operator::False => {}
                        other => disjuncts.insert(other),
                    }
                }
            }
            other => disjuncts.insert(other),
        }
    }

    join(disjuncts.into_sorted(), Operator::False, Operator::Or)
}

// Zero terms → identity, one term → unwrapped, otherwise wrapped.
fn join(
    mut terms: Vec<Operator>,
    identity: Operator,
    wrap: impl FnOnce(Compound) -> Operator,
) -> Operator {
    match terms.len() {
        0 => identity,
        1 => terms.pop().unwrap_or(identity),
        _ => wrap(Compound { operands: terms }),
    }
}

///
/// Negate an already-canonical operator.
///
/// Rules:
/// - NOT True          → False
/// - NOT NOT x         → x
/// - NOT AND(a, b)     → OR(NOT a, NOT b)
/// - NOT OR(a, b)      → AND(NOT a, NOT b), distributed
///
fn negate(operator: Operator) -> Operator {
    match operator {
        Operator::True => Operator::False,
        Operator::False => Operator::True,
        Operator::Not(inner) => *inner,
        Operator::And(compound) => collect_or(compound.into_operands().into_iter().map(negate)),
        Operator::Or(compound) => collect_and(compound.into_operands().into_iter().map(negate)),
        leaf => Operator::Not(Box::new(leaf)),
    }
}

// Sorted, deduplicated literal list; a single literal is an equality test.
fn canonical_in(op: &InOperator) -> Operator {
    let mut values = op.values().to_vec();
    values.sort_by(canonical_cmp);
    values.dedup_by(|a, b| canonical_cmp(a, b) == Ordering::Equal);

    if let [only] = values.as_slice() {
        return Operator::EqualTo(ValueOperator {
            attribute: op.attribute().to_string(),
            value: only.clone(),
        });
    }

    Operator::In(InOperator {
        attribute: op.attribute().to_string(),
        values,
    })
}

///
/// Fold patterns that are really a simpler predicate.
///
/// Rules:
/// - case-sensitive pattern of fixed characters only  → EqualTo(attr, literal)
/// - pattern of a single star                         → NOT EqualTo(attr, null)
///
/// Case-insensitive literals stay a pattern: equality is case-sensitive.
/// Literals that a non-text value renders as (`5`, `true`, `2.5`) also stay a
/// pattern, since the pattern matches that value and the equality does not.
///
fn canonical_like(op: &LikeOperator) -> Operator {
    let pattern = op.pattern();

    if pattern.is_case_sensitive()
        && let Some(literal) = pattern.fixed_literal()
        && !renders_non_text(&literal)
    {
        return Operator::EqualTo(ValueOperator {
            attribute: op.attribute().to_string(),
            value: Value::Text(literal),
        });
    }

    if pattern.is_match_all() {
        return Operator::Not(Box::new(Operator::EqualTo(ValueOperator {
            attribute: op.attribute().to_string(),
            value: Value::Null,
        })));
    }

    Operator::Like(op.clone())
}

// True when some bool, int or float value renders exactly as `literal`.
fn renders_non_text(literal: &str) -> bool {
    matches!(literal, "true" | "false")
        || literal
            .parse::<i64>()
            .is_ok_and(|v| Value::Int(v).to_string() == literal)
        || literal
            .parse::<f64>()
            .is_ok_and(|v| Value::Float64(v).to_string() == literal)
}
