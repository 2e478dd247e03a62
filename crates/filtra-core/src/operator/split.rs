use crate::{
    combination::Combinations,
    obs::LOG_TARGET,
    operator::{Compound, Operator, ValueOperator},
};
use tracing::trace;

impl Operator {
    /// Decompose into operators whose disjunction is equivalent to `self`.
    ///
    /// - `Or` yields the splits of each operand, in order
    /// - `And` yields one conjunction per combination of operand splits
    /// - `In` yields one equality test per listed literal
    /// - everything else yields itself
    ///
    /// The result is never empty.
    #[must_use]
    pub fn split(&self) -> Vec<Self> {
        match self {
            Self::Or(compound) => compound.operands().iter().flat_map(Self::split).collect(),
            Self::And(compound) => split_and(compound.operands()),
            Self::In(op) => op
                .values()
                .iter()
                .map(|value| {
                    Self::EqualTo(ValueOperator {
                        attribute: op.attribute().to_string(),
                        value: value.clone(),
                    })
                })
                .collect(),
            _ => vec![self.clone()],
        }
    }
}

fn split_and(operands: &[Operator]) -> Vec<Operator> {
    let variations: Vec<Vec<Operator>> = operands.iter().map(Operator::split).collect();
    let combinations = Combinations::new(&variations);
    trace!(
        target: LOG_TARGET,
        shape = %combinations.shape(),
        terms = combinations.total(),
        "splitting conjunction"
    );

    combinations
        .map(|operands| Operator::And(Compound { operands }))
        .collect()
}
