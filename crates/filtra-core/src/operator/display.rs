use crate::operator::{Operator, OperatorKind};
use std::fmt::{self, Write};

// Rendering grammar:
//   leaf      := name "(" attribute ", " literal ")"
//   attribute := identifier | quoted string
//   not       := "!" leaf | "!(" compound ")"
//   compound  := child (" && " | " || ") child ...
// Compound children of compounds are parenthesized so the text stays
// unambiguous; it is also the canonical sort key.
impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),

            Self::And(compound) => write_joined(f, compound.operands(), " && "),
            Self::Or(compound) => write_joined(f, compound.operands(), " || "),
            Self::Not(inner) if inner.is_compound() => write!(f, "!({inner})"),
            Self::Not(inner) => write!(f, "!{inner}"),

            Self::EqualTo(op) | Self::GreaterThan(op) | Self::LessThan(op) => write!(
                f,
                "{}({}, {})",
                self.kind().name(),
                Attribute(op.attribute()),
                op.value()
            ),
            Self::In(op) => {
                write!(
                    f,
                    "{}({}, {{",
                    OperatorKind::In.name(),
                    Attribute(op.attribute())
                )?;
                for (idx, value) in op.values().iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("})")
            }
            Self::Like(op) => {
                let name = if op.pattern().is_case_sensitive() {
                    OperatorKind::Like.name()
                } else {
                    "matchesIgnoreCase"
                };
                write!(
                    f,
                    "{name}({}, {:?})",
                    Attribute(op.attribute()),
                    op.pattern().pattern_text()
                )
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, operands: &[Operator], connective: &str) -> fmt::Result {
    for (idx, operand) in operands.iter().enumerate() {
        if idx > 0 {
            f.write_str(connective)?;
        }
        if operand.is_compound() {
            f.write_char('(')?;
            write!(f, "{operand}")?;
            f.write_char(')')?;
        } else {
            write!(f, "{operand}")?;
        }
    }

    Ok(())
}

///
/// Attribute
///
/// Attribute name as rendered inside a leaf. Names made of identifier
/// characters print bare; anything else prints as an escaped quoted string,
/// so no name can spell out a separator.
///

struct Attribute<'a>(&'a str);

impl fmt::Display for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bare = self
            .0
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '.');

        if bare {
            f.write_str(self.0)
        } else {
            write!(f, "{:?}", self.0)
        }
    }
}
