//! Versioned binary encoding of operator trees.
//!
//! Every node is written as
//!
//! ```text
//! [version: i32 BE][kind: u8][payload]
//! ```
//!
//! so each node carries its own format version and later versions can
//! change a payload shape without disturbing older nodes. Decoding looks the
//! version up first and rejects anything it does not know.
//!
//! Version 0 payloads:
//! - `true` / `false`: empty
//! - `and` / `or`: `u32` operand count, then operand nodes
//! - `not`: one operand node
//! - `equals` / `greaterThan` / `lessThan`: attribute string, value
//! - `isIn`: attribute string, `u32` value count, values
//! - `matches`: attribute string, pattern text string, case-sensitive byte
//!
//! Strings are a `u32` BE byte length followed by UTF-8. Values are a tag
//! byte (null 0, bool 1, int 2, float64 3, text 4) followed by their payload.

mod error;

#[cfg(test)]
mod tests;

use crate::{
    obs::LOG_TARGET,
    operator::{Operator, OperatorError, OperatorKind},
    value::Value,
    wildcard::{WildcardFormat, WildcardPattern},
};
use serde::Deserialize;
use std::io::{Read, Write};
use tracing::trace;

pub use error::CodecError;

///
/// CONSTANTS
///

/// Format version written by this build.
pub const FORMAT_VERSION: i32 = 0;

const VALUE_NULL: u8 = 0x00;
const VALUE_BOOL: u8 = 0x01;
const VALUE_INT: u8 = 0x02;
const VALUE_FLOAT64: u8 = 0x03;
const VALUE_TEXT: u8 = 0x04;

///
/// DecodeLimits
///
/// Resource bounds applied while decoding untrusted input. Encoding checks
/// the same bounds.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeLimits {
    /// Maximum node nesting depth; the root is depth 1.
    pub max_depth: usize,
    /// Maximum operands of one compound node or values of one `isIn`.
    pub max_operands: usize,
    /// Maximum byte length of one string payload.
    pub max_text_bytes: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_operands: 4096,
            max_text_bytes: 64 * 1024,
        }
    }
}

/// Encode one operator tree at the current format version.
///
/// Encoding enforces the default [`DecodeLimits`], so anything it produces
/// decodes under the same limits.
pub fn encode(operator: &Operator) -> Result<Vec<u8>, CodecError> {
    encode_with_limits(operator, DecodeLimits::default())
}

pub fn encode_with_limits(
    operator: &Operator,
    limits: DecodeLimits,
) -> Result<Vec<u8>, CodecError> {
    let mut writer = NodeWriter {
        out: Vec::new(),
        limits,
    };
    writer.write_node(operator, 1)?;

    Ok(writer.out)
}

/// Encode one operator tree into `writer`.
pub fn write_operator<W: Write + ?Sized>(
    writer: &mut W,
    operator: &Operator,
) -> Result<(), CodecError> {
    writer.write_all(&encode(operator)?)?;

    Ok(())
}

/// Decode one operator tree that spans all of `bytes`.
pub fn decode(bytes: &[u8]) -> Result<Operator, CodecError> {
    decode_with_limits(bytes, DecodeLimits::default())
}

/// Decode one operator tree that spans all of `bytes` under explicit limits.
pub fn decode_with_limits(bytes: &[u8], limits: DecodeLimits) -> Result<Operator, CodecError> {
    let mut remaining = bytes;
    let operator = read_operator_with_limits(&mut remaining, limits)?;
    if !remaining.is_empty() {
        return Err(CodecError::TrailingBytes {
            count: remaining.len(),
        });
    }

    trace!(target: LOG_TARGET, bytes = bytes.len(), "decoded operator");

    Ok(operator)
}

/// Read one operator tree from `reader`, leaving any following bytes unread.
pub fn read_operator<R: Read + ?Sized>(reader: &mut R) -> Result<Operator, CodecError> {
    read_operator_with_limits(reader, DecodeLimits::default())
}

pub fn read_operator_with_limits<R: Read + ?Sized>(
    reader: &mut R,
    limits: DecodeLimits,
) -> Result<Operator, CodecError> {
    NodeReader { reader, limits }.read_node(1)
}

// ---- encode -------------------------------------------------------------

///
/// NodeWriter
///
/// Recursive node encoder; rejects trees the decoder would reject under the
/// same limits.
///

struct NodeWriter {
    out: Vec<u8>,
    limits: DecodeLimits,
}

impl NodeWriter {
    fn write_node(&mut self, operator: &Operator, depth: usize) -> Result<(), CodecError> {
        if depth > self.limits.max_depth {
            return Err(CodecError::DepthExceeded {
                max: self.limits.max_depth,
            });
        }

        self.out.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
        self.out.push(operator.kind().tag());

        match operator {
            Operator::True | Operator::False => {}
            Operator::And(compound) | Operator::Or(compound) => {
                self.push_count("operand count", compound.operands().len())?;
                for operand in compound.operands() {
                    self.write_node(operand, depth + 1)?;
                }
            }
            Operator::Not(inner) => self.write_node(inner, depth + 1)?,
            Operator::EqualTo(op) | Operator::GreaterThan(op) | Operator::LessThan(op) => {
                self.push_str(op.attribute())?;
                self.push_value(op.value())?;
            }
            Operator::In(op) => {
                self.push_str(op.attribute())?;
                self.push_count("value count", op.values().len())?;
                for value in op.values() {
                    self.push_value(value)?;
                }
            }
            Operator::Like(op) => {
                self.push_str(op.attribute())?;
                self.push_str(op.pattern().pattern_text())?;
                self.out.push(u8::from(op.pattern().is_case_sensitive()));
            }
        }

        Ok(())
    }

    fn push_value(&mut self, value: &Value) -> Result<(), CodecError> {
        match value {
            Value::Null => self.out.push(VALUE_NULL),
            Value::Bool(v) => {
                self.out.push(VALUE_BOOL);
                self.out.push(u8::from(*v));
            }
            Value::Int(v) => {
                self.out.push(VALUE_INT);
                self.out.extend_from_slice(&v.to_be_bytes());
            }
            Value::Float64(v) => {
                self.out.push(VALUE_FLOAT64);
                self.out.extend_from_slice(&v.to_bits().to_be_bytes());
            }
            Value::Text(v) => {
                self.out.push(VALUE_TEXT);
                self.push_str(v)?;
            }
        }

        Ok(())
    }

    fn push_count(&mut self, what: &'static str, count: usize) -> Result<(), CodecError> {
        if count > self.limits.max_operands {
            return Err(CodecError::LimitExceeded {
                what,
                found: count,
                max: self.limits.max_operands,
            });
        }

        self.push_len(what, count)
    }

    fn push_str(&mut self, s: &str) -> Result<(), CodecError> {
        if s.len() > self.limits.max_text_bytes {
            return Err(CodecError::LimitExceeded {
                what: "string length",
                found: s.len(),
                max: self.limits.max_text_bytes,
            });
        }

        self.push_len("string length", s.len())?;
        self.out.extend_from_slice(s.as_bytes());

        Ok(())
    }

    fn push_len(&mut self, what: &'static str, len: usize) -> Result<(), CodecError> {
        let len = u32::try_from(len).map_err(|_| CodecError::LengthOverflow { what, len })?;
        self.out.extend_from_slice(&len.to_be_bytes());

        Ok(())
    }
}

// ---- decode -------------------------------------------------------------

///
/// NodeReader
///
/// Recursive node decoder bound to one input stream and one set of limits.
///

struct NodeReader<'r, R: Read + ?Sized> {
    reader: &'r mut R,
    limits: DecodeLimits,
}

impl<R: Read + ?Sized> NodeReader<'_, R> {
    fn read_node(&mut self, depth: usize) -> Result<Operator, CodecError> {
        if depth > self.limits.max_depth {
            return Err(CodecError::DepthExceeded {
                max: self.limits.max_depth,
            });
        }

        // the version decides how everything after it is read
        match self.read_i32()? {
            0 => self.read_node_v0(depth),
            other => Err(CodecError::unsupported_version(other)),
        }
    }

    fn read_node_v0(&mut self, depth: usize) -> Result<Operator, CodecError> {
        let tag = self.read_u8()?;
        let kind = OperatorKind::from_tag(tag).ok_or(CodecError::UnknownKind { tag })?;

        let operator = match kind {
            OperatorKind::True => Operator::True,
            OperatorKind::False => Operator::False,
            OperatorKind::And => Operator::and(self.read_operands(depth)?)?,
            OperatorKind::Or => Operator::or(self.read_operands(depth)?)?,
            OperatorKind::Not => Operator::not(self.read_node(depth + 1)?),
            OperatorKind::EqualTo => {
                let attribute = self.read_string()?;
                Operator::equal_to(attribute, self.read_value()?)?
            }
            OperatorKind::GreaterThan => {
                let attribute = self.read_string()?;
                Operator::greater_than(attribute, self.read_value()?)?
            }
            OperatorKind::LessThan => {
                let attribute = self.read_string()?;
                Operator::less_than(attribute, self.read_value()?)?
            }
            OperatorKind::In => {
                let attribute = self.read_string()?;
                let count = self.read_count("value count")?;
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    values.push(self.read_value()?);
                }
                Operator::in_(attribute, values)?
            }
            OperatorKind::Like => {
                let attribute = self.read_string()?;
                let text = self.read_string()?;
                let case_sensitive = self.read_bool()?;
                let pattern = WildcardPattern::new(text, WildcardFormat { case_sensitive })
                    .map_err(OperatorError::from)?;
                Operator::like(attribute, pattern)?
            }
        };

        Ok(operator)
    }

    fn read_operands(&mut self, depth: usize) -> Result<Vec<Operator>, CodecError> {
        let count = self.read_count("operand count")?;
        let mut operands = Vec::with_capacity(count);
        for _ in 0..count {
            operands.push(self.read_node(depth + 1)?);
        }

        Ok(operands)
    }

    fn read_value(&mut self) -> Result<Value, CodecError> {
        let tag = self.read_u8()?;

        Ok(match tag {
            VALUE_NULL => Value::Null,
            VALUE_BOOL => Value::Bool(self.read_bool()?),
            VALUE_INT => Value::Int(i64::from_be_bytes(self.read_array()?)),
            VALUE_FLOAT64 => Value::Float64(f64::from_bits(u64::from_be_bytes(self.read_array()?))),
            VALUE_TEXT => Value::Text(self.read_string()?),
            _ => return Err(CodecError::UnknownValueTag { tag }),
        })
    }

    fn read_string(&mut self) -> Result<String, CodecError> {
        let len = self.read_len()?;
        if len > self.limits.max_text_bytes {
            return Err(CodecError::LimitExceeded {
                what: "string length",
                found: len,
                max: self.limits.max_text_bytes,
            });
        }

        let mut bytes = vec![0; len];
        self.reader
            .read_exact(&mut bytes)
            .map_err(CodecError::from_read)?;

        String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
    }

    fn read_count(&mut self, what: &'static str) -> Result<usize, CodecError> {
        let count = self.read_len()?;
        if count > self.limits.max_operands {
            return Err(CodecError::LimitExceeded {
                what,
                found: count,
                max: self.limits.max_operands,
            });
        }

        Ok(count)
    }

    fn read_len(&mut self) -> Result<usize, CodecError> {
        let len = u32::from_be_bytes(self.read_array()?);

        // saturate on narrow targets; the limit checks reject it afterwards
        Ok(usize::try_from(len).unwrap_or(usize::MAX))
    }

    fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(CodecError::InvalidBool { byte }),
        }
    }

    fn read_i32(&mut self) -> Result<i32, CodecError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    fn read_u8(&mut self) -> Result<u8, CodecError> {
        let [byte] = self.read_array()?;

        Ok(byte)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut buf = [0; N];
        self.reader
            .read_exact(&mut buf)
            .map_err(CodecError::from_read)?;

        Ok(buf)
    }
}
