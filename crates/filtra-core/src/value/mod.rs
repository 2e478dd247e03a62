mod compare;


use std::fmt;

pub use compare::{canonical_cmp, strict_order_cmp};

///
/// Value
///
/// Literal carried by leaf operators and returned by attribute resolution.
///
/// Null    → the attribute exists but holds no value.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float64(f64),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_nan(&self) -> bool {
        matches!(self, Self::Float64(v) if v.is_nan())
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Short lowercase name of the variant, used in type-mismatch errors.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float64(_) => "float64",
            Self::Text(_) => "text",
        }
    }

    /// Equality used by `EqualTo` and `In`.
    ///
    /// Numeric variants compare by numeric value; mismatched families are
    /// unequal rather than an error.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Float64(b)) | (Self::Float64(b), Self::Int(a)) => {
                (*a as f64) == *b
            }
            _ => self == other,
        }
    }

    pub(crate) const fn canonical_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Float64(_) => 3,
            Self::Text(_) => 4,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            // debug formatting never renders a float like an integer (`1.0`, `1e300`)
            Self::Float64(v) => write!(f, "{v:?}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
