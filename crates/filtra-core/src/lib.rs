//! Core runtime for filtra: the operator algebra, its evaluation against
//! attributed records, canonicalization, splitting, wildcard patterns, and
//! the versioned persistence codec.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod codec;
pub mod combination;
pub mod config;
pub mod error;
pub mod operator;
pub mod value;
pub mod wildcard;

pub(crate) mod obs;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, codecs, or config are re-exported here.
///

pub mod prelude {
    pub use crate::{
        operator::{FieldMapContext, Operator, OperatorContext},
        value::Value,
        wildcard::{WildcardFormat, WildcardPattern},
    };
}
