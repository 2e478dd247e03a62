//! ## Crate layout
//! - `core`: operators, values, wildcard patterns, canonicalization,
//!   splitting, the persistence codec, config, and errors.
//!
//! The `prelude` module carries the vocabulary needed to build and evaluate
//! filters; codec and config entry points stay under `core`.

pub use filtra_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{
    Error,
    codec::{decode, encode},
    config::FiltraConfig,
};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{decode, encode, prelude::*};
    use std::collections::BTreeMap;

    fn person(age: i64, city: &str) -> BTreeMap<String, Value> {
        BTreeMap::from([
            ("age".to_string(), Value::Int(age)),
            ("city".to_string(), Value::from(city)),
        ])
    }

    #[test]
    fn filter_survives_storage_and_canonicalization() -> Result<(), crate::Error> {
        let filter = Operator::and([
            Operator::equal_to("age", 30)?,
            Operator::or([
                Operator::equal_to("city", "NYC")?,
                Operator::like("city", WildcardPattern::case_sensitive("L?")?)?,
            ])?,
        ])?;

        let stored = decode(&encode(&filter)?)?;
        assert_eq!(stored, filter);

        let canonical = stored.canonical();
        for row in [person(30, "NYC"), person(30, "LA"), person(31, "LA")] {
            assert_eq!(
                filter.evaluate(&FieldMapContext, &row)?,
                canonical.evaluate(&FieldMapContext, &row)?
            );
        }
        assert_eq!(canonical.split().len(), 2);

        Ok(())
    }

    #[test]
    fn version_is_exported() {
        assert!(!super::VERSION.is_empty());
    }
}
