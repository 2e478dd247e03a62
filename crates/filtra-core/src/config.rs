//! Runtime configuration loaded from TOML.

use crate::codec::DecodeLimits;
use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("configuration field '{field}' must be greater than zero")]
    ZeroLimit { field: &'static str },
}

///
/// FiltraConfig
///
/// Every section is optional; missing keys take their defaults and unknown
/// keys are rejected.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FiltraConfig {
    pub codec: DecodeLimits,
}

impl FiltraConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.codec;
        if limits.max_depth == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "codec.max_depth",
            });
        }
        if limits.max_operands == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "codec.max_operands",
            });
        }
        if limits.max_text_bytes == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "codec.max_text_bytes",
            });
        }

        Ok(())
    }
}

///
/// TESTS
///
