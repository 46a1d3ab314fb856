//! Collection configuration.

use crate::error::InternalError;
use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Default attribute used for organization (tenant) scoping.
pub const DEFAULT_ORGANIZATION_FIELD: &str = "organization_id";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(#[from] InternalError),
}

///
/// CollectionConfig
///
/// Where a collection lives and how its tenant scope is expressed.
///
/// ```toml
/// name = "fruits"
/// organization_field = "tenant_id"
/// debug = true
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    pub name: String,

    #[serde(default = "default_organization_field")]
    pub organization_field: String,

    /// Log every decoded row at debug level.
    #[serde(default)]
    pub debug: bool,
}

impl CollectionConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            organization_field: default_organization_field(),
            debug: false,
        }
    }

    #[must_use]
    pub fn with_organization_field(mut self, field: impl Into<String>) -> Self {
        self.organization_field = field.into();
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(InternalError::config_unsupported("collection name must not be empty").into());
        }
        if !is_identifier(&self.organization_field) {
            return Err(InternalError::config_unsupported(format!(
                "organization field '{}' is not a plain attribute name",
                self.organization_field
            ))
            .into());
        }

        Ok(())
    }
}

fn default_organization_field() -> String {
    DEFAULT_ORGANIZATION_FIELD.to_string()
}

/// Plain attribute name: ASCII letters, digits and `_`, not starting with a
/// digit.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

///
/// TESTS
///
