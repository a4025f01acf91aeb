//! Schema configuration.
//!
//! Runtime schemas are described in a TOML file:
//!
//! ```toml
//! [[message]]
//! name = "BuyQuery"
//! magic = 88
//! fields = ["PriceCents", "DiningHallBitfield"]
//! ```
//!
//! The file location can come from the environment:
//!
//! - `SWIPE_SCHEMA_FILE` (default: "schemas.toml")

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swipe_core::DynamicSchema;

use crate::error::RegistryError;

/// Environment variable naming the schema file.
pub const SCHEMA_FILE_ENV: &str = "SWIPE_SCHEMA_FILE";

/// Schema file used when the environment does not name one.
pub const DEFAULT_SCHEMA_FILE: &str = "schemas.toml";

/// One `[[message]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageConfig {
    pub name: String,
    pub magic: u32,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl MessageConfig {
    /// Validate into a [`DynamicSchema`].
    pub fn to_schema(&self) -> Result<DynamicSchema, RegistryError> {
        Ok(DynamicSchema::new(
            self.name.clone(),
            self.magic,
            self.fields.iter().cloned(),
        )?)
    }
}

/// Parsed schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default, rename = "message")]
    pub messages: Vec<MessageConfig>,
}

impl RegistryConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    /// Load the file named by `SWIPE_SCHEMA_FILE`, falling back to
    /// `schemas.toml` in the working directory.
    pub fn from_env() -> Result<Self, RegistryError> {
        Self::load(schema_file_from_env())
    }
}

/// Path of the schema file according to the environment.
pub fn schema_file_from_env() -> PathBuf {
    env::var_os(SCHEMA_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_message_tables() {
        let cfg = RegistryConfig::from_toml_str(
            r#"
            [[message]]
            name = "BuyQuery"
            magic = 88
            fields = ["PriceCents", "DiningHallBitfield"]

            [[message]]
            name = "Ping"
            magic = 7
            "#,
        )
        .unwrap();

        assert_eq!(cfg.messages.len(), 2);
        assert_eq!(cfg.messages[0].fields, vec!["PriceCents", "DiningHallBitfield"]);
        assert!(cfg.messages[1].fields.is_empty());
    }

    #[test]
    fn magic_must_fit_in_32_bits() {
        let err = RegistryConfig::from_toml_str(
            r#"
            [[message]]
            name = "Big"
            magic = 4294967296
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RegistryConfig::from_toml_str(
            r#"
            [[message]]
            name = "X"
            magic = 1
            feilds = ["Typo"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[test]
    fn invalid_schema_is_reported() {
        let cfg = RegistryConfig::from_toml_str(
            r#"
            [[message]]
            name = "Dup"
            magic = 3
            fields = ["A", "A"]
            "#,
        )
        .unwrap();
        let err = cfg.messages[0].to_schema().unwrap_err();
        assert!(matches!(err, RegistryError::Schema(_)));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = RegistryConfig::load("/definitely/not/here.toml").unwrap_err();
        match err {
            RegistryError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.toml"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
