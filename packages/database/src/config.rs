//! Source store configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::DbError;

/// Location and table names of the two source relations.
///
/// Deserialized from TOML; every field is optional and falls back to the
/// default store under `data/shared/`.
///
/// ```toml
/// path = "data/shared/adequacy.duckdb"
/// geometry_table = "adequacy_geo"
/// metrics_table = "adequacy_raw"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// `DuckDB` file holding both relations.
    pub path: PathBuf,
    /// Province boundary relation.
    pub geometry_table: String,
    /// Raw adequacy metrics relation.
    pub metrics_table: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: crate::paths::adequacy_db_path(),
            geometry_table: "adequacy_geo".to_string(),
            metrics_table: "adequacy_raw".to_string(),
        }
    }
}

impl SourceConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the TOML is malformed or a table name is not
    /// a plain identifier.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, DbError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> Result<Self, DbError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Checks that both table names are safe to interpolate into SQL.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidIdentifier`] for the first bad name.
    pub fn validate(&self) -> Result<(), DbError> {
        validate_identifier(&self.geometry_table)?;
        validate_identifier(&self.metrics_table)?;
        Ok(())
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`.
fn validate_identifier(name: &str) -> Result<(), DbError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}
