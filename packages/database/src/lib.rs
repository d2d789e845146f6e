#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `DuckDB` source store for the adequacy map.
//!
//! Holds the two source relations: province boundaries (`GeoJSON`
//! `MultiPolygon` text keyed by `province_key`) and raw adequacy metrics.
//! The store location and table names come from an explicit
//! [`SourceConfig`]; nothing here reads the environment. Each dashboard
//! request opens its own read-only connection and runs one joined query.

pub mod config;
pub mod paths;
pub mod queries;
pub mod store;

pub use config::SourceConfig;

use adequacy_map_spatial::SpatialError;

/// Errors that can occur during source store operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DuckDB` error, including an unreachable or missing store.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Filesystem error while preparing the store location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A configured table name is not a plain SQL identifier.
    #[error("Invalid table name: {name:?}")]
    InvalidIdentifier {
        /// The rejected name.
        name: String,
    },

    /// The joined result lacks a required column.
    #[error("Missing column in joined result: {column}")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// A required metric value is NULL.
    #[error("Missing value for {column} in province {province_key}")]
    MissingMetric {
        /// Province whose row is incomplete.
        province_key: String,
        /// Column holding the NULL.
        column: String,
    },

    /// A stored boundary could not be parsed.
    #[error("Geometry error for province {province_key}: {source}")]
    Geometry {
        /// Province whose boundary is malformed.
        province_key: String,
        /// Underlying geometry error.
        #[source]
        source: SpatialError,
    },
}
