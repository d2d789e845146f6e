#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! One-time loader for the adequacy source store.
//!
//! Reads province boundaries from `GeoJSON` and raw metrics from CSV, then
//! replaces both relations of the configured store. Every input is read
//! and validated before the store is touched.

pub mod geometry;
pub mod mapping;
pub mod metrics;

use std::path::{Path, PathBuf};

use adequacy_map_database::{DbError, SourceConfig, store};
use adequacy_map_spatial::SpatialError;
use thiserror::Error;

pub use geometry::{DEFAULT_NAME_PROPERTY, ProvinceDictionary};

/// Errors that can occur during ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// An input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path of the input file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` parsing or conversion error.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Source store error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// The boundary file is not a `FeatureCollection`.
    #[error("Expected a GeoJSON FeatureCollection, found {found}")]
    NotAFeatureCollection {
        /// Kind of `GeoJSON` object that was found instead.
        found: &'static str,
    },

    /// A province dictionary value is neither a string nor a number.
    #[error("Invalid province key for {name:?}: {value}")]
    InvalidDictionaryEntry {
        /// Province name.
        name: String,
        /// Offending JSON value.
        value: String,
    },

    /// A boundary is not polygonal.
    #[error("Geometry error for province {province_key}: {source}")]
    Geometry {
        /// Province whose boundary was rejected.
        province_key: String,
        /// Underlying geometry error.
        #[source]
        source: SpatialError,
    },

    /// A required column is absent from the metrics file.
    #[error("Missing column in metrics file: {column}")]
    MissingColumn {
        /// Canonical column name.
        column: String,
    },

    /// A metrics cell is not a number.
    #[error("Invalid number {value:?} for {column} in province {province_key}")]
    InvalidNumber {
        /// Province whose row holds the cell.
        province_key: String,
        /// Canonical column name.
        column: String,
        /// Cell text.
        value: String,
    },
}

/// Input files for one ingest run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// `GeoJSON` `FeatureCollection` of province boundaries.
    pub geometry_path: PathBuf,
    /// CSV export of the metrics sheet.
    pub metrics_path: PathBuf,
    /// JSON object mapping Thai province names to province keys.
    pub province_dict_path: PathBuf,
    /// Feature property holding the Thai province name.
    pub name_property: String,
}

/// Row counts written by one ingest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Boundaries written to the geometry relation.
    pub boundaries: u64,
    /// Rows written to the metrics relation.
    pub metric_rows: u64,
}

/// Reads every input and replaces both relations of the store.
///
/// # Errors
///
/// Returns [`IngestError`] if an input is unreadable or invalid, or if the
/// store cannot be written.
pub fn ingest(
    config: &SourceConfig,
    options: &IngestOptions,
) -> Result<IngestSummary, IngestError> {
    let dictionary =
        ProvinceDictionary::from_json_str(&read_to_string(&options.province_dict_path)?)?;
    log::info!("Loaded {} province names", dictionary.len());

    let boundaries = geometry::read_boundaries(
        &read_to_string(&options.geometry_path)?,
        &dictionary,
        &options.name_property,
    )?;

    let metrics_file = std::fs::File::open(&options.metrics_path).map_err(|source| {
        IngestError::Read {
            path: options.metrics_path.display().to_string(),
            source,
        }
    })?;
    let metric_rows = metrics::read_metrics(metrics_file, &mapping::adequacy_raw())?;

    let mut conn = store::open(config)?;
    let summary = IngestSummary {
        boundaries: store::replace_geometry(&mut conn, config, &boundaries)?,
        metric_rows: store::replace_metrics(&mut conn, config, &metric_rows)?,
    };

    log::info!(
        "Ingested {} boundaries and {} metric rows into {}",
        summary.boundaries,
        summary.metric_rows,
        config.path.display()
    );
    Ok(summary)
}

fn read_to_string(path: &Path) -> Result<String, IngestError> {
    std::fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.display().to_string(),
        source,
    })
}
