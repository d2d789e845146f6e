#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Healthcare adequacy index computation.
//!
//! The pipeline runs as explicit stages over immutable tables, in order:
//! [`derive`] aggregates raw metrics into scores, [`normalize`] max-scales
//! them to `[0, 1]`, [`compose`] combines them into the adequacy index, and
//! [`summary`] builds the KPIs and ranking. Boundary projection runs
//! alongside via [`adequacy_map_spatial`]. [`pipeline::run`] chains every
//! stage for one request; nothing is cached between requests.

pub mod compose;
pub mod derive;
pub mod normalize;
pub mod pipeline;
pub mod summary;

pub use pipeline::{AdequacyReport, ScoredProvince, run};

use adequacy_map_spatial::SpatialError;
use thiserror::Error;

/// Errors that can occur while scoring provinces.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// The joined source relations produced no provinces.
    #[error("No provinces in the joined result set")]
    EmptyResultSet,

    /// Two input rows share a province key.
    #[error("Duplicate province key: {province_key}")]
    DuplicateProvinceKey {
        /// The repeated key.
        province_key: String,
    },

    /// A province boundary could not be projected.
    #[error("Boundary error for province {province_key}: {source}")]
    Geometry {
        /// Province whose geometry was rejected.
        province_key: String,
        /// Underlying geometry error.
        #[source]
        source: SpatialError,
    },
}
