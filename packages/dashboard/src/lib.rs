#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-request dashboard assembly.
//!
//! One call to [`render_dashboard`] is one page request: it opens its own
//! read-only connection, loads the joined province table, runs the scoring
//! pipeline, and builds the presentation context. Nothing is cached; any
//! failure fails the whole request.

pub mod context;
pub mod figure;

pub use context::build_context;
pub use figure::{FigureRenderer, MapProvince, PlotlyJsonRenderer};

use adequacy_map_dashboard_models::DashboardContext;
use adequacy_map_database::{DbError, SourceConfig, queries};
use adequacy_map_scoring::{AdequacyReport, ScoringError};
use thiserror::Error;

/// Errors that fail a dashboard request.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The source store is unreachable or returned unusable data.
    #[error("Upstream error: {0}")]
    Upstream(#[from] DbError),

    /// The scoring pipeline rejected the data.
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// Context serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A figure renderer failed.
    #[error("Figure error: {message}")]
    Figure {
        /// Description of the failure.
        message: String,
    },
}

/// Loads the source data and runs the scoring pipeline.
///
/// # Errors
///
/// Returns [`DashboardError`] if loading or scoring fails.
pub fn score(config: &SourceConfig) -> Result<AdequacyReport, DashboardError> {
    let records = queries::fetch_provinces(config)?;
    Ok(adequacy_map_scoring::run(&records)?)
}

/// Runs one full dashboard request.
///
/// # Errors
///
/// Returns [`DashboardError`] if any stage fails; no partial context is
/// produced.
pub fn render_dashboard(
    config: &SourceConfig,
    renderer: &dyn FigureRenderer,
) -> Result<DashboardContext, DashboardError> {
    let records = queries::fetch_provinces(config)?;
    let report = adequacy_map_scoring::run(&records)?;
    let context = build_context(&records, &report, renderer)?;

    log::info!(
        "Rendered dashboard for {} provinces (total elderly {}, mean A_i {})",
        report.provinces.len(),
        context.total_elderly,
        context.mean_ai
    );
    Ok(context)
}
