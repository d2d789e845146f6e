//! Presentation boundary.
//!
//! Internal results are keyed by `province_key`. This is the only place
//! where display names become keys: the client looks provinces up by the
//! name it shows. Two provinces sharing a display name collide here; the
//! later one wins in the name-keyed maps and the collision is logged.

use std::collections::{BTreeMap, BTreeSet};

use adequacy_map_dashboard_models::{DashboardContext, ProvinceDetail, RankingEntry};
use adequacy_map_province_models::ProvinceRecord;
use adequacy_map_scoring::AdequacyReport;
use adequacy_map_spatial::BoundaryPoint;
use num_format::{Locale, ToFormattedString};

use crate::{
    DashboardError,
    figure::{FigureRenderer, MapProvince},
};

/// Builds the page context from one pipeline run.
///
/// `records` must be the slice the report was computed from.
///
/// # Errors
///
/// Returns [`DashboardError`] if serialization or figure rendering fails.
pub fn build_context(
    records: &[ProvinceRecord],
    report: &AdequacyReport,
    renderer: &dyn FigureRenderer,
) -> Result<DashboardContext, DashboardError> {
    warn_display_name_collisions(report);

    let province_order: Vec<&str> = report
        .provinces
        .iter()
        .map(|p| p.display_name.as_str())
        .collect();

    let mut boundaries: BTreeMap<&str, &[BoundaryPoint]> = BTreeMap::new();
    let mut province_data: BTreeMap<&str, ProvinceDetail> = BTreeMap::new();
    for province in &report.provinces {
        let name = province.display_name.as_str();
        if let Some(points) = report.boundaries.get(&province.province_key) {
            boundaries.insert(name, points);
        }
        province_data.insert(
            name,
            ProvinceDetail::new(province.metrics, province.adequacy_index),
        );
    }

    let map_provinces: Vec<MapProvince<'_>> = records
        .iter()
        .zip(&report.provinces)
        .map(|(record, scored)| MapProvince {
            display_name: &scored.display_name,
            adequacy_index: scored.adequacy_index,
            geometry: &record.geometry,
        })
        .collect();

    let ranking: Vec<RankingEntry> = report
        .summary
        .top
        .iter()
        .enumerate()
        .map(|(i, ranked)| RankingEntry::from_ranked(i, ranked))
        .collect();

    Ok(DashboardContext {
        total_elderly: format_total(report.summary.total_elderly),
        mean_ai: format_mean(report.summary.mean_index),
        boundaries: serde_json::to_string(&boundaries)?,
        province_data: serde_json::to_string(&province_data)?,
        norm_max: serde_json::to_string(&report.norm_max)?,
        province_order: serde_json::to_string(&province_order)?,
        choropleth_figure: renderer.choropleth(&map_provinces)?,
        ranking_figure: renderer.ranking(&ranking)?,
    })
}

/// Formats an integer with English thousands separators.
#[must_use]
pub fn format_total(total: u64) -> String {
    total.to_formatted_string(&Locale::en)
}

/// Formats a mean with two decimals.
#[must_use]
pub fn format_mean(mean: f64) -> String {
    format!("{mean:.2}")
}

fn warn_display_name_collisions(report: &AdequacyReport) {
    let mut seen = BTreeSet::new();
    for province in &report.provinces {
        if !seen.insert(province.display_name.as_str()) {
            log::warn!(
                "Display name '{}' is shared by more than one province; \
                 province {} overwrites the earlier entry",
                province.display_name,
                province.province_key
            );
        }
    }
}
