#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Presentation context types for the adequacy dashboard.
//!
//! The context is what the page template receives. Its structured fields
//! are already serialized to JSON text so the template can embed them
//! verbatim; field names are part of the client-side contract.

use adequacy_map_province_models::RawMetrics;
use adequacy_map_scoring::summary::RankedProvince;
use serde::{Deserialize, Serialize};

/// Everything one dashboard page render needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardContext {
    /// Total elderly population, thousands-separated.
    pub total_elderly: String,
    /// Mean adequacy index with two decimals.
    #[serde(rename = "mean_Ai")]
    pub mean_ai: String,
    /// JSON object: display name to boundary sequence.
    pub boundaries: String,
    /// JSON object: display name to [`ProvinceDetail`].
    pub province_data: String,
    /// JSON object of the four normalization maxima.
    pub norm_max: String,
    /// JSON array of display names in source row order.
    pub province_order: String,
    /// Rendered choropleth map.
    pub choropleth_figure: String,
    /// Rendered top-10 bar chart.
    pub ranking_figure: String,
}

/// Per-province detail shown when a province is selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProvinceDetail {
    /// Every raw metric, under its canonical column name.
    #[serde(flatten)]
    pub metrics: RawMetrics,
    /// Adequacy index rounded to three decimals.
    #[serde(rename = "A_i")]
    pub adequacy_index: f64,
    /// Copy of `A_i` the client compares edited scores against.
    #[serde(rename = "baseline_A_i")]
    pub baseline_adequacy_index: f64,
}

impl ProvinceDetail {
    /// Builds a detail record, rounding the index to three decimals.
    #[must_use]
    pub fn new(metrics: RawMetrics, adequacy_index: f64) -> Self {
        let rounded = round3(adequacy_index);
        Self {
            metrics,
            adequacy_index: rounded,
            baseline_adequacy_index: rounded,
        }
    }
}

/// One bar of the ranking chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position.
    pub rank: usize,
    pub province_name_th: String,
    #[serde(rename = "A_i")]
    pub adequacy_index: f64,
}

impl RankingEntry {
    /// Builds the entry at 0-based `position` of a ranking.
    #[must_use]
    pub fn from_ranked(position: usize, ranked: &RankedProvince) -> Self {
        Self {
            rank: position + 1,
            province_name_th: ranked.display_name.clone(),
            adequacy_index: round3(ranked.adequacy_index),
        }
    }
}

/// Rounds to three decimal places.
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_uses_client_field_names() {
        let context = DashboardContext {
            total_elderly: "1,234".to_string(),
            mean_ai: "0.50".to_string(),
            boundaries: "{}".to_string(),
            province_data: "{}".to_string(),
            norm_max: "{}".to_string(),
            province_order: "[]".to_string(),
            choropleth_figure: "{}".to_string(),
            ranking_figure: "{}".to_string(),
        };
        let value = serde_json::to_value(&context).unwrap();

        assert_eq!(value["mean_Ai"], "0.50");
        assert!(value.get("mean_ai").is_none());
        assert_eq!(value["total_elderly"], "1,234");
    }

    #[test]
    fn detail_flattens_metrics_and_duplicates_index() {
        let metrics = RawMetrics {
            equip_mri: 3.0,
            ..RawMetrics::default()
        };
        let value = serde_json::to_value(ProvinceDetail::new(metrics, 0.72549)).unwrap();

        assert_eq!(value["equip_mri"], 3.0);
        assert_eq!(value["A_i"], 0.725);
        assert_eq!(value["baseline_A_i"], 0.725);
        assert_eq!(value.as_object().unwrap().len(), 19);
    }

    #[test]
    fn ranking_entries_are_one_based() {
        let ranked = RankedProvince {
            province_key: "10".to_string(),
            display_name: "กรุงเทพมหานคร".to_string(),
            adequacy_index: 0.8504,
        };
        let entry = RankingEntry::from_ranked(0, &ranked);
        assert_eq!(entry.rank, 1);
        assert!((entry.adequacy_index - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn rounds_to_three_decimals() {
        assert!((round3(0.123_56) - 0.124).abs() < f64::EPSILON);
        assert!((round3(1.0) - 1.0).abs() < f64::EPSILON);
    }
}
