//! Scalar KPIs and the adequacy ranking.

use serde::{Deserialize, Serialize};

use crate::ScoredProvince;

/// Number of provinces in the dashboard ranking.
pub const TOP_N: usize = 10;

/// A province's position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProvince {
    pub province_key: String,
    pub display_name: String,
    pub adequacy_index: f64,
}

/// Dashboard KPIs and ranking for one result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of the elderly population across all provinces.
    pub total_elderly: u64,
    /// Arithmetic mean of the adequacy index.
    pub mean_index: f64,
    /// Top [`TOP_N`] provinces by adequacy index, descending.
    pub top: Vec<RankedProvince>,
}

/// Builds the KPIs and top-[`TOP_N`] ranking.
#[must_use]
pub fn summarize(provinces: &[ScoredProvince]) -> Summary {
    let indices: Vec<f64> = provinces.iter().map(|p| p.adequacy_index).collect();

    Summary {
        total_elderly: total_elderly(provinces.iter().map(|p| p.metrics.elderly_population)),
        mean_index: mean(&indices),
        top: top_n(provinces, TOP_N),
    }
}

/// Sums a population column into an integer total.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn total_elderly(values: impl Iterator<Item = f64>) -> u64 {
    let total: f64 = values.sum();
    total.round().max(0.0) as u64
}

/// Arithmetic mean; `0.0` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Returns the first `n` provinces by adequacy index, descending.
///
/// The sort is stable: provinces with equal indices keep their input order.
/// Fewer than `n` provinces yields all of them.
#[must_use]
pub fn top_n(provinces: &[ScoredProvince], n: usize) -> Vec<RankedProvince> {
    let mut ranked: Vec<RankedProvince> = provinces
        .iter()
        .map(|p| RankedProvince {
            province_key: p.province_key.clone(),
            display_name: p.display_name.clone(),
            adequacy_index: p.adequacy_index,
        })
        .collect();

    ranked.sort_by(|a, b| b.adequacy_index.total_cmp(&a.adequacy_index));
    ranked.truncate(n);
    ranked
}
