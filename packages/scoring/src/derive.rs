//! Feature derivation: aggregate scores from raw metric columns.

use adequacy_map_province_models::{DerivedFeatures, MetricGroup, ProvinceRecord, RawMetrics};

/// Derives the aggregate scores for a single province.
///
/// The two insurance metrics are on different natural scales (a coverage
/// count and a hospital count) and are summed as-is.
#[must_use]
pub fn derive(metrics: &RawMetrics) -> DerivedFeatures {
    DerivedFeatures {
        staff_score: metrics.group_sum(MetricGroup::Staffing),
        equipment_score: metrics.group_sum(MetricGroup::Equipment),
        insurance_score: metrics.group_sum(MetricGroup::Insurance),
        service_load: (metrics.ipd_avg_inpatients_per_day + metrics.opd_avg_outpatients_per_day)
            / 2.0,
    }
}

/// Derives the aggregate scores for every province, preserving row order.
#[must_use]
pub fn derive_features(records: &[ProvinceRecord]) -> Vec<DerivedFeatures> {
    records.iter().map(|r| derive(&r.metrics)).collect()
}
