//! One request's run of the adequacy pipeline.
//!
//! Derive, normalize, compose, and summarize run in sequence over the
//! joined province table; boundary projection runs over the same rows.
//! Every stage takes a borrowed table and returns a new owned one.

use std::collections::{BTreeMap, BTreeSet};

use adequacy_map_province_models::{
    DerivedFeatures, NormMax, NormalizedFeatures, ProvinceRecord, RawMetrics,
};
use adequacy_map_spatial::{BoundaryPoint, project_boundary};
use serde::Serialize;

use crate::{
    ScoringError, compose, derive,
    normalize::{self, Normalization},
    summary::{self, Summary},
};

/// A province with every computed stage attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProvince {
    pub province_key: String,
    pub display_name: String,
    pub metrics: RawMetrics,
    pub derived: DerivedFeatures,
    pub normalized: NormalizedFeatures,
    /// `A_i`.
    pub adequacy_index: f64,
}

/// Everything the presentation layer needs from one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdequacyReport {
    /// Scored provinces, in source row order.
    pub provinces: Vec<ScoredProvince>,
    /// Boundary sequences keyed by `province_key`.
    pub boundaries: BTreeMap<String, Vec<BoundaryPoint>>,
    /// Normalization divisors of the four indexed scores.
    pub norm_max: NormMax,
    /// Normalization divisor of the elderly population.
    pub elderly_max: f64,
    /// KPIs and ranking.
    pub summary: Summary,
}

impl AdequacyReport {
    /// Province keys in source row order.
    #[must_use]
    pub fn province_order(&self) -> Vec<&str> {
        self.provinces
            .iter()
            .map(|p| p.province_key.as_str())
            .collect()
    }
}

/// Runs the full pipeline over the joined province table.
///
/// # Errors
///
/// * [`ScoringError::EmptyResultSet`] if `records` is empty
/// * [`ScoringError::DuplicateProvinceKey`] if two rows share a key
/// * [`ScoringError::Geometry`] if a boundary is not a polygon or
///   multi-polygon
pub fn run(records: &[ProvinceRecord]) -> Result<AdequacyReport, ScoringError> {
    if records.is_empty() {
        return Err(ScoringError::EmptyResultSet);
    }
    ensure_unique_keys(records)?;

    let derived = derive::derive_features(records);
    let elderly: Vec<f64> = records
        .iter()
        .map(|r| r.metrics.elderly_population)
        .collect();

    let Normalization {
        features,
        norm_max,
        elderly_max,
    } = normalize::normalize_features(&derived, &elderly);

    let indices = compose::compose_index(&features);

    let provinces: Vec<ScoredProvince> = records
        .iter()
        .zip(derived)
        .zip(features)
        .zip(indices)
        .map(|(((record, derived), normalized), adequacy_index)| ScoredProvince {
            province_key: record.province_key.clone(),
            display_name: record.display_name.clone(),
            metrics: record.metrics,
            derived,
            normalized,
            adequacy_index,
        })
        .collect();

    let boundaries = project_boundaries(records)?;
    let summary = summary::summarize(&provinces);

    log::info!(
        "Scored {} provinces (mean index {:.3})",
        provinces.len(),
        summary.mean_index
    );

    Ok(AdequacyReport {
        provinces,
        boundaries,
        norm_max,
        elderly_max,
        summary,
    })
}

/// Projects every province boundary, keyed by `province_key`.
///
/// # Errors
///
/// Returns [`ScoringError::Geometry`] for the first boundary that cannot
/// be projected.
pub fn project_boundaries(
    records: &[ProvinceRecord],
) -> Result<BTreeMap<String, Vec<BoundaryPoint>>, ScoringError> {
    records
        .iter()
        .map(|record| {
            project_boundary(&record.geometry)
                .map(|points| (record.province_key.clone(), points))
                .map_err(|source| ScoringError::Geometry {
                    province_key: record.province_key.clone(),
                    source,
                })
        })
        .collect()
}

fn ensure_unique_keys(records: &[ProvinceRecord]) -> Result<(), ScoringError> {
    let mut seen = BTreeSet::new();
    for record in records {
        if !seen.insert(record.province_key.as_str()) {
            return Err(ScoringError::DuplicateProvinceKey {
                province_key: record.province_key.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use adequacy_map_province_models::MetricField;
    use adequacy_map_spatial::SpatialError;
    use geo::{Geometry, MultiPolygon, Point, Polygon, polygon};

    use super::*;

    fn triangle(offset: f64) -> Polygon<f64> {
        polygon![
            (x: offset, y: offset),
            (x: offset + 1.0, y: offset),
            (x: offset, y: offset + 1.0),
        ]
    }

    /// Builds a record whose derived scores equal the given values: staff
    /// and equipment go into one field of their group, insurance into the
    /// scheme field, and service load into both daily averages.
    fn record(
        key: &str,
        staff: f64,
        equipment: f64,
        insurance: f64,
        service_load: f64,
        elderly: f64,
    ) -> ProvinceRecord {
        let mut metrics = RawMetrics::default();
        *metrics.field_mut(MetricField::DoctorsPhysician) = staff;
        *metrics.field_mut(MetricField::EquipBedTotal) = equipment;
        *metrics.field_mut(MetricField::InsuranceUcScheme) = insurance;
        *metrics.field_mut(MetricField::OpdAvgOutpatientsPerDay) = service_load;
        *metrics.field_mut(MetricField::IpdAvgInpatientsPerDay) = service_load;
        *metrics.field_mut(MetricField::ElderlyPopulation) = elderly;

        ProvinceRecord {
            province_key: key.to_string(),
            display_name: format!("name-{key}"),
            geometry: Geometry::MultiPolygon(MultiPolygon(vec![triangle(0.0)])),
            metrics,
        }
    }

    #[test]
    fn two_province_scenario() {
        let records = vec![
            record("10", 10.0, 5.0, 1.0, 2.0, 100.0),
            record("11", 20.0, 5.0, 1.0, 4.0, 50.0),
        ];
        let report = run(&records).unwrap();

        assert!((report.norm_max.staff_max - 20.0).abs() < f64::EPSILON);
        assert!((report.norm_max.equip_max - 5.0).abs() < f64::EPSILON);
        assert!((report.norm_max.svc_max - 4.0).abs() < f64::EPSILON);

        let first = &report.provinces[0];
        let second = &report.provinces[1];
        assert!((first.normalized.staff - 0.5).abs() < 1e-12);
        assert!((second.normalized.staff - 1.0).abs() < 1e-12);
        assert!((first.normalized.equipment - 1.0).abs() < 1e-12);
        assert!((second.normalized.equipment - 1.0).abs() < 1e-12);
        assert!((first.normalized.service_load_inv - 0.5).abs() < 1e-12);
        assert!(second.normalized.service_load_inv.abs() < 1e-12);

        assert!((first.adequacy_index - 0.725).abs() < 1e-12);
        assert!((second.adequacy_index - 0.85).abs() < 1e-12);

        assert_eq!(report.summary.total_elderly, 150);
        assert_eq!(report.summary.top[0].province_key, "11");
    }

    #[test]
    fn single_province_with_zero_equipment() {
        let report = run(&[record("10", 3.0, 0.0, 2.0, 1.0, 10.0)]).unwrap();
        let province = &report.provinces[0];

        assert!((report.norm_max.equip_max - 1.0).abs() < f64::EPSILON);
        assert!(province.normalized.equipment.abs() < f64::EPSILON);
        assert!(province.adequacy_index.is_finite());
    }

    #[test]
    fn features_and_index_stay_in_unit_interval() {
        let records = vec![
            record("10", 0.0, 3.0, 7.0, 0.0, 0.0),
            record("11", 120.0, 0.0, 1.0, 55.0, 8_000.0),
            record("12", 40.0, 9.0, 0.0, 12.5, 31_000.0),
        ];
        let report = run(&records).unwrap();

        for p in &report.provinces {
            let n = p.normalized;
            for x in [
                n.staff,
                n.equipment,
                n.insurance,
                n.service_load_inv,
                n.elderly_inv,
                p.adequacy_index,
            ] {
                assert!((0.0..=1.0).contains(&x), "{x} out of [0, 1] for {}", p.province_key);
            }
        }
    }

    #[test]
    fn elderly_burden_does_not_move_the_index() {
        let young = run(&[
            record("10", 10.0, 5.0, 1.0, 2.0, 1.0),
            record("11", 20.0, 5.0, 1.0, 4.0, 1_000.0),
        ])
        .unwrap();
        let old = run(&[
            record("10", 10.0, 5.0, 1.0, 2.0, 1_000.0),
            record("11", 20.0, 5.0, 1.0, 4.0, 1.0),
        ])
        .unwrap();

        for (a, b) in young.provinces.iter().zip(&old.provinces) {
            assert!((a.adequacy_index - b.adequacy_index).abs() < f64::EPSILON);
            assert!((a.normalized.elderly_inv - b.normalized.elderly_inv).abs() > 0.5);
        }
    }

    #[test]
    fn province_order_follows_input_rows() {
        let records = vec![
            record("30", 1.0, 1.0, 1.0, 1.0, 1.0),
            record("10", 1.0, 1.0, 1.0, 1.0, 1.0),
            record("20", 1.0, 1.0, 1.0, 1.0, 1.0),
        ];
        let report = run(&records).unwrap();
        assert_eq!(report.province_order(), vec!["30", "10", "20"]);
        assert_eq!(report.boundaries.len(), 3);
    }

    #[test]
    fn boundaries_are_keyed_by_province_key() {
        let mut records = vec![record("10", 1.0, 1.0, 1.0, 1.0, 1.0)];
        records[0].geometry =
            Geometry::MultiPolygon(MultiPolygon(vec![triangle(0.0), triangle(5.0)]));
        let report = run(&records).unwrap();

        let points = &report.boundaries["10"];
        assert_eq!(points.iter().filter(|p| p.is_break()).count(), 2);
        assert_eq!(points.len(), 10);
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(run(&[]), Err(ScoringError::EmptyResultSet)));
    }

    #[test]
    fn duplicate_keys_fail() {
        let records = vec![
            record("10", 1.0, 1.0, 1.0, 1.0, 1.0),
            record("10", 2.0, 1.0, 1.0, 1.0, 1.0),
        ];
        assert!(matches!(
            run(&records),
            Err(ScoringError::DuplicateProvinceKey { province_key }) if province_key == "10"
        ));
    }

    #[test]
    fn unsupported_geometry_fails_the_run() {
        let mut records = vec![record("10", 1.0, 1.0, 1.0, 1.0, 1.0)];
        records[0].geometry = Geometry::Point(Point::new(100.0, 13.0));

        let err = run(&records).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Geometry {
                ref province_key,
                source: SpatialError::UnsupportedGeometryType { geometry_type: "Point" },
            } if province_key == "10"
        ));
    }
}
