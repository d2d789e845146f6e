//! The joined province query.
//!
//! One request runs one query: every boundary row inner-joined with its
//! metrics row on `province_key`. Provinces present in only one relation
//! are dropped by the join.

use std::collections::{BTreeMap, BTreeSet};

use adequacy_map_province_models::{MetricField, ProvinceRecord, RawMetrics};
use duckdb::{Connection, Row, Statement};

use crate::{DbError, SourceConfig, store};

/// Positions of named columns in a result set.
///
/// When a name appears more than once, only its first occurrence is kept.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: BTreeMap<String, usize>,
}

impl ColumnIndex {
    /// Indexes `names` in result order.
    #[must_use]
    pub fn new(names: &[String]) -> Self {
        let mut positions = BTreeMap::new();
        for (i, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(i);
        }
        Self { positions }
    }

    /// Returns the position of `column`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MissingColumn`] if the result lacks `column`.
    pub fn require(&self, column: &str) -> Result<usize, DbError> {
        self.positions
            .get(column)
            .copied()
            .ok_or_else(|| DbError::MissingColumn {
                column: column.to_string(),
            })
    }

    /// Number of distinct column names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the result had no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Opens the store read-only and loads every joined province.
///
/// # Errors
///
/// Returns [`DbError`] if the store cannot be opened or the query fails.
pub fn fetch_provinces(config: &SourceConfig) -> Result<Vec<ProvinceRecord>, DbError> {
    let conn = store::open_read_only(config)?;
    load_provinces(&conn, config)
}

/// Loads every province present in both relations, in boundary row order.
///
/// Rows repeating an already-seen `province_key` are skipped.
///
/// # Errors
///
/// * [`DbError::MissingColumn`] if a required column is absent
/// * [`DbError::MissingMetric`] if a metric value is NULL
/// * [`DbError::Geometry`] if a stored boundary cannot be parsed
/// * [`DbError::DuckDb`] if the query fails
pub fn load_provinces(
    conn: &Connection,
    config: &SourceConfig,
) -> Result<Vec<ProvinceRecord>, DbError> {
    config.validate()?;
    let geo_table = &config.geometry_table;
    let raw_table = &config.metrics_table;

    let mut stmt = conn.prepare(&format!(
        "SELECT g.*, a.*
         FROM {geo_table} g
         JOIN {raw_table} a ON g.province_key = a.province_key
         ORDER BY g.rowid, a.rowid"
    ))?;
    let mut rows = stmt.query([])?;

    let names = rows
        .as_ref()
        .map(Statement::column_names)
        .unwrap_or_default();
    let index = ColumnIndex::new(&names);
    if index.len() < names.len() {
        log::debug!(
            "Joined result has {} duplicate column name(s); keeping first occurrences",
            names.len() - index.len()
        );
    }

    let key_col = index.require("province_key")?;
    let name_col = index.require("province_name_th")?;
    let geom_col = index.require("geometry_geojson")?;
    let metric_cols = MetricField::all()
        .into_iter()
        .map(|field| index.require(field.column_name()).map(|i| (field, i)))
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let mut seen = BTreeSet::new();
    let mut records = Vec::new();
    let mut duplicates = 0_usize;

    while let Some(row) = rows.next()? {
        let province_key: String = row.get(key_col)?;
        if !seen.insert(province_key.clone()) {
            duplicates += 1;
            continue;
        }

        let metrics = RawMetrics::try_from_fn(|field| {
            read_metric(row, metric_cols[&field], &province_key, field)
        })?;

        let geojson: String = row.get(geom_col)?;
        let geometry = adequacy_map_spatial::parse_geometry(&geojson).map_err(|source| {
            DbError::Geometry {
                province_key: province_key.clone(),
                source,
            }
        })?;

        records.push(ProvinceRecord {
            display_name: row.get(name_col)?,
            province_key,
            geometry,
            metrics,
        });
    }

    if duplicates > 0 {
        log::warn!("Skipped {duplicates} joined row(s) with an already-seen province_key");
    }

    let geo_count = store::count_rows(conn, geo_table)?;
    let raw_count = store::count_rows(conn, raw_table)?;
    let joined = records.len() as u64;
    if joined < geo_count || joined < raw_count {
        log::warn!(
            "Join kept {joined} provinces ({geo_count} boundaries, {raw_count} metric rows)"
        );
    }

    log::info!("Loaded {joined} provinces from {}", config.path.display());
    Ok(records)
}

fn read_metric(
    row: &Row<'_>,
    col: usize,
    province_key: &str,
    field: MetricField,
) -> Result<f64, DbError> {
    let value: Option<f64> = row.get(col)?;
    value.ok_or_else(|| DbError::MissingMetric {
        province_key: province_key.to_string(),
        column: field.column_name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use geo::{Geometry, MultiPolygon, polygon};

    use super::*;
    use crate::store::{GeometryRow, MetricsRow};

    fn memory_store() -> (Connection, SourceConfig) {
        let conn = Connection::open_in_memory().unwrap();
        let config = SourceConfig::default();
        store::create_schema(&conn, &config).unwrap();
        (conn, config)
    }

    fn boundary(key: &str, name: &str) -> GeometryRow {
        GeometryRow {
            province_key: key.to_string(),
            province_name_th: name.to_string(),
            geometry: MultiPolygon(vec![polygon![
                (x: 100.0, y: 13.0),
                (x: 101.0, y: 13.0),
                (x: 100.0, y: 14.0),
            ]]),
        }
    }

    fn metrics(key: &str, value: f64) -> MetricsRow {
        MetricsRow {
            province_key: key.to_string(),
            values: MetricField::all()
                .into_iter()
                .map(|f| (f, Some(value)))
                .collect(),
        }
    }

    #[test]
    fn column_index_keeps_first_occurrence() {
        let names: Vec<String> = ["province_key", "geometry_geojson", "province_key", "x"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let index = ColumnIndex::new(&names);

        assert_eq!(index.len(), 3);
        assert_eq!(index.require("province_key").unwrap(), 0);
        assert_eq!(index.require("x").unwrap(), 3);
        assert!(matches!(
            index.require("missing"),
            Err(DbError::MissingColumn { column }) if column == "missing"
        ));
    }

    #[test]
    fn inner_join_drops_unmatched_provinces() {
        let (mut conn, config) = memory_store();
        store::replace_geometry(
            &mut conn,
            &config,
            &[boundary("20", "B"), boundary("10", "A"), boundary("99", "geo-only")],
        )
        .unwrap();
        store::replace_metrics(
            &mut conn,
            &config,
            &[metrics("10", 1.0), metrics("20", 2.0), metrics("77", 3.0)],
        )
        .unwrap();

        let records = load_provinces(&conn, &config).unwrap();
        let keys: Vec<&str> = records.iter().map(|r| r.province_key.as_str()).collect();
        assert_eq!(keys, vec!["20", "10"], "boundary row order is kept");

        assert_eq!(records[0].display_name, "B");
        assert!((records[0].metrics.equip_mri - 2.0).abs() < f64::EPSILON);
        assert!(matches!(records[1].geometry, Geometry::MultiPolygon(_)));
    }

    #[test]
    fn null_metric_fails_the_load() {
        let (mut conn, config) = memory_store();
        store::replace_geometry(&mut conn, &config, &[boundary("10", "A")]).unwrap();
        let mut row = metrics("10", 1.0);
        row.values[3].1 = None;
        store::replace_metrics(&mut conn, &config, &[row]).unwrap();

        let err = load_provinces(&conn, &config).unwrap_err();
        assert!(matches!(
            err,
            DbError::MissingMetric { ref province_key, ref column }
                if province_key == "10" && column == "doctors_registered_nurse"
        ));
    }

    #[test]
    fn missing_metric_column_fails_the_load() {
        let (mut conn, config) = memory_store();
        store::replace_geometry(&mut conn, &config, &[boundary("10", "A")]).unwrap();
        store::replace_metrics(&mut conn, &config, &[metrics("10", 1.0)]).unwrap();
        conn.execute_batch("ALTER TABLE adequacy_raw DROP COLUMN equip_mri;")
            .unwrap();

        assert!(matches!(
            load_provinces(&conn, &config),
            Err(DbError::MissingColumn { column }) if column == "equip_mri"
        ));
    }

    #[test]
    fn repeated_keys_keep_the_first_row() {
        let (mut conn, config) = memory_store();
        store::replace_geometry(&mut conn, &config, &[boundary("10", "A")]).unwrap();
        store::replace_metrics(&mut conn, &config, &[metrics("10", 1.0), metrics("10", 5.0)])
            .unwrap();

        let records = load_provinces(&conn, &config).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].metrics.doctors_physician - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_store_loads_no_provinces() {
        let (conn, config) = memory_store();
        assert!(load_provinces(&conn, &config).unwrap().is_empty());
    }

    #[test]
    fn fetch_from_missing_store_is_an_upstream_error() {
        let config = SourceConfig {
            path: std::env::temp_dir().join("adequacy_map_absent/store.duckdb"),
            ..SourceConfig::default()
        };
        assert!(matches!(fetch_provinces(&config), Err(DbError::DuckDb(_))));
    }
}
