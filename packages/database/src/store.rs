//! Connection management and writes for the source store.
//!
//! Boundaries are stored as `GeoJSON` `MultiPolygon` text (no spatial
//! extension). Metrics are stored as nullable `DOUBLE` columns so that an
//! absent source value stays absent until the loader rejects it.

use adequacy_map_province_models::MetricField;
use duckdb::types::Value;
use duckdb::{AccessMode, Config, Connection, params, params_from_iter};
use geo::{Geometry, MultiPolygon};

use crate::{DbError, SourceConfig};

/// A province boundary ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRow {
    pub province_key: String,
    pub province_name_th: String,
    pub geometry: MultiPolygon<f64>,
}

/// A raw metrics row ready to be written. `None` marks an absent value.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRow {
    pub province_key: String,
    /// One entry per [`MetricField`], in canonical order.
    pub values: Vec<(MetricField, Option<f64>)>,
}

impl MetricsRow {
    /// Returns the value of `field`, or `None` if it is absent.
    #[must_use]
    pub fn get(&self, field: MetricField) -> Option<f64> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, v)| *v)
    }
}

/// Opens (or creates) the store read-write and ensures the schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open(config: &SourceConfig) -> Result<Connection, DbError> {
    config.validate()?;
    crate::paths::ensure_parent_dir(&config.path)?;

    let conn = Connection::open(&config.path)?;
    create_schema(&conn, config)?;

    Ok(conn)
}

/// Opens an existing store read-only, as each dashboard request does.
///
/// # Errors
///
/// Returns [`DbError`] if the store does not exist or cannot be opened.
pub fn open_read_only(config: &SourceConfig) -> Result<Connection, DbError> {
    config.validate()?;
    let conn = Connection::open_with_flags(
        &config.path,
        Config::default().access_mode(AccessMode::ReadOnly)?,
    )?;
    Ok(conn)
}

/// Creates both source relations if they do not exist.
///
/// # Errors
///
/// Returns [`DbError`] if a statement fails.
pub fn create_schema(conn: &Connection, config: &SourceConfig) -> Result<(), DbError> {
    config.validate()?;
    conn.execute_batch(&format!(
        "{};\n{};",
        geometry_table_ddl("CREATE TABLE IF NOT EXISTS", &config.geometry_table),
        metrics_table_ddl("CREATE TABLE IF NOT EXISTS", &config.metrics_table),
    ))?;
    Ok(())
}

/// Replaces the boundary relation with `rows`.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError`] if serialization or any statement fails; the
/// previous contents are kept in that case.
pub fn replace_geometry(
    conn: &mut Connection,
    config: &SourceConfig,
    rows: &[GeometryRow],
) -> Result<u64, DbError> {
    config.validate()?;
    let table = &config.geometry_table;
    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "{};",
        geometry_table_ddl("CREATE OR REPLACE TABLE", table)
    ))?;

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} (province_key, province_name_th, geometry_geojson)
             VALUES (?, ?, ?)"
        ))?;
        for row in rows {
            let geojson =
                adequacy_map_spatial::to_geojson_string(&Geometry::MultiPolygon(row.geometry.clone()))
                    .map_err(|source| DbError::Geometry {
                        province_key: row.province_key.clone(),
                        source,
                    })?;
            stmt.execute(params![row.province_key, row.province_name_th, geojson])?;
        }
    }

    tx.commit()?;
    log::info!("Replaced {table} with {} boundaries", rows.len());
    Ok(rows.len() as u64)
}

/// Replaces the metrics relation with `rows`.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError`] if any statement fails; the previous contents are
/// kept in that case.
pub fn replace_metrics(
    conn: &mut Connection,
    config: &SourceConfig,
    rows: &[MetricsRow],
) -> Result<u64, DbError> {
    config.validate()?;
    let table = &config.metrics_table;
    let fields = MetricField::all();
    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "{};",
        metrics_table_ddl("CREATE OR REPLACE TABLE", table)
    ))?;

    {
        let columns: Vec<&str> = fields.iter().map(|f| f.column_name()).collect();
        let placeholders = vec!["?"; fields.len() + 1].join(", ");
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} (province_key, {}) VALUES ({placeholders})",
            columns.join(", ")
        ))?;

        for row in rows {
            let values = std::iter::once(Value::Text(row.province_key.clone())).chain(
                fields
                    .iter()
                    .map(|f| row.get(*f).map_or(Value::Null, Value::Double)),
            );
            stmt.execute(params_from_iter(values))?;
        }
    }

    tx.commit()?;
    log::info!("Replaced {table} with {} metric rows", rows.len());
    Ok(rows.len() as u64)
}

/// Counts the rows of a configured relation.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn count_rows(conn: &Connection, table: &str) -> Result<u64, DbError> {
    let count: i64 = conn
        .prepare(&format!("SELECT COUNT(*) FROM {table}"))?
        .query_row([], |row| row.get(0))?;

    #[allow(clippy::cast_sign_loss)]
    Ok(count.max(0) as u64)
}

fn geometry_table_ddl(create: &str, table: &str) -> String {
    format!(
        "{create} {table} (
            province_key TEXT NOT NULL,
            province_name_th TEXT NOT NULL,
            geometry_geojson TEXT NOT NULL
        )"
    )
}

fn metrics_table_ddl(create: &str, table: &str) -> String {
    let columns: Vec<String> = MetricField::all()
        .iter()
        .map(|f| format!("            {} DOUBLE", f.column_name()))
        .collect();
    format!(
        "{create} {table} (
            province_key TEXT NOT NULL,
{}
        )",
        columns.join(",\n")
    )
}
