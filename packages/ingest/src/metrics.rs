//! Raw adequacy metrics loading from CSV.

use std::collections::BTreeMap;
use std::io::Read;

use adequacy_map_database::store::MetricsRow;
use adequacy_map_province_models::MetricField;

use crate::{IngestError, mapping::SchemaMapping};

/// Reads metrics rows from CSV.
///
/// Headers are normalized and renamed through `mapping`; columns that do
/// not map to a metric are ignored. Empty cells are kept as absent values.
/// Rows with an empty province key are skipped.
///
/// # Errors
///
/// * [`IngestError::MissingColumn`] if the key column or a metric column is
///   absent after renaming
/// * [`IngestError::InvalidNumber`] if a cell is not a number
/// * [`IngestError::Csv`] if the input is not valid CSV
pub fn read_metrics(
    reader: impl Read,
    mapping: &SchemaMapping,
) -> Result<Vec<MetricsRow>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| mapping.canonical_name(h))
        .collect();

    let mut positions = BTreeMap::new();
    for (i, header) in headers.iter().enumerate() {
        positions.entry(header.as_str()).or_insert(i);
    }
    let require = |column: &str| {
        positions
            .get(column)
            .copied()
            .ok_or_else(|| IngestError::MissingColumn {
                column: column.to_string(),
            })
    };

    let key_col = require(&mapping.key_column)?;
    let metric_cols = MetricField::all()
        .into_iter()
        .map(|field| require(field.column_name()).map(|i| (field, i)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let province_key = record.get(key_col).unwrap_or_default();
        if province_key.is_empty() {
            log::warn!("Row {} has no province key; skipping", line + 2);
            continue;
        }

        let values = metric_cols
            .iter()
            .map(|&(field, col)| {
                let cell = record.get(col).unwrap_or_default();
                parse_number(cell)
                    .map(|value| (field, value))
                    .ok_or_else(|| IngestError::InvalidNumber {
                        province_key: province_key.to_string(),
                        column: field.column_name().to_string(),
                        value: cell.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let absent = values.iter().filter(|(_, v)| v.is_none()).count();
        if absent > 0 {
            log::debug!("Province {province_key} has {absent} empty metric cell(s)");
        }

        rows.push(MetricsRow {
            province_key: province_key.to_string(),
            values,
        });
    }

    log::info!("Read {} metric rows", rows.len());
    Ok(rows)
}

/// Parses a spreadsheet number, tolerating thousands separators.
///
/// Returns `Some(None)` for an empty cell and `None` if the text is not a
/// finite number.
fn parse_number(cell: &str) -> Option<Option<f64>> {
    let cleaned: String = cell
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return Some(None);
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
}
