//! Embedded schema mapping for the metrics sheet.
//!
//! The source sheet uses bilingual headers (an English group prefix with a
//! Thai measure name). The mapping is compiled into the binary from
//! `mappings/adequacy_raw.toml`.

use std::collections::BTreeMap;

use serde::Deserialize;

const ADEQUACY_RAW_TOML: &str = include_str!("../mappings/adequacy_raw.toml");

/// Header renames for one tabular source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemaMapping {
    /// Normalized header of the column holding the province key.
    pub key_column: String,
    /// Normalized source header to canonical column name.
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
}

impl SchemaMapping {
    /// Returns the canonical name for a raw source header.
    ///
    /// Headers without a mapping entry keep their normalized form.
    #[must_use]
    pub fn canonical_name(&self, header: &str) -> String {
        let normalized = normalize_header(header);
        self.columns
            .get(&normalized)
            .cloned()
            .unwrap_or(normalized)
    }
}

/// Returns the mapping for the adequacy metrics sheet.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. It is a compile-time
/// constant, so a failure is a development error caught by tests.
#[must_use]
pub fn adequacy_raw() -> SchemaMapping {
    toml::de::from_str(ADEQUACY_RAW_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse schema mapping 'adequacy_raw': {e}"))
}

/// Trims a header and replaces inner spaces with underscores.
#[must_use]
pub fn normalize_header(header: &str) -> String {
    header.trim().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use adequacy_map_province_models::{MetricField, MetricGroup};

    use super::*;

    #[test]
    fn maps_every_metric_column() {
        let mapping = adequacy_raw();
        let targets: BTreeSet<&str> = mapping.columns.values().map(String::as_str).collect();

        for field in MetricField::all() {
            assert!(
                targets.contains(field.column_name()),
                "No source header maps to {}",
                field.column_name()
            );
        }
        assert_eq!(
            mapping.columns.len(),
            MetricField::all().len(),
            "Every mapping entry should target a distinct metric column"
        );
    }

    #[test]
    fn mapping_targets_match_their_source_group() {
        let mapping = adequacy_raw();
        for (header, target) in &mapping.columns {
            let field: MetricField = target.parse().unwrap();
            let prefix = match field.group() {
                MetricGroup::Staffing => "doctors_",
                MetricGroup::Equipment => "equipment_",
                MetricGroup::Insurance => "insurance_",
                MetricGroup::Utilization => "opd_ipd_",
                MetricGroup::Elderly => "elderly_",
            };
            assert!(header.starts_with(prefix), "{header} -> {target}");
        }
    }

    #[test]
    fn normalizes_before_renaming() {
        let mapping = adequacy_raw();
        assert_eq!(mapping.key_column, "ProvinceKey");
        assert_eq!(
            mapping.canonical_name("  equipment_รถพยาบาล "),
            "equip_ambulance"
        );
        assert_eq!(mapping.canonical_name("Province Name"), "Province_Name");
    }
}
