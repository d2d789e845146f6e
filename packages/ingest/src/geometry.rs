//! Province boundary loading from a `GeoJSON` `FeatureCollection`.

use std::collections::{BTreeMap, BTreeSet};

use adequacy_map_database::store::GeometryRow;
use geojson::{Feature, FeatureCollection, GeoJson};

use crate::IngestError;

/// Default feature property holding the Thai province name.
pub const DEFAULT_NAME_PROPERTY: &str = "ADM1_TH";

/// Lookup from Thai province name to province key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvinceDictionary {
    keys: BTreeMap<String, String>,
}

impl ProvinceDictionary {
    /// Parses a JSON object of `name -> key`. Numeric keys are accepted
    /// and kept in their textual form.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if the text is not a JSON object of strings
    /// or numbers.
    pub fn from_json_str(json: &str) -> Result<Self, IngestError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;

        let keys = raw
            .into_iter()
            .map(|(name, value)| match value {
                serde_json::Value::String(key) => Ok((name, key)),
                serde_json::Value::Number(key) => Ok((name, key.to_string())),
                other => Err(IngestError::InvalidDictionaryEntry {
                    name,
                    value: other.to_string(),
                }),
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { keys })
    }

    /// Returns the key for a province name.
    #[must_use]
    pub fn key_for(&self, name: &str) -> Option<&str> {
        self.keys.get(name.trim()).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the dictionary has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Reads province boundaries from `GeoJSON` text.
///
/// Each feature's display name comes from `name_property` and is mapped to
/// a province key through `dictionary`. Polygons are wrapped into
/// multi-polygons. Features without a name, a known key, or a geometry are
/// skipped with a warning; a repeated key keeps its first feature.
///
/// # Errors
///
/// Returns [`IngestError`] if the text is not a `FeatureCollection` or a
/// feature's geometry is not polygonal.
pub fn read_boundaries(
    geojson_str: &str,
    dictionary: &ProvinceDictionary,
    name_property: &str,
) -> Result<Vec<GeometryRow>, IngestError> {
    let collection = match geojson_str.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(_) => {
            return Err(IngestError::NotAFeatureCollection { found: "Feature" });
        }
        GeoJson::Geometry(_) => {
            return Err(IngestError::NotAFeatureCollection { found: "Geometry" });
        }
    };

    let FeatureCollection { features, .. } = collection;
    let total = features.len();
    let mut seen = BTreeSet::new();
    let mut rows = Vec::with_capacity(total);

    for (i, feature) in features.into_iter().enumerate() {
        let Some(name) = feature_name(&feature, name_property) else {
            log::warn!("Feature {i} has no '{name_property}' property; skipping");
            continue;
        };
        let Some(key) = dictionary.key_for(&name) else {
            log::warn!("No province key for '{name}'; skipping");
            continue;
        };
        if !seen.insert(key.to_string()) {
            log::warn!("Province key {key} ('{name}') appears more than once; keeping the first");
            continue;
        }
        let Some(geometry) = feature.geometry else {
            log::warn!("Province {key} ('{name}') has no geometry; skipping");
            continue;
        };

        let geometry = geo::Geometry::<f64>::try_from(geometry)?;
        let multi_polygon = adequacy_map_spatial::ensure_multi_polygon(geometry).map_err(
            |source| IngestError::Geometry {
                province_key: key.to_string(),
                source,
            },
        )?;

        rows.push(GeometryRow {
            province_key: key.to_string(),
            province_name_th: name,
            geometry: multi_polygon,
        });
    }

    log::info!("Read {} of {total} province boundaries", rows.len());
    Ok(rows)
}

fn feature_name(feature: &Feature, name_property: &str) -> Option<String> {
    feature
        .property(name_property)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
}
