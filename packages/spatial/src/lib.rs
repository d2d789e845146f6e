#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Province boundary geometry handling.
//!
//! Province boundaries are stored as `GeoJSON` text in WGS84 lon/lat and
//! are always normalized to `MultiPolygon` form on ingest. This crate
//! parses them into [`geo`] geometries, enforces the polygonal invariant,
//! and projects each boundary into the flat coordinate sequence consumed by
//! the map's highlight overlay (see [`boundary`]).

pub mod boundary;

pub use boundary::{BoundaryPoint, project_boundary};

use geo::{Geometry, MultiPolygon};
use geojson::{Feature, GeoJson, JsonObject};
use thiserror::Error;

/// Errors that can occur while handling boundary geometry.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// `GeoJSON` text could not be parsed or converted.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The `GeoJSON` document was a feature or collection, not a geometry.
    #[error("Expected a GeoJSON geometry, found {found}")]
    NotAGeometry {
        /// Kind of `GeoJSON` object that was found instead.
        found: &'static str,
    },

    /// The geometry is neither a polygon nor a multi-polygon.
    #[error("Unsupported geometry type: {geometry_type}")]
    UnsupportedGeometryType {
        /// Name of the offending geometry variant.
        geometry_type: &'static str,
    },
}

/// Parses a `GeoJSON` geometry object into a [`Geometry`].
///
/// # Errors
///
/// Returns [`SpatialError`] if the text is not valid `GeoJSON` or is not a
/// bare geometry object.
pub fn parse_geometry(geojson_str: &str) -> Result<Geometry<f64>, SpatialError> {
    match geojson_str.parse::<GeoJson>()? {
        GeoJson::Geometry(geom) => Ok(Geometry::try_from(geom)?),
        GeoJson::Feature(_) => Err(SpatialError::NotAGeometry { found: "Feature" }),
        GeoJson::FeatureCollection(_) => Err(SpatialError::NotAGeometry {
            found: "FeatureCollection",
        }),
    }
}

/// Converts a polygonal geometry into a [`MultiPolygon`].
///
/// A single polygon is wrapped in a one-element collection.
///
/// # Errors
///
/// Returns [`SpatialError::UnsupportedGeometryType`] for any other variant.
pub fn ensure_multi_polygon(geometry: Geometry<f64>) -> Result<MultiPolygon<f64>, SpatialError> {
    match geometry {
        Geometry::MultiPolygon(mp) => Ok(mp),
        Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        other => Err(SpatialError::UnsupportedGeometryType {
            geometry_type: geometry_type_name(&other),
        }),
    }
}

/// Serializes a geometry to `GeoJSON` text.
///
/// # Errors
///
/// Returns [`SpatialError`] if serialization fails.
pub fn to_geojson_string(geometry: &Geometry<f64>) -> Result<String, SpatialError> {
    let geom = geojson::Geometry::new(geojson::Value::from(geometry));
    Ok(serde_json::to_string(&geom)?)
}

/// Builds a `GeoJSON` feature for a geometry with the given properties.
#[must_use]
pub fn to_feature(geometry: &Geometry<f64>, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Returns the `GeoJSON`-style type name of a geometry variant.
#[must_use]
pub const fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[100.0,13.0],[101.0,13.0],[101.0,14.0],[100.0,14.0],[100.0,13.0]]]}"#;

    #[test]
    fn parses_polygon() {
        let geometry = parse_geometry(SQUARE).unwrap();
        assert_eq!(geometry_type_name(&geometry), "Polygon");
    }

    #[test]
    fn parses_multi_polygon() {
        let text = r#"{"type":"MultiPolygon","coordinates":[
            [[[0.0,0.0],[1.0,0.0],[0.0,1.0],[0.0,0.0]]],
            [[[5.0,5.0],[6.0,5.0],[5.0,6.0],[5.0,5.0]]]
        ]}"#;
        let mp = ensure_multi_polygon(parse_geometry(text).unwrap()).unwrap();
        assert_eq!(mp.0.len(), 2);
    }

    #[test]
    fn rejects_feature_documents() {
        let text = format!(r#"{{"type":"Feature","properties":{{}},"geometry":{SQUARE}}}"#);
        let err = parse_geometry(&text).unwrap_err();
        assert!(matches!(err, SpatialError::NotAGeometry { found: "Feature" }));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            parse_geometry("not json"),
            Err(SpatialError::GeoJson(_))
        ));
    }

    #[test]
    fn wraps_single_polygon() {
        let mp = ensure_multi_polygon(parse_geometry(SQUARE).unwrap()).unwrap();
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].exterior().0.len(), 5);
    }

    #[test]
    fn rejects_non_polygonal_geometry() {
        let point = parse_geometry(r#"{"type":"Point","coordinates":[100.5,13.7]}"#).unwrap();
        let err = ensure_multi_polygon(point).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::UnsupportedGeometryType {
                geometry_type: "Point"
            }
        ));
    }

    #[test]
    fn geojson_string_roundtrips_multi_polygon() {
        let mp = ensure_multi_polygon(parse_geometry(SQUARE).unwrap()).unwrap();
        let text = to_geojson_string(&Geometry::MultiPolygon(mp.clone())).unwrap();
        assert!(text.contains("\"MultiPolygon\""));
        assert_eq!(parse_geometry(&text).unwrap(), Geometry::MultiPolygon(mp));
    }

    #[test]
    fn feature_carries_properties() {
        let mut props = JsonObject::new();
        props.insert("province_name_th".to_string(), "กรุงเทพมหานคร".into());
        let feature = to_feature(&parse_geometry(SQUARE).unwrap(), props);
        assert_eq!(
            feature.property("province_name_th").and_then(|v| v.as_str()),
            Some("กรุงเทพมหานคร")
        );
        assert!(feature.geometry.is_some());
    }
}
