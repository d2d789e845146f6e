//! Boundary sequences for the map's line overlay.
//!
//! Each province boundary is flattened into one ordered coordinate list.
//! For a multi-polygon, every constituent polygon contributes its exterior
//! ring followed by a [`BoundaryPoint::Break`]; a bare polygon contributes
//! its exterior ring alone. Interior rings are not emitted: the overlay
//! draws solid outlines only.

use geo::{Geometry, Polygon};
use serde::ser::{Serialize, SerializeTuple, Serializer};

use crate::{SpatialError, geometry_type_name};

/// One entry of a boundary sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryPoint {
    /// A lon/lat coordinate, serialized as `[x, y]`.
    Coord {
        /// Longitude.
        x: f64,
        /// Latitude.
        y: f64,
    },
    /// Ring separator, serialized as `[null, null]`.
    Break,
}

impl BoundaryPoint {
    /// Returns `true` for the ring separator.
    #[must_use]
    pub const fn is_break(&self) -> bool {
        matches!(self, Self::Break)
    }
}

impl Serialize for BoundaryPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        match self {
            Self::Coord { x, y } => {
                tuple.serialize_element(x)?;
                tuple.serialize_element(y)?;
            }
            Self::Break => {
                tuple.serialize_element(&None::<f64>)?;
                tuple.serialize_element(&None::<f64>)?;
            }
        }
        tuple.end()
    }
}

/// Flattens a polygon or multi-polygon into a boundary sequence.
///
/// Polygons are visited in stored order and ring coordinates keep their
/// stored winding order, including the closing coordinate.
///
/// # Errors
///
/// Returns [`SpatialError::UnsupportedGeometryType`] for any geometry that
/// is not a polygon or multi-polygon.
pub fn project_boundary(geometry: &Geometry<f64>) -> Result<Vec<BoundaryPoint>, SpatialError> {
    match geometry {
        Geometry::MultiPolygon(mp) => {
            let capacity = mp.0.iter().map(|p| p.exterior().0.len() + 1).sum();
            let mut points = Vec::with_capacity(capacity);
            for polygon in &mp.0 {
                push_exterior(&mut points, polygon);
                points.push(BoundaryPoint::Break);
            }
            Ok(points)
        }
        Geometry::Polygon(polygon) => {
            let mut points = Vec::with_capacity(polygon.exterior().0.len());
            push_exterior(&mut points, polygon);
            Ok(points)
        }
        other => {
            let geometry_type = geometry_type_name(other);
            log::debug!("Refusing to project {geometry_type} boundary");
            Err(SpatialError::UnsupportedGeometryType { geometry_type })
        }
    }
}

fn push_exterior(points: &mut Vec<BoundaryPoint>, polygon: &Polygon<f64>) {
    points.extend(
        polygon
            .exterior()
            .coords()
            .map(|c| BoundaryPoint::Coord { x: c.x, y: c.y }),
    );
}

#[cfg(test)]
mod tests {
    use geo::{LineString, MultiPolygon, Point, polygon};

    use super::*;

    fn triangle(offset: f64) -> Polygon<f64> {
        polygon![
            (x: offset, y: offset),
            (x: offset + 1.0, y: offset),
            (x: offset, y: offset + 1.0),
        ]
    }

    #[test]
    fn multi_polygon_emits_one_break_per_ring() {
        let mp = MultiPolygon(vec![triangle(0.0), triangle(10.0), triangle(20.0)]);
        let points = project_boundary(&Geometry::MultiPolygon(mp)).unwrap();

        let breaks: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_break())
            .map(|(i, _)| i)
            .collect();
        // Each closed triangle ring has 3 vertices plus the closing coordinate.
        assert_eq!(breaks, vec![4, 9, 14]);
        assert_eq!(points.len(), 15);
    }

    #[test]
    fn two_triangles_flatten_to_rings_and_separators() {
        let mp = MultiPolygon(vec![triangle(0.0), triangle(5.0)]);
        let points = project_boundary(&Geometry::MultiPolygon(mp)).unwrap();

        assert_eq!(points.len(), 4 + 1 + 4 + 1);
        assert_eq!(points[0], BoundaryPoint::Coord { x: 0.0, y: 0.0 });
        assert_eq!(points[3], BoundaryPoint::Coord { x: 0.0, y: 0.0 });
        assert_eq!(points[4], BoundaryPoint::Break);
        assert_eq!(points[5], BoundaryPoint::Coord { x: 5.0, y: 5.0 });
        assert_eq!(points[9], BoundaryPoint::Break);
    }

    #[test]
    fn bare_polygon_has_no_breaks() {
        let points = project_boundary(&Geometry::Polygon(triangle(0.0))).unwrap();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| !p.is_break()));
    }

    #[test]
    fn interior_rings_are_skipped() {
        let exterior = LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = LineString::from(vec![(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)]);
        let with_hole = Polygon::new(exterior, vec![hole]);
        let mp = MultiPolygon(vec![with_hole]);

        let points = project_boundary(&Geometry::MultiPolygon(mp)).unwrap();
        assert_eq!(points.len(), 5 + 1);
        assert!(
            !points.contains(&BoundaryPoint::Coord { x: 2.0, y: 2.0 }),
            "hole coordinates leaked into the outline"
        );
    }

    #[test]
    fn preserves_stored_winding_order() {
        let clockwise = polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 0.0)];
        let points = project_boundary(&Geometry::Polygon(clockwise)).unwrap();
        assert_eq!(points[1], BoundaryPoint::Coord { x: 0.0, y: 1.0 });
        assert_eq!(points[2], BoundaryPoint::Coord { x: 1.0, y: 0.0 });
    }

    #[test]
    fn empty_multi_polygon_is_empty() {
        let points = project_boundary(&Geometry::MultiPolygon(MultiPolygon(vec![]))).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn rejects_point_geometry() {
        let err = project_boundary(&Geometry::Point(Point::new(100.0, 13.0))).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::UnsupportedGeometryType {
                geometry_type: "Point"
            }
        ));
    }

    #[test]
    fn serializes_break_as_null_pair() {
        let points = vec![BoundaryPoint::Coord { x: 100.5, y: 13.75 }, BoundaryPoint::Break];
        let json = serde_json::to_string(&points).unwrap();
        assert_eq!(json, "[[100.5,13.75],[null,null]]");
    }
}
