//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! Format-neutral intermediate form shared by the codecs and the factory.

use crate::error::{Error, Result};
use crate::geometry::{Geometry, LineString, Polygon};
use crate::types::{CoordinateSystem, GeometryType};

/// Deepest geometry nesting the decoders accept. The outermost geometry is level 1.
pub const MAX_DEPTH: usize = 128;

/// Ordinate values in `x, y[, z][, m]` order.
pub type Position = Vec<f64>;

/// Nested position lists, shaped per geometry type.
#[derive(Clone, Debug, PartialEq)]
pub enum Coordinates {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
    MultiPoint(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Coordinates {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Coordinates::Point(_) => GeometryType::Point,
            Coordinates::LineString(_) => GeometryType::LineString,
            Coordinates::Polygon(_) => GeometryType::Polygon,
            Coordinates::MultiPoint(_) => GeometryType::MultiPoint,
            Coordinates::MultiLineString(_) => GeometryType::MultiLineString,
            Coordinates::MultiPolygon(_) => GeometryType::MultiPolygon,
        }
    }

    /// True when the positions describe an empty geometry of their type.
    fn is_empty(&self) -> bool {
        match self {
            Coordinates::Point(p) => p.len() < 2 || p[0].is_nan() || p[1].is_nan(),
            Coordinates::LineString(ps) => ps.is_empty(),
            Coordinates::Polygon(rings) => rings.first().map_or(true, |r| r.is_empty()),
            Coordinates::MultiPoint(ps) => ps.is_empty(),
            Coordinates::MultiLineString(ls) => ls.is_empty(),
            Coordinates::MultiPolygon(ps) => ps.is_empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Empty,
    Coordinates(Coordinates),
    /// Members of a geometry collection.
    Geometries(Vec<NormalizedGeometry>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedGeometry {
    pub geometry_type: GeometryType,
    pub crs: CoordinateSystem,
    pub body: Body,
}

fn describe(body: &Body) -> String {
    match body {
        Body::Empty => "empty body".into(),
        Body::Coordinates(c) => format!("{} coordinates", c.geometry_type()),
        Body::Geometries(_) => "member geometries".into(),
    }
}

impl NormalizedGeometry {
    /// Checks that `body` has the shape `geometry_type` requires.
    pub fn new(geometry_type: GeometryType, crs: CoordinateSystem, body: Body) -> Result<Self> {
        let fits = match &body {
            Body::Empty => true,
            Body::Coordinates(c) => c.geometry_type() == geometry_type,
            Body::Geometries(_) => geometry_type == GeometryType::GeometryCollection,
        };
        if !fits {
            return Err(Error::UnexpectedType {
                expected: geometry_type.to_string(),
                found: describe(&body),
            });
        }
        Ok(NormalizedGeometry {
            geometry_type,
            crs,
            body,
        })
    }

    pub fn empty(geometry_type: GeometryType, crs: CoordinateSystem) -> Self {
        NormalizedGeometry {
            geometry_type,
            crs,
            body: Body::Empty,
        }
    }

    /// Empty position lists collapse to [`Body::Empty`].
    pub fn from_coordinates(crs: CoordinateSystem, coordinates: Coordinates) -> Self {
        let geometry_type = coordinates.geometry_type();
        let body = if coordinates.is_empty() {
            Body::Empty
        } else {
            Body::Coordinates(coordinates)
        };
        NormalizedGeometry {
            geometry_type,
            crs,
            body,
        }
    }

    pub fn collection(crs: CoordinateSystem, geometries: Vec<NormalizedGeometry>) -> Self {
        let body = if geometries.is_empty() {
            Body::Empty
        } else {
            Body::Geometries(geometries)
        };
        NormalizedGeometry {
            geometry_type: GeometryType::GeometryCollection,
            crs,
            body,
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.body {
            Body::Empty => true,
            Body::Coordinates(c) => c.is_empty(),
            Body::Geometries(gs) => gs.is_empty(),
        }
    }
}

fn line_positions(line: &LineString) -> Vec<Position> {
    line.iter().map(|p| p.ordinates().to_vec()).collect()
}

fn polygon_positions(polygon: &Polygon) -> Vec<Vec<Position>> {
    polygon.iter().map(line_positions).collect()
}

impl From<&Geometry> for NormalizedGeometry {
    fn from(geometry: &Geometry) -> Self {
        let crs = *geometry.coordinate_system();
        if geometry.is_empty() {
            return NormalizedGeometry::empty(geometry.geometry_type(), crs);
        }
        let coordinates = match geometry {
            Geometry::Point(p) => Coordinates::Point(p.ordinates().to_vec()),
            Geometry::LineString(ls) => Coordinates::LineString(line_positions(ls)),
            Geometry::Polygon(p) => Coordinates::Polygon(polygon_positions(p)),
            Geometry::MultiPoint(mp) => {
                Coordinates::MultiPoint(mp.iter().map(|p| p.ordinates().to_vec()).collect())
            }
            Geometry::MultiLineString(mls) => {
                Coordinates::MultiLineString(mls.iter().map(line_positions).collect())
            }
            Geometry::MultiPolygon(mp) => {
                Coordinates::MultiPolygon(mp.iter().map(polygon_positions).collect())
            }
            Geometry::GeometryCollection(gc) => {
                return NormalizedGeometry::collection(
                    crs,
                    gc.iter().map(NormalizedGeometry::from).collect(),
                )
            }
        };
        NormalizedGeometry {
            geometry_type: geometry.geometry_type(),
            crs,
            body: Body::Coordinates(coordinates),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryCollection, Point};
    use crate::types::SpatialContext;
    use std::sync::Arc;

    fn context() -> Arc<SpatialContext> {
        Arc::new(SpatialContext {
            crs: CoordinateSystem::new(4326, true, false),
            ..Default::default()
        })
    }

    #[test]
    fn shape_check() {
        let crs = CoordinateSystem::default();
        assert!(NormalizedGeometry::new(
            GeometryType::Point,
            crs,
            Body::Coordinates(Coordinates::Point(vec![1.0, 2.0]))
        )
        .is_ok());
        assert!(matches!(
            NormalizedGeometry::new(
                GeometryType::Polygon,
                crs,
                Body::Coordinates(Coordinates::Point(vec![1.0, 2.0]))
            ),
            Err(Error::UnexpectedType { .. })
        ));
        assert!(NormalizedGeometry::new(GeometryType::Point, crs, Body::Geometries(vec![])).is_err());
        assert!(NormalizedGeometry::new(GeometryType::MultiPolygon, crs, Body::Empty).is_ok());
    }

    #[test]
    fn empty_positions_collapse() {
        let crs = CoordinateSystem::default();
        let g = NormalizedGeometry::from_coordinates(crs, Coordinates::Point(vec![f64::NAN, 1.0]));
        assert_eq!(g.body, Body::Empty);
        assert_eq!(g.geometry_type, GeometryType::Point);
        let g = NormalizedGeometry::from_coordinates(crs, Coordinates::MultiPoint(vec![]));
        assert!(g.is_empty());
        assert_eq!(NormalizedGeometry::collection(crs, vec![]).body, Body::Empty);
    }

    #[test]
    fn normalize_tree() {
        let ctx = context();
        let ls = LineString::new(
            &ctx,
            vec![Point::new(&ctx, &[0.0, 0.0, 1.0]), Point::new(&ctx, &[1.0, 1.0, 2.0])],
        );
        let gc = GeometryCollection::new(
            &ctx,
            vec![Point::new(&ctx, &[5.0, 6.0, 7.0]).into(), ls.into()],
        );
        let n = NormalizedGeometry::from(&Geometry::from(gc));
        assert_eq!(n.geometry_type, GeometryType::GeometryCollection);
        assert_eq!(n.crs.srid, 4326);
        let Body::Geometries(members) = &n.body else {
            panic!("expected members");
        };
        assert_eq!(
            members[0].body,
            Body::Coordinates(Coordinates::Point(vec![5.0, 6.0, 7.0]))
        );
        assert_eq!(
            members[1].body,
            Body::Coordinates(Coordinates::LineString(vec![
                vec![0.0, 0.0, 1.0],
                vec![1.0, 1.0, 2.0]
            ]))
        );
    }

    #[test]
    fn normalize_empty() {
        let ctx = context();
        let n = NormalizedGeometry::from(&Geometry::from(Point::empty(&ctx)));
        assert_eq!(n.body, Body::Empty);
        let n = NormalizedGeometry::from(&Geometry::from(LineString::new(
            &ctx,
            vec![Point::new(&ctx, &[0.0, 0.0, 0.0])],
        )));
        assert_eq!(n.body, Body::Empty);
    }
}
