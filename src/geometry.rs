//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! The typed geometry tree.
//!
//! Every geometry is bound to one [`SpatialContext`] for its whole life. Children handed
//! over from another context are rebuilt under the receiving context.

use crate::error::{Error, Result};
use crate::normalized::NormalizedGeometry;
use crate::types::{Coordinate, CoordinateSystem, GeometryType, Ordinate, SpatialContext};
use crate::wkb::WkbWriter;
use crate::wkt::{self, WktVersion};
use bytes::Bytes;
use std::fmt;
use std::slice::Iter;
use std::sync::Arc;

/// Keyed ordinate values. Only the ordinates the target coordinate system supports are kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Coord {
    pub fn xy(x: f64, y: f64) -> Self {
        Coord {
            x,
            y,
            z: None,
            m: None,
        }
    }
}

fn out_of_range(index: usize, len: usize) -> Error {
    Error::OutOfRange { index, len }
}

fn same_context(a: &Arc<SpatialContext>, b: &Arc<SpatialContext>) -> bool {
    Arc::ptr_eq(a, b) || a == b
}

// --- Point

/// A single location. Unset ordinates hold NaN.
#[derive(Clone, Debug)]
pub struct Point {
    context: Arc<SpatialContext>,
    ordinates: Vec<f64>,
}

impl Point {
    /// Builds a point from positional values `[x, y, z, m]`.
    ///
    /// When the coordinate system is measured but not 3-D and no fourth value is given, the
    /// third value is taken as `m`. This keeps `[x, y, m]` positions of XYM geometries intact.
    pub fn new(context: &Arc<SpatialContext>, values: &[f64]) -> Self {
        let crs = context.crs;
        let at = |i: usize| values.get(i).copied().unwrap_or(f64::NAN);
        let mut ordinates = vec![at(0), at(1)];
        if crs.is_3d {
            ordinates.push(at(2));
        }
        if crs.is_measured {
            let m = match values.get(3) {
                Some(m) => *m,
                None if !crs.is_3d => at(2),
                None => f64::NAN,
            };
            ordinates.push(m);
        }
        Self::with_ordinates(context, ordinates)
    }

    /// Builds a point from named ordinates, without any positional fallback.
    pub fn from_coord(context: &Arc<SpatialContext>, coord: Coord) -> Self {
        let crs = context.crs;
        let mut ordinates = vec![coord.x, coord.y];
        if crs.is_3d {
            ordinates.push(coord.z.unwrap_or(f64::NAN));
        }
        if crs.is_measured {
            ordinates.push(coord.m.unwrap_or(f64::NAN));
        }
        Self::with_ordinates(context, ordinates)
    }

    pub fn empty(context: &Arc<SpatialContext>) -> Self {
        Point {
            context: context.clone(),
            ordinates: vec![f64::NAN; context.crs.coordinate_dimension()],
        }
    }

    fn with_ordinates(context: &Arc<SpatialContext>, ordinates: Vec<f64>) -> Self {
        let precision = &context.precision;
        Point {
            context: context.clone(),
            ordinates: ordinates
                .into_iter()
                .map(|v| precision.make_precise(v))
                .collect(),
        }
    }

    pub fn context(&self) -> &Arc<SpatialContext> {
        &self.context
    }

    /// Ordinate values in `x, y[, z][, m]` order.
    pub fn ordinates(&self) -> &[f64] {
        &self.ordinates
    }

    pub fn has_ordinate(&self, ordinate: Ordinate) -> bool {
        self.context.crs.has_ordinate(ordinate)
    }

    pub fn ordinate(&self, ordinate: Ordinate) -> Result<f64> {
        self.context
            .crs
            .slot(ordinate)
            .map(|i| self.ordinates[i])
            .ok_or(Error::CoordinateUnsupported(ordinate))
    }

    pub fn set_ordinate(&mut self, ordinate: Ordinate, value: f64) -> Result<()> {
        let slot = self
            .context
            .crs
            .slot(ordinate)
            .ok_or(Error::CoordinateUnsupported(ordinate))?;
        self.ordinates[slot] = self.context.precision.make_precise(value);
        Ok(())
    }

    /// Resets an ordinate to NaN.
    pub fn clear_ordinate(&mut self, ordinate: Ordinate) -> Result<()> {
        self.set_ordinate(ordinate, f64::NAN)
    }

    pub fn x(&self) -> f64 {
        self.ordinates[0]
    }

    pub fn y(&self) -> f64 {
        self.ordinates[1]
    }

    pub fn z(&self) -> Result<f64> {
        self.ordinate(Ordinate::Z)
    }

    pub fn m(&self) -> Result<f64> {
        self.ordinate(Ordinate::M)
    }

    pub fn set_x(&mut self, x: f64) {
        self.ordinates[0] = self.context.precision.make_precise(x);
    }

    pub fn set_y(&mut self, y: f64) {
        self.ordinates[1] = self.context.precision.make_precise(y);
    }

    pub fn set_z(&mut self, z: f64) -> Result<()> {
        self.set_ordinate(Ordinate::Z, z)
    }

    pub fn set_m(&mut self, m: f64) -> Result<()> {
        self.set_ordinate(Ordinate::M, m)
    }

    pub fn coord(&self) -> Coord {
        Coord {
            x: self.x(),
            y: self.y(),
            z: self.z().ok(),
            m: self.m().ok(),
        }
    }

    pub fn dimension(&self) -> usize {
        0
    }

    pub fn is_empty(&self) -> bool {
        self.x().is_nan() || self.y().is_nan()
    }

    pub(crate) fn rebind(self, context: &Arc<SpatialContext>) -> Self {
        if same_context(&self.context, context) {
            return self;
        }
        Point::from_coord(context, self.coord())
    }
}

impl Coordinate for Point {
    fn x(&self) -> f64 {
        Point::x(self)
    }
    fn y(&self) -> f64 {
        Point::y(self)
    }
    fn opt_z(&self) -> Option<f64> {
        self.z().ok()
    }
    fn opt_m(&self) -> Option<f64> {
        self.m().ok()
    }
}

/// NaN ordinates are unset values and compare equal to each other.
impl PartialEq for Point {
    fn eq(&self, other: &Point) -> bool {
        self.context == other.context
            && self.ordinates.len() == other.ordinates.len()
            && self
                .ordinates
                .iter()
                .zip(other.ordinates.iter())
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

// --- LineString

/// An ordered sequence of points with linear interpolation between them.
#[derive(Clone, Debug, PartialEq)]
pub struct LineString {
    context: Arc<SpatialContext>,
    points: Vec<Point>,
}

impl LineString {
    pub fn new(context: &Arc<SpatialContext>, points: Vec<Point>) -> Self {
        LineString {
            context: context.clone(),
            points: points.into_iter().map(|p| p.rebind(context)).collect(),
        }
    }

    pub fn context(&self) -> &Arc<SpatialContext> {
        &self.context
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> Iter<'_, Point> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    /// Replaces the point at `index`, returning the old one.
    pub fn set(&mut self, index: usize, point: Point) -> Result<Point> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, len))?;
        Ok(std::mem::replace(slot, point.rebind(&self.context)))
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point.rebind(&self.context));
    }

    pub fn insert(&mut self, index: usize, point: Point) -> Result<()> {
        if index > self.points.len() {
            return Err(out_of_range(index, self.points.len()));
        }
        self.points.insert(index, point.rebind(&self.context));
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Point> {
        if index >= self.points.len() {
            return Err(out_of_range(index, self.points.len()));
        }
        Ok(self.points.remove(index))
    }

    pub fn start_point(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn end_point(&self) -> Option<&Point> {
        self.points.last()
    }

    /// At least four points and the start point equals the end point.
    pub fn is_closed(&self) -> bool {
        self.points.len() >= 4 && self.start_point() == self.end_point()
    }

    /// Fewer than two points.
    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }

    pub fn dimension(&self) -> usize {
        1
    }

    pub(crate) fn rebind(self, context: &Arc<SpatialContext>) -> Self {
        if same_context(&self.context, context) {
            return self;
        }
        LineString::new(context, self.points)
    }
}

impl<'a> IntoIterator for &'a LineString {
    type Item = &'a Point;
    type IntoIter = Iter<'a, Point>;
    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

// --- Polygon

/// A planar surface: ring 0 is the exterior boundary, the remaining rings are holes.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    context: Arc<SpatialContext>,
    rings: Vec<LineString>,
}

impl Polygon {
    /// An empty `rings` vector yields a polygon with one empty exterior ring.
    pub fn new(context: &Arc<SpatialContext>, rings: Vec<LineString>) -> Self {
        let mut rings: Vec<LineString> = rings.into_iter().map(|r| r.rebind(context)).collect();
        if rings.is_empty() {
            rings.push(LineString::new(context, Vec::new()));
        }
        Polygon {
            context: context.clone(),
            rings,
        }
    }

    pub fn context(&self) -> &Arc<SpatialContext> {
        &self.context
    }

    pub fn exterior_ring(&self) -> &LineString {
        &self.rings[0]
    }

    pub fn interior_rings(&self) -> &[LineString] {
        &self.rings[1..]
    }

    pub fn num_interior_rings(&self) -> usize {
        self.rings.len() - 1
    }

    pub fn interior_ring_n(&self, index: usize) -> Option<&LineString> {
        self.interior_rings().get(index)
    }

    pub fn rings(&self) -> &[LineString] {
        &self.rings
    }

    pub fn iter(&self) -> Iter<'_, LineString> {
        self.rings.iter()
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn get(&self, index: usize) -> Option<&LineString> {
        self.rings.get(index)
    }

    pub fn set(&mut self, index: usize, ring: LineString) -> Result<LineString> {
        let len = self.rings.len();
        let slot = self
            .rings
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, len))?;
        Ok(std::mem::replace(slot, ring.rebind(&self.context)))
    }

    pub fn push(&mut self, ring: LineString) {
        self.rings.push(ring.rebind(&self.context));
    }

    /// Removing the only ring leaves an empty exterior ring behind.
    pub fn remove(&mut self, index: usize) -> Result<LineString> {
        if index >= self.rings.len() {
            return Err(out_of_range(index, self.rings.len()));
        }
        let ring = self.rings.remove(index);
        if self.rings.is_empty() {
            self.rings.push(LineString::new(&self.context, Vec::new()));
        }
        Ok(ring)
    }

    pub fn is_empty(&self) -> bool {
        self.exterior_ring().is_empty()
    }

    pub fn dimension(&self) -> usize {
        2
    }

    pub(crate) fn rebind(self, context: &Arc<SpatialContext>) -> Self {
        if same_context(&self.context, context) {
            return self;
        }
        Polygon::new(context, self.rings)
    }
}

impl<'a> IntoIterator for &'a Polygon {
    type Item = &'a LineString;
    type IntoIter = Iter<'a, LineString>;
    fn into_iter(self) -> Self::IntoIter {
        self.rings.iter()
    }
}

// --- GeometryCollection

/// A heterogeneous collection of geometries.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryCollection {
    context: Arc<SpatialContext>,
    geometries: Vec<Geometry>,
}

impl GeometryCollection {
    pub fn new(context: &Arc<SpatialContext>, geometries: Vec<Geometry>) -> Self {
        GeometryCollection {
            context: context.clone(),
            geometries: geometries.into_iter().map(|g| g.rebind(context)).collect(),
        }
    }

    pub fn context(&self) -> &Arc<SpatialContext> {
        &self.context
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn iter(&self) -> Iter<'_, Geometry> {
        self.geometries.iter()
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn get(&self, index: usize) -> Option<&Geometry> {
        self.geometries.get(index)
    }

    pub fn set(&mut self, index: usize, geometry: impl Into<Geometry>) -> Result<Geometry> {
        let len = self.geometries.len();
        let slot = self
            .geometries
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, len))?;
        Ok(std::mem::replace(slot, geometry.into().rebind(&self.context)))
    }

    pub fn push(&mut self, geometry: impl Into<Geometry>) {
        self.geometries.push(geometry.into().rebind(&self.context));
    }

    pub fn insert(&mut self, index: usize, geometry: impl Into<Geometry>) -> Result<()> {
        if index > self.geometries.len() {
            return Err(out_of_range(index, self.geometries.len()));
        }
        self.geometries
            .insert(index, geometry.into().rebind(&self.context));
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Geometry> {
        if index >= self.geometries.len() {
            return Err(out_of_range(index, self.geometries.len()));
        }
        Ok(self.geometries.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Largest dimension of the members, 0 when empty.
    pub fn dimension(&self) -> usize {
        self.geometries
            .iter()
            .map(Geometry::dimension)
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn rebind(self, context: &Arc<SpatialContext>) -> Self {
        if same_context(&self.context, context) {
            return self;
        }
        GeometryCollection::new(context, self.geometries)
    }
}

impl<'a> IntoIterator for &'a GeometryCollection {
    type Item = &'a Geometry;
    type IntoIter = Iter<'a, Geometry>;
    fn into_iter(self) -> Self::IntoIter {
        self.geometries.iter()
    }
}

// --- Homogeneous collections

macro_rules! homogeneous_collection {
    ($(#[$doc:meta])* $name:ident, $item:ident, $dimension:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            context: Arc<SpatialContext>,
            members: Vec<$item>,
        }

        impl $name {
            pub fn new(context: &Arc<SpatialContext>, members: Vec<$item>) -> Self {
                $name {
                    context: context.clone(),
                    members: members.into_iter().map(|m| m.rebind(context)).collect(),
                }
            }

            pub fn context(&self) -> &Arc<SpatialContext> {
                &self.context
            }

            pub fn members(&self) -> &[$item] {
                &self.members
            }

            pub fn iter(&self) -> Iter<'_, $item> {
                self.members.iter()
            }

            pub fn len(&self) -> usize {
                self.members.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.members.get(index)
            }

            fn accept(&self, geometry: Geometry) -> Result<$item> {
                match geometry {
                    Geometry::$item(member) => Ok(member.rebind(&self.context)),
                    other => Err(Error::TypeMismatch {
                        expected: GeometryType::$item,
                        found: other.geometry_type(),
                    }),
                }
            }

            /// Fails with [`Error::TypeMismatch`] unless `geometry` has the member type.
            pub fn push(&mut self, geometry: impl Into<Geometry>) -> Result<()> {
                let member = self.accept(geometry.into())?;
                self.members.push(member);
                Ok(())
            }

            pub fn insert(&mut self, index: usize, geometry: impl Into<Geometry>) -> Result<()> {
                if index > self.members.len() {
                    return Err(out_of_range(index, self.members.len()));
                }
                let member = self.accept(geometry.into())?;
                self.members.insert(index, member);
                Ok(())
            }

            pub fn set(&mut self, index: usize, geometry: impl Into<Geometry>) -> Result<$item> {
                let member = self.accept(geometry.into())?;
                let len = self.members.len();
                let slot = self
                    .members
                    .get_mut(index)
                    .ok_or_else(|| out_of_range(index, len))?;
                Ok(std::mem::replace(slot, member))
            }

            pub fn remove(&mut self, index: usize) -> Result<$item> {
                if index >= self.members.len() {
                    return Err(out_of_range(index, self.members.len()));
                }
                Ok(self.members.remove(index))
            }

            pub fn is_empty(&self) -> bool {
                self.members.is_empty()
            }

            pub fn dimension(&self) -> usize {
                $dimension
            }

            pub(crate) fn rebind(self, context: &Arc<SpatialContext>) -> Self {
                if same_context(&self.context, context) {
                    return self;
                }
                $name::new(context, self.members)
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = Iter<'a, $item>;
            fn into_iter(self) -> Self::IntoIter {
                self.members.iter()
            }
        }
    };
}

homogeneous_collection!(
    /// A collection of points.
    MultiPoint,
    Point,
    0
);
homogeneous_collection!(
    /// A collection of line strings.
    MultiLineString,
    LineString,
    1
);
homogeneous_collection!(
    /// A collection of polygons.
    MultiPolygon,
    Polygon,
    2
);

// --- Geometry

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

macro_rules! dispatch {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            Geometry::Point($g) => $body,
            Geometry::LineString($g) => $body,
            Geometry::Polygon($g) => $body,
            Geometry::MultiPoint($g) => $body,
            Geometry::MultiLineString($g) => $body,
            Geometry::MultiPolygon($g) => $body,
            Geometry::GeometryCollection($g) => $body,
        }
    };
}

macro_rules! variant_access {
    ($($variant:ident, $as_fn:ident);*) => {
        $(
            impl From<$variant> for Geometry {
                fn from(g: $variant) -> Geometry {
                    Geometry::$variant(g)
                }
            }

            impl Geometry {
                pub fn $as_fn(&self) -> Option<&$variant> {
                    match self {
                        Geometry::$variant(g) => Some(g),
                        _ => None,
                    }
                }
            }
        )*
    };
}

variant_access!(
    Point, as_point;
    LineString, as_line_string;
    Polygon, as_polygon;
    MultiPoint, as_multi_point;
    MultiLineString, as_multi_line_string;
    MultiPolygon, as_multi_polygon;
    GeometryCollection, as_geometry_collection
);

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    pub fn context(&self) -> &Arc<SpatialContext> {
        dispatch!(self, g => g.context())
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.context().crs
    }

    pub fn srid(&self) -> i32 {
        self.coordinate_system().srid
    }

    pub fn is_3d(&self) -> bool {
        self.coordinate_system().is_3d
    }

    pub fn is_measured(&self) -> bool {
        self.coordinate_system().is_measured
    }

    pub fn dimension(&self) -> usize {
        dispatch!(self, g => g.dimension())
    }

    pub fn is_empty(&self) -> bool {
        dispatch!(self, g => g.is_empty())
    }

    pub fn normalize(&self) -> NormalizedGeometry {
        NormalizedGeometry::from(self)
    }

    pub fn to_wkt(&self, version: WktVersion) -> Result<String> {
        wkt::write(&self.normalize(), version)
    }

    pub fn to_wkb(&self, writer: &WkbWriter) -> Result<Bytes> {
        writer.write(&self.normalize())
    }

    pub(crate) fn rebind(self, context: &Arc<SpatialContext>) -> Self {
        match self {
            Geometry::Point(g) => Geometry::Point(g.rebind(context)),
            Geometry::LineString(g) => Geometry::LineString(g.rebind(context)),
            Geometry::Polygon(g) => Geometry::Polygon(g.rebind(context)),
            Geometry::MultiPoint(g) => Geometry::MultiPoint(g.rebind(context)),
            Geometry::MultiLineString(g) => Geometry::MultiLineString(g.rebind(context)),
            Geometry::MultiPolygon(g) => Geometry::MultiPolygon(g.rebind(context)),
            Geometry::GeometryCollection(g) => Geometry::GeometryCollection(g.rebind(context)),
        }
    }
}

/// Renders well-known text v1.2.
impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = self.to_wkt(WktVersion::V1_2).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::PrecisionModel;

    fn context(is_3d: bool, is_measured: bool) -> Arc<SpatialContext> {
        Arc::new(SpatialContext::new(
            CoordinateSystem::new(4326, is_3d, is_measured),
            PrecisionModel::default(),
        ))
    }

    fn line(ctx: &Arc<SpatialContext>, coords: &[[f64; 2]]) -> LineString {
        LineString::new(ctx, coords.iter().map(|c| Point::new(ctx, c)).collect())
    }

    #[test]
    fn point_from_positions() {
        let ctx = context(true, true);
        let p = Point::new(&ctx, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(p.ordinates(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(p.z().unwrap(), 3.0);
        assert_eq!(p.m().unwrap(), 4.0);
        assert!(!p.is_empty());
    }

    #[test]
    fn point_applies_precision() {
        let ctx = context(false, false);
        let mut p = Point::new(&ctx, &[29.12345697842, -85.12875423]);
        assert_eq!(p.x(), 29.123457);
        assert_eq!(p.y(), -85.128754);
        p.set_x(0.01299999999999);
        assert_eq!(p.x(), 0.013);
    }

    // XYM positions carry m in the third slot
    #[test]
    fn point_third_slot_is_m_without_z() {
        let ctx = context(false, true);
        let p = Point::new(&ctx, &[1.0, 2.0, 5.0]);
        assert_eq!(p.m().unwrap(), 5.0);
        assert!(matches!(p.z(), Err(Error::CoordinateUnsupported(Ordinate::Z))));

        // an explicit fourth slot wins
        let p = Point::new(&ctx, &[1.0, 2.0, 5.0, 6.0]);
        assert_eq!(p.m().unwrap(), 6.0);

        // with z available the third slot is z and m stays unset
        let ctx = context(true, true);
        let p = Point::new(&ctx, &[1.0, 2.0, 5.0]);
        assert_eq!(p.z().unwrap(), 5.0);
        assert!(p.m().unwrap().is_nan());
    }

    #[test]
    fn point_from_coord_has_no_fallback() {
        let ctx = context(false, true);
        let p = Point::from_coord(
            &ctx,
            Coord {
                x: 1.0,
                y: 2.0,
                z: Some(5.0),
                m: None,
            },
        );
        assert!(p.m().unwrap().is_nan());
    }

    #[test]
    fn unsupported_ordinates() {
        let ctx = context(false, false);
        let mut p = Point::new(&ctx, &[1.0, 2.0]);
        assert!(matches!(p.set_z(1.0), Err(Error::CoordinateUnsupported(Ordinate::Z))));
        assert!(matches!(p.m(), Err(Error::CoordinateUnsupported(Ordinate::M))));
        assert!(!p.has_ordinate(Ordinate::M));
        assert_eq!(p.opt_z(), None);
    }

    #[test]
    fn empty_point() {
        let ctx = context(false, false);
        let mut p = Point::empty(&ctx);
        assert!(p.is_empty());
        p.set_x(1.0);
        assert!(p.is_empty());
        p.set_y(1.0);
        assert!(!p.is_empty());
        p.clear_ordinate(Ordinate::Y).unwrap();
        assert!(p.is_empty());
        assert_eq!(Point::empty(&ctx), Point::new(&ctx, &[]));
    }

    #[test]
    fn line_string_accessors() {
        let ctx = context(false, false);
        let mut ls = line(&ctx, &[[0.0, 0.0], [1.0, 1.0], [1.0, 0.0]]);
        assert_eq!(ls.len(), 3);
        assert_eq!(ls.start_point().unwrap().x(), 0.0);
        assert_eq!(ls.end_point().unwrap().y(), 0.0);
        assert!(!ls.is_closed());
        ls.push(Point::new(&ctx, &[0.0, 0.0]));
        assert!(ls.is_closed());

        let old = ls.set(1, Point::new(&ctx, &[2.0, 2.0])).unwrap();
        assert_eq!(old.x(), 1.0);
        assert_eq!(ls.get(1).unwrap().x(), 2.0);
        assert!(matches!(
            ls.remove(9),
            Err(Error::OutOfRange { index: 9, len: 4 })
        ));
        ls.remove(0).unwrap();
        assert!(!ls.is_closed());
        assert!(ls.get(3).is_none());
    }

    #[test]
    fn line_string_emptiness() {
        let ctx = context(false, false);
        assert!(line(&ctx, &[]).is_empty());
        assert!(line(&ctx, &[[1.0, 1.0]]).is_empty());
        assert!(!line(&ctx, &[[1.0, 1.0], [2.0, 2.0]]).is_empty());
    }

    #[test]
    fn polygon_rings() {
        let ctx = context(false, false);
        let shell = line(&ctx, &[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]]);
        let hole = line(&ctx, &[[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]]);
        let mut polygon = Polygon::new(&ctx, vec![shell.clone(), hole.clone()]);
        assert_eq!(polygon.exterior_ring(), &shell);
        assert_eq!(polygon.num_interior_rings(), 1);
        assert_eq!(polygon.interior_ring_n(0), Some(&hole));
        assert!(polygon.interior_ring_n(1).is_none());
        assert!(!polygon.is_empty());

        polygon.remove(1).unwrap();
        polygon.remove(0).unwrap();
        assert_eq!(polygon.len(), 1);
        assert!(polygon.is_empty());
    }

    #[test]
    fn polygon_always_has_a_ring() {
        let ctx = context(false, false);
        let polygon = Polygon::new(&ctx, Vec::new());
        assert_eq!(polygon.len(), 1);
        assert!(polygon.is_empty());
        assert_eq!(polygon.dimension(), 2);
    }

    #[test]
    fn multi_point_rejects_other_types() {
        let ctx = context(false, false);
        let mut mp = MultiPoint::new(&ctx, Vec::new());
        mp.push(Point::new(&ctx, &[1.0, 2.0])).unwrap();
        assert_eq!(mp.len(), 1);
        let err = mp.push(Polygon::new(&ctx, Vec::new())).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: GeometryType::Point,
                found: GeometryType::Polygon
            }
        ));
        assert_eq!(mp.len(), 1);
    }

    #[test]
    fn multi_line_string_and_polygon_checks() {
        let ctx = context(false, false);
        let mut mls = MultiLineString::new(&ctx, Vec::new());
        assert!(mls.push(Point::new(&ctx, &[1.0, 2.0])).is_err());
        mls.push(line(&ctx, &[[0.0, 0.0], [1.0, 1.0]])).unwrap();
        assert_eq!(mls.dimension(), 1);

        let mut mpoly = MultiPolygon::new(&ctx, Vec::new());
        assert!(matches!(
            mpoly.insert(0, line(&ctx, &[])),
            Err(Error::TypeMismatch {
                expected: GeometryType::Polygon,
                found: GeometryType::LineString
            })
        ));
        mpoly.insert(0, Polygon::new(&ctx, Vec::new())).unwrap();
        assert_eq!(mpoly.dimension(), 2);
        assert!(!mpoly.is_empty());
    }

    #[test]
    fn collection_dimension() {
        let ctx = context(false, false);
        let mut gc = GeometryCollection::new(&ctx, Vec::new());
        assert_eq!(gc.dimension(), 0);
        assert!(gc.is_empty());
        gc.push(Point::new(&ctx, &[1.0, 1.0]));
        gc.push(line(&ctx, &[[0.0, 0.0], [1.0, 1.0]]));
        assert_eq!(gc.dimension(), 1);
        gc.insert(0, Polygon::new(&ctx, Vec::new())).unwrap();
        assert_eq!(gc.dimension(), 2);
        assert_eq!(gc.get(0).unwrap().geometry_type(), GeometryType::Polygon);
        let removed = gc.remove(0).unwrap();
        assert!(removed.as_polygon().is_some());
        assert_eq!(gc.len(), 2);
    }

    #[test]
    fn foreign_children_are_rebound() {
        let target = context(true, false);
        let other = context(false, true);
        let foreign = Point::new(&other, &[1.1234567, 2.0, 3.0]);
        let mut ls = LineString::new(&target, Vec::new());
        ls.push(foreign);
        let p = ls.get(0).unwrap();
        assert_eq!(p.context(), &target);
        assert_eq!(p.x(), 1.123457);
        assert!(p.z().unwrap().is_nan());
        assert!(p.m().is_err());
    }

    #[test]
    fn geometry_accessors() {
        let ctx = context(true, false);
        let g = Geometry::from(Point::new(&ctx, &[1.0, 2.0, 3.0]));
        assert_eq!(g.geometry_type(), GeometryType::Point);
        assert_eq!(g.srid(), 4326);
        assert!(g.is_3d());
        assert!(!g.is_measured());
        assert_eq!(g.dimension(), 0);
        assert!(g.as_line_string().is_none());
        assert_eq!(g.to_string(), "POINT Z(1 2 3)");
    }
}
