//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! Geometry construction under one spatial context.

use crate::engine::{SpatialEngine, UnsupportedEngine};
use crate::error::{Error, Result};
use crate::geometry::{
    Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
use crate::normalized::{Body, Coordinates, NormalizedGeometry, Position};
use crate::precision::{PrecisionModel, RoundingMode};
use crate::types::{CoordinateSystem, GeometryType, SpatialContext};
use crate::wkb::{WkbReader, WkbVersion, WkbWriter};
use crate::wkt::{self, WktVersion};
use bytes::Bytes;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Factory settings as they appear in application configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    pub srid: i32,
    #[serde(alias = "3d")]
    pub is_3d: bool,
    #[serde(alias = "measured")]
    pub is_measured: bool,
    pub precision: u32,
    pub rounding: RoundingMode,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        FactoryConfig {
            srid: CoordinateSystem::NO_SRID,
            is_3d: false,
            is_measured: false,
            precision: PrecisionModel::DEFAULT_PRECISION,
            rounding: RoundingMode::HalfUp,
        }
    }
}

/// Anything [`GeometryFactory::create`] can be asked to build from.
#[derive(Clone, Copy, Debug)]
pub enum Input<'a> {
    Normalized(&'a NormalizedGeometry),
    /// WKT, EWKT, or hex encoded WKB/EWKB.
    Text(&'a str),
    /// WKB or EWKB.
    Binary(&'a [u8]),
    /// A geometry, possibly from another factory.
    Geometry(&'a Geometry),
}

impl<'a> From<&'a NormalizedGeometry> for Input<'a> {
    fn from(n: &'a NormalizedGeometry) -> Self {
        Input::Normalized(n)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(s: &'a str) -> Self {
        Input::Text(s)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(s: &'a String) -> Self {
        Input::Text(s)
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(b: &'a [u8]) -> Self {
        Input::Binary(b)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        Input::Binary(b)
    }
}

impl<'a> From<&'a Bytes> for Input<'a> {
    fn from(b: &'a Bytes) -> Self {
        Input::Binary(b)
    }
}

impl<'a> From<&'a Geometry> for Input<'a> {
    fn from(g: &'a Geometry) -> Self {
        Input::Geometry(g)
    }
}

/// One strategy for turning an [`Input`] into a geometry.
///
/// `build` returns `None` when the input is not something the builder handles.
pub trait GeometryBuilder: Send + Sync {
    /// Registry key; a factory holds at most one builder per name.
    fn name(&self) -> &str;

    fn build(&self, factory: &GeometryFactory, input: &Input<'_>) -> Option<Geometry>;
}

/// Builds from a [`NormalizedGeometry`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizedBuilder;

impl GeometryBuilder for NormalizedBuilder {
    fn name(&self) -> &str {
        "normalized"
    }

    fn build(&self, factory: &GeometryFactory, input: &Input<'_>) -> Option<Geometry> {
        match *input {
            Input::Normalized(normalized) => factory
                .create_from_normalized(normalized)
                .map_err(|e| debug!("normalized input declined: {}", e))
                .ok(),
            _ => None,
        }
    }
}

/// Copies a geometry into the factory's context.
#[derive(Clone, Copy, Debug, Default)]
pub struct CloneBuilder;

impl GeometryBuilder for CloneBuilder {
    fn name(&self) -> &str {
        "clone"
    }

    fn build(&self, factory: &GeometryFactory, input: &Input<'_>) -> Option<Geometry> {
        match *input {
            Input::Geometry(geometry) => Some(geometry.clone().rebind(factory.context())),
            _ => None,
        }
    }
}

/// Sniffs the encoding: WKT 1.2, WKB 1.2, EWKT, then EWKB. Text is tried as hex for the
/// binary dialects.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerializedBuilder;

impl GeometryBuilder for SerializedBuilder {
    fn name(&self) -> &str {
        "serialized"
    }

    fn build(&self, factory: &GeometryFactory, input: &Input<'_>) -> Option<Geometry> {
        let wkb = WkbReader::new(WkbVersion::V1_2);
        let ewkb = WkbReader::new(WkbVersion::Extended);
        match *input {
            Input::Text(text) => attempt(factory, "wkt", || wkt::parse(text, WktVersion::V1_2))
                .or_else(|| attempt(factory, "wkb", || wkb.read_hex(text)))
                .or_else(|| attempt(factory, "ewkt", || wkt::parse(text, WktVersion::Extended)))
                .or_else(|| attempt(factory, "ewkb", || ewkb.read_hex(text))),
            Input::Binary(bytes) => attempt(factory, "wkb", || wkb.read(bytes))
                .or_else(|| attempt(factory, "ewkb", || ewkb.read(bytes))),
            _ => None,
        }
    }
}

fn attempt(
    factory: &GeometryFactory,
    format: &str,
    decode: impl FnOnce() -> Result<NormalizedGeometry>,
) -> Option<Geometry> {
    match decode().and_then(|n| factory.create_from_normalized(&n)) {
        Ok(geometry) => Some(geometry),
        Err(e) => {
            debug!("{} input declined: {}", format, e);
            None
        }
    }
}

/// Creates geometries bound to one [`SpatialContext`].
#[derive(Clone)]
pub struct GeometryFactory {
    context: Arc<SpatialContext>,
    builders: Vec<Arc<dyn GeometryBuilder>>,
    engine: Arc<dyn SpatialEngine>,
}

impl fmt::Debug for GeometryFactory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GeometryFactory")
            .field("context", &self.context)
            .field("builders", &self.builder_names())
            .finish()
    }
}

impl Default for GeometryFactory {
    fn default() -> Self {
        GeometryFactory::new(CoordinateSystem::default(), PrecisionModel::default())
    }
}

impl GeometryFactory {
    /// A factory with the stock builders and the [`UnsupportedEngine`].
    pub fn new(crs: CoordinateSystem, precision: PrecisionModel) -> Self {
        let mut factory = GeometryFactory {
            context: Arc::new(SpatialContext::new(crs, precision)),
            builders: Vec::new(),
            engine: Arc::new(UnsupportedEngine),
        };
        factory.register_builder(Arc::new(NormalizedBuilder));
        factory.register_builder(Arc::new(CloneBuilder));
        factory.register_builder(Arc::new(SerializedBuilder));
        factory
    }

    pub fn from_config(config: &FactoryConfig) -> Result<Self> {
        let precision = PrecisionModel::new(config.precision, config.rounding)?;
        let crs = CoordinateSystem::new(config.srid, config.is_3d, config.is_measured);
        Ok(GeometryFactory::new(crs, precision))
    }

    pub fn context(&self) -> &Arc<SpatialContext> {
        &self.context
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.context.crs
    }

    pub fn precision_model(&self) -> &PrecisionModel {
        &self.context.precision
    }

    // --- Builders

    /// Appends `builder` unless one with the same name is registered already.
    pub fn register_builder(&mut self, builder: Arc<dyn GeometryBuilder>) -> bool {
        if self.has_builder(builder.name()) {
            return false;
        }
        self.builders.push(builder);
        true
    }

    pub fn unregister_builder(&mut self, name: &str) -> bool {
        let len = self.builders.len();
        self.builders.retain(|b| b.name() != name);
        self.builders.len() != len
    }

    pub fn has_builder(&self, name: &str) -> bool {
        self.builders.iter().any(|b| b.name() == name)
    }

    pub fn builder_names(&self) -> Vec<&str> {
        self.builders.iter().map(|b| b.name()).collect()
    }

    /// Tries every registered builder in order and returns the first geometry built.
    pub fn create<'a>(&self, input: impl Into<Input<'a>>) -> Result<Geometry> {
        let input = input.into();
        for builder in &self.builders {
            if let Some(geometry) = builder.build(self, &input) {
                return Ok(geometry);
            }
            debug!("builder {} declined", builder.name());
        }
        Err(Error::BuildExhausted)
    }

    // --- Direct construction

    /// Builds the tree described by `normalized` under this factory's context. The
    /// coordinate system recorded in `normalized` is not used.
    pub fn create_from_normalized(&self, normalized: &NormalizedGeometry) -> Result<Geometry> {
        let geometry_type = normalized.geometry_type;
        match &normalized.body {
            Body::Empty => Ok(self.create_empty(geometry_type)),
            Body::Coordinates(coordinates) if coordinates.geometry_type() == geometry_type => {
                Ok(match coordinates {
                    Coordinates::Point(p) => self.create_point(p).into(),
                    Coordinates::LineString(ps) => self.create_line_string(ps).into(),
                    Coordinates::Polygon(rings) => self.create_polygon(rings).into(),
                    Coordinates::MultiPoint(ps) => self.create_multi_point(ps).into(),
                    Coordinates::MultiLineString(lines) => self.create_multi_line_string(lines).into(),
                    Coordinates::MultiPolygon(polygons) => self.create_multi_polygon(polygons).into(),
                })
            }
            Body::Geometries(members) if geometry_type == GeometryType::GeometryCollection => {
                Ok(self.create_geometry_collection(members)?.into())
            }
            body => Err(Error::UnexpectedType {
                expected: geometry_type.to_string(),
                found: match body {
                    Body::Coordinates(c) => format!("{} coordinates", c.geometry_type()),
                    _ => "member geometries".into(),
                },
            }),
        }
    }

    pub fn create_empty(&self, geometry_type: GeometryType) -> Geometry {
        let ctx = &self.context;
        match geometry_type {
            GeometryType::Point => Point::empty(ctx).into(),
            GeometryType::LineString => LineString::new(ctx, Vec::new()).into(),
            GeometryType::Polygon => Polygon::new(ctx, Vec::new()).into(),
            GeometryType::MultiPoint => MultiPoint::new(ctx, Vec::new()).into(),
            GeometryType::MultiLineString => MultiLineString::new(ctx, Vec::new()).into(),
            GeometryType::MultiPolygon => MultiPolygon::new(ctx, Vec::new()).into(),
            GeometryType::GeometryCollection => GeometryCollection::new(ctx, Vec::new()).into(),
        }
    }

    pub fn create_point(&self, position: &[f64]) -> Point {
        Point::new(&self.context, position)
    }

    pub fn create_line_string(&self, positions: &[Position]) -> LineString {
        LineString::new(
            &self.context,
            positions.iter().map(|p| self.create_point(p)).collect(),
        )
    }

    pub fn create_polygon(&self, rings: &[Vec<Position>]) -> Polygon {
        Polygon::new(
            &self.context,
            rings.iter().map(|r| self.create_line_string(r)).collect(),
        )
    }

    pub fn create_multi_point(&self, positions: &[Position]) -> MultiPoint {
        MultiPoint::new(
            &self.context,
            positions.iter().map(|p| self.create_point(p)).collect(),
        )
    }

    pub fn create_multi_line_string(&self, lines: &[Vec<Position>]) -> MultiLineString {
        MultiLineString::new(
            &self.context,
            lines.iter().map(|l| self.create_line_string(l)).collect(),
        )
    }

    pub fn create_multi_polygon(&self, polygons: &[Vec<Vec<Position>>]) -> MultiPolygon {
        MultiPolygon::new(
            &self.context,
            polygons.iter().map(|p| self.create_polygon(p)).collect(),
        )
    }

    pub fn create_geometry_collection(
        &self,
        members: &[NormalizedGeometry],
    ) -> Result<GeometryCollection> {
        let geometries = members
            .iter()
            .map(|m| self.create_from_normalized(m))
            .collect::<Result<Vec<_>>>()?;
        Ok(GeometryCollection::new(&self.context, geometries))
    }

    // --- Output

    /// WKT 1.2, or EWKT when `extended`.
    pub fn as_text(&self, geometry: &Geometry, extended: bool) -> Result<String> {
        let version = if extended {
            WktVersion::Extended
        } else {
            WktVersion::V1_2
        };
        geometry.to_wkt(version)
    }

    /// Little endian WKB 1.2, or EWKB when `extended`.
    pub fn as_binary(&self, geometry: &Geometry, extended: bool) -> Result<Bytes> {
        let version = if extended {
            WkbVersion::Extended
        } else {
            WkbVersion::V1_2
        };
        geometry.to_wkb(&WkbWriter::new(version))
    }

    // --- Spatial engine

    pub fn spatial_engine(&self) -> &dyn SpatialEngine {
        self.engine.as_ref()
    }

    pub fn with_engine(mut self, engine: Arc<dyn SpatialEngine>) -> Self {
        self.engine = engine;
        self
    }
}
