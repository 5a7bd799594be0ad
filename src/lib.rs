//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! OGC Simple Features geometries with text and binary codecs.
//!
//! - Point, LineString, Polygon, their Multi variants and GeometryCollection
//! - WKT 1.1/1.2 and EWKT
//! - WKB 1.1/1.2 and EWKB, in either byte order and as hex
//! - a fixed decimal precision model applied to every ordinate
//!
//! ```rust
//! use sfgeom::{CoordinateSystem, GeometryFactory, PrecisionModel};
//!
//! let factory = GeometryFactory::new(
//!     CoordinateSystem::new(4326, false, false),
//!     PrecisionModel::default(),
//! );
//! let line = factory.create("LINESTRING(0 0,1.00000001 1)").unwrap();
//! assert_eq!(
//!     factory.as_text(&line, true).unwrap(),
//!     "SRID=4326;LINESTRING(0 0,1 1)"
//! );
//!
//! let ewkb = factory.as_binary(&line, true).unwrap();
//! assert_eq!(factory.create(&ewkb).unwrap(), line);
//! ```
//!
//! Every geometry is bound to the context of the factory that created it. Geometries from
//! another factory are copied over by passing them to [`GeometryFactory::create`]:
//!
//! ```rust
//! # use sfgeom::{CoordinateSystem, GeometryFactory, PrecisionModel};
//! let xy = GeometryFactory::default();
//! let xyz = GeometryFactory::new(CoordinateSystem::new(-1, true, false), PrecisionModel::default());
//! let point = xy.create("POINT(1 2)").unwrap();
//! assert_eq!(xyz.create(&point).unwrap().to_string(), "POINT Z(1 2 NaN)");
//! ```

pub mod error;
mod types;
pub use types::{Coordinate, CoordinateSystem, GeometryType, Ordinate, SpatialContext};
mod precision;
pub use precision::{PrecisionModel, RoundingMode};
mod geometry;
pub use geometry::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
mod normalized;
pub use normalized::{Body, Coordinates, NormalizedGeometry, Position, MAX_DEPTH};
pub mod wkb;
pub mod wkt;
mod factory;
pub use factory::{
    CloneBuilder, FactoryConfig, GeometryBuilder, GeometryFactory, Input, NormalizedBuilder,
    SerializedBuilder,
};
mod engine;
pub use engine::{SpatialEngine, UnsupportedEngine};
pub use error::{Error, Result};
