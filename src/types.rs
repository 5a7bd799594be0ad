//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

use crate::error::{Error, Result};
use crate::precision::PrecisionModel;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Read access to the ordinates of a position.
pub trait Coordinate {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn opt_z(&self) -> Option<f64> {
        None
    }
    fn opt_m(&self) -> Option<f64> {
        None
    }
}

/// The seven instantiable geometry kinds, valued by their well-known binary base code.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize,
)]
#[repr(u32)]
#[serde(rename_all = "lowercase")]
pub enum GeometryType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl GeometryType {
    pub const ALL: [GeometryType; 7] = [
        GeometryType::Point,
        GeometryType::LineString,
        GeometryType::Polygon,
        GeometryType::MultiPoint,
        GeometryType::MultiLineString,
        GeometryType::MultiPolygon,
        GeometryType::GeometryCollection,
    ];

    pub fn code(self) -> u32 {
        self.into()
    }

    pub fn from_code(code: u32) -> Result<Self> {
        GeometryType::try_from_primitive(code).map_err(|_| Error::UnknownTypeCode(code))
    }

    /// Lower-case simple name, e.g. `multilinestring`.
    pub fn name(self) -> &'static str {
        match self {
            GeometryType::Point => "point",
            GeometryType::LineString => "linestring",
            GeometryType::Polygon => "polygon",
            GeometryType::MultiPoint => "multipoint",
            GeometryType::MultiLineString => "multilinestring",
            GeometryType::MultiPolygon => "multipolygon",
            GeometryType::GeometryCollection => "geometrycollection",
        }
    }

    /// Upper-case well-known text keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GeometryType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnexpectedType {
                expected: "a geometry type name".into(),
                found: s.into(),
            })
    }
}

/// A single coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ordinate {
    X = 0,
    Y = 1,
    Z = 2,
    M = 3,
}

impl Ordinate {
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Ordinate {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Ordinate::X),
            1 => Ok(Ordinate::Y),
            2 => Ok(Ordinate::Z),
            3 => Ok(Ordinate::M),
            _ => Err(Error::OutOfRange { index, len: 4 }),
        }
    }
}

impl FromStr for Ordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Ordinate::X),
            "y" => Ok(Ordinate::Y),
            "z" => Ok(Ordinate::Z),
            "m" => Ok(Ordinate::M),
            _ => Err(Error::UnexpectedType {
                expected: "one of x, y, z or m".into(),
                found: s.into(),
            }),
        }
    }
}

impl fmt::Display for Ordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Ordinate::X => "x",
            Ordinate::Y => "y",
            Ordinate::Z => "z",
            Ordinate::M => "m",
        })
    }
}

/// The (SRID, is-3D, is-measured) triple shared by every geometry of a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinateSystem {
    pub srid: i32,
    pub is_3d: bool,
    pub is_measured: bool,
}

impl CoordinateSystem {
    pub const NO_SRID: i32 = -1;

    pub fn new(srid: i32, is_3d: bool, is_measured: bool) -> Self {
        CoordinateSystem {
            srid,
            is_3d,
            is_measured,
        }
    }

    pub fn has_srid(&self) -> bool {
        self.srid != Self::NO_SRID
    }

    /// (x,y) = 2, (x,y,z) = 3, (x,y,m) = 3, (x,y,z,m) = 4
    pub fn coordinate_dimension(&self) -> usize {
        2 + self.is_3d as usize + self.is_measured as usize
    }

    pub fn spatial_dimension(&self) -> usize {
        if self.is_3d {
            3
        } else {
            2
        }
    }

    pub fn has_ordinate(&self, ordinate: Ordinate) -> bool {
        self.slot(ordinate).is_some()
    }

    /// Storage position of `ordinate` inside a point of this coordinate system.
    pub fn slot(&self, ordinate: Ordinate) -> Option<usize> {
        match ordinate {
            Ordinate::X => Some(0),
            Ordinate::Y => Some(1),
            Ordinate::Z if self.is_3d => Some(2),
            Ordinate::M if self.is_measured => Some(self.coordinate_dimension() - 1),
            _ => None,
        }
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        CoordinateSystem::new(Self::NO_SRID, false, false)
    }
}

/// Everything a geometry is created under. Shared by reference and never mutated.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SpatialContext {
    pub crs: CoordinateSystem,
    pub precision: PrecisionModel,
}

impl SpatialContext {
    pub fn new(crs: CoordinateSystem, precision: PrecisionModel) -> Self {
        SpatialContext { crs, precision }
    }
}
