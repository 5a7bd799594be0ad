//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! Well-known binary reader and writer.
//!
//! Type codes per dialect:
//!
//! | dialect  | 2-D    | Z               | M               | SRID         |
//! |----------|--------|-----------------|-----------------|--------------|
//! | v1.1     | 1..7   | -               | -               | -            |
//! | v1.2     | 1..7   | +1000           | +2000           | -            |
//! | extended | 1..7   | `0x80000000`    | `0x40000000`    | `0x20000000` |

use crate::error::{Error, Result};
use crate::normalized::{Body, Coordinates, NormalizedGeometry, Position, MAX_DEPTH};
use crate::types::{CoordinateSystem, GeometryType};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use bytes::{BufMut, Bytes, BytesMut};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::{Read, Write};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WkbVersion {
    #[serde(rename = "1.1")]
    V1_1,
    #[default]
    #[serde(rename = "1.2")]
    V1_2,
    Extended,
}

/// Byte order marker leading every (sub-)geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Big endian.
    Xdr = 0,
    /// Little endian.
    #[default]
    Ndr = 1,
}

impl ByteOrder {
    fn is_be(self) -> bool {
        self == ByteOrder::Xdr
    }
}

impl TryFrom<u8> for ByteOrder {
    type Error = Error;

    fn try_from(marker: u8) -> Result<Self> {
        match marker {
            0 => Ok(ByteOrder::Xdr),
            1 => Ok(ByteOrder::Ndr),
            other => Err(Error::ByteOrder(other)),
        }
    }
}

const WKB_Z: u32 = 1000;
const WKB_M: u32 = 2000;
const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;
const EWKB_FLAGS: u32 = EWKB_Z | EWKB_M | EWKB_SRID;

/// Decoded type header.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Header {
    geometry_type: GeometryType,
    is_3d: bool,
    is_measured: bool,
    has_srid: bool,
}

impl WkbVersion {
    fn type_code(self, geometry_type: GeometryType, crs: &CoordinateSystem, with_srid: bool) -> u32 {
        let base = geometry_type.code();
        match self {
            WkbVersion::V1_1 => base,
            WkbVersion::V1_2 => {
                base + if crs.is_3d { WKB_Z } else { 0 } + if crs.is_measured { WKB_M } else { 0 }
            }
            WkbVersion::Extended => {
                let mut code = base;
                if crs.is_3d {
                    code |= EWKB_Z;
                }
                if crs.is_measured {
                    code |= EWKB_M;
                }
                if with_srid {
                    code |= EWKB_SRID;
                }
                code
            }
        }
    }

    fn header(self, code: u32) -> Result<Header> {
        let unknown = |_| Error::UnknownTypeCode(code);
        match self {
            WkbVersion::V1_1 => Ok(Header {
                geometry_type: GeometryType::from_code(code)?,
                is_3d: false,
                is_measured: false,
                has_srid: false,
            }),
            WkbVersion::V1_2 => {
                let band = code / 1000;
                if band > 3 {
                    return Err(Error::UnknownTypeCode(code));
                }
                Ok(Header {
                    geometry_type: GeometryType::from_code(code % 1000).map_err(unknown)?,
                    is_3d: band & 1 != 0,
                    is_measured: band & 2 != 0,
                    has_srid: false,
                })
            }
            WkbVersion::Extended => {
                if code & !(EWKB_FLAGS | 0xFF) != 0 {
                    return Err(Error::UnknownTypeCode(code));
                }
                Ok(Header {
                    geometry_type: GeometryType::from_code(code & 0xFF).map_err(unknown)?,
                    is_3d: code & EWKB_Z != 0,
                    is_measured: code & EWKB_M != 0,
                    has_srid: code & EWKB_SRID != 0,
                })
            }
        }
    }

    fn dimension(self, crs: &CoordinateSystem) -> usize {
        match self {
            WkbVersion::V1_1 => 2,
            _ => crs.coordinate_dimension(),
        }
    }
}

// --- Primitives

fn read_u32<R: Read>(raw: &mut R, is_be: bool) -> Result<u32> {
    Ok(if is_be {
        raw.read_u32::<BigEndian>()?
    } else {
        raw.read_u32::<LittleEndian>()?
    })
}

fn read_i32<R: Read>(raw: &mut R, is_be: bool) -> Result<i32> {
    Ok(if is_be {
        raw.read_i32::<BigEndian>()?
    } else {
        raw.read_i32::<LittleEndian>()?
    })
}

fn read_f64<R: Read>(raw: &mut R, is_be: bool) -> Result<f64> {
    Ok(if is_be {
        raw.read_f64::<BigEndian>()?
    } else {
        raw.read_f64::<LittleEndian>()?
    })
}

fn write_error(e: std::io::Error) -> Error {
    Error::Write(e.to_string())
}

fn write_u32<W: Write + ?Sized>(w: &mut W, value: u32, is_be: bool) -> Result<()> {
    let written = if is_be {
        w.write_u32::<BigEndian>(value)
    } else {
        w.write_u32::<LittleEndian>(value)
    };
    written.map_err(write_error)
}

fn write_i32<W: Write + ?Sized>(w: &mut W, value: i32, is_be: bool) -> Result<()> {
    let written = if is_be {
        w.write_i32::<BigEndian>(value)
    } else {
        w.write_i32::<LittleEndian>(value)
    };
    written.map_err(write_error)
}

fn write_f64<W: Write + ?Sized>(w: &mut W, value: f64, is_be: bool) -> Result<()> {
    let written = if is_be {
        w.write_f64::<BigEndian>(value)
    } else {
        w.write_f64::<LittleEndian>(value)
    };
    written.map_err(write_error)
}

fn write_count<W: Write + ?Sized>(w: &mut W, count: usize, is_be: bool) -> Result<()> {
    let count = u32::try_from(count)
        .map_err(|_| Error::Write(format!("{} elements exceed the count range", count)))?;
    write_u32(w, count, is_be)
}

/// Upper-case hexadecimal transport form.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(hex, "{:02X}", b);
    }
    hex
}

pub fn from_hex(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidHex(hex.chars().take(32).collect()));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| Error::InvalidHex(hex[i..i + 2].into()))
        })
        .collect()
}

// --- Reader

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WkbReader {
    version: WkbVersion,
}

impl WkbReader {
    pub fn new(version: WkbVersion) -> Self {
        WkbReader { version }
    }

    pub fn version(&self) -> WkbVersion {
        self.version
    }

    /// Decodes one geometry. The input must be consumed completely.
    pub fn read(&self, wkb: &[u8]) -> Result<NormalizedGeometry> {
        let mut raw = wkb;
        let geometry = self.read_geometry(&mut raw, None, 1)?;
        if !raw.is_empty() {
            return Err(Error::TrailingInput(raw.len()));
        }
        Ok(geometry)
    }

    pub fn read_hex(&self, hex: &str) -> Result<NormalizedGeometry> {
        self.read(&from_hex(hex)?)
    }

    fn read_geometry<R: Read>(
        &self,
        raw: &mut R,
        parent: Option<&CoordinateSystem>,
        depth: usize,
    ) -> Result<NormalizedGeometry> {
        if depth > MAX_DEPTH {
            return Err(Error::Read(format!("geometries nested deeper than {}", MAX_DEPTH)));
        }
        let is_be = ByteOrder::try_from(raw.read_u8()?)?.is_be();
        let code = read_u32(raw, is_be)?;
        let header = self.version.header(code)?;
        let srid = if header.has_srid {
            read_i32(raw, is_be)?
        } else {
            parent.map_or(CoordinateSystem::NO_SRID, |crs| crs.srid)
        };
        let crs = CoordinateSystem::new(srid, header.is_3d, header.is_measured);
        trace!("reading {} with code {:#x}", header.geometry_type, code);

        let coordinates = match header.geometry_type {
            GeometryType::Point => Coordinates::Point(self.read_position(raw, is_be, &crs)?),
            GeometryType::LineString => Coordinates::LineString(self.read_positions(raw, is_be, &crs)?),
            GeometryType::Polygon => Coordinates::Polygon(self.read_rings(raw, is_be, &crs)?),
            GeometryType::MultiPoint => {
                let points = self.read_members(raw, is_be, &crs, depth, GeometryType::Point, |body, crs| {
                    match body {
                        Body::Coordinates(Coordinates::Point(p)) => p,
                        _ => vec![f64::NAN; crs.coordinate_dimension()],
                    }
                })?;
                Coordinates::MultiPoint(points)
            }
            GeometryType::MultiLineString => {
                let lines = self.read_members(raw, is_be, &crs, depth, GeometryType::LineString, |body, _| {
                    match body {
                        Body::Coordinates(Coordinates::LineString(ps)) => ps,
                        _ => Vec::new(),
                    }
                })?;
                Coordinates::MultiLineString(lines)
            }
            GeometryType::MultiPolygon => {
                let polygons = self.read_members(raw, is_be, &crs, depth, GeometryType::Polygon, |body, _| {
                    match body {
                        Body::Coordinates(Coordinates::Polygon(rings)) => rings,
                        _ => Vec::new(),
                    }
                })?;
                Coordinates::MultiPolygon(polygons)
            }
            GeometryType::GeometryCollection => {
                let count = read_u32(raw, is_be)?;
                let mut members = Vec::new();
                for _ in 0..count {
                    members.push(self.read_geometry(raw, Some(&crs), depth + 1)?);
                }
                return Ok(NormalizedGeometry::collection(crs, members));
            }
        };
        Ok(NormalizedGeometry::from_coordinates(crs, coordinates))
    }

    fn read_position<R: Read>(&self, raw: &mut R, is_be: bool, crs: &CoordinateSystem) -> Result<Position> {
        (0..self.version.dimension(crs))
            .map(|_| read_f64(raw, is_be))
            .collect()
    }

    fn read_positions<R: Read>(&self, raw: &mut R, is_be: bool, crs: &CoordinateSystem) -> Result<Vec<Position>> {
        let count = read_u32(raw, is_be)?;
        (0..count).map(|_| self.read_position(raw, is_be, crs)).collect()
    }

    fn read_rings<R: Read>(&self, raw: &mut R, is_be: bool, crs: &CoordinateSystem) -> Result<Vec<Vec<Position>>> {
        let count = read_u32(raw, is_be)?;
        (0..count).map(|_| self.read_positions(raw, is_be, crs)).collect()
    }

    // Members of a multi geometry are complete geometries with their own header.
    fn read_members<R: Read, T>(
        &self,
        raw: &mut R,
        is_be: bool,
        crs: &CoordinateSystem,
        depth: usize,
        member_type: GeometryType,
        extract: impl Fn(Body, &CoordinateSystem) -> T,
    ) -> Result<Vec<T>> {
        let count = read_u32(raw, is_be)?;
        let mut members = Vec::new();
        for _ in 0..count {
            let member = self.read_geometry(raw, Some(crs), depth + 1)?;
            if member.geometry_type != member_type {
                return Err(Error::UnexpectedType {
                    expected: member_type.to_string(),
                    found: member.geometry_type.to_string(),
                });
            }
            if (member.crs.is_3d, member.crs.is_measured) != (crs.is_3d, crs.is_measured) {
                return Err(Error::UnexpectedType {
                    expected: format!("{} with {} ordinates", member_type, crs.coordinate_dimension()),
                    found: format!("{} ordinates", member.crs.coordinate_dimension()),
                });
            }
            members.push(extract(member.body, &member.crs));
        }
        Ok(members)
    }
}

// --- Writer

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WkbWriter {
    version: WkbVersion,
    byte_order: ByteOrder,
}

impl WkbWriter {
    /// A writer producing little endian output.
    pub fn new(version: WkbVersion) -> Self {
        WkbWriter {
            version,
            byte_order: ByteOrder::Ndr,
        }
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn version(&self) -> WkbVersion {
        self.version
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn write(&self, geometry: &NormalizedGeometry) -> Result<Bytes> {
        let mut w = BytesMut::new().writer();
        self.write_geometry(&mut w, geometry, true)?;
        Ok(w.into_inner().freeze())
    }

    pub fn write_hex(&self, geometry: &NormalizedGeometry) -> Result<String> {
        Ok(to_hex(&self.write(geometry)?))
    }

    fn is_be(&self) -> bool {
        self.byte_order.is_be()
    }

    fn write_header<W: Write + ?Sized>(
        &self,
        w: &mut W,
        geometry_type: GeometryType,
        crs: &CoordinateSystem,
        with_srid: bool,
    ) -> Result<()> {
        w.write_u8(self.byte_order as u8).map_err(write_error)?;
        let code = self.version.type_code(geometry_type, crs, with_srid);
        trace!("writing {} with code {:#x} ({:?})", geometry_type, code, self.byte_order);
        write_u32(w, code, self.is_be())?;
        if with_srid {
            write_i32(w, crs.srid, self.is_be())?;
        }
        Ok(())
    }

    fn write_geometry<W: Write + ?Sized>(&self, w: &mut W, geometry: &NormalizedGeometry, top: bool) -> Result<()> {
        let crs = &geometry.crs;
        let with_srid = top && self.version == WkbVersion::Extended && crs.has_srid();
        self.write_header(w, geometry.geometry_type, crs, with_srid)?;
        let is_be = self.is_be();
        match &geometry.body {
            Body::Empty => match geometry.geometry_type {
                // no count field for points; unset ordinates stand in
                GeometryType::Point => {
                    for _ in 0..self.version.dimension(crs) {
                        write_f64(w, f64::NAN, is_be)?;
                    }
                }
                _ => write_u32(w, 0, is_be)?,
            },
            Body::Coordinates(coordinates) => {
                if coordinates.geometry_type() != geometry.geometry_type {
                    return Err(Error::Write(format!(
                        "{} coordinates in a {}",
                        coordinates.geometry_type(),
                        geometry.geometry_type
                    )));
                }
                match coordinates {
                    Coordinates::Point(p) => self.write_position(w, p, crs)?,
                    Coordinates::LineString(ps) => self.write_positions(w, ps, crs)?,
                    Coordinates::Polygon(rings) => self.write_rings(w, rings, crs)?,
                    Coordinates::MultiPoint(ps) => {
                        write_count(w, ps.len(), is_be)?;
                        for p in ps {
                            self.write_header(w, GeometryType::Point, crs, false)?;
                            self.write_position(w, p, crs)?;
                        }
                    }
                    Coordinates::MultiLineString(lines) => {
                        write_count(w, lines.len(), is_be)?;
                        for ps in lines {
                            self.write_header(w, GeometryType::LineString, crs, false)?;
                            self.write_positions(w, ps, crs)?;
                        }
                    }
                    Coordinates::MultiPolygon(polygons) => {
                        write_count(w, polygons.len(), is_be)?;
                        for rings in polygons {
                            self.write_header(w, GeometryType::Polygon, crs, false)?;
                            self.write_rings(w, rings, crs)?;
                        }
                    }
                }
            }
            Body::Geometries(members) => {
                if geometry.geometry_type != GeometryType::GeometryCollection {
                    return Err(Error::Write(format!(
                        "member geometries in a {}",
                        geometry.geometry_type
                    )));
                }
                write_count(w, members.len(), is_be)?;
                for member in members {
                    self.write_geometry(w, member, false)?;
                }
            }
        }
        Ok(())
    }

    fn write_position<W: Write + ?Sized>(&self, w: &mut W, position: &[f64], crs: &CoordinateSystem) -> Result<()> {
        let dimension = self.version.dimension(crs);
        if position.len() < dimension {
            return Err(Error::Write(format!(
                "position has {} ordinates, expected {}",
                position.len(),
                dimension
            )));
        }
        for v in &position[..dimension] {
            write_f64(w, *v, self.is_be())?;
        }
        Ok(())
    }

    fn write_positions<W: Write + ?Sized>(&self, w: &mut W, positions: &[Position], crs: &CoordinateSystem) -> Result<()> {
        write_count(w, positions.len(), self.is_be())?;
        for p in positions {
            self.write_position(w, p, crs)?;
        }
        Ok(())
    }

    fn write_rings<W: Write + ?Sized>(&self, w: &mut W, rings: &[Vec<Position>], crs: &CoordinateSystem) -> Result<()> {
        write_count(w, rings.len(), self.is_be())?;
        for ring in rings {
            self.write_positions(w, ring, crs)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wkt::{self, WktVersion};
    use rstest::rstest;

    fn point(x: f64, y: f64) -> NormalizedGeometry {
        NormalizedGeometry::from_coordinates(
            CoordinateSystem::default(),
            Coordinates::Point(vec![x, y]),
        )
    }

    #[test]
    fn point_ndr() {
        let hex = WkbWriter::new(WkbVersion::V1_2).write_hex(&point(1.0, 2.0)).unwrap();
        assert_eq!(hex, "0101000000000000000000F03F0000000000000040");
        let bytes = WkbWriter::new(WkbVersion::V1_1).write(&point(1.0, 2.0)).unwrap();
        assert_eq!(
            &bytes[..],
            &[
                0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40
            ][..]
        );
    }

    #[test]
    fn point_xdr() {
        let hex = "00000000013FF00000000000004000000000000000";
        let g = WkbReader::new(WkbVersion::V1_1).read_hex(hex).unwrap();
        assert_eq!(g, point(1.0, 2.0));
        let writer = WkbWriter::new(WkbVersion::V1_1).with_byte_order(ByteOrder::Xdr);
        assert_eq!(writer.write_hex(&g).unwrap(), hex);
    }

    #[test]
    fn ewkb_point_with_srid() {
        // POINT(10 -20) in 4326
        let g = WkbReader::new(WkbVersion::Extended)
            .read_hex("0101000020E6100000000000000000244000000000000034C0")
            .unwrap();
        assert_eq!(g.crs, CoordinateSystem::new(4326, false, false));
        assert_eq!(g.body, Body::Coordinates(Coordinates::Point(vec![10.0, -20.0])));

        let g = WkbReader::new(WkbVersion::Extended)
            .read_hex("010200000002000000000000000000244000000000000034C00000000000000000000000000000E0BF")
            .unwrap();
        assert_eq!(
            g.body,
            Body::Coordinates(Coordinates::LineString(vec![vec![10.0, -20.0], vec![0.0, -0.5]]))
        );
    }

    #[test]
    fn ewkb_flags() {
        let g = wkt::parse("SRID=4326;POINT ZM(1 2 3 4)", WktVersion::Extended).unwrap();
        let bytes = WkbWriter::new(WkbVersion::Extended).write(&g).unwrap();
        assert_eq!(&bytes[..9], &[0x01, 0x01, 0x00, 0x00, 0xE0, 0xE6, 0x10, 0x00, 0x00]);
        assert_eq!(bytes.len(), 9 + 4 * 8);
        assert_eq!(WkbReader::new(WkbVersion::Extended).read(&bytes).unwrap(), g);
    }

    #[rstest]
    #[case(false, false, 1)]
    #[case(true, false, 1001)]
    #[case(false, true, 2001)]
    #[case(true, true, 3001)]
    fn v1_2_codes(#[case] is_3d: bool, #[case] is_measured: bool, #[case] code: u32) {
        let crs = CoordinateSystem::new(-1, is_3d, is_measured);
        assert_eq!(WkbVersion::V1_2.type_code(GeometryType::Point, &crs, false), code);
        let header = WkbVersion::V1_2.header(code + 6).unwrap();
        assert_eq!(header.geometry_type, GeometryType::GeometryCollection);
        assert_eq!((header.is_3d, header.is_measured), (is_3d, is_measured));
    }

    #[rstest]
    #[case(WkbVersion::V1_1, 1001)]
    #[case(WkbVersion::V1_1, 8)]
    #[case(WkbVersion::V1_2, 4001)]
    #[case(WkbVersion::V1_2, 1000)]
    #[case(WkbVersion::Extended, 0x1000_0001)]
    #[case(WkbVersion::Extended, 0x0000_0009)]
    fn unknown_codes(#[case] version: WkbVersion, #[case] code: u32) {
        assert!(matches!(version.header(code), Err(Error::UnknownTypeCode(c)) if c == code));
    }

    #[rstest]
    #[case("SRID=4326;MULTIPOLYGON Z(((0 0 1,1 0 1,1 1 1,0 0 1)),((5 5 2,6 5 2,6 6 2,5 5 2)))")]
    #[case("SRID=3857;GEOMETRYCOLLECTION M(POINT M(1 1 9),LINESTRING M(0 0 1,1 1 2))")]
    #[case("MULTILINESTRING ZM((0 0 0 0,1 1 1 1))")]
    #[case("MULTIPOINT((1 2),(3 4))")]
    #[case("POLYGON((0 0,4 0,4 4,0 0),(1 1,2 1,2 2,1 1))")]
    fn round_trip_both_byte_orders(#[case] text: &str) {
        let g = wkt::parse(text, WktVersion::Extended).unwrap();
        for byte_order in [ByteOrder::Ndr, ByteOrder::Xdr] {
            let writer = WkbWriter::new(WkbVersion::Extended).with_byte_order(byte_order);
            let bytes = writer.write(&g).unwrap();
            assert_eq!(WkbReader::new(WkbVersion::Extended).read(&bytes).unwrap(), g);
        }
    }

    #[test]
    fn srid_only_at_top_level() {
        let g = wkt::parse("SRID=4326;MULTIPOINT(1 2)", WktVersion::Extended).unwrap();
        let bytes = WkbWriter::new(WkbVersion::Extended).write(&g).unwrap();
        // header 9 bytes, count 4 bytes, member header without SRID
        assert_eq!(&bytes[13..18], &[0x01, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(bytes.len(), 9 + 4 + 5 + 16);
    }

    #[test]
    fn empty_geometries() {
        let writer = WkbWriter::new(WkbVersion::V1_2);
        let reader = WkbReader::new(WkbVersion::V1_2);
        let empty = NormalizedGeometry::empty(GeometryType::Point, CoordinateSystem::default());
        let bytes = writer.write(&empty).unwrap();
        assert_eq!(bytes.len(), 21);
        assert!(f64::from_le_bytes(bytes[5..13].try_into().unwrap()).is_nan());
        assert_eq!(reader.read(&bytes).unwrap(), empty);

        let empty = NormalizedGeometry::empty(GeometryType::Polygon, CoordinateSystem::default());
        let bytes = writer.write(&empty).unwrap();
        assert_eq!(to_hex(&bytes), "010300000000000000");
        assert_eq!(reader.read(&bytes).unwrap(), empty);
    }

    #[test]
    fn mixed_byte_order_members() {
        // NDR multipoint holding one XDR point (1 2)
        let hex = "010400000001000000\
                   00000000013FF00000000000004000000000000000";
        let g = WkbReader::new(WkbVersion::V1_1).read_hex(hex).unwrap();
        assert_eq!(
            g.body,
            Body::Coordinates(Coordinates::MultiPoint(vec![vec![1.0, 2.0]]))
        );
    }

    #[test]
    fn member_type_is_checked() {
        // multipoint containing a linestring header
        let hex = "010400000001000000010200000000000000";
        assert!(matches!(
            WkbReader::new(WkbVersion::V1_1).read_hex(hex),
            Err(Error::UnexpectedType { .. })
        ));
    }

    #[test]
    fn member_dimensions_match_parent() {
        // MULTIPOINT Z holding a 2-D point
        let hex = "01EC03000001000000\
                   0101000000000000000000F03F0000000000000040";
        assert!(matches!(
            WkbReader::new(WkbVersion::V1_2).read_hex(hex),
            Err(Error::UnexpectedType { .. })
        ));
        // MULTILINESTRING holding a LINESTRING M
        let hex = "01050000000100000001D207000000000000";
        assert!(matches!(
            WkbReader::new(WkbVersion::V1_2).read_hex(hex),
            Err(Error::UnexpectedType { .. })
        ));
        // EWKB MULTIPOINT Z holding a POINT Z
        let hex = "010400008001000000\
                   0101000080000000000000F03F00000000000000400000000000000840";
        let g = WkbReader::new(WkbVersion::Extended).read_hex(hex).unwrap();
        assert_eq!(
            g.body,
            Body::Coordinates(Coordinates::MultiPoint(vec![vec![1.0, 2.0, 3.0]]))
        );
    }

    fn nested(depth: usize) -> Vec<u8> {
        let mut wkb = [1u8, 7, 0, 0, 0, 1, 0, 0, 0].repeat(depth - 1);
        wkb.extend_from_slice(&[1, 7, 0, 0, 0, 0, 0, 0, 0]);
        wkb
    }

    #[test]
    fn nesting_depth_is_capped() {
        let reader = WkbReader::new(WkbVersion::V1_2);
        let g = reader.read(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(g.geometry_type, GeometryType::GeometryCollection);
        assert!(matches!(reader.read(&nested(MAX_DEPTH + 1)), Err(Error::Read(_))));
        assert!(matches!(reader.read(&nested(1001)), Err(Error::Read(_))));
        // members of a multi geometry count as one level
        let mut wkb = nested(MAX_DEPTH);
        wkb.truncate(wkb.len() - 9);
        wkb.extend_from_slice(&[1, 4, 0, 0, 0, 1, 0, 0, 0]);
        wkb.extend_from_slice(&[1, 1, 0, 0, 0]);
        wkb.extend_from_slice(&[0; 16]);
        assert!(matches!(reader.read(&wkb), Err(Error::Read(_))));
    }

    #[test]
    fn malformed_input() {
        let reader = WkbReader::new(WkbVersion::V1_2);
        assert!(matches!(
            reader.read_hex("0101000000000000000000F03F00000000000000"),
            Err(Error::Read(_))
        ));
        assert!(matches!(
            reader.read_hex("0101000000000000000000F03F000000000000004000"),
            Err(Error::TrailingInput(1))
        ));
        assert!(matches!(
            reader.read_hex("0201000000000000000000F03F0000000000000040"),
            Err(Error::ByteOrder(2))
        ));
        assert!(matches!(reader.read(&[]), Err(Error::Read(_))));
        assert!(matches!(reader.read_hex("01F"), Err(Error::InvalidHex(_))));
        assert!(matches!(reader.read_hex("POINT(1 2)"), Err(Error::InvalidHex(_))));
    }

    #[test]
    fn hex_helpers() {
        assert_eq!(to_hex(&[0x00, 0xAB, 0x0F]), "00AB0F");
        assert_eq!(from_hex("00ab0F").unwrap(), vec![0x00, 0xAB, 0x0F]);
    }
}
