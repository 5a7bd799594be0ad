//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! Well-known text reader and writer.
//!
//! Three dialects are supported:
//!
//! * v1.1: two-dimensional coordinates only, no dimension markers
//! * v1.2: `Z`, `M` and `ZM` markers after the type keyword, glued (`POINTZ`) or separated
//! * extended: v1.2 plus an optional `SRID=<n>;` prefix on the outermost geometry

use crate::error::{Error, Result};
use crate::normalized::{Body, Coordinates, NormalizedGeometry, Position, MAX_DEPTH};
use crate::types::{CoordinateSystem, GeometryType};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WktVersion {
    #[serde(rename = "1.1")]
    V1_1,
    #[default]
    #[serde(rename = "1.2")]
    V1_2,
    Extended,
}

impl WktVersion {
    fn has_dimension(self) -> bool {
        self != WktVersion::V1_1
    }

    fn has_srid(self) -> bool {
        self == WktVersion::Extended
    }
}

// --- Lexer

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Type(GeometryType),
    Dimension { z: bool, m: bool },
    Number(f64),
    Empty,
    Srid,
    Open,
    Close,
    Comma,
    Equals,
    Semicolon,
    Unknown,
    Eof,
}

#[derive(Clone, Debug)]
struct Lexeme {
    token: Token,
    text: String,
    position: usize,
}

fn dimension_marker(word: &str) -> Option<Token> {
    match word {
        "z" => Some(Token::Dimension { z: true, m: false }),
        "m" => Some(Token::Dimension { z: false, m: true }),
        "zm" => Some(Token::Dimension { z: true, m: true }),
        _ => None,
    }
}

fn type_keyword(word: &str) -> Option<GeometryType> {
    GeometryType::ALL
        .iter()
        .copied()
        .find(|t| t.name() == word)
}

struct Lexer<'a> {
    input: &'a str,
    version: WktVersion,
    lexemes: Vec<Lexeme>,
}

impl<'a> Lexer<'a> {
    fn tokenize(input: &'a str, version: WktVersion) -> Vec<Lexeme> {
        let mut lexer = Lexer {
            input,
            version,
            lexemes: Vec::new(),
        };
        lexer.scan();
        lexer.lexemes
    }

    fn push(&mut self, token: Token, start: usize, end: usize) {
        self.lexemes.push(Lexeme {
            token,
            text: self.input[start..end].to_string(),
            position: start,
        });
    }

    fn scan(&mut self) {
        let input = self.input;
        let bytes = input.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            let c = bytes[pos];
            let start = pos;
            match c {
                b if b.is_ascii_whitespace() => pos += 1,
                b'(' | b')' | b',' => {
                    pos += 1;
                    let token = match c {
                        b'(' => Token::Open,
                        b')' => Token::Close,
                        _ => Token::Comma,
                    };
                    self.push(token, start, pos);
                }
                b'=' | b';' => {
                    pos += 1;
                    let token = match (self.version.has_srid(), c) {
                        (true, b'=') => Token::Equals,
                        (true, _) => Token::Semicolon,
                        _ => Token::Unknown,
                    };
                    self.push(token, start, pos);
                }
                b'+' | b'-' | b'.' | b'0'..=b'9' => {
                    pos = number_end(bytes, pos);
                    if pos < bytes.len() && is_number_byte(bytes[pos]) {
                        // 1-2, 1.5.3, 2x: a number must end at a separator
                        while pos < bytes.len() && is_number_byte(bytes[pos]) {
                            pos += 1;
                        }
                        self.push(Token::Unknown, start, pos);
                        continue;
                    }
                    let token = input[start..pos]
                        .parse::<f64>()
                        .map(Token::Number)
                        .unwrap_or(Token::Unknown);
                    self.push(token, start, pos);
                }
                b if b.is_ascii_alphabetic() => {
                    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
                        pos += 1;
                    }
                    self.word(start, pos);
                }
                _ => {
                    // step over a whole character to keep slicing on char boundaries
                    let width = input[pos..].chars().next().map_or(1, char::len_utf8);
                    pos += width;
                    self.push(Token::Unknown, start, pos);
                }
            }
        }
        self.lexemes.push(Lexeme {
            token: Token::Eof,
            text: "end of input".into(),
            position: self.input.len(),
        });
    }

    fn word(&mut self, start: usize, end: usize) {
        let word = self.input[start..end].to_ascii_lowercase();
        let token = match word.as_str() {
            "empty" => Token::Empty,
            "nan" => Token::Number(f64::NAN),
            "srid" if self.version.has_srid() => Token::Srid,
            w => match type_keyword(w) {
                Some(t) => Token::Type(t),
                None if self.version.has_dimension() => match dimension_marker(w) {
                    Some(marker) => marker,
                    None => return self.glued_word(&word, start, end),
                },
                None => Token::Unknown,
            },
        };
        self.push(token, start, end);
    }

    // POINTZ, LINESTRINGZM, ...
    fn glued_word(&mut self, word: &str, start: usize, end: usize) {
        for suffix in ["zm", "z", "m"] {
            if let Some(t) = word.strip_suffix(suffix).and_then(type_keyword) {
                let split = end - suffix.len();
                self.push(Token::Type(t), start, split);
                if let Some(marker) = dimension_marker(suffix) {
                    self.push(marker, split, end);
                }
                return;
            }
        }
        self.push(Token::Unknown, start, end);
    }
}

fn is_number_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.')
}

fn number_end(bytes: &[u8], mut pos: usize) -> usize {
    let digits = |pos: &mut usize| {
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
    };
    if matches!(bytes[pos], b'+' | b'-') {
        pos += 1;
    }
    digits(&mut pos);
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        digits(&mut pos);
    }
    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            pos = exp;
            digits(&mut pos);
        }
    }
    pos
}

// --- Parser

/// Coordinate layout of the geometry currently being parsed.
#[derive(Clone, Copy, Debug, Default)]
struct Layout {
    is_3d: bool,
    is_measured: bool,
    /// False until a marker or the first coordinate fixed the layout.
    settled: bool,
}

impl Layout {
    fn dimension(&self) -> usize {
        2 + self.is_3d as usize + self.is_measured as usize
    }
}

struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
    version: WktVersion,
    layout: Layout,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.lexemes[self.pos].token
    }

    fn current(&self) -> &Lexeme {
        &self.lexemes[self.pos]
    }

    fn advance(&mut self) -> Lexeme {
        let lexeme = self.lexemes[self.pos].clone();
        if self.pos + 1 < self.lexemes.len() {
            self.pos += 1;
        }
        lexeme
    }

    fn syntax_error(&self, expected: &str) -> Error {
        let lexeme = self.current();
        Error::Syntax {
            expected: expected.into(),
            found: format!("'{}'", lexeme.text),
            position: lexeme.position,
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<()> {
        if *self.peek() == token {
            self.advance();
            Ok(())
        } else {
            Err(self.syntax_error(expected))
        }
    }

    fn accept(&mut self, token: Token) -> bool {
        if *self.peek() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn document(&mut self) -> Result<NormalizedGeometry> {
        let srid = if self.version.has_srid() && self.accept(Token::Srid) {
            self.expect(Token::Equals, "'='")?;
            let lexeme = self.current();
            let digits = lexeme.text.strip_prefix('-').unwrap_or(lexeme.text.as_str());
            let srid = match lexeme.token {
                Token::Number(_) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                    lexeme.text.parse::<i32>().map_err(|_| self.syntax_error("integer SRID"))?
                }
                _ => return Err(self.syntax_error("integer SRID")),
            };
            self.advance();
            self.expect(Token::Semicolon, "';'")?;
            srid
        } else {
            CoordinateSystem::NO_SRID
        };
        let geometry = self.geometry(srid)?;
        if *self.peek() != Token::Eof {
            return Err(self.syntax_error("end of input"));
        }
        Ok(geometry)
    }

    fn geometry(&mut self, srid: i32) -> Result<NormalizedGeometry> {
        let geometry_type = match *self.peek() {
            Token::Type(t) => t,
            _ => return Err(self.syntax_error("geometry type")),
        };
        if self.depth == MAX_DEPTH {
            return Err(self.syntax_error(&format!("geometries nested at most {} deep", MAX_DEPTH)));
        }
        self.advance();

        let outer = self.layout;
        self.layout = match self.peek().clone() {
            Token::Dimension { z, m } => {
                self.advance();
                Layout {
                    is_3d: z,
                    is_measured: m,
                    settled: true,
                }
            }
            _ => Layout {
                settled: self.version == WktVersion::V1_1,
                ..Layout::default()
            },
        };
        self.depth += 1;
        let result = self.geometry_body(geometry_type, srid);
        self.depth -= 1;
        self.layout = outer;
        result
    }

    fn geometry_body(&mut self, geometry_type: GeometryType, srid: i32) -> Result<NormalizedGeometry> {
        if self.accept(Token::Empty) {
            let crs = self.crs(srid);
            return Ok(NormalizedGeometry::empty(geometry_type, crs));
        }
        let coordinates = match geometry_type {
            GeometryType::Point => {
                self.expect(Token::Open, "'('")?;
                let position = self.coordinate()?;
                self.expect(Token::Close, "')'")?;
                Coordinates::Point(position)
            }
            GeometryType::LineString => Coordinates::LineString(self.list(Self::coordinate)?),
            GeometryType::Polygon => Coordinates::Polygon(self.list(Self::ring)?),
            GeometryType::MultiPoint => Coordinates::MultiPoint(self.list(Self::member_point)?),
            GeometryType::MultiLineString => Coordinates::MultiLineString(self.list(Self::ring)?),
            GeometryType::MultiPolygon => Coordinates::MultiPolygon(self.list(Self::member_polygon)?),
            GeometryType::GeometryCollection => {
                let members = self.list(|p| p.geometry(srid))?;
                if !self.layout.settled {
                    if let Some(first) = members.first() {
                        self.layout.is_3d = first.crs.is_3d;
                        self.layout.is_measured = first.crs.is_measured;
                    }
                }
                let crs = self.crs(srid);
                return Ok(NormalizedGeometry::collection(crs, members));
            }
        };
        let crs = self.crs(srid);
        Ok(NormalizedGeometry::from_coordinates(crs, coordinates))
    }

    fn crs(&self, srid: i32) -> CoordinateSystem {
        CoordinateSystem::new(srid, self.layout.is_3d, self.layout.is_measured)
    }

    fn list<T>(&mut self, mut element: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        self.expect(Token::Open, "'('")?;
        let mut items = vec![element(self)?];
        while self.accept(Token::Comma) {
            items.push(element(self)?);
        }
        self.expect(Token::Close, "',' or ')'")?;
        Ok(items)
    }

    fn ring(&mut self) -> Result<Vec<Position>> {
        if self.accept(Token::Empty) {
            return Ok(Vec::new());
        }
        self.list(Self::coordinate)
    }

    fn member_point(&mut self) -> Result<Position> {
        if self.accept(Token::Empty) {
            return Ok(vec![f64::NAN; self.layout.dimension()]);
        }
        if self.accept(Token::Open) {
            let position = self.coordinate()?;
            self.expect(Token::Close, "')'")?;
            return Ok(position);
        }
        self.coordinate()
    }

    fn member_polygon(&mut self) -> Result<Vec<Vec<Position>>> {
        if self.accept(Token::Empty) {
            return Ok(Vec::new());
        }
        self.list(Self::ring)
    }

    fn coordinate(&mut self) -> Result<Position> {
        let start = self.current().position;
        let mut values = Vec::with_capacity(4);
        while let Token::Number(n) = self.peek().clone() {
            values.push(n);
            self.advance();
        }
        let count = values.len();
        let arity_error = |expected: String| Error::Syntax {
            expected,
            found: format!("{} ordinates", count),
            position: start,
        };
        if self.version == WktVersion::V1_1 {
            if !(2..=4).contains(&count) {
                return Err(arity_error("2 to 4 ordinates".into()));
            }
            values.truncate(2);
            return Ok(values);
        }
        if !self.layout.settled {
            match count {
                2 => {}
                3 => self.layout.is_3d = true,
                4 => {
                    self.layout.is_3d = true;
                    self.layout.is_measured = true;
                }
                _ => return Err(arity_error("2 to 4 ordinates".into())),
            }
            self.layout.settled = true;
            trace!("inferred {} ordinates per coordinate", count);
        }
        let dimension = self.layout.dimension();
        if count != dimension {
            return Err(arity_error(format!("{} ordinates", dimension)));
        }
        Ok(values)
    }
}

/// Parses well-known text of the given dialect.
pub fn parse(text: &str, version: WktVersion) -> Result<NormalizedGeometry> {
    let mut parser = Parser {
        lexemes: Lexer::tokenize(text, version),
        pos: 0,
        version,
        layout: Layout::default(),
        depth: 0,
    };
    parser.document()
}

// --- Writer

/// Renders `geometry` as well-known text of the given dialect.
///
/// v1.1 output drops z and m. The extended dialect prefixes the SRID when one is set.
pub fn write(geometry: &NormalizedGeometry, version: WktVersion) -> Result<String> {
    let mut out = String::new();
    if version.has_srid() && geometry.crs.has_srid() {
        let _ = write!(out, "SRID={};", geometry.crs.srid);
    }
    write_geometry(&mut out, geometry, version)?;
    Ok(out)
}

fn write_geometry(out: &mut String, geometry: &NormalizedGeometry, version: WktVersion) -> Result<()> {
    let crs = &geometry.crs;
    out.push_str(geometry.geometry_type.keyword());
    if version.has_dimension() {
        out.push_str(match (crs.is_3d, crs.is_measured) {
            (true, true) => " ZM",
            (true, false) => " Z",
            (false, true) => " M",
            (false, false) => "",
        });
    }
    let dimension = match version {
        WktVersion::V1_1 => 2,
        _ => crs.coordinate_dimension(),
    };
    if geometry.is_empty() {
        out.push_str(" EMPTY");
        return Ok(());
    }
    let writer = CoordinateWriter { dimension };
    match &geometry.body {
        Body::Empty => {}
        Body::Coordinates(coordinates) => {
            if coordinates.geometry_type() != geometry.geometry_type {
                return Err(Error::Write(format!(
                    "{} coordinates in a {}",
                    coordinates.geometry_type(),
                    geometry.geometry_type
                )));
            }
            match coordinates {
                Coordinates::Point(p) => {
                    out.push('(');
                    writer.position(out, p)?;
                    out.push(')');
                }
                Coordinates::LineString(ps) | Coordinates::MultiPoint(ps) => {
                    writer.positions(out, ps)?
                }
                Coordinates::Polygon(rings) | Coordinates::MultiLineString(rings) => {
                    writer.rings(out, rings)?
                }
                Coordinates::MultiPolygon(polygons) => {
                    writer.list(out, polygons, |w, out, rings| w.rings(out, rings))?
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
            out.push('(');
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_geometry(out, member, version)?;
            }
            out.push(')');
        }
    }
    Ok(())
}

struct CoordinateWriter {
    dimension: usize,
}

impl CoordinateWriter {
    fn position(&self, out: &mut String, position: &[f64]) -> Result<()> {
        if position.len() < self.dimension {
            return Err(Error::Write(format!(
                "position has {} ordinates, expected {}",
                position.len(),
                self.dimension
            )));
        }
        for (i, v) in position[..self.dimension].iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            if v.is_infinite() {
                return Err(Error::Write(format!("{} has no well-known text form", v)));
            }
            let _ = write!(out, "{}", v);
        }
        Ok(())
    }

    fn list<T>(
        &self,
        out: &mut String,
        items: &[T],
        element: impl Fn(&Self, &mut String, &T) -> Result<()>,
    ) -> Result<()> {
        if items.is_empty() {
            out.push_str("EMPTY");
            return Ok(());
        }
        out.push('(');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            element(self, out, item)?;
        }
        out.push(')');
        Ok(())
    }

    fn positions(&self, out: &mut String, positions: &[Position]) -> Result<()> {
        self.list(out, positions, |w, out, p| w.position(out, p))
    }

    fn rings(&self, out: &mut String, rings: &[Vec<Position>]) -> Result<()> {
        self.list(out, rings, |w, out, ring| w.positions(out, ring))
    }
}
