//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

use crate::types::{GeometryType, Ordinate};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Unexpected token while parsing well-known text.
    #[error("syntax error at position {position}: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        position: usize,
    },

    /// Short or unreadable binary input.
    #[error("error while reading: {0}")]
    Read(String),

    #[error("unknown byte order {0}, expected 0 (XDR) or 1 (NDR)")]
    ByteOrder(u8),

    #[error("unknown geometry type code {0:#010x}")]
    UnknownTypeCode(u32),

    /// A nested element or normalized body does not have the kind its parent requires.
    #[error("unexpected geometry: expected {expected}, found {found}")]
    UnexpectedType { expected: String, found: String },

    #[error("{0} bytes of trailing input")]
    TrailingInput(usize),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("the {0}-coordinate is not supported")]
    CoordinateUnsupported(Ordinate),

    /// A homogeneous collection was handed an element of another kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: GeometryType,
        found: GeometryType,
    },

    #[error("offset {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("unable to build geometry")]
    BuildExhausted,

    #[error("invalid precision model: {0}")]
    Precision(String),

    #[error("error while writing: {0}")]
    Write(String),

    #[error("{0} is not supported by the spatial engine")]
    Unsupported(&'static str),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::Read("unexpected end of input".into()),
            _ => Error::Read(format!("{}", e)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_is_a_read_error() {
        let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, Error::Read(_)));
        assert_eq!(err.to_string(), "error while reading: unexpected end of input");
    }

    #[test]
    fn messages() {
        assert_eq!(
            Error::CoordinateUnsupported(Ordinate::Z).to_string(),
            "the z-coordinate is not supported"
        );
        assert_eq!(
            Error::TypeMismatch {
                expected: GeometryType::Point,
                found: GeometryType::Polygon
            }
            .to_string(),
            "type mismatch: expected point, found polygon"
        );
    }
}
