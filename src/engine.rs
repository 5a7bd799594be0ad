//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! Pluggable spatial analysis.
//!
//! Topology, measurement and set operations are left to an external engine. Every method
//! defaults to [`Error::Unsupported`], so an implementation only overrides what it provides.

use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::types::SpatialContext;
use std::sync::Arc;

pub trait SpatialEngine: Send + Sync {
    fn envelope(&self, _geometry: &Geometry) -> Result<Geometry> {
        Err(Error::Unsupported("envelope"))
    }

    fn boundary(&self, _geometry: &Geometry) -> Result<Geometry> {
        Err(Error::Unsupported("boundary"))
    }

    fn centroid(&self, _geometry: &Geometry) -> Result<Geometry> {
        Err(Error::Unsupported("centroid"))
    }

    fn point_on_surface(&self, _geometry: &Geometry) -> Result<Geometry> {
        Err(Error::Unsupported("point_on_surface"))
    }

    fn convex_hull(&self, _geometry: &Geometry) -> Result<Geometry> {
        Err(Error::Unsupported("convex_hull"))
    }

    fn buffer(&self, _geometry: &Geometry, _distance: f64) -> Result<Geometry> {
        Err(Error::Unsupported("buffer"))
    }

    /// Reprojects into the coordinate system of `target`.
    fn transform(&self, _geometry: &Geometry, _target: &Arc<SpatialContext>) -> Result<Geometry> {
        Err(Error::Unsupported("transform"))
    }

    fn area(&self, _geometry: &Geometry) -> Result<f64> {
        Err(Error::Unsupported("area"))
    }

    fn length(&self, _geometry: &Geometry) -> Result<f64> {
        Err(Error::Unsupported("length"))
    }

    fn distance(&self, _a: &Geometry, _b: &Geometry) -> Result<f64> {
        Err(Error::Unsupported("distance"))
    }

    fn is_simple(&self, _geometry: &Geometry) -> Result<bool> {
        Err(Error::Unsupported("is_simple"))
    }

    fn intersection(&self, _a: &Geometry, _b: &Geometry) -> Result<Geometry> {
        Err(Error::Unsupported("intersection"))
    }

    fn union(&self, _a: &Geometry, _b: &Geometry) -> Result<Geometry> {
        Err(Error::Unsupported("union"))
    }

    fn difference(&self, _a: &Geometry, _b: &Geometry) -> Result<Geometry> {
        Err(Error::Unsupported("difference"))
    }

    fn sym_difference(&self, _a: &Geometry, _b: &Geometry) -> Result<Geometry> {
        Err(Error::Unsupported("sym_difference"))
    }

    /// Tests `a` against `b` with a DE-9IM intersection matrix pattern.
    fn relate(&self, _a: &Geometry, _b: &Geometry, _pattern: &str) -> Result<bool> {
        Err(Error::Unsupported("relate"))
    }

    fn equals(&self, _a: &Geometry, _b: &Geometry) -> Result<bool> {
        Err(Error::Unsupported("equals"))
    }

    fn disjoint(&self, _a: &Geometry, _b: &Geometry) -> Result<bool> {
        Err(Error::Unsupported("disjoint"))
    }

    fn intersects(&self, _a: &Geometry, _b: &Geometry) -> Result<bool> {
        Err(Error::Unsupported("intersects"))
    }

    fn touches(&self, _a: &Geometry, _b: &Geometry) -> Result<bool> {
        Err(Error::Unsupported("touches"))
    }

    fn crosses(&self, _a: &Geometry, _b: &Geometry) -> Result<bool> {
        Err(Error::Unsupported("crosses"))
    }

    fn within(&self, _a: &Geometry, _b: &Geometry) -> Result<bool> {
        Err(Error::Unsupported("within"))
    }

    fn contains(&self, _a: &Geometry, _b: &Geometry) -> Result<bool> {
        Err(Error::Unsupported("contains"))
    }

    fn overlaps(&self, _a: &Geometry, _b: &Geometry) -> Result<bool> {
        Err(Error::Unsupported("overlaps"))
    }
}

/// The engine a factory starts with. Every operation fails with [`Error::Unsupported`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedEngine;

impl SpatialEngine for UnsupportedEngine {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    struct Flat;

    impl SpatialEngine for Flat {
        fn area(&self, _geometry: &Geometry) -> Result<f64> {
            Ok(0.0)
        }
    }

    #[test]
    fn everything_unsupported() {
        let ctx = Arc::new(SpatialContext::default());
        let g = Geometry::from(Point::new(&ctx, &[1.0, 2.0]));
        let engine = UnsupportedEngine;
        assert!(matches!(engine.area(&g), Err(Error::Unsupported("area"))));
        assert!(matches!(engine.buffer(&g, 1.0), Err(Error::Unsupported("buffer"))));
        assert!(matches!(
            engine.relate(&g, &g, "T*F**FFF*"),
            Err(Error::Unsupported("relate"))
        ));
        assert!(matches!(engine.transform(&g, &ctx), Err(Error::Unsupported(_))));
    }

    #[test]
    fn partial_engine() {
        let ctx = Arc::new(SpatialContext::default());
        let g = Geometry::from(Point::new(&ctx, &[1.0, 2.0]));
        assert_eq!(Flat.area(&g).unwrap(), 0.0);
        assert!(Flat.length(&g).is_err());
    }
}
