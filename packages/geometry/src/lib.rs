#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Point-in-polygon containment for region attribution.
//!
//! Municipality boundaries are few (tens of regions) and sites number in
//! the low hundreds, so containment is a brute-force even-odd ray cast
//! over the raw `GeoJSON` rings rather than a spatial index. Coordinates
//! are plain `[longitude, latitude]` floats with no projection correction.
//!
//! Polygon holes are ignored by default: a polygon is represented by its
//! outer ring only. [`HoleMode::Subtract`] opts into hole-aware
//! containment.

pub mod region;

pub use region::{Region, RegionGeometry};

use thiserror::Error;

/// A `[longitude, latitude]` pair.
pub type Point = [f64; 2];

/// An ordered list of vertices. The first vertex does not need to be
/// repeated at the end.
pub type Ring = Vec<Point>;

/// A polygon as `[outer, ...holes]`.
pub type Polygon = Vec<Ring>;

/// How polygon holes are treated by containment tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoleMode {
    /// Test the outer ring only.
    #[default]
    Ignore,
    /// Inside the outer ring and outside every hole.
    Subtract,
}

/// Reasons a region geometry cannot be used for containment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The feature has no geometry.
    #[error("geometry is missing")]
    Missing,

    /// The geometry is not a `Polygon` or `MultiPolygon`.
    #[error("unsupported geometry type: {0}")]
    UnsupportedType(String),

    /// The geometry could not be parsed as `GeoJSON`.
    #[error("invalid GeoJSON geometry: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },

    /// A polygon without any ring, or a multipolygon without polygons.
    #[error("polygon has no rings")]
    EmptyPolygon,

    /// A ring with fewer than three vertices.
    #[error("ring has {vertices} vertices, at least 3 are required")]
    DegenerateRing {
        /// Number of vertices found.
        vertices: usize,
    },
}

/// Even-odd ray cast of `point` against `ring`.
///
/// Walks edges `(i, j)` where `j` is the previous vertex, wrapping from
/// the last vertex to the first. An edge toggles the result when its
/// endpoints straddle the point's latitude and its longitude at that
/// latitude lies east of the point.
///
/// Rings with fewer than three vertices never contain anything. Points
/// exactly on an edge are not guaranteed either way; with this rule
/// points on a west or south edge of an axis-aligned square count as
/// inside and points on an east or north edge count as outside.
#[must_use]
pub fn contains(point: Point, ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let [lng, lat] = point;
    let mut inside = false;
    let mut j = ring.len() - 1;

    for (i, &[lng_i, lat_i]) in ring.iter().enumerate() {
        let [lng_j, lat_j] = ring[j];

        if (lat_i > lat) != (lat_j > lat) {
            let crossing = (lng_j - lng_i) * (lat - lat_i) / (lat_j - lat_i) + lng_i;
            if lng < crossing {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}

/// Returns `true` if `point` is inside the outer ring of any polygon.
///
/// Holes are not subtracted.
#[must_use]
pub fn contains_multi(point: Point, polygons: &[Polygon]) -> bool {
    polygons
        .iter()
        .filter_map(|polygon| polygon.first())
        .any(|outer| contains(point, outer))
}

/// Hole-aware containment: inside the outer ring and outside every hole.
#[must_use]
pub fn contains_excluding_holes(point: Point, polygon: &[Ring]) -> bool {
    let Some((outer, holes)) = polygon.split_first() else {
        return false;
    };

    contains(point, outer) && !holes.iter().any(|hole| contains(point, hole))
}
