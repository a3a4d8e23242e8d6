//! Planar geometry helpers shared by the graph and the vector layer.
//!
//! Coordinates are projected (metres); everything here is Euclidean.

use geo::{Coord, CoordsIter, Distance, Euclidean, Geometry, Line, LineString, Point};
use serde::{Deserialize, Serialize};

/// Hashable key for an exact coordinate.
///
/// `-0.0` is folded into `0.0` so that the two never produce distinct nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordKey(u64, u64);

impl CoordKey {
    pub fn new(c: Coord<f64>) -> Self {
        Self(canonical_bits(c.x), canonical_bits(c.y))
    }
}

impl From<Coord<f64>> for CoordKey {
    fn from(c: Coord<f64>) -> Self {
        Self::new(c)
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

pub fn midpoint(a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
    Coord { x: (a.x + b.x) / 2.0, y: (a.y + b.y) / 2.0 }
}

/// Distance from a point to any geometry; `0.0` when the point lies inside an
/// areal geometry. Empty geometries are infinitely far away.
pub fn distance_to_geometry(p: Coord<f64>, geometry: &Geometry<f64>) -> f64 {
    if geometry.coords_count() == 0 {
        return f64::INFINITY;
    }
    Euclidean.distance(&Point::from(p), geometry)
}

/// Whether every vertex of `line` lies within `radius` of the segment `a`–`b`.
///
/// The region within a fixed distance of a segment is convex, so containing
/// all vertices means containing the whole line.
pub fn line_within_corridor(line: &LineString<f64>, a: Coord<f64>, b: Coord<f64>, radius: f64) -> bool {
    let axis = Line::new(a, b);
    line.coords().all(|c| Euclidean.distance(*c, &axis) <= radius)
}
