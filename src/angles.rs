//! Bearing and cone geometry.
//!
//! Bearings are in degrees, clockwise from the positive y axis (north), in
//! `[0, 360)`. All functions are pure.

use geo::{ConvexHull, Coord, MultiPoint, Point, Polygon};

/// Bearing of the ray `origin → destination`.
///
/// Computed from the arccosine of the normalised dot product with the north
/// axis, mirrored when `destination.x < origin.x` to pick the western of the
/// two arccosine solutions.
///
/// Precondition: `origin != destination`. The result is NaN otherwise.
pub fn bearing(origin: Coord<f64>, destination: Coord<f64>) -> f64 {
    debug_assert!(origin != destination, "bearing of a zero-length ray");
    let dx = destination.x - origin.x;
    let dy = destination.y - origin.y;
    let cos = (dy / dx.hypot(dy)).clamp(-1.0, 1.0);
    let deg = cos.acos().to_degrees() % 360.0;
    if destination.x < origin.x { 360.0 - deg } else { deg }
}

/// Smallest angle between two bearings, in `[0, 180]`.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let a = a.rem_euclid(360.0);
    let b = b.rem_euclid(360.0);

    let same_half = (a <= 180.0 && b <= 180.0) || (a > 180.0 && b > 180.0);
    if same_half {
        (a - b).abs()
    } else if a > 180.0 {
        (b - a).abs().min((a - (b + 360.0)).abs())
    } else {
        (b - a).abs().min((b - (a + 360.0)).abs())
    }
}

/// Placement of a cone's limits on the circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConeSpan {
    /// Both limits in `[0, 180]`, no wrap.
    Eastern,
    /// Both limits in `(180, 360)`, no wrap.
    Western,
    /// Left limit east, right limit west, crossing 180.
    CrossSouth,
    /// Left limit west, right limit east, crossing 0/360.
    CrossNorth,
    /// Both limits west, wrapping through north.
    WrapWestern,
    /// Both limits east, wrapping through north.
    WrapEastern,
}

impl ConeSpan {
    fn classify(left: f64, right: f64) -> Self {
        let left_east = left <= 180.0;
        let right_east = right <= 180.0;
        match (left <= right, left_east, right_east) {
            (true, true, true) => ConeSpan::Eastern,
            (true, false, false) => ConeSpan::Western,
            (true, true, false) => ConeSpan::CrossSouth,
            (false, false, true) => ConeSpan::CrossNorth,
            (false, false, false) => ConeSpan::WrapWestern,
            (false, true, true) => ConeSpan::WrapEastern,
            // left <= right with left west and right east cannot happen
            (true, false, true) => ConeSpan::CrossNorth,
            // left > right with left east and right west cannot happen
            (false, true, false) => ConeSpan::CrossSouth,
        }
    }
}

/// Whether `test` lies within `reference ± (cone / 2 + 1)` degrees.
pub fn is_within_cone(reference: f64, test: f64, cone: f64) -> bool {
    let half = cone / 2.0 + 1.0;
    if half >= 180.0 {
        return true;
    }
    let left = (reference - half).rem_euclid(360.0);
    let right = (reference + half).rem_euclid(360.0);
    let t = test.rem_euclid(360.0);

    match ConeSpan::classify(left, right) {
        ConeSpan::Eastern => t <= 180.0 && t >= left && t <= right,
        ConeSpan::Western => t > 180.0 && t >= left && t <= right,
        ConeSpan::CrossSouth => t >= left && t <= right,
        ConeSpan::CrossNorth => (t > 180.0 && t >= left) || (t <= 180.0 && t <= right),
        ConeSpan::WrapWestern | ConeSpan::WrapEastern => t >= left || t <= right,
    }
}

/// The point at `distance` from `origin` along `bearing_deg`.
pub fn coord_at_bearing(origin: Coord<f64>, distance: f64, bearing_deg: f64) -> Coord<f64> {
    let rad = bearing_deg.to_radians();
    Coord {
        x: origin.x + distance * rad.sin(),
        y: origin.y + distance * rad.cos(),
    }
}

/// Visibility wedge from `origin` towards `destination`.
///
/// Convex hull of the origin and the two points at `±field_of_view / 2`
/// around the origin→destination bearing, at the origin→destination distance.
pub fn view_field(origin: Coord<f64>, destination: Coord<f64>, field_of_view: f64) -> Polygon<f64> {
    let b = bearing(origin, destination);
    let distance = (destination.x - origin.x).hypot(destination.y - origin.y);
    let left = coord_at_bearing(origin, distance, b - field_of_view / 2.0);
    let right = coord_at_bearing(origin, distance, b + field_of_view / 2.0);
    MultiPoint::new(vec![Point::from(origin), Point::from(left), Point::from(right)]).convex_hull()
}
