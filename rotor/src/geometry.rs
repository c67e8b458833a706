//! Geometry helpers for the rotor engine
//!
//! Pure angular math over 2D points: signed arc between two touch samples,
//! azimuth of a point around the pivot, and squared distances for the
//! dead-zone tests. The engine works in screen-style coordinates (y grows
//! downward), so positive arcs correspond to clockwise motion on screen.

use std::f64::consts::TAU;

/// A 2D point in the host surface's coordinate space.
///
/// Deliberately not a rendering-framework type so the engine crate stays
/// free of drawing dependencies; host apps convert at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Shorthand constructor, mirroring the `pt2` idiom of drawing crates.
pub const fn pt(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

/// Signed angle in radians swept from `a` to `b` as seen from `center`.
///
/// Computed as `asin(cross / (|a - center| * |b - center|))`, so the result
/// lies in [-PI/2, PI/2]. Positive means `b` is clockwise of `a` in y-down
/// screen coordinates. Touch samples arrive densely enough that the swept
/// angle per call stays far below the quarter-turn ceiling.
///
/// # Panics
///
/// Panics if either point coincides with `center`; the caller must
/// guarantee non-zero distance.
pub fn signed_arc(center: Point, a: Point, b: Point) -> f64 {
    let ax = f64::from(a.x - center.x);
    let ay = f64::from(a.y - center.y);
    let bx = f64::from(b.x - center.x);
    let by = f64::from(b.y - center.y);

    let denom_sq = (ax * ax + ay * ay) * (bx * bx + by * by);
    assert!(
        denom_sq > 0.0,
        "signed_arc requires both points to be distinct from the center"
    );

    let s = (ax * by - ay * bx) / denom_sq.sqrt();
    // Float drift can push |s| marginally past 1, which would NaN the asin.
    s.clamp(-1.0, 1.0).asin()
}

/// Azimuth of `p` around `center` in radians, normalized to [0, 2*PI).
///
/// Zero points along +x; the angle grows clockwise in y-down screen
/// coordinates.
pub fn azimuth(center: Point, p: Point) -> f64 {
    let a = f64::from(p.y - center.y).atan2(f64::from(p.x - center.x));
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Squared euclidean distance between `center` and `p`.
pub fn squared_distance(center: Point, p: Point) -> f32 {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-6;

    #[test]
    fn azimuth_covers_all_quadrants() {
        let c = pt(0.0, 0.0);
        assert!((azimuth(c, pt(1.0, 0.0)) - 0.0).abs() < EPS);
        assert!((azimuth(c, pt(0.0, 1.0)) - FRAC_PI_2).abs() < EPS);
        assert!((azimuth(c, pt(-1.0, 0.0)) - PI).abs() < EPS);
        assert!((azimuth(c, pt(0.0, -1.0)) - 3.0 * FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn azimuth_is_normalized_to_positive_turn() {
        let c = pt(10.0, 10.0);
        for i in 0..24 {
            let theta = (i as f64 / 24.0) * TAU;
            let p = pt(
                10.0 + 5.0 * theta.cos() as f32,
                10.0 + 5.0 * theta.sin() as f32,
            );
            let a = azimuth(c, p);
            assert!((0.0..TAU).contains(&a));
            assert!((a - theta).abs() < 1e-5, "expected {theta}, got {a}");
        }
    }

    #[test]
    fn signed_arc_matches_small_rotations() {
        let c = pt(0.0, 0.0);
        let a = pt(100.0, 0.0);
        for deg in [-40.0_f64, -10.0, -1.0, 1.0, 10.0, 40.0] {
            let theta = deg.to_radians();
            let b = pt(
                (100.0 * theta.cos()) as f32,
                (100.0 * theta.sin()) as f32,
            );
            let arc = signed_arc(c, a, b);
            assert!((arc - theta).abs() < 1e-5, "deg {deg}: got {arc}");
        }
    }

    #[test]
    fn signed_arc_is_radius_independent() {
        let c = pt(50.0, 50.0);
        let a = pt(50.0 + 20.0, 50.0);
        let theta = 15.0_f64.to_radians();
        // Same angular sweep at a different radius.
        let b = pt(
            50.0 + (80.0 * theta.cos()) as f32,
            50.0 + (80.0 * theta.sin()) as f32,
        );
        assert!((signed_arc(c, a, b) - theta).abs() < 1e-5);
    }

    #[test]
    fn signed_arc_clamps_collinear_drift() {
        // Opposite points put the cross term at exactly zero.
        let c = pt(0.0, 0.0);
        assert!(signed_arc(c, pt(1.0, 0.0), pt(-1.0, 0.0)).abs() < EPS);
    }

    #[test]
    #[should_panic(expected = "distinct from the center")]
    fn signed_arc_rejects_degenerate_input() {
        let c = pt(3.0, 3.0);
        signed_arc(c, c, pt(4.0, 4.0));
    }

    #[test]
    fn squared_distance_basic() {
        assert_eq!(squared_distance(pt(0.0, 0.0), pt(3.0, 4.0)), 25.0);
        assert_eq!(squared_distance(pt(1.0, 1.0), pt(1.0, 1.0)), 0.0);
    }
}
