//! Screen-space geometry: points, component bodies, and pipe curves.
//!
//! Coordinates are canvas pixels with `y` growing downwards.

use core::ops::{Add, Sub};

use crate::kind::{BODY_SIZE, ComponentKind};

/// 2D vector / point in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Points and offsets share one representation.
pub type Point = Vec2;

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        let d = self - other;
        (d.x * d.x + d.y * d.y).sqrt()
    }

    pub fn midpoint(self, other: Vec2) -> Vec2 {
        Vec2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Horizontal bow of a pipe curve away from the straight line.
pub const CURVE_BOW_X: f64 = 50.0;
/// Vertical bow of a pipe curve away from the straight line.
pub const CURVE_BOW_Y: f64 = 30.0;
/// An anchor is picked when the pointer is strictly closer than this.
pub const ANCHOR_PICK_RADIUS: f64 = 15.0;
/// A dropped component is placed this far up/left of the drop point.
pub const DROP_OFFSET: f64 = 60.0;

/// Inbound and outbound anchor points of a placed component.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchors {
    pub inbound: Point,
    pub outbound: Point,
}

impl Anchors {
    /// Anchors of a `kind` body whose top-left corner is at `origin`.
    pub fn for_kind(kind: ComponentKind, origin: Point) -> Self {
        let offsets = kind.anchor_offsets();
        Self {
            inbound: origin + offsets.inbound,
            outbound: origin + offsets.outbound,
        }
    }
}

/// Whether `p` lies on the (inclusive) body of a component at `origin`.
pub fn body_contains(origin: Point, p: Point) -> bool {
    p.x >= origin.x && p.x <= origin.x + BODY_SIZE && p.y >= origin.y && p.y <= origin.y + BODY_SIZE
}

/// Whether `p` is close enough to `anchor` to grab it.
pub fn near_anchor(anchor: Point, p: Point) -> bool {
    anchor.distance(p) < ANCHOR_PICK_RADIUS
}

/// Quadratic Bézier pipe between an outbound and an inbound anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadCurve {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl QuadCurve {
    /// Curve from `start` to `end` with the control point bowed off the midpoint.
    ///
    /// The bow direction depends only on where `end` sits relative to
    /// `start`, so every pipe between the same two anchors bends the same way.
    pub fn between(start: Point, end: Point) -> Self {
        let mid = start.midpoint(end);
        let dx = if start.y > end.y { -CURVE_BOW_X } else { CURVE_BOW_X };
        let dy = if start.x > end.x { -CURVE_BOW_Y } else { CURVE_BOW_Y };
        Self {
            start,
            control: mid + Vec2::new(dx, dy),
            end,
        }
    }

    /// Point at parameter `t` (not clamped).
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let a = u * u;
        let b = 2.0 * u * t;
        let c = t * t;
        Vec2::new(
            a * self.start.x + b * self.control.x + c * self.end.x,
            a * self.start.y + b * self.control.y + c * self.end.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn anchors_follow_origin() {
        let a = Anchors::for_kind(ComponentKind::Compressor, Vec2::new(100.0, 200.0));
        assert_eq!(a.inbound, Vec2::new(60.0, 240.0));
        assert_eq!(a.outbound, Vec2::new(210.0, 180.0));
    }

    #[test]
    fn curve_endpoints() {
        let c = QuadCurve::between(Vec2::new(0.0, 0.0), Vec2::new(100.0, 40.0));
        assert_eq!(c.point_at(0.0), c.start);
        let end = c.point_at(1.0);
        assert!(close(end.x, 100.0));
        assert!(close(end.y, 40.0));
    }

    #[test]
    fn control_point_bow_signs() {
        // end is below and right of start: +x, +y bow
        let c = QuadCurve::between(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        assert_eq!(c.control, Vec2::new(100.0, 80.0));

        // end is above and left of start: -x, -y bow
        let c = QuadCurve::between(Vec2::new(100.0, 100.0), Vec2::new(0.0, 0.0));
        assert_eq!(c.control, Vec2::new(0.0, 20.0));
    }

    #[test]
    fn curve_midpoint_value() {
        let c = QuadCurve::between(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        // control = (50 + 50, 0 + 30)
        assert_eq!(c.control, Vec2::new(100.0, 30.0));
        let p = c.point_at(0.5);
        assert!(close(p.x, 75.0));
        assert!(close(p.y, 15.0));
    }

    #[test]
    fn body_hit_test_is_inclusive() {
        let origin = Vec2::new(10.0, 10.0);
        assert!(body_contains(origin, Vec2::new(10.0, 10.0)));
        assert!(body_contains(origin, Vec2::new(100.0, 100.0)));
        assert!(!body_contains(origin, Vec2::new(100.1, 50.0)));
    }

    #[test]
    fn anchor_pick_radius_is_strict() {
        let a = Vec2::new(0.0, 0.0);
        assert!(near_anchor(a, Vec2::new(14.9, 0.0)));
        assert!(!near_anchor(a, Vec2::new(15.0, 0.0)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn point() -> impl Strategy<Value = Vec2> {
        (-2000.0..2000.0_f64, -2000.0..2000.0_f64).prop_map(|(x, y)| Vec2::new(x, y))
    }

    proptest! {
        #[test]
        fn curve_hits_both_anchors(start in point(), end in point()) {
            let curve = QuadCurve::between(start, end);
            prop_assert!(curve.point_at(0.0).distance(start) < 1e-9);
            prop_assert!(curve.point_at(1.0).distance(end) < 1e-9);
        }

        #[test]
        fn curve_stays_in_control_hull(start in point(), end in point(), t in 0.0..=1.0_f64) {
            let curve = QuadCurve::between(start, end);
            let p = curve.point_at(t);
            let xs = [curve.start.x, curve.control.x, curve.end.x];
            let ys = [curve.start.y, curve.control.y, curve.end.y];
            let eps = 1e-9;
            prop_assert!(p.x >= xs.iter().cloned().fold(f64::INFINITY, f64::min) - eps);
            prop_assert!(p.x <= xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + eps);
            prop_assert!(p.y >= ys.iter().cloned().fold(f64::INFINITY, f64::min) - eps);
            prop_assert!(p.y <= ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + eps);
        }
    }
}
