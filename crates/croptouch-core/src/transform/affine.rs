//! 2x3 affine transforms over display and bitmap coordinates.

use crate::geometry::{Point, Rect};

/// A 2x3 affine transform.
///
/// Coefficients are row-major `[a, b, c, d, e, f]` mapping
///
/// ```text
/// x' = a*x + b*y + c
/// y' = d*x + e*y + f
/// ```
///
/// Composition uses [`AffineTransform::then`], which applies `self` first
/// and the argument second. The display transform is built as
/// `rotation.then(scale).then(translation)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    m: [f32; 6],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self {
            m: [1.0, 0.0, tx, 0.0, 1.0, ty],
        }
    }

    /// Uniform scale about the origin.
    pub fn scale(factor: f32) -> Self {
        Self {
            m: [factor, 0.0, 0.0, 0.0, factor, 0.0],
        }
    }

    /// Rotation about the origin.
    ///
    /// Positive angles rotate clockwise in the y-down display coordinate
    /// system, matching the `{0, 90, 180, 270}` clockwise rotation hints the
    /// engine accepts at its boundary. Quarter turns use exact coefficients
    /// so they map pixel centers onto pixel centers without drift.
    pub fn rotation_degrees(degrees: f32) -> Self {
        let (sin, cos) = match degrees.rem_euclid(360.0) {
            a if a == 0.0 => (0.0, 1.0),
            a if a == 90.0 => (1.0, 0.0),
            a if a == 180.0 => (0.0, -1.0),
            a if a == 270.0 => (-1.0, 0.0),
            _ => degrees.to_radians().sin_cos(),
        };
        Self {
            m: [cos, -sin, 0.0, sin, cos, 0.0],
        }
    }

    /// The transform stretching `src` onto `dst` (translate + non-uniform
    /// scale, no rotation).
    ///
    /// Returns `None` when `src` has no area.
    pub fn rect_to_rect(src: Rect, dst: Rect) -> Option<Self> {
        if src.is_empty() {
            return None;
        }
        let sx = dst.width() / src.width();
        let sy = dst.height() / src.height();
        Some(Self {
            m: [
                sx,
                0.0,
                dst.left - src.left * sx,
                0.0,
                sy,
                dst.top - src.top * sy,
            ],
        })
    }

    /// Compose: apply `self` first, then `next`.
    #[must_use]
    pub fn then(&self, next: Self) -> Self {
        let [a, b, c, d, e, f] = self.m;
        let [na, nb, nc, nd, ne, nf] = next.m;
        Self {
            m: [
                na * a + nb * d,
                na * b + nb * e,
                na * c + nb * f + nc,
                nd * a + ne * d,
                nd * b + ne * e,
                nd * c + ne * f + nf,
            ],
        }
    }

    /// Map a point through the transform.
    pub fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.m;
        Point::new(a * p.x + b * p.y + c, d * p.x + e * p.y + f)
    }

    /// The inverse transform, or `None` when the determinant is ~0.
    pub fn invert(&self) -> Option<Self> {
        let [a, b, c, d, e, f] = self.m;
        let det = a * e - b * d;
        if det.abs() < 1e-12 {
            return None;
        }
        let ia = e / det;
        let ib = -b / det;
        let id = -d / det;
        let ie = a / det;
        Some(Self {
            m: [
                ia,
                ib,
                -(ia * c + ib * f),
                id,
                ie,
                -(id * c + ie * f),
            ],
        })
    }

    /// Raw coefficients `[a, b, c, d, e, f]`.
    pub fn coefficients(&self) -> [f32; 6] {
        self.m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(p: Point, x: f32, y: f32) {
        assert!(
            (p.x - x).abs() < 1e-4 && (p.y - y).abs() < 1e-4,
            "expected ({}, {}), got ({}, {})",
            x,
            y,
            p.x,
            p.y
        );
    }

    #[test]
    fn test_identity() {
        let p = AffineTransform::identity().apply(Point::new(3.0, -4.0));
        assert_point_eq(p, 3.0, -4.0);
    }

    #[test]
    fn test_translation() {
        let p = AffineTransform::translation(10.0, -5.0).apply(Point::new(1.0, 2.0));
        assert_point_eq(p, 11.0, -3.0);
    }

    #[test]
    fn test_scale() {
        let p = AffineTransform::scale(2.0).apply(Point::new(3.0, 4.0));
        assert_point_eq(p, 6.0, 8.0);
    }

    #[test]
    fn test_rotation_90_is_clockwise() {
        // In y-down display coordinates, a point on the +x axis moves onto
        // the +y axis (downward on screen) under a clockwise quarter turn.
        let p = AffineTransform::rotation_degrees(90.0).apply(Point::new(1.0, 0.0));
        assert_point_eq(p, 0.0, 1.0);
    }

    #[test]
    fn test_quarter_turns_are_exact() {
        // Quarter turns must not pick up trigonometric rounding error
        let p = AffineTransform::rotation_degrees(180.0).apply(Point::new(1.0, 2.0));
        assert_eq!((p.x, p.y), (-1.0, -2.0));

        let p = AffineTransform::rotation_degrees(270.0).apply(Point::new(1.0, 0.0));
        assert_eq!((p.x, p.y), (0.0, -1.0));

        let p = AffineTransform::rotation_degrees(450.0).apply(Point::new(1.0, 0.0));
        assert_eq!((p.x, p.y), (0.0, 1.0));
    }

    #[test]
    fn test_then_applies_in_order() {
        // Scale first, then translate: (1,1) -> (2,2) -> (12,2)
        let t = AffineTransform::scale(2.0).then(AffineTransform::translation(10.0, 0.0));
        assert_point_eq(t.apply(Point::new(1.0, 1.0)), 12.0, 2.0);

        // Opposite order: (1,1) -> (11,1) -> (22,2)
        let t = AffineTransform::translation(10.0, 0.0).then(AffineTransform::scale(2.0));
        assert_point_eq(t.apply(Point::new(1.0, 1.0)), 22.0, 2.0);
    }

    #[test]
    fn test_rect_to_rect_maps_corners() {
        let src = Rect::new(10.0, 10.0, 20.0, 30.0);
        let dst = Rect::new(0.0, 0.0, 100.0, 50.0);
        let t = AffineTransform::rect_to_rect(src, dst).unwrap();

        assert_point_eq(t.apply(Point::new(10.0, 10.0)), 0.0, 0.0);
        assert_point_eq(t.apply(Point::new(20.0, 30.0)), 100.0, 50.0);
        assert_point_eq(t.apply(Point::new(15.0, 20.0)), 50.0, 25.0);
    }

    #[test]
    fn test_rect_to_rect_empty_src() {
        let src = Rect::new(0.0, 0.0, 0.0, 10.0);
        let dst = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(AffineTransform::rect_to_rect(src, dst).is_none());
    }

    #[test]
    fn test_invert_round_trip() {
        let t = AffineTransform::rotation_degrees(37.0)
            .then(AffineTransform::scale(2.5))
            .then(AffineTransform::translation(12.0, -7.0));
        let inv = t.invert().unwrap();

        let p = Point::new(3.0, 4.0);
        let back = inv.apply(t.apply(p));
        assert_point_eq(back, p.x, p.y);
    }

    #[test]
    fn test_invert_degenerate() {
        let t = AffineTransform::scale(0.0);
        assert!(t.invert().is_none());
    }

    #[test]
    fn test_coefficients_layout() {
        let t = AffineTransform::translation(5.0, 6.0);
        assert_eq!(t.coefficients(), [1.0, 0.0, 5.0, 0.0, 1.0, 6.0]);
    }
}
