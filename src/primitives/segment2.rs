//! 2D line segment type, the straight edge kind of a polygon contour.

use super::{Point2, Vec2};
use crate::bounds::Aabb2;
use num_traits::Float;

/// A 2D line segment defined by two endpoints.
///
/// Generic over floating-point types (`f32` or `f64`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment2<F> {
    pub start: Point2<F>,
    pub end: Point2<F>,
}

impl<F: Float> Segment2<F> {
    /// Creates a new segment from two points.
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>) -> Self {
        Self { start, end }
    }

    /// Creates a segment from coordinate pairs.
    #[inline]
    pub fn from_coords(x1: F, y1: F, x2: F, y2: F) -> Self {
        Self {
            start: Point2::new(x1, y1),
            end: Point2::new(x2, y2),
        }
    }

    /// Returns the direction vector from start to end.
    #[inline]
    pub fn direction(self) -> Vec2<F> {
        self.end - self.start
    }

    /// Returns the squared length of the segment.
    #[inline]
    pub fn length_squared(self) -> F {
        self.start.distance_squared(self.end)
    }

    /// Returns the length of the segment.
    #[inline]
    pub fn length(self) -> F {
        self.start.distance(self.end)
    }

    /// Returns the midpoint of the segment.
    #[inline]
    pub fn midpoint(self) -> Point2<F> {
        self.start.midpoint(self.end)
    }

    /// Returns the point at parameter `t` along the segment.
    ///
    /// - `t = 0` returns `start`
    /// - `t = 1` returns `end`
    /// - Values outside [0, 1] extrapolate beyond the segment
    #[inline]
    pub fn point_at(self, t: F) -> Point2<F> {
        self.start.lerp(self.end, t)
    }

    /// Returns the reversed segment (start and end swapped).
    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    /// Returns the unclamped parameter of the projection of `p` onto the
    /// supporting line. Degenerate segments return 0.
    #[inline]
    pub fn param_of(self, p: Point2<F>) -> F {
        let v = self.direction();
        let len_sq = v.magnitude_squared();
        if len_sq <= F::epsilon() {
            return F::zero();
        }
        (p - self.start).dot(v) / len_sq
    }

    /// Computes the closest point on the segment to the given point.
    ///
    /// Returns a tuple of (closest_point, parameter_t) where t is in [0, 1].
    pub fn closest_point(self, p: Point2<F>) -> (Point2<F>, F) {
        let t = self.param_of(p).max(F::zero()).min(F::one());
        (self.point_at(t), t)
    }

    /// Computes the squared distance from a point to this segment.
    #[inline]
    pub fn distance_squared_to_point(self, p: Point2<F>) -> F {
        let (closest, _) = self.closest_point(p);
        p.distance_squared(closest)
    }

    /// Computes the distance from a point to this segment.
    #[inline]
    pub fn distance_to_point(self, p: Point2<F>) -> F {
        self.distance_squared_to_point(p).sqrt()
    }

    /// Signed distance of `p` from the supporting line, positive on the left.
    ///
    /// Degenerate segments return the plain distance to `start`.
    pub fn signed_line_distance(self, p: Point2<F>) -> F {
        let d = self.direction();
        let len = d.magnitude();
        if len <= F::epsilon() {
            return p.distance(self.start);
        }
        d.cross(p - self.start) / len
    }

    /// Returns the sub-segment between parameters `t0` and `t1`.
    #[inline]
    pub fn sub_segment(self, t0: F, t1: F) -> Self {
        Self::new(self.point_at(t0), self.point_at(t1))
    }

    /// Returns `true` if the segment is degenerate (start equals end within epsilon).
    #[inline]
    pub fn is_degenerate(self, eps: F) -> bool {
        self.length_squared() <= eps * eps
    }

    /// Returns the axis-aligned bounding box of the segment.
    #[inline]
    pub fn bounding_box(self) -> Aabb2<F> {
        Aabb2::from_corners(self.start, self.end)
    }
}

impl<F: Float> From<(Point2<F>, Point2<F>)> for Segment2<F> {
    fn from((start, end): (Point2<F>, Point2<F>)) -> Self {
        Self::new(start, end)
    }
}
