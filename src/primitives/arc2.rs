//! Circular arc edges given by their endpoints and a signed sweep angle.
//!
//! The center and radius of an [`Arc2`] are derived from the chord and the
//! sweep, never stored, so an arc edge always connects exactly the two
//! vertices it is attached to.

use super::{tau, Circle2, Point2, Segment2, Vec2};
use crate::bounds::Aabb2;
use num_traits::Float;

/// A 2D circular arc from `start` to `end` turning through `sweep` radians.
///
/// Positive sweep turns counter-clockwise, negative clockwise. The magnitude
/// must lie in `(0, 2π)`: a full circle is two arcs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc2<F> {
    /// First endpoint.
    pub start: Point2<F>,
    /// Second endpoint.
    pub end: Point2<F>,
    /// Signed sweep angle in radians.
    pub sweep: F,
}

impl<F: Float> Arc2<F> {
    /// Creates a new arc. No validation is performed.
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>, sweep: F) -> Self {
        Self { start, end, sweep }
    }

    /// Returns the chord from `start` to `end`.
    #[inline]
    pub fn chord(&self) -> Segment2<F> {
        Segment2::new(self.start, self.end)
    }

    /// Returns the radius, derived from the chord length and the sweep.
    ///
    /// Returns infinity for a zero sweep (the arc is a straight segment).
    pub fn radius(&self) -> F {
        let two = F::one() + F::one();
        let s = (self.sweep.abs() / two).sin();
        if s <= F::epsilon() {
            return F::infinity();
        }
        self.start.distance(self.end) / (two * s)
    }

    /// Returns the center of the supporting circle.
    ///
    /// The center lies on the chord's perpendicular bisector, left of the
    /// chord for counter-clockwise sweeps below π.
    pub fn center(&self) -> Point2<F> {
        let two = F::one() + F::one();
        let half = self.sweep / two;
        let mid = self.start.midpoint(self.end);
        let chord = self.end - self.start;
        let h = chord.magnitude() / two * half.cos() / half.sin();
        match chord.normalize() {
            Some(u) => mid + u.perpendicular() * h,
            None => mid,
        }
    }

    /// Returns the supporting circle.
    #[inline]
    pub fn circle(&self) -> Circle2<F> {
        Circle2::new(self.center(), self.radius())
    }

    /// Returns the polar angle of `start` around the center.
    #[inline]
    pub fn start_angle(&self) -> F {
        (self.start - self.center()).angle()
    }

    /// Evaluates the arc at parameter `t` (0 = start, 1 = end).
    pub fn point_at(&self, t: F) -> Point2<F> {
        if t <= F::zero() {
            return self.start;
        }
        if t >= F::one() {
            return self.end;
        }
        let c = self.center();
        c + (self.start - c).rotated(self.sweep * t)
    }

    /// Returns the unit tangent (direction of travel) at parameter `t`.
    ///
    /// The start tangent is the chord direction turned back by half the sweep.
    pub fn tangent_at(&self, t: F) -> Vec2<F> {
        let two = F::one() + F::one();
        match (self.end - self.start).normalize() {
            Some(u) => u.rotated(self.sweep * t - self.sweep / two),
            None => Vec2::zero(),
        }
    }

    /// Returns the point halfway along the arc.
    #[inline]
    pub fn midpoint(&self) -> Point2<F> {
        let two = F::one() + F::one();
        self.point_at(F::one() / two)
    }

    /// Returns the arc length.
    pub fn length(&self) -> F {
        if self.sweep.abs() <= F::epsilon() {
            return self.start.distance(self.end);
        }
        self.radius() * self.sweep.abs()
    }

    /// Signed area between the chord and the arc.
    ///
    /// Adding this to the shoelace area of the chord polygon gives the area of
    /// an arc-bounded contour. Positive for counter-clockwise sweeps, which
    /// bulge to the right of the chord.
    pub fn segment_area(&self) -> F {
        if self.sweep.abs() <= F::epsilon() {
            return F::zero();
        }
        let two = F::one() + F::one();
        let r = self.radius();
        r * r / two * (self.sweep - self.sweep.sin())
    }

    /// Returns `true` if `p` lies strictly inside the region enclosed by the
    /// arc and its chord.
    pub fn segment_contains(&self, p: Point2<F>) -> bool {
        if self.sweep == F::zero() {
            return false;
        }
        let side = (self.end - self.start).cross(p - self.start);
        let inside_circle = p.distance_squared(self.center()) < self.radius() * self.radius();
        inside_circle && side * self.sweep < F::zero()
    }

    /// Returns the position of `p` along the arc as a fraction of the sweep.
    ///
    /// The polar angle of `p` is measured from `start` in the sweep direction
    /// and normalized to `[0, 2π)`, so points on the arc map to `[0, 1]` and
    /// points on the complementary arc map beyond 1.
    pub fn param_of(&self, p: Point2<F>) -> F {
        let c = self.center();
        let full = tau::<F>();
        let mut delta = (self.start - c).signed_angle_to(p - c);
        if self.sweep < F::zero() {
            delta = -delta;
        }
        if delta < F::zero() {
            delta = delta + full;
        }
        delta / self.sweep.abs()
    }

    /// Returns `true` if `p` lies on the arc within distance `eps`.
    pub fn contains_point(&self, p: Point2<F>, eps: F) -> bool {
        if p.coincides(self.start, eps) || p.coincides(self.end, eps) {
            return true;
        }
        let c = self.center();
        if (p.distance(c) - self.radius()).abs() > eps {
            return false;
        }
        let t = self.param_of(p);
        t >= F::zero() && t <= F::one()
    }

    /// Computes the closest point on the arc to `p`.
    ///
    /// Returns a tuple of (closest_point, parameter_t) where t is in [0, 1].
    pub fn closest_point(&self, p: Point2<F>) -> (Point2<F>, F) {
        let c = self.center();
        if p.distance_squared(c) > F::epsilon() {
            let t = self.param_of(p);
            if t <= F::one() {
                return (self.point_at(t), t);
            }
        }
        if p.distance_squared(self.start) <= p.distance_squared(self.end) {
            (self.start, F::zero())
        } else {
            (self.end, F::one())
        }
    }

    /// Computes the distance from `p` to the arc.
    #[inline]
    pub fn distance_to_point(&self, p: Point2<F>) -> F {
        let (q, _) = self.closest_point(p);
        p.distance(q)
    }

    /// Splits the arc at parameter `t` into two arcs sharing the split point.
    pub fn split_at(&self, t: F) -> (Self, Self) {
        let mid = self.point_at(t);
        (
            Self::new(self.start, mid, self.sweep * t),
            Self::new(mid, self.end, self.sweep * (F::one() - t)),
        )
    }

    /// Returns the part of the arc between parameters `t0` and `t1`.
    #[inline]
    pub fn sub_arc(&self, t0: F, t1: F) -> Self {
        Self::new(self.point_at(t0), self.point_at(t1), self.sweep * (t1 - t0))
    }

    /// Returns the same arc traversed in the opposite direction.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start, -self.sweep)
    }

    /// Returns `true` if the sweep covers a full turn within `angle_eps`.
    #[inline]
    pub fn is_full_circle(&self, angle_eps: F) -> bool {
        self.sweep.abs() >= tau::<F>() - angle_eps
    }

    /// Returns the tight axis-aligned bounding box.
    ///
    /// Includes the endpoints and every axis-extreme point of the supporting
    /// circle that the sweep passes through.
    pub fn bounding_box(&self) -> Aabb2<F> {
        let mut bb = Aabb2::from_corners(self.start, self.end);
        if self.sweep.abs() <= F::epsilon() {
            return bb;
        }
        let c = self.center();
        let r = self.radius();
        let axes = [
            Vec2::new(F::one(), F::zero()),
            Vec2::new(F::zero(), F::one()),
            Vec2::new(-F::one(), F::zero()),
            Vec2::new(F::zero(), -F::one()),
        ];
        for axis in axes {
            let q = c + axis * r;
            if self.param_of(q) <= F::one() {
                bb = bb.expand_to_include(q);
            }
        }
        bb
    }

    /// Converts the arc to a polyline.
    ///
    /// # Arguments
    ///
    /// * `tolerance` - Maximum allowed deviation from the true arc (sagitta).
    ///
    /// # Returns
    ///
    /// A vector of points approximating the arc, starting at `start` and
    /// ending exactly at `end`.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::primitives::{Arc2, Point2};
    /// use std::f64::consts::PI;
    ///
    /// // Quarter circle
    /// let arc = Arc2::new(Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), PI / 2.0);
    ///
    /// let polyline = arc.to_polyline(0.01);
    /// assert!(polyline.len() >= 2);
    /// assert_eq!(polyline[polyline.len() - 1], arc.end);
    /// ```
    pub fn to_polyline(&self, tolerance: F) -> Vec<Point2<F>> {
        if self.sweep.abs() <= F::epsilon() {
            return vec![self.start, self.end];
        }

        let num_segments = self.segments_for_tolerance(tolerance);
        let n = F::from(num_segments).unwrap_or_else(F::one);

        let mut points = Vec::with_capacity(num_segments + 1);
        points.push(self.start);
        let mut i = F::one();
        for _ in 1..num_segments {
            points.push(self.point_at(i / n));
            i = i + F::one();
        }
        points.push(self.end);
        points
    }

    /// Calculates the number of segments needed for a given tolerance.
    fn segments_for_tolerance(&self, tolerance: F) -> usize {
        let one = F::one();
        let two = one + one;
        let radius = self.radius();
        let sweep = self.sweep.abs();

        if !radius.is_finite() || radius <= F::epsilon() || sweep <= F::epsilon() {
            return 1;
        }
        if tolerance >= radius {
            return 1;
        }

        // Maximum angle per segment: θ = 2 * acos(1 - tolerance/radius)
        let ratio = (one - tolerance / radius).max(-one).min(one);
        let max_angle = two * ratio.acos();
        if max_angle <= F::epsilon() {
            return 1;
        }

        let n = (sweep / max_angle).ceil();
        n.to_usize().unwrap_or(1).max(1)
    }
}
