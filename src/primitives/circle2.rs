//! 2D circle type, the supporting curve of arc edges.

use super::{pi, Point2, Vec2};
use crate::bounds::Aabb2;
use num_traits::Float;

/// A 2D circle defined by center and radius.
///
/// # Example
///
/// ```
/// use regpoly::primitives::{Circle2, Point2};
///
/// let circle: Circle2<f64> = Circle2::new(Point2::new(0.0, 0.0), 1.0);
/// assert!(circle.contains(Point2::new(0.5, 0.0)));
/// assert!(!circle.contains(Point2::new(2.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle2<F> {
    /// Center point of the circle
    pub center: Point2<F>,
    /// Radius of the circle (must be non-negative)
    pub radius: F,
}

impl<F: Float> Circle2<F> {
    /// Creates a new circle from center and radius.
    #[inline]
    pub fn new(center: Point2<F>, radius: F) -> Self {
        Self { center, radius }
    }

    /// Returns the area of the circle.
    #[inline]
    pub fn area(&self) -> F {
        pi::<F>() * self.radius * self.radius
    }

    /// Checks if a point is inside the circle (including boundary).
    #[inline]
    pub fn contains(&self, point: Point2<F>) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Returns the point on the circle at the given angle (in radians).
    ///
    /// Angle 0 is at (center.x + radius, center.y), increasing counter-clockwise.
    #[inline]
    pub fn point_at(&self, angle: F) -> Point2<F> {
        self.center + Vec2::from_angle(angle) * self.radius
    }

    /// Returns the axis-aligned bounding box.
    #[inline]
    pub fn bounding_box(&self) -> Aabb2<F> {
        let r = Vec2::new(self.radius, self.radius);
        Aabb2::new(self.center - r, self.center + r)
    }

    /// Returns `true` if both circles lie on the same curve within `eps`.
    #[inline]
    pub fn coincides(&self, other: &Circle2<F>, eps: F) -> bool {
        self.center.coincides(other.center, eps) && (self.radius - other.radius).abs() <= eps
    }

    /// Finds intersection points between two circles.
    ///
    /// Circles whose gap or overlap is within `eps` are treated as tangent and
    /// yield a single touching point instead of none or a near-double root.
    ///
    /// Returns an empty vector for disjoint and for coincident circles (the
    /// latter have infinitely many common points, see [`Circle2::coincides`]).
    pub fn intersect_circle(&self, other: &Circle2<F>, eps: F) -> Vec<Point2<F>> {
        let d = self.center.distance(other.center);
        let r1 = self.radius;
        let r2 = other.radius;

        if d <= eps {
            return Vec::new();
        }
        if d > r1 + r2 + eps || d < (r1 - r2).abs() - eps {
            return Vec::new();
        }

        let two = F::one() + F::one();
        // Distance from center1 to the radical line
        let a = (r1 * r1 - r2 * r2 + d * d) / (two * d);
        let dir = (other.center - self.center) / d;
        let foot = self.center + dir * a;

        let touching = (d - (r1 + r2)).abs() <= eps || (d - (r1 - r2).abs()).abs() <= eps;
        let h_sq = r1 * r1 - a * a;
        if touching || h_sq <= eps * eps {
            return vec![foot];
        }

        let h = h_sq.sqrt();
        let perp = dir.perpendicular();
        vec![foot - perp * h, foot + perp * h]
    }

    /// Intersects the circle with the infinite line through `a` and `b`.
    ///
    /// Returns the line parameters `t` (with `a + t·(b − a)`) of the
    /// intersection points in increasing order. A line whose distance from the
    /// circle is within `eps` of the radius touches it in one point.
    pub fn intersect_line(&self, a: Point2<F>, b: Point2<F>, eps: F) -> Vec<F> {
        let d = b - a;
        let len_sq = d.magnitude_squared();
        if len_sq <= F::epsilon() {
            return Vec::new();
        }
        let len = len_sq.sqrt();

        // Foot of the perpendicular from the center
        let t_foot = (self.center - a).dot(d) / len_sq;
        let foot = a + d * t_foot;
        let dist = foot.distance(self.center);

        if dist > self.radius + eps {
            return Vec::new();
        }
        let h_sq = self.radius * self.radius - dist * dist;
        if h_sq <= F::zero() || self.radius - dist <= eps {
            return vec![t_foot];
        }
        let dt = h_sq.sqrt() / len;
        vec![t_foot - dt, t_foot + dt]
    }
}
