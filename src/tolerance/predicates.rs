//! Geometric predicates with explicit tolerance.

use crate::primitives::{Arc2, Point2, Segment2};
use num_traits::Float;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are counter-clockwise (positive area).
    CounterClockwise,
    /// Points are clockwise (negative area).
    Clockwise,
    /// Points are collinear (within tolerance).
    Collinear,
}

/// Computes the orientation of three points with tolerance.
///
/// Returns the orientation of the triangle formed by points `a`, `b`, `c`:
/// - `CounterClockwise` if `c` is to the left of the line from `a` to `b`
/// - `Clockwise` if `c` is to the right of the line from `a` to `b`
/// - `Collinear` if `c` is within distance `eps` of that line
///
/// Unlike a raw cross-product test the tolerance is a distance, so the
/// result does not depend on how long `ab` is.
///
/// # Arguments
///
/// * `a`, `b`, `c` - The three points to test
/// * `eps` - Distance tolerance for collinearity
#[inline]
pub fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> Orientation {
    let d = Segment2::new(a, b).signed_line_distance(c);

    if d > eps {
        Orientation::CounterClockwise
    } else if d < -eps {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Checks if a point lies on a line segment within tolerance.
///
/// Returns `true` if the point `p` is within distance `eps` of the segment.
#[inline]
pub fn point_on_segment<F: Float>(p: Point2<F>, segment: Segment2<F>, eps: F) -> bool {
    segment.distance_squared_to_point(p) <= eps * eps
}

/// Checks if a point lies on a circular arc within tolerance.
///
/// Returns `true` if the point `p` is within distance `eps` of the arc.
#[inline]
pub fn point_on_arc<F: Float>(p: Point2<F>, arc: Arc2<F>, eps: F) -> bool {
    arc.distance_to_point(p) <= eps
}

/// Result of a segment intersection test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection<F> {
    /// Segments do not intersect.
    None,
    /// Segments intersect at a single point.
    Point {
        /// The intersection point.
        point: Point2<F>,
        /// Parameter along first segment (0 = start, 1 = end).
        t1: F,
        /// Parameter along second segment (0 = start, 1 = end).
        t2: F,
    },
    /// Segments are collinear and share a stretch longer than the tolerance.
    Overlapping {
        /// Parameter range of the shared stretch along the first segment.
        t1: (F, F),
        /// Parameters along the second segment of the same two points.
        t2: (F, F),
    },
}

/// Tests if two line segments intersect, with tolerance.
///
/// Returns information about the intersection:
/// - `None` if segments don't intersect
/// - `Point` if they intersect at a single point (within tolerance)
/// - `Overlapping` if they are collinear and overlap
///
/// Collinearity is decided by distance: both endpoints of `s2` must lie
/// within `eps` of the line through `s1`.
///
/// # Arguments
///
/// * `s1` - First segment
/// * `s2` - Second segment
/// * `eps` - Distance tolerance for collinearity and endpoint tests
///
/// # Example
///
/// ```
/// use regpoly::primitives::Segment2;
/// use regpoly::tolerance::{segments_intersect, SegmentIntersection};
///
/// let a: Segment2<f64> = Segment2::from_coords(0.0, 0.0, 10.0, 0.0);
/// let b = Segment2::from_coords(5.0, 0.0, 15.0, 0.0);
/// match segments_intersect(a, b, 1e-9) {
///     SegmentIntersection::Overlapping { t1, .. } => assert_eq!(t1, (0.5, 1.0)),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn segments_intersect<F: Float>(
    s1: Segment2<F>,
    s2: Segment2<F>,
    eps: F,
) -> SegmentIntersection<F> {
    if s1.is_degenerate(eps) {
        if point_on_segment(s1.start, s2, eps) {
            return SegmentIntersection::Point {
                point: s1.start,
                t1: F::zero(),
                t2: s2.closest_point(s1.start).1,
            };
        }
        return SegmentIntersection::None;
    }

    let collinear = s1.signed_line_distance(s2.start).abs() <= eps
        && s1.signed_line_distance(s2.end).abs() <= eps;

    if collinear {
        return collinear_overlap(s1, s2, eps);
    }

    let d1 = s1.direction();
    let d2 = s2.direction();
    let cross = d1.cross(d2);
    if cross == F::zero() {
        return SegmentIntersection::None;
    }

    // Solve: s1.start + t1 * d1 = s2.start + t2 * d2
    let d = s2.start - s1.start;
    let t1 = d.cross(d2) / cross;
    let t2 = d.cross(d1) / cross;

    // Parameter slack equivalent to `eps` along each segment
    let slack1 = eps / s1.length();
    let slack2 = eps / s2.length().max(eps);
    let within = |t: F, slack: F| t >= -slack && t <= F::one() + slack;

    if within(t1, slack1) && within(t2, slack2) {
        let t1 = t1.max(F::zero()).min(F::one());
        SegmentIntersection::Point {
            point: s1.point_at(t1),
            t1,
            t2: t2.max(F::zero()).min(F::one()),
        }
    } else {
        SegmentIntersection::None
    }
}

fn collinear_overlap<F: Float>(s1: Segment2<F>, s2: Segment2<F>, eps: F) -> SegmentIntersection<F> {
    let a = s1.param_of(s2.start);
    let b = s1.param_of(s2.end);
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

    let start = lo.max(F::zero());
    let end = hi.min(F::one());
    let len = s1.length();

    if (start - end) * len > eps {
        return SegmentIntersection::None;
    }

    let t2_of = |t: F| s2.param_of(s1.point_at(t)).max(F::zero()).min(F::one());

    if (end - start) * len <= eps {
        let t = start.max(F::zero()).min(F::one());
        return SegmentIntersection::Point {
            point: s1.point_at(t),
            t1: t,
            t2: t2_of(t),
        };
    }

    SegmentIntersection::Overlapping {
        t1: (start, end),
        t2: (t2_of(start), t2_of(end)),
    }
}
