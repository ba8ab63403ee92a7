//! Convex hulls.
//!
//! [`convex_hull`] works on plain point sets; [`Polygon::convex_hull`]
//! approximates arcs by polylines first and returns a straight-edged
//! polygon.
//!
//! # Example
//!
//! ```
//! use regpoly::hull::convex_hull;
//! use regpoly::Point2;
//!
//! let points: Vec<Point2<f64>> = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.5, 0.5), // Interior point
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//!
//! let hull = convex_hull(&points);
//!
//! // Hull should be the 4 corners (interior point excluded)
//! assert_eq!(hull.len(), 4);
//! ```

use crate::error::{PolyError, Result};
use crate::polygon::{Polygon, UserData};
use crate::primitives::Point2;
use num_traits::Float;

/// Computes the convex hull of a set of points using Andrew's monotone chain algorithm.
///
/// Returns the hull vertices in counter-clockwise order, starting from the
/// lowest-leftmost point. Collinear points on the hull boundary are dropped
/// and the hull is implicitly closed.
///
/// # Arguments
///
/// * `points` - The input points
///
/// # Returns
///
/// The convex hull vertices in CCW order. Fewer than 3 points come back
/// unchanged; a collinear set gives its 2 extreme points.
pub fn convex_hull<F: Float>(points: &[Point2<F>]) -> Vec<Point2<F>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut sorted: Vec<Point2<F>> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lower = half_hull(sorted.iter().copied());
    let upper = half_hull(sorted.iter().rev().copied());
    lower.extend(upper);
    lower
}

/// One monotone chain; its last point starts the other chain and is dropped.
fn half_hull<F: Float>(points: impl Iterator<Item = Point2<F>>) -> Vec<Point2<F>> {
    let mut chain: Vec<Point2<F>> = Vec::new();
    for p in points {
        while chain.len() >= 2 && cross(&chain[chain.len() - 2], &chain[chain.len() - 1], &p) <= F::zero() {
            chain.pop();
        }
        chain.push(p);
    }
    chain.pop();
    chain
}

/// Cross product of (a - o) and (b - o).
fn cross<F: Float>(o: &Point2<F>, a: &Point2<F>, b: &Point2<F>) -> F {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

impl<U: UserData> Polygon<U> {
    /// Convex hull of the outer contour.
    ///
    /// Arcs are replaced by polylines whose sagitta stays within
    /// `arc_tolerance`, so the hull of a curved polygon lies slightly inside
    /// the true hull. The result has no tags, keeps the flags and is
    /// regularized; an empty polygon gives an empty hull.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::{Point2, Polygon};
    ///
    /// let l_shape: Polygon = Polygon::from_points(&[
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(2.0, 0.0),
    ///     Point2::new(2.0, 1.0),
    ///     Point2::new(1.0, 1.0),
    ///     Point2::new(1.0, 2.0),
    ///     Point2::new(0.0, 2.0),
    /// ])
    /// .unwrap();
    /// let hull = l_shape.convex_hull(1e-3).unwrap();
    /// assert_eq!(hull.vertex_count(), 5);
    /// assert!((hull.area() - 3.5).abs() < 1e-12);
    /// ```
    pub fn convex_hull(&self, arc_tolerance: f64) -> Result<Polygon<U>> {
        const OPERATION: &str = "convex_hull";
        if !(arc_tolerance > 0.0 && arc_tolerance.is_finite()) {
            return Err(PolyError::InvalidArgument {
                operation: OPERATION,
                reason: format!("arc tolerance {arc_tolerance} must be positive"),
            });
        }
        let Some(outer) = self.contours.first() else {
            return Ok(Polygon::with_flags(self.flags));
        };
        let mut points = Vec::with_capacity(outer.len());
        for edge in outer.edges() {
            if edge.is_arc() {
                let polyline = edge.to_polyline(arc_tolerance);
                points.extend_from_slice(&polyline[..polyline.len() - 1]);
            } else {
                points.push(edge.start());
            }
        }
        let hull = convex_hull(&points);
        log::trace!("{OPERATION}: {} of {} points on the hull", hull.len(), points.len());
        let mut out = Polygon::from_points(&hull)?;
        out.set_flags(self.flags);
        out.regularized = true;
        Ok(out)
    }
}
