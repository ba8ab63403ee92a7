//! Cutting polygons with half-planes, strips and axis-aligned boxes.
//!
//! The cutting region is clipped to a rectangle slightly larger than the
//! polygon's bounding box with the Sutherland-Hodgman step, then
//! intersected with the polygon by the boolean engine.

use super::core::{Polygon, UserData};
use super::options::OperationOptions;
use super::regularize::keep_or_regularize;
use super::set::PolygonOutput;
use crate::bounds::Aabb2;
use crate::error::{PolyError, Result};
use crate::primitives::{Point2, Vec2};

/// The closed half-plane `a·x + b·y ≤ c`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HalfPlane {
    /// X coefficient.
    pub a: f64,
    /// Y coefficient.
    pub b: f64,
    /// Bound.
    pub c: f64,
}

impl HalfPlane {
    /// Creates the half-plane `a·x + b·y ≤ c`.
    ///
    /// Fails with [`PolyError::InvalidArgument`] if `(a, b)` is zero or a
    /// coefficient is not finite.
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self> {
        if !(a.is_finite() && b.is_finite() && c.is_finite()) || (a == 0.0 && b == 0.0) {
            return Err(PolyError::InvalidArgument {
                operation: "half_plane",
                reason: format!("degenerate half-plane ({a}, {b}, {c})"),
            });
        }
        Ok(Self { a, b, c })
    }

    /// The half-plane to the left of the directed line through `p` and `q`.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::polygon::HalfPlane;
    /// use regpoly::Point2;
    ///
    /// // Everything below y = 1
    /// let h = HalfPlane::left_of(Point2::new(1.0, 1.0), Point2::new(0.0, 1.0)).unwrap();
    /// assert!(h.contains(Point2::new(5.0, 0.0)));
    /// assert!(!h.contains(Point2::new(5.0, 2.0)));
    /// ```
    pub fn left_of(p: Point2<f64>, q: Point2<f64>) -> Result<Self> {
        let d = q - p;
        Self::new(d.y, -d.x, d.y * p.x - d.x * p.y)
    }

    /// Signed value of `a·x + b·y - c`; non-positive inside.
    #[inline]
    pub fn value(&self, p: Point2<f64>) -> f64 {
        self.a * p.x + self.b * p.y - self.c
    }

    /// Returns `true` if `p` lies in the closed half-plane.
    #[inline]
    pub fn contains(&self, p: Point2<f64>) -> bool {
        self.value(p) <= 0.0
    }

    /// The complementary closed half-plane.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            a: -self.a,
            b: -self.b,
            c: -self.c,
        }
    }

    fn normal_length(&self) -> f64 {
        Vec2::new(self.a, self.b).magnitude()
    }
}

/// Clips a convex ring to the half-plane `h`, one Sutherland-Hodgman step.
fn clip_ring(ring: Vec<Point2<f64>>, h: &HalfPlane) -> Vec<Point2<f64>> {
    let n = ring.len();
    let mut output = Vec::with_capacity(n + 1);
    for j in 0..n {
        let current = ring[j];
        let next = ring[(j + 1) % n];
        let vc = h.value(current);
        let vn = h.value(next);

        // Crossings only on strict sign changes; vertices on the line are kept once.
        if vc <= 0.0 {
            output.push(current);
            if vc < 0.0 && vn > 0.0 {
                output.push(current.lerp(next, vc / (vc - vn)));
            }
        } else if vn < 0.0 {
            output.push(current.lerp(next, vc / (vc - vn)));
        }
    }
    output
}

impl<U: UserData> Polygon<U> {
    /// Keeps the part of the polygon inside the half-plane `h`.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::polygon::HalfPlane;
    /// use regpoly::{Point2, Polygon};
    ///
    /// let square: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0)).unwrap();
    /// // x <= 0.5
    /// let h = HalfPlane::new(1.0, 0.0, 0.5).unwrap();
    /// let out = square.cut(&h).unwrap();
    /// assert!((out.area() - 1.0).abs() < 1e-9);
    /// ```
    pub fn cut(&self, h: &HalfPlane) -> Result<PolygonOutput<U>> {
        self.cut_multi_with(std::slice::from_ref(h), &OperationOptions::default())
    }

    /// Keeps the part of the polygon inside every half-plane of `planes`.
    pub fn cut_multi(&self, planes: &[HalfPlane]) -> Result<PolygonOutput<U>> {
        self.cut_multi_with(planes, &OperationOptions::default())
    }

    /// Keeps the part of the polygon between two half-planes.
    pub fn strip(&self, h1: &HalfPlane, h2: &HalfPlane) -> Result<PolygonOutput<U>> {
        self.cut_multi_with(&[*h1, *h2], &OperationOptions::default())
    }

    /// [`cut_multi`](Self::cut_multi) with explicit options.
    ///
    /// # Arguments
    ///
    /// * `planes` - Half-planes to keep; an empty slice keeps everything
    /// * `options` - Tolerance, fill rule, hole handling and abort hook
    ///
    /// # Returns
    ///
    /// `ResultSameAsThis` when every half-plane contains the polygon,
    /// `EmptyPolygon` when one of them misses it.
    pub fn cut_multi_with(
        &self,
        planes: &[HalfPlane],
        options: &OperationOptions<'_>,
    ) -> Result<PolygonOutput<U>> {
        let Some(bbox) = self.bounding_box() else {
            return Ok(PolygonOutput::empty());
        };
        let tol = options.tolerance.distance;
        let corners = bbox.corners();

        let mut active = Vec::with_capacity(planes.len());
        for h in planes {
            let slack = tol * h.normal_length();
            if corners.iter().all(|&p| h.value(p) <= slack) {
                continue;
            }
            if corners.iter().all(|&p| h.value(p) >= -slack) {
                log::debug!("cut: polygon outside half-plane {h:?}");
                return Ok(PolygonOutput::empty());
            }
            active.push(*h);
        }
        if active.is_empty() {
            return keep_or_regularize(self, options, "cut");
        }

        let margin = bbox.diagonal().magnitude().max(1.0);
        let frame = bbox.inflated(margin);
        let mut ring = frame.corners().to_vec();
        for h in &active {
            ring = clip_ring(ring, h);
            if ring.len() < 3 {
                return Ok(PolygonOutput::empty());
            }
        }
        let cutter = Self::from_points(&ring)?;
        self.intersection_with(&cutter, options)
    }

    /// Keeps the part of the polygon inside the box `b`.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::bounds::Aabb2;
    /// use regpoly::{Point2, Polygon};
    ///
    /// let disk: Polygon = Polygon::circle(Point2::new(0.0, 0.0), 1.0).unwrap();
    /// let quadrant = Aabb2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
    /// let out = disk.clip(&quadrant).unwrap();
    /// assert!((out.area() - std::f64::consts::PI / 4.0).abs() < 1e-9);
    /// ```
    pub fn clip(&self, b: &Aabb2<f64>) -> Result<PolygonOutput<U>> {
        self.clip_with(b, &OperationOptions::default())
    }

    /// [`clip`](Self::clip) with explicit options.
    pub fn clip_with(&self, b: &Aabb2<f64>, options: &OperationOptions<'_>) -> Result<PolygonOutput<U>> {
        let Some(bbox) = self.bounding_box() else {
            return Ok(PolygonOutput::empty());
        };
        let tol = options.tolerance.distance;
        if b.width() <= tol || b.height() <= tol || !b.intersects(bbox) {
            return Ok(PolygonOutput::empty());
        }
        if b.inflated(tol).contains_box(bbox) {
            return keep_or_regularize(self, options, "clip");
        }
        let frame = Self::rectangle(b.min, b.max)?;
        self.intersection_with(&frame, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::PolygonResult;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn square() -> Polygon {
        Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0)).unwrap()
    }

    #[test]
    fn test_half_plane_rejects_zero_normal() {
        assert!(HalfPlane::new(0.0, 0.0, 1.0).is_err());
        assert!(HalfPlane::new(f64::NAN, 1.0, 1.0).is_err());
        assert!(HalfPlane::left_of(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn test_flipped_is_complement() {
        let h = HalfPlane::new(1.0, 2.0, 3.0).unwrap();
        let p = Point2::new(5.0, 5.0);
        assert_ne!(h.contains(p), h.flipped().contains(p));
    }

    #[test]
    fn test_clip_ring_triangle() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        // Below the diagonal x = y
        let h = HalfPlane::left_of(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0))
            .unwrap()
            .flipped();
        let out = clip_ring(ring, &h);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_clip_ring_vertex_on_line_kept_once() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        // x <= 2 touches the right edge only
        let h = HalfPlane::new(1.0, 0.0, 2.0).unwrap();
        assert_eq!(clip_ring(ring.clone(), &h), ring);
        // x <= 1 crosses two edges strictly
        let h = HalfPlane::new(1.0, 0.0, 1.0).unwrap();
        let out = clip_ring(ring, &h);
        assert_eq!(
            out,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 2.0),
                Point2::new(0.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_cut_diagonal() {
        let h = HalfPlane::new(1.0, 1.0, 4.0).unwrap();
        let out = square().cut(&h).unwrap();
        assert_eq!(out.polygons.len(), 1);
        assert_eq!(out.polygons[0].vertex_count(), 3);
        assert_relative_eq!(out.area(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cut_and_complement_partition() {
        let h = HalfPlane::new(0.3, -1.0, -1.2).unwrap();
        let a = square().cut(&h).unwrap().area();
        let b = square().cut(&h.flipped()).unwrap().area();
        assert_relative_eq!(a + b, 16.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cut_trivial_cases() {
        let keep_all = HalfPlane::new(1.0, 0.0, 10.0).unwrap();
        assert_eq!(
            square().cut(&keep_all).unwrap().result,
            PolygonResult::ResultSameAsThis
        );
        let keep_none = HalfPlane::new(1.0, 0.0, -1.0).unwrap();
        assert_eq!(square().cut(&keep_none).unwrap().result, PolygonResult::EmptyPolygon);
        // Touching the boundary only
        let touch = HalfPlane::new(1.0, 0.0, 0.0).unwrap();
        assert!(square().cut(&touch).unwrap().is_empty());
    }

    #[test]
    fn test_cut_splits_u_shape() {
        let u: Polygon = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(2.0, 3.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 3.0),
            Point2::new(0.0, 3.0),
        ])
        .unwrap();
        // y >= 2
        let h = HalfPlane::new(0.0, -1.0, -2.0).unwrap();
        let out = u.cut(&h).unwrap();
        assert_eq!(out.polygons.len(), 2);
        assert_relative_eq!(out.area(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_strip() {
        let lower = HalfPlane::new(0.0, -1.0, -1.0).unwrap();
        let upper = HalfPlane::new(0.0, 1.0, 3.0).unwrap();
        let out = square().strip(&lower, &upper).unwrap();
        assert_relative_eq!(out.area(), 8.0, epsilon = 1e-9);
        assert!(out.polygons[0].is_a_box());
    }

    #[test]
    fn test_clip_box() {
        let b = Aabb2::new(Point2::new(1.0, 1.0), Point2::new(6.0, 2.0));
        let out = square().clip(&b).unwrap();
        assert_relative_eq!(out.area(), 3.0, epsilon = 1e-9);

        let outside = Aabb2::new(Point2::new(5.0, 5.0), Point2::new(6.0, 6.0));
        assert!(square().clip(&outside).unwrap().is_empty());

        let around = Aabb2::new(Point2::new(-1.0, -1.0), Point2::new(5.0, 5.0));
        assert_eq!(
            square().clip(&around).unwrap().result,
            PolygonResult::ResultSameAsThis
        );
    }

    #[test]
    fn test_cut_circle_in_half() {
        let disk: Polygon = Polygon::circle(Point2::new(0.0, 0.0), 2.0).unwrap();
        let h = HalfPlane::new(0.0, 1.0, 0.0).unwrap();
        let out = disk.cut(&h).unwrap();
        assert_relative_eq!(out.area(), 2.0 * PI, epsilon = 1e-9);
        let p = &out.polygons[0];
        assert_eq!(p.vertex_count(), 2);
        assert!(p.edges().any(|e| e.is_arc()));
    }
}
