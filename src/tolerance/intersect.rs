//! Tolerant intersection of contour edges (segment/segment, segment/arc,
//! arc/arc).
//!
//! Geometry that is coincident within the distance tolerance is reported as
//! coincident: shared endpoints become a single touching point and collinear
//! or co-circular stretches become an [`EdgeHit::Overlap`], never a cluster
//! of tiny crossings.

use super::{segments_intersect, SegmentIntersection, Tolerance};
use crate::polygon::Edge;
use crate::primitives::{Arc2, Point2, Segment2};

/// One intersection between two edges.
///
/// Parameters are edge parameters in `[0, 1]` (see [`Edge`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeHit {
    /// The edges meet in a single point.
    Point {
        /// The common point.
        point: Point2<f64>,
        /// Parameter along the first edge.
        t1: f64,
        /// Parameter along the second edge.
        t2: f64,
    },
    /// The edges share a stretch of the same line or circle.
    Overlap {
        /// Parameter range of the stretch along the first edge.
        t1: (f64, f64),
        /// Parameters along the second edge of the same two points.
        t2: (f64, f64),
    },
}

/// Computes every intersection between two edges.
///
/// # Arguments
///
/// * `a` - First edge
/// * `b` - Second edge
/// * `tol` - Distance tolerance for coincidence; the angle tolerance is not
///   consulted here because straight/arc classification happens when edges
///   are built
///
/// # Returns
///
/// Point hits ordered as found (endpoint contacts first, then crossings) and
/// at most two overlaps. Point hits are pairwise further apart than the
/// distance tolerance.
///
/// # Example
///
/// ```
/// use regpoly::polygon::Edge;
/// use regpoly::primitives::Point2;
/// use regpoly::tolerance::{intersect_edges, EdgeHit, Tolerance};
///
/// let a = Edge::from_sweep(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0), 0.0);
/// let b = Edge::from_sweep(Point2::new(0.0, 2.0), Point2::new(2.0, 0.0), 0.0);
/// let hits = intersect_edges(&a, &b, &Tolerance::default());
/// assert_eq!(hits.len(), 1);
/// assert!(matches!(hits[0], EdgeHit::Point { .. }));
/// ```
pub fn intersect_edges(a: &Edge, b: &Edge, tol: &Tolerance) -> Vec<EdgeHit> {
    let eps = tol.distance;
    if !a.bounding_box().inflated(eps).intersects(b.bounding_box()) {
        return Vec::new();
    }

    if same_support(a, b, eps) {
        return coincident_hits(a, b, eps);
    }

    let mut hits = Vec::new();

    for (p, t1) in [(a.start(), 0.0), (a.end(), 1.0)] {
        let (q, t2) = b.closest_point(p);
        if p.distance(q) <= eps {
            push_point(&mut hits, p, t1, t2, eps);
        }
    }
    for (p, t2) in [(b.start(), 0.0), (b.end(), 1.0)] {
        let (q, t1) = a.closest_point(p);
        if p.distance(q) <= eps {
            push_point(&mut hits, p, t1, t2, eps);
        }
    }

    let ends = [a.start(), a.end(), b.start(), b.end()];
    for point in crossings(a, b, eps) {
        if ends.iter().any(|e| e.coincides(point, eps)) {
            continue;
        }
        let t1 = a.param_of(point);
        let t2 = b.param_of(point);
        push_point(&mut hits, point, t1, t2, eps);
    }

    hits
}

fn push_point(hits: &mut Vec<EdgeHit>, point: Point2<f64>, t1: f64, t2: f64, eps: f64) {
    let duplicate = hits.iter().any(|h| match h {
        EdgeHit::Point { point: q, .. } => q.coincides(point, eps),
        EdgeHit::Overlap { .. } => false,
    });
    if !duplicate {
        hits.push(EdgeHit::Point { point, t1, t2 });
    }
}

/// Returns `true` if both edges lie on the same line or the same circle.
fn same_support(a: &Edge, b: &Edge, eps: f64) -> bool {
    match (a, b) {
        (Edge::Line(s1), Edge::Line(s2)) => {
            !s1.is_degenerate(eps)
                && s1.signed_line_distance(s2.start).abs() <= eps
                && s1.signed_line_distance(s2.end).abs() <= eps
        }
        (Edge::Arc(a1), Edge::Arc(a2)) => a1.circle().coincides(&a2.circle(), eps),
        _ => false,
    }
}

/// Hits between two edges on the same line or circle.
///
/// The candidate parameters along `a` are its own endpoints and the
/// projections of `b`'s endpoints; every gap between consecutive candidates
/// is either shared (its midpoint lies on `b`) or not.
fn coincident_hits(a: &Edge, b: &Edge, eps: f64) -> Vec<EdgeHit> {
    let mut ts = vec![0.0, 1.0];
    for p in [b.start(), b.end()] {
        let (q, t) = a.closest_point(p);
        if q.distance(p) <= eps {
            ts.push(t);
        }
    }
    ts.sort_by(f64::total_cmp);
    let mut candidates: Vec<f64> = Vec::with_capacity(ts.len());
    for t in ts {
        match candidates.last() {
            Some(&last) if a.point_at(last).coincides(a.point_at(t), eps) => {}
            _ => candidates.push(t),
        }
    }
    // A trailing 1.0 swallowed by a near-equal candidate still has to close
    // the range.
    if let Some(last) = candidates.last_mut() {
        if a.point_at(*last).coincides(a.end(), eps) {
            *last = 1.0;
        }
    }

    let mut spans: Vec<(f64, f64)> = Vec::new();
    for w in candidates.windows(2) {
        let (u, v) = (w[0], w[1]);
        if b.distance_to_point(a.point_at(0.5 * (u + v))) > eps {
            continue;
        }
        match spans.last_mut() {
            Some(span) if span.1 == u => span.1 = v,
            _ => spans.push((u, v)),
        }
    }

    let mut hits: Vec<EdgeHit> = spans
        .iter()
        .map(|&(u, v)| EdgeHit::Overlap {
            t1: (u, v),
            t2: (b.param_of(a.point_at(u)), b.param_of(a.point_at(v))),
        })
        .collect();

    for &t in &candidates {
        let covered = spans.iter().any(|&(u, v)| t >= u && t <= v);
        let p = a.point_at(t);
        if !covered && b.distance_to_point(p) <= eps {
            push_point(&mut hits, p, t, b.param_of(p), eps);
        }
    }
    hits
}

/// Proper crossing points of two edges on different supports.
fn crossings(a: &Edge, b: &Edge, eps: f64) -> Vec<Point2<f64>> {
    match (a, b) {
        (Edge::Line(s1), Edge::Line(s2)) => match segments_intersect(*s1, *s2, eps) {
            SegmentIntersection::Point { point, .. } => vec![point],
            _ => Vec::new(),
        },
        (Edge::Line(s), Edge::Arc(arc)) | (Edge::Arc(arc), Edge::Line(s)) => {
            line_arc_crossings(s, arc, eps)
        }
        (Edge::Arc(a1), Edge::Arc(a2)) => a1
            .circle()
            .intersect_circle(&a2.circle(), eps)
            .into_iter()
            .filter(|p| a1.distance_to_point(*p) <= eps && a2.distance_to_point(*p) <= eps)
            .collect(),
    }
}

fn line_arc_crossings(s: &Segment2<f64>, arc: &Arc2<f64>, eps: f64) -> Vec<Point2<f64>> {
    let len = s.length();
    if len <= eps {
        return Vec::new();
    }
    let slack = eps / len;
    arc.circle()
        .intersect_line(s.start, s.end, eps)
        .into_iter()
        .filter(|&t| t >= -slack && t <= 1.0 + slack)
        .map(|t| s.point_at(t.clamp(0.0, 1.0)))
        .filter(|p| arc.distance_to_point(*p) <= eps)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Edge {
        Edge::from_sweep(Point2::new(x1, y1), Point2::new(x2, y2), 0.0)
    }

    fn points(hits: &[EdgeHit]) -> Vec<Point2<f64>> {
        hits.iter()
            .filter_map(|h| match h {
                EdgeHit::Point { point, .. } => Some(*point),
                EdgeHit::Overlap { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_crossing_lines() {
        let hits = intersect_edges(&line(0.0, 0.0, 2.0, 2.0), &line(0.0, 2.0, 2.0, 0.0), &Tolerance::default());
        assert_eq!(hits.len(), 1);
        match hits[0] {
            EdgeHit::Point { point, t1, t2 } => {
                assert_relative_eq!(point.x, 1.0, epsilon = 1e-12);
                assert_relative_eq!(t1, 0.5, epsilon = 1e-12);
                assert_relative_eq!(t2, 0.5, epsilon = 1e-12);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_shared_vertex_is_one_hit() {
        let hits = intersect_edges(&line(0.0, 0.0, 1.0, 0.0), &line(1.0, 0.0, 1.0, 1.0), &Tolerance::default());
        assert_eq!(hits, vec![EdgeHit::Point { point: Point2::new(1.0, 0.0), t1: 1.0, t2: 0.0 }]);
    }

    #[test]
    fn test_near_touch_reported_as_touch() {
        // b ends 1e-9 away from a's interior: a T-junction, not a miss
        let hits = intersect_edges(&line(0.0, 0.0, 2.0, 0.0), &line(1.0, 1.0, 1.0, 1e-9), &Tolerance::default());
        assert_eq!(hits.len(), 1);
        match hits[0] {
            EdgeHit::Point { t1, t2, .. } => {
                assert_relative_eq!(t1, 0.5, epsilon = 1e-9);
                assert_eq!(t2, 1.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_collinear_overlap() {
        let hits = intersect_edges(&line(0.0, 0.0, 10.0, 0.0), &line(12.0, 0.0, 4.0, 0.0), &Tolerance::default());
        assert_eq!(hits.len(), 1);
        match hits[0] {
            EdgeHit::Overlap { t1, t2 } => {
                assert_relative_eq!(t1.0, 0.4, epsilon = 1e-12);
                assert_relative_eq!(t1.1, 1.0, epsilon = 1e-12);
                assert_relative_eq!(t2.0, 1.0, epsilon = 1e-12);
                assert_relative_eq!(t2.1, 0.25, epsilon = 1e-12);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_line_through_arc() {
        let arc = Edge::from_sweep(Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0), PI);
        let hits = intersect_edges(&line(-2.0, 0.5, 2.0, 0.5), &arc, &Tolerance::default());
        let pts = points(&hits);
        assert_eq!(pts.len(), 2);
        for p in pts {
            assert_relative_eq!(p.x.abs(), 0.75_f64.sqrt(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_line_misses_lower_half_of_circle() {
        // The upper semicircle does not reach y = -0.5
        let arc = Edge::from_sweep(Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0), PI);
        let hits = intersect_edges(&line(-2.0, -0.5, 2.0, -0.5), &arc, &Tolerance::default());
        assert!(hits.is_empty());
    }

    #[test]
    fn test_crossing_arcs() {
        let a = Edge::from_sweep(Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0), PI);
        let b = Edge::from_sweep(Point2::new(2.0, 0.0), Point2::new(0.0, 0.0), PI);
        let pts = points(&intersect_edges(&a, &b, &Tolerance::default()));
        // (0,0) is b's endpoint but not on a; the real crossing is (0.5, √0.75)
        assert_eq!(pts.len(), 1);
        assert_relative_eq!(pts[0].x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(pts[0].y, 0.75_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_cocircular_arcs_overlap() {
        // Upper semicircle and a quarter arc running the other way inside it
        let a = Edge::from_sweep(Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0), PI);
        let b = Edge::from_sweep(Point2::new(0.0, 1.0), Point2::new(1.0, 0.0), -PI / 2.0);
        let hits = intersect_edges(&a, &b, &Tolerance::default());
        assert_eq!(hits.len(), 1);
        match hits[0] {
            EdgeHit::Overlap { t1, t2 } => {
                assert_relative_eq!(t1.0, 0.0, epsilon = 1e-12);
                assert_relative_eq!(t1.1, 0.5, epsilon = 1e-12);
                assert_relative_eq!(t2.0, 1.0, epsilon = 1e-12);
                assert_relative_eq!(t2.1, 0.0, epsilon = 1e-12);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_disjoint_boxes() {
        assert!(intersect_edges(&line(0.0, 0.0, 1.0, 0.0), &line(5.0, 5.0, 6.0, 6.0), &Tolerance::default()).is_empty());
    }
}
