//! The two edge kinds of a contour behind one value type.

use crate::bounds::Aabb2;
use crate::primitives::{Arc2, Point2, Segment2, Vec2};
use std::f64::consts::TAU;

/// A contour edge: a straight segment or a circular arc.
///
/// Parameters `t` run from 0 at the start vertex to 1 at the end vertex for
/// both kinds (arc length fraction for lines, sweep fraction for arcs).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// A straight segment.
    Line(Segment2<f64>),
    /// A circular arc.
    Arc(Arc2<f64>),
}

impl Edge {
    /// Creates the edge from `start` to `end` with the given sweep
    /// (exactly `0.0` is a straight edge).
    #[inline]
    pub fn from_sweep(start: Point2<f64>, end: Point2<f64>, sweep: f64) -> Self {
        if sweep == 0.0 {
            Edge::Line(Segment2::new(start, end))
        } else {
            Edge::Arc(Arc2::new(start, end, sweep))
        }
    }

    /// Start vertex.
    #[inline]
    pub fn start(&self) -> Point2<f64> {
        match self {
            Edge::Line(s) => s.start,
            Edge::Arc(a) => a.start,
        }
    }

    /// End vertex.
    #[inline]
    pub fn end(&self) -> Point2<f64> {
        match self {
            Edge::Line(s) => s.end,
            Edge::Arc(a) => a.end,
        }
    }

    /// Signed sweep, `0.0` for straight edges.
    #[inline]
    pub fn sweep(&self) -> f64 {
        match self {
            Edge::Line(_) => 0.0,
            Edge::Arc(a) => a.sweep,
        }
    }

    /// Returns `true` for arc edges.
    #[inline]
    pub fn is_arc(&self) -> bool {
        matches!(self, Edge::Arc(_))
    }

    /// Length of the edge.
    pub fn length(&self) -> f64 {
        match self {
            Edge::Line(s) => s.length(),
            Edge::Arc(a) => a.length(),
        }
    }

    /// Point at parameter `t`.
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        match self {
            Edge::Line(s) => s.point_at(t),
            Edge::Arc(a) => a.point_at(t),
        }
    }

    /// Point halfway along the edge.
    #[inline]
    pub fn midpoint(&self) -> Point2<f64> {
        self.point_at(0.5)
    }

    /// Unit direction of travel at parameter `t`.
    pub fn tangent_at(&self, t: f64) -> Vec2<f64> {
        match self {
            Edge::Line(s) => s.direction().normalize().unwrap_or_default(),
            Edge::Arc(a) => a.tangent_at(t),
        }
    }

    /// Signed curvature: 0 for lines, `±1/r` for arcs, positive when the edge
    /// turns left.
    pub fn curvature(&self) -> f64 {
        match self {
            Edge::Line(_) => 0.0,
            Edge::Arc(a) => a.sweep.signum() / a.radius(),
        }
    }

    /// Closest point on the edge to `p` and its parameter in `[0, 1]`.
    pub fn closest_point(&self, p: Point2<f64>) -> (Point2<f64>, f64) {
        match self {
            Edge::Line(s) => s.closest_point(p),
            Edge::Arc(a) => a.closest_point(p),
        }
    }

    /// Parameter of the point of the edge closest to `p`.
    #[inline]
    pub fn param_of(&self, p: Point2<f64>) -> f64 {
        self.closest_point(p).1
    }

    /// Distance from `p` to the edge.
    #[inline]
    pub fn distance_to_point(&self, p: Point2<f64>) -> f64 {
        let (q, _) = self.closest_point(p);
        p.distance(q)
    }

    /// The part of the edge between parameters `t0` and `t1`.
    pub fn sub_edge(&self, t0: f64, t1: f64) -> Self {
        match self {
            Edge::Line(s) => Edge::Line(s.sub_segment(t0, t1)),
            Edge::Arc(a) => Edge::Arc(a.sub_arc(t0, t1)),
        }
    }

    /// The same edge traversed backwards.
    pub fn reversed(&self) -> Self {
        match self {
            Edge::Line(s) => Edge::Line(s.reversed()),
            Edge::Arc(a) => Edge::Arc(a.reversed()),
        }
    }

    /// Tight bounding box.
    pub fn bounding_box(&self) -> Aabb2<f64> {
        match self {
            Edge::Line(s) => s.bounding_box(),
            Edge::Arc(a) => a.bounding_box(),
        }
    }

    /// Contribution of the edge to the signed area of a closed contour
    /// (shoelace term plus the circular segment).
    pub fn area_term(&self) -> f64 {
        let (s, e) = (self.start(), self.end());
        let shoelace = 0.5 * (s.x * e.y - e.x * s.y);
        match self {
            Edge::Line(_) => shoelace,
            Edge::Arc(a) => shoelace + a.segment_area(),
        }
    }

    /// Signed angle the edge subtends as seen from `p`.
    ///
    /// Summed over a closed contour this is `2π` times the winding number of
    /// the contour around `p`. Arcs add a full turn when `p` lies between the
    /// arc and its chord.
    pub fn winding_angle(&self, p: Point2<f64>) -> f64 {
        let chord = (self.start() - p).signed_angle_to(self.end() - p);
        match self {
            Edge::Arc(a) if a.segment_contains(p) => chord + TAU * a.sweep.signum(),
            _ => chord,
        }
    }

    /// Approximates the edge by a polyline within `tolerance` (sagitta).
    /// The first point is the start vertex, the last the end vertex.
    pub fn to_polyline(&self, tolerance: f64) -> Vec<Point2<f64>> {
        match self {
            Edge::Line(s) => vec![s.start, s.end],
            Edge::Arc(a) => a.to_polyline(tolerance),
        }
    }
}
