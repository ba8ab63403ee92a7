//! Position of points, curves and regions relative to a polygon.
//!
//! Extended elements are split where they meet the polygon boundary and
//! every piece is classified at its midpoint, so an element counts as
//! inside only if all of it is. Whether the boundary itself belongs to the
//! polygon is chosen per query with [`Boundary`].

use super::core::{Polygon, UserData};
use super::edge::Edge;
use super::options::FillingMethod;
use super::polyline::Polyline;
use super::set::PolygonSet;
use super::winding::OperandWinding;
use crate::bounds::Aabb2;
use crate::primitives::{Arc2, Point2, Segment2};
use crate::tolerance::{intersect_edges, EdgeHit, Tolerance};

/// Whether the polygon boundary belongs to the polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Boundary {
    /// The polygon is a closed set: touching the boundary from inside is
    /// still inside.
    #[default]
    Closed,
    /// The polygon is an open set: touching the boundary from outside is
    /// still outside.
    Opened,
}

/// Coarse position of an element relative to a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelativePosition {
    /// Entirely outside.
    Outside,
    /// Entirely on the boundary.
    OnBoundary,
    /// Entirely inside.
    Inside,
    /// Partly inside and partly outside.
    Overlapping,
}

/// Where on the boundary a point lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetailedRelativePosition {
    /// Not on the boundary.
    NotOnBoundary,
    /// On a vertex of any contour.
    OnVertex,
    /// On an edge of the outer contour.
    OnOuterContour,
    /// On an edge of a hole.
    OnHoleContour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    In,
    On,
    Out,
}

/// Which sides the samples of an element fell on.
#[derive(Debug, Default, Clone, Copy)]
struct Coverage {
    inside: bool,
    on: bool,
    outside: bool,
}

impl Coverage {
    fn add(&mut self, side: Side) {
        match side {
            Side::In => self.inside = true,
            Side::On => self.on = true,
            Side::Out => self.outside = true,
        }
    }

    fn position(self, boundary: Boundary) -> RelativePosition {
        use RelativePosition::*;
        match (self.inside, self.on, self.outside) {
            (true, _, true) => Overlapping,
            (true, false, false) => Inside,
            (true, true, false) if boundary == Boundary::Closed => Inside,
            (true, true, false) => Overlapping,
            (false, true, true) if boundary == Boundary::Closed => Overlapping,
            (false, true, true) => Outside,
            (false, true, false) => OnBoundary,
            (false, false, _) => Outside,
        }
    }
}

/// Boundary and winding lookups for one polygon.
struct Locator<'a, U: UserData> {
    polygon: &'a Polygon<U>,
    winding: OperandWinding,
    tol: Tolerance,
}

impl<'a, U: UserData> Locator<'a, U> {
    fn new(polygon: &'a Polygon<U>, tol: Tolerance) -> Self {
        Self {
            polygon,
            winding: OperandWinding::new(polygon, true),
            tol,
        }
    }

    fn side(&self, p: Point2<f64>) -> Side {
        if self
            .polygon
            .edges()
            .any(|e| e.distance_to_point(p) <= self.tol.distance)
        {
            Side::On
        } else if FillingMethod::default().is_inside(self.winding.winding(p)) {
            Side::In
        } else {
            Side::Out
        }
    }

    fn cover(&self, edges: impl IntoIterator<Item = Edge>) -> Coverage {
        let mut coverage = Coverage::default();
        for e in edges {
            let mut ts = vec![0.0, 1.0];
            for b in self.polygon.edges() {
                for hit in intersect_edges(&e, &b, &self.tol) {
                    match hit {
                        EdgeHit::Point { t1, .. } => ts.push(t1),
                        EdgeHit::Overlap { t1: (a, b), .. } => ts.extend([a, b]),
                    }
                }
            }
            ts.sort_by(f64::total_cmp);
            ts.dedup_by(|a, b| (*a - *b).abs() <= 1e-12);
            for &t in &ts {
                coverage.add(self.side(e.point_at(t)));
            }
            for w in ts.windows(2) {
                coverage.add(self.side(e.point_at(0.5 * (w[0] + w[1]))));
            }
        }
        coverage
    }
}

impl<U: UserData> Polygon<U> {
    /// Position of `p` with the default tolerance.
    ///
    /// A point on the boundary is [`RelativePosition::OnBoundary`] whatever
    /// `boundary` says; the detail tells which contour it is on.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::polygon::{Boundary, DetailedRelativePosition, RelativePosition};
    /// use regpoly::{Point2, Polygon};
    ///
    /// let square: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0)).unwrap();
    /// let (pos, detail) = square.position_of_point(Point2::new(2.0, 2.0), Boundary::Closed);
    /// assert_eq!(pos, RelativePosition::OnBoundary);
    /// assert_eq!(detail, DetailedRelativePosition::OnVertex);
    /// ```
    pub fn position_of_point(
        &self,
        p: Point2<f64>,
        boundary: Boundary,
    ) -> (RelativePosition, DetailedRelativePosition) {
        self.position_of_point_with(p, boundary, &Tolerance::default())
    }

    /// [`position_of_point`](Self::position_of_point) with an explicit
    /// tolerance.
    pub fn position_of_point_with(
        &self,
        p: Point2<f64>,
        _boundary: Boundary,
        tol: &Tolerance,
    ) -> (RelativePosition, DetailedRelativePosition) {
        if self.vertices().any(|v| v.coincides(p, tol.distance)) {
            return (RelativePosition::OnBoundary, DetailedRelativePosition::OnVertex);
        }
        for (c, contour) in self.contours.iter().enumerate() {
            if contour.edges().any(|e| e.distance_to_point(p) <= tol.distance) {
                let detail = if c == 0 {
                    DetailedRelativePosition::OnOuterContour
                } else {
                    DetailedRelativePosition::OnHoleContour
                };
                return (RelativePosition::OnBoundary, detail);
            }
        }
        let position = match Locator::new(self, *tol).side(p) {
            Side::In => RelativePosition::Inside,
            _ => RelativePosition::Outside,
        };
        (position, DetailedRelativePosition::NotOnBoundary)
    }

    /// Position of a straight segment.
    pub fn position_of_segment(&self, s: &Segment2<f64>, boundary: Boundary) -> RelativePosition {
        self.position_of_edges([Edge::Line(*s)], boundary)
    }

    /// Position of a circular arc.
    pub fn position_of_arc(&self, a: &Arc2<f64>, boundary: Boundary) -> RelativePosition {
        self.position_of_edges([Edge::Arc(*a)], boundary)
    }

    /// Position of an open polyline.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::polygon::{Boundary, Polyline, RelativePosition};
    /// use regpoly::{Point2, Polygon};
    ///
    /// let square: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0)).unwrap();
    /// let path = Polyline::new(vec![
    ///     Point2::new(1.0, 1.0),
    ///     Point2::new(3.0, 1.0),
    ///     Point2::new(3.0, 6.0),
    /// ]);
    /// assert_eq!(square.position_of_polyline(&path, Boundary::Closed), RelativePosition::Overlapping);
    /// ```
    pub fn position_of_polyline(&self, polyline: &Polyline, boundary: Boundary) -> RelativePosition {
        self.position_of_edges(polyline.edges(), boundary)
    }

    /// Position of the region of `other`.
    ///
    /// `Inside` when `other` lies within this polygon, `Outside` when the
    /// two are disjoint, `OnBoundary` when both have the same boundary.
    pub fn position_of_polygon<V: UserData>(&self, other: &Polygon<V>, boundary: Boundary) -> RelativePosition {
        if self.is_empty() || other.is_empty() {
            return RelativePosition::Outside;
        }
        let tol = Tolerance::default();
        let theirs = Locator::new(self, tol).cover(other.edges());
        let ours = Locator::new(other, tol).cover(self.edges());
        if !theirs.inside && !theirs.outside && !ours.inside && !ours.outside {
            return RelativePosition::OnBoundary;
        }
        if ours.inside {
            return RelativePosition::Overlapping;
        }
        theirs.position(boundary)
    }

    /// Position of an axis-aligned box region.
    pub fn position_of_box(&self, b: &Aabb2<f64>, boundary: Boundary) -> RelativePosition {
        match Polygon::<()>::rectangle(b.min, b.max) {
            Ok(rect) => self.position_of_polygon(&rect, boundary),
            // A degenerate box is a segment
            Err(_) => self.position_of_segment(&Segment2::new(b.min, b.max), boundary),
        }
    }

    fn position_of_edges(&self, edges: impl IntoIterator<Item = Edge>, boundary: Boundary) -> RelativePosition {
        Locator::new(self, Tolerance::default())
            .cover(edges)
            .position(boundary)
    }
}

impl<U: UserData> PolygonSet<U> {
    /// Position of `p` relative to the union of the set.
    ///
    /// Inside any polygon wins over on the boundary of one, which wins over
    /// outside all of them.
    pub fn position_of_point(
        &self,
        p: Point2<f64>,
        boundary: Boundary,
    ) -> (RelativePosition, DetailedRelativePosition) {
        let mut best = (RelativePosition::Outside, DetailedRelativePosition::NotOnBoundary);
        for polygon in self.iter() {
            let found = polygon.position_of_point(p, boundary);
            match found.0 {
                RelativePosition::Inside => return found,
                RelativePosition::OnBoundary if best.0 == RelativePosition::Outside => best = found,
                _ => {}
            }
        }
        best
    }
}
