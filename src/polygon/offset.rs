//! Edge and contour offsetting.
//!
//! Every moved edge slides along its outward normal (away from the filled
//! region): a straight edge is translated, an arc keeps its center and
//! changes its radius. Neighbouring offset edges are joined at the
//! intersection of their supporting lines or circles nearest to both loose
//! ends (a miter). When the supports are parallel, or the miter point lies
//! too far from the original vertex, a straight connector closes the gap.
//!
//! The raw offset contours may cross themselves; they are re-regularized
//! with the positive winding rule, which drops the inverted loops.
//!
//! # Example
//!
//! ```
//! use regpoly::{Point2, Polygon};
//!
//! let square: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)).unwrap();
//!
//! // Grow the square by one unit on every side
//! let grown = square.offset_contour(0, 1.0).unwrap();
//! assert!((grown.area() - 144.0).abs() < 1e-9);
//!
//! // Shrink it
//! let shrunk = square.offset_contour(0, -1.0).unwrap();
//! assert!((shrunk.area() - 64.0).abs() < 1e-9);
//! ```

use super::build::{build_contour, ContourDesc, VertexDesc};
use super::core::{Contour, Polygon, UserData, MAX_COORD};
use super::edge::Edge;
use super::options::OperationOptions;
use super::regularize::{keep_or_regularize, positive_options, regularize_raw};
use super::set::PolygonOutput;
use crate::error::{PolyError, Result};
use crate::primitives::{Arc2, Circle2, Point2, Vec2};
use std::f64::consts::PI;

/// Maximum ratio of miter length to offset distance before a connector is
/// used instead.
pub const MITER_LIMIT: f64 = 4.0;

/// The curve an offset edge lies on.
#[derive(Debug, Clone, Copy)]
enum Support {
    Line { origin: Point2<f64>, dir: Vec2<f64> },
    Circle(Circle2<f64>),
}

/// One edge after the offset, before the joins are resolved.
#[derive(Debug, Clone, Copy)]
struct Moved {
    start: Point2<f64>,
    end: Point2<f64>,
    /// Endpoints right after the offset, before trimming.
    raw_start: Point2<f64>,
    raw_end: Point2<f64>,
    sweep: f64,
    support: Support,
    /// An arc whose radius shrank to nothing.
    collapsed: bool,
}

impl Moved {
    fn new(edge: &Edge, d: f64, eps: f64) -> Self {
        match edge {
            Edge::Line(s) => {
                let dir = s.direction().normalize().unwrap_or(Vec2::zero());
                let shift = Vec2::new(dir.y, -dir.x) * d;
                Self::with_ends(
                    s.start + shift,
                    s.end + shift,
                    0.0,
                    Support::Line {
                        origin: s.start + shift,
                        dir,
                    },
                    false,
                )
            }
            Edge::Arc(a) => {
                let center = a.center();
                let r = a.radius();
                let radius = r + d * a.sweep.signum();
                if radius <= eps {
                    return Self::with_ends(center, center, 0.0, Support::Circle(Circle2::new(center, 0.0)), true);
                }
                let k = radius / r;
                Self::with_ends(
                    center + (a.start - center) * k,
                    center + (a.end - center) * k,
                    a.sweep,
                    Support::Circle(Circle2::new(center, radius)),
                    false,
                )
            }
        }
    }

    fn with_ends(start: Point2<f64>, end: Point2<f64>, sweep: f64, support: Support, collapsed: bool) -> Self {
        Self {
            start,
            end,
            raw_start: start,
            raw_end: end,
            sweep,
            support,
            collapsed,
        }
    }

    /// Returns `true` if the joins pulled the edge past itself.
    fn is_inverted(&self) -> bool {
        match self.support {
            _ if self.collapsed => true,
            Support::Line { dir, .. } => (self.end - self.start).dot(dir) < 0.0,
            Support::Circle(_) => self.trimmed_sweep() * self.sweep < 0.0,
        }
    }

    /// Sweep after trimming, following the endpoints around the center.
    fn trimmed_sweep(&self) -> f64 {
        match self.support {
            Support::Circle(c) if !self.collapsed && self.sweep != 0.0 => {
                let turn = |from: Point2<f64>, to: Point2<f64>| (from - c.center).signed_angle_to(to - c.center);
                self.sweep - turn(self.raw_start, self.start) + turn(self.raw_end, self.end)
            }
            _ => 0.0,
        }
    }
}

/// Intersections of two supports.
fn support_hits(a: &Support, b: &Support, eps: f64) -> Vec<Point2<f64>> {
    match (a, b) {
        (Support::Line { origin: o1, dir: d1 }, Support::Line { origin: o2, dir: d2 }) => {
            let den = d1.cross(*d2);
            if den.abs() <= 1e-12 {
                return Vec::new();
            }
            let t = (*o2 - *o1).cross(*d2) / den;
            vec![*o1 + *d1 * t]
        }
        (Support::Line { origin, dir }, Support::Circle(c)) | (Support::Circle(c), Support::Line { origin, dir }) => c
            .intersect_line(*origin, *origin + *dir, eps)
            .into_iter()
            .map(|t| *origin + *dir * t)
            .collect(),
        (Support::Circle(c1), Support::Circle(c2)) => c1.intersect_circle(c2, eps),
    }
}

impl<U: UserData> Polygon<U> {
    /// Offsets edge `e` by `d`; the neighbouring edges are extended or
    /// trimmed to meet it.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::{Point2, Polygon};
    ///
    /// let square: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0)).unwrap();
    /// // Push the bottom edge down by one unit
    /// let out = square.offset_edge(0, 1.0).unwrap();
    /// assert!((out.area() - 20.0).abs() < 1e-9);
    /// ```
    pub fn offset_edge(&self, e: usize, d: f64) -> Result<PolygonOutput<U>> {
        self.offset_multiple_edges_with(&[(e, d)], &OperationOptions::default())
    }

    /// Offsets every edge of contour `c` by `d`.
    pub fn offset_contour(&self, c: usize, d: f64) -> Result<PolygonOutput<U>> {
        self.check_contour(c, "offset_contour")?;
        let edges: Vec<(usize, f64)> = self
            .contour_vertex_range(c)?
            .map(|e| (e, d))
            .collect();
        self.offset_multiple_edges_with(&edges, &OperationOptions::default())
    }

    /// Offsets each listed edge by its own distance.
    pub fn offset_multiple_edges(&self, edges: &[(usize, f64)]) -> Result<PolygonOutput<U>> {
        self.offset_multiple_edges_with(edges, &OperationOptions::default())
    }

    /// [`offset_multiple_edges`](Self::offset_multiple_edges) with explicit
    /// options.
    ///
    /// # Arguments
    ///
    /// * `edges` - Global edge indices with their signed distances; positive
    ///   moves away from the filled region. A repeated edge keeps the last
    ///   distance.
    /// * `options` - Tolerance and abort hook; the fill rule is always
    ///   positive winding
    ///
    /// # Returns
    ///
    /// `ResultSameAsThis` when every distance is zero, `EmptyPolygon` when
    /// the offset collapses the polygon.
    pub fn offset_multiple_edges_with(
        &self,
        edges: &[(usize, f64)],
        options: &OperationOptions<'_>,
    ) -> Result<PolygonOutput<U>> {
        const OPERATION: &str = "offset";
        self.require_non_empty(OPERATION)?;

        let mut distances: Vec<Vec<f64>> = self.contours.iter().map(|c| vec![0.0; c.len()]).collect();
        for &(e, d) in edges {
            if !d.is_finite() || d.abs() > MAX_COORD {
                return Err(PolyError::InvalidArgument {
                    operation: OPERATION,
                    reason: format!("offset distance {d} out of range"),
                });
            }
            let (c, i) = self.locate(e, "edge", OPERATION)?;
            distances[c][i] = d;
        }
        if distances.iter().flatten().all(|&d| d == 0.0) {
            return keep_or_regularize(self, options, OPERATION);
        }

        let tol = options.tolerance;
        let mut contours = Vec::with_capacity(self.contours.len());
        for (c, (contour, ds)) in self.contours.iter().zip(&distances).enumerate() {
            options.check_abort(OPERATION)?;
            if ds.iter().all(|&d| d == 0.0) {
                contours.push(contour.clone());
                continue;
            }
            let built = offset_ring(contour, c == 0, ds, tol.distance)
                .ok_or_else(|| PolyError::IrregularInput {
                    reason: "offset turned the contour inside out".into(),
                })
                .and_then(|desc| build_contour(&desc, &tol));
            match built {
                Ok(built) => contours.push(built),
                Err(PolyError::IrregularInput { reason }) => {
                    log::debug!("{OPERATION}: contour {c} collapsed ({reason})");
                    if c == 0 {
                        return Ok(PolygonOutput::empty());
                    }
                }
                Err(err) => return Err(err),
            }
        }

        // Every contour now carries its role's orientation
        for (c, contour) in contours.iter_mut().enumerate() {
            if (c == 0) != (contour.signed_area() > 0.0) {
                *contour = contour.reversed();
            }
        }

        let mut raw = Polygon::from_raw(contours, self.flags, false);
        raw.tag = self.tag.clone();
        regularize_raw(&raw, false, &positive_options(options), OPERATION)
    }
}

/// Offsets one contour by per-edge distances and resolves the joins.
///
/// Returns `None` when every edge turned inside out: a convex contour
/// offset past its inradius comes back point-reflected, with its
/// orientation intact.
fn offset_ring<U: UserData>(
    contour: &Contour<U>,
    outer: bool,
    ds: &[f64],
    eps: f64,
) -> Option<ContourDesc<U>> {
    let n = contour.len();
    // Misoriented contours offset towards their left
    let side = if outer == (contour.signed_area() >= 0.0) { 1.0 } else { -1.0 };
    let mut moved: Vec<Moved> = (0..n)
        .map(|i| Moved::new(&contour.edge(i), side * ds[i], eps))
        .collect();

    let mut connector = vec![false; n];
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let v = contour.points[i];
        let p = moved[prev].end;
        let q = moved[i].start;
        if p.coincides(q, eps) {
            let m = p.midpoint(q);
            moved[prev].end = m;
            moved[i].start = m;
            continue;
        }
        let reach = MITER_LIMIT * ds[prev].abs().max(ds[i].abs()) + eps;
        let miter = if moved[prev].collapsed || moved[i].collapsed {
            None
        } else {
            support_hits(&moved[prev].support, &moved[i].support, eps)
                .into_iter()
                .filter(|x| x.distance(v) <= reach)
                .min_by(|a, b| (a.distance(p) + a.distance(q)).total_cmp(&(b.distance(p) + b.distance(q))))
        };
        match miter {
            Some(x) => {
                moved[prev].end = x;
                moved[i].start = x;
            }
            None => {
                log::trace!("offset: connector at vertex {i}");
                connector[i] = true;
            }
        }
    }

    if moved.iter().all(Moved::is_inverted) {
        return None;
    }

    let mut vertices = Vec::with_capacity(2 * n);
    for (i, m) in moved.iter().enumerate() {
        let sweep = m.trimmed_sweep();
        let mut first = VertexDesc::new(m.start, sweep);
        first.vertex_tag = contour.vertex_tags[i].clone();
        first.edge_tag = contour.edge_tags[i].clone();
        if sweep.abs() > PI {
            // Halves stay below a full turn however far the ends moved
            first.sweep = sweep / 2.0;
            let mut half = VertexDesc::new(Arc2::new(m.start, m.end, sweep).midpoint(), sweep / 2.0);
            half.edge_tag = contour.edge_tags[i].clone();
            vertices.push(first);
            vertices.push(half);
        } else {
            vertices.push(first);
        }
        if connector[(i + 1) % n] {
            vertices.push(VertexDesc::new(m.end, 0.0));
        }
    }
    Some(ContourDesc {
        vertices,
        tag: contour.tag.clone(),
    })
}
