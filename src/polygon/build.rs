//! Polygon construction from flat arrays, contour descriptions, polylines
//! and simple shapes.
//!
//! All constructors validate structure (index ranges, finite values,
//! coordinate range, sweep range) but not geometry: the result may
//! self-intersect and is not flagged regularized unless its shape makes
//! that certain.

use super::core::{check_point, Contour, Flags, Polygon, UserData};
use super::polyline::Polyline;
use crate::error::{PolyError, Result};
use crate::primitives::Point2;
use crate::tolerance::{dedup_ring_runs, Tolerance};
use std::f64::consts::{PI, TAU};

/// An arc edge in flat construction input.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcDesc {
    /// Global index of the arc's start vertex.
    pub begin: usize,
    /// Global index of the arc's end vertex; must follow `begin` in its
    /// contour.
    pub end: usize,
    /// Signed sweep in radians.
    pub sweep: f64,
}

/// One vertex of a [`ContourDesc`] with its outgoing edge.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexDesc<U: UserData = ()> {
    /// Vertex position.
    pub point: Point2<f64>,
    /// Sweep of the edge to the next vertex; `0.0` is straight.
    pub sweep: f64,
    /// Vertex tag.
    pub vertex_tag: Option<U::Vertex>,
    /// Tag of the outgoing edge.
    pub edge_tag: Option<U::Edge>,
}

impl<U: UserData> VertexDesc<U> {
    /// An untagged vertex whose outgoing edge has the given sweep.
    pub fn new(point: Point2<f64>, sweep: f64) -> Self {
        Self {
            point,
            sweep,
            vertex_tag: None,
            edge_tag: None,
        }
    }
}

/// A closed contour described vertex by vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourDesc<U: UserData = ()> {
    /// Vertices in order; the last connects back to the first.
    pub vertices: Vec<VertexDesc<U>>,
    /// Contour tag.
    pub tag: Option<U::Contour>,
}

impl<U: UserData> ContourDesc<U> {
    /// A contour of straight edges through `points`.
    pub fn from_points(points: &[Point2<f64>]) -> Self {
        Self {
            vertices: points.iter().map(|&p| VertexDesc::new(p, 0.0)).collect(),
            tag: None,
        }
    }

    /// A full circle, counter-clockwise, stored as two semicircles.
    pub fn circle(center: Point2<f64>, radius: f64) -> Self {
        Self {
            vertices: vec![
                VertexDesc::new(Point2::new(center.x + radius, center.y), PI),
                VertexDesc::new(Point2::new(center.x - radius, center.y), PI),
            ],
            tag: None,
        }
    }

    /// Attaches a contour tag.
    pub fn with_tag(mut self, tag: U::Contour) -> Self {
        self.tag = Some(tag);
        self
    }
}

/// Validates one contour description and turns it into a contour.
///
/// Consecutive coincident vertices collapse; the surviving vertex keeps its
/// tag and takes over the outgoing edge of the last vertex of the run. A
/// closing duplicate of the first vertex is dropped along with its edge.
pub(super) fn build_contour<U: UserData>(desc: &ContourDesc<U>, tol: &Tolerance) -> Result<Contour<U>> {
    for v in &desc.vertices {
        check_point(v.point)?;
        if !v.sweep.is_finite() {
            return Err(PolyError::NumericOverflow { value: v.sweep });
        }
        if v.sweep.abs() >= TAU - tol.angle {
            return Err(PolyError::IrregularInput {
                reason: format!("edge sweep {} is a full turn; use two arcs", v.sweep),
            });
        }
    }

    let points: Vec<Point2<f64>> = desc.vertices.iter().map(|v| v.point).collect();
    let (keep, end) = dedup_ring_runs(&points, tol.distance);

    let mut contour = Contour {
        points: Vec::with_capacity(keep.len()),
        sweeps: Vec::with_capacity(keep.len()),
        vertex_tags: Vec::with_capacity(keep.len()),
        edge_tags: Vec::with_capacity(keep.len()),
        tag: desc.tag.clone(),
    };
    for (j, &k) in keep.iter().enumerate() {
        let run_end = keep.get(j + 1).copied().unwrap_or(end);
        let edge_src = &desc.vertices[run_end - 1];
        let sweep = if tol.is_straight(edge_src.sweep) {
            0.0
        } else {
            edge_src.sweep
        };
        contour.points.push(desc.vertices[k].point);
        contour.sweeps.push(sweep);
        contour.vertex_tags.push(desc.vertices[k].vertex_tag.clone());
        contour.edge_tags.push(edge_src.edge_tag.clone());
    }

    let arcs = contour.sweeps.iter().filter(|&&s| s != 0.0).count();
    let enough = match contour.len() {
        0 | 1 => false,
        2 => arcs > 0,
        _ => true,
    };
    if !enough {
        return Err(PolyError::IrregularInput {
            reason: format!(
                "contour with {} distinct vertices and {} arcs encloses nothing",
                contour.len(),
                arcs
            ),
        });
    }
    Ok(contour)
}

fn flags_for<U: UserData>(contours: &[Contour<U>], mut flags: Flags) -> Flags {
    for c in contours {
        flags.vertex_user_data |= c.vertex_tags.iter().any(Option::is_some);
        flags.edge_user_data |= c.edge_tags.iter().any(Option::is_some);
        flags.contour_user_data |= c.tag.is_some();
    }
    flags
}

impl<U: UserData> Polygon<U> {
    /// Builds a polygon from flat vertex coordinates.
    ///
    /// # Arguments
    ///
    /// * `coords` - All vertices, contour after contour
    /// * `arcs` - Arc edges by global vertex index; other edges are straight
    /// * `contour_ends` - Exclusive cumulative end index of each contour,
    ///   strictly increasing, the last equal to `coords.len()`
    /// * `flags` - Flags of the new polygon
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::polygon::{ArcDesc, Flags};
    /// use regpoly::{Point2, Polygon};
    /// use std::f64::consts::PI;
    ///
    /// // A half disc: a chord and a counter-clockwise semicircle
    /// let coords = [Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0)];
    /// let arcs = [ArcDesc { begin: 1, end: 0, sweep: PI }];
    /// let p: Polygon = Polygon::from_flat(&coords, &arcs, &[2], Flags::default()).unwrap();
    /// assert!((p.area() - PI / 2.0).abs() < 1e-12);
    /// ```
    pub fn from_flat(
        coords: &[Point2<f64>],
        arcs: &[ArcDesc],
        contour_ends: &[usize],
        flags: Flags,
    ) -> Result<Self> {
        let mut prev = 0;
        for (c, &end) in contour_ends.iter().enumerate() {
            if end <= prev && !(c == 0 && end == 0 && coords.is_empty()) {
                return Err(PolyError::IrregularInput {
                    reason: format!("contour end {end} at position {c} is not increasing"),
                });
            }
            prev = end;
        }
        if prev != coords.len() {
            return Err(PolyError::IrregularInput {
                reason: format!(
                    "last contour end {prev} does not match {} coordinates",
                    coords.len()
                ),
            });
        }

        let mut sweeps = vec![0.0; coords.len()];
        for arc in arcs {
            let contour = contour_ends.iter().position(|&e| arc.begin < e);
            let Some(c) = contour else {
                return Err(PolyError::IrregularInput {
                    reason: format!("arc begins at vertex {} out of range", arc.begin),
                });
            };
            let start = if c == 0 { 0 } else { contour_ends[c - 1] };
            let end = contour_ends[c];
            let next = if arc.begin + 1 == end { start } else { arc.begin + 1 };
            if arc.end != next {
                return Err(PolyError::IrregularInput {
                    reason: format!(
                        "arc {} -> {} does not join consecutive vertices",
                        arc.begin, arc.end
                    ),
                });
            }
            sweeps[arc.begin] = arc.sweep;
        }

        let mut descs = Vec::with_capacity(contour_ends.len());
        let mut start = 0;
        for &end in contour_ends {
            if end == start {
                continue;
            }
            descs.push(ContourDesc {
                vertices: (start..end)
                    .map(|i| VertexDesc::new(coords[i], sweeps[i]))
                    .collect(),
                tag: None,
            });
            start = end;
        }
        Self::from_descs(&descs, flags)
    }

    /// Builds a polygon from per-vertex contour descriptions.
    ///
    /// Flags announce whichever tag kinds the input uses.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::polygon::ContourDesc;
    /// use regpoly::{Point2, Polygon};
    ///
    /// let outer = ContourDesc::from_points(&[
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(4.0, 0.0),
    ///     Point2::new(4.0, 4.0),
    ///     Point2::new(0.0, 4.0),
    /// ]);
    /// let hole = ContourDesc::circle(Point2::new(2.0, 2.0), 1.0);
    /// let p: Polygon = Polygon::from_contours(&[outer, hole]).unwrap();
    /// assert_eq!(p.contour_count(), 2);
    /// assert_eq!(p.vertex_count(), 6);
    /// ```
    pub fn from_contours(contours: &[ContourDesc<U>]) -> Result<Self> {
        Self::from_descs(contours, Flags::default())
    }

    fn from_descs(descs: &[ContourDesc<U>], flags: Flags) -> Result<Self> {
        let tol = Tolerance::default();
        let contours = descs
            .iter()
            .map(|d| build_contour(d, &tol))
            .collect::<Result<Vec<_>>>()?;
        let flags = flags_for(&contours, flags);
        Ok(Self::from_raw(contours, flags, false))
    }

    /// Builds a single-contour polygon from a polyline, closing it with a
    /// straight edge unless its last point already repeats the first.
    pub fn from_polyline(polyline: &Polyline) -> Result<Self> {
        let tol = Tolerance::default();
        let mut points = polyline.points().to_vec();
        let mut sweeps = polyline.sweeps().to_vec();
        if polyline.is_closed(tol.distance) {
            points.pop();
        } else {
            sweeps.push(0.0);
        }
        let desc = ContourDesc {
            vertices: points
                .into_iter()
                .zip(sweeps)
                .map(|(p, s)| VertexDesc::new(p, s))
                .collect(),
            tag: None,
        };
        Self::from_descs(&[desc], Flags::default())
    }

    /// Builds a single contour of straight edges.
    pub fn from_points(points: &[Point2<f64>]) -> Result<Self> {
        Self::from_descs(&[ContourDesc::from_points(points)], Flags::default())
    }

    /// An axis-aligned rectangle spanned by two corners, counter-clockwise
    /// from the minimum corner and flagged regularized.
    pub fn rectangle(a: Point2<f64>, b: Point2<f64>) -> Result<Self> {
        let min = Point2::new(a.x.min(b.x), a.y.min(b.y));
        let max = Point2::new(a.x.max(b.x), a.y.max(b.y));
        let mut p = Self::from_points(&[
            min,
            Point2::new(max.x, min.y),
            max,
            Point2::new(min.x, max.y),
        ])?;
        p.regularized = true;
        Ok(p)
    }

    /// A full circle flagged regularized.
    pub fn circle(center: Point2<f64>, radius: f64) -> Result<Self> {
        if !(radius > Tolerance::DEFAULT_DISTANCE) {
            return Err(PolyError::IrregularInput {
                reason: format!("circle radius {radius} is not positive"),
            });
        }
        let mut p = Self::from_descs(&[ContourDesc::circle(center, radius)], Flags::default())?;
        p.regularized = true;
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Named;

    impl UserData for Named {
        type Vertex = &'static str;
        type Edge = &'static str;
        type Contour = &'static str;
        type Polygon = ();
    }

    #[test]
    fn test_three_constructors_agree() {
        let pts = square();
        let flat: Polygon = Polygon::from_flat(&pts, &[], &[4], Flags::default()).unwrap();
        let desc: Polygon = Polygon::from_contours(&[ContourDesc::from_points(&pts)]).unwrap();
        let mut closed = pts.clone();
        closed.push(pts[0]);
        let line: Polygon = Polygon::from_polyline(&Polyline::new(closed)).unwrap();
        let open: Polygon = Polygon::from_polyline(&Polyline::new(pts)).unwrap();
        assert_eq!(flat, desc);
        assert_eq!(flat, line);
        assert_eq!(flat, open);
        assert!(!flat.is_regularized());
    }

    #[test]
    fn test_flat_contour_ends_validation() {
        let pts = square();
        assert!(matches!(
            Polygon::<()>::from_flat(&pts, &[], &[2, 2, 4], Flags::default()),
            Err(PolyError::IrregularInput { .. })
        ));
        assert!(matches!(
            Polygon::<()>::from_flat(&pts, &[], &[3], Flags::default()),
            Err(PolyError::IrregularInput { .. })
        ));
    }

    #[test]
    fn test_flat_arc_must_join_neighbours() {
        let pts = square();
        let bad = [ArcDesc { begin: 0, end: 2, sweep: 0.5 }];
        assert!(matches!(
            Polygon::<()>::from_flat(&pts, &bad, &[4], Flags::default()),
            Err(PolyError::IrregularInput { .. })
        ));
        let wrap = [ArcDesc { begin: 3, end: 0, sweep: 0.5 }];
        let p: Polygon = Polygon::from_flat(&pts, &wrap, &[4], Flags::default()).unwrap();
        assert_eq!(p.arc_angle(3).unwrap(), 0.5);
    }

    #[test]
    fn test_coincident_vertices_collapse() {
        let mut descs = ContourDesc::<Named>::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        descs.vertices[1].vertex_tag = Some("kept");
        descs.vertices[1].edge_tag = Some("zero");
        descs.vertices[2].edge_tag = Some("diagonal");
        let p = Polygon::from_contours(&[descs]).unwrap();
        assert_eq!(p.vertex_count(), 3);
        assert_eq!(p.vertex_tag(1).unwrap(), Some(&"kept"));
        assert_eq!(p.edge_tag(1).unwrap(), Some(&"diagonal"));
        assert!(p.flags().vertex_user_data);
        assert!(p.flags().edge_user_data);
        assert!(!p.flags().contour_user_data);
    }

    #[test]
    fn test_closing_duplicate_keeps_last_arc() {
        let arc = std::f64::consts::FRAC_PI_2;
        let vertices = vec![
            VertexDesc::new(Point2::new(2.0, 0.0), 0.0),
            VertexDesc::new(Point2::new(2.0, 2.0), 0.0),
            VertexDesc::new(Point2::new(0.0, 2.0), arc),
        ];
        let mut open = ContourDesc::<Named> { vertices, tag: None };
        open.vertices[2].edge_tag = Some("bulge");
        let mut closed = open.clone();
        let mut last = VertexDesc::new(Point2::new(2.0, 0.0), 0.0);
        last.edge_tag = Some("closing");
        closed.vertices.push(last);

        let a = Polygon::from_contours(&[open]).unwrap();
        let b = Polygon::from_contours(&[closed]).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.vertex_count(), 3);
        assert_relative_eq!(b.arc_angle(2).unwrap(), arc);
        assert_eq!(b.edge_tag(2).unwrap(), Some(&"bulge"));
        assert_relative_eq!(b.area(), std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_closing_duplicate_keeps_last_arc() {
        let pts = [
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(2.0, 0.0),
        ];
        let arcs = [ArcDesc { begin: 2, end: 3, sweep: std::f64::consts::FRAC_PI_2 }];
        let p: Polygon = Polygon::from_flat(&pts, &arcs, &[4], Flags::default()).unwrap();
        assert_eq!(p.vertex_count(), 3);
        assert_relative_eq!(p.area(), std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn test_too_few_vertices() {
        let two = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(matches!(
            Polygon::<()>::from_points(&two),
            Err(PolyError::IrregularInput { .. })
        ));
        // Two vertices with an arc enclose a region
        let coords = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let arcs = [ArcDesc { begin: 0, end: 1, sweep: -1.0 }];
        assert!(Polygon::<()>::from_flat(&coords, &arcs, &[2], Flags::default()).is_ok());
    }

    #[test]
    fn test_value_range_errors() {
        let mut pts = square();
        pts[2].x = f64::NAN;
        assert!(matches!(
            Polygon::<()>::from_points(&pts),
            Err(PolyError::IrregularInput { .. })
        ));
        pts[2].x = 9e8;
        assert_eq!(
            Polygon::<()>::from_points(&pts),
            Err(PolyError::NumericOverflow { value: 9e8 })
        );
        let full = [ArcDesc { begin: 0, end: 1, sweep: TAU }];
        assert!(matches!(
            Polygon::<()>::from_flat(&square(), &full, &[4], Flags::default()),
            Err(PolyError::IrregularInput { .. })
        ));
        let inf = [ArcDesc { begin: 0, end: 1, sweep: f64::INFINITY }];
        assert!(matches!(
            Polygon::<()>::from_flat(&square(), &inf, &[4], Flags::default()),
            Err(PolyError::NumericOverflow { .. })
        ));
    }

    #[test]
    fn test_circle_and_rectangle() {
        let c: Polygon = Polygon::circle(Point2::new(1.0, 1.0), 2.0).unwrap();
        assert!(c.is_regularized());
        assert_relative_eq!(c.area(), 4.0 * PI, epsilon = 1e-12);
        assert!(c.is_a_circle().is_some());
        assert!(Polygon::<()>::circle(Point2::origin(), 0.0).is_err());

        let r: Polygon = Polygon::rectangle(Point2::new(3.0, 2.0), Point2::new(1.0, 0.0)).unwrap();
        assert_eq!(r.vertex(0).unwrap(), Point2::new(1.0, 0.0));
        assert_relative_eq!(r.contour_area(0).unwrap(), 4.0);
    }

    #[test]
    fn test_contour_tag_survives_construction() {
        let d = ContourDesc::<Named>::circle(Point2::origin(), 1.0).with_tag("ring");
        let p = Polygon::from_contours(&[d]).unwrap();
        assert_eq!(p.contour_tag(0).unwrap(), Some(&"ring"));
        assert!(p.flags().contour_user_data);
    }
}
