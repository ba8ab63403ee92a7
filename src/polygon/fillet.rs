//! Rounding (fillet) and bevelling (chamfer) of corners between straight
//! edges.
//!
//! A fillet of radius `r` at a corner turning by `φ` replaces the corner
//! with a tangent arc of sweep `φ` whose tangent points lie `r·tan(|φ|/2)`
//! from the vertex. A chamfer cuts the corner with a straight edge whose
//! ends lie the given distance from the vertex on both edges.
//!
//! Single-vertex operations reject a size that does not fit on the adjacent
//! edges; contour and whole-polygon operations clamp it per vertex so that
//! no corner uses more than half of an adjacent edge.

use super::build::{build_contour, ContourDesc, VertexDesc};
use super::core::{Contour, Polygon, UserData};
use super::options::OperationOptions;
use super::regularize::{finish_edit, keep_or_regularize, positive_options};
use super::set::PolygonOutput;
use crate::error::{PolyError, Result};
use crate::primitives::Vec2;
use crate::tolerance::Tolerance;

/// Geometry of a corner between two straight edges.
#[derive(Debug, Clone, Copy)]
struct Corner {
    /// Signed turn from the incoming to the outgoing direction.
    turn: f64,
    d_in: Vec2<f64>,
    d_out: Vec2<f64>,
    len_in: f64,
    len_out: f64,
}

impl Corner {
    fn fillet_setback(&self, r: f64) -> f64 {
        r * (self.turn.abs() / 2.0).tan()
    }

    fn room(&self) -> f64 {
        self.len_in.min(self.len_out)
    }
}

enum CornerKind {
    /// An adjacent edge is an arc.
    NextToArc,
    /// The edges continue in the same direction.
    Flat,
    Sharp(Corner),
}

fn corner_at<U: UserData>(contour: &Contour<U>, i: usize, tol: &Tolerance) -> CornerKind {
    let n = contour.len();
    let p = (i + n - 1) % n;
    if contour.sweeps[p] != 0.0 || contour.sweeps[i] != 0.0 {
        return CornerKind::NextToArc;
    }
    let v = contour.points[i];
    let a = v - contour.points[p];
    let b = contour.points[(i + 1) % n] - v;
    let (Some(d_in), Some(d_out)) = (a.normalize(), b.normalize()) else {
        return CornerKind::Flat;
    };
    let turn = d_in.signed_angle_to(d_out);
    if turn.abs() <= tol.angle {
        return CornerKind::Flat;
    }
    CornerKind::Sharp(Corner {
        turn,
        d_in,
        d_out,
        len_in: a.magnitude(),
        len_out: b.magnitude(),
    })
}

/// How one corner gets replaced.
#[derive(Debug, Clone, Copy)]
struct Trim {
    corner: Corner,
    setback: f64,
    /// Sweep of the replacing edge; zero for a chamfer.
    sweep: f64,
}

/// Rebuilds `contour` with the trimmed corners.
fn trim_corners<U: UserData>(
    contour: &Contour<U>,
    trims: &[Option<Trim>],
    tol: &Tolerance,
) -> Result<Contour<U>> {
    let mut vertices = Vec::with_capacity(contour.len() + trims.len());
    for (i, trim) in trims.iter().enumerate() {
        let v = contour.points[i];
        match trim {
            None => {
                let mut desc = VertexDesc::new(v, contour.sweeps[i]);
                desc.vertex_tag = contour.vertex_tags[i].clone();
                desc.edge_tag = contour.edge_tags[i].clone();
                vertices.push(desc);
            }
            Some(t) => {
                let mut first = VertexDesc::new(v - t.corner.d_in * t.setback, t.sweep);
                first.vertex_tag = contour.vertex_tags[i].clone();
                let mut second = VertexDesc::new(v + t.corner.d_out * t.setback, contour.sweeps[i]);
                second.edge_tag = contour.edge_tags[i].clone();
                vertices.push(first);
                vertices.push(second);
            }
        }
    }
    build_contour(
        &ContourDesc {
            vertices,
            tag: contour.tag.clone(),
        },
        tol,
    )
}

fn bad_size(operation: &'static str, what: &str, size: f64) -> PolyError {
    PolyError::InvalidArgument {
        operation,
        reason: format!("{what} {size} must be positive and finite"),
    }
}

impl<U: UserData> Polygon<U> {
    /// Replaces the corner at vertex `v` with a tangent arc of radius `r`.
    ///
    /// # Arguments
    ///
    /// * `v` - Global vertex index; both adjacent edges must be straight
    /// * `r` - Fillet radius
    ///
    /// # Returns
    ///
    /// `ResultSameAsThis` for a flat vertex. Fails with
    /// [`PolyError::InvalidArgument`] when a tangent point would fall
    /// outside an adjacent edge or an adjacent edge is an arc.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::{Point2, Polygon};
    ///
    /// let square: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0)).unwrap();
    /// let out = square.fillet_vertex(0, 1.0).unwrap();
    /// let loss = 1.0 - std::f64::consts::PI / 4.0;
    /// assert!((out.area() - (16.0 - loss)).abs() < 1e-9);
    /// ```
    pub fn fillet_vertex(&self, v: usize, r: f64) -> Result<PolygonOutput<U>> {
        self.trim_vertex(v, r, true, "fillet_vertex")
    }

    /// Fillets every vertex of contour `c` with radius `r`, clamped per
    /// vertex. Vertices next to arcs and flat vertices are skipped.
    pub fn fillet_contour(&self, c: usize, r: f64) -> Result<PolygonOutput<U>> {
        self.check_contour(c, "fillet_contour")?;
        self.trim_contours(Some(c), r, true, "fillet_contour")
    }

    /// Fillets every vertex of the polygon with radius `r`, clamped per
    /// vertex.
    pub fn fillet_all(&self, r: f64) -> Result<PolygonOutput<U>> {
        self.trim_contours(None, r, true, "fillet_all")
    }

    /// Cuts the corner at vertex `v` with a straight edge starting `d` from
    /// the vertex on both adjacent edges.
    pub fn chamfer_vertex(&self, v: usize, d: f64) -> Result<PolygonOutput<U>> {
        self.trim_vertex(v, d, false, "chamfer_vertex")
    }

    /// Chamfers every vertex of contour `c`, clamped per vertex.
    pub fn chamfer_contour(&self, c: usize, d: f64) -> Result<PolygonOutput<U>> {
        self.check_contour(c, "chamfer_contour")?;
        self.trim_contours(Some(c), d, false, "chamfer_contour")
    }

    /// Chamfers every vertex of the polygon, clamped per vertex.
    pub fn chamfer_all(&self, d: f64) -> Result<PolygonOutput<U>> {
        self.trim_contours(None, d, false, "chamfer_all")
    }

    /// Largest fillet radius that fits at vertex `v`; zero for a flat
    /// vertex.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::{Point2, Polygon};
    ///
    /// let square: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(4.0, 2.0)).unwrap();
    /// assert!((square.max_vertex_fillet(0).unwrap() - 2.0).abs() < 1e-12);
    /// ```
    pub fn max_vertex_fillet(&self, v: usize) -> Result<f64> {
        const OPERATION: &str = "max_vertex_fillet";
        let (c, i) = self.locate(v, "vertex", OPERATION)?;
        match corner_at(&self.contours[c], i, &Tolerance::default()) {
            CornerKind::NextToArc => Err(PolyError::InvalidArgument {
                operation: OPERATION,
                reason: format!("vertex {v} is next to an arc"),
            }),
            CornerKind::Flat => Ok(0.0),
            CornerKind::Sharp(corner) => Ok(corner.room() / (corner.turn.abs() / 2.0).tan()),
        }
    }

    fn trim_vertex(&self, v: usize, size: f64, fillet: bool, operation: &'static str) -> Result<PolygonOutput<U>> {
        let what = if fillet { "radius" } else { "distance" };
        if !(size > 0.0 && size.is_finite()) {
            return Err(bad_size(operation, what, size));
        }
        let (c, i) = self.locate(v, "vertex", operation)?;
        let options = OperationOptions::default();
        let tol = options.tolerance;
        let contour = &self.contours[c];
        let corner = match corner_at(contour, i, &tol) {
            CornerKind::NextToArc => {
                return Err(PolyError::InvalidArgument {
                    operation,
                    reason: format!("vertex {v} is next to an arc"),
                })
            }
            CornerKind::Flat => return keep_or_regularize(self, &options, operation),
            CornerKind::Sharp(corner) => corner,
        };
        let setback = if fillet { corner.fillet_setback(size) } else { size };
        if !(setback <= corner.room() + tol.distance) {
            return Err(PolyError::InvalidArgument {
                operation,
                reason: format!("{what} {size} does not fit at vertex {v}"),
            });
        }

        let mut trims = vec![None; contour.len()];
        trims[i] = Some(Trim {
            corner,
            setback: setback.min(corner.room()),
            sweep: if fillet { corner.turn } else { 0.0 },
        });
        let mut edited = self.clone();
        edited.contours[c] = trim_corners(contour, &trims, &tol)?;
        finish_edit(edited, true, &positive_options(&options), operation)
    }

    fn trim_contours(
        &self,
        only: Option<usize>,
        size: f64,
        fillet: bool,
        operation: &'static str,
    ) -> Result<PolygonOutput<U>> {
        if !(size > 0.0 && size.is_finite()) {
            return Err(bad_size(operation, if fillet { "radius" } else { "distance" }, size));
        }
        self.require_non_empty(operation)?;
        let options = OperationOptions::default();
        let tol = options.tolerance;

        let mut edited = self.clone();
        let mut changed = 0;
        for (c, contour) in self.contours.iter().enumerate() {
            if only.map_or(false, |o| o != c) {
                continue;
            }
            let trims: Vec<Option<Trim>> = (0..contour.len())
                .map(|i| {
                    let CornerKind::Sharp(corner) = corner_at(contour, i, &tol) else {
                        return None;
                    };
                    let room = corner.room() / 2.0;
                    let wanted = if fillet { corner.fillet_setback(size) } else { size };
                    if wanted > room {
                        log::warn!("{operation}: clamped at vertex {i} of contour {c}");
                    }
                    let setback = wanted.min(room);
                    if setback <= tol.distance {
                        return None;
                    }
                    Some(Trim {
                        corner,
                        setback,
                        sweep: if fillet { corner.turn } else { 0.0 },
                    })
                })
                .collect();
            if trims.iter().all(Option::is_none) {
                continue;
            }
            changed += trims.iter().flatten().count();
            edited.contours[c] = trim_corners(contour, &trims, &tol)?;
        }
        if changed == 0 {
            return keep_or_regularize(self, &options, operation);
        }
        log::debug!("{operation}: trimmed {changed} corners");
        finish_edit(edited, true, &positive_options(&options), operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::{PolygonResult, VertexDesc};
    use crate::primitives::Point2;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn square() -> Polygon {
        Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0)).unwrap()
    }

    #[test]
    fn test_fillet_vertex_area() {
        let out = square().fillet_vertex(0, 1.0).unwrap();
        assert_eq!(out.result, PolygonResult::NewPolygons);
        let p = &out.polygons[0];
        assert_eq!(p.vertex_count(), 5);
        assert_relative_eq!(p.area(), 16.0 - (1.0 - PI / 4.0), epsilon = 1e-9);
        let arc = p.edges().find(|e| e.is_arc()).unwrap();
        assert_relative_eq!(arc.sweep(), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fillet_too_large_rejected() {
        let err = square().fillet_vertex(0, 5.0).unwrap_err();
        assert!(matches!(err, PolyError::InvalidArgument { .. }));
        assert!(square().fillet_vertex(0, -1.0).is_err());
    }

    #[test]
    fn test_fillet_full_edge_fits() {
        let out = square().fillet_vertex(0, 4.0).unwrap();
        let p = &out.polygons[0];
        // Both tangent points land on the neighbouring vertices
        assert_eq!(p.vertex_count(), 3);
        assert_relative_eq!(p.area(), 16.0 - 16.0 * (1.0 - PI / 4.0), epsilon = 1e-9);
    }

    #[test]
    fn test_flat_vertex_is_same() {
        let p: Polygon = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ])
        .unwrap();
        let p = p.set_same_dir_edge_legal_and_regularize(true).unwrap().into_polygons().remove(0);
        assert_eq!(
            p.fillet_vertex(1, 1.0).unwrap().result,
            PolygonResult::ResultSameAsThis
        );
        assert_eq!(p.max_vertex_fillet(1).unwrap(), 0.0);
    }

    #[test]
    fn test_fillet_all_clamps() {
        let out = square().fillet_all(10.0).unwrap();
        let p = &out.polygons[0];
        // Clamped to half an edge: a full circle of radius 2
        assert!(p.is_a_circle().is_some());
        assert_relative_eq!(p.area(), 4.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_max_fillet_at_every_corner() {
        let p = square();
        for v in 0..4 {
            let r = p.max_vertex_fillet(v).unwrap();
            assert_relative_eq!(r, 4.0, epsilon = 1e-12);
            let out = p.fillet_vertex(v, r).unwrap();
            let filleted = &out.polygons[0];
            assert_eq!(filleted.vertex_count(), 3, "corner {v}");
            assert_eq!(filleted.edges().filter(|e| e.is_arc()).count(), 1, "corner {v}");
            assert_relative_eq!(filleted.area(), 4.0 * PI, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fillet_all_keeps_closing_arc() {
        let out = square().fillet_all(10.0).unwrap();
        let p = &out.polygons[0];
        assert!(p.edges().all(|e| e.is_arc()));
        assert_relative_eq!(p.perimeter(), 4.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_fillet_contour_skips_arcs() {
        let desc = ContourDesc::<()> {
            vertices: vec![
                VertexDesc::new(Point2::new(0.0, 0.0), 0.0),
                VertexDesc::new(Point2::new(4.0, 0.0), 0.0),
                VertexDesc::new(Point2::new(4.0, 4.0), PI / 2.0),
                VertexDesc::new(Point2::new(0.0, 4.0), 0.0),
            ],
            tag: None,
        };
        let p = Polygon::from_contours(&[desc]).unwrap();
        assert!(matches!(
            p.fillet_vertex(2, 0.5),
            Err(PolyError::InvalidArgument { .. })
        ));
        let out = p.fillet_contour(0, 0.5).unwrap();
        // Only vertices 0 and 1 were rounded
        assert_eq!(out.polygons[0].vertex_count(), 6);
    }

    #[test]
    fn test_reflex_fillet_adds_area() {
        let l: Polygon = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 4.0),
            Point2::new(0.0, 4.0),
        ])
        .unwrap();
        let out = l.fillet_vertex(3, 1.0).unwrap();
        assert_relative_eq!(out.area(), 12.0 + (1.0 - PI / 4.0), epsilon = 1e-9);
    }

    #[test]
    fn test_chamfer() {
        let out = square().chamfer_vertex(2, 1.0).unwrap();
        assert_relative_eq!(out.area(), 15.5, epsilon = 1e-9);
        assert_eq!(out.polygons[0].vertex_count(), 5);

        let out = square().chamfer_all(1.0).unwrap();
        assert_relative_eq!(out.area(), 14.0, epsilon = 1e-9);
        assert_eq!(out.polygons[0].vertex_count(), 8);

        assert!(square().chamfer_vertex(0, 4.5).is_err());
    }

    #[test]
    fn test_chamfer_contour_bad_index() {
        assert!(matches!(
            square().chamfer_contour(3, 1.0),
            Err(PolyError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_max_vertex_fillet_triangle() {
        let t: Polygon = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ])
        .unwrap();
        // Right angle with legs of 2
        assert_relative_eq!(t.max_vertex_fillet(0).unwrap(), 2.0, epsilon = 1e-12);
        let r = t.max_vertex_fillet(1).unwrap();
        assert!(t.fillet_vertex(1, r * 0.99).is_ok());
        assert!(t.fillet_vertex(1, r * 1.01).is_err());
    }
}
