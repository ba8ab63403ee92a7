//! Topological editing.
//!
//! Edits that may break regularity (moving or inserting vertices, changing
//! edges, adding holes) work on a copy and return a [`PolygonOutput`]: the
//! copy as is when it is still regular, its regularization otherwise.
//! Edits that cannot break regularity return a new polygon or work in
//! place.

use super::core::{check_point, Contour, Polygon, UserData};
use super::edge::Edge;
use super::options::OperationOptions;
use super::regularize::{finish_edit, positive_options};
use super::repair::encloses_nothing;
use super::set::PolygonOutput;
use crate::error::{PolyError, Result};
use crate::primitives::{Point2, Vec2};
use crate::tolerance::Tolerance;
use std::f64::consts::TAU;

/// Replaces edge `i` by a chain through `internal`; every new edge keeps the
/// tag of the replaced one. `sweeps` has one entry per new edge.
fn splice_edge<U: UserData>(contour: &mut Contour<U>, i: usize, internal: &[Point2<f64>], sweeps: &[f64]) {
    let tag = contour.edge_tags[i].clone();
    let at = i + 1..i + 1;
    contour.sweeps[i] = sweeps[0];
    contour.points.splice(at.clone(), internal.iter().copied());
    contour.sweeps.splice(at.clone(), sweeps[1..].iter().copied());
    contour
        .vertex_tags
        .splice(at.clone(), internal.iter().map(|_| None));
    contour
        .edge_tags
        .splice(at, internal.iter().map(|_| tag.clone()));
}

/// Checks a sweep and straightens it within the angle tolerance.
fn checked_sweep(sweep: f64, tol: &Tolerance, operation: &'static str) -> Result<f64> {
    if !sweep.is_finite() {
        return Err(PolyError::NumericOverflow { value: sweep });
    }
    if sweep.abs() >= TAU - tol.angle {
        return Err(PolyError::InvalidArgument {
            operation,
            reason: format!("sweep {sweep} is a full turn"),
        });
    }
    Ok(if tol.is_straight(sweep) { 0.0 } else { sweep })
}

fn regularized_edit<U: UserData>(polygon: Polygon<U>, operation: &'static str) -> Result<PolygonOutput<U>> {
    finish_edit(polygon, true, &OperationOptions::default(), operation)
}

impl<U: UserData> Polygon<U> {
    /// Splits edge `e` with a new vertex at `p`.
    ///
    /// A point on an arc splits the arc; otherwise both new edges are
    /// straight. Both carry the tag of `e`. Unless same-direction edges are
    /// legal, a vertex inserted on a straight edge is merged away again by
    /// regularization.
    pub fn insert_vertex(&self, e: usize, p: Point2<f64>) -> Result<PolygonOutput<U>> {
        const OPERATION: &str = "insert_vertex";
        self.require_non_empty(OPERATION)?;
        check_point(p)?;
        let (c, i) = self.locate(e, "edge", OPERATION)?;
        let mut edited = self.clone();
        let contour = &mut edited.contours[c];
        let sweeps = match contour.edge(i) {
            Edge::Arc(a) if a.distance_to_point(p) <= Tolerance::DEFAULT_DISTANCE => {
                let (head, tail) = a.split_at(a.param_of(p));
                [head.sweep, tail.sweep]
            }
            _ => [0.0, 0.0],
        };
        splice_edge(contour, i, &[p], &sweeps);
        regularized_edit(edited, OPERATION)
    }

    /// Removes vertex `v`; its neighbours are joined by a straight edge
    /// carrying the tag of the incoming edge.
    ///
    /// A contour of three vertices disappears entirely; removing the outer
    /// contour empties the polygon.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::polygon::PolygonResult;
    /// use regpoly::{Point2, Polygon};
    ///
    /// let triangle: Polygon = Polygon::from_points(&[
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(1.0, 0.0),
    ///     Point2::new(0.0, 1.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(triangle.delete_vertex(1).unwrap().result, PolygonResult::EmptyPolygon);
    /// ```
    pub fn delete_vertex(&self, v: usize) -> Result<PolygonOutput<U>> {
        const OPERATION: &str = "delete_vertex";
        self.require_non_empty(OPERATION)?;
        let (c, i) = self.locate(v, "vertex", OPERATION)?;
        let mut edited = self.clone();
        let contour = &mut edited.contours[c];
        let n = contour.len();
        if n <= 3 {
            if c == 0 {
                return Ok(PolygonOutput::empty());
            }
            edited.contours.remove(c);
        } else {
            contour.sweeps[(i + n - 1) % n] = 0.0;
            contour.points.remove(i);
            contour.sweeps.remove(i);
            contour.vertex_tags.remove(i);
            contour.edge_tags.remove(i);
            if encloses_nothing(contour) {
                if c == 0 {
                    return Ok(PolygonOutput::empty());
                }
                edited.contours.remove(c);
            }
        }
        regularized_edit(edited, OPERATION)
    }

    /// Moves vertex `v` to `p`.
    pub fn move_vertex(&self, v: usize, p: Point2<f64>) -> Result<PolygonOutput<U>> {
        self.move_vertices(&[(v, p)])
    }

    /// Moves several vertices at once.
    pub fn move_vertices(&self, moves: &[(usize, Point2<f64>)]) -> Result<PolygonOutput<U>> {
        const OPERATION: &str = "move_vertices";
        self.require_non_empty(OPERATION)?;
        let mut edited = self.clone();
        for &(v, p) in moves {
            check_point(p)?;
            let (c, i) = self.locate(v, "vertex", OPERATION)?;
            edited.contours[c].points[i] = p;
        }
        regularized_edit(edited, OPERATION)
    }

    /// Gives edge `e` a new sweep; `0.0` makes it straight.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::{Point2, Polygon};
    ///
    /// let square: Polygon = Polygon::rectangle(Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0)).unwrap();
    /// // Bulge the right edge out into a half circle
    /// let out = square.set_edge_angle(1, std::f64::consts::PI).unwrap();
    /// assert!((out.area() - (4.0 + std::f64::consts::PI / 2.0)).abs() < 1e-9);
    /// ```
    pub fn set_edge_angle(&self, e: usize, sweep: f64) -> Result<PolygonOutput<U>> {
        const OPERATION: &str = "set_edge_angle";
        self.require_non_empty(OPERATION)?;
        let sweep = checked_sweep(sweep, &Tolerance::default(), OPERATION)?;
        let (c, i) = self.locate(e, "edge", OPERATION)?;
        let mut edited = self.clone();
        edited.contours[c].sweeps[i] = sweep;
        regularized_edit(edited, OPERATION)
    }

    /// Replaces edge `e` by a chain of edges through `internal_vertices`.
    ///
    /// # Arguments
    ///
    /// * `e` - Edge to replace
    /// * `sweeps` - One sweep per new edge, `internal_vertices.len() + 1` in
    ///   total
    /// * `internal_vertices` - Vertices between the start and end of `e`
    pub fn replace_edge(
        &self,
        e: usize,
        sweeps: &[f64],
        internal_vertices: &[Point2<f64>],
    ) -> Result<PolygonOutput<U>> {
        const OPERATION: &str = "replace_edge";
        self.require_non_empty(OPERATION)?;
        if sweeps.len() != internal_vertices.len() + 1 {
            return Err(PolyError::InvalidArgument {
                operation: OPERATION,
                reason: format!(
                    "{} sweeps for {} internal vertices",
                    sweeps.len(),
                    internal_vertices.len()
                ),
            });
        }
        let tol = Tolerance::default();
        let sweeps = sweeps
            .iter()
            .map(|&s| checked_sweep(s, &tol, OPERATION))
            .collect::<Result<Vec<f64>>>()?;
        for &p in internal_vertices {
            check_point(p)?;
        }
        let (c, i) = self.locate(e, "edge", OPERATION)?;
        let mut edited = self.clone();
        splice_edge(&mut edited.contours[c], i, internal_vertices, &sweeps);
        regularized_edit(edited, OPERATION)
    }

    /// Adds contour `c` of `source` as a new hole.
    ///
    /// Parts of the hole outside the outer contour are ignored; overlapping
    /// holes merge.
    pub fn add_hole(&self, source: &Polygon<U>, c: usize) -> Result<PolygonOutput<U>> {
        const OPERATION: &str = "add_hole";
        self.require_non_empty(OPERATION)?;
        source.check_contour(c, OPERATION)?;
        let mut hole = source.contours[c].clone();
        if hole.signed_area() > 0.0 {
            hole = hole.reversed();
        }
        let mut edited = self.clone();
        edited.flags.contour_user_data |= hole.tag.is_some();
        edited.contours.push(hole);
        finish_edit(edited, true, &positive_options(&OperationOptions::default()), OPERATION)
    }

    /// A copy without hole `c`.
    pub fn delete_hole(&self, c: usize) -> Result<Polygon<U>> {
        const OPERATION: &str = "delete_hole";
        self.require_non_empty(OPERATION)?;
        self.check_contour(c, OPERATION)?;
        if c == 0 {
            return Err(PolyError::InvalidArgument {
                operation: OPERATION,
                reason: "contour 0 is the outer contour".into(),
            });
        }
        let mut out = self.clone();
        out.contours.remove(c);
        Ok(out)
    }

    /// A copy with the outer contour only.
    pub fn remove_holes(&self) -> Polygon<U> {
        let mut out = self.clone();
        out.contours.truncate(1);
        out
    }

    /// Moves every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec2<f64>) -> Result<()> {
        self.require_non_empty("translate")?;
        for p in self.vertices() {
            check_point(p + offset)?;
        }
        for contour in &mut self.contours {
            for p in &mut contour.points {
                *p = *p + offset;
            }
        }
        self.update_bounds();
        Ok(())
    }

    /// Makes local vertex `k` the first vertex of contour `c`.
    pub fn rotate_vertex_indices_in_contour(&mut self, c: usize, k: usize) -> Result<()> {
        const OPERATION: &str = "rotate_vertex_indices_in_contour";
        self.require_non_empty(OPERATION)?;
        self.check_contour(c, OPERATION)?;
        let len = self.contours[c].len();
        if k >= len {
            return Err(PolyError::IndexOutOfRange {
                entity: "vertex",
                index: k,
                len,
                operation: OPERATION,
            });
        }
        self.contours[c] = self.contours[c].rotated(k);
        Ok(())
    }

    /// Swaps the order of two holes.
    pub fn swap_contour_order(&mut self, c1: usize, c2: usize) -> Result<()> {
        const OPERATION: &str = "swap_contour_order";
        self.require_non_empty(OPERATION)?;
        self.check_contour(c1, OPERATION)?;
        self.check_contour(c2, OPERATION)?;
        if c1 == 0 || c2 == 0 {
            return Err(PolyError::InvalidArgument {
                operation: OPERATION,
                reason: "the outer contour stays first".into(),
            });
        }
        self.contours.swap(c1, c2);
        Ok(())
    }

    /// Moves vertex `v` to `p` in place if the polygon stays regular.
    ///
    /// Fails with [`PolyError::RegularityViolation`] otherwise, leaving the
    /// polygon untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::{Point2, Polygon, PolyError};
    ///
    /// let mut square: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0)).unwrap();
    /// square.move_vertex_in_place(2, Point2::new(3.0, 3.0)).unwrap();
    /// assert_eq!(square.vertex(2).unwrap(), Point2::new(3.0, 3.0));
    ///
    /// // Folding the corner across the opposite edge would cross it
    /// let err = square.move_vertex_in_place(2, Point2::new(1.0, -2.0)).unwrap_err();
    /// assert!(matches!(err, PolyError::RegularityViolation { index: 2, .. }));
    /// assert_eq!(square.vertex(2).unwrap(), Point2::new(3.0, 3.0));
    /// ```
    pub fn move_vertex_in_place(&mut self, v: usize, p: Point2<f64>) -> Result<()> {
        const OPERATION: &str = "move_vertex_in_place";
        self.require_non_empty(OPERATION)?;
        check_point(p)?;
        let (c, i) = self.locate(v, "vertex", OPERATION)?;
        let mut moved = self.clone();
        moved.contours[c].points[i] = p;
        moved.update_bounds();
        if !moved.is_regular(&Tolerance::default()) {
            return Err(PolyError::RegularityViolation {
                operation: OPERATION,
                index: v,
            });
        }
        moved.regularized = true;
        *self = moved;
        Ok(())
    }

    /// Replaces every arc by a polyline whose sagitta stays within
    /// `arc_tolerance`.
    pub fn segment_up(&self, arc_tolerance: f64) -> Result<PolygonOutput<U>> {
        const OPERATION: &str = "segment_up";
        if !(arc_tolerance > 0.0 && arc_tolerance.is_finite()) {
            return Err(PolyError::InvalidArgument {
                operation: OPERATION,
                reason: format!("arc tolerance {arc_tolerance} must be positive"),
            });
        }
        let mut edited = self.clone();
        for contour in &mut edited.contours {
            for i in (0..contour.len()).rev() {
                if contour.sweeps[i] == 0.0 {
                    continue;
                }
                let points = contour.edge(i).to_polyline(arc_tolerance);
                let internal = &points[1..points.len() - 1];
                splice_edge(contour, i, internal, &vec![0.0; internal.len() + 1]);
            }
        }
        regularized_edit(edited, OPERATION)
    }

    /// Replaces every arc by its chord.
    pub fn eliminate_arcs(&self) -> Result<PolygonOutput<U>> {
        let mut edited = self.clone();
        for contour in &mut edited.contours {
            contour.sweeps.iter_mut().for_each(|s| *s = 0.0);
        }
        if edited.contours.first().map_or(true, encloses_nothing) {
            return Ok(PolygonOutput::empty());
        }
        edited.contours.retain(|c| !encloses_nothing(c));
        regularized_edit(edited, "eliminate_arcs")
    }
}
