//! The polygon data model: contours of vertices and edges with user tags.
//!
//! Vertices and edges are addressed by a single global index running over
//! all contours in order; edge `i` leaves vertex `i`, so a polygon always has
//! as many edges as vertices. Contour 0 is the outer boundary, the others are
//! holes.

use super::edge::Edge;
use crate::bounds::Aabb2;
use crate::error::{PolyError, Result};
use crate::primitives::{Circle2, Point2};
use crate::tolerance::Tolerance;
use std::f64::consts::TAU;
use std::fmt::Debug;
use std::ops::Range;

/// Largest supported absolute coordinate.
pub const MAX_COORD: f64 = 8e8;

/// The tag types attached to vertices, edges, contours and whole polygons.
///
/// `()` is the "no user data" instance. Tags are stored as `Option`s, so
/// every entity may carry a tag or none.
///
/// # Example
///
/// ```
/// use regpoly::polygon::UserData;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Layers;
///
/// impl UserData for Layers {
///     type Vertex = u32;
///     type Edge = String;
///     type Contour = ();
///     type Polygon = u64;
/// }
/// ```
pub trait UserData: Clone + Debug + PartialEq + 'static {
    /// Tag of a vertex.
    type Vertex: Clone + Debug + PartialEq;
    /// Tag of an edge.
    type Edge: Clone + Debug + PartialEq;
    /// Tag of a contour.
    type Contour: Clone + Debug + PartialEq;
    /// Tag of a polygon.
    type Polygon: Clone + Debug + PartialEq;
}

impl UserData for () {
    type Vertex = ();
    type Edge = ();
    type Contour = ();
    type Polygon = ();
}

/// Per-polygon behaviour flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Consecutive collinear edges (and co-circular arcs) are allowed to
    /// stay separate after regularization.
    pub same_dir_edge_legal: bool,
    /// Vertex tags are in use.
    pub vertex_user_data: bool,
    /// Edge tags are in use.
    pub edge_user_data: bool,
    /// Contour tags are in use.
    pub contour_user_data: bool,
    /// The polygon tag is in use.
    pub polygon_user_data: bool,
    /// Results must keep full 64-bit coordinates.
    pub force_64bit_precision: bool,
}

impl Flags {
    const SAME_DIR: u16 = 1;
    const VERTEX: u16 = 1 << 1;
    const EDGE: u16 = 1 << 2;
    const CONTOUR: u16 = 1 << 3;
    const POLYGON: u16 = 1 << 4;
    const FORCE_64: u16 = 1 << 5;

    /// Every bit that has a meaning.
    pub const ALL_BITS: u16 = 0x3f;

    /// Packs the flags into a bit set.
    pub fn to_bits(self) -> u16 {
        let mut bits = 0;
        for (on, bit) in [
            (self.same_dir_edge_legal, Self::SAME_DIR),
            (self.vertex_user_data, Self::VERTEX),
            (self.edge_user_data, Self::EDGE),
            (self.contour_user_data, Self::CONTOUR),
            (self.polygon_user_data, Self::POLYGON),
            (self.force_64bit_precision, Self::FORCE_64),
        ] {
            if on {
                bits |= bit;
            }
        }
        bits
    }

    /// Unpacks a bit set; unknown bits are ignored.
    pub fn from_bits(bits: u16) -> Self {
        Self {
            same_dir_edge_legal: bits & Self::SAME_DIR != 0,
            vertex_user_data: bits & Self::VERTEX != 0,
            edge_user_data: bits & Self::EDGE != 0,
            contour_user_data: bits & Self::CONTOUR != 0,
            polygon_user_data: bits & Self::POLYGON != 0,
            force_64bit_precision: bits & Self::FORCE_64 != 0,
        }
    }
}

/// One closed boundary loop.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Contour<U: UserData> {
    pub(crate) points: Vec<Point2<f64>>,
    /// Sweep of the edge leaving each vertex; `0.0` is straight.
    pub(crate) sweeps: Vec<f64>,
    pub(crate) vertex_tags: Vec<Option<U::Vertex>>,
    pub(crate) edge_tags: Vec<Option<U::Edge>>,
    pub(crate) tag: Option<U::Contour>,
}

impl<U: UserData> Contour<U> {
    /// Untagged contour from vertices and outgoing-edge sweeps.
    pub(crate) fn from_parts(points: Vec<Point2<f64>>, sweeps: Vec<f64>) -> Self {
        let n = points.len();
        Self {
            points,
            sweeps,
            vertex_tags: vec![None; n],
            edge_tags: vec![None; n],
            tag: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub(crate) fn edge(&self, i: usize) -> Edge {
        let n = self.points.len();
        Edge::from_sweep(self.points[i], self.points[(i + 1) % n], self.sweeps[i])
    }

    pub(crate) fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.len()).map(move |i| self.edge(i))
    }

    /// Signed area, positive for counter-clockwise contours.
    pub(crate) fn signed_area(&self) -> f64 {
        self.edges().map(|e| e.area_term()).sum()
    }

    pub(crate) fn perimeter(&self) -> f64 {
        self.edges().map(|e| e.length()).sum()
    }

    pub(crate) fn bounding_box(&self) -> Option<Aabb2<f64>> {
        self.edges()
            .map(|e| e.bounding_box())
            .reduce(|a, b| a.union(b))
    }

    /// Winding number of the contour around `p`. Undefined on the boundary.
    pub(crate) fn winding_number(&self, p: Point2<f64>) -> i32 {
        let total: f64 = self.edges().map(|e| e.winding_angle(p)).sum();
        (total / TAU).round() as i32
    }

    /// The same loop traversed the other way; tags stay with their entities.
    pub(crate) fn reversed(&self) -> Self {
        let n = self.len();
        let vertex = |j: usize| (n - j) % n;
        let edge = |j: usize| (2 * n - j - 1) % n;
        Self {
            points: (0..n).map(|j| self.points[vertex(j)]).collect(),
            sweeps: (0..n).map(|j| -self.sweeps[edge(j)]).collect(),
            vertex_tags: (0..n).map(|j| self.vertex_tags[vertex(j)].clone()).collect(),
            edge_tags: (0..n).map(|j| self.edge_tags[edge(j)].clone()).collect(),
            tag: self.tag.clone(),
        }
    }

    /// The same loop starting at local vertex `k`.
    pub(crate) fn rotated(&self, k: usize) -> Self {
        let mut c = self.clone();
        c.points.rotate_left(k);
        c.sweeps.rotate_left(k);
        c.vertex_tags.rotate_left(k);
        c.edge_tags.rotate_left(k);
        c
    }
}

/// A polygon with circular-arc edges, holes and user tags.
///
/// Raw constructors produce unregularized polygons; every operation result is
/// regularized: contours do not cross, the outer contour runs
/// counter-clockwise and holes run clockwise inside it.
///
/// # Example
///
/// ```
/// use regpoly::{Point2, Polygon};
///
/// let square: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0)).unwrap();
/// assert_eq!(square.vertex_count(), 4);
/// assert_eq!(square.area(), 4.0);
/// assert!(square.is_a_box());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<U: UserData = ()> {
    pub(crate) contours: Vec<Contour<U>>,
    pub(crate) tag: Option<U::Polygon>,
    pub(crate) flags: Flags,
    pub(crate) regularized: bool,
    pub(crate) bounds: Option<Aabb2<f64>>,
}

pub(crate) fn out_of_range(
    entity: &'static str,
    index: usize,
    len: usize,
    operation: &'static str,
) -> PolyError {
    PolyError::IndexOutOfRange {
        entity,
        index,
        len,
        operation,
    }
}

/// Fails unless `p` is finite and inside the supported coordinate range.
pub(crate) fn check_point(p: Point2<f64>) -> Result<()> {
    if !p.is_finite() {
        return Err(PolyError::IrregularInput {
            reason: format!("non-finite coordinate ({}, {})", p.x, p.y),
        });
    }
    for v in [p.x, p.y] {
        if v.abs() > MAX_COORD {
            return Err(PolyError::NumericOverflow { value: v });
        }
    }
    Ok(())
}

impl<U: UserData> Default for Polygon<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: UserData> Polygon<U> {
    /// Creates an empty polygon with default flags.
    pub fn new() -> Self {
        Self::with_flags(Flags::default())
    }

    /// Creates an empty polygon with the given flags.
    pub fn with_flags(flags: Flags) -> Self {
        Self {
            contours: Vec::new(),
            tag: None,
            flags,
            regularized: true,
            bounds: None,
        }
    }

    pub(crate) fn from_raw(contours: Vec<Contour<U>>, flags: Flags, regularized: bool) -> Self {
        let mut p = Self {
            contours,
            tag: None,
            flags,
            regularized,
            bounds: None,
        };
        p.update_bounds();
        p
    }

    pub(crate) fn update_bounds(&mut self) {
        self.bounds = self
            .contours
            .iter()
            .filter_map(Contour::bounding_box)
            .reduce(|a, b| a.union(b));
    }

    // ---- counts -------------------------------------------------------

    /// Total number of vertices over all contours.
    pub fn vertex_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    /// Total number of edges; always equal to [`vertex_count`](Self::vertex_count).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.vertex_count()
    }

    /// Number of contours (outer plus holes).
    #[inline]
    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    /// Returns `true` if the polygon has no contours.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Returns `true` if the polygon is flagged regularized.
    #[inline]
    pub fn is_regularized(&self) -> bool {
        self.regularized
    }

    /// Behaviour flags.
    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Replaces the flags.
    ///
    /// Forbidding same-direction edges clears the regularized status, since
    /// existing collinear neighbours are no longer legal.
    pub fn set_flags(&mut self, flags: Flags) {
        if self.flags.same_dir_edge_legal && !flags.same_dir_edge_legal {
            self.regularized = false;
        }
        self.flags = flags;
    }

    // ---- index plumbing -----------------------------------------------

    /// Maps a global vertex (or edge) index to `(contour, local index)`.
    pub(crate) fn locate(
        &self,
        index: usize,
        entity: &'static str,
        operation: &'static str,
    ) -> Result<(usize, usize)> {
        let mut rest = index;
        for (c, contour) in self.contours.iter().enumerate() {
            if rest < contour.len() {
                return Ok((c, rest));
            }
            rest -= contour.len();
        }
        Err(out_of_range(entity, index, self.vertex_count(), operation))
    }

    /// Global index of the first vertex of contour `c`.
    pub(crate) fn contour_start(&self, c: usize) -> usize {
        self.contours[..c].iter().map(Contour::len).sum()
    }

    pub(crate) fn check_contour(&self, c: usize, operation: &'static str) -> Result<()> {
        if c < self.contours.len() {
            Ok(())
        } else {
            Err(out_of_range("contour", c, self.contours.len(), operation))
        }
    }

    pub(crate) fn require_non_empty(&self, operation: &'static str) -> Result<()> {
        if self.is_empty() {
            Err(PolyError::EmptyPolygon { operation })
        } else {
            Ok(())
        }
    }

    /// Global vertex index range of contour `c`.
    pub fn contour_vertex_range(&self, c: usize) -> Result<Range<usize>> {
        self.check_contour(c, "contour_vertex_range")?;
        let start = self.contour_start(c);
        Ok(start..start + self.contours[c].len())
    }

    /// Index of the contour owning vertex `v`.
    pub fn contour_of_vertex(&self, v: usize) -> Result<usize> {
        Ok(self.locate(v, "vertex", "contour_of_vertex")?.0)
    }

    // ---- cyclic neighbours ---------------------------------------------

    /// Next vertex in the owning contour, wrapping at its end.
    pub fn next_vertex(&self, v: usize) -> Result<usize> {
        let (c, i) = self.locate(v, "vertex", "next_vertex")?;
        let n = self.contours[c].len();
        Ok(self.contour_start(c) + (i + 1) % n)
    }

    /// Previous vertex in the owning contour, wrapping at its start.
    pub fn prev_vertex(&self, v: usize) -> Result<usize> {
        let (c, i) = self.locate(v, "vertex", "prev_vertex")?;
        let n = self.contours[c].len();
        Ok(self.contour_start(c) + (i + n - 1) % n)
    }

    /// Next edge in the owning contour.
    pub fn next_edge(&self, e: usize) -> Result<usize> {
        let (c, i) = self.locate(e, "edge", "next_edge")?;
        let n = self.contours[c].len();
        Ok(self.contour_start(c) + (i + 1) % n)
    }

    /// Previous edge in the owning contour.
    pub fn prev_edge(&self, e: usize) -> Result<usize> {
        let (c, i) = self.locate(e, "edge", "prev_edge")?;
        let n = self.contours[c].len();
        Ok(self.contour_start(c) + (i + n - 1) % n)
    }

    /// Next contour, wrapping to the outer contour after the last hole.
    pub fn next_contour(&self, c: usize) -> Result<usize> {
        self.check_contour(c, "next_contour")?;
        Ok((c + 1) % self.contours.len())
    }

    /// Previous contour, wrapping to the last hole before the outer contour.
    pub fn prev_contour(&self, c: usize) -> Result<usize> {
        self.check_contour(c, "prev_contour")?;
        let n = self.contours.len();
        Ok((c + n - 1) % n)
    }

    /// Vertex where edge `e` begins.
    pub fn begin_vertex_of_edge(&self, e: usize) -> Result<usize> {
        self.locate(e, "edge", "begin_vertex_of_edge")?;
        Ok(e)
    }

    /// Vertex where edge `e` ends.
    pub fn end_vertex_of_edge(&self, e: usize) -> Result<usize> {
        let (c, i) = self.locate(e, "edge", "end_vertex_of_edge")?;
        let n = self.contours[c].len();
        Ok(self.contour_start(c) + (i + 1) % n)
    }

    /// Edge arriving at vertex `v`.
    pub fn prev_edge_of_vertex(&self, v: usize) -> Result<usize> {
        let (c, i) = self.locate(v, "vertex", "prev_edge_of_vertex")?;
        let n = self.contours[c].len();
        Ok(self.contour_start(c) + (i + n - 1) % n)
    }

    /// Edge leaving vertex `v`.
    pub fn next_edge_of_vertex(&self, v: usize) -> Result<usize> {
        self.locate(v, "vertex", "next_edge_of_vertex")?;
        Ok(v)
    }

    // ---- per-entity access ----------------------------------------------

    /// Coordinates of vertex `v`.
    pub fn vertex(&self, v: usize) -> Result<Point2<f64>> {
        let (c, i) = self.locate(v, "vertex", "vertex")?;
        Ok(self.contours[c].points[i])
    }

    /// All vertices in global index order.
    pub fn vertices(&self) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.contours.iter().flat_map(|c| c.points.iter().copied())
    }

    /// Moves vertex `v` without any regularity check.
    ///
    /// The polygon loses its regularized status.
    pub fn set_coord(&mut self, v: usize, p: Point2<f64>) -> Result<()> {
        self.require_non_empty("set_coord")?;
        check_point(p)?;
        let (c, i) = self.locate(v, "vertex", "set_coord")?;
        self.contours[c].points[i] = p;
        self.regularized = false;
        self.update_bounds();
        Ok(())
    }

    /// Tag of vertex `v`.
    pub fn vertex_tag(&self, v: usize) -> Result<Option<&U::Vertex>> {
        let (c, i) = self.locate(v, "vertex", "vertex_tag")?;
        Ok(self.contours[c].vertex_tags[i].as_ref())
    }

    /// Sets or clears the tag of vertex `v`.
    pub fn set_vertex_tag(&mut self, v: usize, tag: Option<U::Vertex>) -> Result<()> {
        self.require_non_empty("set_vertex_tag")?;
        let (c, i) = self.locate(v, "vertex", "set_vertex_tag")?;
        self.flags.vertex_user_data |= tag.is_some();
        self.contours[c].vertex_tags[i] = tag;
        Ok(())
    }

    /// Geometry of edge `e`.
    pub fn edge(&self, e: usize) -> Result<Edge> {
        let (c, i) = self.locate(e, "edge", "edge")?;
        Ok(self.contours[c].edge(i))
    }

    /// All edges in global index order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.contours.iter().flat_map(Contour::edges)
    }

    /// Sweep of edge `e`; `0.0` for straight edges.
    pub fn arc_angle(&self, e: usize) -> Result<f64> {
        let (c, i) = self.locate(e, "edge", "arc_angle")?;
        Ok(self.contours[c].sweeps[i])
    }

    /// Length of edge `e`.
    pub fn edge_length(&self, e: usize) -> Result<f64> {
        Ok(self.edge(e)?.length())
    }

    /// Tag of edge `e`.
    pub fn edge_tag(&self, e: usize) -> Result<Option<&U::Edge>> {
        let (c, i) = self.locate(e, "edge", "edge_tag")?;
        Ok(self.contours[c].edge_tags[i].as_ref())
    }

    /// Sets or clears the tag of edge `e`.
    pub fn set_edge_tag(&mut self, e: usize, tag: Option<U::Edge>) -> Result<()> {
        self.require_non_empty("set_edge_tag")?;
        let (c, i) = self.locate(e, "edge", "set_edge_tag")?;
        self.flags.edge_user_data |= tag.is_some();
        self.contours[c].edge_tags[i] = tag;
        Ok(())
    }

    /// Tag of contour `c`.
    pub fn contour_tag(&self, c: usize) -> Result<Option<&U::Contour>> {
        self.check_contour(c, "contour_tag")?;
        Ok(self.contours[c].tag.as_ref())
    }

    /// Sets or clears the tag of contour `c`.
    pub fn set_contour_tag(&mut self, c: usize, tag: Option<U::Contour>) -> Result<()> {
        self.require_non_empty("set_contour_tag")?;
        self.check_contour(c, "set_contour_tag")?;
        self.flags.contour_user_data |= tag.is_some();
        self.contours[c].tag = tag;
        Ok(())
    }

    /// Tag of the whole polygon.
    #[inline]
    pub fn tag(&self) -> Option<&U::Polygon> {
        self.tag.as_ref()
    }

    /// Sets or clears the polygon tag.
    pub fn set_tag(&mut self, tag: Option<U::Polygon>) {
        self.flags.polygon_user_data |= tag.is_some();
        self.tag = tag;
    }

    // ---- metrics ---------------------------------------------------------

    /// Cached bounding box; `None` for an empty polygon.
    #[inline]
    pub fn bounding_box(&self) -> Option<Aabb2<f64>> {
        self.bounds
    }

    /// Filled area: the outer contour's area minus the holes'.
    ///
    /// For a regularized polygon this is the sum of the signed contour areas.
    pub fn area(&self) -> f64 {
        let mut contours = self.contours.iter();
        let Some(outer) = contours.next() else {
            return 0.0;
        };
        let holes: f64 = contours.map(|c| c.signed_area().abs()).sum();
        outer.signed_area().abs() - holes
    }

    /// Signed area of contour `c`, positive for counter-clockwise contours.
    pub fn contour_area(&self, c: usize) -> Result<f64> {
        self.check_contour(c, "contour_area")?;
        Ok(self.contours[c].signed_area())
    }

    /// Returns `true` if contour `c` runs counter-clockwise.
    pub fn has_positive_orientation(&self, c: usize) -> Result<bool> {
        Ok(self.contour_area(c)? > 0.0)
    }

    /// Total boundary length.
    pub fn perimeter(&self) -> f64 {
        self.contours.iter().map(Contour::perimeter).sum()
    }

    /// Boundary length of contour `c`.
    pub fn contour_perimeter(&self, c: usize) -> Result<f64> {
        self.check_contour(c, "contour_perimeter")?;
        Ok(self.contours[c].perimeter())
    }

    // ---- recognizers and queries ------------------------------------------

    /// Returns `true` for a single axis-aligned rectangle of straight edges.
    pub fn is_a_box(&self) -> bool {
        let [outer] = self.contours.as_slice() else {
            return false;
        };
        if outer.len() != 4 || outer.sweeps.iter().any(|&s| s != 0.0) {
            return false;
        }
        let eps = Tolerance::DEFAULT_DISTANCE;
        let p = &outer.points;
        let horizontal = |a: Point2<f64>, b: Point2<f64>| (a.y - b.y).abs() <= eps;
        let vertical = |a: Point2<f64>, b: Point2<f64>| (a.x - b.x).abs() <= eps;
        let h_first = horizontal(p[0], p[1])
            && vertical(p[1], p[2])
            && horizontal(p[2], p[3])
            && vertical(p[3], p[0]);
        let v_first = vertical(p[0], p[1])
            && horizontal(p[1], p[2])
            && vertical(p[2], p[3])
            && horizontal(p[3], p[0]);
        h_first || v_first
    }

    /// Returns the circle if the polygon is a single contour of arcs on one
    /// circle closing a full turn.
    pub fn is_a_circle(&self) -> Option<Circle2<f64>> {
        let [outer] = self.contours.as_slice() else {
            return None;
        };
        if outer.sweeps.iter().any(|&s| s == 0.0) {
            return None;
        }
        let tol = Tolerance::default();
        let circle = match outer.edge(0) {
            Edge::Arc(a) => a.circle(),
            Edge::Line(_) => return None,
        };
        let scale = tol.distance.max(circle.radius * 1e-9);
        for e in outer.edges() {
            let Edge::Arc(a) = e else { return None };
            if !a.circle().coincides(&circle, scale) {
                return None;
            }
        }
        let total: f64 = outer.sweeps.iter().sum();
        ((total.abs() - TAU).abs() <= tol.angle * outer.len() as f64 + 1e-9).then_some(circle)
    }

    /// Global index of the vertex within `tolerance` of `point`.
    pub fn vertex_index_of(&self, point: Point2<f64>, tolerance: f64) -> Option<usize> {
        self.vertices()
            .position(|v| v.coincides(point, tolerance))
    }

    /// Distance from `point` to the nearest boundary edge; `None` for an
    /// empty polygon.
    pub fn distance_from_point(&self, point: Point2<f64>) -> Option<f64> {
        self.edges()
            .map(|e| e.distance_to_point(point))
            .reduce(f64::min)
    }

    /// Global index of an edge passing within `tolerance` of `point`.
    pub fn edge_at_point(&self, point: Point2<f64>, tolerance: f64) -> Option<usize> {
        self.edges()
            .position(|e| e.distance_to_point(point) <= tolerance)
    }

    /// Compares the geometry of two polygons contour by contour, independent
    /// of which vertex each contour starts at. Tags and flags are ignored.
    pub fn compare_geometry<V: UserData>(&self, other: &Polygon<V>, tol: &Tolerance) -> bool {
        if self.contours.len() != other.contours.len() {
            return false;
        }
        self.contours.iter().zip(&other.contours).all(|(a, b)| {
            if a.len() != b.len() {
                return false;
            }
            let n = a.len();
            (0..n).any(|k| {
                (0..n).all(|i| {
                    let j = (i + k) % n;
                    a.points[i].coincides(b.points[j], tol.distance)
                        && (a.sweeps[i] - b.sweeps[j]).abs() <= tol.angle
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn square_with_hole() -> Polygon {
        let outer = Contour::from_parts(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(4.0, 4.0),
                Point2::new(0.0, 4.0),
            ],
            vec![0.0; 4],
        );
        let hole = Contour::from_parts(
            vec![
                Point2::new(1.0, 1.0),
                Point2::new(1.0, 2.0),
                Point2::new(2.0, 2.0),
                Point2::new(2.0, 1.0),
            ],
            vec![0.0; 4],
        );
        Polygon::from_raw(vec![outer, hole], Flags::default(), true)
    }

    #[test]
    fn test_flags_bits() {
        let flags = Flags {
            same_dir_edge_legal: true,
            edge_user_data: true,
            force_64bit_precision: true,
            ..Flags::default()
        };
        assert_eq!(flags.to_bits(), 0b100101);
        assert_eq!(Flags::from_bits(flags.to_bits()), flags);
        assert_eq!(Flags::from_bits(0xffc0), Flags::default());
    }

    #[test]
    fn test_counts_and_ranges() {
        let p = square_with_hole();
        assert_eq!(p.vertex_count(), 8);
        assert_eq!(p.edge_count(), 8);
        assert_eq!(p.contour_count(), 2);
        assert_eq!(p.contour_vertex_range(1).unwrap(), 4..8);
        assert_eq!(p.contour_of_vertex(5).unwrap(), 1);
    }

    #[test]
    fn test_neighbours_wrap_inside_contour() {
        let p = square_with_hole();
        assert_eq!(p.next_vertex(3).unwrap(), 0);
        assert_eq!(p.prev_vertex(4).unwrap(), 7);
        assert_eq!(p.next_edge(7).unwrap(), 4);
        assert_eq!(p.end_vertex_of_edge(7).unwrap(), 4);
        assert_eq!(p.prev_edge_of_vertex(0).unwrap(), 3);
        assert_eq!(p.next_contour(1).unwrap(), 0);
        assert_eq!(p.prev_contour(0).unwrap(), 1);
    }

    #[test]
    fn test_index_errors_name_operation() {
        let p = square_with_hole();
        assert_eq!(
            p.vertex(8),
            Err(PolyError::IndexOutOfRange {
                entity: "vertex",
                index: 8,
                len: 8,
                operation: "vertex",
            })
        );
        assert!(matches!(
            p.contour_area(2),
            Err(PolyError::IndexOutOfRange { entity: "contour", .. })
        ));
    }

    #[test]
    fn test_empty_polygon_queries_and_mutators() {
        let mut p: Polygon = Polygon::new();
        assert_eq!(p.area(), 0.0);
        assert_eq!(p.perimeter(), 0.0);
        assert!(p.bounding_box().is_none());
        assert!(p.distance_from_point(Point2::origin()).is_none());
        assert_eq!(
            p.set_coord(0, Point2::origin()),
            Err(PolyError::EmptyPolygon { operation: "set_coord" })
        );
    }

    #[test]
    fn test_area_and_orientation() {
        let p = square_with_hole();
        assert!(approx_eq(p.area(), 15.0, 1e-12));
        assert!(p.has_positive_orientation(0).unwrap());
        assert!(!p.has_positive_orientation(1).unwrap());
        assert!(approx_eq(p.contour_area(1).unwrap(), -1.0, 1e-12));
        assert!(approx_eq(p.perimeter(), 20.0, 1e-12));
    }

    #[test]
    fn test_set_coord_updates_bounds_and_status() {
        let mut p = square_with_hole();
        p.set_coord(2, Point2::new(6.0, 5.0)).unwrap();
        let b = p.bounding_box().unwrap();
        assert_eq!(b.max, Point2::new(6.0, 5.0));
        assert!(!p.is_regularized());
        assert_eq!(
            p.set_coord(0, Point2::new(1e9, 0.0)),
            Err(PolyError::NumericOverflow { value: 1e9 })
        );
    }

    #[test]
    fn test_reversed_contour_keeps_tags() {
        #[derive(Debug, Clone, PartialEq)]
        struct Tags;
        impl UserData for Tags {
            type Vertex = u8;
            type Edge = u8;
            type Contour = ();
            type Polygon = ();
        }
        let mut c: Contour<Tags> = Contour::from_parts(
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
            vec![0.0, 0.5, 0.0],
        );
        c.vertex_tags = vec![Some(0), Some(1), Some(2)];
        c.edge_tags = vec![Some(10), Some(11), Some(12)];
        let r = c.reversed();
        assert_eq!(r.points[1], Point2::new(0.0, 1.0));
        assert_eq!(r.vertex_tags, vec![Some(0), Some(2), Some(1)]);
        // Old edge 1 (1 -> 2) is new edge 1 (2 -> 1)
        assert_eq!(r.edge_tags, vec![Some(12), Some(11), Some(10)]);
        assert_eq!(r.sweeps, vec![0.0, -0.5, 0.0]);
        assert!(approx_eq(r.signed_area(), -c.signed_area(), 1e-12));
    }

    #[test]
    fn test_is_a_box() {
        let p = square_with_hole();
        assert!(!p.is_a_box());
        let mut single = p.clone();
        single.contours.truncate(1);
        assert!(single.is_a_box());
    }

    #[test]
    fn test_is_a_circle() {
        let c = Contour::from_parts(
            vec![Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0)],
            vec![PI, PI],
        );
        let p: Polygon = Polygon::from_raw(vec![c], Flags::default(), true);
        let circle = p.is_a_circle().unwrap();
        assert!(approx_eq(circle.radius, 1.0, 1e-12));
        assert!(approx_eq(circle.center.x, 0.0, 1e-12));
        assert!(approx_eq(p.area(), PI, 1e-12));
    }

    #[test]
    fn test_queries() {
        let p = square_with_hole();
        assert_eq!(p.vertex_index_of(Point2::new(2.0, 2.0), 1e-9), Some(6));
        assert!(approx_eq(
            p.distance_from_point(Point2::new(1.5, 3.0)).unwrap(),
            1.0,
            1e-12
        ));
        assert_eq!(p.edge_at_point(Point2::new(4.0, 1.0), 1e-9), Some(1));
    }

    #[test]
    fn test_compare_geometry_ignores_start_vertex() {
        let p = square_with_hole();
        let mut q = p.clone();
        q.contours[0] = q.contours[0].rotated(2);
        assert!(p.compare_geometry(&q, &Tolerance::default()));
        q.contours[1].points[0].x += 0.5;
        assert!(!p.compare_geometry(&q, &Tolerance::default()));
    }
}
