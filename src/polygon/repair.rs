//! In-place repair: straightening tiny arcs, dropping zero-length edges and
//! merging neighbouring edges that run in the same direction.

use super::core::{Contour, Polygon, UserData};
use super::edge::Edge;
use crate::tolerance::Tolerance;
use std::f64::consts::TAU;

/// Returns `true` if edges `i` and `i + 1` of `contour` can become one edge.
fn mergeable<U: UserData>(contour: &Contour<U>, i: usize, tol: &Tolerance, same_tags: bool) -> bool {
    let n = contour.len();
    let j = (i + 1) % n;
    if n < 3 || (same_tags && contour.edge_tags[i] != contour.edge_tags[j]) {
        return false;
    }
    let arcs_after = contour.sweeps.iter().filter(|&&s| s != 0.0).count()
        - usize::from(contour.sweeps[i] != 0.0 && contour.sweeps[j] != 0.0);
    if n == 3 && arcs_after == 0 {
        return false;
    }
    match (contour.edge(i), contour.edge(j)) {
        (Edge::Line(a), Edge::Line(b)) => {
            let chord = crate::primitives::Segment2::new(a.start, b.end);
            chord.signed_line_distance(a.end).abs() <= tol.distance
                && a.direction().dot(b.direction()) > 0.0
        }
        (Edge::Arc(a), Edge::Arc(b)) => {
            a.sweep.signum() == b.sweep.signum()
                && (a.sweep + b.sweep).abs() < TAU - tol.angle
                && a.circle().coincides(&b.circle(), tol.distance)
        }
        _ => false,
    }
}

/// Returns `true` if some neighbouring edges of `contour` run in the same
/// direction.
pub(crate) fn has_same_dir_edges<U: UserData>(
    contour: &Contour<U>,
    tol: &Tolerance,
    same_tags: bool,
) -> bool {
    (0..contour.len()).any(|i| mergeable(contour, i, tol, same_tags))
}

/// Removes vertex `j`; the previous vertex takes over its outgoing edge
/// sweep added to its own.
fn absorb_next<U: UserData>(contour: &mut Contour<U>, i: usize) {
    let j = (i + 1) % contour.len();
    contour.sweeps[i] += contour.sweeps[j];
    contour.points.remove(j);
    contour.sweeps.remove(j);
    contour.vertex_tags.remove(j);
    contour.edge_tags.remove(j);
}

/// Merges neighbouring same-direction edges until none is left.
///
/// The merged edge keeps the tag of the first edge. Returns the number of
/// removed vertices.
pub(crate) fn merge_same_dir_edges<U: UserData>(
    contour: &mut Contour<U>,
    tol: &Tolerance,
    same_tags: bool,
) -> usize {
    let mut removed = 0;
    while let Some(i) = (0..contour.len()).find(|&i| mergeable(contour, i, tol, same_tags)) {
        absorb_next(contour, i);
        removed += 1;
    }
    removed
}

pub(crate) fn encloses_nothing<U: UserData>(contour: &Contour<U>) -> bool {
    let arcs = contour.sweeps.iter().any(|&s| s != 0.0);
    contour.len() < 2 || (contour.len() == 2 && !arcs)
}

impl<U: UserData> Polygon<U> {
    /// Applies `f` to every contour, drops contours that no longer enclose
    /// anything and refreshes the cached state.
    fn repair_contours(&mut self, mut f: impl FnMut(&mut Contour<U>) -> usize) -> usize {
        let changed: usize = self.contours.iter_mut().map(&mut f).sum();
        if changed == 0 {
            return 0;
        }
        if self.contours.first().map_or(false, encloses_nothing) {
            log::warn!("repair collapsed the outer contour");
            self.contours.clear();
        }
        self.contours.retain(|c| !encloses_nothing(c));
        self.update_bounds();
        if self.regularized {
            self.regularized = self.is_regular(&Tolerance::default());
        }
        changed
    }

    /// Turns every arc whose sweep is below `min_angle` into a straight
    /// edge. Returns the number of straightened arcs.
    pub fn remove_small_arcs(&mut self, min_angle: f64) -> usize {
        self.repair_contours(|c| {
            let mut n = 0;
            for s in &mut c.sweeps {
                if *s != 0.0 && s.abs() < min_angle {
                    *s = 0.0;
                    n += 1;
                }
            }
            n
        })
    }

    /// Removes every edge shorter than `min_len` and straightens every arc
    /// with sweep below `min_angle`. Both comparisons are strict: an edge of
    /// exactly `min_len` stays.
    ///
    /// A removed edge's end vertex disappears and its start vertex takes
    /// over the following edge. Returns the number of changed entities.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::{Point2, Polygon};
    ///
    /// let mut p: Polygon = Polygon::from_points(&[
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(1.0, 0.0),
    ///     Point2::new(1.0, 0.001),
    ///     Point2::new(1.0, 1.0),
    ///     Point2::new(0.0, 1.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(p.remove_zero_edges_and_arcs(0.01, 1e-6), 1);
    /// assert_eq!(p.vertex_count(), 4);
    /// ```
    pub fn remove_zero_edges_and_arcs(&mut self, min_len: f64, min_angle: f64) -> usize {
        self.repair_contours(|c| {
            let mut n = 0;
            for s in &mut c.sweeps {
                if *s != 0.0 && s.abs() < min_angle {
                    *s = 0.0;
                    n += 1;
                }
            }
            let mut i = 0;
            while i < c.len() && c.len() > 1 {
                if c.edge(i).length() < min_len {
                    let j = (i + 1) % c.len();
                    c.sweeps[i] = 0.0;
                    absorb_next(c, i);
                    n += 1;
                    if j == 0 {
                        break;
                    }
                } else {
                    i += 1;
                }
            }
            n
        })
    }

    /// Merges neighbouring collinear straight edges and co-circular arcs
    /// turning the same way. Returns the number of removed vertices.
    pub fn remove_same_dir_edges(&mut self, tol: &Tolerance) -> usize {
        self.repair_contours(|c| merge_same_dir_edges(c, tol, false))
    }

    /// Like [`remove_same_dir_edges`](Self::remove_same_dir_edges), but only
    /// merges edges with equal tags.
    pub fn remove_same_dir_edges_with_same_tags(&mut self, tol: &Tolerance) -> usize {
        self.repair_contours(|c| merge_same_dir_edges(c, tol, true))
    }
}
