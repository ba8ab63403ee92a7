//! Vertex welding for the arrangement builder.
//!
//! Split points found by edge intersection are merged into shared nodes so
//! that pieces meeting at "the same" point really share an endpoint.
//!
//! # Example
//!
//! ```
//! use regpoly::tolerance::NodeWelder;
//! use regpoly::Point2;
//!
//! let mut welder = NodeWelder::new(0.01);
//! let a = welder.insert(Point2::new(0.0, 0.0));
//! let b = welder.insert(Point2::new(0.005, 0.0)); // merged into `a`
//! let c = welder.insert(Point2::new(1.0, 0.0));
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! assert_eq!(welder.len(), 2);
//! ```

use crate::primitives::Point2;
use std::collections::HashMap;

/// Incremental keep-first point welder backed by a uniform grid hash.
///
/// The first point inserted into a cluster is its representative; later
/// points within `epsilon` of a representative map to it. Grid cells are
/// `epsilon` wide, so only the 3x3 neighbourhood of a cell is searched.
#[derive(Debug, Clone)]
pub struct NodeWelder {
    epsilon: f64,
    nodes: Vec<Point2<f64>>,
    grid: HashMap<(i64, i64), Vec<usize>>,
}

impl NodeWelder {
    /// Creates an empty welder merging points closer than `epsilon`.
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.max(f64::MIN_POSITIVE),
            nodes: Vec::new(),
            grid: HashMap::new(),
        }
    }

    /// Number of distinct nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no point was inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Representative coordinates of node `id`.
    #[inline]
    pub fn node(&self, id: usize) -> Point2<f64> {
        self.nodes[id]
    }

    /// All node representatives, indexed by node id.
    #[inline]
    pub fn nodes(&self) -> &[Point2<f64>] {
        &self.nodes
    }

    fn cell(&self, p: Point2<f64>) -> (i64, i64) {
        (
            (p.x / self.epsilon).floor() as i64,
            (p.y / self.epsilon).floor() as i64,
        )
    }

    /// Finds the node within `epsilon` of `p`, if any.
    pub fn find(&self, p: Point2<f64>) -> Option<usize> {
        let (cx, cy) = self.cell(p);
        let eps_sq = self.epsilon * self.epsilon;
        let mut best: Option<(usize, f64)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(ids) = self.grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &id in ids {
                    let d = self.nodes[id].distance_squared(p);
                    if d <= eps_sq && best.map_or(true, |(_, bd)| d < bd) {
                        best = Some((id, d));
                    }
                }
            }
        }
        best.map(|(id, _)| id)
    }

    /// Inserts `p` and returns the id of the node it was welded to.
    pub fn insert(&mut self, p: Point2<f64>) -> usize {
        if let Some(id) = self.find(p) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(p);
        let cell = self.cell(p);
        self.grid.entry(cell).or_default().push(id);
        id
    }
}

/// Removes consecutive duplicate points from a closed ring, including a
/// duplicate of the first point at the end.
///
/// # Arguments
///
/// * `points` - Ring vertices
/// * `epsilon` - Maximum distance for points to be considered duplicates
///
/// # Returns
///
/// The indices of the points that survive, in order.
pub fn dedup_ring_indices(points: &[Point2<f64>], epsilon: f64) -> Vec<usize> {
    dedup_ring_runs(points, epsilon).0
}

/// Like [`dedup_ring_indices`], but also returns where the run of the last
/// surviving point ends (exclusive).
///
/// Each surviving index `keep[j]` stands for the run `keep[j]..keep[j + 1]`.
/// The last one stands for `keep[last]..end`; the points from `end` to the
/// end of the ring coincide with the first point and belong to its run.
pub fn dedup_ring_runs(points: &[Point2<f64>], epsilon: f64) -> (Vec<usize>, usize) {
    let mut keep: Vec<usize> = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        match keep.last() {
            Some(&last) if points[last].distance(*p) <= epsilon => {}
            _ => keep.push(i),
        }
    }
    let mut end = points.len();
    while keep.len() > 1 {
        let (first, last) = (keep[0], keep[keep.len() - 1]);
        if points[first].distance(points[last]) <= epsilon {
            end = last;
            keep.pop();
        } else {
            break;
        }
    }
    (keep, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welder_keeps_first() {
        let mut w = NodeWelder::new(0.1);
        let a = w.insert(Point2::new(0.0, 0.0));
        let b = w.insert(Point2::new(0.05, 0.05));
        assert_eq!(a, b);
        assert_eq!(w.node(a), Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_welder_across_cell_boundary() {
        let mut w = NodeWelder::new(0.1);
        let a = w.insert(Point2::new(0.099, 0.0));
        let b = w.insert(Point2::new(0.101, 0.0));
        assert_eq!(a, b);
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn test_welder_negative_coordinates() {
        let mut w = NodeWelder::new(1e-7);
        let a = w.insert(Point2::new(-1.0, -1.0));
        let b = w.insert(Point2::new(-1.0 + 5e-8, -1.0));
        let c = w.insert(Point2::new(1.0, 1.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(w.find(Point2::new(2.0, 2.0)), None);
    }

    #[test]
    fn test_dedup_ring_indices() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.001, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        assert_eq!(dedup_ring_indices(&points, 0.01), vec![0, 2, 3]);
    }

    #[test]
    fn test_dedup_ring_indices_empty() {
        assert!(dedup_ring_indices(&[], 0.01).is_empty());
    }

    #[test]
    fn test_dedup_ring_runs_wrap_tail() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.001),
        ];
        assert_eq!(dedup_ring_runs(&points, 0.01), (vec![0, 1, 2], 3));
        assert_eq!(dedup_ring_runs(&points[..3], 0.01), (vec![0, 1, 2], 3));
    }
}
