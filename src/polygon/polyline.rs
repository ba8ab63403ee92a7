//! Open chains of straight and arc edges.

use super::edge::Edge;
use crate::error::{PolyError, Result};
use crate::primitives::Point2;

/// An open chain of vertices joined by straight or arc edges.
///
/// `sweeps[i]` is the sweep of the edge from `points[i]` to `points[i + 1]`,
/// so there is one sweep fewer than points.
///
/// # Example
///
/// ```
/// use regpoly::polygon::Polyline;
/// use regpoly::Point2;
///
/// let line = Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)]);
/// assert_eq!(line.edge_count(), 1);
/// assert_eq!(line.length(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    points: Vec<Point2<f64>>,
    sweeps: Vec<f64>,
}

impl Polyline {
    /// Creates a polyline of straight edges.
    pub fn new(points: Vec<Point2<f64>>) -> Self {
        let sweeps = vec![0.0; points.len().saturating_sub(1)];
        Self { points, sweeps }
    }

    /// Creates a polyline with the given edge sweeps.
    ///
    /// Fails unless there is exactly one sweep per edge.
    pub fn with_sweeps(points: Vec<Point2<f64>>, sweeps: Vec<f64>) -> Result<Self> {
        if sweeps.len() + 1 != points.len() {
            return Err(PolyError::InvalidArgument {
                operation: "Polyline::with_sweeps",
                reason: format!("{} points need {} sweeps, got {}",
                    points.len(),
                    points.len().saturating_sub(1),
                    sweeps.len()),
            });
        }
        Ok(Self { points, sweeps })
    }

    /// The vertices.
    #[inline]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// The edge sweeps.
    #[inline]
    pub fn sweeps(&self) -> &[f64] {
        &self.sweeps
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.sweeps.len()
    }

    /// Returns `true` if the polyline has no edge.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sweeps.is_empty()
    }

    /// Edge `i`.
    pub fn edge(&self, i: usize) -> Option<Edge> {
        let sweep = *self.sweeps.get(i)?;
        Some(Edge::from_sweep(self.points[i], self.points[i + 1], sweep))
    }

    /// All edges in order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.sweeps.len()).filter_map(move |i| self.edge(i))
    }

    /// Total length.
    pub fn length(&self) -> f64 {
        self.edges().map(|e| e.length()).sum()
    }

    /// Returns `true` if the last point coincides with the first.
    pub fn is_closed(&self, eps: f64) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) if self.points.len() > 2 => a.coincides(*b, eps),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_with_sweeps_checks_count() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(Polyline::with_sweeps(pts.clone(), vec![PI]).is_ok());
        assert!(matches!(
            Polyline::with_sweeps(pts, vec![]),
            Err(PolyError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_length_with_arc() {
        let p = Polyline::with_sweeps(
            vec![Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0), Point2::new(-1.0, -1.0)],
            vec![PI, 0.0],
        )
        .unwrap();
        assert!((p.length() - (PI + 1.0)).abs() < 1e-12);
        assert!(p.edge(1).is_some());
        assert!(p.edge(2).is_none());
    }

    #[test]
    fn test_is_closed() {
        let open = Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(!open.is_closed(1e-9));
        let closed = Polyline::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ]);
        assert!(closed.is_closed(1e-9));
    }
}
