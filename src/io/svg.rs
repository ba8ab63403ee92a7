//! SVG path export.
//!
//! Writes the `d` attribute of an SVG `<path>`: one `M … Z` subpath per
//! contour, straight edges as `L` and arcs as circular `A` commands.
//! Coordinates are written as stored (y up); flip the y axis in the
//! surrounding document if needed. Holes run clockwise, so either fill rule
//! draws them.
//!
//! # Example
//!
//! ```
//! use regpoly::io::polygon_to_svg_path;
//! use regpoly::{Point2, Polygon};
//!
//! let disk: Polygon = Polygon::circle(Point2::new(0.0, 0.0), 1.0).unwrap();
//! assert_eq!(polygon_to_svg_path(&disk), "M 1 0 A 1 1 0 0 1 -1 0 A 1 1 0 0 1 1 0 Z");
//! ```

use crate::polygon::{Edge, Polygon, Polyline, UserData};
use crate::primitives::Point2;
use std::f64::consts::PI;
use std::fmt::Write;

/// Appends the drawing command for one edge, assuming the pen is at its start.
fn push_edge(out: &mut String, edge: &Edge) {
    let end = edge.end();
    // Writing into a String cannot fail
    let _ = match edge {
        Edge::Line(_) => write!(out, " L {} {}", end.x, end.y),
        Edge::Arc(arc) => {
            let r = arc.radius();
            let large = u8::from(arc.sweep.abs() > PI);
            let positive = u8::from(arc.sweep > 0.0);
            write!(out, " A {r} {r} 0 {large} {positive} {} {}", end.x, end.y)
        }
    };
}

fn push_move(out: &mut String, p: Point2<f64>) {
    if !out.is_empty() {
        out.push(' ');
    }
    let _ = write!(out, "M {} {}", p.x, p.y);
}

/// Converts a polygon to an SVG path string.
///
/// An empty polygon gives an empty string.
///
/// # Example
///
/// ```
/// use regpoly::io::polygon_to_svg_path;
/// use regpoly::{Point2, Polygon};
///
/// let square: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)).unwrap();
/// assert_eq!(polygon_to_svg_path(&square), "M 0 0 L 10 0 L 10 10 L 0 10 Z");
/// ```
pub fn polygon_to_svg_path<U: UserData>(polygon: &Polygon<U>) -> String {
    let mut out = String::new();
    for c in 0..polygon.contour_count() {
        let Ok(range) = polygon.contour_vertex_range(c) else {
            continue;
        };
        let mut edges = range.filter_map(|e| polygon.edge(e).ok()).peekable();
        let Some(first) = edges.peek() else {
            continue;
        };
        push_move(&mut out, first.start());
        let mut edges: Vec<Edge> = edges.collect();
        // The closing straight edge is implied by Z
        if matches!(edges.last(), Some(Edge::Line(_))) {
            edges.pop();
        }
        for edge in &edges {
            push_edge(&mut out, edge);
        }
        out.push_str(" Z");
    }
    out
}

/// Converts an open polyline to an SVG path string.
///
/// # Example
///
/// ```
/// use regpoly::io::polyline_to_svg_path;
/// use regpoly::polygon::Polyline;
/// use regpoly::Point2;
///
/// let line = Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(2.0, 1.0)]);
/// assert_eq!(polyline_to_svg_path(&line), "M 0 0 L 2 1");
/// ```
pub fn polyline_to_svg_path(polyline: &Polyline) -> String {
    let mut out = String::new();
    let Some(&first) = polyline.points().first() else {
        return out;
    };
    push_move(&mut out, first);
    for edge in polyline.edges() {
        push_edge(&mut out, &edge);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::ContourDesc;

    #[test]
    fn test_empty_polygon() {
        let empty: Polygon = Polygon::new();
        assert_eq!(polygon_to_svg_path(&empty), "");
    }

    #[test]
    fn test_holes_become_subpaths() {
        let outer = ContourDesc::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ]);
        let hole = ContourDesc::from_points(&[
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 2.0),
        ]);
        let p: Polygon = Polygon::from_contours(&[outer, hole]).unwrap();
        let svg = polygon_to_svg_path(&p);
        assert_eq!(svg.matches('M').count(), 2);
        assert_eq!(svg.matches('Z').count(), 2);
        assert!(svg.contains("Z M 1 1 L 1 2 L 2 2 Z"));
    }

    #[test]
    fn test_arc_flags() {
        let p: Polygon = Polygon::from_contours(&[ContourDesc {
            vertices: vec![
                crate::polygon::VertexDesc::new(Point2::new(0.0, 0.0), 0.0),
                crate::polygon::VertexDesc::new(Point2::new(2.0, 0.0), 1.5 * PI),
            ],
            tag: None,
        }])
        .unwrap();
        let svg = polygon_to_svg_path(&p);
        // Large positive arc back to the start
        assert!(svg.starts_with("M 0 0 L 2 0 A "));
        assert!(svg.contains(" 0 1 1 0 0 Z"));
    }

    #[test]
    fn test_polyline_with_arc() {
        let line = Polyline::with_sweeps(
            vec![Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), Point2::new(2.0, 2.0)],
            vec![-PI, 0.0],
        )
        .unwrap();
        assert_eq!(polyline_to_svg_path(&line), "M 0 0 A 1 1 0 0 0 2 0 L 2 2");
    }
}
