//! regpoly - Regularized 2D polygons with arc edges
//!
//! Polygons here are always brought into a regular form: simple contours,
//! counter-clockwise outer boundary, clockwise holes. On top of that sit
//! boolean operations, cutting by half-planes, offsetting, filleting,
//! position queries and topological edits, all with explicit tolerances.
//!
//! # Example
//!
//! ```
//! use regpoly::{Point2, Polygon};
//!
//! let a: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)).unwrap();
//! let b: Polygon = Polygon::rectangle(Point2::new(0.5, 0.5), Point2::new(1.5, 1.5)).unwrap();
//!
//! let union = a.union(&b).unwrap();
//! assert!((union.area() - 1.75).abs() < 1e-12);
//! ```

pub mod bounds;
pub mod error;
pub mod hull;
pub mod io;
pub mod polygon;
pub mod primitives;
pub mod tolerance;

pub use bounds::Aabb2;
pub use error::{PolyError, Result};
pub use polygon::Polygon;
pub use primitives::{Arc2, Circle2, Point2, Segment2, Vec2};
pub use tolerance::{
    orient2d, point_on_segment, segments_intersect, Orientation, SegmentIntersection, Tolerance,
};
