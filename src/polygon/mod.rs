//! Regularized polygons with straight and circular-arc edges.
//!
//! A [`Polygon`] is one outer contour (counter-clockwise) followed by any
//! number of holes (clockwise). Vertices and edges are addressed by global
//! indices running contour after contour; vertex `i` starts edge `i`.
//! Every vertex, edge, contour and the polygon itself may carry a user tag
//! typed by [`UserData`].
//!
//! Operations that can change the topology (regularization, boolean
//! operations, cutting, offsetting, filleting and most edits) return a
//! [`PolygonOutput`]: the result kind and the regularized pieces.
//!
//! # Example
//!
//! ```
//! use regpoly::polygon::PolygonResult;
//! use regpoly::{Point2, Polygon};
//!
//! // Two overlapping squares
//! let a: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0)).unwrap();
//! let b: Polygon = Polygon::rectangle(Point2::new(1.0, 1.0), Point2::new(3.0, 3.0)).unwrap();
//!
//! let both = a.intersection(&b).unwrap();
//! assert_eq!(both.result, PolygonResult::NewPolygons);
//! assert_eq!(both.polygons.len(), 1);
//! assert!((both.area() - 1.0).abs() < 1e-12);
//! ```

mod arrangement;
mod boolean;
mod build;
mod core;
mod cut;
mod edge;
mod edit;
mod fillet;
mod offset;
mod options;
mod polyline;
mod position;
mod regularize;
mod repair;
mod set;
mod winding;

pub use self::core::{Flags, Polygon, UserData, MAX_COORD};
pub use build::{ArcDesc, ContourDesc, VertexDesc};
pub use cut::HalfPlane;
pub use edge::Edge;
pub use offset::MITER_LIMIT;
pub use options::{FillingMethod, OperationOptions, PolyHoleHandling};
pub use polyline::Polyline;
pub use position::{Boundary, DetailedRelativePosition, RelativePosition};
pub use set::{PolygonOutput, PolygonResult, PolygonSet};

pub(crate) use self::core::{check_point, Contour};
