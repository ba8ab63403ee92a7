//! Epsilon-aware geometric predicates, edge intersection and the
//! cooperative cancellation hook.
//!
//! All functions in this module take explicit tolerance parameters.
//! No hidden epsilons are used.

mod abort;
mod intersect;
mod predicates;
mod weld;

pub use abort::{AbortCheck, AbortFn, NeverAbort};
pub use intersect::{intersect_edges, EdgeHit};
pub use predicates::{
    orient2d, point_on_arc, point_on_segment, segments_intersect, Orientation,
    SegmentIntersection,
};
pub use weld::{dedup_ring_indices, dedup_ring_runs, NodeWelder};

/// Distance and angle tolerances used by every geometric comparison.
///
/// Two points closer than `distance` are the same point; an arc whose sweep
/// is below `angle` radians is straight.
///
/// # Example
///
/// ```
/// use regpoly::Tolerance;
///
/// let tol = Tolerance::default();
/// assert_eq!(tol.distance, 1e-7);
///
/// let coarse = Tolerance::new(1e-3, 1e-4);
/// assert!(coarse.same_point_distance(5e-4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerance {
    /// Length tolerance in model units.
    pub distance: f64,
    /// Angle tolerance in radians.
    pub angle: f64,
}

impl Tolerance {
    /// Default length tolerance.
    pub const DEFAULT_DISTANCE: f64 = 1e-7;
    /// Default angle tolerance.
    pub const DEFAULT_ANGLE: f64 = 1e-7;

    /// Creates a tolerance from a length and an angle.
    #[inline]
    pub fn new(distance: f64, angle: f64) -> Self {
        Self { distance, angle }
    }

    /// Returns `true` if a length counts as zero.
    #[inline]
    pub fn same_point_distance(&self, d: f64) -> bool {
        d <= self.distance
    }

    /// Returns `true` if a sweep counts as a straight edge.
    #[inline]
    pub fn is_straight(&self, sweep: f64) -> bool {
        sweep.abs() <= self.angle
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            distance: Self::DEFAULT_DISTANCE,
            angle: Self::DEFAULT_ANGLE,
        }
    }
}
