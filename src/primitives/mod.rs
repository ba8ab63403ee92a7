//! Floating-point geometric primitives: points, vectors and the two edge kinds.

mod arc2;
mod circle2;
mod point2;
mod segment2;
mod vec2;

pub use arc2::Arc2;
pub use circle2::Circle2;
pub use point2::Point2;
pub use segment2::Segment2;
pub use vec2::Vec2;

use num_traits::Float;

/// π for any float type.
#[inline]
pub(crate) fn pi<F: Float>() -> F {
    (-F::one()).acos()
}

/// 2π for any float type.
#[inline]
pub(crate) fn tau<F: Float>() -> F {
    pi::<F>() + pi::<F>()
}
