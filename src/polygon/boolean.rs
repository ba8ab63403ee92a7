//! Polygon boolean operations.
//!
//! Provides union, intersection, difference and XOR of two polygons plus the
//! union of a whole [`PolygonSet`]. Operands that are not flagged
//! regularized are regularized internally (orientation normalization plus
//! the fill rule of the options), never rejected.

use super::arrangement::Operand;
use super::core::{Polygon, UserData};
use super::options::{OperationOptions, PolyHoleHandling};
use super::regularize::run_engine;
use super::set::{PolygonOutput, PolygonResult, PolygonSet};
use super::winding::Combine;
use crate::error::Result;

impl<U: UserData> Polygon<U> {
    fn boolean(
        &self,
        other: &Self,
        combine: Combine,
        options: &OperationOptions<'_>,
        operation: &'static str,
    ) -> Result<PolygonOutput<U>> {
        let (Some(ba), Some(bb)) = (self.bounding_box(), other.bounding_box()) else {
            return self.with_empty_operand(other, combine, options, operation);
        };

        // Disjoint boxes: no edge interaction, the answer is one of the inputs
        if !ba.inflated(options.tolerance.distance).intersects(bb) {
            let output = match combine {
                Combine::Intersection => Some(PolygonOutput::empty()),
                Combine::Difference if self.is_plain(options) => {
                    Some(PolygonOutput::same_as(self))
                }
                Combine::Union | Combine::Xor if self.is_plain(options) && other.is_plain(options) => {
                    Some(PolygonOutput::new(
                        PolygonResult::ResultThisAndParameter,
                        vec![self.clone(), other.clone()],
                    ))
                }
                _ => None,
            };
            if let Some(output) = output {
                log::debug!("{operation}: disjoint bounding boxes, {:?}", output.result);
                return Ok(output);
            }
        }

        run_engine(
            &[
                Operand {
                    polygon: self,
                    normalize: true,
                },
                Operand {
                    polygon: other,
                    normalize: true,
                },
            ],
            combine,
            options,
            operation,
        )
    }

    /// Flagged regularized and unaffected by the hole handling.
    fn is_plain(&self, options: &OperationOptions<'_>) -> bool {
        self.regularized
            && (options.holes == PolyHoleHandling::ReturnHoles || self.contour_count() == 1)
    }

    fn with_empty_operand(
        &self,
        other: &Self,
        combine: Combine,
        options: &OperationOptions<'_>,
        operation: &'static str,
    ) -> Result<PolygonOutput<U>> {
        let keep = |p: &Self| {
            if p.is_empty() {
                return Ok(PolygonOutput::empty());
            }
            super::regularize::regularize_raw(p, true, options, operation)
        };
        match combine {
            Combine::Intersection => Ok(PolygonOutput::empty()),
            Combine::Difference | Combine::Unary => {
                if other.is_empty() && self.is_plain(options) {
                    return Ok(PolygonOutput::same_as(self));
                }
                if other.is_empty() {
                    return keep(self);
                }
                Ok(PolygonOutput::empty())
            }
            Combine::Union | Combine::Xor => {
                if self.is_empty() && other.is_plain(options) {
                    return Ok(PolygonOutput::new(
                        PolygonResult::ResultSameAsFirstParameter,
                        vec![other.clone()],
                    ));
                }
                if other.is_empty() && self.is_plain(options) {
                    return Ok(PolygonOutput::same_as(self));
                }
                keep(if self.is_empty() { other } else { self })
            }
        }
    }

    /// Union with the default options.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::{Point2, Polygon};
    ///
    /// let a: Polygon = Polygon::rectangle(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)).unwrap();
    /// let b: Polygon = Polygon::rectangle(Point2::new(0.5, 0.5), Point2::new(1.5, 1.5)).unwrap();
    /// let u = a.union(&b).unwrap();
    /// assert_eq!(u.polygons.len(), 1);
    /// assert!((u.area() - 1.75).abs() < 1e-9);
    /// ```
    pub fn union(&self, other: &Self) -> Result<PolygonOutput<U>> {
        self.union_with(other, &OperationOptions::default())
    }

    /// Union with explicit options.
    pub fn union_with(&self, other: &Self, options: &OperationOptions<'_>) -> Result<PolygonOutput<U>> {
        self.boolean(other, Combine::Union, options, "union")
    }

    /// Intersection with the default options.
    pub fn intersection(&self, other: &Self) -> Result<PolygonOutput<U>> {
        self.intersection_with(other, &OperationOptions::default())
    }

    /// Intersection with explicit options.
    pub fn intersection_with(
        &self,
        other: &Self,
        options: &OperationOptions<'_>,
    ) -> Result<PolygonOutput<U>> {
        self.boolean(other, Combine::Intersection, options, "intersection")
    }

    /// The receiver minus `other`, with the default options.
    pub fn difference(&self, other: &Self) -> Result<PolygonOutput<U>> {
        self.difference_with(other, &OperationOptions::default())
    }

    /// The receiver minus `other`, with explicit options.
    pub fn difference_with(
        &self,
        other: &Self,
        options: &OperationOptions<'_>,
    ) -> Result<PolygonOutput<U>> {
        self.boolean(other, Combine::Difference, options, "difference")
    }

    /// Symmetric difference with the default options.
    pub fn xor(&self, other: &Self) -> Result<PolygonOutput<U>> {
        self.xor_with(other, &OperationOptions::default())
    }

    /// Symmetric difference with explicit options.
    pub fn xor_with(&self, other: &Self, options: &OperationOptions<'_>) -> Result<PolygonOutput<U>> {
        self.boolean(other, Combine::Xor, options, "xor")
    }
}

impl<U: UserData> PolygonSet<U> {
    /// Union of every polygon in the set in a single engine pass.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::polygon::{OperationOptions, PolygonSet};
    /// use regpoly::{Point2, Polygon};
    ///
    /// let set: PolygonSet = (0..3)
    ///     .map(|i| {
    ///         let x = i as f64;
    ///         Polygon::rectangle(Point2::new(x, 0.0), Point2::new(x + 1.5, 1.0)).unwrap()
    ///     })
    ///     .collect();
    /// let u = set.unify(&OperationOptions::default()).unwrap();
    /// assert_eq!(u.polygons.len(), 1);
    /// assert!((u.area() - 3.5).abs() < 1e-9);
    /// ```
    pub fn unify(&self, options: &OperationOptions<'_>) -> Result<PolygonOutput<U>> {
        let operands: Vec<Operand<'_, U>> = self
            .iter()
            .filter(|p| !p.is_empty())
            .map(|polygon| Operand {
                polygon,
                normalize: true,
            })
            .collect();
        run_engine(&operands, Combine::Union, options, "unify")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolyError;
    use crate::polygon::{ContourDesc, FillingMethod};
    use crate::primitives::Point2;
    use crate::tolerance::AbortFn;
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::rectangle(Point2::new(x0, y0), Point2::new(x1, y1)).unwrap()
    }

    #[test]
    fn test_overlapping_unit_squares() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(0.5, 0.0, 1.5, 1.0);
        assert_relative_eq!(a.union(&b).unwrap().area(), 1.5, epsilon = 1e-9);
        assert_relative_eq!(a.intersection(&b).unwrap().area(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(a.difference(&b).unwrap().area(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(a.xor(&b).unwrap().area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_merges_shared_edge() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.0, 2.0, 1.0);
        let u = a.union(&b).unwrap();
        assert_eq!(u.result, PolygonResult::NewPolygons);
        assert_eq!(u.polygons.len(), 1);
        assert_eq!(u.polygons[0].vertex_count(), 4);
        assert!(u.polygons[0].is_a_box());
    }

    #[test]
    fn test_result_kinds() {
        let big = rect(0.0, 0.0, 4.0, 4.0);
        let small = rect(1.0, 1.0, 2.0, 2.0);
        let far = rect(10.0, 0.0, 11.0, 1.0);

        assert_eq!(big.union(&small).unwrap().result, PolygonResult::ResultSameAsThis);
        assert_eq!(
            small.union(&big).unwrap().result,
            PolygonResult::ResultSameAsFirstParameter
        );
        assert_eq!(
            small.intersection(&big).unwrap().result,
            PolygonResult::ResultSameAsThis
        );
        assert_eq!(big.union(&far).unwrap().result, PolygonResult::ResultThisAndParameter);
        assert_eq!(big.intersection(&far).unwrap().result, PolygonResult::EmptyPolygon);
        assert_eq!(small.difference(&big).unwrap().result, PolygonResult::EmptyPolygon);

        let touching = rect(4.0, 1.0, 5.0, 2.0);
        let out = big.union(&touching).unwrap();
        assert_eq!(out.result, PolygonResult::NewPolygons);
        assert_relative_eq!(out.area(), 17.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_makes_hole() {
        let big = rect(0.0, 0.0, 4.0, 4.0);
        let small = rect(1.0, 1.0, 2.0, 2.0);
        let out = big.difference(&small).unwrap();
        assert_eq!(out.polygons.len(), 1);
        let p = &out.polygons[0];
        assert_eq!(p.contour_count(), 2);
        assert!(p.contour_area(1).unwrap() < 0.0);
        assert_relative_eq!(p.area(), 15.0, epsilon = 1e-9);

        let no_holes = OperationOptions::default().with_holes(PolyHoleHandling::WithoutHoles);
        let out = big.difference_with(&small, &no_holes).unwrap();
        assert_eq!(out.polygons[0].contour_count(), 1);
    }

    #[test]
    fn test_unregularized_operand_is_normalized() {
        // Clockwise square on the left of a regular one
        let cw: Polygon = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ])
        .unwrap();
        let b = rect(0.5, 0.0, 1.5, 1.0);
        let options = OperationOptions::default().with_filling(FillingMethod::Positive);
        assert_relative_eq!(cw.union_with(&b, &options).unwrap().area(), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_circle_intersections() {
        let a: Polygon = Polygon::circle(Point2::new(0.0, 0.0), 1.0).unwrap();
        let b: Polygon = Polygon::circle(Point2::new(1.0, 0.0), 1.0).unwrap();
        // Lens area of two unit circles one radius apart
        let lens = 2.0 * std::f64::consts::PI / 3.0 - 3.0_f64.sqrt() / 2.0;
        let i = a.intersection(&b).unwrap();
        assert_eq!(i.polygons.len(), 1);
        assert_relative_eq!(i.area(), lens, epsilon = 1e-9);
        assert!(i.polygons[0].vertex_count() <= 4);
        let u = a.union(&b).unwrap();
        assert_relative_eq!(u.area(), 2.0 * std::f64::consts::PI - lens, epsilon = 1e-9);
    }

    #[test]
    fn test_edge_tags_survive_split() {
        #[derive(Debug, Clone, PartialEq)]
        struct Side;
        impl UserData for Side {
            type Vertex = ();
            type Edge = char;
            type Contour = ();
            type Polygon = ();
        }
        let mut desc = ContourDesc::<Side>::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        for (v, tag) in desc.vertices.iter_mut().zip(['s', 'e', 'n', 'w']) {
            v.edge_tag = Some(tag);
        }
        let a = Polygon::from_contours(&[desc]).unwrap();
        let b = Polygon::<Side>::rectangle(Point2::new(1.0, -1.0), Point2::new(3.0, 1.0)).unwrap();
        let out = a.difference(&b).unwrap();
        let p = &out.polygons[0];
        let tags: Vec<Option<char>> = (0..p.edge_count())
            .map(|e| p.edge_tag(e).unwrap().copied())
            .collect();
        assert!(tags.contains(&Some('s')));
        assert!(tags.contains(&Some('e')));
        assert!(tags.contains(&Some('n')));
        assert!(tags.contains(&Some('w')));
        // The two edges cut out of `b` carry its (absent) tags
        assert_eq!(tags.iter().filter(|t| t.is_none()).count(), 2);
    }

    #[test]
    fn test_abort_cancels() {
        let stop = AbortFn(|| true);
        let options = OperationOptions::default().with_abort(&stop);
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(0.5, 0.5, 1.5, 1.5);
        assert_eq!(
            a.union_with(&b, &options),
            Err(PolyError::Cancelled { operation: "union" })
        );
    }

    #[test]
    fn test_unify_disjoint_and_overlapping() {
        let set = PolygonSet::from(vec![
            rect(0.0, 0.0, 1.0, 1.0),
            rect(0.5, 0.5, 1.5, 1.5),
            rect(5.0, 5.0, 6.0, 6.0),
        ]);
        let u = set.unify(&OperationOptions::default()).unwrap();
        assert_eq!(u.polygons.len(), 2);
        assert_relative_eq!(u.area(), 2.75, epsilon = 1e-9);
    }
}
