//! Winding numbers of arc-bounded operands and the boolean combination of
//! their fill states.

use super::core::{Polygon, UserData};
use super::edge::Edge;
use super::options::FillingMethod;
use crate::bounds::Aabb2;
use crate::primitives::Point2;
use std::f64::consts::TAU;

/// How the fill states of the operands combine into the result region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combine {
    /// A single operand, taken as is.
    Unary,
    Union,
    Intersection,
    /// First operand minus all others.
    Difference,
    Xor,
}

impl Combine {
    /// Combines the fill states of the operands, first operand first.
    pub(crate) fn apply(self, mut inside: impl Iterator<Item = bool>) -> bool {
        match self {
            Combine::Unary => inside.next().unwrap_or(false),
            Combine::Union => inside.any(|x| x),
            Combine::Intersection => {
                let first = inside.next().unwrap_or(false);
                first && inside.all(|x| x)
            }
            Combine::Difference => {
                let first = inside.next().unwrap_or(false);
                first && !inside.any(|x| x)
            }
            Combine::Xor => inside.filter(|&x| x).count() % 2 == 1,
        }
    }
}

/// One contour of an operand with its normalization sign.
#[derive(Debug, Clone)]
struct SignedContour {
    sign: i32,
    bbox: Option<Aabb2<f64>>,
    edges: Vec<Edge>,
}

/// Exact winding numbers of one operand.
#[derive(Debug, Clone)]
pub(crate) struct OperandWinding {
    bbox: Option<Aabb2<f64>>,
    contours: Vec<SignedContour>,
}

impl OperandWinding {
    /// Prepares `polygon` for winding queries.
    ///
    /// With `normalize` the outer contour counts as positive and every hole
    /// as negative whatever their stored orientation.
    pub(crate) fn new<U: UserData>(polygon: &Polygon<U>, normalize: bool) -> Self {
        let contours = polygon
            .contours
            .iter()
            .enumerate()
            .map(|(c, contour)| {
                let area = contour.signed_area();
                let sign = match (normalize, c) {
                    (false, _) => 1,
                    (true, 0) if area < 0.0 => -1,
                    (true, 0) => 1,
                    (true, _) if area > 0.0 => -1,
                    (true, _) => 1,
                };
                SignedContour {
                    sign,
                    bbox: contour.bounding_box(),
                    edges: contour.edges().collect(),
                }
            })
            .collect();
        Self {
            bbox: polygon.bounding_box(),
            contours,
        }
    }

    /// Winding number around `p`; undefined on the boundary.
    pub(crate) fn winding(&self, p: Point2<f64>) -> i32 {
        match self.bbox {
            Some(b) if b.contains_point(p) => {}
            _ => return 0,
        }
        self.contours
            .iter()
            .filter(|c| c.bbox.map_or(false, |b| b.contains_point(p)))
            .map(|c| {
                let total: f64 = c.edges.iter().map(|e| e.winding_angle(p)).sum();
                c.sign * (total / TAU).round() as i32
            })
            .sum()
    }
}

/// Fill state of every operand plus the combination rule.
#[derive(Debug, Clone)]
pub(crate) struct WindingField {
    operands: Vec<OperandWinding>,
    filling: FillingMethod,
    combine: Combine,
}

impl WindingField {
    pub(crate) fn new(operands: Vec<OperandWinding>, filling: FillingMethod, combine: Combine) -> Self {
        Self {
            operands,
            filling,
            combine,
        }
    }

    /// Returns `true` if `p` lies in the result region.
    pub(crate) fn is_filled(&self, p: Point2<f64>) -> bool {
        self.combine.apply(
            self.operands
                .iter()
                .map(|o| self.filling.is_inside(o.winding(p))),
        )
    }
}
