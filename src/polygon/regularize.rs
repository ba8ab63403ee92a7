//! Regularization: turning arbitrary contours into non-crossing, correctly
//! oriented and nested ones, and the engine driver shared by every
//! operation.

use super::arrangement::{trace_loops, Arrangement, Operand, Piece, PieceFate};
use super::core::{Contour, Flags, Polygon, UserData};
use super::options::{FillingMethod, OperationOptions, PolyHoleHandling};
use super::repair::{has_same_dir_edges, merge_same_dir_edges};
use super::set::{PolygonOutput, PolygonResult};
use super::winding::{Combine, OperandWinding, WindingField};
use crate::error::{PolyError, Result};
use crate::primitives::Point2;
use crate::tolerance::{intersect_edges, EdgeHit, Tolerance};
use std::f64::consts::TAU;

/// A traced loop turned into a contour, with data needed for nesting.
struct Traced<U: UserData> {
    contour: Contour<U>,
    area: f64,
    /// A point just outside the loop's filled side, or just inside a hole.
    probe: Point2<f64>,
}

/// Runs the arrangement engine on one or two operands.
pub(crate) fn run_engine<U: UserData>(
    operands: &[Operand<'_, U>],
    combine: Combine,
    options: &OperationOptions<'_>,
    operation: &'static str,
) -> Result<PolygonOutput<U>> {
    let Some(first) = operands.first() else {
        return Ok(PolygonOutput::empty());
    };
    let tol = options.tolerance;

    let arrangement = Arrangement::build(operands, options, operation)?;
    let field = WindingField::new(
        operands
            .iter()
            .map(|o| OperandWinding::new(o.polygon, o.normalize))
            .collect(),
        options.filling,
        combine,
    );
    let (kept, fates) = arrangement.classify(&field, options, operation)?;
    if kept.is_empty() {
        log::debug!("{operation}: empty result");
        return Ok(PolygonOutput::empty());
    }

    if combine != Combine::Unary {
        if let Some(output) = shortcut(operands, &arrangement, &fates, options) {
            log::debug!("{operation}: {:?}", output.result);
            return Ok(output);
        }
    }

    let loops = trace_loops(&kept, arrangement.welder.len());
    let scale = arrangement
        .bbox
        .map_or(0.0, |b| b.diagonal().magnitude());
    let delta = (4.0 * tol.distance).max(1e-9 * scale);

    let mut outers: Vec<Traced<U>> = Vec::new();
    let mut holes: Vec<Traced<U>> = Vec::new();
    for lp in &loops {
        let contour = loop_contour(lp, &kept, &arrangement, operands);
        let area = contour.signed_area();
        let perimeter = contour.perimeter();
        if area.abs() < tol.distance * perimeter {
            log::warn!(
                "{operation}: discarding degenerate loop (area {area:e}, perimeter {perimeter:e})"
            );
            continue;
        }
        let first_piece = &kept[lp[0]];
        let mid = first_piece.edge.midpoint();
        let normal = first_piece.edge.tangent_at(0.5).perpendicular();
        let d = delta.min(0.25 * first_piece.edge.length());
        let traced = Traced {
            contour,
            area,
            probe: mid - normal * d,
        };
        if area > 0.0 {
            outers.push(traced);
        } else {
            holes.push(traced);
        }
    }

    let mut flags = first.polygon.flags;
    for o in &operands[1..] {
        let f = o.polygon.flags;
        flags.vertex_user_data |= f.vertex_user_data;
        flags.edge_user_data |= f.edge_user_data;
        flags.contour_user_data |= f.contour_user_data;
    }

    let polygons = assemble(outers, holes, flags, &tol, options.holes, operation)?
        .into_iter()
        .map(|mut p| {
            p.tag = first.polygon.tag.clone();
            p
        })
        .collect::<Vec<_>>();
    log::debug!(
        "{operation}: {} loops, {} polygons",
        loops.len(),
        polygons.len()
    );
    Ok(PolygonOutput::new(PolygonResult::NewPolygons, polygons))
}

/// Recognizes results equal to an operand or to both operands side by side.
fn shortcut<U: UserData>(
    operands: &[Operand<'_, U>],
    arrangement: &Arrangement,
    fates: &[PieceFate],
    options: &OperationOptions<'_>,
) -> Option<PolygonOutput<U>> {
    let n = operands.len();
    let mut forward = vec![true; n];
    let mut fresh = vec![false; n];
    let mut duplicates = false;
    for (piece, fate) in arrangement.pieces.iter().zip(fates) {
        let o = arrangement.sources[piece.source].operand;
        match fate {
            PieceFate::Dropped => forward[o] = false,
            PieceFate::Kept { reversed } => {
                fresh[o] = true;
                forward[o] &= !reversed;
            }
            PieceFate::Duplicate { reversed } => {
                duplicates = true;
                forward[o] &= !reversed;
            }
        }
    }

    let usable = |o: usize| {
        let p = operands[o].polygon;
        !p.is_empty()
            && (options.holes == PolyHoleHandling::ReturnHoles || p.contour_count() == 1)
            && (p.regularized || p.is_regular(&options.tolerance))
    };
    let copy = |o: usize| {
        let mut p = operands[o].polygon.clone();
        p.regularized = true;
        p
    };

    if n == 2 {
        if forward[0] && !fresh[1] && usable(0) {
            return Some(PolygonOutput::new(PolygonResult::ResultSameAsThis, vec![copy(0)]));
        }
        if forward[1] && !fresh[0] && usable(1) {
            return Some(PolygonOutput::new(
                PolygonResult::ResultSameAsFirstParameter,
                vec![copy(1)],
            ));
        }
        if forward[0] && forward[1] && !duplicates && usable(0) && usable(1) {
            return Some(PolygonOutput::new(
                PolygonResult::ResultThisAndParameter,
                vec![copy(0), copy(1)],
            ));
        }
    }
    None
}

/// Builds the contour of one traced loop, carrying tags over from the
/// source edges.
fn loop_contour<U: UserData>(
    lp: &[usize],
    kept: &[Piece],
    arrangement: &Arrangement,
    operands: &[Operand<'_, U>],
) -> Contour<U> {
    let mut contour = Contour::from_parts(Vec::with_capacity(lp.len()), Vec::with_capacity(lp.len()));
    for (k, &i) in lp.iter().enumerate() {
        let piece = &kept[i];
        let src = &arrangement.sources[piece.source];
        let source_contour = &operands[src.operand].polygon.contours[src.contour];
        let n = source_contour.len();
        let vertex_tag = if piece.t0 == 0.0 {
            source_contour.vertex_tags[src.local].clone()
        } else if piece.t0 == 1.0 {
            source_contour.vertex_tags[(src.local + 1) % n].clone()
        } else {
            None
        };
        contour.points.push(arrangement.welder.node(piece.from));
        contour.sweeps.push(piece.edge.sweep());
        contour.vertex_tags.push(vertex_tag);
        contour.edge_tags.push(source_contour.edge_tags[src.local].clone());
        if k == 0 {
            contour.tag = source_contour.tag.clone();
        }
    }
    contour
}

/// Assigns holes to their smallest enclosing outer contour and builds the
/// result polygons.
fn assemble<U: UserData>(
    outers: Vec<Traced<U>>,
    holes: Vec<Traced<U>>,
    flags: Flags,
    tol: &Tolerance,
    handling: PolyHoleHandling,
    operation: &'static str,
) -> Result<Vec<Polygon<U>>> {
    let mut owned: Vec<Vec<Contour<U>>> = vec![Vec::new(); outers.len()];
    let smallest_owner = |p: Point2<f64>, skip: Option<usize>| {
        outers
            .iter()
            .enumerate()
            .filter(|(k, o)| Some(*k) != skip && o.contour.winding_number(p) != 0)
            .min_by(|(_, a), (_, b)| a.area.total_cmp(&b.area))
            .map(|(k, _)| k)
    };

    if handling == PolyHoleHandling::ReturnHoles {
        for hole in holes {
            let Some(owner) = smallest_owner(hole.probe, None) else {
                return Err(PolyError::UnresolvedTopology { operation });
            };
            owned[owner].push(hole.contour);
        }
    }

    let mut polygons = Vec::with_capacity(outers.len());
    for (k, (outer, holes)) in outers.iter().zip(owned).enumerate() {
        if handling == PolyHoleHandling::WithoutHoles {
            if smallest_owner(outer.contour.edge(0).midpoint(), Some(k)).is_some() {
                continue;
            }
        }
        let mut contours = Vec::with_capacity(holes.len() + 1);
        contours.push(outer.contour.clone());
        contours.extend(holes);
        if !flags.same_dir_edge_legal {
            for c in &mut contours {
                merge_same_dir_edges(c, tol, true);
            }
        }
        polygons.push(Polygon::from_raw(contours, flags, true));
    }
    Ok(polygons)
}

/// Runs the engine on a single polygon.
pub(crate) fn regularize_raw<U: UserData>(
    polygon: &Polygon<U>,
    normalize: bool,
    options: &OperationOptions<'_>,
    operation: &'static str,
) -> Result<PolygonOutput<U>> {
    run_engine(
        &[Operand {
            polygon,
            normalize,
        }],
        Combine::Unary,
        options,
        operation,
    )
}

/// The polygon itself when flagged regularized, otherwise its
/// regularization.
pub(crate) fn keep_or_regularize<U: UserData>(
    polygon: &Polygon<U>,
    options: &OperationOptions<'_>,
    operation: &'static str,
) -> Result<PolygonOutput<U>> {
    if polygon.is_empty() {
        return Ok(PolygonOutput::empty());
    }
    if polygon.regularized {
        return Ok(PolygonOutput::same_as(polygon));
    }
    regularize_raw(polygon, true, options, operation)
}

/// Wraps the result of an in-memory edit: kept as is when still regular,
/// otherwise regularized with `options`.
pub(crate) fn finish_edit<U: UserData>(
    mut polygon: Polygon<U>,
    normalize: bool,
    options: &OperationOptions<'_>,
    operation: &'static str,
) -> Result<PolygonOutput<U>> {
    if polygon.is_empty() {
        return Ok(PolygonOutput::empty());
    }
    polygon.update_bounds();
    if polygon.is_regular(&options.tolerance) {
        polygon.regularized = true;
        return Ok(PolygonOutput::new(PolygonResult::NewPolygons, vec![polygon]));
    }
    polygon.regularized = false;
    let out = regularize_raw(&polygon, normalize, options, operation)?;
    Ok(PolygonOutput::new(PolygonResult::NewPolygons, out.into_polygons()))
}

impl<U: UserData> Polygon<U> {
    /// Regularizes with the default options: even-odd filling after
    /// orientation normalization.
    ///
    /// # Example
    ///
    /// ```
    /// use regpoly::polygon::PolygonResult;
    /// use regpoly::{Point2, Polygon};
    ///
    /// // A clockwise square
    /// let p: Polygon = Polygon::from_points(&[
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(0.0, 1.0),
    ///     Point2::new(1.0, 1.0),
    ///     Point2::new(1.0, 0.0),
    /// ])
    /// .unwrap();
    /// let out = p.regularize().unwrap();
    /// assert_eq!(out.result, PolygonResult::NewPolygons);
    /// assert!(out.polygons[0].contour_area(0).unwrap() > 0.0);
    /// ```
    pub fn regularize(&self) -> Result<PolygonOutput<U>> {
        self.regularize_with(&OperationOptions::default())
    }

    /// Regularizes with explicit options.
    ///
    /// Returns [`PolygonResult::ResultSameAsThis`] when the polygon already
    /// is regular, [`PolygonResult::EmptyPolygon`] when nothing is filled
    /// and [`PolygonResult::NewPolygons`] otherwise.
    pub fn regularize_with(&self, options: &OperationOptions<'_>) -> Result<PolygonOutput<U>> {
        if self.is_empty() {
            return Ok(PolygonOutput::empty());
        }
        let keeps_holes =
            options.holes == PolyHoleHandling::ReturnHoles || self.contour_count() == 1;
        if keeps_holes && (self.regularized || self.is_regular(&options.tolerance)) {
            let mut same = self.clone();
            same.regularized = true;
            return Ok(PolygonOutput::new(PolygonResult::ResultSameAsThis, vec![same]));
        }
        regularize_raw(self, true, options, "regularize")
    }

    /// Changes whether consecutive same-direction edges are legal and
    /// regularizes the result.
    pub fn set_same_dir_edge_legal_and_regularize(&self, legal: bool) -> Result<PolygonOutput<U>> {
        let mut p = self.clone();
        p.set_flags(Flags {
            same_dir_edge_legal: legal,
            ..p.flags
        });
        p.regularize()
    }

    /// Conservative regularity check.
    ///
    /// Returns `true` only if every contour is simple and correctly oriented,
    /// edges meet only at the vertex shared by neighbouring edges, holes lie
    /// inside the outer contour and not in each other, and (unless legal)
    /// no two neighbouring edges run in the same direction.
    pub fn is_regular(&self, tol: &Tolerance) -> bool {
        for (c, contour) in self.contours.iter().enumerate() {
            let n = contour.len();
            let arcs = contour.sweeps.iter().filter(|&&s| s != 0.0).count();
            if n < 2 || (n == 2 && arcs == 0) {
                return false;
            }
            if contour.sweeps.iter().any(|s| !s.is_finite() || s.abs() >= TAU - tol.angle) {
                return false;
            }
            if (0..n).any(|i| contour.points[i].coincides(contour.points[(i + 1) % n], tol.distance)) {
                return false;
            }
            let area = contour.signed_area();
            if (c == 0 && area <= 0.0) || (c > 0 && area >= 0.0) {
                return false;
            }
            if !self.flags.same_dir_edge_legal && has_same_dir_edges(contour, tol, true) {
                return false;
            }
        }

        let mut edges = Vec::with_capacity(self.vertex_count());
        for (c, contour) in self.contours.iter().enumerate() {
            for (i, e) in contour.edges().enumerate() {
                edges.push((c, i, e, e.bounding_box().inflated(tol.distance)));
            }
        }
        let mut order: Vec<usize> = (0..edges.len()).collect();
        order.sort_by(|&a, &b| edges[a].3.min.x.total_cmp(&edges[b].3.min.x));
        for (k, &i) in order.iter().enumerate() {
            for &j in &order[k + 1..] {
                let (ci, li, ei, bi) = edges[i];
                let (cj, lj, ej, bj) = edges[j];
                if bj.min.x > bi.max.x {
                    break;
                }
                if !bi.intersects(bj) {
                    continue;
                }
                let n = self.contours[ci].len();
                let shared: Vec<Point2<f64>> = if ci != cj {
                    Vec::new()
                } else {
                    let mut v = Vec::new();
                    if (li + 1) % n == lj {
                        v.push(ej.start());
                    }
                    if (lj + 1) % n == li {
                        v.push(ei.start());
                    }
                    v
                };
                let legal = intersect_edges(&ei, &ej, tol).iter().all(|hit| match hit {
                    EdgeHit::Point { point, .. } => {
                        shared.iter().any(|s| s.coincides(*point, tol.distance))
                    }
                    EdgeHit::Overlap { .. } => false,
                });
                if !legal {
                    return false;
                }
            }
        }

        for (c, hole) in self.contours.iter().enumerate().skip(1) {
            let probe = hole.edge(0).midpoint();
            if self.contours[0].winding_number(probe) == 0 {
                return false;
            }
            let nested = self
                .contours
                .iter()
                .enumerate()
                .skip(1)
                .any(|(h, other)| h != c && other.winding_number(probe) != 0);
            if nested {
                return false;
            }
        }
        true
    }

    /// Fails with [`PolyError::NotRegularized`] unless the polygon is
    /// flagged regularized.
    pub fn ensure_regularized(&self, operation: &'static str) -> Result<()> {
        if self.regularized {
            Ok(())
        } else {
            Err(PolyError::NotRegularized { operation })
        }
    }
}

/// Options used when an operation re-regularizes its own raw output:
/// positive winding without orientation normalization.
pub(crate) fn positive_options<'a>(options: &OperationOptions<'a>) -> OperationOptions<'a> {
    options.with_filling(FillingMethod::Positive)
}
