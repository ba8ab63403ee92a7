//! Planar arrangement of operand edges.
//!
//! Every source edge is split at its intersections with every other edge,
//! the split points are welded into shared nodes, and the resulting pieces
//! are classified against the result region and traced into closed loops.

use super::core::{Polygon, UserData};
use super::edge::Edge;
use super::options::OperationOptions;
use super::winding::WindingField;
use crate::bounds::Aabb2;
use crate::error::Result;
use crate::tolerance::{intersect_edges, EdgeHit, NodeWelder};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::f64::consts::TAU;

/// One input polygon of the engine.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Operand<'a, U: UserData> {
    pub(crate) polygon: &'a Polygon<U>,
    /// Treat the outer contour as positive and holes as negative.
    pub(crate) normalize: bool,
}

/// An edge of one of the operands.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceEdge {
    pub(crate) operand: usize,
    pub(crate) contour: usize,
    pub(crate) local: usize,
    pub(crate) edge: Edge,
}

/// A stretch of a source edge between two consecutive nodes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Piece {
    pub(crate) edge: Edge,
    pub(crate) from: usize,
    pub(crate) to: usize,
    pub(crate) source: usize,
    /// Source edge parameter at `from`.
    pub(crate) t0: f64,
    /// Source edge parameter at `to`.
    pub(crate) t1: f64,
    /// Runs against its source edge.
    pub(crate) reversed: bool,
}

impl Piece {
    fn reverse(&self) -> Self {
        Self {
            edge: self.edge.reversed(),
            from: self.to,
            to: self.from,
            source: self.source,
            t0: self.t1,
            t1: self.t0,
            reversed: !self.reversed,
        }
    }
}

/// What classification decided for one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PieceFate {
    /// Same fill state on both sides.
    Dropped,
    /// Part of the result boundary.
    Kept { reversed: bool },
    /// Coincides with an earlier kept piece.
    Duplicate { reversed: bool },
}

#[derive(Debug)]
pub(crate) struct Arrangement {
    pub(crate) sources: Vec<SourceEdge>,
    pub(crate) welder: NodeWelder,
    pub(crate) pieces: Vec<Piece>,
    pub(crate) bbox: Option<Aabb2<f64>>,
}

impl Arrangement {
    /// Splits every operand edge at all intersections.
    ///
    /// Original vertices are welded first so that they stay exact; the abort
    /// hook is polled once per outer intersection iteration.
    pub(crate) fn build<U: UserData>(
        operands: &[Operand<'_, U>],
        options: &OperationOptions<'_>,
        operation: &'static str,
    ) -> Result<Self> {
        let tol = options.tolerance;
        let mut sources = Vec::new();
        let mut welder = NodeWelder::new(tol.distance);
        let mut bbox: Option<Aabb2<f64>> = None;
        for (o, op) in operands.iter().enumerate() {
            if let Some(b) = op.polygon.bounding_box() {
                bbox = Some(bbox.map_or(b, |a| a.union(b)));
            }
            for (c, contour) in op.polygon.contours.iter().enumerate() {
                for (local, edge) in contour.edges().enumerate() {
                    welder.insert(edge.start());
                    sources.push(SourceEdge {
                        operand: o,
                        contour: c,
                        local,
                        edge,
                    });
                }
            }
        }

        let boxes: Vec<Aabb2<f64>> = sources
            .iter()
            .map(|s| s.edge.bounding_box().inflated(tol.distance))
            .collect();
        let mut order: Vec<usize> = (0..sources.len()).collect();
        order.sort_by(|&a, &b| boxes[a].min.x.total_cmp(&boxes[b].min.x));

        let mut params: Vec<Vec<f64>> = vec![vec![0.0, 1.0]; sources.len()];
        let mut hit_count = 0usize;
        for (k, &i) in order.iter().enumerate() {
            options.check_abort(operation)?;
            for &j in &order[k + 1..] {
                if boxes[j].min.x > boxes[i].max.x {
                    break;
                }
                if !boxes[i].intersects(boxes[j]) {
                    continue;
                }
                for hit in intersect_edges(&sources[i].edge, &sources[j].edge, &tol) {
                    hit_count += 1;
                    match hit {
                        EdgeHit::Point { t1, t2, .. } => {
                            params[i].push(t1);
                            params[j].push(t2);
                        }
                        EdgeHit::Overlap { t1, t2 } => {
                            params[i].extend([t1.0, t1.1]);
                            params[j].extend([t2.0, t2.1]);
                        }
                    }
                }
            }
        }

        let mut pieces = Vec::new();
        for (s, src) in sources.iter().enumerate() {
            let ts = &mut params[s];
            for t in ts.iter_mut() {
                *t = t.clamp(0.0, 1.0);
            }
            ts.sort_by(f64::total_cmp);

            let mut stops: Vec<(f64, usize)> = Vec::with_capacity(ts.len());
            for &t in ts.iter() {
                let p = if t == 0.0 {
                    src.edge.start()
                } else if t == 1.0 {
                    src.edge.end()
                } else {
                    src.edge.point_at(t)
                };
                let id = welder.insert(p);
                match stops.last_mut() {
                    Some(last) if last.1 == id => {
                        if t == 1.0 {
                            last.0 = 1.0;
                        }
                    }
                    _ => stops.push((t, id)),
                }
            }

            for w in stops.windows(2) {
                let ((ta, a), (tb, b)) = (w[0], w[1]);
                let sweep = src.edge.sub_edge(ta, tb).sweep();
                pieces.push(Piece {
                    edge: Edge::from_sweep(welder.node(a), welder.node(b), sweep),
                    from: a,
                    to: b,
                    source: s,
                    t0: ta,
                    t1: tb,
                    reversed: false,
                });
            }
        }

        log::debug!(
            "{operation}: {} source edges, {hit_count} hits, {} nodes, {} pieces",
            sources.len(),
            welder.len(),
            pieces.len()
        );
        Ok(Self {
            sources,
            welder,
            pieces,
            bbox,
        })
    }

    /// Keeps the pieces that separate filled from unfilled space, oriented
    /// with the filled side on their left, and merges coincident ones.
    ///
    /// Returns the kept pieces and the fate of every piece. The abort hook
    /// is polled once per classified piece.
    pub(crate) fn classify(
        &self,
        field: &WindingField,
        options: &OperationOptions<'_>,
        operation: &'static str,
    ) -> Result<(Vec<Piece>, Vec<PieceFate>)> {
        let eps = options.tolerance.distance;
        let scale = self
            .bbox
            .map_or(0.0, |b| b.diagonal().magnitude());
        let delta = (4.0 * eps).max(1e-9 * scale);

        let mut kept: Vec<Piece> = Vec::new();
        let mut fates = Vec::with_capacity(self.pieces.len());
        let mut by_ends: HashMap<(usize, usize), Vec<usize>> = HashMap::new();

        for piece in &self.pieces {
            options.check_abort(operation)?;
            let mid = piece.edge.midpoint();
            let normal = piece.edge.tangent_at(0.5).perpendicular();
            let d = delta.min(0.25 * piece.edge.length());
            let left = field.is_filled(mid + normal * d);
            let right = field.is_filled(mid - normal * d);
            if left == right {
                fates.push(PieceFate::Dropped);
                continue;
            }
            let oriented = if left { *piece } else { piece.reverse() };
            let reversed = !left;

            let slot = by_ends.entry((oriented.from, oriented.to)).or_default();
            let duplicate = slot
                .iter()
                .any(|&k| kept[k].edge.midpoint().coincides(mid, 4.0 * eps));
            if duplicate {
                fates.push(PieceFate::Duplicate { reversed });
            } else {
                slot.push(kept.len());
                kept.push(oriented);
                fates.push(PieceFate::Kept { reversed });
            }
        }
        log::debug!("{operation}: kept {} of {} pieces", kept.len(), self.pieces.len());
        Ok((kept, fates))
    }
}

/// Ordering key of a candidate outgoing piece: clockwise turn from the
/// reversed incoming direction, then curvature (higher is tighter).
fn turn_key(incoming: &Piece, candidate: &Piece) -> (f64, f64) {
    let back = -incoming.edge.tangent_at(1.0);
    let out = candidate.edge.tangent_at(0.0);
    let mut cw = -back.signed_angle_to(out);
    if cw < 0.0 {
        cw += TAU;
    }
    if cw <= 1e-12 {
        cw = TAU;
    }
    (cw, candidate.edge.curvature())
}

fn compare_turns(a: (f64, f64), b: (f64, f64)) -> Ordering {
    if (a.0 - b.0).abs() > 1e-9 {
        a.0.total_cmp(&b.0)
    } else {
        b.1.total_cmp(&a.1)
    }
}

/// Splits a closed walk into simple loops wherever it revisits a node.
fn split_walk(walk: &[usize], pieces: &[Piece]) -> Vec<Vec<usize>> {
    let mut loops = Vec::new();
    let mut stack: Vec<usize> = Vec::with_capacity(walk.len());
    let mut seen: HashMap<usize, usize> = HashMap::new();
    for &p in walk {
        seen.insert(pieces[p].from, stack.len());
        stack.push(p);
        if let Some(&s) = seen.get(&pieces[p].to) {
            let lp: Vec<usize> = stack.drain(s..).collect();
            for q in &lp {
                seen.remove(&pieces[*q].from);
            }
            loops.push(lp);
        }
    }
    loops
}

/// Traces the kept pieces into closed simple loops, always taking the
/// tightest left turn at a node.
///
/// Each loop is rotated to start at its piece with the smallest source key.
pub(crate) fn trace_loops(pieces: &[Piece], node_count: usize) -> Vec<Vec<usize>> {
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (i, p) in pieces.iter().enumerate() {
        outgoing[p.from].push(i);
    }

    let mut used = vec![false; pieces.len()];
    let mut loops = Vec::new();
    for start in 0..pieces.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut walk = vec![start];
        let mut current = start;
        let mut closed = false;
        for _ in 0..pieces.len() {
            let node = pieces[current].to;
            let next = outgoing[node]
                .iter()
                .copied()
                .filter(|&c| !used[c] || c == start)
                .min_by(|&a, &b| {
                    compare_turns(
                        turn_key(&pieces[current], &pieces[a]),
                        turn_key(&pieces[current], &pieces[b]),
                    )
                });
            match next {
                Some(c) if c == start => {
                    closed = true;
                    break;
                }
                Some(c) => {
                    log::trace!("node {node}: piece {current} -> {c}");
                    used[c] = true;
                    walk.push(c);
                    current = c;
                }
                None => break,
            }
        }
        if !closed {
            log::warn!("dropping open boundary walk of {} pieces", walk.len());
            continue;
        }
        for mut lp in split_walk(&walk, pieces) {
            let first = lp
                .iter()
                .enumerate()
                .min_by(|(_, &a), (_, &b)| {
                    let (pa, pb) = (&pieces[a], &pieces[b]);
                    pa.source
                        .cmp(&pb.source)
                        .then(pa.t0.total_cmp(&pb.t0))
                })
                .map_or(0, |(k, _)| k);
            lp.rotate_left(first);
            loops.push(lp);
        }
    }
    loops
}
