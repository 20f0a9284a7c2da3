//! Brandes & Köpf horizontal coordinate assignment.
//!
//! Four alignments (up/down × left/right) each line nodes up into vertical blocks along median
//! neighbours, avoiding marked conflicts, then compact the blocks against each other. The
//! narrowest alignment becomes the reference the others are shifted onto, and the final x is the
//! average of the two middle candidates (or a single requested alignment).
//!
//! Everything runs on dense node indices built from the current layer matrix.

use crate::LayoutGraph;
use crate::model::{BorderSide, LabelPos};
use crate::options::{Align, LayoutOptions};
use crate::util::build_layer_matrix;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

pub type Conflicts = FxHashSet<(usize, usize)>;

/// Layer matrix plus the per-node data positioning needs.
#[derive(Debug, Clone, Default)]
pub struct Layering {
    pub ids: Vec<String>,
    pub layers: Vec<Vec<usize>>,
    pub order: Vec<usize>,
    pub preds: Vec<Vec<usize>>,
    pub succs: Vec<Vec<usize>>,
    pub dummy: Vec<bool>,
    pub border: Vec<Option<BorderSide>>,
    pub width: Vec<f64>,
    /// Resolved `nodesep` for real nodes, `edgesep` for dummies.
    pub sep: Vec<f64>,
    pub labelpos: Vec<Option<LabelPos>>,
}

impl Layering {
    pub fn from_graph(g: &LayoutGraph, opts: &LayoutOptions) -> Self {
        let matrix = build_layer_matrix(g);
        let mut out = Layering::default();
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();

        for layer in &matrix {
            let mut ids: Vec<usize> = Vec::with_capacity(layer.len());
            for (i, id) in layer.iter().enumerate() {
                let Some(n) = g.node(id) else {
                    continue;
                };
                let v = out.ids.len();
                index.insert(id.as_str(), v);
                out.ids.push(id.clone());
                out.order.push(i);
                out.dummy.push(n.is_dummy());
                out.border.push(n.border_side);
                out.width.push(n.width);
                out.sep.push(if n.is_dummy() {
                    opts.edgesep
                } else {
                    opts.nodesep.resolve(id, n)
                });
                out.labelpos.push(n.labelpos);
                ids.push(v);
            }
            out.layers.push(ids);
        }

        out.preds = vec![Vec::new(); out.ids.len()];
        out.succs = vec![Vec::new(); out.ids.len()];
        for e in g.edges() {
            let (Some(&v), Some(&w)) = (index.get(e.source), index.get(e.target)) else {
                continue;
            };
            if !out.succs[v].contains(&w) {
                out.succs[v].push(w);
                out.preds[w].push(v);
            }
        }
        out
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// The dummy predecessor of a dummy node, i.e. the other end of an inner segment.
    fn inner_segment_pred(&self, v: usize) -> Option<usize> {
        if !self.dummy[v] {
            return None;
        }
        self.preds[v].iter().copied().find(|&u| self.dummy[u])
    }
}

fn add_conflict(conflicts: &mut Conflicts, v: usize, w: usize) {
    conflicts.insert((v.min(w), v.max(w)));
}

pub fn has_conflict(conflicts: &Conflicts, v: usize, w: usize) -> bool {
    conflicts.contains(&(v.min(w), v.max(w)))
}

/// Type-1 conflicts: a non-inner segment crossing an inner segment (one between two dummies).
/// Inner segments win, so the other edge is marked.
pub fn find_type1_conflicts(lg: &Layering) -> Conflicts {
    let mut conflicts = Conflicts::default();
    for pair in lg.layers.windows(2) {
        let (prev, layer) = (&pair[0], &pair[1]);
        let mut k0 = 0usize;
        let mut scan_pos = 0usize;

        for (idx, &v) in layer.iter().enumerate() {
            let w = lg.inner_segment_pred(v);
            let k1 = w.map_or(prev.len(), |w| lg.order[w]);
            if w.is_none() && idx + 1 != layer.len() {
                continue;
            }
            for &scan in &layer[scan_pos..=idx] {
                for &u in &lg.preds[scan] {
                    let u_pos = lg.order[u];
                    if (u_pos < k0 || k1 < u_pos) && !(lg.dummy[u] && lg.dummy[scan]) {
                        add_conflict(&mut conflicts, u, scan);
                    }
                }
            }
            scan_pos = idx + 1;
            k0 = k1;
        }
    }
    conflicts
}

/// Type-2 conflicts: inner segments crossing subgraph border segments. A missing bound means
/// nothing is out of range on that side.
pub fn find_type2_conflicts(lg: &Layering) -> Conflicts {
    let mut conflicts = Conflicts::default();
    for pair in lg.layers.windows(2) {
        let (north, south) = (&pair[0], &pair[1]);
        let mut prev_north: Option<usize> = None;
        let mut next_north: Option<usize> = None;
        let mut south_pos = 0usize;

        for (lookahead, &v) in south.iter().enumerate() {
            if lg.border[v].is_some() {
                if let Some(&u) = lg.preds[v].first() {
                    next_north = Some(lg.order[u]);
                    let range = &south[south_pos..lookahead];
                    scan_type2(lg, &mut conflicts, range, prev_north, next_north);
                    south_pos = lookahead;
                    prev_north = next_north;
                }
            }
            let range = &south[south_pos..];
            scan_type2(lg, &mut conflicts, range, next_north, Some(north.len()));
        }
    }
    conflicts
}

fn scan_type2(
    lg: &Layering,
    conflicts: &mut Conflicts,
    south: &[usize],
    lower: Option<usize>,
    upper: Option<usize>,
) {
    for &v in south {
        if !lg.dummy[v] {
            continue;
        }
        for &u in &lg.preds[v] {
            let order = lg.order[u];
            let outside = lower.is_some_and(|l| order < l) || upper.is_some_and(|h| order > h);
            if lg.dummy[u] && outside {
                add_conflict(conflicts, u, v);
            }
        }
    }
}

/// Block structure of one alignment: `root[v]` is the top of v's block and `align[v]` the next
/// node down the block (cyclic back to the root).
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub root: Vec<usize>,
    pub align: Vec<usize>,
}

/// Aligns every node with its median neighbour(s) in the previous layer of `layers`, left to
/// right, never crossing an earlier alignment or a marked conflict.
pub fn vertical_alignment(
    lg: &Layering,
    layers: &[Vec<usize>],
    conflicts: &Conflicts,
    neighbours: &[Vec<usize>],
) -> Alignment {
    let n = lg.node_count();
    let mut root: Vec<usize> = (0..n).collect();
    let mut align: Vec<usize> = (0..n).collect();
    let mut pos: Vec<usize> = vec![0; n];
    for layer in layers {
        for (i, &v) in layer.iter().enumerate() {
            pos[v] = i;
        }
    }

    for layer in layers {
        let mut prev_idx: Option<usize> = None;
        for &v in layer {
            let mut ws = neighbours[v].clone();
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|&w| pos[w]);
            let lo = (ws.len() - 1) / 2;
            let hi = ws.len() / 2;
            for &w in &ws[lo..=hi] {
                if align[v] == v
                    && prev_idx.is_none_or(|p| p < pos[w])
                    && !has_conflict(conflicts, v, w)
                {
                    align[w] = v;
                    root[v] = root[w];
                    align[v] = root[v];
                    prev_idx = Some(pos[w]);
                }
            }
        }
    }
    Alignment { root, align }
}

/// Minimum distance between the centers of `v` and its left neighbour `u`.
fn separation(lg: &Layering, v: usize, u: usize, reverse: bool) -> f64 {
    let shift = |node: usize, towards_right: bool| -> f64 {
        let half = lg.width[node] / 2.0;
        let delta = match lg.labelpos[node] {
            Some(LabelPos::L) => -half,
            Some(LabelPos::R) => half,
            _ => 0.0,
        };
        let delta = if towards_right { delta } else { -delta };
        if reverse { delta } else { -delta }
    };
    lg.width[v] / 2.0
        + shift(v, true)
        + lg.sep[v] / 2.0
        + lg.sep[u] / 2.0
        + lg.width[u] / 2.0
        + shift(u, false)
}

/// Places every block as far left as the separations allow, then pulls blocks right towards
/// their successors where there is slack. Blocks rooted on the outer border side stay put in the
/// second pass so subgraph boxes do not spread.
pub fn horizontal_compaction(
    lg: &Layering,
    layers: &[Vec<usize>],
    alignment: &Alignment,
    reverse: bool,
) -> Vec<f64> {
    let n = lg.node_count();
    let root = &alignment.root;

    let mut weights: FxHashMap<(usize, usize), f64> = FxHashMap::default();
    let mut block_edges: Vec<(usize, usize)> = Vec::new();
    for layer in layers {
        for pair in layer.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            let key = (root[u], root[v]);
            let sep = separation(lg, v, u, reverse);
            match weights.get_mut(&key) {
                Some(w) => *w = w.max(sep),
                None => {
                    weights.insert(key, sep);
                    block_edges.push(key);
                }
            }
        }
    }

    let mut in_edges: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    let mut out_edges: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for &(u, v) in &block_edges {
        let w = weights[&(u, v)];
        out_edges[u].push((v, w));
        in_edges[v].push((u, w));
    }

    let blocks: Vec<usize> = (0..n).filter(|&v| root[v] == v).collect();
    let topo = block_order(&blocks, &in_edges, &out_edges);

    let mut xs: Vec<f64> = vec![0.0; n];
    for &b in &topo {
        xs[b] = in_edges[b]
            .iter()
            .map(|&(u, w)| xs[u] + w)
            .fold(0.0, f64::max);
    }
    let pinned_side = if reverse {
        BorderSide::Left
    } else {
        BorderSide::Right
    };
    for &b in topo.iter().rev() {
        let min = out_edges[b]
            .iter()
            .map(|&(w, sep)| xs[w] - sep)
            .fold(f64::INFINITY, f64::min);
        if min.is_finite() && lg.border[b] != Some(pinned_side) {
            xs[b] = xs[b].max(min);
        }
    }

    (0..n).map(|v| xs[root[v]]).collect()
}

/// Kahn order of the block graph; anything left on a cycle follows in index order.
fn block_order(
    blocks: &[usize],
    in_edges: &[Vec<(usize, f64)>],
    out_edges: &[Vec<(usize, f64)>],
) -> Vec<usize> {
    let mut indegree: Vec<usize> = in_edges.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> =
        blocks.iter().copied().filter(|&b| indegree[b] == 0).collect();
    let mut out: Vec<usize> = Vec::with_capacity(blocks.len());
    let mut placed: Vec<bool> = vec![false; in_edges.len()];
    while let Some(b) = queue.pop_front() {
        out.push(b);
        placed[b] = true;
        for &(w, _) in &out_edges[b] {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }
    if out.len() < blocks.len() {
        tracing::warn!("position: block graph has a cycle, falling back to index order");
        out.extend(blocks.iter().copied().filter(|&b| !placed[b]));
    }
    out
}

fn extent(lg: &Layering, xs: &[f64]) -> (f64, f64) {
    xs.iter()
        .enumerate()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (v, &x)| {
            let half = lg.width[v] / 2.0;
            (lo.min(x - half), hi.max(x + half))
        })
}

/// The alignment whose drawing is narrowest; ties keep the earlier one in `Align::ALL` order.
pub fn find_smallest_width_alignment(lg: &Layering, xss: &[(Align, Vec<f64>)]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, (_, xs)) in xss.iter().enumerate() {
        let (lo, hi) = extent(lg, xs);
        let width = hi - lo;
        if best.is_none_or(|(_, w)| width < w) {
            best = Some((i, width));
        }
    }
    best.map(|(i, _)| i)
}

/// Shifts every alignment onto the reference: left alignments share its minimum, right ones its
/// maximum.
pub fn align_coordinates(xss: &mut [(Align, Vec<f64>)], reference: usize) {
    let min_of = |xs: &[f64]| xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max_of = |xs: &[f64]| xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let target_min = min_of(&xss[reference].1);
    let target_max = max_of(&xss[reference].1);

    for (align, xs) in xss.iter_mut() {
        let delta = if align.is_left() {
            target_min - min_of(xs)
        } else {
            target_max - max_of(xs)
        };
        if delta != 0.0 && delta.is_finite() {
            for x in xs.iter_mut() {
                *x += delta;
            }
        }
    }
}

pub fn balance(xss: &[(Align, Vec<f64>)], align: Option<Align>, n: usize) -> Vec<f64> {
    if let Some(align) = align {
        if let Some((_, xs)) = xss.iter().find(|(a, _)| *a == align) {
            return xs.clone();
        }
    }
    (0..n)
        .map(|v| {
            let mut vals: Vec<f64> = xss.iter().map(|(_, xs)| xs[v]).collect();
            vals.sort_by(f64::total_cmp);
            match vals.len() {
                0 => 0.0,
                len if len >= 4 => (vals[1] + vals[2]) / 2.0,
                len => vals[len / 2],
            }
        })
        .collect()
}

/// x coordinate of every ranked node, keyed by id.
pub fn position_x(g: &LayoutGraph, opts: &LayoutOptions) -> FxHashMap<String, f64> {
    let lg = Layering::from_graph(g, opts);
    let n = lg.node_count();
    if n == 0 {
        return FxHashMap::default();
    }

    let xs = if opts.straighten {
        let mut conflicts = find_type1_conflicts(&lg);
        conflicts.extend(find_type2_conflicts(&lg));

        let mut xss: Vec<(Align, Vec<f64>)> = Vec::with_capacity(4);
        for align in Align::ALL {
            let mut layers: Vec<Vec<usize>> = if align.is_up() {
                lg.layers.clone()
            } else {
                lg.layers.iter().rev().cloned().collect()
            };
            if !align.is_left() {
                for layer in &mut layers {
                    layer.reverse();
                }
            }
            let neighbours = if align.is_up() { &lg.preds } else { &lg.succs };
            let alignment = vertical_alignment(&lg, &layers, &conflicts, neighbours);
            let mut xs = horizontal_compaction(&lg, &layers, &alignment, !align.is_left());
            if !align.is_left() {
                for x in &mut xs {
                    *x = -*x;
                }
            }
            xss.push((align, xs));
        }

        if let Some(reference) = find_smallest_width_alignment(&lg, &xss) {
            align_coordinates(&mut xss, reference);
        }
        balance(&xss, opts.align, n)
    } else {
        let alignment = Alignment {
            root: (0..n).collect(),
            align: (0..n).collect(),
        };
        horizontal_compaction(&lg, &lg.layers, &alignment, false)
    };

    lg.ids.into_iter().zip(xs).collect()
}
