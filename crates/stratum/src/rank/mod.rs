//! Rank assignment (network simplex, tight tree, longest path).
//!
//! Ranking runs on the non-compound view of the working graph: nodes with children take no rank
//! and edges touching them are ignored. The view is copied into a [`RankGraph`], a dense
//! index-based multigraph simplification (parallel edges merged, weights summed, largest minlen
//! kept), and all rankers work on plain arrays from there.

pub mod feasible_tree;
pub mod network_simplex;
pub mod util;

use crate::LayoutGraph;
use crate::options::Ranker;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankEdge {
    pub v: usize,
    pub w: usize,
    pub minlen: i32,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RankGraph {
    pub ids: Vec<String>,
    pub edges: Vec<RankEdge>,
    pub out_edges: Vec<Vec<usize>>,
    pub in_edges: Vec<Vec<usize>>,
}

impl RankGraph {
    pub fn with_nodes(ids: Vec<String>) -> Self {
        let n = ids.len();
        Self {
            ids,
            edges: Vec::new(),
            out_edges: vec![Vec::new(); n],
            in_edges: vec![Vec::new(); n],
        }
    }

    /// Adds `v -> w`, merging into an existing edge between the same ordered pair.
    pub fn add_edge(&mut self, v: usize, w: usize, minlen: i32, weight: f64) {
        let existing = self.out_edges[v]
            .iter()
            .copied()
            .find(|&e| self.edges[e].w == w);
        if let Some(e) = existing {
            let edge = &mut self.edges[e];
            edge.weight += weight;
            edge.minlen = edge.minlen.max(minlen);
            return;
        }
        let e = self.edges.len();
        self.edges.push(RankEdge {
            v,
            w,
            minlen,
            weight,
        });
        self.out_edges[v].push(e);
        self.in_edges[w].push(e);
    }

    pub fn from_graph(g: &LayoutGraph) -> Self {
        let ids: Vec<String> = g
            .nodes()
            .filter(|v| !g.has_children(v))
            .map(String::from)
            .collect();
        let index: FxHashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, v)| (v.as_str(), i))
            .collect();
        let mut out = RankGraph::with_nodes(ids.clone());
        for e in g.edges() {
            if e.source == e.target {
                continue;
            }
            let (Some(&v), Some(&w)) = (index.get(e.source), index.get(e.target)) else {
                continue;
            };
            let minlen = i32::try_from(e.data.minlen).unwrap_or(i32::MAX);
            out.add_edge(v, w, minlen, e.data.weight);
        }
        out
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn slack(&self, ranks: &[i32], e: usize) -> i32 {
        let edge = &self.edges[e];
        ranks[edge.w] - ranks[edge.v] - edge.minlen
    }

    /// Nodes in topological order (Kahn, ties by index), or `None` on a cycle.
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let n = self.node_count();
        let mut indegree: Vec<usize> = self.in_edges.iter().map(Vec::len).collect();
        let mut queue: std::collections::VecDeque<usize> =
            (0..n).filter(|&v| indegree[v] == 0).collect();
        let mut out = Vec::with_capacity(n);
        while let Some(v) = queue.pop_front() {
            out.push(v);
            for &e in &self.out_edges[v] {
                let w = self.edges[e].w;
                indegree[w] -= 1;
                if indegree[w] == 0 {
                    queue.push_back(w);
                }
            }
        }
        (out.len() == n).then_some(out)
    }
}

/// Assigns `rank` to every non-compound node of `g`.
pub fn rank(g: &mut LayoutGraph, ranker: Ranker) {
    let rg = RankGraph::from_graph(g);
    let ranks = match ranker {
        Ranker::NetworkSimplex => network_simplex::network_simplex(&rg),
        Ranker::TightTree => {
            let mut ranks = util::longest_path(&rg);
            feasible_tree::feasible_tree(&rg, &mut ranks);
            ranks
        }
        Ranker::LongestPath => util::longest_path(&rg),
    };
    for (id, rank) in rg.ids.iter().zip(ranks) {
        if let Some(n) = g.node_mut(id) {
            n.rank = Some(rank);
        }
    }
}

/// Moves nodes with a requested `layer` onto it, as far as edge lengths allow.
///
/// `unit` is the number of internal ranks per visible layer. A pin never beats an edge lower
/// bound; everything downstream of a moved node is pushed down to keep every `minlen`.
pub fn apply_layer_pins(g: &mut LayoutGraph, unit: usize) {
    if !g.iter_nodes().any(|(_, n)| n.layer.is_some()) {
        return;
    }
    let rg = RankGraph::from_graph(g);
    let mut ranks: Vec<i32> = rg
        .ids
        .iter()
        .map(|id| g.node(id).and_then(|n| n.rank).unwrap_or(0))
        .collect();
    let base = rg
        .ids
        .iter()
        .zip(&ranks)
        .filter(|(id, _)| g.node(id).is_some_and(|n| !n.is_dummy()))
        .map(|(_, &r)| r)
        .min()
        .unwrap_or(0);
    let Some(order) = rg.topological_order() else {
        tracing::warn!("rank: layer pins skipped, ranking graph is cyclic");
        return;
    };

    // Pins past the node count would only add empty layers.
    let deepest = i32::try_from(rg.node_count()).unwrap_or(i32::MAX);
    let unit = i32::try_from(unit).unwrap_or(i32::MAX);
    let mut pinned = 0usize;
    for v in order {
        let lower = rg.in_edges[v]
            .iter()
            .map(|&e| ranks[rg.edges[e].v].saturating_add(rg.edges[e].minlen))
            .max();
        let wanted = match g.node(&rg.ids[v]).and_then(|n| n.layer) {
            Some(layer) => {
                pinned += 1;
                let layer = i32::try_from(layer).unwrap_or(i32::MAX).min(deepest);
                base.saturating_add(layer.saturating_mul(unit))
            }
            None => ranks[v],
        };
        ranks[v] = lower.map_or(wanted, |lower| wanted.max(lower));
    }

    for (id, rank) in rg.ids.iter().zip(ranks) {
        if let Some(n) = g.node_mut(id) {
            n.rank = Some(rank);
        }
    }
    tracing::debug!(pinned, "rank: applied layer pins");
}
