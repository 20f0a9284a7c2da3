//! Network simplex ranking (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! Start from the longest-path ranking, tighten it into a feasible spanning tree, then pivot:
//! a tree edge with a negative cut value leaves the tree and the non-tree edge with the least
//! slack across the same cut enters it. Tree state lives in flat per-node and per-edge arrays
//! (`low`, `lim`, `parent`, `cut`) indexed like the [`RankGraph`].

use super::RankGraph;
use super::feasible_tree::{TightTree, feasible_tree};
use super::util::longest_path;

/// Lower bound of the pivot budget; larger graphs get ten pivots per edge.
pub const SIMPLEX_MIN_ITERATIONS: usize = 1_000;

const CUT_EPSILON: f64 = 1e-9;

pub fn network_simplex(rg: &RankGraph) -> Vec<i32> {
    let mut ranks = longest_path(rg);
    if rg.node_count() <= 1 {
        return ranks;
    }
    let tree = feasible_tree(rg, &mut ranks);
    let mut simplex = Simplex::new(rg, tree);

    let budget = SIMPLEX_MIN_ITERATIONS.max(10 * rg.edges.len());
    let mut pivots = 0usize;
    while let Some(leaving) = simplex.leave_edge() {
        if pivots == budget {
            tracing::warn!(pivots, "rank: network simplex budget exhausted, keeping tight tree");
            break;
        }
        let Some(entering) = simplex.enter_edge(leaving, &ranks) else {
            break;
        };
        simplex.exchange(leaving, entering, &mut ranks);
        pivots += 1;
    }
    tracing::debug!(pivots, nodes = rg.node_count(), "rank: network simplex done");
    ranks
}

struct Simplex<'a> {
    rg: &'a RankGraph,
    tree: TightTree,
    low: Vec<usize>,
    lim: Vec<usize>,
    parent: Vec<Option<usize>>,
    parent_edge: Vec<Option<usize>>,
    /// Cut value per rank-graph edge; only tree edges carry a meaningful value.
    cut: Vec<f64>,
    preorder: Vec<usize>,
    postorder: Vec<usize>,
}

impl<'a> Simplex<'a> {
    fn new(rg: &'a RankGraph, tree: TightTree) -> Self {
        let n = rg.node_count();
        let mut s = Self {
            rg,
            tree,
            low: vec![0; n],
            lim: vec![0; n],
            parent: vec![None; n],
            parent_edge: vec![None; n],
            cut: vec![0.0; rg.edges.len()],
            preorder: Vec::with_capacity(n),
            postorder: Vec::with_capacity(n),
        };
        s.init_low_lim();
        s.init_cut_values();
        s
    }

    /// Post-order numbering: `lim` is a node's post-order number and `low` the smallest number
    /// in its subtree, so `u` lies under `v` iff `low[v] <= lim[u] <= lim[v]`.
    fn init_low_lim(&mut self) {
        let n = self.rg.node_count();
        let mut visited: Vec<bool> = vec![false; n];
        self.preorder.clear();
        self.postorder.clear();
        let mut next = 1usize;

        for &root in &self.tree.roots {
            visited[root] = true;
            self.parent[root] = None;
            self.parent_edge[root] = None;
            self.low[root] = next;
            self.preorder.push(root);
            let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
            while let Some(frame) = frames.last_mut() {
                let v = frame.0;
                if let Some(&e) = self.tree.adj[v].get(frame.1) {
                    frame.1 += 1;
                    let edge = &self.rg.edges[e];
                    let w = if edge.v == v { edge.w } else { edge.v };
                    if !visited[w] {
                        visited[w] = true;
                        self.parent[w] = Some(v);
                        self.parent_edge[w] = Some(e);
                        self.low[w] = next;
                        self.preorder.push(w);
                        frames.push((w, 0));
                    }
                    continue;
                }
                self.lim[v] = next;
                next += 1;
                self.postorder.push(v);
                frames.pop();
            }
        }
    }

    fn init_cut_values(&mut self) {
        for i in 0..self.postorder.len() {
            let v = self.postorder[i];
            if let Some(e) = self.parent_edge[v] {
                self.cut[e] = self.calc_cut_value(v);
            }
        }
    }

    /// Cut value of the tree edge between `child` and its parent. Assumes the cut values of all
    /// tree edges below `child` are already known.
    fn calc_cut_value(&self, child: usize) -> f64 {
        let (Some(parent), Some(tree_edge)) = (self.parent[child], self.parent_edge[child]) else {
            return 0.0;
        };
        let rg = self.rg;
        let child_is_tail = rg.edges[tree_edge].v == child;
        let mut cut = rg.edges[tree_edge].weight;

        for &e in rg.out_edges[child].iter().chain(&rg.in_edges[child]) {
            let edge = &rg.edges[e];
            let is_out = edge.v == child;
            let other = if is_out { edge.w } else { edge.v };
            if other == parent {
                continue;
            }
            let points_to_head = is_out == child_is_tail;
            cut += if points_to_head { edge.weight } else { -edge.weight };
            if self.tree.in_tree[e] {
                cut += if points_to_head { -self.cut[e] } else { self.cut[e] };
            }
        }
        cut
    }

    fn leave_edge(&self) -> Option<usize> {
        (0..self.rg.edges.len()).find(|&e| self.tree.in_tree[e] && self.cut[e] < -CUT_EPSILON)
    }

    /// The non-tree edge with minimum slack that reconnects the two halves left after removing
    /// `leaving`, oriented the same way across the cut.
    fn enter_edge(&self, leaving: usize, ranks: &[i32]) -> Option<usize> {
        let edge = &self.rg.edges[leaving];
        let (tail, flip) = if self.lim[edge.v] > self.lim[edge.w] {
            (edge.w, true)
        } else {
            (edge.v, false)
        };
        let under_tail = |u: usize| self.low[tail] <= self.lim[u] && self.lim[u] <= self.lim[tail];

        let mut best: Option<(usize, i32)> = None;
        for (e, candidate) in self.rg.edges.iter().enumerate() {
            if flip != under_tail(candidate.v) || flip == under_tail(candidate.w) {
                continue;
            }
            let slack = self.rg.slack(ranks, e);
            if best.is_none_or(|(_, s)| slack < s) {
                best = Some((e, slack));
            }
        }
        best.map(|(e, _)| e)
    }

    fn exchange(&mut self, leaving: usize, entering: usize, ranks: &mut [i32]) {
        self.tree.remove(self.rg, leaving);
        self.tree.insert(self.rg, entering);
        self.init_low_lim();
        self.init_cut_values();
        self.update_ranks(ranks);
    }

    fn update_ranks(&self, ranks: &mut [i32]) {
        for &v in &self.preorder {
            let (Some(p), Some(e)) = (self.parent[v], self.parent_edge[v]) else {
                continue;
            };
            let edge = &self.rg.edges[e];
            ranks[v] = if edge.v == v {
                ranks[p] - edge.minlen
            } else {
                ranks[p] + edge.minlen
            };
        }
    }
}

/// Sum of `weight * length` over all edges; the quantity network simplex minimizes.
pub fn total_span(rg: &RankGraph, ranks: &[i32]) -> f64 {
    rg.edges
        .iter()
        .map(|e| e.weight * f64::from(ranks[e.w] - ranks[e.v]))
        .sum()
}
