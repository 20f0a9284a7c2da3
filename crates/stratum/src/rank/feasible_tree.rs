//! Feasible tight spanning tree.
//!
//! Starting from a feasible ranking, grow a tree of tight edges (slack 0) from the first node.
//! While the tree does not span its component, the edge with the smallest slack leaving the tree
//! is made tight by shifting every tree node's rank, which keeps the ranking feasible. A
//! disconnected graph yields one tree per component.

use super::RankGraph;

#[derive(Debug, Clone, PartialEq)]
pub struct TightTree {
    /// Per edge of the rank graph: does it belong to the tree.
    pub in_tree: Vec<bool>,
    /// Per node: incident tree edges.
    pub adj: Vec<Vec<usize>>,
    /// First node of every component's tree.
    pub roots: Vec<usize>,
}

impl TightTree {
    pub fn edge_count(&self) -> usize {
        self.in_tree.iter().filter(|&&t| t).count()
    }

    fn add(&mut self, rg: &RankGraph, e: usize) {
        self.in_tree[e] = true;
        self.adj[rg.edges[e].v].push(e);
        self.adj[rg.edges[e].w].push(e);
    }

    pub(crate) fn remove(&mut self, rg: &RankGraph, e: usize) {
        self.in_tree[e] = false;
        self.adj[rg.edges[e].v].retain(|&x| x != e);
        self.adj[rg.edges[e].w].retain(|&x| x != e);
    }

    pub(crate) fn insert(&mut self, rg: &RankGraph, e: usize) {
        self.add(rg, e);
    }
}

pub fn feasible_tree(rg: &RankGraph, ranks: &mut [i32]) -> TightTree {
    let n = rg.node_count();
    let mut tree = TightTree {
        in_tree: vec![false; rg.edges.len()],
        adj: vec![Vec::new(); n],
        roots: Vec::new(),
    };
    let mut member: Vec<bool> = vec![false; n];
    let mut covered = 0usize;
    let mut component: Vec<usize> = Vec::new();

    while covered < n {
        if component.is_empty() {
            let Some(root) = (0..n).find(|&v| !member[v]) else {
                break;
            };
            member[root] = true;
            component.push(root);
            tree.roots.push(root);
            covered += 1;
        }

        covered += grow_tight(rg, ranks, &mut tree, &mut member, &mut component);
        if covered == n {
            break;
        }

        let mut best: Option<(usize, i32)> = None;
        for e in 0..rg.edges.len() {
            let edge = &rg.edges[e];
            if member[edge.v] == member[edge.w] {
                continue;
            }
            let slack = rg.slack(ranks, e);
            if best.is_none_or(|(_, s)| slack < s) {
                best = Some((e, slack));
            }
        }

        match best {
            Some((e, slack)) => {
                let delta = if member[rg.edges[e].v] { slack } else { -slack };
                for &v in &component {
                    ranks[v] += delta;
                }
            }
            // This component is spanned; the next round starts another one.
            None => component.clear(),
        }
    }
    tree
}

/// Adds every node reachable from the tree through tight edges. Returns how many were added.
fn grow_tight(
    rg: &RankGraph,
    ranks: &[i32],
    tree: &mut TightTree,
    member: &mut [bool],
    component: &mut Vec<usize>,
) -> usize {
    let mut added = 0;
    let mut stack: Vec<usize> = component.iter().rev().copied().collect();
    while let Some(v) = stack.pop() {
        for &e in rg.out_edges[v].iter().chain(&rg.in_edges[v]) {
            let edge = &rg.edges[e];
            let other = if edge.v == v { edge.w } else { edge.v };
            if member[other] || rg.slack(ranks, e) != 0 {
                continue;
            }
            member[other] = true;
            component.push(other);
            tree.add(rg, e);
            stack.push(other);
            added += 1;
        }
    }
    added
}
