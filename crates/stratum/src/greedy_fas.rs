//! Greedy feedback arc set (FAS) selection.
//!
//! Eades, Lin and Smyth's heuristic: nodes are peeled off the graph into a sequence, sinks to the
//! back and sources to the front, and otherwise the node with the largest weighted
//! `out - in` differential. The edges pointing backwards in that sequence form the FAS.
//! Differentials key an ordered map of queues, so weights of any size cost no extra memory.
//! Parallel edges are aggregated by weight while choosing; every concrete edge of a chosen pair is
//! returned. Self-loops never take part.

use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use stratum_graph::Graph;

pub fn greedy_fas<N, E>(g: &Graph<N, E>) -> Vec<String> {
    greedy_fas_with_weight(g, |_| 1.0)
}

/// Like [`greedy_fas`], with per-edge weights. Negative and non-finite weights count as zero.
/// Sources and sinks are found by their remaining edges, whatever those weigh.
pub fn greedy_fas_with_weight<N, E>(
    g: &Graph<N, E>,
    weight_fn: impl Fn(&E) -> f64,
) -> Vec<String> {
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let ids: Vec<&str> = g.nodes().collect();
    let index: FxHashMap<&str, usize> = ids.iter().enumerate().map(|(i, v)| (*v, i)).collect();
    let n = ids.len();

    // Aggregated simple graph, pairs in first-occurrence order.
    let mut pair_index: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
    for e in g.edges() {
        if e.source == e.target {
            continue;
        }
        let (Some(&v), Some(&w)) = (index.get(e.source), index.get(e.target)) else {
            continue;
        };
        let weight = weight_fn(e.data);
        let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        match pair_index.get(&(v, w)) {
            Some(&p) => pairs[p].2 += weight,
            None => {
                pair_index.insert((v, w), pairs.len());
                pairs.push((v, w, weight));
            }
        }
    }

    let mut out_adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut state = FasState {
        sinks: VecDeque::new(),
        sources: VecDeque::new(),
        buckets: BTreeMap::new(),
        stamp: vec![0; n],
        alive: vec![true; n],
        in_deg: vec![0; n],
        out_deg: vec![0; n],
        in_w: vec![0.0; n],
        out_w: vec![0.0; n],
    };
    for (p, &(v, w, weight)) in pairs.iter().enumerate() {
        out_adj[v].push(p);
        in_adj[w].push(p);
        state.out_deg[v] += 1;
        state.in_deg[w] += 1;
        state.out_w[v] += weight;
        state.in_w[w] += weight;
    }
    for v in 0..n {
        state.enqueue(v);
    }

    let mut feedback: Vec<usize> = Vec::new();
    loop {
        while let Some(v) = FasState::pop(&mut state.sinks, &state.alive, &state.stamp) {
            state.remove(v, &pairs, &out_adj, &in_adj);
        }
        while let Some(v) = FasState::pop(&mut state.sources, &state.alive, &state.stamp) {
            state.remove(v, &pairs, &out_adj, &in_adj);
        }
        let Some(v) = state.pop_max() else {
            break;
        };
        feedback.extend(
            in_adj[v]
                .iter()
                .copied()
                .filter(|&p| state.alive[pairs[p].0]),
        );
        state.remove(v, &pairs, &out_adj, &in_adj);
    }

    let mut out: Vec<String> = Vec::new();
    for p in feedback {
        let (v, w, _) = pairs[p];
        out.extend(g.edges_between(ids[v], ids[w]).into_iter().map(String::from));
    }
    out
}

/// Bucket key: a node's weighted `out - in` differential.
#[derive(Debug, Clone, Copy)]
struct Delta(f64);

impl PartialEq for Delta {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Delta {}

impl PartialOrd for Delta {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Delta {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Queues hold `(node, stamp)`; an entry is stale once the node's stamp moves on.
struct FasState {
    sinks: VecDeque<(usize, u32)>,
    sources: VecDeque<(usize, u32)>,
    buckets: BTreeMap<Delta, VecDeque<(usize, u32)>>,
    stamp: Vec<u32>,
    alive: Vec<bool>,
    in_deg: Vec<usize>,
    out_deg: Vec<usize>,
    in_w: Vec<f64>,
    out_w: Vec<f64>,
}

impl FasState {
    fn enqueue(&mut self, v: usize) {
        self.stamp[v] = self.stamp[v].wrapping_add(1);
        let entry = (v, self.stamp[v]);
        if self.out_deg[v] == 0 {
            self.sinks.push_front(entry);
        } else if self.in_deg[v] == 0 {
            self.sources.push_front(entry);
        } else {
            let delta = Delta(self.out_w[v] - self.in_w[v]);
            self.buckets.entry(delta).or_default().push_front(entry);
        }
    }

    fn pop(queue: &mut VecDeque<(usize, u32)>, alive: &[bool], stamp: &[u32]) -> Option<usize> {
        while let Some((v, s)) = queue.pop_back() {
            if alive[v] && stamp[v] == s {
                return Some(v);
            }
        }
        None
    }

    /// Takes a live node from the highest non-empty bucket, dropping buckets that run dry.
    fn pop_max(&mut self) -> Option<usize> {
        while let Some(mut bucket) = self.buckets.last_entry() {
            let found = Self::pop(bucket.get_mut(), &self.alive, &self.stamp);
            if bucket.get().is_empty() {
                bucket.remove();
            }
            if found.is_some() {
                return found;
            }
        }
        None
    }

    fn remove(
        &mut self,
        v: usize,
        pairs: &[(usize, usize, f64)],
        out_adj: &[Vec<usize>],
        in_adj: &[Vec<usize>],
    ) {
        self.alive[v] = false;
        for &p in &in_adj[v] {
            let (u, _, weight) = pairs[p];
            if self.alive[u] {
                self.out_deg[u] -= 1;
                self.out_w[u] -= weight;
                self.enqueue(u);
            }
        }
        for &p in &out_adj[v] {
            let (_, w, weight) = pairs[p];
            if self.alive[w] {
                self.in_deg[w] -= 1;
                self.in_w[w] -= weight;
                self.enqueue(w);
            }
        }
    }
}
