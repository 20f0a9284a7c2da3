//! Graph algorithms over [`Graph`].
//!
//! All traversals are iterative and visit nodes in insertion order, so results are stable
//! across runs.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use rustc_hash::FxBuildHasher;
use std::collections::VecDeque;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Dense successor lists indexed by node position.
fn successor_table<N, E>(g: &Graph<N, E>) -> (Vec<&str>, Vec<Vec<usize>>) {
    let ids: Vec<&str> = g.nodes().collect();
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, v)| (*v, i)).collect();
    let succ = ids
        .iter()
        .map(|v| {
            g.out_edges(v)
                .filter_map(|e| index.get(e.target).copied())
                .collect()
        })
        .collect();
    (ids, succ)
}

/// Weakly connected components, each listed in BFS order.
pub fn components<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>> {
    let mut seen: hashbrown::HashSet<&str, FxBuildHasher> = Default::default();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.nodes() {
        if !seen.insert(start) {
            continue;
        }
        let mut comp: Vec<String> = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            comp.push(v.to_string());
            for w in g.neighbors(v) {
                if seen.insert(w) {
                    queue.push_back(w);
                }
            }
        }
        out.push(comp);
    }
    out
}

/// Strongly connected components (Tarjan), in completion order. Members of each component are
/// listed in node insertion order.
pub fn tarjan<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>> {
    let (ids, succ) = successor_table(g);
    let n = ids.len();

    let mut counter = 0usize;
    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut low: Vec<usize> = vec![0; n];
    let mut on_stack: Vec<bool> = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut sccs: Vec<Vec<String>> = Vec::new();

    for start in 0..n {
        if index[start].is_some() {
            continue;
        }
        index[start] = Some(counter);
        low[start] = counter;
        counter += 1;
        stack.push(start);
        on_stack[start] = true;
        let mut calls: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(frame) = calls.last_mut() {
            let v = frame.0;
            if frame.1 < succ[v].len() {
                let w = succ[v][frame.1];
                frame.1 += 1;
                match index[w] {
                    None => {
                        index[w] = Some(counter);
                        low[w] = counter;
                        counter += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        calls.push((w, 0));
                    }
                    Some(wi) if on_stack[w] => low[v] = low[v].min(wi),
                    Some(_) => {}
                }
                continue;
            }

            calls.pop();
            if let Some(&(p, _)) = calls.last() {
                low[p] = low[p].min(low[v]);
            }
            if Some(low[v]) == index[v] {
                let mut members: Vec<usize> = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    members.push(w);
                    if w == v {
                        break;
                    }
                }
                members.sort_unstable();
                sccs.push(members.into_iter().map(|i| ids[i].to_string()).collect());
            }
        }
    }
    sccs
}

/// Strongly connected components that contain a cycle: size > 1, or a single node with a
/// self-loop.
pub fn find_cycles<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>> {
    tarjan(g)
        .into_iter()
        .filter(|scc| scc.len() > 1 || !g.edges_between(&scc[0], &scc[0]).is_empty())
        .collect()
}

pub fn is_acyclic<N, E>(g: &Graph<N, E>) -> bool {
    find_cycles(g).is_empty()
}

/// Kahn's topological sort. Ties are broken by insertion order.
pub fn topsort<N, E>(g: &Graph<N, E>) -> Result<Vec<String>> {
    let (ids, succ) = successor_table(g);
    let mut indegree: Vec<usize> = vec![0; ids.len()];
    for targets in &succ {
        for &w in targets {
            indegree[w] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..ids.len()).filter(|&i| indegree[i] == 0).collect();
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    while let Some(v) = queue.pop_front() {
        out.push(ids[v].to_string());
        for &w in &succ[v] {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }

    if out.len() != ids.len() {
        return Err(GraphError::Cycle);
    }
    Ok(out)
}

/// Depth-first preorder over successors, starting from each of `roots` in turn.
pub fn preorder<N, E>(g: &Graph<N, E>, roots: &[&str]) -> Vec<String> {
    walk(g, roots, true)
}

/// Depth-first postorder over successors, starting from each of `roots` in turn.
pub fn postorder<N, E>(g: &Graph<N, E>, roots: &[&str]) -> Vec<String> {
    walk(g, roots, false)
}

fn walk<N, E>(g: &Graph<N, E>, roots: &[&str], pre: bool) -> Vec<String> {
    let (ids, succ) = successor_table(g);
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, v)| (*v, i)).collect();
    let mut visited: Vec<bool> = vec![false; ids.len()];
    let mut out: Vec<String> = Vec::new();

    for root in roots {
        let Some(&start) = index.get(root) else {
            continue;
        };
        if visited[start] {
            continue;
        }
        visited[start] = true;
        if pre {
            out.push(ids[start].to_string());
        }
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(frame) = stack.last_mut() {
            let v = frame.0;
            if let Some(&w) = succ[v].get(frame.1) {
                frame.1 += 1;
                if !visited[w] {
                    visited[w] = true;
                    if pre {
                        out.push(ids[w].to_string());
                    }
                    stack.push((w, 0));
                }
                continue;
            }
            if !pre {
                out.push(ids[v].to_string());
            }
            stack.pop();
        }
    }
    out
}
