//! Break cycles by reversing a feedback arc set (FAS).
//!
//! Reversed edges keep their id and data; `reversed` marks them so `undo` can flip them back
//! (and their routing points) once layout is done.

use crate::LayoutGraph;
use crate::greedy_fas::greedy_fas_with_weight;
use crate::options::Acyclicer;
use rustc_hash::FxHashSet;

/// Reverses the chosen feedback edges and returns their ids.
pub fn run(g: &mut LayoutGraph, acyclicer: Acyclicer) -> Vec<String> {
    let fas = match acyclicer {
        Acyclicer::Greedy => greedy_fas_with_weight(g, |e| e.weight),
        Acyclicer::Dfs => dfs_fas(g),
    };

    for id in &fas {
        if g.reverse_edge(id) {
            if let Some(e) = g.edge_mut(id) {
                e.reversed = true;
            }
        }
    }
    tracing::debug!(reversed = fas.len(), "acyclic: reversed feedback edges");
    fas
}

pub fn undo(g: &mut LayoutGraph) {
    let reversed: Vec<String> = g
        .edges()
        .filter(|e| e.data.reversed)
        .map(|e| e.id.to_string())
        .collect();
    for id in reversed {
        g.reverse_edge(&id);
        if let Some(e) = g.edge_mut(&id) {
            e.reversed = false;
            e.points.reverse();
        }
    }
}

/// Back edges of a depth-first search started from every node in insertion order.
fn dfs_fas(g: &LayoutGraph) -> Vec<String> {
    let mut fas: Vec<String> = Vec::new();
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut on_stack: FxHashSet<&str> = FxHashSet::default();

    for start in g.nodes() {
        if !visited.insert(start) {
            continue;
        }
        on_stack.insert(start);
        let mut frames: Vec<(&str, Vec<(&str, &str)>, usize)> =
            vec![(start, out_list(g, start), 0)];

        while let Some(frame) = frames.last_mut() {
            let v = frame.0;
            if frame.2 == frame.1.len() {
                on_stack.remove(v);
                frames.pop();
                continue;
            }
            let (eid, w) = frame.1[frame.2];
            frame.2 += 1;
            if w == v {
                continue;
            }
            if on_stack.contains(w) {
                fas.push(eid.to_string());
            } else if visited.insert(w) {
                on_stack.insert(w);
                frames.push((w, out_list(g, w), 0));
            }
        }
    }
    fas
}

fn out_list<'a>(g: &'a LayoutGraph, v: &str) -> Vec<(&'a str, &'a str)> {
    g.out_edges(v).map(|e| (e.id, e.target)).collect()
}
