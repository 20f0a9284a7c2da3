//! Moves the dummies of every long edge into the subgraphs the edge passes through.
//!
//! The path from the edge's source up to the lowest common ancestor of both endpoints and back
//! down to the target is walked rank by rank: while ascending, a dummy stays in the deepest
//! source-side subgraph that still spans its rank; once past the ancestor, it enters the deepest
//! target-side subgraph that has already started.

use crate::LayoutGraph;
use crate::error::Result;
use crate::normalize::DummyChains;
use rustc_hash::FxHashSet;

pub fn parent_dummy_chains(g: &mut LayoutGraph, chains: &DummyChains) -> Result<()> {
    for start in chains {
        let Some(source) = g.predecessors(start).first().map(|s| s.to_string()) else {
            continue;
        };
        let members = chain_members(g, start);
        let Some(target) = members
            .last()
            .and_then(|last| g.successors(last).first().map(|s| s.to_string()))
        else {
            continue;
        };

        let (path, lca) = find_path(g, &source, &target);
        let mut idx = 0usize;
        let mut ascending = true;

        for v in &members {
            let rank = g.node(v).and_then(|n| n.rank).unwrap_or(0);
            if ascending {
                while path[idx] != lca
                    && max_rank(g, path[idx].as_deref()).is_some_and(|m| m < rank)
                {
                    idx += 1;
                }
                if path[idx] == lca {
                    ascending = false;
                }
            }
            if !ascending {
                while idx + 1 < path.len()
                    && min_rank(g, path[idx + 1].as_deref()).is_some_and(|m| m <= rank)
                {
                    idx += 1;
                }
            }
            g.set_parent(v, path[idx].as_deref())?;
        }
    }
    Ok(())
}

fn chain_members(g: &LayoutGraph, start: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut v = Some(start.to_string());
    while let Some(id) = v {
        if !g.node(&id).is_some_and(|n| n.is_dummy()) {
            break;
        }
        v = g.successors(&id).first().map(|s| s.to_string());
        out.push(id);
    }
    out
}

fn max_rank(g: &LayoutGraph, sg: Option<&str>) -> Option<i32> {
    sg.and_then(|sg| g.node(sg)).and_then(|n| n.max_rank)
}

fn min_rank(g: &LayoutGraph, sg: Option<&str>) -> Option<i32> {
    sg.and_then(|sg| g.node(sg)).and_then(|n| n.min_rank)
}

/// Subgraphs from `v` up to the lowest common ancestor, then down to `w`. `None` stands for the
/// top level.
fn find_path(g: &LayoutGraph, v: &str, w: &str) -> (Vec<Option<String>>, Option<String>) {
    let w_ancestors: FxHashSet<&str> = g.ancestors(w).collect();
    let mut path: Vec<Option<String>> = Vec::new();
    let mut lca: Option<String> = None;
    for a in g.ancestors(v) {
        path.push(Some(a.to_string()));
        if w_ancestors.contains(a) {
            lca = Some(a.to_string());
            break;
        }
    }
    if lca.is_none() {
        path.push(None);
    }

    let mut down: Vec<Option<String>> = g
        .ancestors(w)
        .take_while(|a| lca.as_deref() != Some(*a))
        .map(|a| Some(a.to_string()))
        .collect();
    down.reverse();
    path.extend(down);
    (path, lca)
}
