//! Long edges as chains of unit-length edges.
//!
//! `run` replaces every edge spanning more than one rank with a chain of zero-size `Edge` dummies,
//! one per crossed rank. The dummy on the edge's label rank becomes an `EdgeLabel` dummy sized like
//! the label so ordering and positioning reserve room for it. `undo` walks the chains back into
//! routing points.
//!
//! The label-rank proxies live here too: between ranking and normalization every labelled edge
//! gets a rank placeholder so empty-rank removal keeps the rank its label will occupy.

use crate::LayoutGraph;
use crate::error::Result;
use crate::model::{Dummy, EdgeLabel, NodeLabel, Point};
use crate::util::add_dummy_node;
use rustc_hash::FxHashSet;

/// First dummy of every chain created by [`run`].
pub type DummyChains = Vec<String>;

pub fn run(g: &mut LayoutGraph) -> Result<DummyChains> {
    let reserved: FxHashSet<String> = g.edge_ids().into_iter().collect();
    let mut chains: DummyChains = Vec::new();
    let mut next_edge = 0usize;

    for id in g.edge_ids() {
        let Some((v, w)) = g.endpoints(&id).map(|(v, w)| (v.to_string(), w.to_string())) else {
            continue;
        };
        let v_rank = g.node(&v).and_then(|n| n.rank).unwrap_or(0);
        let w_rank = g.node(&w).and_then(|n| n.rank).unwrap_or(0);
        if w_rank <= v_rank + 1 {
            continue;
        }
        let Some(mut label) = g.remove_edge(&id) else {
            continue;
        };
        label.points.clear();

        let mut prev = v;
        for rank in v_rank + 1..w_rank {
            let mut dummy = NodeLabel {
                rank: Some(rank),
                dummy: Some(Dummy::Edge),
                edge_id: Some(id.clone()),
                ..Default::default()
            };
            if label.label_rank == Some(rank) {
                dummy.dummy = Some(Dummy::EdgeLabel);
                dummy.width = label.width;
                dummy.height = label.height;
                dummy.labelpos = Some(label.labelpos);
            }
            let first = rank == v_rank + 1;
            if first {
                dummy.edge_label = Some(label.clone());
            }
            let d = add_dummy_node(g, "_d", dummy);
            if first {
                chains.push(d.clone());
            }
            let unit = chain_edge_id(g, &reserved, &mut next_edge);
            g.add_edge(unit, &prev, &d, EdgeLabel::new(label.weight, 1))?;
            prev = d;
        }
        let unit = chain_edge_id(g, &reserved, &mut next_edge);
        g.add_edge(unit, &prev, &w, EdgeLabel::new(label.weight, 1))?;
    }

    tracing::debug!(chains = chains.len(), "normalize: split long edges");
    Ok(chains)
}

/// Chain edges must not reuse the id of an edge that is temporarily out of the graph.
fn chain_edge_id(g: &LayoutGraph, reserved: &FxHashSet<String>, next: &mut usize) -> String {
    loop {
        *next += 1;
        let candidate = format!("_n{next}");
        if !reserved.contains(&candidate) && !g.has_edge(&candidate) {
            return candidate;
        }
    }
}

/// Collapses every chain back into its original edge, collecting the dummy positions as points
/// and the label dummy's position as the label position.
pub fn undo(g: &mut LayoutGraph, chains: &DummyChains) -> Result<()> {
    for start in chains {
        let Some(node) = g.node(start) else {
            continue;
        };
        let (Some(mut label), Some(id)) = (node.edge_label.clone(), node.edge_id.clone()) else {
            continue;
        };
        let Some(source) = g.predecessors(start).first().map(|s| s.to_string()) else {
            continue;
        };

        let mut v = start.clone();
        let target = loop {
            let Some(node) = g.node(&v) else {
                break None;
            };
            if !matches!(node.dummy, Some(Dummy::Edge | Dummy::EdgeLabel)) {
                break Some(v);
            }
            if let (Some(x), Some(y)) = (node.x, node.y) {
                label.points.push(Point::new(x, y));
                if node.dummy == Some(Dummy::EdgeLabel) {
                    label.x = Some(x);
                    label.y = Some(y);
                    label.width = node.width;
                    label.height = node.height;
                }
            }
            let next = g.successors(&v).first().map(|s| s.to_string());
            g.remove_node(&v);
            match next {
                Some(next) => v = next,
                None => break None,
            }
        };

        if let Some(target) = target {
            g.add_edge(id, &source, &target, label)?;
        }
    }
    Ok(())
}

/// Adds one `EdgeProxy` node per labelled edge, ranked halfway between its endpoints.
pub fn inject_edge_label_proxies(g: &mut LayoutGraph) {
    let labelled: Vec<(String, i32)> = g
        .edges()
        .filter(|e| e.data.has_label())
        .filter_map(|e| {
            let v = g.node(e.source)?.rank?;
            let w = g.node(e.target)?.rank?;
            Some((e.id.to_string(), v + (w - v) / 2))
        })
        .collect();
    for (id, rank) in labelled {
        add_dummy_node(
            g,
            "_ep",
            NodeLabel {
                rank: Some(rank),
                dummy: Some(Dummy::EdgeProxy),
                edge_id: Some(id),
                ..Default::default()
            },
        );
    }
}

/// Removes the proxies again and records their (now final) rank as the edge's `label_rank`.
pub fn remove_edge_label_proxies(g: &mut LayoutGraph) {
    let proxies: Vec<(String, Option<String>, Option<i32>)> = g
        .iter_nodes()
        .filter(|(_, n)| n.dummy == Some(Dummy::EdgeProxy))
        .map(|(id, n)| (id.to_string(), n.edge_id.clone(), n.rank))
        .collect();
    for (proxy, edge, rank) in proxies {
        if let Some(e) = edge.as_deref().and_then(|e| g.edge_mut(e)) {
            e.label_rank = rank;
        }
        g.remove_node(&proxy);
    }
}
