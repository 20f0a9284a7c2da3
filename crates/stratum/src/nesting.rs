//! Nesting expansion for compound graphs.
//!
//! Containment is turned into plain constraint edges so a single ranking pass keeps every child
//! strictly between its subgraph's top and bottom borders. Each subgraph gets a `_bt`/`_bb`
//! border pair, every child is hung between them with heavy edges, and a synthetic root pulls
//! everything into one component. `cleanup` takes all of it out again.
//!
//! Depth here counts ancestors: top-level nodes sit at depth 0.

use crate::LayoutGraph;
use crate::error::Result;
use crate::model::{Dummy, EdgeLabel, NodeLabel};
use crate::util::add_dummy_node;
use rustc_hash::FxHashMap;
use stratum_graph::alg;

/// Bookkeeping handed from [`run`] to [`cleanup`].
#[derive(Debug, Clone, PartialEq)]
pub struct Nesting {
    pub root: String,
    /// `2 * max_depth + 1`; ranks on multiples of it survive empty-rank removal.
    pub node_rank_factor: usize,
    original_minlen: FxHashMap<String, usize>,
}

impl Nesting {
    /// The `minlen` an edge had before depth scaling.
    pub fn min_span(&self, id: &str, label: &EdgeLabel) -> usize {
        self.original_minlen.get(id).copied().unwrap_or(label.minlen)
    }
}

pub fn run(g: &mut LayoutGraph) -> Result<Nesting> {
    let depths = tree_depths(g);
    let max_depth = depths.values().copied().max().unwrap_or(0);
    let node_sep = 2 * max_depth + 1;

    let mut original_minlen: FxHashMap<String, usize> = FxHashMap::default();
    let mut weight_sum = 0.0;
    for id in g.edge_ids() {
        let Some((v, w)) = g.endpoints(&id) else {
            continue;
        };
        let dv = depths.get(v).copied().unwrap_or(0);
        let dw = depths.get(w).copied().unwrap_or(0);
        let factor = if dv != dw { 2 * dv.abs_diff(dw) + 1 } else { 2 * dv + 1 };
        if let Some(label) = g.edge_mut(&id) {
            weight_sum += label.weight;
            if factor != 1 {
                original_minlen.insert(id.clone(), label.minlen);
                label.minlen = label.minlen.saturating_mul(factor);
            }
        }
    }
    let weight = weight_sum + 1.0;

    let root = add_dummy_node(
        g,
        "_root",
        NodeLabel {
            dummy: Some(Dummy::Root),
            ..Default::default()
        },
    );

    let children_of: FxHashMap<String, Vec<String>> = g
        .nodes()
        .filter(|v| g.has_children(v))
        .map(|v| (v.to_string(), g.children(v).map(String::from).collect()))
        .collect();
    let top_level: Vec<String> = g
        .top_level()
        .filter(|v| *v != root)
        .map(String::from)
        .collect();

    let ctx = Ctx {
        root: &root,
        node_sep,
        max_depth,
        weight,
        depths: &depths,
        children_of: &children_of,
    };

    for v in &top_level {
        if !ctx.is_subgraph(v) {
            ctx.link_leaf_to_root(g, v)?;
            continue;
        }
        ctx.add_borders(g, v)?;
        let mut stack: Vec<(&str, usize)> = vec![(v.as_str(), 0)];
        while let Some(frame) = stack.last_mut() {
            let sg = frame.0;
            let kids = &children_of[sg];
            if frame.1 < kids.len() {
                let child = kids[frame.1].as_str();
                frame.1 += 1;
                if ctx.is_subgraph(child) {
                    ctx.add_borders(g, child)?;
                    stack.push((child, 0));
                } else {
                    ctx.link_leaf_to_root(g, child)?;
                    ctx.hang_child(g, sg, child)?;
                }
                continue;
            }
            stack.pop();
            match stack.last() {
                Some(&(parent, _)) => ctx.hang_child(g, parent, sg)?,
                None => {
                    let top = border_top(g, sg);
                    g.add_edge_auto(&root, &top, nesting_edge(0.0, node_sep))?;
                }
            }
        }
    }

    // Whatever is still disconnected (compound nodes never carry edges) hangs off the root.
    for comp in alg::components(g) {
        if comp.iter().any(|v| *v == root) {
            continue;
        }
        g.add_edge_auto(&root, &comp[0], nesting_edge(0.0, 1))?;
    }

    tracing::debug!(max_depth, node_sep, "nesting: expanded containment");
    Ok(Nesting {
        root,
        node_rank_factor: node_sep,
        original_minlen,
    })
}

struct Ctx<'a> {
    root: &'a str,
    node_sep: usize,
    max_depth: usize,
    weight: f64,
    depths: &'a FxHashMap<String, usize>,
    children_of: &'a FxHashMap<String, Vec<String>>,
}

impl Ctx<'_> {
    fn is_subgraph(&self, v: &str) -> bool {
        self.children_of.contains_key(v)
    }

    fn link_leaf_to_root(&self, g: &mut LayoutGraph, v: &str) -> Result<()> {
        g.add_edge_auto(self.root, v, nesting_edge(0.0, self.node_sep))?;
        Ok(())
    }

    fn add_borders(&self, g: &mut LayoutGraph, sg: &str) -> Result<()> {
        let border = || NodeLabel {
            dummy: Some(Dummy::Border),
            ..Default::default()
        };
        let top = add_dummy_node(g, "_bt", border());
        let bottom = add_dummy_node(g, "_bb", border());
        for b in [&top, &bottom] {
            g.set_parent(b, Some(sg))?;
        }
        if let Some(n) = g.node_mut(sg) {
            n.border_top = Some(top);
            n.border_bottom = Some(bottom);
        }
        Ok(())
    }

    /// Hangs `child` between the borders of its subgraph `sg`.
    fn hang_child(&self, g: &mut LayoutGraph, sg: &str, child: &str) -> Result<()> {
        let top = border_top(g, sg);
        let bottom = border_bottom(g, sg);
        let nested = self.is_subgraph(child);
        let (child_top, child_bottom) = if nested {
            (border_top(g, child), border_bottom(g, child))
        } else {
            (child.to_string(), child.to_string())
        };
        let weight = if nested { self.weight } else { 2.0 * self.weight };
        let minlen = if nested {
            1
        } else {
            let depth = self.depths.get(sg).copied().unwrap_or(0);
            self.max_depth - depth
        };
        g.add_edge_auto(&top, &child_top, nesting_edge(weight, minlen))?;
        g.add_edge_auto(&child_bottom, &bottom, nesting_edge(weight, minlen))?;
        Ok(())
    }
}

fn nesting_edge(weight: f64, minlen: usize) -> EdgeLabel {
    EdgeLabel {
        weight,
        minlen,
        nesting: true,
        ..Default::default()
    }
}

fn border_top(g: &LayoutGraph, sg: &str) -> String {
    g.node(sg)
        .and_then(|n| n.border_top.clone())
        .unwrap_or_else(|| sg.to_string())
}

fn border_bottom(g: &LayoutGraph, sg: &str) -> String {
    g.node(sg)
        .and_then(|n| n.border_bottom.clone())
        .unwrap_or_else(|| sg.to_string())
}

/// Ancestor count of every node, walked top-down with an explicit stack.
fn tree_depths(g: &LayoutGraph) -> FxHashMap<String, usize> {
    let mut out: FxHashMap<String, usize> = FxHashMap::default();
    let mut stack: Vec<(&str, usize)> = g.top_level().map(|v| (v, 0)).collect();
    while let Some((v, depth)) = stack.pop() {
        out.insert(v.to_string(), depth);
        stack.extend(g.children(v).map(|c| (c, depth + 1)));
    }
    out
}

/// Copies the border ranks of every subgraph into its `min_rank`/`max_rank`.
pub fn record_rank_spans(g: &mut LayoutGraph) {
    let spans: Vec<(String, Option<i32>, Option<i32>)> = g
        .iter_nodes()
        .filter_map(|(id, n)| {
            let top = n.border_top.as_deref()?;
            let bottom = n.border_bottom.as_deref()?;
            let rank = |b: &str| g.node(b).and_then(|b| b.rank);
            Some((id.to_string(), rank(top), rank(bottom)))
        })
        .collect();
    for (id, min_rank, max_rank) in spans {
        if let Some(n) = g.node_mut(&id) {
            n.min_rank = min_rank;
            n.max_rank = max_rank;
        }
    }
}

/// Removes the root, the border pairs and every nesting edge, and restores the original
/// `minlen` of real edges.
pub fn cleanup(g: &mut LayoutGraph, nesting: &Nesting) {
    g.remove_node(&nesting.root);

    let nesting_edges: Vec<String> = g
        .edges()
        .filter(|e| e.data.nesting)
        .map(|e| e.id.to_string())
        .collect();
    for id in nesting_edges {
        g.remove_edge(&id);
    }

    let subgraphs: Vec<String> = g
        .iter_nodes()
        .filter(|(_, n)| n.border_top.is_some() || n.border_bottom.is_some())
        .map(|(id, _)| id.to_string())
        .collect();
    for sg in subgraphs {
        let Some(n) = g.node_mut(&sg) else {
            continue;
        };
        let borders = [n.border_top.take(), n.border_bottom.take()];
        for b in borders.into_iter().flatten() {
            g.remove_node(&b);
        }
    }

    for (id, minlen) in &nesting.original_minlen {
        if let Some(e) = g.edge_mut(id) {
            e.minlen = *minlen;
        }
    }
}
