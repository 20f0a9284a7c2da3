//! Dense snapshot of the ranked graph used by the ordering passes.

use crate::LayoutGraph;
use crate::model::BorderSide;
use rustc_hash::FxHashMap;

/// Ordering state: nodes are indices, layers hold node indices in their current order and
/// `pos` is the inverse. Adjacency only links neighbouring layers and is aggregated per node pair.
#[derive(Debug, Clone, Default)]
pub struct Layers {
    pub ids: Vec<String>,
    pub rank: Vec<usize>,
    pub layers: Vec<Vec<usize>>,
    pub pos: Vec<usize>,
    pub preds: Vec<Vec<(usize, f64)>>,
    pub succs: Vec<Vec<(usize, f64)>>,
    /// Enclosing subgraphs of every node, innermost first.
    pub chain: Vec<Vec<usize>>,
    /// Enclosing subgraphs of every subgraph, innermost first.
    pub sg_chain: Vec<Vec<usize>>,
    pub border: Vec<Option<BorderSide>>,
    pub pin: Vec<Option<usize>>,
    /// Position in the graph's node sequence, for nodes and for subgraphs.
    pub seq: Vec<usize>,
    pub sg_seq: Vec<usize>,
}

impl Layers {
    /// Snapshots every ranked node without children. `pins` maps node ids to their fixed place
    /// in `keep_node_order` mode.
    pub fn from_graph(g: &LayoutGraph, pins: Option<&FxHashMap<String, usize>>) -> Self {
        let ranked: Vec<(&str, usize)> = g
            .iter_nodes()
            .filter(|(id, _)| !g.has_children(id))
            .filter_map(|(id, n)| Some((id, usize::try_from(n.rank?).ok()?)))
            .collect();
        let position: FxHashMap<&str, usize> =
            g.nodes().enumerate().map(|(i, id)| (id, i)).collect();
        let index: FxHashMap<&str, usize> =
            ranked.iter().enumerate().map(|(i, (id, _))| (*id, i)).collect();
        let n = ranked.len();
        let layer_count = ranked.iter().map(|(_, r)| r + 1).max().unwrap_or(0);

        let mut out = Layers {
            ids: ranked.iter().map(|(id, _)| id.to_string()).collect(),
            rank: ranked.iter().map(|(_, r)| *r).collect(),
            layers: vec![Vec::new(); layer_count],
            pos: vec![0; n],
            preds: vec![Vec::new(); n],
            succs: vec![Vec::new(); n],
            chain: Vec::with_capacity(n),
            sg_chain: Vec::new(),
            border: Vec::with_capacity(n),
            pin: Vec::with_capacity(n),
            seq: ranked.iter().map(|(id, _)| position[*id]).collect(),
            sg_seq: Vec::new(),
        };

        for e in g.edges() {
            let (Some(&v), Some(&w)) = (index.get(e.source), index.get(e.target)) else {
                continue;
            };
            if out.rank[w] != out.rank[v] + 1 {
                continue;
            }
            add_weight(&mut out.succs[v], w, e.data.weight);
            add_weight(&mut out.preds[w], v, e.data.weight);
        }

        let mut sg_index: FxHashMap<String, usize> = FxHashMap::default();
        let mut sg_ids: Vec<String> = Vec::new();
        for (id, _) in &ranked {
            let ancestors: Vec<&str> = g.ancestors(id).collect();
            for (i, a) in ancestors.iter().enumerate().rev() {
                if sg_index.contains_key(*a) {
                    continue;
                }
                let above = ancestors[i + 1..].iter().map(|p| sg_index[*p]).collect();
                sg_index.insert(a.to_string(), sg_ids.len());
                sg_ids.push(a.to_string());
                out.sg_chain.push(above);
                out.sg_seq.push(position.get(*a).copied().unwrap_or(usize::MAX));
            }
            out.chain.push(ancestors.iter().map(|a| sg_index[*a]).collect());
            let node = g.node(id);
            out.border.push(node.and_then(|n| n.border_side));
            out.pin.push(pins.and_then(|p| p.get(*id).copied()));
        }
        out
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn parent(&self, v: usize) -> Option<usize> {
        self.chain[v].first().copied()
    }

    pub fn set_layers(&mut self, layers: Vec<Vec<usize>>) {
        for layer in &layers {
            for (i, &v) in layer.iter().enumerate() {
                self.pos[v] = i;
            }
        }
        self.layers = layers;
    }

    pub fn set_layer(&mut self, r: usize, layer: Vec<usize>) {
        for (i, &v) in layer.iter().enumerate() {
            self.pos[v] = i;
        }
        self.layers[r] = layer;
    }

    pub fn write_order(&self, g: &mut LayoutGraph) {
        for layer in &self.layers {
            for (i, &v) in layer.iter().enumerate() {
                if let Some(n) = g.node_mut(&self.ids[v]) {
                    n.order = Some(i);
                }
            }
        }
    }
}

fn add_weight(list: &mut Vec<(usize, f64)>, v: usize, weight: f64) {
    match list.iter_mut().find(|(u, _)| *u == v) {
        Some(entry) => entry.1 += weight,
        None => list.push((v, weight)),
    }
}
