//! Sorting one layer as a tree of nested subgraph blocks.

use super::Layers;
use super::barycenter::{
    BarycenterEntry, Member, SortEntry, SortResult, barycenter, resolve_conflicts, sort,
};
use crate::model::BorderSide;
use rustc_hash::FxHashMap;

/// Which neighbouring layer is held fixed while a layer is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Keys come from predecessors on the layer above.
    Down,
    /// Keys come from successors on the layer below.
    Up,
}

/// Left-to-right constraints between sibling subgraphs, collected during one sweep.
pub type Constraints = Vec<(usize, usize)>;

struct LayerTree<'a> {
    layers: &'a Layers,
    direction: Direction,
    bias_right: bool,
    constraints: &'a [(usize, usize)],
    children: FxHashMap<Option<usize>, Vec<Member>>,
    borders: FxHashMap<usize, (Option<usize>, Option<usize>)>,
}

/// Sorts layer `r` by barycenter, one subgraph at a time. Subgraphs stay contiguous with their
/// left border first and their right border last; children are indexed in graph order.
pub fn sort_layer(
    layers: &Layers,
    r: usize,
    direction: Direction,
    bias_right: bool,
    constraints: &[(usize, usize)],
) -> Vec<usize> {
    let mut tree = LayerTree {
        layers,
        direction,
        bias_right,
        constraints,
        children: FxHashMap::default(),
        borders: FxHashMap::default(),
    };
    for &v in &layers.layers[r] {
        tree.insert(v);
    }
    for list in tree.children.values_mut() {
        list.sort_by_key(|m| match *m {
            Member::Node(v) => layers.seq[v],
            Member::Subgraph(sg) => layers.sg_seq[sg],
        });
    }
    tree.sort_block(None).vs
}

impl LayerTree<'_> {
    fn insert(&mut self, v: usize) {
        let layers = self.layers;
        let chain = &layers.chain[v];
        if let (Some(side), Some(&sg)) = (layers.border[v], chain.first()) {
            let entry = self.borders.entry(sg).or_default();
            match side {
                BorderSide::Left => entry.0 = Some(v),
                BorderSide::Right => entry.1 = Some(v),
            }
        } else {
            self.children.entry(chain.first().copied()).or_default().push(Member::Node(v));
        }
        for (k, &sg) in chain.iter().enumerate() {
            let parent = chain.get(k + 1).copied();
            let siblings = self.children.entry(parent).or_default();
            if siblings.contains(&Member::Subgraph(sg)) {
                break;
            }
            siblings.push(Member::Subgraph(sg));
        }
    }

    fn neighbours(&self, v: usize) -> &[(usize, f64)] {
        match self.direction {
            Direction::Down => &self.layers.preds[v],
            Direction::Up => &self.layers.succs[v],
        }
    }

    fn sort_block(&self, block: Option<usize>) -> SortResult {
        let movable = self.children.get(&block).cloned().unwrap_or_default();
        let mut nested: FxHashMap<usize, SortResult> = FxHashMap::default();
        let mut entries: Vec<BarycenterEntry> = Vec::with_capacity(movable.len());
        for member in movable {
            let (bc, weight) = match member {
                Member::Node(v) => match barycenter(self.layers, self.neighbours(v)) {
                    Some((bc, weight)) => (Some(bc), Some(weight)),
                    None => (None, None),
                },
                Member::Subgraph(sg) => {
                    let result = self.sort_block(Some(sg));
                    let keys = (result.barycenter, result.weight);
                    nested.insert(sg, result);
                    keys
                }
            };
            entries.push(BarycenterEntry {
                member,
                barycenter: bc,
                weight,
            });
        }

        let sort_entries: Vec<SortEntry> = resolve_conflicts(&entries, self.constraints)
            .into_iter()
            .map(|e| SortEntry {
                vs: e
                    .members
                    .iter()
                    .flat_map(|m| match *m {
                        Member::Node(v) => vec![v],
                        Member::Subgraph(sg) => {
                            nested.get(&sg).map(|r| r.vs.clone()).unwrap_or_default()
                        }
                    })
                    .collect(),
                i: e.i,
                barycenter: e.barycenter,
                weight: e.weight,
            })
            .collect();

        let mut result = sort(&sort_entries, self.bias_right);
        self.deal_pins(block, &mut result.vs);

        let Some(sg) = block else {
            return result;
        };
        let (left, right) = self.borders.get(&sg).copied().unwrap_or_default();
        if let Some(bl) = left {
            result.vs.insert(0, bl);
        }
        if let Some(br) = right {
            result.vs.push(br);
        }
        let first = |b: Option<usize>| {
            b.and_then(|v| self.neighbours(v).first())
                .map(|&(u, _)| self.layers.pos[u] as f64)
        };
        if let (Some(l), Some(r)) = (first(left), first(right)) {
            let bc = result.barycenter.unwrap_or(0.0);
            let weight = result.weight.unwrap_or(0.0);
            result.barycenter = Some((bc * weight + l + r) / (weight + 2.0));
            result.weight = Some(weight + 2.0);
        }
        result
    }

    /// Puts the pinned direct members of `block` back into pin order without moving anything
    /// else.
    fn deal_pins(&self, block: Option<usize>, vs: &mut [usize]) {
        let layers = self.layers;
        let slots: Vec<usize> = (0..vs.len())
            .filter(|&i| layers.pin[vs[i]].is_some() && layers.parent(vs[i]) == block)
            .collect();
        if slots.len() < 2 {
            return;
        }
        let mut pinned: Vec<usize> = slots.iter().map(|&i| vs[i]).collect();
        pinned.sort_by_key(|&v| layers.pin[v]);
        for (slot, v) in slots.into_iter().zip(pinned) {
            vs[slot] = v;
        }
    }
}

/// Records, for every pair of sibling subgraphs that end up next to each other in `vs`, that
/// the left one must stay left on the layers sorted later in the same sweep.
pub fn add_subgraph_constraints(layers: &Layers, constraints: &mut Constraints, vs: &[usize]) {
    let mut prev: FxHashMap<Option<usize>, usize> = FxHashMap::default();
    for &v in vs {
        let mut child = layers.parent(v);
        while let Some(c) = child {
            let parent = layers.sg_chain[c].first().copied();
            match prev.insert(parent, c) {
                Some(p) if p != c => {
                    if !constraints.contains(&(p, c)) {
                        constraints.push((p, c));
                    }
                    break;
                }
                _ => child = parent,
            }
        }
    }
}
