//! Barycenters, constraint conflicts, and the biased sort of one subgraph's entries.

use super::Layers;
use std::cmp::Ordering;

/// A child of the block being sorted: a node of the layer or a nested subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member {
    Node(usize),
    Subgraph(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub member: Member,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// An entry after conflict resolution. `i` is the smallest input index it absorbed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub members: Vec<Member>,
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortEntry {
    pub vs: Vec<usize>,
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortResult {
    pub vs: Vec<usize>,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// Weighted mean of the neighbour positions in the fixed layer, paired with the total weight.
/// `None` without neighbours or when every edge weighs nothing.
pub fn barycenter(layers: &Layers, neighbours: &[(usize, f64)]) -> Option<(f64, f64)> {
    let (sum, weight) = neighbours
        .iter()
        .fold((0.0, 0.0), |(sum, weight), &(u, w)| {
            (sum + w * layers.pos[u] as f64, weight + w)
        });
    (weight > 0.0).then(|| (sum / weight, weight))
}

struct Conflict {
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    members: Vec<Member>,
    i: usize,
    barycenter: Option<f64>,
    weight: Option<f64>,
    merged: bool,
}

/// Merges entries whose barycenters contradict a constraint `(left, right)` between sibling
/// subgraphs, so the constrained pair can no longer be sorted out of order.
pub fn resolve_conflicts(
    entries: &[BarycenterEntry],
    constraints: &[(usize, usize)],
) -> Vec<ResolvedEntry> {
    let mut conflicts: Vec<Conflict> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| Conflict {
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            members: vec![e.member],
            i,
            barycenter: e.barycenter,
            weight: e.weight,
            merged: false,
        })
        .collect();

    let find = |sg: usize| entries.iter().position(|e| e.member == Member::Subgraph(sg));
    for &(left, right) in constraints {
        let (Some(v), Some(w)) = (find(left), find(right)) else {
            continue;
        };
        conflicts[w].indegree += 1;
        conflicts[v].outs.push(w);
    }

    let mut sources: Vec<usize> = (0..conflicts.len())
        .filter(|&i| conflicts[i].indegree == 0)
        .collect();
    let mut processed: Vec<usize> = Vec::with_capacity(conflicts.len());
    while let Some(v) = sources.pop() {
        processed.push(v);
        let ins = std::mem::take(&mut conflicts[v].ins);
        for u in ins.into_iter().rev() {
            if conflicts[u].merged {
                continue;
            }
            let merge = match (conflicts[u].barycenter, conflicts[v].barycenter) {
                (Some(ub), Some(vb)) => ub >= vb,
                _ => true,
            };
            if merge {
                merge_into(&mut conflicts, v, u);
            }
        }
        let outs = std::mem::take(&mut conflicts[v].outs);
        for w in outs {
            conflicts[w].ins.push(v);
            conflicts[w].indegree = conflicts[w].indegree.saturating_sub(1);
            if conflicts[w].indegree == 0 {
                sources.push(w);
            }
        }
    }

    processed
        .into_iter()
        .filter(|&i| !conflicts[i].merged)
        .map(|i| {
            let c = &conflicts[i];
            ResolvedEntry {
                members: c.members.clone(),
                i: c.i,
                barycenter: c.barycenter,
                weight: c.weight,
            }
        })
        .collect()
}

fn merge_into(conflicts: &mut [Conflict], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    for c in [&conflicts[target], &conflicts[source]] {
        if let (Some(b), Some(w)) = (c.barycenter, c.weight) {
            if w != 0.0 {
                sum += b * w;
                weight += w;
            }
        }
    }
    let mut members = std::mem::take(&mut conflicts[source].members);
    members.append(&mut conflicts[target].members);
    let source_i = conflicts[source].i;
    conflicts[source].merged = true;

    let t = &mut conflicts[target];
    t.members = members;
    if weight != 0.0 {
        t.barycenter = Some(sum / weight);
        t.weight = Some(weight);
    }
    t.i = t.i.min(source_i);
}

/// Sorts entries by barycenter. Equal barycenters keep index order, or the reverse with
/// `bias_right`. Entries without a barycenter are put back at their index.
pub fn sort(entries: &[SortEntry], bias_right: bool) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<&SortEntry>, Vec<&SortEntry>) =
        entries.iter().partition(|e| e.barycenter.is_some());
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| {
        let (ab, bb) = (a.barycenter.unwrap_or(0.0), b.barycenter.unwrap_or(0.0));
        match ab.partial_cmp(&bb) {
            Some(Ordering::Less) => Ordering::Less,
            Some(Ordering::Greater) => Ordering::Greater,
            _ if bias_right => b.i.cmp(&a.i),
            _ => a.i.cmp(&b.i),
        }
    });

    let mut vs: Vec<usize> = Vec::with_capacity(entries.iter().map(|e| e.vs.len()).sum());
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut index = consume_unsortable(&mut vs, &mut unsortable, 0);
    for entry in sortable {
        index += entry.vs.len();
        vs.extend_from_slice(&entry.vs);
        if let (Some(b), Some(w)) = (entry.barycenter, entry.weight) {
            sum += b * w;
            weight += w;
        }
        index = consume_unsortable(&mut vs, &mut unsortable, index);
    }

    if weight != 0.0 {
        SortResult {
            vs,
            barycenter: Some(sum / weight),
            weight: Some(weight),
        }
    } else {
        SortResult {
            vs,
            ..Default::default()
        }
    }
}

fn consume_unsortable(
    vs: &mut Vec<usize>,
    unsortable: &mut Vec<&SortEntry>,
    mut index: usize,
) -> usize {
    while let Some(last) = unsortable.last() {
        if last.i > index {
            break;
        }
        vs.extend_from_slice(&last.vs);
        unsortable.pop();
        index += 1;
    }
    index
}
