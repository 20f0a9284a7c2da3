//! Node ordering / crossing minimization.
//!
//! The ranked graph (after long edges are split into unit edges) is copied into a dense
//! [`Layers`] snapshot. From a depth-first initial order, sweeps alternate upward (keys from
//! successor barycenters) and downward (predecessor barycenters), every other pair of sweeps
//! breaking ties towards the right. The order with the fewest weighted crossings wins; a
//! transpose pass then removes what local swaps can, and the result is written back as `order`.

mod barycenter;
mod cross_count;
mod init_order;
mod layers;
mod subgraph;
mod transpose;

pub use barycenter::{
    BarycenterEntry, Member, ResolvedEntry, SortEntry, SortResult, barycenter, resolve_conflicts,
    sort,
};
pub use cross_count::cross_count;
pub use init_order::init_order;
pub use layers::Layers;
pub use subgraph::{Constraints, Direction, add_subgraph_constraints, sort_layer};
pub use transpose::{MAX_TRANSPOSE_PASSES, transpose};

use crate::LayoutGraph;
use rustc_hash::FxHashMap;

/// Upper bound on sweeps.
pub const MAX_SWEEPS: usize = 24;

/// Sweeps in a row without a new best order before the loop stops.
pub const PATIENCE: usize = 4;

/// Orders every rank of `g`. With `pins`, the listed nodes keep their relative order.
/// Returns the weighted crossing count of the chosen order.
pub fn order(g: &mut LayoutGraph, pins: Option<&FxHashMap<String, usize>>) -> f64 {
    let mut layers = Layers::from_graph(g, pins);
    if layers.node_count() == 0 {
        return 0.0;
    }
    let initial = init_order(&layers);
    layers.set_layers(initial);

    let mut best = f64::INFINITY;
    let mut best_layers = layers.layers.clone();
    let mut sweeps = 0usize;
    let mut since_best = 0usize;
    while since_best < PATIENCE && sweeps < MAX_SWEEPS {
        let direction = if sweeps % 2 == 1 {
            Direction::Down
        } else {
            Direction::Up
        };
        sweep(&mut layers, direction, sweeps % 4 >= 2);
        sweeps += 1;

        let cc = cross_count(&layers);
        if cc < best {
            best = cc;
            best_layers = layers.layers.clone();
            since_best = 0;
        }
        since_best += 1;
    }

    if since_best < PATIENCE {
        tracing::warn!(sweeps, crossings = best, "order: sweep cap reached, keeping best order");
    }

    layers.set_layers(best_layers);
    if best > 0.0 && transpose(&mut layers) > 0 {
        best = cross_count(&layers);
    }
    layers.write_order(g);
    tracing::debug!(sweeps, crossings = best, "order: done");
    best
}

fn sweep(layers: &mut Layers, direction: Direction, bias_right: bool) {
    let count = layers.layers.len();
    let ranks: Vec<usize> = match direction {
        Direction::Down => (1..count).collect(),
        Direction::Up => (0..count.saturating_sub(1)).rev().collect(),
    };
    let mut constraints = Constraints::new();
    for r in ranks {
        let sorted = sort_layer(layers, r, direction, bias_right, &constraints);
        add_subgraph_constraints(layers, &mut constraints, &sorted);
        layers.set_layer(r, sorted);
    }
}

/// Weighted crossings of the `order` already stored on `g`.
pub fn crossings(g: &LayoutGraph) -> f64 {
    let mut layers = Layers::from_graph(g, None);
    let mut by_rank: Vec<Vec<(usize, usize)>> = vec![Vec::new(); layers.layers.len()];
    for v in 0..layers.node_count() {
        let order = g.node(&layers.ids[v]).and_then(|n| n.order).unwrap_or(usize::MAX);
        by_rank[layers.rank[v]].push((order, v));
    }
    let sorted = by_rank
        .into_iter()
        .map(|mut layer| {
            layer.sort_unstable();
            layer.into_iter().map(|(_, v)| v).collect()
        })
        .collect();
    layers.set_layers(sorted);
    cross_count(&layers)
}
