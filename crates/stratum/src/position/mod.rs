//! Coordinate assignment.
//!
//! y comes straight from the rank rows; x from Brandes & Köpf ([`bk`]). Both work in the
//! top-to-bottom frame set up by `coordinate_system::adjust`.

pub mod bk;

use crate::LayoutGraph;
use crate::model::{LayoutExtent, Point};
use crate::options::{LayoutOptions, Separation};
use crate::util::{build_layer_matrix, intersect_rect};

pub fn position(g: &mut LayoutGraph, opts: &LayoutOptions, ranksep_scale: f64) {
    position_y(g, &opts.ranksep, ranksep_scale);
    let xs = bk::position_x(g, opts);
    for (id, x) in xs {
        if let Some(n) = g.node_mut(&id) {
            n.x = Some(x);
        }
    }
}

/// Stacks the ranks: every node of a rank shares the rank's center line, rows are as tall as
/// their tallest node and `ranksep * scale` apart. A per-node `ranksep` is resolved over the
/// rank's real nodes (largest wins); a rank of dummies only reuses the last resolved value.
pub fn position_y(g: &mut LayoutGraph, ranksep: &Separation, scale: f64) {
    let mut prev_y = 0.0;
    let mut sep = ranksep.fixed().unwrap_or(0.0);
    for layer in build_layer_matrix(g) {
        let mut max_height: f64 = 0.0;
        let mut resolved: Option<f64> = None;
        for v in &layer {
            let Some(n) = g.node(v) else {
                continue;
            };
            max_height = max_height.max(n.height);
            if !n.is_dummy() {
                let s = ranksep.resolve(v, n);
                resolved = Some(resolved.map_or(s, |r: f64| r.max(s)));
            }
        }
        if let Some(s) = resolved {
            sep = s;
        }
        for v in &layer {
            if let Some(n) = g.node_mut(v) {
                n.y = Some(prev_y + max_height / 2.0);
            }
        }
        prev_y += max_height + sep * scale;
    }
}

/// Moves the drawing so its top-left corner (nodes and edge labels) sits at the margins and
/// returns the drawing's size including both margins.
pub fn translate_graph(g: &mut LayoutGraph, marginx: f64, marginy: f64) -> LayoutExtent {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut grow = |x: f64, y: f64, w: f64, h: f64| {
        min_x = min_x.min(x - w / 2.0);
        max_x = max_x.max(x + w / 2.0);
        min_y = min_y.min(y - h / 2.0);
        max_y = max_y.max(y + h / 2.0);
    };
    for (_, n) in g.iter_nodes() {
        if let (Some(x), Some(y)) = (n.x, n.y) {
            grow(x, y, n.width, n.height);
        }
    }
    for e in g.edges() {
        if let (Some(x), Some(y)) = (e.data.x, e.data.y) {
            grow(x, y, e.data.width, e.data.height);
        }
    }

    if !min_x.is_finite() || !min_y.is_finite() {
        return LayoutExtent {
            width: 2.0 * marginx,
            height: 2.0 * marginy,
        };
    }
    let dx = marginx - min_x;
    let dy = marginy - min_y;

    for (_, n) in g.iter_nodes_mut() {
        n.x = n.x.map(|x| x + dx);
        n.y = n.y.map(|y| y + dy);
    }
    for (_, e) in g.iter_edges_mut() {
        for p in &mut e.points {
            p.x += dx;
            p.y += dy;
        }
        e.x = e.x.map(|x| x + dx);
        e.y = e.y.map(|y| y + dy);
    }

    LayoutExtent {
        width: max_x - min_x + 2.0 * marginx,
        height: max_y - min_y + 2.0 * marginy,
    }
}

/// Clips both ends of every edge to the boxes of its endpoints. Self-loops keep their shape.
pub fn assign_node_intersects(g: &mut LayoutGraph) {
    let updates: Vec<(String, Point, Point)> = g
        .edges()
        .filter(|e| e.source != e.target)
        .filter_map(|e| {
            let v = g.node(e.source)?;
            let w = g.node(e.target)?;
            let (p1, p2) = match (e.data.points.first(), e.data.points.last()) {
                (Some(first), Some(last)) => (*first, *last),
                _ => (center(w)?, center(v)?),
            };
            Some((e.id.to_string(), intersect_rect(v, p1), intersect_rect(w, p2)))
        })
        .collect();
    for (id, start, end) in updates {
        if let Some(e) = g.edge_mut(&id) {
            e.points.insert(0, start);
            e.points.push(end);
        }
    }
}

fn center(n: &crate::model::NodeLabel) -> Option<Point> {
    Some(Point::new(n.x?, n.y?))
}
