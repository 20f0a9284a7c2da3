//! Small helpers shared by the layout passes.

use crate::LayoutGraph;
use crate::model::{EdgeLabel, NodeLabel, Point};
use std::collections::BTreeMap;

pub fn add_dummy_node(g: &mut LayoutGraph, prefix: &str, label: NodeLabel) -> String {
    let id = g.unique_node_id(prefix);
    g.add_node(id.clone(), label);
    id
}

/// Ranked nodes grouped by rank (index 0 is the smallest rank) and sorted by `order`.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let Some(min) = g.iter_nodes().filter_map(|(_, n)| n.rank).min() else {
        return Vec::new();
    };
    let max = g.iter_nodes().filter_map(|(_, n)| n.rank).max().unwrap_or(min);
    let mut layers: Vec<Vec<(usize, String)>> = vec![Vec::new(); (max - min + 1) as usize];
    for (id, n) in g.iter_nodes() {
        if let Some(rank) = n.rank {
            layers[(rank - min) as usize].push((n.order.unwrap_or(usize::MAX), id.to_string()));
        }
    }
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|(order, _)| *order);
            layer.into_iter().map(|(_, id)| id).collect()
        })
        .collect()
}

pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    g.iter_nodes().filter_map(|(_, n)| n.rank).max()
}

/// Shifts ranks (and subgraph spans) so the smallest rank is 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let Some(min) = g.iter_nodes().filter_map(|(_, n)| n.rank).min() else {
        return;
    };
    for (_, n) in g.iter_nodes_mut() {
        for rank in [&mut n.rank, &mut n.min_rank, &mut n.max_rank] {
            if let Some(r) = rank {
                *r -= min;
            }
        }
    }
}

/// Drops empty ranks, except those on multiples of `factor` which keep subgraph borders apart.
/// A rank also stays when dropping it would bring a real edge below `min_span` ranks.
pub fn remove_empty_ranks(
    g: &mut LayoutGraph,
    factor: usize,
    min_span: impl Fn(&str, &EdgeLabel) -> usize,
) {
    let factor = factor.max(1);
    let Some(offset) = g.iter_nodes().filter_map(|(_, n)| n.rank).min() else {
        return;
    };

    let mut layers: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (id, n) in g.iter_nodes() {
        if let Some(rank) = n.rank {
            layers
                .entry((rank - offset) as usize)
                .or_default()
                .push(id.to_string());
        }
    }
    let Some(&last) = layers.keys().next_back() else {
        return;
    };

    // (top, bottom, slack) of every real edge; dropping a rank strictly inside costs one slack.
    let mut spans: Vec<(usize, usize, i64)> = g
        .edges()
        .filter(|e| !e.data.nesting)
        .filter_map(|e| {
            let v = g.node(e.source)?.rank? - offset;
            let w = g.node(e.target)?.rank? - offset;
            let (top, bottom) = (v.min(w), v.max(w));
            let required = i64::try_from(min_span(e.id, e.data)).unwrap_or(i64::MAX);
            Some((top as usize, bottom as usize, i64::from(bottom - top) - required))
        })
        .collect();
    spans.sort_by_key(|s| s.0);

    let mut next = 0usize;
    let mut active: Vec<usize> = Vec::new();
    let mut delta: i32 = 0;
    for i in 0..=last {
        while next < spans.len() && spans[next].0 < i {
            active.push(next);
            next += 1;
        }
        active.retain(|&s| spans[s].1 > i);
        match layers.get(&i) {
            None if i % factor != 0 && active.iter().all(|&s| spans[s].2 > 0) => {
                for &s in &active {
                    spans[s].2 -= 1;
                }
                delta -= 1;
            }
            Some(vs) if delta != 0 => {
                for v in vs {
                    if let Some(r) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
                        *r += delta;
                    }
                }
            }
            _ => {}
        }
    }
}

/// Point where the segment from the center of `node` towards `towards` leaves its box.
pub fn intersect_rect(node: &NodeLabel, towards: Point) -> Point {
    let x = node.x.unwrap_or(0.0);
    let y = node.y.unwrap_or(0.0);
    let dx = towards.x - x;
    let dy = towards.y - y;
    let mut w = node.width / 2.0;
    let mut h = node.height / 2.0;

    if dx == 0.0 && dy == 0.0 {
        return Point::new(x, y);
    }
    // Axis-parallel segments, which also covers zero-sized boxes without dividing by zero.
    if dx == 0.0 {
        return Point::new(x, y + h.copysign(dy));
    }
    if dy == 0.0 {
        return Point::new(x + w.copysign(dx), y);
    }

    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };
    Point::new(x + sx, y + sy)
}

/// Removes interior points that lie on the line through their neighbours.
pub fn elide_collinear(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut out: Vec<Point> = vec![points[0]];
    for i in 1..points.len() - 1 {
        let a = *out.last().unwrap_or(&points[0]);
        let b = points[i];
        let c = points[i + 1];
        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        let scale = ((c.x - a.x).abs() + (c.y - a.y).abs()).max(1.0);
        if cross.abs() > 1e-9 * scale * scale {
            out.push(b);
        }
    }
    out.push(points[points.len() - 1]);
    out
}
