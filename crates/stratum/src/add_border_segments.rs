//! Per-rank left/right border nodes for subgraphs.
//!
//! Every subgraph gets one zero-size `Border` dummy on each side of every rank it spans, chained
//! top to bottom. Ordering keeps them at the ends of the subgraph's block and positioning turns
//! them into the box edges; [`remove_border_nodes`] reads the box back and drops them.

use crate::LayoutGraph;
use crate::error::Result;
use crate::model::{BorderSide, Dummy, EdgeLabel, NodeLabel};
use crate::util::add_dummy_node;

pub fn add_border_segments(g: &mut LayoutGraph) -> Result<()> {
    let subgraphs: Vec<(String, i32, i32)> = g
        .iter_nodes()
        .filter(|(id, _)| g.has_children(id))
        .filter_map(|(id, n)| Some((id.to_string(), n.min_rank?, n.max_rank?)))
        .collect();

    for (sg, min_rank, max_rank) in subgraphs {
        let mut left: Vec<String> = Vec::new();
        let mut right: Vec<String> = Vec::new();
        for rank in min_rank..=max_rank {
            for (side, prefix, out) in [
                (BorderSide::Left, "_bl", &mut left),
                (BorderSide::Right, "_br", &mut right),
            ] {
                let id = add_dummy_node(
                    g,
                    prefix,
                    NodeLabel {
                        rank: Some(rank),
                        dummy: Some(Dummy::Border),
                        border_side: Some(side),
                        ..Default::default()
                    },
                );
                g.set_parent(&id, Some(&sg))?;
                if let Some(prev) = out.last() {
                    g.add_edge_auto(prev, &id, EdgeLabel::new(1.0, 1))?;
                }
                out.push(id);
            }
        }
        if let Some(n) = g.node_mut(&sg) {
            n.border_left = left;
            n.border_right = right;
        }
    }
    Ok(())
}

/// Sets every subgraph's box from its border segments, then removes the segments.
///
/// Horizontally the box runs from the leftmost left border to the rightmost right border;
/// vertically from the row of its first rank to the row of its last.
pub fn remove_border_nodes(g: &mut LayoutGraph) {
    let subgraphs: Vec<String> = g
        .iter_nodes()
        .filter(|(_, n)| !n.border_left.is_empty())
        .map(|(id, _)| id.to_string())
        .collect();

    for sg in &subgraphs {
        let Some(n) = g.node(sg) else {
            continue;
        };
        let coords = |ids: &[String]| -> Vec<(f64, f64)> {
            ids.iter()
                .filter_map(|b| g.node(b))
                .filter_map(|b| Some((b.x?, b.y?)))
                .collect()
        };
        let left = coords(&n.border_left);
        let right = coords(&n.border_right);
        if left.is_empty() || right.is_empty() {
            continue;
        }
        let l = left.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let r = right.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let t = left.iter().chain(&right).map(|p| p.1).fold(f64::INFINITY, f64::min);
        let b = left.iter().chain(&right).map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

        let width = (r - l).abs();
        let height = (b - t).abs();
        if let Some(n) = g.node_mut(sg) {
            n.width = width;
            n.height = height;
            n.x = Some(l + width / 2.0);
            n.y = Some(t + height / 2.0);
        }
    }

    let borders: Vec<String> = g
        .iter_nodes()
        .filter(|(_, n)| n.dummy == Some(Dummy::Border))
        .map(|(id, _)| id.to_string())
        .collect();
    for b in borders {
        g.remove_node(&b);
    }
    for sg in subgraphs {
        if let Some(n) = g.node_mut(&sg) {
            n.border_left.clear();
            n.border_right.clear();
        }
    }
}
