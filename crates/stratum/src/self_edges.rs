//! Self-loops.
//!
//! Loops are parked on their node before cycle breaking (they never constrain ranks), get a
//! label-sized `SelfEdge` dummy right of the node once the order is known, and are drawn as a
//! five-point loop after positioning.

use crate::LayoutGraph;
use crate::error::Result;
use crate::model::{Dummy, NodeLabel, Point, SelfEdge};
use crate::util::{add_dummy_node, build_layer_matrix};
use rustc_hash::FxHashMap;

pub fn remove_self_edges(g: &mut LayoutGraph) {
    let loops: Vec<(String, String)> = g
        .edges()
        .filter(|e| e.source == e.target)
        .map(|e| (e.id.to_string(), e.source.to_string()))
        .collect();
    for (id, v) in loops {
        let Some(label) = g.remove_edge(&id) else {
            continue;
        };
        if let Some(n) = g.node_mut(&v) {
            n.self_edges.push(SelfEdge { id, label });
        }
    }
}

/// Inserts one dummy per parked loop directly right of its node and renumbers the rank.
pub fn insert_self_edges(g: &mut LayoutGraph) -> Result<()> {
    for layer in build_layer_matrix(g) {
        let mut order = 0usize;
        for v in &layer {
            let Some(node) = g.node_mut(v) else {
                continue;
            };
            node.order = Some(order);
            order += 1;
            let rank = node.rank;
            let loops: Vec<SelfEdge> = node.self_edges.clone();
            let parent = g.parent(v).map(String::from);

            for se in loops {
                let d = add_dummy_node(
                    g,
                    "_se",
                    NodeLabel {
                        width: se.label.width,
                        height: se.label.height,
                        rank,
                        order: Some(order),
                        dummy: Some(Dummy::SelfEdge),
                        edge_id: Some(se.id.clone()),
                        ..Default::default()
                    },
                );
                order += 1;
                if parent.is_some() {
                    g.set_parent(&d, parent.as_deref())?;
                }
            }
        }
    }
    Ok(())
}

/// Turns every `SelfEdge` dummy back into its loop: five points hugging the node's right side,
/// reaching out to the dummy's position, with the label at the dummy.
pub fn position_self_edges(g: &mut LayoutGraph) -> Result<()> {
    let dummies: FxHashMap<String, (String, f64, f64)> = g
        .iter_nodes()
        .filter(|(_, n)| n.dummy == Some(Dummy::SelfEdge))
        .filter_map(|(id, n)| Some((n.edge_id.clone()?, (id.to_string(), n.x?, n.y?))))
        .collect();
    let owners: Vec<String> = g
        .iter_nodes()
        .filter(|(_, n)| !n.self_edges.is_empty())
        .map(|(id, _)| id.to_string())
        .collect();

    for v in owners {
        let Some(node) = g.node_mut(&v) else {
            continue;
        };
        let loops = std::mem::take(&mut node.self_edges);
        let center = node.x.zip(node.y);
        let right = node.x.unwrap_or(0.0) + node.width / 2.0;
        let half_height = node.height / 2.0;

        for se in loops {
            let mut label = se.label;
            if let Some((dummy, x, y)) = dummies.get(&se.id) {
                if let Some((_, vy)) = center {
                    let reach = x - right;
                    label.points = vec![
                        Point::new(right + 2.0 * reach / 3.0, vy - half_height),
                        Point::new(right + 5.0 * reach / 6.0, vy - half_height),
                        Point::new(right + reach, vy),
                        Point::new(right + 5.0 * reach / 6.0, vy + half_height),
                        Point::new(right + 2.0 * reach / 3.0, vy + half_height),
                    ];
                    label.x = Some(*x);
                    label.y = Some(*y);
                }
                g.remove_node(dummy);
            }
            g.add_edge(se.id, &v, &v, label)?;
        }
    }
    Ok(())
}
