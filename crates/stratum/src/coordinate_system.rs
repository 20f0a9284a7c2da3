//! Rank direction handling.
//!
//! Positioning always works top to bottom. For `LR`/`RL` every box is rotated before positioning
//! (width and height swapped) and the coordinates are rotated back afterwards; `BT`/`RL` mirror y.

use crate::LayoutGraph;
use crate::options::RankDir;

pub fn adjust(g: &mut LayoutGraph, rankdir: RankDir) {
    if rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph, rankdir: RankDir) {
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    for (_, n) in g.iter_nodes_mut() {
        std::mem::swap(&mut n.width, &mut n.height);
        for se in &mut n.self_edges {
            std::mem::swap(&mut se.label.width, &mut se.label.height);
        }
    }
    for (_, e) in g.iter_edges_mut() {
        std::mem::swap(&mut e.width, &mut e.height);
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    for (_, n) in g.iter_nodes_mut() {
        n.y = n.y.map(|y| -y);
    }
    for (_, e) in g.iter_edges_mut() {
        for p in &mut e.points {
            p.y = -p.y;
        }
        e.y = e.y.map(|y| -y);
    }
}

fn swap_xy(g: &mut LayoutGraph) {
    for (_, n) in g.iter_nodes_mut() {
        std::mem::swap(&mut n.x, &mut n.y);
    }
    for (_, e) in g.iter_edges_mut() {
        for p in &mut e.points {
            std::mem::swap(&mut p.x, &mut p.y);
        }
        std::mem::swap(&mut e.x, &mut e.y);
    }
}
