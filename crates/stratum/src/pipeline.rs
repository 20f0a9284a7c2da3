//! The `layout` entry point.
//!
//! All passes run on a private working graph built from the caller's graph; only results for ids
//! the caller owns are copied back, so synthetic nodes and edges never leak and a failed call
//! leaves the input untouched.

use crate::error::{Error, Result};
use crate::model::{EdgeLabel, LabelPos, LayoutExtent, MAX_MINLEN, NodeLabel, Point};
use crate::options::{LayoutOptions, RankDir};
use crate::util::{elide_collinear, intersect_rect, normalize_ranks, remove_empty_ranks};
use crate::{
    LayoutGraph, acyclic, add_border_segments, coordinate_system, nesting, normalize, order,
    parent_dummy_chains, position, rank, self_edges,
};
use rustc_hash::FxHashMap;

/// Lays out `g` in place: node `x`/`y`/`rank`/`order`, subgraph `width`/`height`, edge `points`
/// and edge label `x`/`y`. Returns the size of the drawing, margins included.
pub fn layout(g: &mut LayoutGraph, opts: &LayoutOptions) -> Result<LayoutExtent> {
    opts.validate()?;
    if let Some(id) = opts.node_order.iter().find(|id| !g.has_node(id)) {
        return Err(Error::UnknownNode { id: id.clone() });
    }

    let span = tracing::debug_span!("layout", nodes = g.node_count(), edges = g.edge_count());
    let _enter = span.enter();

    let (mut work, routed) = build_working_graph(g)?;
    let ranksep_scale = if opts.edge_label_space {
        make_space_for_edge_labels(&mut work, opts.rankdir);
        0.5
    } else {
        1.0
    };

    self_edges::remove_self_edges(&mut work);
    acyclic::run(&mut work, opts.acyclicer);
    let nesting = nesting::run(&mut work)?;
    rank::rank(&mut work, opts.ranker);
    let layer_unit = nesting.node_rank_factor * if opts.edge_label_space { 2 } else { 1 };
    rank::apply_layer_pins(&mut work, layer_unit);
    normalize::inject_edge_label_proxies(&mut work);
    remove_empty_ranks(&mut work, nesting.node_rank_factor, |id, e| nesting.min_span(id, e));
    nesting::record_rank_spans(&mut work);
    nesting::cleanup(&mut work, &nesting);
    normalize_ranks(&mut work);
    normalize::remove_edge_label_proxies(&mut work);
    tracing::debug!(ranks = crate::util::max_rank(&work).map_or(0, |r| r + 1), "layout: ranked");

    let chains = normalize::run(&mut work)?;
    parent_dummy_chains::parent_dummy_chains(&mut work, &chains)?;
    add_border_segments::add_border_segments(&mut work)?;

    let pins = opts.keep_node_order.then(|| order_pins(&work, &opts.node_order));
    let crossings = order::order(&mut work, pins.as_ref());
    tracing::debug!(crossings, "layout: ordered");

    self_edges::insert_self_edges(&mut work)?;
    coordinate_system::adjust(&mut work, opts.rankdir);
    position::position(&mut work, opts, ranksep_scale);
    self_edges::position_self_edges(&mut work)?;
    add_border_segments::remove_border_nodes(&mut work);
    normalize::undo(&mut work, &chains)?;
    if opts.edge_label_space {
        fixup_edge_label_coords(&mut work);
    }
    coordinate_system::undo(&mut work, opts.rankdir);
    place_unranked_labels(&mut work);

    let extent = position::translate_graph(&mut work, opts.marginx, opts.marginy);
    position::assign_node_intersects(&mut work);
    if !opts.control_points {
        for (_, e) in work.iter_edges_mut() {
            e.points = elide_collinear(&e.points);
        }
    }
    acyclic::undo(&mut work);

    write_back(g, &work, &routed);
    tracing::debug!(width = extent.width, height = extent.height, "layout: done");
    Ok(extent)
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Copies sizes, containment, edges and constraints into a fresh graph. Edges touching a compound
/// node are left out and returned separately; they are drawn straight once boxes are known.
fn build_working_graph(g: &LayoutGraph) -> Result<(LayoutGraph, Vec<String>)> {
    let mut work = LayoutGraph::new();
    for (id, n) in g.iter_nodes() {
        work.add_node(
            id,
            NodeLabel {
                width: sanitize(n.width),
                height: sanitize(n.height),
                layer: n.layer,
                ..Default::default()
            },
        );
    }
    for id in g.nodes() {
        if let Some(parent) = g.parent(id) {
            work.set_parent(id, Some(parent))?;
        }
    }

    let mut routed: Vec<String> = Vec::new();
    for e in g.edges() {
        if g.has_children(e.source) || g.has_children(e.target) {
            routed.push(e.id.to_string());
            continue;
        }
        if e.data.minlen > MAX_MINLEN {
            return Err(Error::MinlenTooLarge {
                id: e.id.to_string(),
                minlen: e.data.minlen,
                max: MAX_MINLEN,
            });
        }
        let label = EdgeLabel {
            weight: sanitize(e.data.weight),
            minlen: e.data.minlen.max(1),
            width: sanitize(e.data.width),
            height: sanitize(e.data.height),
            labelpos: e.data.labelpos,
            labeloffset: sanitize(e.data.labeloffset),
            ..Default::default()
        };
        work.add_edge(e.id, e.source, e.target, label)?;
    }
    Ok((work, routed))
}

/// Doubles every `minlen` so a label rank fits between any two ranks, and widens side-placed
/// labels by their offset along the rank axis.
fn make_space_for_edge_labels(g: &mut LayoutGraph, rankdir: RankDir) {
    for (_, e) in g.iter_edges_mut() {
        e.minlen = e.minlen.saturating_mul(2);
        if e.labelpos != LabelPos::C {
            if rankdir.is_horizontal() {
                e.height += e.labeloffset;
            } else {
                e.width += e.labeloffset;
            }
        }
    }
}

/// Moves side-placed labels off the edge line now that the edge position is known.
fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    for (_, e) in g.iter_edges_mut() {
        let Some(x) = e.x else {
            continue;
        };
        match e.labelpos {
            LabelPos::L => {
                e.width -= e.labeloffset;
                e.x = Some(x - e.width / 2.0 - e.labeloffset);
            }
            LabelPos::R => {
                e.width -= e.labeloffset;
                e.x = Some(x + e.width / 2.0 + e.labeloffset);
            }
            LabelPos::C => {}
        }
    }
}

/// Labels of edges that got no label rank (adjacent ranks without reserved label space) go
/// halfway between their endpoints.
fn place_unranked_labels(g: &mut LayoutGraph) {
    let midpoints: Vec<(String, Point)> = g
        .edges()
        .filter(|e| e.data.has_label() && e.data.x.is_none())
        .filter_map(|e| {
            let v = g.node(e.source)?;
            let w = g.node(e.target)?;
            let x = (v.x? + w.x?) / 2.0;
            let y = (v.y? + w.y?) / 2.0;
            Some((e.id.to_string(), Point::new(x, y)))
        })
        .collect();
    for (id, p) in midpoints {
        if let Some(e) = g.edge_mut(&id) {
            e.x = Some(p.x);
            e.y = Some(p.y);
        }
    }
}

/// `keep_node_order` slots: listed nodes first, in list order, then every other real node in
/// graph order.
fn order_pins(g: &LayoutGraph, node_order: &[String]) -> FxHashMap<String, usize> {
    let mut pins: FxHashMap<String, usize> = node_order
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();
    let mut next = pins.len();
    for (id, n) in g.iter_nodes() {
        if n.is_dummy() || g.has_children(id) || pins.contains_key(id) {
            continue;
        }
        pins.insert(id.to_string(), next);
        next += 1;
    }
    pins
}

fn write_back(g: &mut LayoutGraph, work: &LayoutGraph, routed: &[String]) {
    for (id, n) in g.iter_nodes_mut() {
        let Some(w) = work.node(id) else {
            continue;
        };
        n.x = w.x;
        n.y = w.y;
        n.rank = w.rank;
        n.order = w.order;
        if work.has_children(id) {
            n.width = w.width;
            n.height = w.height;
        }
    }

    let straight: FxHashMap<&str, Vec<Point>> = routed
        .iter()
        .filter_map(|id| {
            let (v, w) = g.endpoints(id).filter(|(v, w)| v != w)?;
            let (v, w) = (work.node(v)?, work.node(w)?);
            let (cv, cw) = (Point::new(v.x?, v.y?), Point::new(w.x?, w.y?));
            Some((id.as_str(), vec![intersect_rect(v, cw), intersect_rect(w, cv)]))
        })
        .collect();

    for (id, e) in g.iter_edges_mut() {
        if let Some(points) = straight.get(id) {
            e.points = points.clone();
            e.x = None;
            e.y = None;
            continue;
        }
        let Some(w) = work.edge(id) else {
            continue;
        };
        e.points = w.points.clone();
        e.x = w.x;
        e.y = w.y;
    }
}
