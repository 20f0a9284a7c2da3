use stratum::rank::feasible_tree::feasible_tree;
use stratum::rank::network_simplex::{network_simplex, total_span};
use stratum::rank::util::longest_path;
use stratum::rank::{self, RankGraph};
use stratum::{EdgeLabel, LayoutGraph, NodeLabel, Ranker};

/// Edges are `(v, w, minlen, weight)` over nodes `0..n`.
fn rank_graph(n: usize, edges: &[(usize, usize, i32, f64)]) -> RankGraph {
    let mut rg = RankGraph::with_nodes((0..n).map(|i| format!("n{i}")).collect());
    for &(v, w, minlen, weight) in edges {
        rg.add_edge(v, w, minlen, weight);
    }
    rg
}

fn assert_feasible(rg: &RankGraph, ranks: &[i32]) {
    for (e, edge) in rg.edges.iter().enumerate() {
        assert!(
            rg.slack(ranks, e) >= 0,
            "edge {} -> {} spans {} < minlen {}",
            edge.v,
            edge.w,
            ranks[edge.w] - ranks[edge.v],
            edge.minlen
        );
    }
}

fn normalized(ranks: &[i32]) -> Vec<i32> {
    let min = ranks.iter().copied().min().unwrap_or(0);
    ranks.iter().map(|r| r - min).collect()
}

#[test]
fn rank_graph_merges_parallel_edges() {
    let rg = rank_graph(2, &[(0, 1, 1, 1.0), (0, 1, 3, 2.0)]);
    assert_eq!(rg.edges.len(), 1);
    assert_eq!(rg.edges[0].minlen, 3);
    assert_eq!(rg.edges[0].weight, 3.0);
}

#[test]
fn longest_path_puts_sinks_at_zero() {
    let rg = rank_graph(4, &[(0, 1, 1, 1.0), (1, 2, 1, 1.0), (0, 3, 1, 1.0)]);
    let ranks = longest_path(&rg);
    assert_eq!(ranks, vec![-2, -1, 0, 0]);
    assert_feasible(&rg, &ranks);
}

#[test]
fn longest_path_respects_minlen() {
    let rg = rank_graph(3, &[(0, 1, 2, 1.0), (1, 2, 3, 1.0)]);
    assert_eq!(normalized(&longest_path(&rg)), vec![0, 2, 5]);
}

#[test]
fn feasible_tree_spans_a_connected_graph_with_tight_edges() {
    let rg = rank_graph(
        5,
        &[(0, 1, 1, 1.0), (1, 2, 1, 1.0), (2, 3, 1, 1.0), (0, 4, 1, 1.0)],
    );
    let mut ranks = longest_path(&rg);
    let tree = feasible_tree(&rg, &mut ranks);

    assert_eq!(tree.edge_count(), 4);
    assert_feasible(&rg, &ranks);
    for (e, in_tree) in tree.in_tree.iter().enumerate() {
        if *in_tree {
            assert_eq!(rg.slack(&ranks, e), 0);
        }
    }
}

#[test]
fn feasible_tree_builds_one_tree_per_component() {
    let rg = rank_graph(4, &[(0, 1, 1, 1.0), (2, 3, 1, 1.0)]);
    let mut ranks = longest_path(&rg);
    let tree = feasible_tree(&rg, &mut ranks);
    assert_eq!(tree.roots.len(), 2);
    assert_eq!(tree.edge_count(), 2);
}

#[test]
fn network_simplex_ranks_a_single_node_at_zero() {
    let rg = rank_graph(1, &[]);
    assert_eq!(network_simplex(&rg), vec![0]);
}

#[test]
fn network_simplex_pulls_a_short_branch_up() {
    // a -> b -> c -> d and a -> e: longest path leaves e three ranks below a.
    let rg = rank_graph(
        5,
        &[(0, 1, 1, 1.0), (1, 2, 1, 1.0), (2, 3, 1, 1.0), (0, 4, 1, 1.0)],
    );
    let ranks = network_simplex(&rg);
    assert_feasible(&rg, &ranks);
    assert_eq!(total_span(&rg, &ranks), 4.0);
    assert_eq!(ranks[4] - ranks[0], 1);
}

#[test]
fn network_simplex_minimizes_weighted_length() {
    let rg = rank_graph(
        4,
        &[(0, 1, 2, 1.0), (0, 2, 1, 1.0), (1, 3, 1, 1.0), (2, 3, 1, 1.0)],
    );
    let ranks = network_simplex(&rg);
    assert_feasible(&rg, &ranks);
    assert_eq!(total_span(&rg, &ranks), 6.0);
}

#[test]
fn network_simplex_shortens_the_heavier_edge() {
    // Two routes from 0 to 3 of different length; node 4 hangs off both ends and must sit
    // next to the end with the heavier edge.
    let rg = rank_graph(
        5,
        &[
            (0, 1, 1, 1.0),
            (1, 2, 1, 1.0),
            (2, 3, 1, 1.0),
            (0, 4, 1, 5.0),
            (4, 3, 1, 1.0),
        ],
    );
    let ranks = network_simplex(&rg);
    assert_feasible(&rg, &ranks);
    assert_eq!(ranks[4] - ranks[0], 1);
    assert_eq!(total_span(&rg, &ranks), 10.0);
}

#[test]
fn network_simplex_never_does_worse_than_longest_path() {
    let mut edges: Vec<(usize, usize, i32, f64)> = Vec::new();
    for i in 0..30 {
        edges.push((i, i + 1, 1, 1.0));
        if i + 3 <= 30 {
            edges.push((i, i + 3, 2, 0.5));
        }
        if i % 4 == 0 && i + 7 <= 30 {
            edges.push((i, i + 7, 1, 2.0));
        }
    }
    let rg = rank_graph(31, &edges);
    let ranks = network_simplex(&rg);
    assert_feasible(&rg, &ranks);
    assert!(total_span(&rg, &ranks) <= total_span(&rg, &longest_path(&rg)));
}

fn layout_graph(edges: &[(&str, &str, usize)]) -> LayoutGraph {
    let mut g = LayoutGraph::new();
    for (v, w, _) in edges {
        g.add_node(*v, NodeLabel::default());
        g.add_node(*w, NodeLabel::default());
    }
    for (i, (v, w, minlen)) in edges.iter().enumerate() {
        g.add_edge(format!("e{i}"), v, w, EdgeLabel::new(1.0, *minlen)).unwrap();
    }
    g
}

#[test]
fn rank_respects_minlen_for_every_ranker() {
    for ranker in [Ranker::NetworkSimplex, Ranker::TightTree, Ranker::LongestPath] {
        let mut g = layout_graph(&[
            ("a", "b", 1),
            ("b", "c", 2),
            ("a", "c", 1),
            ("c", "d", 1),
            ("e", "d", 3),
            ("a", "f", 2),
        ]);
        rank::rank(&mut g, ranker);
        for e in g.edges() {
            let v = g.node(e.source).unwrap().rank.unwrap();
            let w = g.node(e.target).unwrap().rank.unwrap();
            assert!(w - v >= e.data.minlen as i32, "{ranker:?}: {} too short", e.id);
        }
    }
}

#[test]
fn rank_skips_compound_nodes() {
    let mut g = layout_graph(&[("a", "b", 1)]);
    g.add_node("sg", NodeLabel::default());
    g.set_parent("a", Some("sg")).unwrap();
    rank::rank(&mut g, Ranker::NetworkSimplex);
    assert_eq!(g.node("sg").unwrap().rank, None);
    assert!(g.node("a").unwrap().rank.is_some());
}

#[test]
fn apply_layer_pins_moves_pinned_nodes_down() {
    let mut g = layout_graph(&[("a", "b", 1), ("b", "c", 1)]);
    g.node_mut("b").unwrap().layer = Some(3);
    rank::rank(&mut g, Ranker::NetworkSimplex);
    rank::apply_layer_pins(&mut g, 1);

    let r = |id: &str| g.node(id).unwrap().rank.unwrap();
    assert_eq!(r("b") - r("a"), 3);
    assert_eq!(r("c") - r("b"), 1);
}

#[test]
fn apply_layer_pins_never_breaks_minlen() {
    let mut g = layout_graph(&[("a", "b", 2), ("b", "c", 1)]);
    g.node_mut("b").unwrap().layer = Some(1);
    rank::rank(&mut g, Ranker::NetworkSimplex);
    rank::apply_layer_pins(&mut g, 1);

    let r = |id: &str| g.node(id).unwrap().rank.unwrap();
    assert_eq!(r("b") - r("a"), 2);
}

#[test]
fn apply_layer_pins_clamps_out_of_range_layers() {
    let mut g = layout_graph(&[("a", "b", 1)]);
    g.node_mut("b").unwrap().layer = Some(u32::MAX);
    rank::rank(&mut g, Ranker::NetworkSimplex);
    rank::apply_layer_pins(&mut g, usize::MAX);

    let r = |id: &str| g.node(id).unwrap().rank.unwrap();
    assert!(r("b") > r("a"));
    assert_eq!(r("a"), 0);
}
