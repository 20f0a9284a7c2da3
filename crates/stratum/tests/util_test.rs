use stratum::util::{
    build_layer_matrix, elide_collinear, intersect_rect, normalize_ranks, remove_empty_ranks,
};
use stratum::{EdgeLabel, LayoutGraph, NodeLabel, Point};

fn ranked(ranks: &[(&str, i32)]) -> LayoutGraph {
    let mut g = LayoutGraph::new();
    for (id, rank) in ranks {
        g.add_node(
            *id,
            NodeLabel {
                rank: Some(*rank),
                ..Default::default()
            },
        );
    }
    g
}

fn rank_of(g: &LayoutGraph, id: &str) -> Option<i32> {
    g.node(id).unwrap().rank
}

fn boxed(width: f64, height: f64) -> NodeLabel {
    NodeLabel {
        x: Some(0.0),
        y: Some(0.0),
        ..NodeLabel::new(width, height)
    }
}

#[test]
fn intersect_rect_hits_the_top_and_bottom_sides() {
    let node = boxed(20.0, 10.0);
    assert_eq!(intersect_rect(&node, Point::new(0.0, 100.0)), Point::new(0.0, 5.0));
    assert_eq!(intersect_rect(&node, Point::new(0.0, -100.0)), Point::new(0.0, -5.0));
}

#[test]
fn intersect_rect_hits_the_left_and_right_sides() {
    let node = boxed(20.0, 10.0);
    assert_eq!(intersect_rect(&node, Point::new(100.0, 10.0)), Point::new(10.0, 1.0));
    assert_eq!(intersect_rect(&node, Point::new(-100.0, 0.0)), Point::new(-10.0, 0.0));
}

#[test]
fn intersect_rect_returns_the_center_for_a_degenerate_segment() {
    let node = boxed(20.0, 10.0);
    assert_eq!(intersect_rect(&node, Point::new(0.0, 0.0)), Point::new(0.0, 0.0));
}

#[test]
fn intersect_rect_handles_zero_sized_boxes() {
    let thin = boxed(0.0, 20.0);
    assert_eq!(intersect_rect(&thin, Point::new(0.0, 45.0)), Point::new(0.0, 10.0));
    assert_eq!(intersect_rect(&thin, Point::new(0.0, -45.0)), Point::new(0.0, -10.0));

    let flat = boxed(20.0, 0.0);
    assert_eq!(intersect_rect(&flat, Point::new(-30.0, 0.0)), Point::new(-10.0, 0.0));

    let dot = boxed(0.0, 0.0);
    for towards in [Point::new(0.0, 5.0), Point::new(5.0, 0.0), Point::new(3.0, 4.0)] {
        assert_eq!(intersect_rect(&dot, towards), Point::new(0.0, 0.0));
    }
}

#[test]
fn elide_collinear_drops_points_on_straight_runs() {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 5.0),
        Point::new(0.0, 10.0),
        Point::new(5.0, 10.0),
    ];
    assert_eq!(
        elide_collinear(&points),
        vec![Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(5.0, 10.0)]
    );
}

#[test]
fn elide_collinear_keeps_short_polylines() {
    let points = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
    assert_eq!(elide_collinear(&points), points);
}

#[test]
fn normalize_ranks_shifts_the_minimum_to_zero() {
    let mut g = ranked(&[("a", -2), ("b", 1)]);
    g.node_mut("b").unwrap().min_rank = Some(-1);
    normalize_ranks(&mut g);
    assert_eq!(rank_of(&g, "a"), Some(0));
    assert_eq!(rank_of(&g, "b"), Some(3));
    assert_eq!(g.node("b").unwrap().min_rank, Some(1));
}

#[test]
fn remove_empty_ranks_closes_gaps() {
    let mut g = ranked(&[("a", 0), ("b", 2), ("c", 5)]);
    remove_empty_ranks(&mut g, 0, |_, e| e.minlen);
    assert_eq!(rank_of(&g, "a"), Some(0));
    assert_eq!(rank_of(&g, "b"), Some(2));
    assert_eq!(rank_of(&g, "c"), Some(5));

    let mut g = ranked(&[("a", 0), ("b", 3)]);
    remove_empty_ranks(&mut g, 2, |_, e| e.minlen);
    assert_eq!(rank_of(&g, "a"), Some(0));
    assert_eq!(rank_of(&g, "b"), Some(2));
}

#[test]
fn remove_empty_ranks_keeps_real_edges_at_their_minimum_span() {
    let mut g = ranked(&[("a", 0), ("b", 7), ("c", 3)]);
    g.add_edge("ab", "a", "b", EdgeLabel::new(1.0, 7)).unwrap();
    remove_empty_ranks(&mut g, 3, |_, e| e.minlen);
    assert_eq!(rank_of(&g, "a"), Some(0));
    assert_eq!(rank_of(&g, "c"), Some(3));
    assert_eq!(rank_of(&g, "b"), Some(7));

    // A nesting-scaled edge only needs its original span.
    let mut g = ranked(&[("a", 0), ("b", 7)]);
    g.add_edge("ab", "a", "b", EdgeLabel::new(1.0, 7)).unwrap();
    remove_empty_ranks(&mut g, 3, |_, _| 3);
    assert_eq!(rank_of(&g, "b"), Some(3));
}

#[test]
fn remove_empty_ranks_ignores_nesting_edges() {
    let mut g = ranked(&[("a", 0), ("b", 4)]);
    let label = EdgeLabel {
        nesting: true,
        ..EdgeLabel::new(1.0, 4)
    };
    g.add_edge("ab", "a", "b", label).unwrap();
    remove_empty_ranks(&mut g, 3, |_, e| e.minlen);
    assert_eq!(rank_of(&g, "b"), Some(2));
}

#[test]
fn build_layer_matrix_sorts_each_rank_by_order() {
    let mut g = ranked(&[("a", 0), ("b", 0), ("c", 1)]);
    g.node_mut("a").unwrap().order = Some(1);
    g.node_mut("b").unwrap().order = Some(0);
    g.node_mut("c").unwrap().order = Some(0);
    g.add_node("unranked", NodeLabel::default());

    assert_eq!(
        build_layer_matrix(&g),
        vec![
            vec!["b".to_string(), "a".to_string()],
            vec!["c".to_string()]
        ]
    );
}
