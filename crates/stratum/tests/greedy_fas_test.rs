use stratum::graph::{Graph, alg};
use stratum::greedy_fas::{greedy_fas, greedy_fas_with_weight};

fn graph(edges: &[(&str, &str, &str, i64)]) -> Graph<(), i64> {
    let mut g: Graph<(), i64> = Graph::new();
    for (_, v, w, _) in edges {
        g.add_node(*v, ());
        g.add_node(*w, ());
    }
    for (id, v, w, weight) in edges {
        g.add_edge(*id, v, w, *weight).unwrap();
    }
    g
}

fn without(mut g: Graph<(), i64>, fas: &[String]) -> Graph<(), i64> {
    for id in fas {
        g.remove_edge(id);
    }
    g
}

#[test]
fn greedy_fas_returns_nothing_for_an_empty_graph() {
    let g: Graph<(), i64> = Graph::new();
    assert!(greedy_fas(&g).is_empty());
}

#[test]
fn greedy_fas_returns_nothing_for_a_single_node() {
    let mut g: Graph<(), i64> = Graph::new();
    g.add_node("a", ());
    assert!(greedy_fas(&g).is_empty());
}

#[test]
fn greedy_fas_returns_nothing_for_an_acyclic_graph() {
    let g = graph(&[
        ("ab", "a", "b", 1),
        ("bc", "b", "c", 1),
        ("bd", "b", "d", 1),
        ("ae", "a", "e", 1),
    ]);
    assert!(greedy_fas(&g).is_empty());
}

#[test]
fn greedy_fas_ignores_self_loops() {
    let g = graph(&[("aa", "a", "a", 1), ("ab", "a", "b", 1)]);
    assert!(greedy_fas(&g).is_empty());
}

#[test]
fn greedy_fas_breaks_a_two_node_cycle_with_one_edge() {
    let g = graph(&[("ab", "a", "b", 1), ("ba", "b", "a", 1)]);
    let fas = greedy_fas(&g);
    assert_eq!(fas.len(), 1);
    assert!(alg::is_acyclic(&without(g, &fas)));
}

#[test]
fn greedy_fas_breaks_every_cycle_of_a_larger_graph() {
    let g = graph(&[
        ("n1", "a", "b", 1),
        ("n2", "b", "c", 1),
        ("n3", "c", "d", 1),
        ("n4", "d", "a", 1),
        ("n5", "e", "f", 1),
        ("n6", "f", "g", 1),
        ("n7", "g", "e", 1),
        ("n8", "d", "e", 1),
        ("n9", "g", "h", 1),
        ("n10", "h", "f", 1),
    ]);
    let fas = greedy_fas(&g);
    assert!(!fas.is_empty());
    // Eades, Lin and Smyth bound: m/2 - n/6.
    assert!(fas.len() <= g.edge_count() / 2 - g.node_count() / 6);
    assert!(alg::is_acyclic(&without(g, &fas)));
}

#[test]
fn greedy_fas_with_weight_cuts_the_lighter_direction() {
    let g = graph(&[("ab", "a", "b", 2), ("ba", "b", "a", 1)]);
    assert_eq!(greedy_fas_with_weight(&g, |w| *w as f64), vec!["ba"]);

    let g = graph(&[("ab", "a", "b", 1), ("ba", "b", "a", 2)]);
    assert_eq!(greedy_fas_with_weight(&g, |w| *w as f64), vec!["ab"]);
}

#[test]
fn greedy_fas_with_weight_returns_every_parallel_edge_of_a_cut_pair() {
    let g = graph(&[
        ("ab1", "a", "b", 1),
        ("ab2", "a", "b", 1),
        ("ba", "b", "a", 5),
    ]);
    assert_eq!(greedy_fas_with_weight(&g, |w| *w as f64), vec!["ab1", "ab2"]);
}

#[test]
fn greedy_fas_with_weight_cuts_a_zero_weight_edge_of_a_cycle() {
    let g = graph(&[("ab", "a", "b", 0), ("ba", "b", "a", 1)]);
    let fas = greedy_fas_with_weight(&g, |w| *w as f64);
    assert_eq!(fas, vec!["ab"]);
    assert!(alg::is_acyclic(&without(g, &fas)));
}

#[test]
fn greedy_fas_with_weight_keeps_fractional_weights_apart() {
    let mut g: Graph<(), f64> = Graph::new();
    g.add_node("a", ());
    g.add_node("b", ());
    g.add_edge("ab", "a", "b", 0.4).unwrap();
    g.add_edge("ba", "b", "a", 0.3).unwrap();
    assert_eq!(greedy_fas_with_weight(&g, |w| *w), vec!["ba"]);
}

#[test]
fn greedy_fas_with_weight_handles_huge_weights() {
    let g = graph(&[
        ("ab", "a", "b", 1_000_000_000_000),
        ("bc", "b", "c", 1),
        ("ca", "c", "a", i64::MAX / 4),
    ]);
    let fas = greedy_fas_with_weight(&g, |w| *w as f64);
    assert_eq!(fas, vec!["bc"]);
    assert!(alg::is_acyclic(&without(g, &fas)));
}

#[test]
fn greedy_fas_with_weight_ignores_non_finite_weights() {
    let mut g: Graph<(), f64> = Graph::new();
    for v in ["a", "b", "c"] {
        g.add_node(v, ());
    }
    g.add_edge("ab", "a", "b", f64::NAN).unwrap();
    g.add_edge("bc", "b", "c", f64::INFINITY).unwrap();
    g.add_edge("ca", "c", "a", 1.0).unwrap();
    let fas = greedy_fas_with_weight(&g, |w| *w);
    assert_eq!(fas.len(), 1);
}
