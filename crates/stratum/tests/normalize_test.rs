use stratum::{Dummy, EdgeLabel, LabelPos, LayoutGraph, NodeLabel, Point, normalize};

fn graph(ranks: &[(&str, i32)]) -> LayoutGraph {
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

fn dummies(g: &LayoutGraph) -> Vec<String> {
    g.iter_nodes()
        .filter(|(_, n)| n.is_dummy())
        .map(|(id, _)| id.to_string())
        .collect()
}

#[test]
fn normalize_run_leaves_unit_edges_alone() {
    let mut g = graph(&[("a", 0), ("b", 1)]);
    g.add_edge("ab", "a", "b", EdgeLabel::default()).unwrap();
    let chains = normalize::run(&mut g).unwrap();

    assert!(chains.is_empty());
    assert_eq!(g.edge_ids(), vec!["ab"]);
    assert!(dummies(&g).is_empty());
}

#[test]
fn normalize_run_splits_a_long_edge_into_a_chain() {
    let mut g = graph(&[("a", 0), ("b", 3)]);
    g.add_edge("ab", "a", "b", EdgeLabel::new(2.0, 1)).unwrap();
    let chains = normalize::run(&mut g).unwrap();

    assert_eq!(chains.len(), 1);
    assert!(!g.has_edge("ab"));
    assert_eq!(dummies(&g).len(), 2);

    let first = &chains[0];
    assert_eq!(g.predecessors(first), vec!["a"]);
    let node = g.node(first).unwrap();
    assert_eq!(node.rank, Some(1));
    assert_eq!(node.dummy, Some(Dummy::Edge));
    assert_eq!(node.edge_id.as_deref(), Some("ab"));
    assert_eq!(node.edge_label.as_ref().map(|l| l.weight), Some(2.0));

    let second = g.successors(first)[0].to_string();
    assert_eq!(g.node(&second).unwrap().rank, Some(2));
    assert_eq!(g.successors(&second), vec!["b"]);
    for e in g.edges() {
        assert_eq!(e.data.minlen, 1);
        assert_eq!(e.data.weight, 2.0);
    }
}

#[test]
fn normalize_run_sizes_the_label_dummy() {
    let mut g = graph(&[("a", 0), ("b", 4)]);
    let label = EdgeLabel {
        width: 30.0,
        height: 12.0,
        labelpos: LabelPos::L,
        label_rank: Some(2),
        ..Default::default()
    };
    g.add_edge("ab", "a", "b", label).unwrap();
    normalize::run(&mut g).unwrap();

    let labels: Vec<&NodeLabel> = g
        .iter_nodes()
        .map(|(_, n)| n)
        .filter(|n| n.dummy == Some(Dummy::EdgeLabel))
        .collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].rank, Some(2));
    assert_eq!(labels[0].width, 30.0);
    assert_eq!(labels[0].height, 12.0);
    assert_eq!(labels[0].labelpos, Some(LabelPos::L));
}

#[test]
fn normalize_undo_restores_the_edge_with_points() {
    let mut g = graph(&[("a", 0), ("b", 3)]);
    let label = EdgeLabel {
        width: 10.0,
        height: 4.0,
        label_rank: Some(2),
        ..Default::default()
    };
    g.add_edge("ab", "a", "b", label).unwrap();
    let chains = normalize::run(&mut g).unwrap();

    let mut v = chains[0].clone();
    for y in [10.0, 20.0] {
        let n = g.node_mut(&v).unwrap();
        n.x = Some(5.0);
        n.y = Some(y);
        v = g.successors(&v)[0].to_string();
    }

    normalize::undo(&mut g, &chains).unwrap();

    assert!(dummies(&g).is_empty());
    assert_eq!(g.endpoints("ab"), Some(("a", "b")));
    let e = g.edge("ab").unwrap();
    assert_eq!(e.points, vec![Point::new(5.0, 10.0), Point::new(5.0, 20.0)]);
    assert_eq!((e.x, e.y), (Some(5.0), Some(20.0)));
    assert_eq!(e.width, 10.0);
}

#[test]
fn normalize_run_does_not_reuse_ids_of_removed_edges() {
    let mut g = graph(&[("a", 0), ("b", 2), ("c", 1)]);
    g.add_edge("_n1", "a", "b", EdgeLabel::default()).unwrap();
    g.add_edge("ac", "a", "c", EdgeLabel::default()).unwrap();
    let chains = normalize::run(&mut g).unwrap();
    normalize::undo(&mut g, &chains).unwrap();

    assert_eq!(g.endpoints("_n1"), Some(("a", "b")));
    assert_eq!(g.endpoints("ac"), Some(("a", "c")));
}

#[test]
fn edge_label_proxies_record_the_label_rank() {
    let mut g = graph(&[("a", 0), ("b", 4), ("c", 1)]);
    let labelled = EdgeLabel {
        width: 10.0,
        height: 10.0,
        ..Default::default()
    };
    g.add_edge("ab", "a", "b", labelled).unwrap();
    g.add_edge("ac", "a", "c", EdgeLabel::default()).unwrap();

    normalize::inject_edge_label_proxies(&mut g);
    let proxies: Vec<i32> = g
        .iter_nodes()
        .filter(|(_, n)| n.dummy == Some(Dummy::EdgeProxy))
        .filter_map(|(_, n)| n.rank)
        .collect();
    assert_eq!(proxies, vec![2]);

    normalize::remove_edge_label_proxies(&mut g);
    assert!(dummies(&g).is_empty());
    assert_eq!(g.edge("ab").unwrap().label_rank, Some(2));
    assert_eq!(g.edge("ac").unwrap().label_rank, None);
}
