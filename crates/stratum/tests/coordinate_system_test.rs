use stratum::{EdgeLabel, LayoutGraph, NodeLabel, Point, RankDir, coordinate_system};

fn graph() -> LayoutGraph {
    let mut g = LayoutGraph::new();
    g.add_node("a", NodeLabel::new(100.0, 200.0));
    g.add_node("b", NodeLabel::new(10.0, 20.0));
    let label = EdgeLabel {
        width: 30.0,
        height: 40.0,
        ..Default::default()
    };
    g.add_edge("ab", "a", "b", label).unwrap();
    g
}

fn place(g: &mut LayoutGraph) {
    let a = g.node_mut("a").unwrap();
    a.x = Some(1.0);
    a.y = Some(2.0);
    let e = g.edge_mut("ab").unwrap();
    e.x = Some(3.0);
    e.y = Some(4.0);
    e.points = vec![Point::new(5.0, 6.0)];
}

#[test]
fn adjust_leaves_vertical_layouts_alone() {
    for rankdir in [RankDir::TB, RankDir::BT] {
        let mut g = graph();
        coordinate_system::adjust(&mut g, rankdir);
        assert_eq!(g.node("a").unwrap().width, 100.0);
        assert_eq!(g.edge("ab").unwrap().width, 30.0);
    }
}

#[test]
fn adjust_swaps_width_and_height_for_horizontal_layouts() {
    for rankdir in [RankDir::LR, RankDir::RL] {
        let mut g = graph();
        coordinate_system::adjust(&mut g, rankdir);
        let a = g.node("a").unwrap();
        assert_eq!((a.width, a.height), (200.0, 100.0));
        let e = g.edge("ab").unwrap();
        assert_eq!((e.width, e.height), (40.0, 30.0));
    }
}

#[test]
fn undo_tb_changes_nothing() {
    let mut g = graph();
    place(&mut g);
    coordinate_system::undo(&mut g, RankDir::TB);
    let a = g.node("a").unwrap();
    assert_eq!((a.x, a.y), (Some(1.0), Some(2.0)));
}

#[test]
fn undo_bt_mirrors_y() {
    let mut g = graph();
    place(&mut g);
    coordinate_system::undo(&mut g, RankDir::BT);
    let a = g.node("a").unwrap();
    assert_eq!((a.x, a.y), (Some(1.0), Some(-2.0)));
    let e = g.edge("ab").unwrap();
    assert_eq!((e.x, e.y), (Some(3.0), Some(-4.0)));
    assert_eq!(e.points, vec![Point::new(5.0, -6.0)]);
}

#[test]
fn undo_lr_swaps_axes_back() {
    let mut g = graph();
    coordinate_system::adjust(&mut g, RankDir::LR);
    place(&mut g);
    coordinate_system::undo(&mut g, RankDir::LR);

    let a = g.node("a").unwrap();
    assert_eq!((a.x, a.y), (Some(2.0), Some(1.0)));
    assert_eq!((a.width, a.height), (100.0, 200.0));
    let e = g.edge("ab").unwrap();
    assert_eq!((e.x, e.y), (Some(4.0), Some(3.0)));
    assert_eq!(e.points, vec![Point::new(6.0, 5.0)]);
    assert_eq!((e.width, e.height), (30.0, 40.0));
}

#[test]
fn undo_rl_mirrors_then_swaps() {
    let mut g = graph();
    coordinate_system::adjust(&mut g, RankDir::RL);
    place(&mut g);
    coordinate_system::undo(&mut g, RankDir::RL);

    let a = g.node("a").unwrap();
    assert_eq!((a.x, a.y), (Some(-2.0), Some(1.0)));
}
