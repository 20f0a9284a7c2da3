use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use stratum::{EdgeLabel, LayoutGraph, LayoutOptions, NodeLabel, layout};

/// A layered DAG with a spine, short forward edges, a few back edges and optional clusters of
/// ten nodes each.
fn build_graph(node_count: usize, fanout: usize, clustered: bool) -> LayoutGraph {
    let mut g = LayoutGraph::new();
    for i in 0..node_count {
        let width = 40.0 + (i % 5) as f64 * 10.0;
        g.add_node(format!("n{i}"), NodeLabel::new(width, 30.0));
    }
    if clustered {
        for c in 0..node_count / 10 {
            let cluster = format!("cluster{c}");
            g.add_node(cluster.clone(), NodeLabel::default());
            for i in c * 10..(c * 10 + 10).min(node_count) {
                g.set_parent(&format!("n{i}"), Some(&cluster)).unwrap();
            }
        }
    }

    let mut add = |v: usize, w: usize, label: EdgeLabel| {
        g.add_edge_auto(&format!("n{v}"), &format!("n{w}"), label).unwrap();
    };
    for i in 0..node_count.saturating_sub(1) {
        add(i, i + 1, EdgeLabel::default());
    }
    for i in 0..node_count {
        for k in 2..=(fanout + 1) {
            if i + k < node_count && (i + k) % 3 != 0 {
                add(i, i + k, EdgeLabel::default());
            }
        }
        if i % 7 == 0 && i + 5 < node_count {
            let label = EdgeLabel {
                width: 24.0,
                height: 12.0,
                ..Default::default()
            };
            add(i, i + 5, label);
        }
        if i % 11 == 0 && i >= 6 {
            add(i, i - 6, EdgeLabel::default());
        }
    }
    g
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("dag_50_f2", 50usize, 2usize, false),
        ("dag_200_f3", 200usize, 3usize, false),
        ("clustered_200_f2", 200usize, 2usize, true),
    ];
    let opts = LayoutOptions::default();

    for (name, nodes, fanout, clustered) in cases {
        let g = build_graph(nodes, fanout, clustered);
        group.bench_with_input(BenchmarkId::new("layout", name), &g, |b, g| {
            b.iter_batched(
                || g.clone(),
                |mut g| {
                    let extent = layout(black_box(&mut g), &opts);
                    black_box(extent.ok());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
