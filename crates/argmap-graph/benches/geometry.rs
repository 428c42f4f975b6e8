use argmap_core::{Edge, Node, NodeId, Vec2};
use argmap_graph::{GeometrySettings, GraphSnapshot, SnapEngine, distribute_attachment_points};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn star_graph(spokes: usize) -> GraphSnapshot {
    let mut nodes = vec![Node::new("hub", Vec2::ZERO, Vec2::new(160.0, 80.0))];
    let mut edges = Vec::with_capacity(spokes);
    for i in 0..spokes {
        let angle = i as f32 / spokes as f32 * std::f32::consts::TAU;
        let pos = Vec2::new(angle.cos() * 600.0, angle.sin() * 600.0);
        let id = format!("n{i}");
        nodes.push(Node::new(id.clone(), pos, Vec2::new(120.0, 60.0)));
        edges.push(Edge::new(format!("e{i}"), "hub", id));
    }
    GraphSnapshot::new(nodes, edges)
}

fn bench_attachment(c: &mut Criterion) {
    let snapshot = star_graph(64);
    let settings = GeometrySettings::default();
    let hub = snapshot
        .node(&NodeId::from("hub"))
        .cloned()
        .expect("hub node present");

    c.bench_function("distribute_attachment_points_64", |b| {
        b.iter(|| {
            distribute_attachment_points(black_box(&snapshot), black_box(&hub), &settings)
        })
    });
}

fn bench_snap(c: &mut Criterion) {
    let snapshot = star_graph(2_000);
    let engine = SnapEngine::default();
    let dragged = NodeId::from("dragged");

    c.bench_function("snap_node_2000", |b| {
        b.iter(|| {
            engine.snap_node(
                &dragged,
                black_box(Vec2::new(13.0, 27.0)),
                Vec2::new(120.0, 60.0),
                snapshot.nodes(),
                1.0,
            )
        })
    });
}

criterion_group!(benches, bench_attachment, bench_snap);
criterion_main!(benches);
