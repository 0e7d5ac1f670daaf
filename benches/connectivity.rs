//! Benchmarks for connectivity queries and port geometry
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nodeport_rs::config::LayoutSettings;
use nodeport_rs::connect::{connectable_node_types, connectable_port_ids, DerivedPorts, GraphSnapshot, PortCache};
use nodeport_rs::ports::{
    compute_node_port_positions, derive_ports, NodeTypeCatalog, NodeTypeDefinition, NodeTypeRegistry, Port,
    PortDefinition, Side, SidePlacement,
};
use nodeport_rs::types::{Connection, Node, PortKey, Position, Size};

fn catalog() -> NodeTypeCatalog {
    NodeTypeCatalog::from_definitions([
        NodeTypeDefinition::new("source")
            .with_port(PortDefinition::output("out", "Out").with_data_type("signal").unlimited()),
        NodeTypeDefinition::new("filter")
            .with_port(PortDefinition::input("in", "In").with_data_type("signal").with_instances(2))
            .with_port(PortDefinition::output("out", "Out").with_data_types(["signal", "table"])),
        NodeTypeDefinition::new("sink").with_port(PortDefinition::input("in", "In").with_data_type("table")),
    ])
}

/// A chain-like graph of `nodes` nodes cycling through the three types
fn graph(nodes: usize) -> GraphSnapshot {
    let kinds = ["source", "filter", "sink"];
    let mut graph = GraphSnapshot::new();
    for i in 0..nodes {
        graph = graph.with_node(Node::new(format!("n{}", i), kinds[i % 3]).at(i as f64 * 10.0, 0.0));
    }
    for i in (0..nodes.saturating_sub(1)).step_by(3) {
        graph = graph.with_connection(Connection::new(
            format!("c{}", i),
            PortKey::new(format!("n{}", i), "out"),
            PortKey::new(format!("n{}", i + 1), "in-1"),
        ));
    }
    graph
}

fn bench_connectable_port_ids(c: &mut Criterion) {
    let mut group = c.benchmark_group("connectable_port_ids");
    let registry = catalog();

    for size in [50, 200].iter() {
        let graph = graph(*size);
        let from = Port::output("n0", "out").with_definition_id("out");
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("derived", size), size, |b, _| {
            let provider = DerivedPorts::new(&graph, &registry);
            b.iter(|| black_box(connectable_port_ids(&from, &graph, &registry, &provider)));
        });

        group.bench_with_input(BenchmarkId::new("cached", size), size, |b, _| {
            let cache = PortCache::build(&graph, &registry);
            b.iter(|| black_box(connectable_port_ids(&from, &graph, &registry, &cache)));
        });
    }

    group.finish();
}

fn bench_connectable_node_types(c: &mut Criterion) {
    let registry = catalog();
    let graph = graph(200);
    let from = Port::output("n0", "out");

    c.bench_function("connectable_node_types", |b| {
        b.iter(|| black_box(connectable_node_types(&from, &graph, &registry)));
    });
}

fn bench_port_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("port_geometry");
    let settings = LayoutSettings::default();
    let sides = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    for count in [4, 16, 64].iter() {
        let ports: Vec<Port> = (0..*count)
            .map(|i| {
                Port::input("n", format!("p{}", i))
                    .with_placement(SidePlacement::new(sides[i % 4]).in_segment(format!("s{}", i % 3)))
            })
            .collect();
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                black_box(compute_node_port_positions(
                    Position::default(),
                    Size::new(240.0, 160.0),
                    &ports,
                    &settings,
                ))
            });
        });
    }

    group.finish();
}

fn bench_derive_ports(c: &mut Criterion) {
    let registry = catalog();
    let filter = registry.node_types()[1].clone();
    let node = Node::new("f", "filter");

    c.bench_function("derive_ports", |b| {
        b.iter(|| black_box(derive_ports(&node, Some(&*filter))));
    });
}

criterion_group!(
    benches,
    bench_connectable_port_ids,
    bench_connectable_node_types,
    bench_port_geometry,
    bench_derive_ports,
);

criterion_main!(benches);
