//! Test to verify test infrastructure works correctly

mod common;

use common::builders::{NodeBuilder, PortDefBuilder};
use nodeport_rs::ports::PortDirection;
use nodeport_rs::types::MaxConnections;

#[test]
fn test_infrastructure_setup() {
    // Test that builders work
    let node = NodeBuilder::new("n1", "mixer").at(5.0, 6.0).build();
    assert_eq!(node.node_type, "mixer");
    assert_eq!(node.position.y, 6.0);

    let def = PortDefBuilder::output("out").max(3).build();
    assert_eq!(def.direction, PortDirection::Output);
    assert_eq!(def.max_connections, Some(MaxConnections::Limited(3)));
}

#[test]
fn test_graph_fixture_loads() {
    let (catalog, graph) = common::load_graph(r#"{"nodeTypes": [{"type": "t"}], "nodes": [{"id": "a", "type": "t"}]}"#);
    assert_eq!(catalog.len(), 1);
    assert_eq!(graph.nodes.len(), 1);
}

#[test]
fn test_float_comparison() {
    common::assert_float_eq(1.0, 1.0000001, 0.001);
}

#[test]
#[should_panic]
fn test_float_comparison_fails() {
    common::assert_float_eq(1.0, 2.0, 0.001);
}
