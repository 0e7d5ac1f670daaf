//! Whole-graph connectivity queries for drag affordances.
//!
//! Both queries call the validator once per candidate and keep no state
//! between calls, so they can run on every pointer move of a drag.

use crate::connect::graph::{GraphSnapshot, PortProvider};
use crate::connect::validator::{can_connect, ValidationContext};
use crate::ports::definition::NodeTypeDefinition;
use crate::ports::derive::{default_ports, port_from_definition};
use crate::ports::port::Port;
use crate::ports::registry::NodeTypeRegistry;
use crate::types::{NodeId, PortKey};
use std::collections::HashSet;
use std::sync::Arc;

/// Node id given to ports synthesized for node-type candidates. It never
/// matches a real node, so the same-node rule cannot fire on it.
pub const CANDIDATE_NODE_ID: &str = "__nodeport_candidate__";

fn node_type_of<R: NodeTypeRegistry + ?Sized>(
    port: &Port,
    graph: &GraphSnapshot,
    registry: &R,
) -> Option<Arc<NodeTypeDefinition>> {
    graph
        .node(&port.node_id)
        .and_then(|node| registry.node_type(&node.node_type))
}

/// Every port in `graph` that `from` could be connected to right now.
pub fn connectable_port_ids<R, P>(
    from: &Port,
    graph: &GraphSnapshot,
    registry: &R,
    ports: &P,
) -> HashSet<PortKey>
where
    R: NodeTypeRegistry + ?Sized,
    P: PortProvider + ?Sized,
{
    let from_type = node_type_of(from, graph, registry);
    let mut connectable = HashSet::new();

    for (node_id, node) in &graph.nodes {
        let node_type = registry.node_type(&node.node_type);
        let ctx = ValidationContext {
            from_node_type: from_type.as_deref(),
            to_node_type: node_type.as_deref(),
            connections: Some(graph.connections.as_slice()),
            nodes: Some(&graph.nodes),
        };
        for port in ports.ports(node_id).iter() {
            if can_connect(from, port, &ctx) {
                connectable.insert(port.key());
            }
        }
    }
    connectable
}

/// One representative port per definition of `node_type`, on the
/// candidate node.
pub fn candidate_ports(node_type: &NodeTypeDefinition) -> Vec<Port> {
    let node_id = NodeId::from(CANDIDATE_NODE_ID);
    if node_type.ports.is_empty() {
        return default_ports(&node_id);
    }
    node_type
        .ports
        .iter()
        .map(|def| port_from_definition(def, &node_id, def.id.clone(), def.label.clone(), 0, 1))
        .collect()
}

/// Registered node types with at least one port `from` could connect to,
/// in registration order.
pub fn connectable_node_types<R>(from: &Port, graph: &GraphSnapshot, registry: &R) -> Vec<String>
where
    R: NodeTypeRegistry + ?Sized,
{
    let from_type = node_type_of(from, graph, registry);

    registry
        .node_types()
        .into_iter()
        .filter(|candidate| {
            let ctx = ValidationContext {
                from_node_type: from_type.as_deref(),
                to_node_type: Some(&**candidate),
                connections: Some(graph.connections.as_slice()),
                nodes: Some(&graph.nodes),
            };
            candidate_ports(candidate)
                .iter()
                .any(|port| can_connect(from, port, &ctx))
        })
        .map(|candidate| candidate.node_type.clone())
        .collect()
}
