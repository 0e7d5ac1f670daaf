//! Expansion of port definitions into concrete ports for one node.
//!
//! For every definition on the node's type, in declaration order:
//!
//! 1. Resolve the instance count from the node (malformed counts give 0).
//! 2. Build one [`Port`] per instance through the id/label generators,
//!    copying capacity and merging `dataType` + `dataTypes`.
//! 3. Apply the node's port override matching the generated id, or failing
//!    that the definition id. Disabled instances are dropped.
//! 4. Drop any instance whose id is already taken on this node, so port ids
//!    stay unique. The first port with an id wins.
//!
//! A node type without any port definitions gets one input on the left and
//! one output on the right.

use crate::ports::data_type::{self, DataType};
use crate::ports::definition::{normalize_definition, NodeTypeDefinition, PortDefinition, PortInstanceContext};
use crate::ports::placement::{get_side, normalize_placement, Placement};
use crate::ports::port::{Port, PortDirection};
use crate::types::{Node, NodeId, PortOverride};
use std::collections::HashSet;

/// Id of the inferred input port on a node type without definitions
pub const DEFAULT_INPUT_PORT_ID: &str = "input";
/// Id of the inferred output port on a node type without definitions
pub const DEFAULT_OUTPUT_PORT_ID: &str = "output";

/// Derive the concrete ports of `node`.
///
/// `node_type` is `None` when the registry does not know the node's type;
/// such nodes get the inferred default ports.
pub fn derive_ports(node: &Node, node_type: Option<&NodeTypeDefinition>) -> Vec<Port> {
    let definitions = node_type.map(|t| t.ports.as_slice()).unwrap_or(&[]);
    if definitions.is_empty() {
        return default_ports(&node.id);
    }

    let mut ports = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();
    for definition in definitions {
        let normalized = normalize_definition(definition);
        let total = normalized.instance_count(node);

        for index in 0..total {
            let ctx = PortInstanceContext {
                node,
                definition,
                index,
                total,
            };
            let id = normalized.port_id(&ctx);
            if taken.contains(&id) {
                tracing::debug!(
                    "Duplicate port id '{}' from '{}' on node {}, skipping",
                    id,
                    definition.id,
                    node.id
                );
                continue;
            }
            let label = normalized.port_label(&ctx);
            let port = port_from_definition(definition, &node.id, id, label, index, total);

            match apply_override(port, &node.port_overrides, &definition.id) {
                Some(port) => {
                    taken.insert(port.id.clone());
                    ports.push(port);
                }
                None => tracing::debug!(
                    "Port instance {} of '{}' disabled on node {}",
                    index,
                    definition.id,
                    node.id
                ),
            }
        }
    }
    ports
}

/// The two ports inferred for a node type that declares none.
pub fn default_ports(node_id: &NodeId) -> Vec<Port> {
    let mut input = Port::input(node_id.clone(), DEFAULT_INPUT_PORT_ID);
    input.label = "Input".to_string();
    let mut output = Port::output(node_id.clone(), DEFAULT_OUTPUT_PORT_ID);
    output.label = "Output".to_string();
    vec![input, output]
}

/// Build a single port instance from its definition.
///
/// The resolved side falls back to the direction's natural side when the
/// definition carries no side information.
pub fn port_from_definition(
    definition: &PortDefinition,
    node_id: &NodeId,
    id: String,
    label: String,
    index: usize,
    total: usize,
) -> Port {
    let placement: Option<Placement> = definition
        .placement
        .as_ref()
        .map(|input| normalize_placement(Some(input)));
    let position = get_side(placement.as_ref(), definition.direction.default_side());

    let tags = data_type::merge(
        &data_type::normalize(definition.data_type.as_ref()),
        definition.data_types.as_deref().unwrap_or(&[]),
    );

    Port {
        id,
        definition_id: Some(definition.id.clone()),
        direction: definition.direction,
        label,
        node_id: node_id.clone(),
        position,
        placement,
        data_type: DataType::from_tags(tags),
        max_connections: definition.max_connections,
        instance_index: index,
        instance_total: total,
        allowed_node_types: definition.allowed_node_types.clone(),
        allowed_port_types: definition.allowed_port_types.clone(),
    }
}

fn apply_override(mut port: Port, overrides: &[PortOverride], definition_id: &str) -> Option<Port> {
    let matched = overrides
        .iter()
        .find(|o| o.port_id == port.id)
        .or_else(|| overrides.iter().find(|o| o.port_id == definition_id));

    let Some(port_override) = matched else {
        return Some(port);
    };
    if port_override.disabled {
        return None;
    }
    if let Some(max) = port_override.max_connections {
        port.max_connections = Some(max);
    }
    if let Some(types) = &port_override.allowed_node_types {
        port.allowed_node_types = Some(types.clone());
    }
    if let Some(types) = &port_override.allowed_port_types {
        port.allowed_port_types = Some(types.clone());
    }
    Some(port)
}

/// Ports with the given direction, in derivation order
pub fn ports_with_direction(ports: &[Port], direction: PortDirection) -> impl Iterator<Item = &Port> {
    ports.iter().filter(move |p| p.direction == direction)
}
