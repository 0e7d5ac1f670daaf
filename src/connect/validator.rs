//! The connection rule cascade.
//!
//! [`validate_connection`] decides whether two ports may be linked. Steps
//! run in a fixed order and the first failure wins:
//!
//! 1. **Direction**: one output, one input, on different nodes
//! 2. **Duplicate**: no existing connection between the same two ports
//! 3. **Node validators**: every node-type `validate_connection` agrees
//! 4. **Data types**: the effective tag sets are compatible
//! 5. **Port predicates and allow-lists**: every port-level `can_connect`
//!    agrees, then `allowedNodeTypes` / `allowedPortTypes` on both ends
//! 6. **Capacity**: the input, then the output, still has room
//!
//! Everything past step 1 sees the ports normalized to output → input, so
//! the outcome does not depend on which end the user dragged from.
//!
//! A missing node-type definition is not an error. It only switches off the
//! steps that need one; direction, duplicate and capacity checks still run
//! on port-level data.

use crate::connect::resolve::{effective_data_types, effective_max_connections, port_type_id, resolve_port_definition};
use crate::ports::data_type;
use crate::ports::definition::{NodeTypeDefinition, PortConnectContext, PortDefinition};
use crate::ports::port::{Port, PortDirection};
use crate::types::{incoming_count, outgoing_count, Connection, MaxConnections, Node, NodeId, PortKey};
use std::collections::HashMap;
use thiserror::Error;

/// Everything besides the two ports that the cascade may consult.
///
/// `from_node_type` / `to_node_type` belong to the `from` / `to` arguments
/// as passed, before normalization.
#[derive(Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    pub from_node_type: Option<&'a NodeTypeDefinition>,
    pub to_node_type: Option<&'a NodeTypeDefinition>,
    /// Existing connections; `None` skips the duplicate check
    pub connections: Option<&'a [Connection]>,
    pub nodes: Option<&'a HashMap<NodeId, Node>>,
}

impl<'a> ValidationContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_types(
        mut self,
        from: Option<&'a NodeTypeDefinition>,
        to: Option<&'a NodeTypeDefinition>,
    ) -> Self {
        self.from_node_type = from;
        self.to_node_type = to;
        self
    }

    pub fn with_connections(mut self, connections: &'a [Connection]) -> Self {
        self.connections = Some(connections);
        self
    }

    pub fn with_nodes(mut self, nodes: &'a HashMap<NodeId, Node>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    /// The same context for the call with `from` and `to` exchanged
    pub fn reversed(self) -> Self {
        Self {
            from_node_type: self.to_node_type,
            to_node_type: self.from_node_type,
            ..self
        }
    }

    fn node(&self, id: &NodeId) -> Option<&'a Node> {
        self.nodes.and_then(|nodes| nodes.get(id))
    }
}

/// Why a connection was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionRejection {
    #[error("Both ports are {0} ports")]
    SameDirection(PortDirection),

    #[error("Ports belong to the same node {0}")]
    SameNode(NodeId),

    #[error("Connection {from} -> {to} already exists")]
    Duplicate { from: PortKey, to: PortKey },

    #[error("Node type '{node_type}' rejected the connection")]
    NodeValidator { node_type: String },

    #[error("Data types {from_types:?} and {to_types:?} are incompatible")]
    IncompatibleDataTypes {
        from_types: Vec<String>,
        to_types: Vec<String>,
    },

    #[error("Port {port} rejected the connection")]
    PortPredicate { port: PortKey },

    #[error("Port {port} does not accept node type {peer_type:?}")]
    NodeTypeNotAllowed {
        port: PortKey,
        peer_type: Option<String>,
    },

    #[error("Port {port} does not accept port type '{peer_type}'")]
    PortTypeNotAllowed { port: PortKey, peer_type: String },

    #[error("Port {port} is at capacity ({count}/{max})")]
    CapacityReached {
        port: PortKey,
        max: MaxConnections,
        count: usize,
    },
}

/// Order two ports as `(output, input)`.
///
/// Returns `None` when both have the same direction.
pub fn normalize_endpoints<'p>(a: &'p Port, b: &'p Port) -> Option<(&'p Port, &'p Port)> {
    match (a.direction, b.direction) {
        (PortDirection::Output, PortDirection::Input) => Some((a, b)),
        (PortDirection::Input, PortDirection::Output) => Some((b, a)),
        _ => None,
    }
}

/// Whether `from` and `to` may be connected.
pub fn can_connect(from: &Port, to: &Port, ctx: &ValidationContext<'_>) -> bool {
    validate_connection(from, to, ctx).is_ok()
}

/// Run the cascade and report the first rule that fails.
pub fn validate_connection(
    from: &Port,
    to: &Port,
    ctx: &ValidationContext<'_>,
) -> Result<(), ConnectionRejection> {
    run_cascade(from, to, ctx).inspect_err(|rejection| {
        tracing::trace!("Rejected {} -> {}: {}", from.key(), to.key(), rejection);
    })
}

/// One end of a normalized candidate.
struct Endpoint<'a> {
    port: &'a Port,
    node_type: Option<&'a NodeTypeDefinition>,
    definition: Option<&'a PortDefinition>,
    node: Option<&'a Node>,
}

impl<'a> Endpoint<'a> {
    fn new(port: &'a Port, node_type: Option<&'a NodeTypeDefinition>, ctx: &ValidationContext<'a>) -> Self {
        Self {
            port,
            node_type,
            definition: resolve_port_definition(node_type, port),
            node: ctx.node(&port.node_id),
        }
    }

    /// Node type string: from the definition, else from the node lookup
    fn type_name(&self) -> Option<&'a str> {
        self.node_type
            .map(|t| t.node_type.as_str())
            .or_else(|| self.node.map(|n| n.node_type.as_str()))
    }

    fn port_type(&self) -> &'a str {
        self.definition
            .map(|d| d.id.as_str())
            .unwrap_or_else(|| port_type_id(self.port))
    }

    fn allowed_node_types(&self) -> Option<&'a [String]> {
        self.port
            .allowed_node_types
            .as_deref()
            .or_else(|| self.definition.and_then(|d| d.allowed_node_types.as_deref()))
    }

    fn allowed_port_types(&self) -> Option<&'a [String]> {
        self.port
            .allowed_port_types
            .as_deref()
            .or_else(|| self.definition.and_then(|d| d.allowed_port_types.as_deref()))
    }
}

fn run_cascade<'a>(from: &'a Port, to: &'a Port, ctx: &ValidationContext<'a>) -> Result<(), ConnectionRejection> {
    // 1. Direction
    let Some((output_port, input_port)) = normalize_endpoints(from, to) else {
        return Err(ConnectionRejection::SameDirection(from.direction));
    };
    if from.node_id == to.node_id {
        return Err(ConnectionRejection::SameNode(from.node_id.clone()));
    }
    let (output_type, input_type) = if from.is_output() {
        (ctx.from_node_type, ctx.to_node_type)
    } else {
        (ctx.to_node_type, ctx.from_node_type)
    };

    // 2. Duplicate
    let output_key = output_port.key();
    let input_key = input_port.key();
    if let Some(connections) = ctx.connections {
        if connections.iter().any(|c| c.links(&output_key, &input_key)) {
            return Err(ConnectionRejection::Duplicate {
                from: output_key,
                to: input_key,
            });
        }
    }

    // 3. Node validators
    for node_type in [output_type, input_type].into_iter().flatten() {
        if let Some(validate) = &node_type.validate_connection {
            if !validate(output_port, input_port) {
                return Err(ConnectionRejection::NodeValidator {
                    node_type: node_type.node_type.clone(),
                });
            }
        }
    }

    let output = Endpoint::new(output_port, output_type, ctx);
    let input = Endpoint::new(input_port, input_type, ctx);

    // 4. Data types
    let output_types = effective_data_types(output.port, output.definition);
    let input_types = effective_data_types(input.port, input.definition);
    let types_compatible = data_type::compatible(&output_types, &input_types);
    if !types_compatible {
        return Err(ConnectionRejection::IncompatibleDataTypes {
            from_types: output_types,
            to_types: input_types,
        });
    }

    // 5. Port predicates, then allow-lists
    let connections = ctx.connections.unwrap_or(&[]);
    let predicate_ctx = PortConnectContext {
        from_port: output.port,
        to_port: input.port,
        from_node: output.node,
        to_node: input.node,
        from_definition: output.definition,
        to_definition: input.definition,
        connections,
        data_types_compatible: types_compatible,
    };
    for endpoint in [&output, &input] {
        if let Some(predicate) = endpoint.definition.and_then(|d| d.can_connect.as_ref()) {
            if !predicate(&predicate_ctx) {
                return Err(ConnectionRejection::PortPredicate {
                    port: endpoint.port.key(),
                });
            }
        }
    }
    check_allow_lists(&output, &input)?;
    check_allow_lists(&input, &output)?;

    // 6. Capacity, input side first
    check_capacity(&input, incoming_count(connections, &input_key))?;
    check_capacity(&output, outgoing_count(connections, &output_key))?;

    Ok(())
}

fn check_allow_lists(endpoint: &Endpoint<'_>, peer: &Endpoint<'_>) -> Result<(), ConnectionRejection> {
    if let Some(allowed) = endpoint.allowed_node_types().filter(|list| !list.is_empty()) {
        let peer_type = peer.type_name();
        if !peer_type.is_some_and(|t| allowed.iter().any(|a| a == t)) {
            return Err(ConnectionRejection::NodeTypeNotAllowed {
                port: endpoint.port.key(),
                peer_type: peer_type.map(str::to_string),
            });
        }
    }

    if let Some(allowed) = endpoint.allowed_port_types().filter(|list| !list.is_empty()) {
        let peer_type = peer.port_type();
        if !allowed.iter().any(|a| a == peer_type) {
            return Err(ConnectionRejection::PortTypeNotAllowed {
                port: endpoint.port.key(),
                peer_type: peer_type.to_string(),
            });
        }
    }
    Ok(())
}

fn check_capacity(endpoint: &Endpoint<'_>, count: usize) -> Result<(), ConnectionRejection> {
    let max = effective_max_connections(endpoint.port, endpoint.definition);
    if max.allows(count) {
        Ok(())
    } else {
        Err(ConnectionRejection::CapacityReached {
            port: endpoint.port.key(),
            max,
            count,
        })
    }
}
