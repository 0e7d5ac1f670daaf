//! Planning the outcome of a connection drag.
//!
//! A drag that starts on a port already at capacity is ignored outright;
//! there is no replacement of the existing connection. Any other drag goes
//! through the full validator against the port it was released on.

use crate::connect::resolve::{effective_max_connections, resolve_port_definition};
use crate::connect::validator::{normalize_endpoints, validate_connection, ConnectionRejection, ValidationContext};
use crate::ports::definition::NodeTypeDefinition;
use crate::ports::port::{Port, PortDirection};
use crate::types::{incoming_count, outgoing_count, Connection, ConnectionId, PortKey};

/// What a drag starting on a port does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchBehavior {
    /// The port has room; continue to validation
    Append,
    /// The port is full; discard the drag
    Ignore,
}

/// Classify a drag origin by its remaining capacity.
pub fn switch_behavior(
    port: &Port,
    node_type: Option<&NodeTypeDefinition>,
    connections: &[Connection],
) -> SwitchBehavior {
    let key = port.key();
    let count = match port.direction {
        PortDirection::Output => outgoing_count(connections, &key),
        PortDirection::Input => incoming_count(connections, &key),
    };
    let max = effective_max_connections(port, resolve_port_definition(node_type, port));
    if max.allows(count) {
        SwitchBehavior::Append
    } else {
        SwitchBehavior::Ignore
    }
}

/// An accepted connection, oriented output → input, not yet given an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewConnection {
    pub from: PortKey,
    pub to: PortKey,
}

impl NewConnection {
    /// Orient two ports as output → input; `None` if both share a direction.
    pub fn between(a: &Port, b: &Port) -> Option<Self> {
        normalize_endpoints(a, b).map(|(output, input)| Self {
            from: output.key(),
            to: input.key(),
        })
    }

    pub fn into_connection(self, id: impl Into<ConnectionId>) -> Connection {
        Connection::new(id, self.from, self.to)
    }
}

/// Result of planning a drag from `start` to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionPlan {
    Create(NewConnection),
    /// Drag started on a full port
    Ignore,
    Reject(ConnectionRejection),
}

/// Plan a drag that started on `start` and was released on `target`.
///
/// `ctx.from_node_type` is the node type of `start`. Without
/// `ctx.connections` the start port is treated as empty.
pub fn plan_connection(start: &Port, target: &Port, ctx: &ValidationContext<'_>) -> ConnectionPlan {
    let connections = ctx.connections.unwrap_or(&[]);
    if switch_behavior(start, ctx.from_node_type, connections) == SwitchBehavior::Ignore {
        tracing::trace!("Ignoring drag from full port {}", start.key());
        return ConnectionPlan::Ignore;
    }

    match validate_connection(start, target, ctx) {
        Ok(()) => match NewConnection::between(start, target) {
            Some(connection) => ConnectionPlan::Create(connection),
            // Directions always differ after acceptance.
            None => ConnectionPlan::Ignore,
        },
        Err(rejection) => ConnectionPlan::Reject(rejection),
    }
}
