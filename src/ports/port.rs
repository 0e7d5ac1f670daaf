//! Concrete port instances.
//!
//! A [`Port`] is what a node actually exposes after its type's port
//! definitions have been expanded (see [`derive`](super::derive)). Within
//! one node port ids are unique; across nodes a port is identified by its
//! [`PortKey`].

use crate::error::{EngineError, Result};
use crate::ports::data_type::DataType;
use crate::ports::placement::{Placement, Side};
use crate::types::{MaxConnections, NodeId, PortKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a port is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    /// Side a port of this direction sits on when nothing else is declared
    pub fn default_side(self) -> Side {
        match self {
            PortDirection::Input => Side::Left,
            PortDirection::Output => Side::Right,
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => f.write_str("input"),
            PortDirection::Output => f.write_str("output"),
        }
    }
}

/// A connectable attachment point on a node instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,

    /// Id of the definition this instance was expanded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_id: Option<String>,

    pub direction: PortDirection,

    #[serde(default)]
    pub label: String,

    pub node_id: NodeId,

    /// Single-side position used when no detailed placement applies
    pub position: Side,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<MaxConnections>,

    #[serde(default)]
    pub instance_index: usize,

    #[serde(default = "default_instance_total")]
    pub instance_total: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_node_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_port_types: Option<Vec<String>>,
}

fn default_instance_total() -> usize {
    1
}

impl Port {
    /// A bare port with no definition, placement, type or capacity
    pub fn new(node_id: impl Into<NodeId>, id: impl Into<String>, direction: PortDirection) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            definition_id: None,
            direction,
            node_id: node_id.into(),
            position: direction.default_side(),
            placement: None,
            data_type: None,
            max_connections: None,
            instance_index: 0,
            instance_total: 1,
            allowed_node_types: None,
            allowed_port_types: None,
        }
    }

    pub fn input(node_id: impl Into<NodeId>, id: impl Into<String>) -> Self {
        Self::new(node_id, id, PortDirection::Input)
    }

    pub fn output(node_id: impl Into<NodeId>, id: impl Into<String>) -> Self {
        Self::new(node_id, id, PortDirection::Output)
    }

    pub fn with_data_type(mut self, data_type: impl Into<DataType>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn with_max_connections(mut self, max: MaxConnections) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn with_placement(mut self, placement: impl Into<Placement>) -> Self {
        self.placement = Some(placement.into());
        self
    }

    pub fn with_definition_id(mut self, definition_id: impl Into<String>) -> Self {
        self.definition_id = Some(definition_id.into());
        self
    }

    pub fn key(&self) -> PortKey {
        PortKey::new(self.node_id.clone(), self.id.clone())
    }

    #[inline]
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    #[inline]
    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }
}

/// Look up a port by id within one node's port list
pub fn find_port<'a>(ports: &'a [Port], id: &str) -> Option<&'a Port> {
    ports.iter().find(|p| p.id == id)
}

/// Assert that `port` is an input port.
///
/// Meant for trust boundaries where a wrong direction is a programming
/// error; the connection validator never calls this.
pub fn assert_input_port(port: &Port) -> Result<&Port> {
    assert_direction(port, PortDirection::Input)
}

/// Assert that `port` is an output port.
pub fn assert_output_port(port: &Port) -> Result<&Port> {
    assert_direction(port, PortDirection::Output)
}

fn assert_direction(port: &Port, expected: PortDirection) -> Result<&Port> {
    if port.direction == expected {
        Ok(port)
    } else {
        Err(EngineError::PortDirection {
            node_id: port.node_id.to_string(),
            port_id: port.id.clone(),
            expected,
            actual: port.direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_defaults() {
        let port = Port::input("n1", "in");
        assert_eq!(port.position, Side::Left);
        assert_eq!(port.key(), PortKey::new("n1", "in"));
        assert!(port.is_input());
        assert_eq!(Port::output("n1", "out").position, Side::Right);
    }

    #[test]
    fn test_assert_direction() {
        let input = Port::input("n1", "in");
        let output = Port::output("n1", "out");
        assert!(assert_input_port(&input).is_ok());
        assert!(assert_output_port(&output).is_ok());

        let err = assert_input_port(&output).unwrap_err();
        assert!(matches!(
            err,
            EngineError::PortDirection {
                expected: PortDirection::Input,
                actual: PortDirection::Output,
                ..
            }
        ));
    }

    #[test]
    fn test_find_port() {
        let ports = vec![Port::input("n", "a"), Port::output("n", "b")];
        assert_eq!(find_port(&ports, "b").map(|p| p.direction), Some(PortDirection::Output));
        assert!(find_port(&ports, "c").is_none());
    }
}
