//! Test data builders for creating test objects

use nodeport_rs::ports::{DataType, PortDefinition, PortDirection};
use nodeport_rs::types::{MaxConnections, Node, PortOverride};
use serde_json::Value;

/// Builder for creating test Nodes
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    pub fn new(id: &str, node_type: &str) -> Self {
        Self {
            node: Node::new(id, node_type),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.node = self.node.at(x, y);
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.node = self.node.with_size(width, height);
        self
    }

    pub fn data(mut self, key: &str, value: Value) -> Self {
        self.node = self.node.with_data(key, value);
        self
    }

    pub fn disable_port(mut self, port_id: &str) -> Self {
        self.node = self.node.with_override(PortOverride::new(port_id).disabled());
        self
    }

    pub fn build(self) -> Node {
        self.node
    }
}

/// Builder for creating test PortDefinitions
pub struct PortDefBuilder {
    definition: PortDefinition,
}

impl PortDefBuilder {
    pub fn input(id: &str) -> Self {
        Self {
            definition: PortDefinition::new(id, PortDirection::Input, id),
        }
    }

    pub fn output(id: &str) -> Self {
        Self {
            definition: PortDefinition::new(id, PortDirection::Output, id),
        }
    }

    pub fn data_type(mut self, data_type: impl Into<DataType>) -> Self {
        self.definition = self.definition.with_data_type(data_type);
        self
    }

    pub fn max(mut self, max: u32) -> Self {
        self.definition = self.definition.with_max_connections(MaxConnections::Limited(max));
        self
    }

    pub fn unlimited(mut self) -> Self {
        self.definition = self.definition.unlimited();
        self
    }

    pub fn instances(mut self, count: u32) -> Self {
        self.definition = self.definition.with_instances(count);
        self
    }

    pub fn build(self) -> PortDefinition {
        self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = NodeBuilder::new("n1", "filter")
            .at(10.0, 20.0)
            .size(100.0, 50.0)
            .build();

        assert_eq!(node.id.as_str(), "n1");
        assert_eq!(node.position.x, 10.0);
        assert_eq!(node.size.map(|s| s.width), Some(100.0));
    }
}
