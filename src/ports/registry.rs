//! Node-type registry.
//!
//! The engine looks node types up by their type string. Hosts can plug in
//! their own registry through [`NodeTypeRegistry`]; [`NodeTypeCatalog`] is
//! the in-memory implementation used by the inspection tool and tests.

use crate::ports::definition::NodeTypeDefinition;
use std::collections::HashMap;
use std::sync::Arc;

/// Source of node-type definitions.
#[cfg_attr(test, mockall::automock)]
pub trait NodeTypeRegistry {
    /// Definition for one node type, if registered
    fn node_type(&self, node_type: &str) -> Option<Arc<NodeTypeDefinition>>;

    /// All registered definitions in registration order
    fn node_types(&self) -> Vec<Arc<NodeTypeDefinition>>;
}

/// Registration-ordered, in-memory set of node types.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeCatalog {
    definitions: Vec<Arc<NodeTypeDefinition>>,
    index: HashMap<String, usize>,
}

impl NodeTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = NodeTypeDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.register(definition);
        }
        catalog
    }

    /// Add a definition, replacing any existing one with the same type
    /// string while keeping its original position.
    pub fn register(&mut self, definition: NodeTypeDefinition) {
        let key = definition.node_type.clone();
        let definition = Arc::new(definition);
        match self.index.get(&key) {
            Some(&slot) => {
                tracing::debug!("Replacing node type '{}'", key);
                self.definitions[slot] = definition;
            }
            None => {
                self.index.insert(key, self.definitions.len());
                self.definitions.push(definition);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl NodeTypeRegistry for NodeTypeCatalog {
    fn node_type(&self, node_type: &str) -> Option<Arc<NodeTypeDefinition>> {
        self.index
            .get(node_type)
            .map(|&slot| Arc::clone(&self.definitions[slot]))
    }

    fn node_types(&self) -> Vec<Arc<NodeTypeDefinition>> {
        self.definitions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::definition::PortDefinition;

    #[test]
    fn test_register_and_lookup() {
        let catalog = NodeTypeCatalog::from_definitions([
            NodeTypeDefinition::new("source"),
            NodeTypeDefinition::new("sink"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.node_type("sink").is_some());
        assert!(catalog.node_type("filter").is_none());

        let order: Vec<String> = catalog
            .node_types()
            .iter()
            .map(|d| d.node_type.clone())
            .collect();
        assert_eq!(order, vec!["source", "sink"]);
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut catalog = NodeTypeCatalog::from_definitions([
            NodeTypeDefinition::new("a"),
            NodeTypeDefinition::new("b"),
        ]);
        catalog.register(
            NodeTypeDefinition::new("a").with_port(PortDefinition::output("out", "Out")),
        );
        assert_eq!(catalog.len(), 2);
        let types = catalog.node_types();
        assert_eq!(types[0].node_type, "a");
        assert_eq!(types[0].ports.len(), 1);
    }
}
