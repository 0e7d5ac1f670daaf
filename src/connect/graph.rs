//! Graph state handed to the engine by its host.
//!
//! The engine never owns graph state. Hosts pass a [`GraphSnapshot`] per
//! call together with a [`PortProvider`] that yields each node's resolved
//! ports. Two providers ship with the crate:
//!
//! - [`DerivedPorts`] derives ports on every lookup
//! - [`PortCache`] is a caller-owned memo, refreshed explicitly when a
//!   node's data or its type changes
//!
//! [`GraphDocument`] is the JSON form read by the `nodeport` tool.

use crate::error::{EngineError, Result, ResultExt};
use crate::ports::definition::NodeTypeDefinition;
use crate::ports::derive::derive_ports;
use crate::ports::port::Port;
use crate::ports::registry::{NodeTypeCatalog, NodeTypeRegistry};
use crate::types::{Connection, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

// ==================== Snapshot ====================

/// Nodes and connections at one point in time.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub nodes: HashMap<NodeId, Node>,
    pub connections: Vec<Connection>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(nodes: impl IntoIterator<Item = Node>, connections: Vec<Connection>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
            connections,
        }
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Node ids in sorted order, for deterministic iteration
    pub fn sorted_node_ids(&self) -> Vec<&NodeId> {
        let mut ids: Vec<&NodeId> = self.nodes.keys().collect();
        ids.sort();
        ids
    }
}

// ==================== Port Providers ====================

/// Source of a node's resolved ports.
pub trait PortProvider {
    /// Ports of the node, or an empty list for an unknown node
    fn ports(&self, node_id: &NodeId) -> Cow<'_, [Port]>;
}

/// Derives ports from the registry on every lookup.
pub struct DerivedPorts<'a, R: NodeTypeRegistry + ?Sized> {
    graph: &'a GraphSnapshot,
    registry: &'a R,
}

impl<'a, R: NodeTypeRegistry + ?Sized> DerivedPorts<'a, R> {
    pub fn new(graph: &'a GraphSnapshot, registry: &'a R) -> Self {
        Self { graph, registry }
    }
}

impl<R: NodeTypeRegistry + ?Sized> PortProvider for DerivedPorts<'_, R> {
    fn ports(&self, node_id: &NodeId) -> Cow<'_, [Port]> {
        match self.graph.node(node_id) {
            Some(node) => {
                let node_type = self.registry.node_type(&node.node_type);
                Cow::Owned(derive_ports(node, node_type.as_deref()))
            }
            None => Cow::Borrowed(&[]),
        }
    }
}

/// Caller-owned memo of derived ports, keyed by node.
#[derive(Debug, Clone, Default)]
pub struct PortCache {
    ports: HashMap<NodeId, Vec<Port>>,
}

impl PortCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive ports for every node in `graph`
    pub fn build<R: NodeTypeRegistry + ?Sized>(graph: &GraphSnapshot, registry: &R) -> Self {
        let mut cache = Self::new();
        for node in graph.nodes.values() {
            cache.refresh_node(node, registry);
        }
        cache
    }

    /// Re-derive one node's ports after its data or type changed
    pub fn refresh_node<R: NodeTypeRegistry + ?Sized>(&mut self, node: &Node, registry: &R) {
        let node_type = registry.node_type(&node.node_type);
        self.ports
            .insert(node.id.clone(), derive_ports(node, node_type.as_deref()));
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&[Port]> {
        self.ports.get(node_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl PortProvider for PortCache {
    fn ports(&self, node_id: &NodeId) -> Cow<'_, [Port]> {
        Cow::Borrowed(self.get(node_id).unwrap_or(&[]))
    }
}

// ==================== Document ====================

/// Declarative graph document: node types, nodes and connections.
///
/// Capabilities cannot be expressed in JSON, so node types loaded this way
/// only carry declarative rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    #[serde(default)]
    pub node_types: Vec<NodeTypeDefinition>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl GraphDocument {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| EngineError::Document(format!("Failed to parse graph document: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(EngineError::from)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Split into a registry and a snapshot
    pub fn into_parts(self) -> (NodeTypeCatalog, GraphSnapshot) {
        let catalog = NodeTypeCatalog::from_definitions(self.node_types);
        let graph = GraphSnapshot::from_parts(self.nodes, self.connections);
        (catalog, graph)
    }
}
