//! Core data types for nodeport-rs
//!
//! This module contains the graph-level records the connectivity engine
//! reads: nodes, connections and the identifiers that tie ports to them.
//!
//! # Main Types
//!
//! - [`NodeId`] / [`ConnectionId`] - String identity newtypes
//! - [`PortKey`] - `(node id, port id)` pair used for connection bookkeeping
//! - [`Node`] - A node instance on the canvas with its data bag and port overrides
//! - [`Connection`] - A stored output → input link between two ports
//! - [`MaxConnections`] - Port capacity (`"unlimited"` or a positive count)
//!
//! # Direction Invariant
//!
//! Connections are always stored output → input. Whichever end the user
//! dragged from, the validator normalizes the pair before anything is
//! recorded, so `from_*` always names the output-direction port.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fallback node size when neither the node nor its type declares one
pub const DEFAULT_NODE_SIZE: Size = Size {
    width: 160.0,
    height: 80.0,
};

// ==================== Identifiers ====================

/// Identifier of a node on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of a stored connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConnectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identity of a port for connection bookkeeping.
///
/// Port ids are only unique within one node, so every lookup that crosses
/// node boundaries goes through this pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortKey {
    pub node_id: NodeId,
    pub port_id: String,
}

impl PortKey {
    pub fn new(node_id: impl Into<NodeId>, port_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            port_id: port_id.into(),
        }
    }

    /// Parse the `node:port` form produced by `Display`.
    ///
    /// Splits on the first `:` so port ids may themselves contain colons.
    pub fn parse(text: &str) -> Option<Self> {
        let (node, port) = text.split_once(':')?;
        if node.is_empty() || port.is_empty() {
            return None;
        }
        Some(Self::new(node, port))
    }
}

impl fmt::Display for PortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node_id, self.port_id)
    }
}

// ==================== Geometry Primitives ====================

/// A point in canvas space (or node-local space, depending on context).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by the given deltas
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Rendered size of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        DEFAULT_NODE_SIZE
    }
}

// ==================== Capacity ====================

/// Maximum number of simultaneous connections a port may take part in.
///
/// Serialized as a positive integer or the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxConnections {
    Limited(u32),
    Unlimited,
}

impl MaxConnections {
    /// Capacity used when neither the port nor its definition declares one
    pub const DEFAULT: MaxConnections = MaxConnections::Limited(1);

    /// Whether one more connection fits given `count` existing ones
    #[inline]
    pub fn allows(self, count: usize) -> bool {
        match self {
            MaxConnections::Unlimited => true,
            MaxConnections::Limited(max) => count < max as usize,
        }
    }
}

impl Default for MaxConnections {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for MaxConnections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxConnections::Limited(max) => write!(f, "{}", max),
            MaxConnections::Unlimited => f.write_str("unlimited"),
        }
    }
}

impl Serialize for MaxConnections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MaxConnections::Limited(max) => serializer.serialize_u32(*max),
            MaxConnections::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

impl<'de> Deserialize<'de> for MaxConnections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u32),
            Keyword(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(0) => Err(serde::de::Error::custom(
                "invalid maxConnections 0, expected a positive count or \"unlimited\"",
            )),
            Repr::Count(max) => Ok(MaxConnections::Limited(max)),
            Repr::Keyword(word) if word == "unlimited" => Ok(MaxConnections::Unlimited),
            Repr::Keyword(word) => Err(serde::de::Error::custom(format!(
                "invalid maxConnections '{}', expected a count or \"unlimited\"",
                word
            ))),
        }
    }
}

// ==================== Nodes ====================

/// Per-node adjustment of one port definition's instances.
///
/// Matched against a derived port by its generated id first, then by the
/// id of the definition it came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortOverride {
    pub port_id: String,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<MaxConnections>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_node_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_port_types: Option<Vec<String>>,
}

impl PortOverride {
    pub fn new(port_id: impl Into<String>) -> Self {
        Self {
            port_id: port_id.into(),
            ..Default::default()
        }
    }

    /// Drop the matching port instances from the node
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn with_max_connections(mut self, max: MaxConnections) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn with_allowed_node_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_node_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_allowed_port_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_port_types = Some(types.into_iter().map(Into::into).collect());
        self
    }
}

/// A node instance placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,

    /// Key into the node-type registry
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default)]
    pub position: Position,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,

    /// Arbitrary user data; dynamic port counts read from here
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub port_overrides: Vec<PortOverride>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            position: Position::default(),
            size: None,
            data: serde_json::Map::new(),
            port_overrides: Vec::new(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub fn with_override(mut self, port_override: PortOverride) -> Self {
        self.port_overrides.push(port_override);
        self
    }

    /// Numeric data value, if present and numeric
    pub fn data_f64(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(serde_json::Value::as_f64)
    }
}

// ==================== Connections ====================

/// A stored connection, always oriented output → input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub from_node_id: NodeId,
    pub from_port_id: String,
    pub to_node_id: NodeId,
    pub to_port_id: String,
}

impl Connection {
    pub fn new(id: impl Into<ConnectionId>, from: PortKey, to: PortKey) -> Self {
        Self {
            id: id.into(),
            from_node_id: from.node_id,
            from_port_id: from.port_id,
            to_node_id: to.node_id,
            to_port_id: to.port_id,
        }
    }

    pub fn from_key(&self) -> PortKey {
        PortKey::new(self.from_node_id.clone(), self.from_port_id.clone())
    }

    pub fn to_key(&self) -> PortKey {
        PortKey::new(self.to_node_id.clone(), self.to_port_id.clone())
    }

    #[inline]
    pub fn starts_at(&self, key: &PortKey) -> bool {
        self.from_node_id == key.node_id && self.from_port_id == key.port_id
    }

    #[inline]
    pub fn ends_at(&self, key: &PortKey) -> bool {
        self.to_node_id == key.node_id && self.to_port_id == key.port_id
    }

    /// Whether this connection links `a` and `b`, in either orientation
    pub fn links(&self, a: &PortKey, b: &PortKey) -> bool {
        (self.starts_at(a) && self.ends_at(b)) || (self.starts_at(b) && self.ends_at(a))
    }
}

/// Number of connections leaving `key`
pub fn outgoing_count(connections: &[Connection], key: &PortKey) -> usize {
    connections.iter().filter(|c| c.starts_at(key)).count()
}

/// Number of connections arriving at `key`
pub fn incoming_count(connections: &[Connection], key: &PortKey) -> usize {
    connections.iter().filter(|c| c.ends_at(key)).count()
}
