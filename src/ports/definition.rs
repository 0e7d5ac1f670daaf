//! Declarative port and node-type definitions.
//!
//! A [`PortDefinition`] is authored once per node type. Besides plain data
//! it may carry capabilities: closures deciding how many instances to
//! expand, how to name them, and whether a connection is acceptable. Each
//! capability is invoked from exactly one place in the engine.
//!
//! [`normalize_definition`] resolves the optional capabilities into a
//! uniform form where the instance count and the id/label generators are
//! always callable.

use crate::ports::data_type::DataType;
use crate::ports::placement::PlacementInput;
use crate::ports::port::{Port, PortDirection};
use crate::types::{Connection, MaxConnections, Node, Size};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Upper bound on instances expanded from one definition. Larger counts are
/// truncated with a warning.
pub const MAX_PORT_INSTANCES: usize = 4096;

// ==================== Capabilities ====================

/// A shared, user-supplied function stored on a definition.
pub struct Capability<F: ?Sized>(Arc<F>);

impl<F: ?Sized> Capability<F> {
    pub fn from_arc(f: Arc<F>) -> Self {
        Self(f)
    }
}

impl<F: ?Sized> Clone for Capability<F> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<F: ?Sized> Deref for Capability<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.0
    }
}

impl<F: ?Sized> fmt::Debug for Capability<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Capability(..)")
    }
}

/// Input to an instance-count function.
pub struct InstanceContext<'a> {
    pub node: &'a Node,
    pub definition: &'a PortDefinition,
}

/// Input to id/label generators for one instance.
pub struct PortInstanceContext<'a> {
    pub node: &'a Node,
    pub definition: &'a PortDefinition,
    /// Zero-based instance index
    pub index: usize,
    pub total: usize,
}

/// Input to a port-level connect predicate.
///
/// Ports are always normalized: `from_port` is the output side regardless
/// of which end the user dragged from.
pub struct PortConnectContext<'a> {
    pub from_port: &'a Port,
    pub to_port: &'a Port,
    pub from_node: Option<&'a Node>,
    pub to_node: Option<&'a Node>,
    pub from_definition: Option<&'a PortDefinition>,
    pub to_definition: Option<&'a PortDefinition>,
    pub connections: &'a [Connection],
    /// Outcome of the data-type check, so predicates can build on it
    pub data_types_compatible: bool,
}

/// Returns the instance count. Non-finite or negative values yield no instances.
pub type InstanceCountFn = Capability<dyn Fn(&InstanceContext<'_>) -> f64 + Send + Sync>;
pub type PortIdFn = Capability<dyn Fn(&PortInstanceContext<'_>) -> String + Send + Sync>;
pub type PortLabelFn = Capability<dyn Fn(&PortInstanceContext<'_>) -> String + Send + Sync>;
pub type PortConnectFn = Capability<dyn Fn(&PortConnectContext<'_>) -> bool + Send + Sync>;
/// Node-level validator, called as `(output_port, input_port)`.
pub type NodeConnectFn = Capability<dyn Fn(&Port, &Port) -> bool + Send + Sync>;

/// How many instances a definition expands to.
#[derive(Clone, Debug)]
pub enum InstanceCount {
    Fixed(u32),
    Dynamic(InstanceCountFn),
}

impl Serialize for InstanceCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InstanceCount::Fixed(n) => serializer.serialize_u32(*n),
            // Closures have no serialized form.
            InstanceCount::Dynamic(_) => serializer.serialize_none(),
        }
    }
}

/// Any JSON value is accepted. Non-numeric, negative and non-finite counts
/// load as zero instances; fractional counts are floored.
impl<'de> Deserialize<'de> for InstanceCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let count = match value.as_f64() {
            Some(raw) if raw.is_finite() && raw > 0.0 => raw.floor() as u32,
            _ => {
                if value.as_f64() != Some(0.0) {
                    tracing::debug!("Malformed instance count {}, using 0", value);
                }
                0
            }
        };
        Ok(InstanceCount::Fixed(count))
    }
}

// ==================== Port Definition ====================

/// Declarative description of one port (or family of ports) on a node type.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDefinition {
    pub id: String,
    pub direction: PortDirection,

    #[serde(default)]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<PlacementInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<MaxConnections>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<InstanceCount>,

    #[serde(skip)]
    pub create_port_id: Option<PortIdFn>,

    #[serde(skip)]
    pub create_port_label: Option<PortLabelFn>,

    #[serde(skip)]
    pub can_connect: Option<PortConnectFn>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_node_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_port_types: Option<Vec<String>>,

    /// Free-form per-port data for the host application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl PortDefinition {
    pub fn new(id: impl Into<String>, direction: PortDirection, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            direction,
            label: label.into(),
            placement: None,
            data_type: None,
            data_types: None,
            max_connections: None,
            instances: None,
            create_port_id: None,
            create_port_label: None,
            can_connect: None,
            allowed_node_types: None,
            allowed_port_types: None,
            data: None,
        }
    }

    pub fn input(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, PortDirection::Input, label)
    }

    pub fn output(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, PortDirection::Output, label)
    }

    pub fn with_placement(mut self, placement: impl Into<PlacementInput>) -> Self {
        self.placement = Some(placement.into());
        self
    }

    pub fn with_data_type(mut self, data_type: impl Into<DataType>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn with_data_types<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_types = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_connections(mut self, max: MaxConnections) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn unlimited(self) -> Self {
        self.with_max_connections(MaxConnections::Unlimited)
    }

    pub fn with_instances(mut self, count: u32) -> Self {
        self.instances = Some(InstanceCount::Fixed(count));
        self
    }

    pub fn with_instances_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&InstanceContext<'_>) -> f64 + Send + Sync + 'static,
    {
        let f: Arc<dyn Fn(&InstanceContext<'_>) -> f64 + Send + Sync> = Arc::new(f);
        self.instances = Some(InstanceCount::Dynamic(Capability::from_arc(f)));
        self
    }

    pub fn with_port_id_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&PortInstanceContext<'_>) -> String + Send + Sync + 'static,
    {
        let f: Arc<dyn Fn(&PortInstanceContext<'_>) -> String + Send + Sync> = Arc::new(f);
        self.create_port_id = Some(Capability::from_arc(f));
        self
    }

    pub fn with_port_label_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&PortInstanceContext<'_>) -> String + Send + Sync + 'static,
    {
        let f: Arc<dyn Fn(&PortInstanceContext<'_>) -> String + Send + Sync> = Arc::new(f);
        self.create_port_label = Some(Capability::from_arc(f));
        self
    }

    pub fn with_connect_predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&PortConnectContext<'_>) -> bool + Send + Sync + 'static,
    {
        let f: Arc<dyn Fn(&PortConnectContext<'_>) -> bool + Send + Sync> = Arc::new(f);
        self.can_connect = Some(Capability::from_arc(f));
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

// ==================== Node Type Definition ====================

/// Static description of a node kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDefinition {
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub ports: Vec<PortDefinition>,

    /// Size used for layout when a node does not carry its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_size: Option<Size>,

    #[serde(skip)]
    pub validate_connection: Option<NodeConnectFn>,
}

impl NodeTypeDefinition {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            label: None,
            ports: Vec::new(),
            default_size: None,
            validate_connection: None,
        }
    }

    pub fn with_port(mut self, port: PortDefinition) -> Self {
        self.ports.push(port);
        self
    }

    pub fn with_default_size(mut self, width: f64, height: f64) -> Self {
        self.default_size = Some(Size::new(width, height));
        self
    }

    pub fn with_validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&Port, &Port) -> bool + Send + Sync + 'static,
    {
        let f: Arc<dyn Fn(&Port, &Port) -> bool + Send + Sync> = Arc::new(f);
        self.validate_connection = Some(Capability::from_arc(f));
        self
    }

    /// Definition with exactly this id
    pub fn port_definition(&self, id: &str) -> Option<&PortDefinition> {
        self.ports.iter().find(|p| p.id == id)
    }
}

// ==================== Normalization ====================

/// A definition whose instance count and generators are always present.
#[derive(Clone, Debug)]
pub struct NormalizedPortDefinition<'a> {
    pub definition: &'a PortDefinition,
    instances: InstanceCountFn,
    create_port_id: PortIdFn,
    create_port_label: PortLabelFn,
}

impl<'a> NormalizedPortDefinition<'a> {
    /// Instance count for `node`, floored and clamped.
    ///
    /// Anything that is not a finite, positive number counts as zero.
    pub fn instance_count(&self, node: &Node) -> usize {
        let raw = (self.instances)(&InstanceContext {
            node,
            definition: self.definition,
        });
        if !raw.is_finite() || raw <= 0.0 {
            if raw != 0.0 {
                tracing::debug!(
                    "Port definition '{}' on node {} returned instance count {}, using 0",
                    self.definition.id,
                    node.id,
                    raw
                );
            }
            return 0;
        }
        let count = raw.floor() as usize;
        if count > MAX_PORT_INSTANCES {
            tracing::warn!(
                "Port definition '{}' on node {} capped at {} instances",
                self.definition.id,
                node.id,
                MAX_PORT_INSTANCES
            );
            return MAX_PORT_INSTANCES;
        }
        count
    }

    pub fn port_id(&self, ctx: &PortInstanceContext<'_>) -> String {
        (self.create_port_id)(ctx)
    }

    pub fn port_label(&self, ctx: &PortInstanceContext<'_>) -> String {
        (self.create_port_label)(ctx)
    }
}

/// Resolve a definition's optional capabilities into callable form.
///
/// A plain count becomes a constant function (absent means 1). Missing
/// generators fall back to the definition's own id/label for a single
/// instance, and `{id}-{n}` / `{label} {n}` (1-based) for several.
pub fn normalize_definition(definition: &PortDefinition) -> NormalizedPortDefinition<'_> {
    let instances = match &definition.instances {
        Some(InstanceCount::Dynamic(f)) => f.clone(),
        Some(InstanceCount::Fixed(n)) => {
            let n = f64::from(*n);
            let f: Arc<dyn Fn(&InstanceContext<'_>) -> f64 + Send + Sync> = Arc::new(move |_| n);
            Capability::from_arc(f)
        }
        None => {
            let f: Arc<dyn Fn(&InstanceContext<'_>) -> f64 + Send + Sync> = Arc::new(|_| 1.0);
            Capability::from_arc(f)
        }
    };

    let create_port_id = definition.create_port_id.clone().unwrap_or_else(|| {
        let f: Arc<dyn Fn(&PortInstanceContext<'_>) -> String + Send + Sync> =
            Arc::new(default_port_id);
        Capability::from_arc(f)
    });

    let create_port_label = definition.create_port_label.clone().unwrap_or_else(|| {
        let f: Arc<dyn Fn(&PortInstanceContext<'_>) -> String + Send + Sync> =
            Arc::new(default_port_label);
        Capability::from_arc(f)
    });

    NormalizedPortDefinition {
        definition,
        instances,
        create_port_id,
        create_port_label,
    }
}

fn default_port_id(ctx: &PortInstanceContext<'_>) -> String {
    if ctx.total > 1 {
        format!("{}-{}", ctx.definition.id, ctx.index + 1)
    } else {
        ctx.definition.id.clone()
    }
}

fn default_port_label(ctx: &PortInstanceContext<'_>) -> String {
    if ctx.total > 1 {
        format!("{} {}", ctx.definition.label, ctx.index + 1)
    } else {
        ctx.definition.label.clone()
    }
}
