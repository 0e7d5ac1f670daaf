//! Ports: definitions, derived instances, placement and geometry.
//!
//! - [`data_type`]: tag normalization and compatibility
//! - [`definition`]: port and node-type definitions with their capabilities
//! - [`derive`]: expanding definitions into concrete [`Port`]s
//! - [`placement`]: side-based and absolute placement
//! - [`geometry`]: render anchors and connection points
//! - [`registry`]: node-type lookup

pub mod data_type;
pub mod definition;
pub mod derive;
pub mod geometry;
pub mod placement;
pub mod port;
pub mod registry;

pub use data_type::DataType;
pub use definition::{
    normalize_definition, InstanceCount, NodeTypeDefinition, NormalizedPortDefinition, PortConnectContext,
    PortDefinition, MAX_PORT_INSTANCES,
};
pub use derive::{default_ports, derive_ports};
pub use geometry::{compute_node_port_positions, compute_node_port_positions_for, Centering, PortGeometry, RenderAnchor};
pub use placement::{AbsolutePlacement, Placement, PlacementInput, PlacementUnit, Side, SidePlacement};
pub use port::{assert_input_port, assert_output_port, find_port, Port, PortDirection};
pub use registry::{NodeTypeCatalog, NodeTypeRegistry};
