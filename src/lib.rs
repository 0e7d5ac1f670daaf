//! # nodeport-rs: Port Connectivity and Placement Engine
//!
//! The port layer of a visual node-graph editor. Node types declare their
//! ports once; the engine expands them into concrete ports per node, lays
//! them out along the node's edges, and decides which ports may be wired
//! together.
//!
//! ## Architecture
//!
//! - **Ports** (`ports`): data-type tags, port/node-type definitions,
//!   instance derivation, placement and the geometry engine
//! - **Connect** (`connect`): the connection rule cascade, the drag planner
//!   and whole-graph connectable queries
//! - **Config** (`config`): layout constants loaded from TOML
//!
//! The engine is synchronous and keeps no state between calls. Graph state
//! is always passed in by the host.
//!
//! ## Configuration
//!
//! Layout constants can be tuned in `nodeport.toml` in the platform config
//! directory under `dev.hxyulin.nodeport-rs`:
//!
//! - **Linux**: `~/.config/dev.hxyulin.nodeport-rs/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.nodeport-rs/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.nodeport-rs\`
//!
//! ## Example
//!
//! ```ignore
//! use nodeport_rs::{
//!     connect::{can_connect, ValidationContext},
//!     ports::{derive_ports, NodeTypeDefinition, PortDefinition},
//!     types::Node,
//! };
//!
//! let camera = NodeTypeDefinition::new("camera")
//!     .with_port(PortDefinition::output("frames", "Frames").with_data_type("image"));
//! let display = NodeTypeDefinition::new("display")
//!     .with_port(PortDefinition::input("in", "In").with_data_type("image"));
//!
//! let out = derive_ports(&Node::new("a", "camera"), Some(&camera));
//! let inp = derive_ports(&Node::new("b", "display"), Some(&display));
//!
//! let ctx = ValidationContext::new().with_node_types(Some(&camera), Some(&display));
//! assert!(can_connect(&out[0], &inp[0], &ctx));
//! ```

pub mod config;
pub mod connect;
pub mod error;
pub mod ports;
pub mod types;

// Re-export commonly used types
pub use config::{EngineConfig, LayoutSettings};
pub use connect::{can_connect, validate_connection, ConnectionRejection, GraphSnapshot, ValidationContext};
pub use error::{EngineError, Result};
pub use ports::{NodeTypeCatalog, NodeTypeDefinition, Port, PortDefinition, PortDirection};
pub use types::{Connection, MaxConnections, Node, NodeId, PortKey};
