//! Connection rules and whole-graph connectivity queries.
//!
//! [`validator`] holds the rule cascade; [`planner`] and [`query`] are built
//! on top of it. [`graph`] defines the state a host passes in.

pub mod graph;
pub mod planner;
pub mod query;
pub mod resolve;
pub mod validator;

pub use graph::{DerivedPorts, GraphDocument, GraphSnapshot, PortCache, PortProvider};
pub use planner::{plan_connection, switch_behavior, ConnectionPlan, NewConnection, SwitchBehavior};
pub use query::{connectable_node_types, connectable_port_ids, CANDIDATE_NODE_ID};
pub use resolve::{resolve_port_definition, strip_numeric_suffix};
pub use validator::{can_connect, normalize_endpoints, validate_connection, ConnectionRejection, ValidationContext};
