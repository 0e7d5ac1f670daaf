//! Resolving a port instance back to the definition it came from.
//!
//! Ports derived by the engine carry their `definition_id`, but ports
//! built by hosts or loaded from older documents may not. Resolution
//! therefore tries, in order:
//!
//! 1. `port.definition_id`
//! 2. a definition whose id equals `port.id`
//! 3. a definition whose id equals `port.id` with a trailing `-<digits>`
//!    removed (`"input-12"` → `"input"`)
//!
//! Step 3 is a naming convention, not a guarantee. It only strips one
//! all-digit suffix after the last `-`, and needs a non-empty base.

use crate::ports::data_type;
use crate::ports::definition::{NodeTypeDefinition, PortDefinition};
use crate::ports::port::Port;
use crate::types::MaxConnections;

/// `id` without its trailing `-<digits>` suffix, if it has one.
pub fn strip_numeric_suffix(id: &str) -> Option<&str> {
    let (base, suffix) = id.rsplit_once('-')?;
    if base.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(base)
}

/// The definition `port` was expanded from, if any.
pub fn resolve_port_definition<'a>(
    node_type: Option<&'a NodeTypeDefinition>,
    port: &Port,
) -> Option<&'a PortDefinition> {
    let node_type = node_type?;

    if let Some(definition_id) = &port.definition_id {
        if let Some(definition) = node_type.port_definition(definition_id) {
            return Some(definition);
        }
    }
    if let Some(definition) = node_type.port_definition(&port.id) {
        return Some(definition);
    }
    strip_numeric_suffix(&port.id).and_then(|base| node_type.port_definition(base))
}

/// Tag set used for the data-type check.
///
/// The port's own value comes first, so one definition can produce
/// differently typed instances.
pub fn effective_data_types(port: &Port, definition: Option<&PortDefinition>) -> Vec<String> {
    let from_definition = match definition {
        Some(def) => data_type::merge(
            &data_type::normalize(def.data_type.as_ref()),
            def.data_types.as_deref().unwrap_or(&[]),
        ),
        None => Vec::new(),
    };
    data_type::merge(&data_type::normalize(port.data_type.as_ref()), &from_definition)
}

/// Capacity of a port: its own value, else its definition's, else 1.
pub fn effective_max_connections(port: &Port, definition: Option<&PortDefinition>) -> MaxConnections {
    port.max_connections
        .or_else(|| definition.and_then(|d| d.max_connections))
        .unwrap_or_default()
}

/// Identifier matched against `allowedPortTypes`: the definition id,
/// else the port id without its instance suffix.
pub fn port_type_id(port: &Port) -> &str {
    if let Some(definition_id) = &port.definition_id {
        return definition_id;
    }
    strip_numeric_suffix(&port.id).unwrap_or(&port.id)
}
