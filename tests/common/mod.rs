//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use nodeport_rs::connect::GraphSnapshot;
use nodeport_rs::ports::NodeTypeCatalog;

/// Tolerance for geometry comparisons
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Parse a graph document fixture into a catalog and snapshot
pub fn load_graph(json: &str) -> (NodeTypeCatalog, GraphSnapshot) {
    nodeport_rs::connect::GraphDocument::from_json_str(json)
        .expect("fixture should parse")
        .into_parts()
}
